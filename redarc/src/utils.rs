//! Small CLI helpers

use std::io::{self, BufRead, Write};
use std::path::Path;

/// Ask whether an existing file may be overwritten.
///
/// Reads one line from stdin; only `y` or `Y` proceeds. An empty line,
/// anything else, or EOF means no.
pub fn confirm_overwrite(path: &Path) -> io::Result<bool> {
    print!("{} already exists. Overwrite? [y/N] ", path.display());
    io::stdout().flush()?;

    let mut line = String::new();
    let read = io::stdin().lock().read_line(&mut line)?;
    if read == 0 {
        println!();
        return Ok(false);
    }
    let answer = line.trim();
    Ok(answer == "y" || answer == "Y")
}
