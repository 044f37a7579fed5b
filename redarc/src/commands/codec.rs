//! Huffman codec command implementations

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::utils::confirm_overwrite;

pub fn compress(input: &Path, output: &Path) -> Result<()> {
    if output.exists() && !confirm_overwrite(output)? {
        println!("Skipped {}", output.display());
        return Ok(());
    }

    let data = fs::read(input).with_context(|| format!("failed to read {}", input.display()))?;
    let packed = redarc_huffman::compress(&data);
    fs::write(output, &packed)
        .with_context(|| format!("failed to write {}", output.display()))?;

    println!(
        "Compressed {} ({} bytes) to {} ({} bytes)",
        input.display(),
        data.len(),
        output.display(),
        packed.len()
    );
    Ok(())
}

pub fn decompress(input: &Path, output: &Path) -> Result<()> {
    if output.exists() && !confirm_overwrite(output)? {
        println!("Skipped {}", output.display());
        return Ok(());
    }

    let data = fs::read(input).with_context(|| format!("failed to read {}", input.display()))?;
    let restored = redarc_huffman::decompress(&data)
        .with_context(|| format!("failed to decompress {}", input.display()))?;
    fs::write(output, &restored)
        .with_context(|| format!("failed to write {}", output.display()))?;

    println!(
        "Decompressed {} ({} bytes) to {} ({} bytes)",
        input.display(),
        data.len(),
        output.display(),
        restored.len()
    );
    Ok(())
}
