//! # redarc_huffman - Self-describing Huffman codec
//!
//! Compresses arbitrary byte streams into a self-contained format that
//! needs no side channel to decode:
//!
//! ```text
//! tree prefix   preorder tree encoding (see `tree` module docs)
//! length        u64 LE, number of bytes in the original input
//! body          per-byte codes packed MSB-first, final byte zero-padded
//! ```
//!
//! The stored length makes trailing padding bits inert and lets the
//! decoder detect a truncated body; a single-symbol input is coded at one
//! bit per byte.
//!
//! ## Examples
//!
//! ```
//! let packed = redarc_huffman::compress(b"abracadabra");
//! let restored = redarc_huffman::decompress(&packed)?;
//! assert_eq!(restored, b"abracadabra");
//! # Ok::<(), redarc_huffman::Error>(())
//! ```

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

mod bitio;
mod tree;

use bitio::{BitReader, BitWriter};
use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Cursor, Read, Write};
use tree::Node;

/// Result type alias for codec operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while decoding a compressed stream
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream ended inside the tree prefix
    #[error("truncated tree prefix")]
    TruncatedTree,

    /// The stream ended inside the length field
    #[error("truncated stream header")]
    TruncatedHeader,

    /// The tree prefix is structurally invalid
    #[error("malformed tree prefix: {0}")]
    InvalidTree(String),

    /// The bit-packed body ended before every symbol was decoded
    #[error("compressed body ends after {decoded} of {expected} symbols")]
    TruncatedBody {
        /// Symbols promised by the length field
        expected: u64,
        /// Symbols actually decoded
        decoded: u64,
    },
}

/// Compress a byte buffer
pub fn compress(input: &[u8]) -> Vec<u8> {
    let mut freqs = [0u64; 256];
    for &byte in input {
        freqs[byte as usize] += 1;
    }
    let root = tree::build_tree(&freqs);

    let mut out = Vec::new();
    tree::write_tree(root.as_ref(), &mut out);
    out.extend_from_slice(&(input.len() as u64).to_le_bytes());

    if let Some(root) = root {
        let codes = tree::build_codes(&root);
        let mut bits = BitWriter::new();
        for &byte in input {
            bits.write_bits(&codes[byte as usize]);
        }
        out.extend_from_slice(&bits.finish());
    }

    log::debug!(
        "compressed {} bytes to {} ({} distinct symbols)",
        input.len(),
        out.len(),
        freqs.iter().filter(|&&f| f > 0).count()
    );
    out
}

/// Decompress a byte buffer produced by [`compress`]
pub fn decompress(input: &[u8]) -> Result<Vec<u8>> {
    let mut cursor = Cursor::new(input);
    let root = tree::read_tree(&mut cursor)?;
    let expected = cursor.read_u64::<LittleEndian>().map_err(|e| {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            Error::TruncatedHeader
        } else {
            Error::Io(e)
        }
    })?;
    let body = &input[cursor.position() as usize..];

    let root = match root {
        Some(root) => root,
        None => {
            return if expected == 0 {
                Ok(Vec::new())
            } else {
                Err(Error::TruncatedBody {
                    expected,
                    decoded: 0,
                })
            };
        }
    };

    let mut out = Vec::with_capacity(expected.min(1 << 20) as usize);
    let mut bits = BitReader::new(body);
    while (out.len() as u64) < expected {
        let symbol = match &root {
            // One bit per symbol when the alphabet has a single byte
            Node::Leaf(symbol) => {
                if bits.read_bit().is_none() {
                    return Err(truncated(expected, out.len()));
                }
                *symbol
            }
            Node::Internal(..) => {
                let mut node = &root;
                loop {
                    match node {
                        Node::Leaf(symbol) => break *symbol,
                        Node::Internal(left, right) => {
                            let Some(bit) = bits.read_bit() else {
                                return Err(truncated(expected, out.len()));
                            };
                            node = if bit == 0 { &**left } else { &**right };
                        }
                    }
                }
            }
        };
        out.push(symbol);
    }

    // Bits left in the final byte are padding and are ignored
    Ok(out)
}

fn truncated(expected: u64, decoded: usize) -> Error {
    Error::TruncatedBody {
        expected,
        decoded: decoded as u64,
    }
}

/// Compress everything from `reader` into `writer`.
///
/// The input is buffered in full: code assignment needs complete symbol
/// frequencies before the first output bit. Returns the number of
/// compressed bytes written.
pub fn compress_stream<R: Read, W: Write>(reader: &mut R, writer: &mut W) -> Result<u64> {
    let mut input = Vec::new();
    reader.read_to_end(&mut input)?;
    let packed = compress(&input);
    writer.write_all(&packed)?;
    Ok(packed.len() as u64)
}

/// Decompress everything from `reader` into `writer`, returning the number
/// of decoded bytes.
pub fn decompress_stream<R: Read, W: Write>(reader: &mut R, writer: &mut W) -> Result<u64> {
    let mut input = Vec::new();
    reader.read_to_end(&mut input)?;
    let restored = decompress(&input)?;
    writer.write_all(&restored)?;
    Ok(restored.len() as u64)
}
