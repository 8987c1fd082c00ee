//! Library for converting iOS-optimized (CgBI) PNG images into standard
//! PNG files.
//!
//! Xcode's asset pipeline rewrites the PNGs it packages: a proprietary
//! `CgBI` chunk is inserted ahead of the header, the image data loses its
//! zlib framing (leaving a raw deflate stream), and pixels are stored as
//! premultiplied BGRA rather than RGBA.  Ordinary PNG decoders reject such
//! files.  This crate rewrites the chunk stream back into a
//! standards-compliant PNG that any decoder can read, leaving every chunk
//! it does not need to touch byte-for-byte intact.
//!
//! # Example
//!
//! ```no_run
//! use std::fs::File;
//! use std::io::BufReader;
//!
//! let source = BufReader::new(File::open("AppIcon60x60@2x.png")?);
//! let target = File::create("AppIcon60x60@2x-standard.png")?;
//! ipng::convert(source, target)?;
//! # Ok::<(), std::io::Error>(())
//! ```
//!
//! Byte slices work as sources too, since `&[u8]` implements `Read`:
//! `ipng::convert_to_vec(&bytes[..])` converts in memory.

#![warn(missing_docs)]

mod chunk;
mod converter;
mod crc;
mod zstream;

pub use self::chunk::{ChunkType, Ihdr, PngChunk, PNG_SIGNATURE};
pub use self::converter::{convert, convert_to_vec};
