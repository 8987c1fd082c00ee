use std::io::{self, Error, ErrorKind, Read, Write};

use crate::chunk::{self, ChunkType, Ihdr, PngChunk};
use crate::zstream;

/// Extra room given to the recompression buffer beyond the uncompressed
/// pixel size, in bytes:
const DEFLATE_SLACK: usize = 1024;

/// Converts a PNG byte stream read from `source` into a standard PNG byte
/// stream written to `target`.
///
/// If the source is an iOS-optimized PNG (marked by Apple's `CgBI` chunk),
/// the marker is dropped, the raw-deflate image data is re-encoded as a
/// zlib stream with red and blue channels swapped back, and all `IDAT`
/// pieces are collapsed into one.  Any other PNG passes through with its
/// chunk sequence unchanged.
///
/// Both handles are taken by value and dropped on every exit path.  To
/// keep a handle open afterwards, pass a mutable reference instead (e.g.
/// `convert(&mut reader, &mut writer)`).  On failure the target may have
/// received a partial stream and should be discarded.
pub fn convert<R: Read, W: Write>(mut source: R, mut target: W) -> io::Result<()> {
    let mut chunks: Vec<PngChunk> = Vec::new();
    let mut with_cgbi = false;
    let mut ihdr: Option<Ihdr> = None;

    chunk::read_signature(source.by_ref())?;
    loop {
        let chunk = PngChunk::read(source.by_ref())?;
        if chunk.ctype().eq_ignore_case(ChunkType::CGBI) {
            // The marker's presence alone selects the conversion path; the
            // chunk itself never survives to the output.
            with_cgbi = true;
            continue;
        }
        if ihdr.is_none() {
            ihdr = chunk.ihdr();
        }
        let at_end = chunk.ctype().eq_ignore_case(ChunkType::IEND);
        chunks.push(chunk);
        if at_end {
            break;
        }
    }

    chunk::write_signature(target.by_ref())?;
    if with_cgbi {
        let replacement = convert_data(&chunks, ihdr)?;
        let mut data_written = false;
        for chunk in &chunks {
            if chunk.ctype() == ChunkType::IDAT {
                // The first IDAT's position anchors the single replacement
                // chunk; later pieces are dropped.
                if !data_written {
                    replacement.write(target.by_ref())?;
                    data_written = true;
                }
            } else {
                chunk.write(target.by_ref())?;
            }
        }
    } else {
        for chunk in &chunks {
            chunk.write(target.by_ref())?;
        }
    }
    Ok(())
}

/// Converts a PNG byte stream read from `source`, returning the standard
/// PNG as a byte vector.  See [`convert`].
pub fn convert_to_vec<R: Read>(source: R) -> io::Result<Vec<u8>> {
    let mut output: Vec<u8> = vec![];
    convert(source, &mut output)?;
    Ok(output)
}

/// Builds the replacement `IDAT` chunk for a CgBI image: inflates the
/// concatenated payloads of every `IDAT` piece, swaps each pixel's red and
/// blue bytes in place, and recompresses the result as a zlib stream.
fn convert_data(chunks: &[PngChunk], ihdr: Option<Ihdr>) -> io::Result<PngChunk> {
    let ihdr = ihdr.ok_or_else(|| {
        Error::new(ErrorKind::InvalidData, "CgBI image has no IHDR chunk")
    })?;
    let first_data = chunks
        .iter()
        .find(|chunk| chunk.ctype() == ChunkType::IDAT)
        .ok_or_else(|| {
            Error::new(ErrorKind::InvalidData, "CgBI image has no IDAT chunk")
        })?;

    // One filter-type byte plus `width` four-byte RGBA pixels per scanline.
    let max_inflated = 4 * (ihdr.width as usize + 1) * ihdr.height as usize;
    let mut pixels = vec![0u8; max_inflated];
    let pieces = chunks
        .iter()
        .filter(|chunk| chunk.ctype() == ChunkType::IDAT)
        .map(|chunk| chunk.data());
    let inflated_len = zstream::inflate_raw(pieces, &mut pixels)?;

    // Undo Apple's BGRA ordering: swap red and blue within each pixel,
    // skipping the filter-type byte that leads every scanline.  Green and
    // alpha stay put, and premultiplied alpha is left as-is.
    let mut index = 0;
    for _y in 0..ihdr.height {
        index += 1;
        for _x in 0..ihdr.width {
            pixels.swap(index, index + 2);
            index += 4;
        }
    }

    let mut compressed = vec![0u8; max_inflated + DEFLATE_SLACK];
    let compressed_len =
        zstream::deflate_zlib(&pixels[..inflated_len], &mut compressed)?;
    compressed.truncate(compressed_len);
    Ok(PngChunk::new(first_data.ctype(), compressed))
}
