use crc32fast::Hasher;

use crate::chunk::ChunkType;

/// Computes the CRC-32 a PNG chunk must carry: the standard IEEE polynomial
/// over the chunk's type tag followed by its data payload.
pub(crate) fn chunk_crc(ctype: ChunkType, data: &[u8]) -> u32 {
    let ChunkType(raw_ctype) = ctype;
    let mut hasher = Hasher::new();
    hasher.update(&raw_ctype);
    hasher.update(data);
    hasher.finalize()
}
