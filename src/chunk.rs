use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::fmt;
use std::io::{self, Error, ErrorKind, Read, Write};

use crate::crc::chunk_crc;

/// The eight bytes that open every PNG file:
pub const PNG_SIGNATURE: [u8; 8] =
    [0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a];

/// A four-byte PNG chunk type tag, used to identify the kind of each chunk
/// in a PNG file.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ChunkType(pub [u8; 4]);

impl ChunkType {
    /// The image header chunk tag.
    pub const IHDR: ChunkType = ChunkType(*b"IHDR");
    /// The image data chunk tag.
    pub const IDAT: ChunkType = ChunkType(*b"IDAT");
    /// The end-of-stream chunk tag.
    pub const IEND: ChunkType = ChunkType(*b"IEND");
    /// Apple's proprietary marker chunk tag.
    pub const CGBI: ChunkType = ChunkType(*b"CgBI");

    /// Compares this tag against another, ignoring ASCII case.
    pub fn eq_ignore_case(self, other: ChunkType) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl fmt::Display for ChunkType {
    fn fmt(&self, out: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        let &ChunkType(raw) = self;
        for &byte in &raw {
            write!(out, "{}", char::from(byte))?;
        }
        Ok(())
    }
}

/// One chunk of a PNG file: a length-prefixed, CRC-trailed byte record.
#[derive(Debug)]
pub struct PngChunk {
    ctype: ChunkType,
    data: Vec<u8>,
    crc: u32,
}

impl PngChunk {
    /// Creates a chunk with the given type tag and data payload, computing
    /// the CRC over the two.
    pub fn new(ctype: ChunkType, data: Vec<u8>) -> PngChunk {
        let crc = chunk_crc(ctype, &data);
        PngChunk { ctype, data, crc }
    }

    /// Returns the chunk's type tag.
    pub fn ctype(&self) -> ChunkType {
        self.ctype
    }

    /// Returns the chunk's data payload.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the CRC stored on the chunk.  For a parsed chunk this is
    /// whatever the file declared, which is not necessarily correct; see
    /// [`crc_matches`](#method.crc_matches).
    pub fn crc(&self) -> u32 {
        self.crc
    }

    /// Returns true if the stored CRC matches a CRC-32 recomputed over the
    /// chunk's type tag and payload.  Parsing does not check this; callers
    /// that want strict validation can.
    pub fn crc_matches(&self) -> bool {
        self.crc == chunk_crc(self.ctype, &self.data)
    }

    /// Decodes the width and height fields of an `IHDR` chunk.  Returns
    /// `None` if this chunk is not an `IHDR` chunk or its payload is too
    /// short to hold the two fields.
    pub fn ihdr(&self) -> Option<Ihdr> {
        if self.ctype != ChunkType::IHDR || self.data.len() < 8 {
            return None;
        }
        let mut cursor = io::Cursor::new(&self.data);
        let width = cursor.read_u32::<BigEndian>().ok()?;
        let height = cursor.read_u32::<BigEndian>().ok()?;
        Some(Ihdr { width, height })
    }

    /// Reads one chunk from a PNG chunk stream.  The declared CRC is stored
    /// as-is, without verification.
    pub fn read<R: Read>(mut reader: R) -> io::Result<PngChunk> {
        let length = reader.read_u32::<BigEndian>()?;
        let mut raw_ctype = [0u8; 4];
        reader.read_exact(&mut raw_ctype)?;
        let mut data = vec![0u8; length as usize];
        reader.read_exact(&mut data)?;
        let crc = reader.read_u32::<BigEndian>()?;
        Ok(PngChunk { ctype: ChunkType(raw_ctype), data, crc })
    }

    /// Writes the chunk to a PNG chunk stream, using the CRC stored on the
    /// chunk.
    pub fn write<W: Write>(&self, mut writer: W) -> io::Result<()> {
        let ChunkType(ref raw_ctype) = self.ctype;
        writer.write_u32::<BigEndian>(self.data.len() as u32)?;
        writer.write_all(raw_ctype)?;
        writer.write_all(&self.data)?;
        writer.write_u32::<BigEndian>(self.crc)?;
        Ok(())
    }
}

/// The decoded dimension fields of an `IHDR` chunk.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Ihdr {
    /// Image width, in pixels.
    pub width: u32,
    /// Image height, in pixels.
    pub height: u32,
}

/// Reads and validates the eight-byte PNG signature at the start of a PNG
/// stream.
pub fn read_signature<R: Read>(mut reader: R) -> io::Result<()> {
    let mut signature = [0u8; 8];
    reader.read_exact(&mut signature)?;
    if signature != PNG_SIGNATURE {
        let msg = format!("not a PNG file (bad signature: {:?})", signature);
        return Err(Error::new(ErrorKind::InvalidData, msg));
    }
    Ok(())
}

/// Writes the eight-byte PNG signature to the start of a PNG stream.
pub fn write_signature<W: Write>(mut writer: W) -> io::Result<()> {
    writer.write_all(&PNG_SIGNATURE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn read_fake_chunk() {
        let input: Cursor<&[u8]> =
            Cursor::new(b"\x00\x00\x00\x06quuxfoobar\xde\xad\xbe\xef");
        let chunk = PngChunk::read(input).expect("read failed");
        assert_eq!(ChunkType(*b"quux"), chunk.ctype());
        assert_eq!(b"foobar", chunk.data());
        assert_eq!(0xdeadbeef, chunk.crc());
        assert!(!chunk.crc_matches());
    }

    #[test]
    fn write_fake_chunk() {
        let chunk = PngChunk {
            ctype: ChunkType(*b"quux"),
            data: b"foobar".to_vec(),
            crc: 0xdeadbeef,
        };
        let mut output: Vec<u8> = vec![];
        chunk.write(&mut output).expect("write failed");
        assert_eq!(b"\x00\x00\x00\x06quuxfoobar\xde\xad\xbe\xef",
                   &output as &[u8]);
    }

    #[test]
    fn new_chunk_crc_matches() {
        let chunk = PngChunk::new(ChunkType::IEND, vec![]);
        assert!(chunk.crc_matches());
        assert_eq!(0xae426082, chunk.crc());
    }

    #[test]
    fn read_truncated_chunk() {
        // Declares a 1000-byte payload but only 10 bytes follow.
        let mut input = b"\x00\x00\x03\xe8IDAT".to_vec();
        input.extend_from_slice(&[0u8; 10]);
        let err = PngChunk::read(Cursor::new(input)).unwrap_err();
        assert_eq!(ErrorKind::UnexpectedEof, err.kind());
    }

    #[test]
    fn decode_ihdr_fields() {
        let mut data = vec![0u8; 13];
        data[0..4].copy_from_slice(&120u32.to_be_bytes());
        data[4..8].copy_from_slice(&96u32.to_be_bytes());
        let chunk = PngChunk::new(ChunkType::IHDR, data);
        let ihdr = chunk.ihdr().expect("not an IHDR chunk");
        assert_eq!(120, ihdr.width);
        assert_eq!(96, ihdr.height);
    }

    #[test]
    fn ihdr_on_other_chunk_types() {
        assert!(PngChunk::new(ChunkType::IDAT, vec![0u8; 13]).ihdr().is_none());
        assert!(PngChunk::new(ChunkType::IHDR, vec![0u8; 4]).ihdr().is_none());
    }

    #[test]
    fn chunk_type_display_and_case() {
        assert_eq!("IHDR", ChunkType::IHDR.to_string());
        assert!(ChunkType(*b"cgbi").eq_ignore_case(ChunkType::CGBI));
        assert!(!ChunkType::IDAT.eq_ignore_case(ChunkType::IEND));
    }

    #[test]
    fn signature_round_trip() {
        let mut output: Vec<u8> = vec![];
        write_signature(&mut output).expect("write failed");
        read_signature(Cursor::new(&output)).expect("read failed");
    }

    #[test]
    fn bad_signature() {
        let input: Cursor<&[u8]> = Cursor::new(&[0u8; 8]);
        let err = read_signature(input).unwrap_err();
        assert_eq!(ErrorKind::InvalidData, err.kind());
    }
}
