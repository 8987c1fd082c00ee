use flate2::{Compress, Compression, Decompress, FlushCompress, FlushDecompress, Status};
use std::io::{self, Error, ErrorKind};

/// Inflates a raw deflate bitstream (RFC 1951, no zlib framing — the
/// encoding Apple uses for `IDAT` payloads) into `out`, feeding each piece
/// of the input in order.  Returns the number of bytes produced, which may
/// be less than `out.len()`.
pub(crate) fn inflate_raw<'a, I>(pieces: I, out: &mut [u8]) -> io::Result<usize>
where
    I: IntoIterator<Item = &'a [u8]>,
{
    let mut inflater = Decompress::new(false);
    for mut piece in pieces {
        while !piece.is_empty() {
            let consumed_before = inflater.total_in();
            let produced = inflater.total_out() as usize;
            let status = inflater
                .decompress(piece, &mut out[produced..], FlushDecompress::None)
                .map_err(|err| Error::new(ErrorKind::InvalidData, err))?;
            piece = &piece[(inflater.total_in() - consumed_before) as usize..];
            match status {
                Status::StreamEnd => return Ok(inflater.total_out() as usize),
                Status::Ok => {}
                Status::BufError => {
                    let msg = "inflate output buffer too small";
                    return Err(Error::new(ErrorKind::WriteZero, msg));
                }
            }
        }
    }
    let produced = inflater.total_out() as usize;
    let status = inflater
        .decompress(&[], &mut out[produced..], FlushDecompress::Finish)
        .map_err(|err| Error::new(ErrorKind::InvalidData, err))?;
    match status {
        // A stream that stops short of its final block still counts, as
        // long as every byte it did carry inflated cleanly.
        Status::StreamEnd | Status::Ok => Ok(inflater.total_out() as usize),
        Status::BufError => {
            let msg = "deflate stream ended prematurely";
            Err(Error::new(ErrorKind::UnexpectedEof, msg))
        }
    }
}

/// Deflates `src` into `out` as a zlib-framed stream (RFC 1950, standard
/// PNG `IDAT` framing) at the best compression level.  Returns the number
/// of compressed bytes produced.  `out` must carry enough slack for the
/// whole stream; running out of room is fatal, not retried.
pub(crate) fn deflate_zlib(mut src: &[u8], out: &mut [u8]) -> io::Result<usize> {
    let mut deflater = Compress::new(Compression::best(), true);
    loop {
        let produced = deflater.total_out() as usize;
        if produced == out.len() {
            let msg = "deflate output buffer too small";
            return Err(Error::new(ErrorKind::WriteZero, msg));
        }
        let consumed_before = deflater.total_in();
        let status = deflater
            .compress(src, &mut out[produced..], FlushCompress::Finish)
            .map_err(|err| Error::new(ErrorKind::InvalidData, err))?;
        src = &src[(deflater.total_in() - consumed_before) as usize..];
        match status {
            Status::StreamEnd => return Ok(deflater.total_out() as usize),
            Status::Ok => {}
            Status::BufError => {
                let msg = "deflate output buffer too small";
                return Err(Error::new(ErrorKind::WriteZero, msg));
            }
        }
    }
}
