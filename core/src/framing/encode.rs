use crate::framing::types::{FrameError, FrameHeader};

/// Copy the virtual frame `header ++ payload`, starting `cursor` bytes in,
/// into `out`. Returns the number of bytes copied.
///
/// Lets a frame leave the stream across any number of partial reads, including
/// reads smaller than the header itself.
pub fn copy_frame(header: &[u8; FrameHeader::LEN], payload: &[u8], cursor: usize, out: &mut [u8]) -> usize {
    let mut written = 0;
    let mut pos = cursor;

    if pos < FrameHeader::LEN {
        let n = (FrameHeader::LEN - pos).min(out.len());
        out[..n].copy_from_slice(&header[pos..pos + n]);
        written += n;
        pos += n;
    }

    if pos >= FrameHeader::LEN && written < out.len() {
        let start = pos - FrameHeader::LEN;
        if start < payload.len() {
            let n = (payload.len() - start).min(out.len() - written);
            out[written..written + n].copy_from_slice(&payload[start..start + n]);
            written += n;
        }
    }

    written
}

/// Encode a complete compressed frame into a fresh buffer.
///
/// Layout:
///
/// ```text
/// [ algorithm id (4) ]
/// [ uncompressed_size (4) ]
/// [ compressed_size (4) ]
/// [ payload (M) ]
/// ```
pub fn encode_frame(header: &FrameHeader, payload: &[u8]) -> Result<Vec<u8>, FrameError> {
    if payload.len() != header.compressed_size as usize {
        return Err(FrameError::LengthMismatch {
            expected: header.compressed_size as usize,
            actual: payload.len(),
        });
    }

    let mut out = Vec::with_capacity(header.frame_len());
    out.extend_from_slice(&header.encode());
    out.extend_from_slice(payload);
    Ok(out)
}
