use std::io::Read;
use std::sync::Arc;

use log::{debug, trace, warn};

use crate::compression::{Codec, CodecRegistry};
use crate::constants::{ALGORITHM_ID_LEN, MAX_PREALLOC};
use crate::framing::types::FrameHeader;
use crate::types::StreamError;
use crate::utils::{append_exact_or_eof, read_exact_or_eof, PushbackReader};

/// Outcome of pulling one frame off the source.
pub enum FrameRead {
    /// Source exhausted before the first byte.
    End,
    /// Unannotated bytes, already copied to the raw buffer.
    Raw { len: usize },
    /// Well-formed compressed frame; the payload sits in the payload buffer.
    Compressed { header: FrameHeader, codec: Arc<dyn Codec> },
}

impl std::fmt::Debug for FrameRead {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FrameRead::End => f.write_str("End"),
            FrameRead::Raw { len } => f.debug_struct("Raw").field("len", len).finish(),
            FrameRead::Compressed { header, .. } => f.debug_struct("Compressed").field("header", header).finish(),
        }
    }
}

/// Pull the next frame from `source`.
///
/// - Four probe bytes are read first. No bytes at all means `End`.
/// - A probe that is not a registered algorithm id starts a raw run: the probe
///   plus up to `raw_run - 4` further bytes are copied to `raw`.
/// - A registered id whose header or payload is cut short (or carries a
///   negative size) is not an error: every byte consumed so far, plus the
///   rest of the raw run, is handed back as raw data.
/// - A header no compressing reader could have written (see
///   [`FrameHeader::is_plausible`]) is raw data too. It is rejected before
///   any payload byte is read.
/// - A raw run never swallows a possible frame start: it ends right before the
///   next registered id followed by a plausible header, or before a trailing
///   piece too short to judge. The bytes from there on are pushed back for the
///   next call.
///
/// `payload` and `raw` are cleared first and grow on demand.
pub fn read_frame<R: Read>(
    source: &mut PushbackReader<R>,
    registry: &CodecRegistry,
    raw_run: usize,
    payload: &mut Vec<u8>,
    raw: &mut Vec<u8>,
) -> Result<FrameRead, StreamError> {
    payload.clear();
    raw.clear();

    let mut head = [0u8; FrameHeader::LEN];
    let probed = read_exact_or_eof(source, &mut head[..ALGORITHM_ID_LEN])?;
    if probed == 0 {
        return Ok(FrameRead::End);
    }

    let codec = match registry.find(&head[..probed]) {
        Some(codec) => codec,
        None => return raw_passthrough(source, registry, &head[..probed], raw_run, raw),
    };

    let filled = ALGORITHM_ID_LEN + read_exact_or_eof(source, &mut head[ALGORITHM_ID_LEN..])?;
    if filled < FrameHeader::LEN {
        debug!("[FRAMING] {} header cut at {} bytes, passing through raw", codec.id(), filled);
        return raw_passthrough(source, registry, &head[..filled], raw_run, raw);
    }

    let header = match FrameHeader::parse(&head) {
        Ok(header) if header.is_plausible() => header,
        Ok(header) => {
            trace!(
                "[FRAMING] implausible {} header ({} -> {} bytes), passing through raw",
                header.algorithm,
                header.compressed_size,
                header.uncompressed_size
            );
            return raw_passthrough(source, registry, &head, raw_run, raw);
        }
        Err(e) => {
            debug!("[FRAMING] unusable {} header ({e}), passing through raw", codec.id());
            return raw_passthrough(source, registry, &head, raw_run, raw);
        }
    };

    let want = header.compressed_size as usize;
    payload.reserve(want.min(MAX_PREALLOC));
    let got = append_exact_or_eof(source, payload, want)?;
    if got < want {
        // Source ended inside the payload: everything read is raw data.
        debug!("[FRAMING] {} payload cut at {}/{} bytes, passing through raw", codec.id(), got, want);
        raw.extend_from_slice(&head);
        raw.append(payload);
        cut_before_frame(source, registry, raw);
        return Ok(FrameRead::Raw { len: raw.len() });
    }

    Ok(FrameRead::Compressed { header, codec })
}

fn raw_passthrough<R: Read>(
    source: &mut PushbackReader<R>,
    registry: &CodecRegistry,
    prefix: &[u8],
    raw_run: usize,
    raw: &mut Vec<u8>,
) -> Result<FrameRead, StreamError> {
    raw.extend_from_slice(prefix);
    let extra = raw_run.saturating_sub(prefix.len());
    raw.reserve(extra.min(MAX_PREALLOC));
    append_exact_or_eof(source, raw, extra)?;
    cut_before_frame(source, registry, raw);
    Ok(FrameRead::Raw { len: raw.len() })
}

/// End a raw run before the first possible frame start after its first byte.
fn cut_before_frame<R>(source: &mut PushbackReader<R>, registry: &CodecRegistry, raw: &mut Vec<u8>) {
    if let Some(at) = next_frame_start(registry, raw) {
        source.unread(&raw[at..]);
        raw.truncate(at);
        trace!("[FRAMING] raw run cut at {at}, {} bytes pending", source.pending());
    }
}

fn next_frame_start(registry: &CodecRegistry, data: &[u8]) -> Option<usize> {
    (1..data.len()).find(|&at| {
        let tail = &data[at..];
        if tail.len() < ALGORITHM_ID_LEN {
            return registry.is_id_prefix(tail);
        }
        if registry.find(&tail[..ALGORITHM_ID_LEN]).is_none() {
            return false;
        }
        match tail.get(..FrameHeader::LEN) {
            Some(head) => FrameHeader::parse(head).map_or(false, |h| h.is_plausible()),
            // The header runs past the end of the run; the next call decides.
            None => true,
        }
    })
}

/// Run the decode transform of `codec` over `payload` into `out`.
///
/// The output must be exactly `header.uncompressed_size` bytes; anything else,
/// including a transform failure, is a fatal `CorruptFrame`.
pub fn decode_payload(
    codec: &dyn Codec,
    header: &FrameHeader,
    payload: &[u8],
    out: &mut Vec<u8>,
) -> Result<(), StreamError> {
    let expected = header.uncompressed_size as usize;
    out.clear();
    out.reserve(expected.min(MAX_PREALLOC));

    match codec.decompress_chunk(payload, expected, out) {
        Err(e) => {
            warn!("[FRAMING] {} frame failed to decode: {e}", header.algorithm);
            Err(StreamError::CorruptFrame {
                algorithm: header.algorithm.to_string(),
                expected,
                actual: out.len(),
                detail: Some(e.to_string()),
            })
        }
        Ok(()) if out.len() != expected => {
            warn!("[FRAMING] {} frame decoded to {} bytes, header says {}", header.algorithm, out.len(), expected);
            Err(StreamError::CorruptFrame {
                algorithm: header.algorithm.to_string(),
                expected,
                actual: out.len(),
                detail: None,
            })
        }
        Ok(()) => Ok(()),
    }
}
