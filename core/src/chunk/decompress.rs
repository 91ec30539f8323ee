use std::io::Read;
use std::sync::Arc;

use crate::chunk::types::ChunkDecompress;
use crate::compression::{Codec, CodecRegistry};
use crate::framing::{decode_payload, read_frame, FrameHeader, FrameRead};
use crate::types::StreamError;
use crate::utils::PushbackReader;

/// Result of the synchronous half of a decompression cycle.
#[derive(Debug)]
pub enum Loaded {
    /// Nothing left to do off-thread: raw bytes are in place, or the source ended.
    Ready,
    /// Payload is buffered and still has to go through the codec.
    Decode { header: FrameHeader, codec: Arc<dyn Codec> },
}

impl ChunkDecompress {
    /// Pull the next frame from `source` into this slot.
    pub fn load<R: Read>(
        &mut self,
        source: &mut PushbackReader<R>,
        registry: &CodecRegistry,
        raw_run: usize,
    ) -> Result<Loaded, StreamError> {
        self.reset();
        match read_frame(source, registry, raw_run, &mut self.payload, &mut self.out)? {
            FrameRead::End => {
                self.end = true;
                Ok(Loaded::Ready)
            }
            FrameRead::Raw { len } => {
                self.consumed = len;
                Ok(Loaded::Ready)
            }
            FrameRead::Compressed { header, codec } => {
                self.algorithm = Some(header.algorithm);
                self.consumed = header.frame_len();
                Ok(Loaded::Decode { header, codec })
            }
        }
    }

    /// Asynchronous half: decode the buffered payload.
    pub fn decode(&mut self, header: &FrameHeader, codec: &dyn Codec) -> Result<(), StreamError> {
        decode_payload(codec, header, &self.payload, &mut self.out)?;
        self.payload.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compression::algorithm_ids;
    use crate::framing::encode_frame;
    use std::io::Cursor;

    #[test]
    fn raw_then_compressed_then_end() {
        let registry = CodecRegistry::new();
        let codec = registry.get(algorithm_ids::BROTLI).unwrap();
        let text = b"the quick brown fox ".repeat(20);
        let mut packed = Vec::new();
        codec.compress_chunk(&text, &mut packed).unwrap();
        let header = FrameHeader::new(algorithm_ids::BROTLI, text.len(), packed.len()).unwrap();

        let mut wire = b"plain".to_vec();
        let raw_len = wire.len();
        wire.extend_from_slice(&encode_frame(&header, &packed).unwrap());
        let mut src = PushbackReader::new(Cursor::new(wire));

        let mut slot = ChunkDecompress::new();
        assert!(matches!(slot.load(&mut src, &registry, raw_len).unwrap(), Loaded::Ready));
        assert_eq!(slot.algorithm(), None);
        let mut buf = [0u8; 64];
        assert_eq!(slot.drain(&mut buf), 5);
        assert!(slot.is_drained());

        let (h, c) = match slot.load(&mut src, &registry, 64).unwrap() {
            Loaded::Decode { header, codec } => (header, codec),
            other => panic!("expected decode, got {other:?}"),
        };
        slot.decode(&h, c.as_ref()).unwrap();
        assert_eq!(slot.algorithm(), Some(algorithm_ids::BROTLI));
        assert_eq!(slot.len(), text.len());

        assert!(matches!(slot.load(&mut src, &registry, 64).unwrap(), Loaded::Ready));
        assert!(slot.is_end());
        assert!(!slot.is_drained());
        assert_eq!(slot.drain(&mut buf), 0);
    }
}
