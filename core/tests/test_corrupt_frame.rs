// A frame whose payload does not decode to its declared size is fatal:
// the error surfaces once, and the stream is poisoned afterwards.

#[cfg(test)]
mod tests {
    use std::io::{ErrorKind, Read};

    use chunkstream_core::compression::{algorithm_ids, CodecRegistry};
    use chunkstream_core::framing::{encode_frame, FrameHeader};
    use chunkstream_core::stream::{DecompressConfig, DecompressReader, Execution};
    use chunkstream_core::types::StreamError;

    fn lying_frame(declared: usize) -> Vec<u8> {
        let registry = CodecRegistry::new();
        let codec = registry.get(algorithm_ids::GZIP).unwrap();
        let original = b"0123456789".repeat(50);
        let mut packed = Vec::new();
        codec.compress_chunk(&original, &mut packed).unwrap();

        let header = FrameHeader::new(algorithm_ids::GZIP, declared, packed.len()).unwrap();
        encode_frame(&header, &packed).unwrap()
    }

    #[test]
    fn short_declared_size_is_corrupt_then_poisoned() {
        for execution in [Execution::Inline, Execution::Pooled] {
            let wire = lying_frame(100);
            let config = DecompressConfig::default().with_execution(execution);
            let mut reader = DecompressReader::new(&wire[..], config).unwrap();
            let mut buf = [0u8; 256];

            let err = reader.read_into(&mut buf, 0, 256).unwrap_err();
            assert!(
                matches!(err, StreamError::CorruptFrame { expected: 100, actual: 101, .. }),
                "{err}"
            );
            assert!(matches!(reader.read_into(&mut buf, 0, 256), Err(StreamError::Poisoned)));
        }
    }

    #[test]
    fn long_declared_size_is_corrupt() {
        let wire = lying_frame(900);
        let mut reader = DecompressReader::new(&wire[..], DecompressConfig::default()).unwrap();
        let mut buf = [0u8; 64];
        let err = reader.read_into(&mut buf, 0, 64).unwrap_err();
        assert!(matches!(err, StreamError::CorruptFrame { expected: 900, actual: 500, .. }));
    }

    #[test]
    fn garbage_payload_is_corrupt() {
        let header = FrameHeader::new(algorithm_ids::DEFLATE, 64, 8).unwrap();
        let wire = encode_frame(&header, &[0xff; 8]).unwrap();
        let mut reader = DecompressReader::new(&wire[..], DecompressConfig::default()).unwrap();
        let mut buf = [0u8; 64];
        assert!(matches!(
            reader.read_into(&mut buf, 0, 64),
            Err(StreamError::CorruptFrame { .. })
        ));
    }

    #[test]
    fn corruption_after_good_data_keeps_the_good_prefix() {
        let mut wire = b"hello ".to_vec();
        wire.extend_from_slice(&lying_frame(100));
        let config = DecompressConfig::default().with_pipeline_depth(2);
        let mut reader = DecompressReader::new(&wire[..], config).unwrap();

        let mut buf = [0u8; 64];
        assert_eq!(reader.read_into(&mut buf, 0, 64).unwrap(), 6);
        assert_eq!(&buf[..6], b"hello ");
        assert!(matches!(reader.read_into(&mut buf, 0, 64), Err(StreamError::CorruptFrame { .. })));
        assert!(matches!(reader.read_into(&mut buf, 0, 64), Err(StreamError::Poisoned)));
    }

    #[test]
    fn io_read_reports_invalid_data() {
        let wire = lying_frame(100);
        let mut reader = DecompressReader::new(&wire[..], DecompressConfig::default()).unwrap();
        let mut out = Vec::new();
        let err = reader.read_to_end(&mut out).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }
}
