// Codec behaviour and registry pluggability.

#[cfg(test)]
mod tests {
    use std::io::Read;
    use std::sync::Arc;

    use chunkstream_core::compression::codecs::{BrotliCodec, DeflateCodec, GzipCodec, Lz4Codec, ZstdCodec};
    use chunkstream_core::compression::{algorithm_ids, AlgorithmId, Codec, CodecRegistry, CompressionError};
    use chunkstream_core::stream::{CompressReader, DecompressConfig, DecompressReader, StreamConfig};

    fn all_codecs() -> Vec<Arc<dyn Codec>> {
        vec![
            Arc::new(GzipCodec::default()),
            Arc::new(DeflateCodec::default()),
            Arc::new(BrotliCodec::default()),
            Arc::new(ZstdCodec::default()),
            Arc::new(Lz4Codec::new()),
        ]
    }

    fn sample() -> Vec<u8> {
        b"chunk data with some repetition, chunk data with some repetition. ".repeat(64)
    }

    // ------------------------------------------------------------
    // Codecs
    // ------------------------------------------------------------
    #[test]
    fn every_codec_roundtrips_one_chunk() {
        let input = sample();
        for codec in all_codecs() {
            let mut packed = Vec::new();
            codec.compress_chunk(&input, &mut packed).unwrap();
            assert!(packed.len() < input.len(), "{}", codec.name());

            let mut out = Vec::new();
            codec.decompress_chunk(&packed, input.len(), &mut out).unwrap();
            assert!(out == input, "{}", codec.name());
        }
    }

    #[test]
    fn decompression_stops_one_byte_past_the_limit() {
        let input = sample();
        for codec in all_codecs() {
            let mut packed = Vec::new();
            codec.compress_chunk(&input, &mut packed).unwrap();

            let mut out = Vec::new();
            let result = codec.decompress_chunk(&packed, 100, &mut out);
            // Either the codec noticed the overrun itself or it stopped at limit + 1.
            assert!(result.is_err() || out.len() == 101, "{}: {}", codec.name(), out.len());
        }
    }

    #[test]
    fn compress_appends_to_the_output() {
        let codec = GzipCodec::default();
        let mut out = b"prefix".to_vec();
        codec.compress_chunk(b"abc", &mut out).unwrap();
        assert_eq!(&out[..6], b"prefix");
        assert!(out.len() > 6);
    }

    #[test]
    fn ids_are_four_bytes_and_distinct() {
        let mut ids: Vec<AlgorithmId> = all_codecs().iter().map(|c| c.id()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 5);
        assert_eq!(algorithm_ids::BROTLI.to_string(), "br  ");
    }

    // ------------------------------------------------------------
    // Pluggable registry
    // ------------------------------------------------------------
    /// Raw deflate under a private id.
    struct Private(DeflateCodec);

    impl Codec for Private {
        fn id(&self) -> AlgorithmId {
            AlgorithmId::new(*b"priv")
        }

        fn name(&self) -> &'static str {
            "private"
        }

        fn compress_chunk(&self, input: &[u8], out: &mut Vec<u8>) -> Result<(), CompressionError> {
            self.0.compress_chunk(input, out)
        }

        fn decompress_chunk(&self, input: &[u8], limit: usize, out: &mut Vec<u8>) -> Result<(), CompressionError> {
            self.0.decompress_chunk(input, limit, out)
        }
    }

    #[test]
    fn custom_codec_drives_both_readers() {
        let mut registry = CodecRegistry::empty();
        registry.register(Arc::new(Private(DeflateCodec::default())));

        let data = sample().repeat(40);
        let config = StreamConfig::parse_algorithm("priv").unwrap().with_chunk_size(8 * 1024);
        let mut reader = CompressReader::with_registry(&data[..], config, &registry).unwrap();
        let mut wire = Vec::new();
        reader.read_to_end(&mut wire).unwrap();
        assert_eq!(&wire[..4], b"priv");

        let mut reader = DecompressReader::with_registry(&wire[..], DecompressConfig::default(), &registry).unwrap();
        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();
        assert!(out == data);

        // Without the codec the frames are just bytes.
        let mut reader = DecompressReader::new(&wire[..], DecompressConfig::default()).unwrap();
        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();
        assert!(out == wire);
    }
}
