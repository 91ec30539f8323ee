//! compression/registry.rs
//! Algorithm id -> codec mapping.

use std::collections::HashMap;
use std::sync::Arc;

use crate::compression::codecs::{BrotliCodec, DeflateCodec, GzipCodec, Lz4Codec, ZstdCodec};
use crate::compression::types::{AlgorithmId, Codec};
use crate::types::StreamError;

/// Pluggable table of codecs keyed by their 4-byte wire id.
///
/// Cloning is cheap: codecs are shared behind `Arc`.
#[derive(Clone)]
pub struct CodecRegistry {
    codecs: HashMap<AlgorithmId, Arc<dyn Codec>>,
}

impl CodecRegistry {
    /// Registry with the built-in codecs: `gzip`, `defl` and `br  `.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(Arc::new(GzipCodec::default()));
        registry.register(Arc::new(DeflateCodec::default()));
        registry.register(Arc::new(BrotliCodec::default()));
        registry
    }

    /// Registry without any codec: every input decodes as raw passthrough.
    pub fn empty() -> Self {
        Self { codecs: HashMap::new() }
    }

    /// Built-ins plus `zstd` and `lz4 `.
    pub fn extended() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(ZstdCodec::default()));
        registry.register(Arc::new(Lz4Codec::new()));
        registry
    }

    /// Add a codec, replacing any codec already registered under the same id.
    pub fn register(&mut self, codec: Arc<dyn Codec>) -> Option<Arc<dyn Codec>> {
        self.codecs.insert(codec.id(), codec)
    }

    /// Look up the first four bytes of a frame. Shorter slices never match.
    pub fn find(&self, probe: &[u8]) -> Option<Arc<dyn Codec>> {
        AlgorithmId::from_slice(probe).and_then(|id| self.codecs.get(&id).cloned())
    }

    /// `bytes` (at most four) is how some registered id starts.
    pub fn is_id_prefix(&self, bytes: &[u8]) -> bool {
        bytes.len() <= 4 && self.codecs.keys().any(|id| id.as_bytes().starts_with(bytes))
    }

    pub fn get(&self, id: AlgorithmId) -> Option<Arc<dyn Codec>> {
        self.codecs.get(&id).cloned()
    }

    /// Like `get`, but a missing id is a configuration error.
    pub fn resolve(&self, id: AlgorithmId) -> Result<Arc<dyn Codec>, StreamError> {
        self.get(id)
            .ok_or_else(|| StreamError::UnknownAlgorithm(id.to_string()))
    }

    pub fn contains(&self, id: AlgorithmId) -> bool {
        self.codecs.contains_key(&id)
    }

    /// Registered ids in byte order.
    pub fn ids(&self) -> Vec<AlgorithmId> {
        let mut ids: Vec<_> = self.codecs.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.codecs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codecs.is_empty()
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CodecRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodecRegistry").field("ids", &self.ids()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compression::constants::{algorithm_ids, BUILTIN_IDS};

    #[test]
    fn builtins_are_registered() {
        let registry = CodecRegistry::new();
        for id in BUILTIN_IDS {
            assert!(registry.contains(id), "missing {id}");
        }
        assert!(!registry.contains(algorithm_ids::ZSTD));
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn find_requires_exactly_four_bytes() {
        let registry = CodecRegistry::new();
        assert!(registry.find(b"gzip").is_some());
        assert!(registry.find(b"gzi").is_none());
        assert!(registry.find(b"gzip!").is_none());
        assert!(registry.find(b"br  ").is_some());
        assert!(registry.find(b"br").is_none());
    }

    #[test]
    fn id_prefixes() {
        let registry = CodecRegistry::new();
        assert!(registry.is_id_prefix(b"gz"));
        assert!(registry.is_id_prefix(b"br "));
        assert!(registry.is_id_prefix(b"defl"));
        assert!(!registry.is_id_prefix(b"zs"));
        assert!(!registry.is_id_prefix(b"gzipx"));
    }

    #[test]
    fn resolve_unknown_is_an_error() {
        let registry = CodecRegistry::new();
        let err = registry.resolve(AlgorithmId::new(*b"nope")).unwrap_err();
        assert!(matches!(err, StreamError::UnknownAlgorithm(ref s) if s == "nope"));
    }

    #[test]
    fn register_replaces_same_id() {
        let mut registry = CodecRegistry::empty();
        assert!(registry.register(Arc::new(GzipCodec::new(1))).is_none());
        assert!(registry.register(Arc::new(GzipCodec::new(9))).is_some());
        assert_eq!(registry.ids(), vec![algorithm_ids::GZIP]);
    }
}
