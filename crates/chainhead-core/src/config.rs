//! Decoding limits.

/// Default cap on any single length-prefixed field: 1 MiB.
pub const DEFAULT_MAX_VAR_BYTES: usize = 1 << 20;

/// Configuration for header decoding.
///
/// Encoding is not configurable: the canonical layout is fixed network-wide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecConfig {
    /// Largest length prefix accepted for a variable-length byte field.
    pub max_var_bytes: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_var_bytes: DEFAULT_MAX_VAR_BYTES,
        }
    }
}

impl CodecConfig {
    /// Override the var-bytes limit.
    pub fn with_max_var_bytes(mut self, max: usize) -> Self {
        self.max_var_bytes = max;
        self
    }
}
