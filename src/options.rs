//! Limits and switches for reading and parsing EBML elements.
//!
//! Every bound the parser enforces against untrusted input lives here, so a
//! caller can tighten them for hostile sources or relax them for known-good
//! files. With the `serde` feature the options can be loaded from any serde
//! format; missing keys take their defaults.

/// Parser and reader configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ParseOptions {
    /// Largest top-level element body `read_element` will buffer.
    pub max_element_size: u64,
    /// Master elements may nest at depths `0..max_depth`.
    pub max_depth: usize,
    /// Occurrence count of one field that makes its master unparseable.
    pub max_occurrences: u64,
    /// Byte budget for a single field's array; larger counts are clamped.
    pub max_array_bytes: usize,
    /// Longest string or binary payload that is stored.
    pub max_binary_len: u64,
    /// Log expected failures (such as EOF at a top-level read) and parser
    /// limit violations at debug level.
    pub quiet: bool,
    /// Check CRC-32 children of master elements (requires the `crc32` feature).
    pub verify_checksums: bool,
}

impl ParseOptions {
    /// Creates options with the default limits.
    pub fn new() -> Self {
        Self {
            max_element_size: 100_000_000,
            max_depth: 8,
            max_occurrences: 0x7000_0000,
            max_array_bytes: 1_000_000_000,
            max_binary_len: 0x8000_0000,
            quiet: false,
            verify_checksums: false,
        }
    }

    pub fn with_max_element_size(mut self, max: u64) -> Self {
        self.max_element_size = max;
        self
    }

    pub fn with_max_depth(mut self, max: usize) -> Self {
        self.max_depth = max;
        self
    }

    pub fn with_max_occurrences(mut self, max: u64) -> Self {
        self.max_occurrences = max;
        self
    }

    pub fn with_max_array_bytes(mut self, max: usize) -> Self {
        self.max_array_bytes = max;
        self
    }

    pub fn with_max_binary_len(mut self, max: u64) -> Self {
        self.max_binary_len = max;
        self
    }

    /// Demotes expected-failure diagnostics to debug level.
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn verify_checksums(mut self, verify: bool) -> Self {
        self.verify_checksums = verify;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let opts = ParseOptions::default();
        assert_eq!(opts.max_element_size, 100_000_000);
        assert_eq!(opts.max_depth, 8);
        assert_eq!(opts.max_occurrences, 0x7000_0000);
        assert!(!opts.quiet);
    }

    #[test]
    fn builder_overrides() {
        let opts = ParseOptions::new()
            .with_max_element_size(1024)
            .with_max_depth(3)
            .quiet(true);
        assert_eq!(opts.max_element_size, 1024);
        assert_eq!(opts.max_depth, 3);
        assert!(opts.quiet);
        assert_eq!(opts.max_binary_len, ParseOptions::new().max_binary_len);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialize_partial_config() {
        let opts: ParseOptions =
            serde_json::from_str(r#"{ "max_depth": 4, "quiet": true }"#).unwrap();
        assert_eq!(opts.max_depth, 4);
        assert!(opts.quiet);
        assert_eq!(opts.max_element_size, 100_000_000);
    }
}
