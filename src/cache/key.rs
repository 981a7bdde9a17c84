//! Key Encoder Module
//!
//! Maps (namespace, raw key) pairs onto the `"<namespace>:<raw_key>"` keys
//! actually stored by a backend, and builds the server-side glob patterns
//! used for prefix deletion and namespace flushes.

/// Separator between namespace and raw key.
pub const NAMESPACE_SEPARATOR: char = ':';

// == Namespace ==
/// Opaque key prefix bound to a driver instance at construction time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace {
    name: String,
    /// Cached `"<name>:"`
    prefix: String,
}

impl Namespace {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let prefix = format!("{}{}", name, NAMESPACE_SEPARATOR);
        Self { name, prefix }
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }

    // == Encode ==
    /// Returns the encoded key for `raw_key`.
    pub fn encode(&self, raw_key: &str) -> String {
        let mut encoded = String::with_capacity(self.prefix.len() + raw_key.len());
        encoded.push_str(&self.prefix);
        encoded.push_str(raw_key);
        encoded
    }

    /// Encodes every key of `raw_keys`, preserving order.
    pub fn encode_all(&self, raw_keys: &[String]) -> Vec<String> {
        raw_keys.iter().map(|key| self.encode(key)).collect()
    }

    // == Decode ==
    /// Strips the namespace from an encoded key.
    ///
    /// Returns None when the key belongs to another namespace.
    pub fn decode<'a>(&self, encoded: &'a str) -> Option<&'a str> {
        encoded.strip_prefix(self.prefix.as_str())
    }

    /// True when `encoded` lives in this namespace.
    pub fn owns(&self, encoded: &str) -> bool {
        encoded.starts_with(self.prefix.as_str())
    }

    /// True when `encoded` lives in this namespace and its raw key starts with `prefix`.
    pub fn owns_with_prefix(&self, encoded: &str, prefix: &str) -> bool {
        self.decode(encoded)
            .is_some_and(|raw_key| raw_key.starts_with(prefix))
    }

    // == Patterns ==
    /// Glob matching every raw key starting with `prefix`: `"<ns>:<prefix>*"`.
    pub fn prefix_pattern(&self, prefix: &str) -> String {
        let mut pattern = escape_glob(&self.prefix);
        pattern.push_str(&escape_glob(prefix));
        pattern.push('*');
        pattern
    }

    /// Glob matching the whole namespace: `"<ns>:*"`.
    pub fn flush_pattern(&self) -> String {
        self.prefix_pattern("")
    }
}

impl std::fmt::Display for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Backslash-escapes the characters Redis treats specially in MATCH patterns.
pub fn escape_glob(literal: &str) -> String {
    let mut escaped = String::with_capacity(literal.len());
    for c in literal.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
