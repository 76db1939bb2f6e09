use serde::{Deserialize, Serialize};

/// The maximum length of a line, including its CRLF terminator,
/// per RFC 5322 section 2.1.1.
pub const DEFAULT_LINE_LENGTH_LIMIT: usize = 1000;

/// Limits applied while parsing a message
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct ParserConfig {
    /// Maximum octets permitted for a single header line, counting
    /// the trailing CRLF. 0 disables the check. Values of 1 and 2
    /// both admit only the empty line that ends the header section.
    pub line_length_limit: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            line_length_limit: DEFAULT_LINE_LENGTH_LIMIT,
        }
    }
}

impl ParserConfig {
    pub fn with_line_length_limit(line_length_limit: usize) -> Self {
        Self { line_length_limit }
    }

    /// Returns true if a line with `content_len` octets before its
    /// CRLF is within the limit. The CRLF itself always fits.
    pub fn line_fits(&self, content_len: usize) -> bool {
        self.line_length_limit == 0 || content_len + 2 <= self.line_length_limit.max(2)
    }
}
