use crate::{MessageParseError, Result};
use bstr::{BStr, BString, ByteSlice};

/// The delimiter written between name and value for headers that
/// are constructed rather than parsed
pub const CANONICAL_SEPARATOR: &str = ": ";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Header {
    /// The name portion of the header
    name: String,
    /// The value portion of the header, verbatim up to the CRLF
    value: BString,
    /// The separator between the name and the value; either ":"
    /// or ": ", as found in the source text
    separator: &'static str,
}

/// Returns true if `name` is non-empty and consists solely of printable,
/// non-whitespace US-ASCII characters other than ':'
pub fn is_valid_header_name(name: &[u8]) -> bool {
    !name.is_empty() && name.iter().all(|&c| (33..=126).contains(&c) && c != b':')
}

fn debug_assert_valid_value(value: &[u8]) {
    debug_assert!(
        memchr::memchr2(b'\r', b'\n', value).is_none(),
        "header value {:?} must not contain CR or LF",
        value.as_bstr()
    );
}

impl Header {
    /// Build a header with the canonical ": " separator.
    /// The name must satisfy [is_valid_header_name] and the value
    /// must not contain CR or LF, otherwise the generated text will
    /// not parse back; this is checked in debug builds only.
    pub fn with_name_value<N: Into<String>, V: Into<BString>>(name: N, value: V) -> Self {
        let name = name.into();
        let value = value.into();
        debug_assert!(
            is_valid_header_name(name.as_bytes()),
            "invalid header name {name:?}"
        );
        debug_assert_valid_value(&value);
        Self {
            name,
            value,
            separator: CANONICAL_SEPARATOR,
        }
    }

    /// Parse a single header line. `line` must not include the
    /// trailing CRLF. `line_number` is 1-based and is used only
    /// for error reporting.
    pub fn parse(line: &[u8], line_number: usize) -> Result<Self> {
        let colon = memchr::memchr(b':', line).ok_or_else(|| {
            tracing::trace!("line {line_number}: missing colon in {:?}", line.as_bstr());
            MessageParseError::MissingColon { line: line_number }
        })?;

        let name = &line[..colon];
        if !is_valid_header_name(name) {
            tracing::trace!("line {line_number}: invalid header name {:?}", name.as_bstr());
            return Err(MessageParseError::InvalidHeaderName {
                line: line_number,
                name: String::from_utf8_lossy(name).into_owned(),
            });
        }

        let rest = &line[colon + 1..];
        let (separator, value) = match rest.strip_prefix(b" ") {
            Some(value) => (CANONICAL_SEPARATOR, value),
            None => (":", rest),
        };

        Ok(Self {
            // Validated as ASCII above
            name: name.to_str_lossy().into_owned(),
            value: value.into(),
            separator,
        })
    }

    /// Format the header into the provided output stream,
    /// terminated by CRLF
    pub fn write_header<W: std::io::Write>(&self, out: &mut W) -> std::io::Result<()> {
        out.write_all(self.name.as_bytes())?;
        out.write_all(self.separator.as_bytes())?;
        out.write_all(&self.value)?;
        out.write_all(b"\r\n")
    }

    /// Convenience method wrapping write_header that returns
    /// the formatted header as a standalone string
    pub fn to_header_string(&self) -> String {
        let mut out = vec![];
        self.write_header(&mut out).ok();
        String::from_utf8_lossy(&out).into_owned()
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_value(&self) -> &BStr {
        self.value.as_bstr()
    }

    pub fn get_separator(&self) -> &str {
        self.separator
    }

    pub fn name_matches(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    pub fn assign<V: Into<BString>>(&mut self, value: V) {
        let value = value.into();
        debug_assert_valid_value(&value);
        self.value = value;
    }
}
