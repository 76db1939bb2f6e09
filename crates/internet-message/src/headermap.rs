use crate::{Header, MessageParseError, ParserConfig, Result};
use bstr::{BStr, BString};

/// Represents an ordered list of headers.
/// Note that there may be multiple headers with the same name.
/// Derefs to the underlying `Vec<Header>` for mutation,
/// but provides some accessors for retrieving headers by name.
/// Name lookups are ASCII case-insensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    headers: Vec<Header>,
}

/// Holds the result of parsing a block of headers
#[derive(Debug)]
pub struct HeaderParseResult {
    pub headers: HeaderMap,
    /// Offset of the first octet after the blank line that
    /// terminates the header section
    pub body_offset: usize,
}

impl std::ops::Deref for HeaderMap {
    type Target = Vec<Header>;
    fn deref(&self) -> &Vec<Header> {
        &self.headers
    }
}

impl std::ops::DerefMut for HeaderMap {
    fn deref_mut(&mut self) -> &mut Vec<Header> {
        &mut self.headers
    }
}

impl HeaderMap {
    pub fn new(headers: Vec<Header>) -> Self {
        Self { headers }
    }

    /// Parse the header section at the start of `raw`, up to and
    /// including the empty line that terminates it.
    /// Octets following the header section are not examined.
    pub fn parse_headers(raw: &[u8], config: &ParserConfig) -> Result<HeaderParseResult> {
        let mut headers = vec![];
        let mut offset = 0;
        let mut line_number = 0;

        loop {
            line_number += 1;
            let Some(end) = memchr::memmem::find(&raw[offset..], b"\r\n") else {
                tracing::trace!("header section ended without a blank line");
                return Err(MessageParseError::NoHeaderTerminator);
            };
            let line = &raw[offset..offset + end];

            if let Some(idx) = memchr::memchr2(b'\r', b'\n', line) {
                return Err(MessageParseError::BareCrOrLf {
                    offset: offset + idx,
                });
            }
            if !config.line_fits(line.len()) {
                tracing::trace!(
                    "line {line_number}: {} octets exceeds limit {}",
                    line.len() + 2,
                    config.line_length_limit
                );
                return Err(MessageParseError::LineTooLong {
                    line: line_number,
                    length: line.len() + 2,
                    limit: config.line_length_limit,
                });
            }

            offset += end + 2;
            if line.is_empty() {
                break;
            }
            headers.push(Header::parse(line, line_number)?);
        }

        Ok(HeaderParseResult {
            headers: Self::new(headers),
            body_offset: offset,
        })
    }

    pub fn get_first(&self, name: &str) -> Option<&Header> {
        self.headers.iter().find(|header| header.name_matches(name))
    }

    pub fn get_last(&self, name: &str) -> Option<&Header> {
        self.headers.iter().rev().find(|header| header.name_matches(name))
    }

    pub fn iter_named<'a, 'name>(
        &'a self,
        name: &'name str,
    ) -> impl DoubleEndedIterator<Item = &'a Header> + 'name
    where
        'a: 'name,
    {
        self.headers
            .iter()
            .filter(move |header| header.name_matches(name))
    }

    pub fn has_header(&self, name: &str) -> bool {
        self.get_first(name).is_some()
    }

    /// Returns the value of the first header named `name`, or an
    /// empty value if there is no such header
    pub fn get_header_value(&self, name: &str) -> &BStr {
        match self.get_first(name) {
            Some(header) => header.get_value(),
            None => BStr::new(b""),
        }
    }

    /// Replace the value of the first header named `name`, or
    /// append a new header if there is none.
    /// See [Header::with_name_value] for the constraints on name and value.
    pub fn set_header<N: Into<String> + AsRef<str>, V: Into<BString>>(
        &mut self,
        name: N,
        value: V,
    ) {
        match self
            .headers
            .iter_mut()
            .find(|header| header.name_matches(name.as_ref()))
        {
            Some(header) => header.assign(value),
            None => self.headers.push(Header::with_name_value(name, value)),
        }
    }

    /// Append a header, regardless of whether one with the same
    /// name is already present.
    /// See [Header::with_name_value] for the constraints on name and value.
    pub fn push_header<N: Into<String>, V: Into<BString>>(&mut self, name: N, value: V) {
        self.headers.push(Header::with_name_value(name, value));
    }

    /// Write each header followed by the empty line that
    /// terminates the header section
    pub fn write_headers<W: std::io::Write>(&self, out: &mut W) -> std::io::Result<()> {
        for header in &self.headers {
            header.write_header(out)?;
        }
        out.write_all(b"\r\n")
    }

    pub fn generate_raw_headers(&self) -> Vec<u8> {
        let mut out = vec![];
        self.write_headers(&mut out).ok();
        out
    }
}
