use crate::headermap::{HeaderMap, HeaderParseResult};
use crate::normalize::find_lone_cr_or_lf;
use crate::{Header, MessageParseError, ParserConfig, Result};
use bstr::{BStr, BString, ByteSlice};

/// An Internet Message Format document: an ordered header section
/// followed by an opaque body.
///
/// Parsing is strict: CRLF is the only permitted line terminator
/// anywhere in the input, header lines are subject to the configured
/// length limit, and the header section must be terminated by an
/// empty line. Any violation rejects the whole input.
///
/// A successfully parsed message regenerates to exactly the octets
/// it was parsed from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InternetMessage {
    headers: HeaderMap,
    body: BString,
}

impl InternetMessage {
    pub fn new<B: Into<BString>>(headers: HeaderMap, body: B) -> Self {
        Self {
            headers,
            body: body.into(),
        }
    }

    /// Parse `raw` using the default limits
    pub fn parse<S: AsRef<[u8]>>(raw: S) -> Result<Self> {
        Self::parse_with_config(raw, &ParserConfig::default())
    }

    pub fn parse_with_config<S: AsRef<[u8]>>(raw: S, config: &ParserConfig) -> Result<Self> {
        let raw = raw.as_ref();

        if let Some(offset) = find_lone_cr_or_lf(raw) {
            tracing::trace!("lone CR or LF at offset {offset}");
            return Err(MessageParseError::BareCrOrLf { offset });
        }

        let HeaderParseResult {
            headers,
            body_offset,
        } = HeaderMap::parse_headers(raw, config)?;

        Ok(Self {
            headers,
            body: raw[body_offset..].into(),
        })
    }

    /// Returns all headers in their original order, including duplicates
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub fn get_headers(&self) -> &[Header] {
        &self.headers
    }

    pub fn has_header(&self, name: &str) -> bool {
        self.headers.has_header(name)
    }

    /// Returns the value of the first header named `name`;
    /// empty if there is no such header
    pub fn get_header_value(&self, name: &str) -> &BStr {
        self.headers.get_header_value(name)
    }

    pub fn get_body(&self) -> &BStr {
        self.body.as_bstr()
    }

    pub fn set_body<B: Into<BString>>(&mut self, body: B) {
        self.body = body.into();
    }

    /// Write the header section, the blank line that terminates it,
    /// and then the body verbatim
    pub fn write_message<W: std::io::Write>(&self, out: &mut W) -> std::io::Result<()> {
        self.headers.write_headers(out)?;
        out.write_all(&self.body)
    }

    pub fn generate_raw_message(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.body.len() + 64 * self.headers.len());
        self.write_message(&mut out).ok();
        out
    }
}

impl std::str::FromStr for InternetMessage {
    type Err = MessageParseError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<&[u8]> for InternetMessage {
    type Error = MessageParseError;

    fn try_from(raw: &[u8]) -> Result<Self> {
        Self::parse(raw)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ParseErrorKind;

    fn round_trip(raw: &str) -> InternetMessage {
        let msg = InternetMessage::parse(raw).unwrap();
        k9::assert_equal!(msg.generate_raw_message(), raw.as_bytes().to_vec());
        msg
    }

    #[test]
    fn single_header() {
        let msg = round_trip("Host: example.com\r\n\r\n");
        k9::assert_equal!(msg.get_headers().len(), 1);
        assert!(msg.has_header("Host"));
        k9::assert_equal!(msg.get_header_value("Host"), "example.com");
        assert!(msg.get_body().is_empty());
    }

    #[test]
    fn body_keeps_trailing_crlf() {
        let msg = round_trip(concat!(
            "User-Agent: curl/7.16.3 libcurl/7.16.3 OpenSSL/0.9.7l zlib/1.2.3\r\n",
            "Host: www.example.com\r\n",
            "Accept-Language: en, mi\r\n",
            "\r\n",
            "Hello\r\n"
        ));
        k9::assert_equal!(msg.get_body(), "Hello\r\n");
        k9::assert_equal!(msg.get_header_value("Accept-Language"), "en, mi");
    }

    #[test]
    fn body_may_contain_blank_lines_and_colons() {
        let msg = round_trip("A: 1\r\n\r\nnot: a header\r\n\r\nmore\r\n");
        k9::assert_equal!(msg.get_headers().len(), 1);
        k9::assert_equal!(msg.get_body(), "not: a header\r\n\r\nmore\r\n");
    }

    #[test]
    fn only_blank_line() {
        let msg = round_trip("\r\n");
        assert!(msg.get_headers().is_empty());
        assert!(msg.get_body().is_empty());
    }

    #[test]
    fn missing_terminator() {
        k9::assert_equal!(
            InternetMessage::parse("Host: example.com\r\nAccept: */*\r\n")
                .unwrap_err()
                .kind(),
            ParseErrorKind::NoHeaderTerminator
        );
    }

    #[test]
    fn lone_terminators_anywhere() {
        for raw in [
            "Host: example.com\n\r\n",
            "Host: example.com\r\r\n\r\n",
            "Host: example.com\r\n\r\nbody\n",
            "Host: example.com\r\n\r\nbody\r",
            "Host: example.com\r\n\r\nbo\rdy\r\n",
        ] {
            assert_eq!(
                InternetMessage::parse(raw).unwrap_err().kind(),
                ParseErrorKind::BareCrOrLf,
                "{raw:?}"
            );
        }
    }

    #[test]
    fn absent_header() {
        let msg = InternetMessage::parse("Host: example.com\r\n\r\n").unwrap();
        assert!(!msg.has_header("Content-Length"));
        k9::assert_equal!(msg.get_header_value("Content-Length"), "");
    }

    #[test]
    fn non_utf8_value_and_body() {
        let raw = b"X-Bin: \xff\xfe\r\n\r\n\x00\x80\x81".to_vec();
        let msg = InternetMessage::parse(&raw).unwrap();
        k9::assert_equal!(msg.get_header_value("x-bin").as_bytes(), b"\xff\xfe");
        k9::assert_equal!(msg.generate_raw_message(), raw);
    }

    #[test]
    fn build_and_generate() {
        let mut msg = InternetMessage::default();
        msg.headers_mut().push_header("Host", "example.com");
        msg.headers_mut().push_header("Content-Length", "5");
        msg.set_body("hello");
        k9::assert_equal!(
            msg.generate_raw_message(),
            b"Host: example.com\r\nContent-Length: 5\r\n\r\nhello".to_vec()
        );

        let reparsed = InternetMessage::parse(msg.generate_raw_message()).unwrap();
        k9::assert_equal!(reparsed, msg);
    }

    #[test]
    fn from_str() {
        let msg: InternetMessage = "Subject: hi\r\n\r\n".parse().unwrap();
        k9::assert_equal!(msg.get_header_value("subject"), "hi");
        assert!("Subject: hi\r\n".parse::<InternetMessage>().is_err());
    }
}
