use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MessageParseError {
    #[error("line {line} is {length} octets long including CRLF, which exceeds the limit of {limit}")]
    LineTooLong {
        line: usize,
        length: usize,
        limit: usize,
    },
    #[error("line {line}: invalid header name {name:?}")]
    InvalidHeaderName { line: usize, name: String },
    #[error("line {line}: header has no ':' separator")]
    MissingColon { line: usize },
    #[error("lone CR or LF at offset {offset}")]
    BareCrOrLf { offset: usize },
    #[error("header section is not terminated by an empty line")]
    NoHeaderTerminator,
}

/// The category of a parse failure, without its positional detail
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParseErrorKind {
    LineTooLong,
    InvalidHeaderName,
    MissingColon,
    BareCrOrLf,
    NoHeaderTerminator,
}

impl MessageParseError {
    pub fn kind(&self) -> ParseErrorKind {
        match self {
            Self::LineTooLong { .. } => ParseErrorKind::LineTooLong,
            Self::InvalidHeaderName { .. } => ParseErrorKind::InvalidHeaderName,
            Self::MissingColon { .. } => ParseErrorKind::MissingColon,
            Self::BareCrOrLf { .. } => ParseErrorKind::BareCrOrLf,
            Self::NoHeaderTerminator => ParseErrorKind::NoHeaderTerminator,
        }
    }
}
