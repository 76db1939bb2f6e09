mod config;
mod error;
mod header;
mod headermap;
mod message;
mod normalize;

pub use config::{ParserConfig, DEFAULT_LINE_LENGTH_LIMIT};
pub use error::{MessageParseError, ParseErrorKind};
pub type Result<T> = std::result::Result<T, MessageParseError>;

pub use header::{is_valid_header_name, Header, CANONICAL_SEPARATOR};
pub use headermap::*;
pub use message::InternetMessage;
pub use normalize::*;
