//! GDB (GNU Debugger) MI Interface Module

pub mod error;
pub mod parser;
pub mod types;
pub mod value;

pub use error::{ParseError, ParseResult};
pub use parser::{MiParser, ValueParser};
pub use types::*;
pub use value::{Value, ValueKind, ValueType};
