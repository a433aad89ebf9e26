//! GDB Machine Interface (MI) Type Definitions

use crate::gdb::error::ParseResult;
use crate::gdb::parser::MiParser;
use crate::gdb::value::{write_indent, Value, ValueKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Nesting limit used unless a [`ParserConfig`] says otherwise
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// GDB/MI result class types
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResultClass {
    #[default]
    Unknown,
    Done,
    /// A `done` the caller has recognized as answering a custom command.
    /// Never produced by the parser.
    CustomDone,
    Running,
    Connected,
    Error,
    Exit,
}

impl ResultClass {
    /// Map a result-class keyword. Unrecognized keywords are `Unknown`.
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword {
            "done" => ResultClass::Done,
            "running" => ResultClass::Running,
            "connected" => ResultClass::Connected,
            "error" => ResultClass::Error,
            "exit" => ResultClass::Exit,
            _ => ResultClass::Unknown,
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            ResultClass::Done | ResultClass::CustomDone => "done",
            ResultClass::Running => "running",
            ResultClass::Connected => "connected",
            ResultClass::Error => "error",
            ResultClass::Exit => "exit",
            ResultClass::Unknown => "unknown",
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, ResultClass::Done | ResultClass::CustomDone)
    }
}

/// GDB/MI async and notification classes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AsyncClass {
    Stopped,
    Running,
    BreakpointCreated,
    BreakpointModified,
    BreakpointDeleted,
    ThreadGroupAdded,
    ThreadGroupRemoved,
    ThreadGroupStarted,
    ThreadGroupExited,
    ThreadCreated,
    ThreadSelected,
    ThreadExited,
    LibraryLoaded,
    LibraryUnloaded,
    CmdParamChanged,
    MemoryChanged,
    ParamChanged,
    Unknown(String),
}

impl From<&str> for AsyncClass {
    fn from(s: &str) -> Self {
        match s {
            "stopped" => AsyncClass::Stopped,
            "running" => AsyncClass::Running,
            "breakpoint-created" => AsyncClass::BreakpointCreated,
            "breakpoint-modified" => AsyncClass::BreakpointModified,
            "breakpoint-deleted" => AsyncClass::BreakpointDeleted,
            "thread-group-added" => AsyncClass::ThreadGroupAdded,
            "thread-group-removed" => AsyncClass::ThreadGroupRemoved,
            "thread-group-started" => AsyncClass::ThreadGroupStarted,
            "thread-group-exited" => AsyncClass::ThreadGroupExited,
            "thread-created" => AsyncClass::ThreadCreated,
            "thread-selected" => AsyncClass::ThreadSelected,
            "thread-exited" => AsyncClass::ThreadExited,
            "library-loaded" => AsyncClass::LibraryLoaded,
            "library-unloaded" => AsyncClass::LibraryUnloaded,
            "cmd-param-changed" => AsyncClass::CmdParamChanged,
            "memory-changed" => AsyncClass::MemoryChanged,
            "param-changed" => AsyncClass::ParamChanged,
            _ => AsyncClass::Unknown(s.to_string()),
        }
    }
}

impl AsyncClass {
    pub fn keyword(&self) -> &str {
        match self {
            AsyncClass::Stopped => "stopped",
            AsyncClass::Running => "running",
            AsyncClass::BreakpointCreated => "breakpoint-created",
            AsyncClass::BreakpointModified => "breakpoint-modified",
            AsyncClass::BreakpointDeleted => "breakpoint-deleted",
            AsyncClass::ThreadGroupAdded => "thread-group-added",
            AsyncClass::ThreadGroupRemoved => "thread-group-removed",
            AsyncClass::ThreadGroupStarted => "thread-group-started",
            AsyncClass::ThreadGroupExited => "thread-group-exited",
            AsyncClass::ThreadCreated => "thread-created",
            AsyncClass::ThreadSelected => "thread-selected",
            AsyncClass::ThreadExited => "thread-exited",
            AsyncClass::LibraryLoaded => "library-loaded",
            AsyncClass::LibraryUnloaded => "library-unloaded",
            AsyncClass::CmdParamChanged => "cmd-param-changed",
            AsyncClass::MemoryChanged => "memory-changed",
            AsyncClass::ParamChanged => "param-changed",
            AsyncClass::Unknown(keyword) => keyword,
        }
    }
}

/// Which of the three async record flavours a line is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AsyncKind {
    /// `*`: execution state changes
    Exec,
    /// `+`: progress of long-running operations
    Status,
    /// `=`: everything else the frontend should know about
    Notify,
}

impl AsyncKind {
    pub fn from_prefix(prefix: char) -> Option<Self> {
        match prefix {
            '*' => Some(AsyncKind::Exec),
            '+' => Some(AsyncKind::Status),
            '=' => Some(AsyncKind::Notify),
            _ => None,
        }
    }

    pub fn prefix(&self) -> char {
        match self {
            AsyncKind::Exec => '*',
            AsyncKind::Status => '+',
            AsyncKind::Notify => '=',
        }
    }
}

/// Stream record channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamKind {
    Console,
    Target,
    Log,
}

impl StreamKind {
    pub fn from_prefix(prefix: char) -> Option<Self> {
        match prefix {
            '~' => Some(StreamKind::Console),
            '@' => Some(StreamKind::Target),
            '&' => Some(StreamKind::Log),
            _ => None,
        }
    }

    pub fn prefix(&self) -> char {
        match self {
            StreamKind::Console => '~',
            StreamKind::Target => '@',
            StreamKind::Log => '&',
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            StreamKind::Console => "console",
            StreamKind::Target => "target",
            StreamKind::Log => "log",
        }
    }
}

/// `[token] "^" result-class ("," result)*`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResultRecord {
    pub token: Option<u64>,
    pub result_class: ResultClass,
    /// Anonymous tuple of the results, or invalid when the class stands alone
    pub data: Value,
}

impl ResultRecord {
    pub fn parse(line: &str) -> ParseResult<Self> {
        MiParser::new().parse_result_record(line)
    }

    /// Token as a signed number, `-1` when the record carried none
    pub fn token_or_default(&self) -> i64 {
        self.token
            .and_then(|token| i64::try_from(token).ok())
            .unwrap_or(-1)
    }
}

/// `[token] ("*" | "+" | "=") async-class ("," result)*`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AsyncRecord {
    pub token: Option<u64>,
    pub kind: AsyncKind,
    pub class: AsyncClass,
    pub data: Value,
}

/// `("~" | "@" | "&") c-string`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamRecord {
    pub kind: StreamKind,
    pub content: Value,
}

impl StreamRecord {
    pub fn new(kind: StreamKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            content: Value::stream_output(kind.name(), text),
        }
    }

    pub fn text(&self) -> &str {
        self.content.data()
    }
}

/// GDB/MI output record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum MiOutputRecord {
    Result(ResultRecord),
    Async(AsyncRecord),
    Stream(StreamRecord),
}

impl MiOutputRecord {
    pub fn token(&self) -> Option<u64> {
        match self {
            MiOutputRecord::Result(record) => record.token,
            MiOutputRecord::Async(record) => record.token,
            MiOutputRecord::Stream(_) => None,
        }
    }
}

/// Parser limits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    /// Deepest tuple/list nesting accepted before giving up
    pub max_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

fn write_token(f: &mut fmt::Formatter<'_>, token: Option<u64>) -> fmt::Result {
    match token {
        Some(token) => write!(f, "{}", token),
        None => Ok(()),
    }
}

/// `,name=value` for every result; the alternate form puts each on its own line.
///
/// Record data is normally a tuple of results. Any other non-invalid data is
/// written as a single result so nothing is silently dropped.
fn write_results(f: &mut fmt::Formatter<'_>, data: &Value) -> fmt::Result {
    let multiline = f.alternate();
    let results = match data.kind() {
        ValueKind::Invalid => return Ok(()),
        ValueKind::Tuple(children) => children.as_slice(),
        ValueKind::Const(_) | ValueKind::List(_) => std::slice::from_ref(data),
    };
    for result in results.iter().filter(|result| result.is_valid()) {
        f.write_str(",")?;
        if multiline {
            f.write_str("\n")?;
            write_indent(f, 1)?;
        }
        result.write_result(f, multiline, 1)?;
    }
    Ok(())
}

impl fmt::Display for ResultRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_token(f, self.token)?;
        write!(f, "^{}", self.result_class.keyword())?;
        write_results(f, &self.data)
    }
}

impl fmt::Display for AsyncRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_token(f, self.token)?;
        write!(f, "{}{}", self.kind.prefix(), self.class.keyword())?;
        write_results(f, &self.data)
    }
}

impl fmt::Display for StreamRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind.prefix())?;
        self.content.write_text(f, false, 0)
    }
}

impl fmt::Display for MiOutputRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MiOutputRecord::Result(record) => fmt::Display::fmt(record, f),
            MiOutputRecord::Async(record) => fmt::Display::fmt(record, f),
            MiOutputRecord::Stream(record) => fmt::Display::fmt(record, f),
        }
    }
}
