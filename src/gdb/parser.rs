//! GDB Machine Interface (MI) Parser
//!
//! Parses GDB/MI output into [`Value`] trees and output records.
//!
//! ```text
//! value    ::= const | tuple | list
//! const    ::= c-string
//! tuple    ::= "{}" | "{" result ("," result)* "}"
//! list     ::= "[]" | "[" value ("," value)* "]" | "[" result ("," result)* "]"
//! result   ::= variable "=" value
//! ```

use crate::gdb::error::{ParseError, ParseResult};
use crate::gdb::types::*;
use crate::gdb::value::Value;
use regex::Regex;
use std::fmt::{self, Write};
use std::sync::LazyLock;
use tracing::{debug, trace};

/// `[token] prefix class`, the part of a record line before its results
static ENVELOPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<token>[0-9]*)(?:(?P<prefix>[\^*+=])(?P<class>[A-Za-z0-9_-]*))?")
        .expect("envelope pattern is valid")
});

/// Position in the input being parsed
#[derive(Debug, Clone)]
struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str, pos: usize) -> Self {
        Self { input, pos }
    }

    fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.pos += 1;
        Some(byte)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(byte) if byte.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    /// Character starting at `offset`, for error messages.
    fn char_at(&self, offset: usize) -> char {
        self.input
            .get(offset..)
            .and_then(|rest| rest.chars().next())
            .unwrap_or(char::REPLACEMENT_CHARACTER)
    }

    fn slice(&self, start: usize, end: usize) -> &'a str {
        self.input.get(start..end).unwrap_or_default()
    }
}

/// Recursive-descent parser for GDB/MI values.
///
/// Each method consumes one production and leaves the cursor just past it.
pub struct ValueParser<'a> {
    cursor: Cursor<'a>,
    depth: usize,
    max_depth: usize,
}

impl<'a> ValueParser<'a> {
    pub fn new(input: &'a str, config: &ParserConfig) -> Self {
        Self::starting_at(input, 0, config)
    }

    /// Parser whose cursor starts at byte `pos` of `input`, so that error
    /// offsets stay relative to the whole line.
    pub fn starting_at(input: &'a str, pos: usize, config: &ParserConfig) -> Self {
        Self {
            cursor: Cursor::new(input, pos),
            depth: 0,
            max_depth: config.max_depth,
        }
    }

    pub fn position(&self) -> usize {
        self.cursor.pos
    }

    /// Error for whatever sits at the cursor, or truncation at end of input.
    fn unexpected_here(&self, expected: &'static str, context: &'static str) -> ParseError {
        let offset = self.cursor.pos;
        match self.cursor.peek() {
            Some(_) => ParseError::unexpected(offset, self.cursor.char_at(offset), expected),
            None => ParseError::truncated(offset, context),
        }
    }

    /// `const | tuple | list`
    pub fn parse_value(&mut self) -> ParseResult<Value> {
        self.cursor.skip_whitespace();
        match self.cursor.peek() {
            Some(b'"') => Ok(Value::constant(self.parse_c_string()?)),
            Some(b'{') => self.parse_tuple(),
            Some(b'[') => self.parse_list(),
            _ => Err(self.unexpected_here("a value ('\"', '{' or '[')", "value")),
        }
    }

    /// A named `result`, or a bare `value` when the next character opens one.
    pub fn parse_result_or_value(&mut self) -> ParseResult<Value> {
        self.cursor.skip_whitespace();
        match self.cursor.peek() {
            Some(b'"' | b'{' | b'[') => self.parse_value(),
            _ => self.parse_result(),
        }
    }

    /// `variable "=" value`
    pub fn parse_result(&mut self) -> ParseResult<Value> {
        let name = self.parse_variable()?;
        self.cursor.skip_whitespace();
        if self.cursor.peek() != Some(b'=') {
            return Err(self.unexpected_here("'='", "result"));
        }
        self.cursor.bump();
        Ok(self.parse_value()?.with_name(name))
    }

    fn parse_variable(&mut self) -> ParseResult<&'a str> {
        self.cursor.skip_whitespace();
        let start = self.cursor.pos;
        while matches!(self.cursor.peek(), Some(byte) if !is_delimiter(byte)) {
            self.cursor.pos += 1;
        }
        if self.cursor.pos == start {
            return Err(self.unexpected_here("a variable name", "result"));
        }
        Ok(self.cursor.slice(start, self.cursor.pos))
    }

    /// `"{}" | "{" result ("," result)* "}"`
    ///
    /// Bare values are tolerated inside tuples and come out unnamed.
    pub fn parse_tuple(&mut self) -> ParseResult<Value> {
        let children = self.parse_children(b'{', b'}', "',' or '}'", "tuple")?;
        Ok(Value::tuple(children))
    }

    /// `"[]" | "[" value ("," value)* "]" | "[" result ("," result)* "]"`
    ///
    /// Each element is classified on its own, so results and values may mix.
    pub fn parse_list(&mut self) -> ParseResult<Value> {
        let children = self.parse_children(b'[', b']', "',' or ']'", "list")?;
        Ok(Value::list(children))
    }

    fn parse_children(
        &mut self,
        open: u8,
        close: u8,
        separator: &'static str,
        context: &'static str,
    ) -> ParseResult<Vec<Value>> {
        self.cursor.skip_whitespace();
        if self.cursor.peek() != Some(open) {
            return Err(self.unexpected_here("an opening bracket", context));
        }
        if self.depth >= self.max_depth {
            return Err(ParseError::TooDeep {
                offset: self.cursor.pos,
                limit: self.max_depth,
            });
        }
        self.cursor.bump();
        self.depth += 1;

        let mut children = Vec::new();
        self.cursor.skip_whitespace();
        if self.cursor.peek() == Some(close) {
            self.cursor.bump();
            self.depth -= 1;
            return Ok(children);
        }

        loop {
            children.push(self.parse_result_or_value()?);
            self.cursor.skip_whitespace();
            match self.cursor.peek() {
                Some(b',') => {
                    self.cursor.bump();
                }
                Some(byte) if byte == close => {
                    self.cursor.bump();
                    break;
                }
                _ => return Err(self.unexpected_here(separator, context)),
            }
        }

        self.depth -= 1;
        Ok(children)
    }

    /// A double-quoted C string, returned with escapes decoded.
    pub fn parse_c_string(&mut self) -> ParseResult<String> {
        self.cursor.skip_whitespace();
        if self.cursor.peek() != Some(b'"') {
            return Err(self.unexpected_here("'\"'", "string"));
        }
        self.cursor.bump();

        let mut bytes = Vec::new();
        loop {
            match self.cursor.bump() {
                Some(b'"') => break,
                Some(b'\\') => self.parse_escape(&mut bytes)?,
                Some(byte) => bytes.push(byte),
                None => return Err(ParseError::truncated(self.cursor.pos, "string")),
            }
        }

        Ok(match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
        })
    }

    fn parse_escape(&mut self, bytes: &mut Vec<u8>) -> ParseResult<()> {
        let escaped = self
            .cursor
            .bump()
            .ok_or_else(|| ParseError::truncated(self.cursor.pos, "escape sequence"))?;
        let byte = match escaped {
            b'n' => b'\n',
            b't' => b'\t',
            b'r' => b'\r',
            b'a' => 0x07,
            b'b' => 0x08,
            b'f' => 0x0c,
            b'v' => 0x0b,
            b'e' => 0x1b,
            b'0'..=b'7' => {
                let mut code = u32::from(escaped - b'0');
                for _ in 0..2 {
                    match self.cursor.peek() {
                        Some(digit @ b'0'..=b'7') => {
                            code = code * 8 + u32::from(digit - b'0');
                            self.cursor.bump();
                        }
                        _ => break,
                    }
                }
                (code & 0xff) as u8
            }
            // `\"`, `\\` and anything unknown stand for themselves
            other => other,
        };
        bytes.push(byte);
        Ok(())
    }

    /// `("," result)*` up to the end of input, as an anonymous tuple.
    ///
    /// Returns an invalid value when there are no results at all.
    pub fn parse_results(&mut self) -> ParseResult<Value> {
        let mut results = Vec::new();
        loop {
            self.cursor.skip_whitespace();
            match self.cursor.peek() {
                None => break,
                Some(b',') => {
                    self.cursor.bump();
                    results.push(self.parse_result()?);
                }
                Some(_) => return Err(self.unexpected_here("',' or end of record", "record")),
            }
        }

        Ok(if results.is_empty() {
            Value::default()
        } else {
            Value::tuple(results)
        })
    }
}

fn is_delimiter(byte: u8) -> bool {
    byte.is_ascii_whitespace() || matches!(byte, b'=' | b',' | b'"' | b'{' | b'}' | b'[' | b']')
}

/// Write `text` with the escapes [`ValueParser::parse_c_string`] decodes.
pub fn escape_c_string<W: Write>(text: &str, out: &mut W) -> fmt::Result {
    for c in text.chars() {
        match c {
            '"' => out.write_str("\\\"")?,
            '\\' => out.write_str("\\\\")?,
            '\n' => out.write_str("\\n")?,
            '\t' => out.write_str("\\t")?,
            '\r' => out.write_str("\\r")?,
            c if c.is_ascii_control() => write!(out, "\\{:03o}", c as u32)?,
            c => out.write_char(c)?,
        }
    }
    Ok(())
}

/// GDB/MI line parser
#[derive(Debug, Clone, Default)]
pub struct MiParser {
    config: ParserConfig,
}

impl MiParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse a single line of GDB/MI output.
    ///
    /// Blank lines and the `(gdb)` prompt yield `None`.
    pub fn parse_line(&self, line: &str) -> ParseResult<Option<MiOutputRecord>> {
        let line = line.trim_end();
        if line.is_empty() || line == "(gdb)" {
            return Ok(None);
        }

        let record = match line.chars().next().and_then(StreamKind::from_prefix) {
            Some(kind) => MiOutputRecord::Stream(self.parse_stream(line, kind)?),
            None => self.parse_tagged(line)?,
        };
        debug!("Parsed {} record", record_type(&record));
        Ok(Some(record))
    }

    /// Parse a line that must be a `^` result record.
    pub fn parse_result_record(&self, line: &str) -> ParseResult<ResultRecord> {
        match self.parse_tagged(line.trim_end())? {
            MiOutputRecord::Result(record) => Ok(record),
            _ => Err(ParseError::UnknownRecord {
                offset: line.bytes().take_while(u8::is_ascii_digit).count(),
                found: line
                    .chars()
                    .find(|c| !c.is_ascii_digit())
                    .unwrap_or(char::REPLACEMENT_CHARACTER),
            }),
        }
    }

    fn parse_stream(&self, line: &str, kind: StreamKind) -> ParseResult<StreamRecord> {
        let mut parser = ValueParser::starting_at(line, 1, &self.config);
        let text = parser.parse_c_string()?;
        trace!("{} stream output: {:?}", kind.name(), text);
        Ok(StreamRecord::new(kind, text))
    }

    /// Result and async records: `[token] prefix class ("," result)*`
    fn parse_tagged(&self, line: &str) -> ParseResult<MiOutputRecord> {
        let caps = ENVELOPE
            .captures(line)
            .ok_or_else(|| ParseError::unexpected(0, first_char(line), "a record"))?;
        let digits = caps.name("token").map_or("", |m| m.as_str());

        let Some(prefix) = caps.name("prefix") else {
            let offset = digits.len();
            return Err(match line[offset..].chars().next() {
                Some(found) => ParseError::UnknownRecord { offset, found },
                None => ParseError::truncated(offset, "record"),
            });
        };
        let class = caps.name("class").map_or("", |m| m.as_str());
        if class.is_empty() {
            return Err(ParseError::MissingClass { offset: prefix.end() });
        }

        let token = if digits.is_empty() {
            None
        } else {
            Some(digits.parse::<u64>().map_err(|_| ParseError::BadToken {
                digits: digits.to_string(),
            })?)
        };

        let mut parser = ValueParser::starting_at(line, prefix.end() + class.len(), &self.config);
        let data = parser.parse_results()?;

        Ok(match AsyncKind::from_prefix(first_char(prefix.as_str())) {
            Some(kind) => MiOutputRecord::Async(AsyncRecord {
                token,
                kind,
                class: AsyncClass::from(class),
                data,
            }),
            None => MiOutputRecord::Result(ResultRecord {
                token,
                result_class: ResultClass::from_keyword(class),
                data,
            }),
        })
    }
}

fn first_char(s: &str) -> char {
    s.chars().next().unwrap_or(char::REPLACEMENT_CHARACTER)
}

fn record_type(record: &MiOutputRecord) -> &'static str {
    match record {
        MiOutputRecord::Result(_) => "result",
        MiOutputRecord::Async(_) => "async",
        MiOutputRecord::Stream(_) => "stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gdb::value::ValueType;
    use proptest::prelude::*;

    fn parse(input: &str) -> Value {
        Value::parse(input).unwrap()
    }

    #[test]
    fn test_parse_const() {
        let value = parse(r#""hello""#);
        assert_eq!(value.value_type(), ValueType::Const);
        assert_eq!(value.data(), "hello");
        assert_eq!(value.name(), "");
    }

    #[test]
    fn test_parse_escapes() {
        let value = parse(r#""a\"b\\c\nd\te\r\033\302\240""#);
        assert_eq!(value.data(), "a\"b\\c\nd\te\r\x1b\u{a0}");
    }

    #[test]
    fn test_parse_empty_containers() {
        let tuple = parse("{}");
        assert!(tuple.is_tuple());
        assert_eq!(tuple.child_count(), 0);

        let list = parse("[]");
        assert!(list.is_list());
        assert_eq!(list.child_count(), 0);
    }

    #[test]
    fn test_parse_tuple() {
        let value = parse(r#"{a="1",b="2"}"#);
        assert!(value.is_tuple());
        let names: Vec<&str> = value.children().iter().map(Value::name).collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(value.find_child("a").data(), "1");
        assert_eq!(value.find_child("b").data(), "2");
        assert!(value.find_child("b").is_const());
        assert_eq!(value.find_child("c").value_type(), ValueType::Invalid);
    }

    #[test]
    fn test_parse_list_of_values() {
        let value = parse(r#"["1","2","3"]"#);
        assert!(value.is_list());
        let data: Vec<&str> = value.children().iter().map(Value::data).collect();
        assert_eq!(data, ["1", "2", "3"]);
        assert!(value.children().iter().all(|c| c.is_const() && c.name().is_empty()));
    }

    #[test]
    fn test_parse_list_of_results() {
        let value = parse(r#"[a="1",b="2"]"#);
        assert!(value.is_list());
        assert_eq!(value.child_count(), 2);
        assert!(value.child_at(0).unwrap().has_name("a"));
        assert_eq!(value.find_child("b").data(), "2");
    }

    #[test]
    fn test_parse_mixed_list() {
        let value = parse(r#"[frame={level="0"},"loose"]"#);
        assert!(value.child_at(0).unwrap().has_name("frame"));
        assert!(value.child_at(0).unwrap().is_tuple());
        assert_eq!(value.child_at(1).unwrap().data(), "loose");
    }

    #[test]
    fn test_parse_list_of_tuples() {
        let value = parse(r#"[{number="1"},{number="2"}]"#);
        assert_eq!(value.child_count(), 2);
        assert!(value.children().iter().all(|c| c.is_tuple() && c.name().is_empty()));
        assert_eq!(value.child_at(1).unwrap().find_child("number").data(), "2");
    }

    #[test]
    fn test_parse_nested() {
        let value = parse(r#"{a={b="1"}}"#);
        let a = value.find_child("a");
        assert!(a.is_tuple());
        assert_eq!(a.child_count(), 1);
        let b = a.find_child("b");
        assert!(b.is_const());
        assert_eq!(b.data(), "1");
    }

    #[test]
    fn test_parse_duplicate_names_keep_order() {
        let value = parse(r#"{frame="0",frame="1"}"#);
        assert_eq!(value.child_count(), 2);
        assert_eq!(value.find_child("frame").data(), "0");
        assert_eq!(value.child_at(1).unwrap().data(), "1");
    }

    #[test]
    fn test_parse_tolerates_whitespace() {
        let value = parse("{ a = \"1\" ,\n  b = [ \"x\" , \"y\" ] }");
        assert_eq!(value.find_child("a").data(), "1");
        assert_eq!(value.find_child("b").child_count(), 2);
    }

    #[test]
    fn test_parse_ignores_trailing_input() {
        let value = parse(r#"{a="1"} trailing junk"#);
        assert_eq!(value.child_count(), 1);
    }

    #[test]
    fn test_parse_strict_on_bare_word() {
        let err = Value::parse("done").unwrap_err();
        assert_eq!(err, ParseError::unexpected(0, 'd', "a value ('\"', '{' or '[')"));

        let err = Value::parse("{a=1}").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedChar { offset: 3, found: '1', .. }));
    }

    #[test]
    fn test_parse_missing_equals() {
        let err = Value::parse(r#"{a "1"}"#).unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedChar { offset: 3, found: '"', .. }));
    }

    #[test]
    fn test_parse_truncated_tuple() {
        let err = Value::parse(r#"{a="1""#).unwrap_err();
        assert_eq!(err, ParseError::truncated(6, "tuple"));
        assert!(err.is_truncation());
    }

    #[test]
    fn test_parse_truncated_inputs() {
        for input in [r#""abc"#, r#""abc\"#, "[", r#"["a","#, "{a=", "{a", ""] {
            let err = Value::parse(input).unwrap_err();
            assert!(err.is_truncation(), "{:?} gave {:?}", input, err);
        }
    }

    #[test]
    fn test_parse_bad_separator() {
        let err = Value::parse(r#"["a" "b"]"#).unwrap_err();
        assert_eq!(err, ParseError::unexpected(5, '"', "',' or ']'"));
    }

    #[test]
    fn test_parse_deep_nesting() {
        let depth = 64;
        let input = format!("{}{}", "[".repeat(depth), "]".repeat(depth));
        let mut value = &parse(&input);
        for _ in 1..depth {
            value = value.child_at(0).unwrap();
        }
        assert!(value.is_list());
        assert_eq!(value.child_count(), 0);
    }

    #[test]
    fn test_parse_depth_limit() {
        let config = ParserConfig { max_depth: 32 };
        let ok = format!("{}{}", "[".repeat(32), "]".repeat(32));
        assert!(Value::parse_with(&ok, &config).is_ok());

        let too_deep = format!("{}{}", "[".repeat(33), "]".repeat(33));
        let err = Value::parse_with(&too_deep, &config).unwrap_err();
        assert_eq!(err, ParseError::TooDeep { offset: 32, limit: 32 });
    }

    #[test]
    fn test_from_str() {
        let value: Value = r#"{a="1"}"#.parse().unwrap();
        assert_eq!(value.find_data("a"), Some("1"));
    }

    #[test]
    fn test_parse_result_done() {
        let record = ResultRecord::parse(r#"12^done,reason="foo""#).unwrap();
        assert_eq!(record.token, Some(12));
        assert_eq!(record.token_or_default(), 12);
        assert_eq!(record.result_class, ResultClass::Done);
        assert!(record.data.is_tuple());
        assert_eq!(record.data.child_count(), 1);
        assert_eq!(record.data.find_child("reason").data(), "foo");
    }

    #[test]
    fn test_parse_result_without_token() {
        let record = ResultRecord::parse(r#"^error,msg="bad""#).unwrap();
        assert_eq!(record.token, None);
        assert_eq!(record.token_or_default(), -1);
        assert_eq!(record.result_class, ResultClass::Error);
        assert_eq!(record.data.find_data("msg"), Some("bad"));
    }

    #[test]
    fn test_parse_result_unknown_class() {
        let record = ResultRecord::parse("^frobnicate").unwrap();
        assert_eq!(record.result_class, ResultClass::Unknown);
        assert!(!record.data.is_valid());
    }

    #[test]
    fn test_parse_result_bare_class() {
        let record = ResultRecord::parse("7^running\r\n").unwrap();
        assert_eq!(record.token, Some(7));
        assert_eq!(record.result_class, ResultClass::Running);
        assert!(!record.data.is_valid());
    }

    #[test]
    fn test_parse_result_with_nested_results() {
        let parser = MiParser::new();
        let record = parser
            .parse_result_record(
                r#"^done,BreakpointTable={nr_rows="1",hdr=[],body=[bkpt={number="1",type="breakpoint",thread-groups=["i1"]}]}"#,
            )
            .unwrap();
        let table = record.data.find_child("BreakpointTable");
        assert_eq!(table.find_data("nr_rows"), Some("1"));
        assert!(table.find_child("hdr").is_list());
        let bkpt = table.find_child("body").find_child("bkpt");
        assert_eq!(bkpt.find_data("type"), Some("breakpoint"));
        assert_eq!(bkpt.find_child("thread-groups").child_at(0).unwrap().data(), "i1");
    }

    #[test]
    fn test_parse_result_record_rejects_other_records() {
        let err = ResultRecord::parse(r#"*stopped,reason="exited""#).unwrap_err();
        assert_eq!(err, ParseError::UnknownRecord { offset: 0, found: '*' });
    }

    #[test]
    fn test_parse_result_record_errors() {
        assert_eq!(
            ResultRecord::parse("^").unwrap_err(),
            ParseError::MissingClass { offset: 1 }
        );
        assert_eq!(
            ResultRecord::parse("12").unwrap_err(),
            ParseError::truncated(2, "record")
        );
        assert!(matches!(
            ResultRecord::parse("99999999999999999999^done").unwrap_err(),
            ParseError::BadToken { .. }
        ));
        assert!(ResultRecord::parse(r#"^done,msg="unterminated"#)
            .unwrap_err()
            .is_truncation());
        assert!(matches!(
            ResultRecord::parse(r#"^done msg="x""#).unwrap_err(),
            ParseError::UnexpectedChar { offset: 6, found: 'm', .. }
        ));
    }

    #[test]
    fn test_parse_stopped() {
        let parser = MiParser::new();
        let record = parser
            .parse_line(r#"*stopped,reason="breakpoint-hit",frame={func="main"}"#)
            .unwrap()
            .unwrap();
        match record {
            MiOutputRecord::Async(AsyncRecord { token, kind, class, data }) => {
                assert_eq!(token, None);
                assert_eq!(kind, AsyncKind::Exec);
                assert_eq!(class, AsyncClass::Stopped);
                assert_eq!(data.find_data("reason"), Some("breakpoint-hit"));
                assert_eq!(data.find_child("frame").find_data("func"), Some("main"));
            }
            _ => panic!("Expected async record"),
        }
    }

    #[test]
    fn test_parse_notification() {
        let parser = MiParser::new();
        let record = parser
            .parse_line(r#"=breakpoint-created,bkpt={number="1"}"#)
            .unwrap()
            .unwrap();
        match record {
            MiOutputRecord::Async(record) => {
                assert_eq!(record.kind, AsyncKind::Notify);
                assert_eq!(record.class, AsyncClass::BreakpointCreated);
            }
            _ => panic!("Expected notification record"),
        }
    }

    #[test]
    fn test_parse_status_with_token() {
        let parser = MiParser::new();
        let record = parser.parse_line(r#"3+download,section=".text""#).unwrap().unwrap();
        assert_eq!(record.token(), Some(3));
        match record {
            MiOutputRecord::Async(record) => {
                assert_eq!(record.kind, AsyncKind::Status);
                assert_eq!(record.class, AsyncClass::Unknown("download".to_string()));
            }
            _ => panic!("Expected status record"),
        }
    }

    #[test]
    fn test_parse_console() {
        let parser = MiParser::new();
        let record = parser.parse_line("~\"Hello\\n\"").unwrap().unwrap();
        match record {
            MiOutputRecord::Stream(stream) => {
                assert_eq!(stream.kind, StreamKind::Console);
                assert_eq!(stream.text(), "Hello\n");
                assert!(stream.content.has_name("console"));
            }
            _ => panic!("Expected console record"),
        }
    }

    #[test]
    fn test_parse_target_and_log() {
        let parser = MiParser::new();
        let target = parser.parse_line(r#"@"out""#).unwrap().unwrap();
        assert_eq!(target, MiOutputRecord::Stream(StreamRecord::new(StreamKind::Target, "out")));
        let log = parser.parse_line(r#"&"warning: \"x\"\n""#).unwrap().unwrap();
        assert_eq!(
            log,
            MiOutputRecord::Stream(StreamRecord::new(StreamKind::Log, "warning: \"x\"\n"))
        );
    }

    #[test]
    fn test_parse_line_skips_prompt_and_blank() {
        let parser = MiParser::new();
        assert_eq!(parser.parse_line("(gdb) ").unwrap(), None);
        assert_eq!(parser.parse_line("\r\n").unwrap(), None);
        assert_eq!(parser.parse_line("").unwrap(), None);
    }

    #[test]
    fn test_parse_line_unknown_prefix() {
        let parser = MiParser::new();
        assert_eq!(
            parser.parse_line("garbage").unwrap_err(),
            ParseError::UnknownRecord { offset: 0, found: 'g' }
        );
        assert_eq!(
            parser.parse_line("~unquoted").unwrap_err(),
            ParseError::unexpected(1, 'u', "'\"'")
        );
    }

    #[test]
    fn test_record_display_reparses() {
        let parser = MiParser::new();
        for line in [
            r#"12^done,reason="foo""#,
            "^running",
            r#"*stopped,reason="exited",frame={addr="0x0",args=[]}"#,
            r#"=thread-group-added,id="i1""#,
            r#"~"line\n""#,
        ] {
            let record = parser.parse_line(line).unwrap().unwrap();
            assert_eq!(record.to_string(), line);
            let pretty = format!("{:#}", record).replace('\n', " ");
            assert_eq!(parser.parse_line(&pretty).unwrap().unwrap(), record);
        }
    }

    #[test]
    fn test_escape_c_string() {
        let mut out = String::new();
        escape_c_string("tab\there \"q\" \x7f", &mut out).unwrap();
        assert_eq!(out, r#"tab\there \"q\" \177"#);
    }

    fn nested_strategy() -> impl Strategy<Value = Value> {
        let leaf = "[a-z \\\\\"\n]{0,8}".prop_map(Value::constant);
        leaf.prop_recursive(6, 48, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::list),
                prop::collection::vec(("[a-z][a-z0-9-]{0,6}", inner), 0..4).prop_map(|fields| {
                    Value::tuple(
                        fields
                            .into_iter()
                            .map(|(name, value)| value.with_name(name))
                            .collect(),
                    )
                }),
            ]
        })
    }

    proptest! {
        #[test]
        fn test_c_string_round_trip(text in any::<String>()) {
            let rendered = Value::constant(text.clone()).to_string();
            let parsed = Value::parse(&rendered).unwrap();
            prop_assert_eq!(parsed.data(), text.as_str());
        }

        #[test]
        fn test_tree_round_trip(value in nested_strategy(), multiline in any::<bool>()) {
            let rendered = value.to_text(multiline, 0);
            prop_assert_eq!(Value::parse(&rendered).unwrap(), value);
        }
    }
}
