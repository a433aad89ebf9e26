//! GDB/MI value tree
//!
//! Every piece of structured GDB/MI output is a [`Value`]: a quoted constant,
//! a tuple of named results, or a list of values or results. Children keep the
//! order GDB emitted them in, and names may repeat (`frame=...,frame=...`).

use crate::gdb::error::ParseResult;
use crate::gdb::parser::{escape_c_string, ValueParser};
use crate::gdb::types::ParserConfig;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::fmt::{self, Write};
use std::str::FromStr;

/// Returned by [`Value::find_child`] on a miss.
static INVALID: Value = Value {
    name: String::new(),
    kind: ValueKind::Invalid,
};

/// Shape of a value, without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Invalid,
    Const,
    Tuple,
    List,
}

/// Payload of a value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ValueKind {
    /// Absent value, e.g. the result of a failed lookup
    #[default]
    Invalid,
    Const(String),
    Tuple(Vec<Value>),
    List(Vec<Value>),
}

/// A node of a parsed GDB/MI tree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Value {
    name: String,
    kind: ValueKind,
}

impl Value {
    pub fn constant(data: impl Into<String>) -> Self {
        Self {
            name: String::new(),
            kind: ValueKind::Const(data.into()),
        }
    }

    pub fn tuple(children: Vec<Value>) -> Self {
        Self {
            name: String::new(),
            kind: ValueKind::Tuple(children),
        }
    }

    pub fn list(children: Vec<Value>) -> Self {
        Self {
            name: String::new(),
            kind: ValueKind::List(children),
        }
    }

    /// Build the payload of a console, target or log stream record.
    ///
    /// Stream records carry a single c-string, so no grammar is involved.
    pub fn stream_output(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self::constant(content).with_name(name)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Parse a single GDB/MI value (`"..."`, `{...}` or `[...]`).
    ///
    /// Anything after the first complete value is ignored.
    pub fn parse(input: &str) -> ParseResult<Self> {
        Self::parse_with(input, &ParserConfig::default())
    }

    pub fn parse_with(input: &str, config: &ParserConfig) -> ParseResult<Self> {
        ValueParser::new(input, config).parse_value()
    }

    pub fn value_type(&self) -> ValueType {
        match self.kind {
            ValueKind::Invalid => ValueType::Invalid,
            ValueKind::Const(_) => ValueType::Const,
            ValueKind::Tuple(_) => ValueType::Tuple,
            ValueKind::List(_) => ValueType::List,
        }
    }

    pub fn kind(&self) -> &ValueKind {
        &self.kind
    }

    pub fn into_kind(self) -> ValueKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has_name(&self, name: &str) -> bool {
        self.name == name
    }

    pub fn is_valid(&self) -> bool {
        !matches!(self.kind, ValueKind::Invalid)
    }

    pub fn is_const(&self) -> bool {
        matches!(self.kind, ValueKind::Const(_))
    }

    pub fn is_tuple(&self) -> bool {
        matches!(self.kind, ValueKind::Tuple(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(self.kind, ValueKind::List(_))
    }

    /// Constant payload; empty for anything that is not a `Const`.
    pub fn data(&self) -> &str {
        match &self.kind {
            ValueKind::Const(data) => data.as_str(),
            ValueKind::Invalid | ValueKind::Tuple(_) | ValueKind::List(_) => "",
        }
    }

    pub fn children(&self) -> &[Value] {
        match &self.kind {
            ValueKind::Tuple(children) | ValueKind::List(children) => children.as_slice(),
            ValueKind::Invalid | ValueKind::Const(_) => &[],
        }
    }

    pub fn child_count(&self) -> usize {
        self.children().len()
    }

    pub fn child_at(&self, index: usize) -> Option<&Value> {
        self.children().get(index)
    }

    pub fn child_at_mut(&mut self, index: usize) -> Option<&mut Value> {
        match &mut self.kind {
            ValueKind::Tuple(children) | ValueKind::List(children) => children.get_mut(index),
            ValueKind::Invalid | ValueKind::Const(_) => None,
        }
    }

    /// First child called `name`, or an invalid value.
    pub fn find_child(&self, name: &str) -> &Value {
        self.children()
            .iter()
            .find(|child| child.has_name(name))
            .unwrap_or(&INVALID)
    }

    /// Like [`find_child`](Self::find_child), but a miss yields a constant
    /// named `name` holding `default`.
    pub fn find_child_or(&self, name: &str, default: &str) -> Value {
        match self.children().iter().find(|child| child.has_name(name)) {
            Some(child) => child.clone(),
            None => Self::constant(default).with_name(name),
        }
    }

    /// Payload of the first constant child called `name`.
    pub fn find_data(&self, name: &str) -> Option<&str> {
        match &self.find_child(name).kind {
            ValueKind::Const(data) => Some(data.as_str()),
            _ => None,
        }
    }

    /// Render as GDB/MI text.
    ///
    /// With `multiline`, every child goes on its own line, indented two spaces
    /// per level starting from `indent`. The node's own name is not written.
    pub fn to_text(&self, multiline: bool, indent: usize) -> String {
        Text {
            value: self,
            multiline,
            indent,
        }
        .to_string()
    }

    pub(crate) fn write_text<W: Write>(
        &self,
        out: &mut W,
        multiline: bool,
        indent: usize,
    ) -> fmt::Result {
        match &self.kind {
            ValueKind::Invalid => Ok(()),
            ValueKind::Const(data) => {
                out.write_char('"')?;
                escape_c_string(data, out)?;
                out.write_char('"')
            }
            ValueKind::Tuple(children) => {
                write_children(out, children, ('{', '}'), multiline, indent)
            }
            ValueKind::List(children) => {
                write_children(out, children, ('[', ']'), multiline, indent)
            }
        }
    }

    /// Write `name=value`, or just `value` for an anonymous node.
    pub(crate) fn write_result<W: Write>(
        &self,
        out: &mut W,
        multiline: bool,
        indent: usize,
    ) -> fmt::Result {
        if !self.name.is_empty() {
            out.write_str(&self.name)?;
            out.write_char('=')?;
        }
        self.write_text(out, multiline, indent)
    }
}

fn write_children<W: Write>(
    out: &mut W,
    children: &[Value],
    (open, close): (char, char),
    multiline: bool,
    indent: usize,
) -> fmt::Result {
    out.write_char(open)?;
    // Invalid children have no text form and are left out
    let mut written = 0;
    for child in children.iter().filter(|child| child.is_valid()) {
        if written > 0 {
            out.write_char(',')?;
        }
        if multiline {
            out.write_char('\n')?;
            write_indent(out, indent + 1)?;
        }
        child.write_result(out, multiline, indent + 1)?;
        written += 1;
    }
    if multiline && written > 0 {
        out.write_char('\n')?;
        write_indent(out, indent)?;
    }
    out.write_char(close)
}

pub(crate) fn write_indent<W: Write>(out: &mut W, indent: usize) -> fmt::Result {
    for _ in 0..indent {
        out.write_str("  ")?;
    }
    Ok(())
}

/// `{}` is compact text, `{:#}` is the multiline form.
/// `Display` adapter behind [`Value::to_text`]
struct Text<'a> {
    value: &'a Value,
    multiline: bool,
    indent: usize,
}

impl fmt::Display for Text<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.write_text(f, self.multiline, self.indent)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let multiline = f.alternate();
        self.write_text(f, multiline, 0)
    }
}

impl FromStr for Value {
    type Err = crate::gdb::error::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.kind {
            ValueKind::Invalid => serializer.serialize_none(),
            ValueKind::Const(data) => serializer.serialize_str(data),
            ValueKind::Tuple(children) => {
                let mut map = serializer.serialize_map(Some(children.len()))?;
                for child in children {
                    map.serialize_entry(child.name(), child)?;
                }
                map.end()
            }
            ValueKind::List(children) => {
                let mut seq = serializer.serialize_seq(Some(children.len()))?;
                for child in children {
                    if child.name.is_empty() {
                        seq.serialize_element(child)?;
                    } else {
                        seq.serialize_element(&NamedEntry(child))?;
                    }
                }
                seq.end()
            }
        }
    }
}

/// A named list element, serialized as a one-entry object
struct NamedEntry<'a>(&'a Value);

impl Serialize for NamedEntry<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.0.name(), self.0)?;
        map.end()
    }
}
