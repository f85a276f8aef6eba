//! Indented `name: value` pretty printing.
//!
//! Each `add` appends one line. Text is double quoted, characters single
//! quoted, absent values print as `null`, and [`Indentable`] values recurse
//! one indentation level deeper under a bare `name:` line:
//!
//! ```text
//! name: "Pebbles"
//! age: 1
//! parent1:
//!   name: "Wilma"
//! description: null
//! ```

use std::fmt;

use crate::config::FieldsConfig;

/// A value that prints its own fields, one level deeper than its owner.
pub trait Indentable {
    fn add_fields_to(&self, builder: &mut ToStringBuilder);
}

/// How a value appends itself to a [`ToStringBuilder`].
///
/// The default prints the `Debug` form unquoted, which suits numbers and
/// booleans. Nested structures override it to call
/// [`ToStringBuilder::add_nested`].
pub trait Describe: fmt::Debug {
    fn describe_to(&self, name: &str, builder: &mut ToStringBuilder) {
        builder.add_plain(name, format_args!("{self:?}"));
    }
}

impl Describe for str {
    fn describe_to(&self, name: &str, builder: &mut ToStringBuilder) {
        builder.add_quoted(name, self, '"');
    }
}

impl Describe for String {
    fn describe_to(&self, name: &str, builder: &mut ToStringBuilder) {
        builder.add_quoted(name, self, '"');
    }
}

impl Describe for char {
    fn describe_to(&self, name: &str, builder: &mut ToStringBuilder) {
        let mut buf = [0u8; 4];
        builder.add_quoted(name, self.encode_utf8(&mut buf), '\'');
    }
}

impl<T: Describe> Describe for Option<T> {
    fn describe_to(&self, name: &str, builder: &mut ToStringBuilder) {
        match self {
            Some(value) => value.describe_to(name, builder),
            None => {
                builder.add_null(name);
            }
        }
    }
}

impl<T: Describe + ?Sized> Describe for &T {
    fn describe_to(&self, name: &str, builder: &mut ToStringBuilder) {
        (**self).describe_to(name, builder);
    }
}

impl<T: Describe + ?Sized> Describe for Box<T> {
    fn describe_to(&self, name: &str, builder: &mut ToStringBuilder) {
        (**self).describe_to(name, builder);
    }
}

impl<T: fmt::Debug> Describe for Vec<T> {}

macro_rules! describe_plain {
    ($($t:ty),* $(,)?) => {
        $(impl Describe for $t {})*
    };
}

describe_plain!(
    bool, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
);

/// Append `indentation` spaces.
pub fn add_indentation(buffer: &mut String, indentation: usize) {
    buffer.extend(std::iter::repeat_n(' ', indentation));
}

/// Append `text` wrapped in `quote`.
pub fn add_quoted_to(buffer: &mut String, text: &str, quote: char) {
    buffer.push(quote);
    buffer.push_str(text);
    buffer.push(quote);
}

/// Accumulates indented `name: value` lines.
#[derive(Debug, Clone)]
pub struct ToStringBuilder {
    buffer: String,
    prefix: String,
    indent: usize,
    indent_size: usize,
    null_text: String,
}

impl Default for ToStringBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ToStringBuilder {
    pub fn new() -> Self {
        Self::with_config(None, &FieldsConfig::default())
    }

    /// A builder whose output is headed by `prefix:` with every line indented.
    pub fn with_prefix(prefix: &str) -> Self {
        Self::with_config(Some(prefix), &FieldsConfig::default())
    }

    pub fn with_config(prefix: Option<&str>, config: &FieldsConfig) -> Self {
        let prefix = prefix.map(str::trim).unwrap_or_default().to_string();
        let indent = if prefix.is_empty() {
            0
        } else {
            config.indent_size
        };
        Self {
            buffer: String::new(),
            prefix,
            indent,
            indent_size: config.indent_size,
            null_text: config.null_text.clone(),
        }
    }

    pub fn indent(&mut self) -> &mut Self {
        self.indent += self.indent_size;
        self
    }

    pub fn outdent(&mut self) -> &mut Self {
        self.indent = self.indent.saturating_sub(self.indent_size);
        self
    }

    /// Append `value` under `name`, dispatching on how the value describes itself.
    pub fn add<V: Describe + ?Sized>(&mut self, name: &str, value: &V) -> &mut Self {
        value.describe_to(name, self);
        self
    }

    pub fn add_null(&mut self, name: &str) -> &mut Self {
        self.start_entry(name);
        self.buffer.push(' ');
        self.buffer.push_str(&self.null_text);
        self
    }

    pub fn add_quoted(&mut self, name: &str, text: &str, quote: char) -> &mut Self {
        self.start_entry(name);
        self.buffer.push(' ');
        add_quoted_to(&mut self.buffer, text, quote);
        self
    }

    pub fn add_plain(&mut self, name: &str, value: impl fmt::Display) -> &mut Self {
        use std::fmt::Write;

        self.start_entry(name);
        let _ = write!(self.buffer, " {value}");
        self
    }

    pub fn add_nested(&mut self, name: &str, value: &dyn Indentable) -> &mut Self {
        self.start_entry(name);
        self.indent();
        value.add_fields_to(self);
        self.outdent();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    fn start_entry(&mut self, name: &str) {
        if !self.buffer.is_empty() {
            self.buffer.push('\n');
        }
        add_indentation(&mut self.buffer, self.indent);
        self.buffer.push_str(name);
        self.buffer.push(':');
    }
}

impl fmt::Display for ToStringBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.indent == 0 {
            f.write_str(&self.buffer)
        } else {
            write!(f, "{}:\n{}", self.prefix, self.buffer)
        }
    }
}
