//! Sequential JSON emitter used to build event fragments.
//!
//! The builder writes keys and values in call order and inserts separators
//! as needed. It performs no structural validation; callers are expected to
//! balance `start_*`/`end_*` calls. String values are escaped through
//! `serde_json` so arbitrary request data cannot break the payload.

use std::fmt::Write;

/// Append-only JSON writer with fixed field order.
#[derive(Debug, Default)]
pub struct JsonBuilder {
    buf: String,
    need_separator: bool,
}

impl JsonBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a `"key":"value"` pair.
    pub fn append_str(&mut self, key: &str, value: &str) -> &mut Self {
        self.write_key(key);
        self.write_string(value);
        self.need_separator = true;
        self
    }

    /// Append a `"key":value` pair with a bare numeric value.
    pub fn append_number(&mut self, key: &str, value: impl Into<i128>) -> &mut Self {
        self.write_key(key);
        // Writing into a String cannot fail.
        let _ = write!(self.buf, "{}", value.into());
        self.need_separator = true;
        self
    }

    /// Open an object, named when `key` is `Some`.
    pub fn start_object(&mut self, key: Option<&str>) -> &mut Self {
        self.open(key, '{')
    }

    pub fn end_object(&mut self) -> &mut Self {
        self.close('}')
    }

    /// Open an array, named when `key` is `Some`.
    pub fn start_array(&mut self, key: Option<&str>) -> &mut Self {
        self.open(key, '[')
    }

    pub fn end_array(&mut self) -> &mut Self {
        self.close(']')
    }

    /// Append an already-serialized JSON value as the next element.
    pub fn append_raw(&mut self, fragment: &str) -> &mut Self {
        self.separate();
        self.buf.push_str(fragment);
        self.need_separator = true;
        self
    }

    /// Consume the builder and return the accumulated text.
    pub fn finish(self) -> String {
        self.buf
    }

    fn open(&mut self, key: Option<&str>, delimiter: char) -> &mut Self {
        match key {
            Some(key) => self.write_key(key),
            None => self.separate(),
        }
        self.buf.push(delimiter);
        self.need_separator = false;
        self
    }

    fn close(&mut self, delimiter: char) -> &mut Self {
        self.buf.push(delimiter);
        self.need_separator = true;
        self
    }

    fn write_key(&mut self, key: &str) {
        self.separate();
        self.write_string(key);
        self.buf.push(':');
    }

    fn write_string(&mut self, value: &str) {
        let _ = write!(self.buf, "{}", serde_json::Value::from(value));
    }

    fn separate(&mut self) {
        if self.need_separator {
            self.buf.push(',');
        }
    }
}
