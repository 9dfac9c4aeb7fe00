//! Log record codec
//!
//! One record is one logical CSV line: `key,value\n`.
//!
//! A field is written bare unless it contains a comma, a double quote, a
//! carriage return or a newline, or starts with a space or tab. Such fields
//! are wrapped in double quotes with inner quotes doubled, so
//! `he said "hi",\n` becomes `"he said ""hi"",\n"`. Quoted fields may span
//! physical lines.

use crate::error::CorruptRecord;

/// Record terminator
pub const TERMINATOR: u8 = b'\n';

const DELIMITER: u8 = b',';
const QUOTE: u8 = b'"';

/// A single (key, value) pair stored in the log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub key: String,
    pub value: String,
}

impl LogRecord {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Serialize this record, terminator included
    pub fn encode(&self) -> Vec<u8> {
        encode(&self.key, &self.value)
    }
}

/// Encode a key/value pair as a single terminated record
pub fn encode(key: &str, value: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(key.len() + value.len() + 4);
    write_field(&mut out, key);
    out.push(DELIMITER);
    write_field(&mut out, value);
    out.push(TERMINATOR);
    out
}

/// Decode exactly one record from `bytes`
///
/// The terminator is optional; anything after it is an error.
pub fn decode(bytes: &[u8]) -> Result<LogRecord, CorruptRecord> {
    match scan(bytes, true) {
        Scan::Complete { fields, consumed } if consumed == bytes.len() => into_record(fields),
        Scan::Complete { consumed, .. } => Err(CorruptRecord::new(format!(
            "{} trailing bytes after record terminator",
            bytes.len() - consumed
        ))),
        Scan::NeedMore => Err(CorruptRecord::new("unterminated quoted field")),
        Scan::Corrupt(e) => Err(e),
    }
}

fn needs_quotes(field: &str) -> bool {
    field.starts_with([' ', '\t'])
        || field
            .bytes()
            .any(|b| matches!(b, DELIMITER | QUOTE | b'\r' | b'\n'))
}

fn write_field(out: &mut Vec<u8>, field: &str) {
    if !needs_quotes(field) {
        out.extend_from_slice(field.as_bytes());
        return;
    }

    out.push(QUOTE);
    for &b in field.as_bytes() {
        if b == QUOTE {
            out.push(QUOTE);
        }
        out.push(b);
    }
    out.push(QUOTE);
}

// =============================================================================
// Scanning
// =============================================================================

/// Outcome of scanning a buffer for one record
#[derive(Debug)]
pub(crate) enum Scan {
    /// A full record; `consumed` includes the terminator if present
    Complete { fields: Vec<Vec<u8>>, consumed: usize },

    /// The buffer ends inside a quoted field
    NeedMore,

    Corrupt(CorruptRecord),
}

/// Scan the first record out of `buf`
///
/// With `at_eof` false, a record is only complete once its terminator has
/// been seen; with `at_eof` true, the end of the buffer also ends it.
pub(crate) fn scan(buf: &[u8], at_eof: bool) -> Scan {
    let mut fields = Vec::with_capacity(2);
    let mut i = 0;

    loop {
        let mut field = Vec::new();

        if buf.get(i) == Some(&QUOTE) {
            i += 1;
            loop {
                match buf.get(i) {
                    None => return Scan::NeedMore,
                    Some(&QUOTE) if buf.get(i + 1) == Some(&QUOTE) => {
                        field.push(QUOTE);
                        i += 2;
                    }
                    Some(&QUOTE) => {
                        i += 1;
                        break;
                    }
                    Some(&b) => {
                        field.push(b);
                        i += 1;
                    }
                }
            }

            match buf.get(i) {
                Some(&DELIMITER) => {
                    fields.push(field);
                    i += 1;
                    continue;
                }
                Some(&TERMINATOR) => {
                    fields.push(field);
                    return Scan::Complete { fields, consumed: i + 1 };
                }
                Some(&b'\r') if buf.get(i + 1) == Some(&TERMINATOR) => {
                    fields.push(field);
                    return Scan::Complete { fields, consumed: i + 2 };
                }
                Some(&b'\r') if i + 1 == buf.len() => {
                    if !at_eof {
                        return Scan::NeedMore;
                    }
                    fields.push(field);
                    return Scan::Complete { fields, consumed: i + 1 };
                }
                Some(&b) => {
                    return Scan::Corrupt(CorruptRecord::new(format!(
                        "unexpected byte 0x{:02x} after closing quote",
                        b
                    )))
                }
                None if at_eof => {
                    fields.push(field);
                    return Scan::Complete { fields, consumed: i };
                }
                None => return Scan::NeedMore,
            }
        }

        loop {
            match buf.get(i) {
                Some(&DELIMITER) => {
                    fields.push(field);
                    i += 1;
                    break;
                }
                Some(&TERMINATOR) => {
                    if field.last() == Some(&b'\r') {
                        field.pop();
                    }
                    fields.push(field);
                    return Scan::Complete { fields, consumed: i + 1 };
                }
                Some(&QUOTE) => {
                    return Scan::Corrupt(CorruptRecord::new("bare quote in unquoted field"))
                }
                Some(&b) => {
                    field.push(b);
                    i += 1;
                }
                None if at_eof => {
                    // A lone CR at end of file is half of a CRLF terminator
                    if field.last() == Some(&b'\r') {
                        field.pop();
                    }
                    fields.push(field);
                    return Scan::Complete { fields, consumed: i };
                }
                None => return Scan::NeedMore,
            }
        }
    }
}

/// Turn scanned fields into a record
pub(crate) fn into_record(fields: Vec<Vec<u8>>) -> Result<LogRecord, CorruptRecord> {
    if fields.len() != 2 {
        return Err(CorruptRecord::new(format!(
            "expected 2 fields, found {}",
            fields.len()
        )));
    }

    let mut fields = fields.into_iter();
    let mut next_string = |name: &str| {
        let bytes = fields.next().unwrap_or_default();
        String::from_utf8(bytes)
            .map_err(|e| CorruptRecord::new(format!("{} is not valid UTF-8: {}", name, e)))
    };

    let key = next_string("key")?;
    let value = next_string("value")?;
    Ok(LogRecord { key, value })
}
