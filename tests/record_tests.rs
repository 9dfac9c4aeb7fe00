//! Tests for the log record codec
//!
//! These tests verify:
//! - Round-trips for awkward keys and values
//! - Compatibility with plain `key,value` lines
//! - Rejection of malformed records

use ledgerkv::logfile::{decode, encode, LogRecord};

// =============================================================================
// Round-trip Tests
// =============================================================================

#[test]
fn test_roundtrip_awkward_strings() {
    let samples = [
        "",
        " ",
        "plain",
        "a,b",
        ",",
        "\"",
        "\"\"",
        "quote \"inside\" text",
        "line1\nline2",
        "\n",
        "\r\n",
        "trailing\r",
        "  leading spaces",
        "\ttab",
        "mixed, \"all\"\nof\r\nit,",
        "unicode: héllo, 世界",
    ];

    for key in samples.iter() {
        for value in samples.iter() {
            let bytes = encode(key, value);
            let record = decode(&bytes).unwrap_or_else(|e| {
                panic!("decode failed for key {:?} value {:?}: {}", key, value, e)
            });
            assert_eq!(record, LogRecord::new(*key, *value));
        }
    }
}

#[test]
fn test_encoded_record_ends_with_single_terminator() {
    let bytes = encode("k", "multi\nline");
    assert_eq!(bytes.last(), Some(&b'\n'));
    assert_eq!(LogRecord::new("k", "multi\nline").encode(), bytes);
}

// =============================================================================
// Plain Format Tests
// =============================================================================

#[test]
fn test_decode_plain_line() {
    assert_eq!(decode(b"a,1\n").unwrap(), LogRecord::new("a", "1"));
}

#[test]
fn test_decode_empty_value() {
    assert_eq!(decode(b"key,\n").unwrap(), LogRecord::new("key", ""));
}

#[test]
fn test_decode_quoted_fields() {
    let record = decode(b"\"a,b\",\"say \"\"hi\"\"\"\n").unwrap();
    assert_eq!(record, LogRecord::new("a,b", "say \"hi\""));
}

// =============================================================================
// Corruption Tests
// =============================================================================

#[test]
fn test_decode_rejects_single_field() {
    assert!(decode(b"onlykey\n").is_err());
}

#[test]
fn test_decode_rejects_three_fields() {
    assert!(decode(b"a,b,c\n").is_err());
}

#[test]
fn test_decode_rejects_empty_line() {
    assert!(decode(b"\n").is_err());
}

#[test]
fn test_decode_rejects_bare_quote() {
    assert!(decode(b"a,b\"c\n").is_err());
}

#[test]
fn test_decode_rejects_unterminated_quote() {
    assert!(decode(b"a,\"never closed\n").is_err());
}

#[test]
fn test_decode_rejects_garbage_after_closing_quote() {
    assert!(decode(b"a,\"x\"y\n").is_err());
}

#[test]
fn test_decode_rejects_trailing_record() {
    assert!(decode(b"a,1\nb,2\n").is_err());
}

#[test]
fn test_decode_rejects_invalid_utf8() {
    assert!(decode(b"a,\xff\xfe\n").is_err());
}
