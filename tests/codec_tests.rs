//! Codec Tests
//!
//! Tests for command and response encoding/decoding.

use std::io::Cursor;

use ledgerkv::protocol::{
    decode_command, decode_response, encode_command, encode_response, read_command,
    read_response, write_command, write_response, Command, Response, Status, HEADER_SIZE,
    MAX_PAYLOAD_SIZE,
};
use ledgerkv::{LedgerError, RequestError};

// =============================================================================
// Command Encoding/Decoding Tests
// =============================================================================

#[test]
fn test_encode_decode_get() {
    let cmd = Command::Get {
        key: "hello".to_string(),
    };
    let decoded = decode_command(&encode_command(&cmd)).unwrap();
    assert_eq!(decoded, cmd);
}

#[test]
fn test_encode_decode_set_with_awkward_value() {
    let cmd = Command::Set {
        key: "mykey".to_string(),
        value: "a,b\n\"c\"\0".to_string(),
    };
    let decoded = decode_command(&encode_command(&cmd)).unwrap();
    assert_eq!(decoded, cmd);
}

#[test]
fn test_encode_decode_set_empty_value() {
    let cmd = Command::Set {
        key: "k".to_string(),
        value: String::new(),
    };
    let decoded = decode_command(&encode_command(&cmd)).unwrap();
    assert_eq!(decoded, cmd);
}

#[test]
fn test_encode_decode_ping() {
    let encoded = encode_command(&Command::Ping);
    assert_eq!(encoded.len(), HEADER_SIZE);
    assert_eq!(decode_command(&encoded).unwrap(), Command::Ping);
}

#[test]
fn test_get_wire_layout() {
    let encoded = encode_command(&Command::Get {
        key: "ab".to_string(),
    });
    assert_eq!(
        &encoded[..],
        &[0x01, 0, 0, 0, 6, 0, 0, 0, 2, b'a', b'b'][..]
    );
}

#[test]
fn test_decode_unknown_command() {
    let err = decode_command(&[0x7f, 0, 0, 0, 0]).unwrap_err();
    assert!(matches!(err, LedgerError::Protocol(_)));
}

#[test]
fn test_decode_incomplete_header() {
    assert!(matches!(
        decode_command(&[0x01, 0, 0]),
        Err(LedgerError::Protocol(_))
    ));
}

#[test]
fn test_decode_incomplete_payload() {
    assert!(matches!(
        decode_command(&[0x01, 0, 0, 0, 10, 0, 0]),
        Err(LedgerError::Protocol(_))
    ));
}

#[test]
fn test_decode_key_length_overflow() {
    // key_len says 100 but only 1 byte follows
    let frame = [0x01, 0, 0, 0, 5, 0, 0, 0, 100, b'x'];
    assert!(matches!(decode_command(&frame), Err(LedgerError::Protocol(_))));
}

#[test]
fn test_decode_rejects_invalid_utf8_key() {
    let frame = [0x01, 0, 0, 0, 6, 0, 0, 0, 2, 0xff, 0xfe];
    assert!(matches!(decode_command(&frame), Err(LedgerError::Protocol(_))));
}

#[test]
fn test_decode_rejects_oversized_payload() {
    let len = (MAX_PAYLOAD_SIZE + 1).to_be_bytes();
    let frame = [0x02, len[0], len[1], len[2], len[3]];
    assert!(matches!(decode_command(&frame), Err(LedgerError::Protocol(_))));
}

#[test]
fn test_decode_ping_with_payload() {
    let frame = [0x03, 0, 0, 0, 1, b'x'];
    assert!(matches!(decode_command(&frame), Err(LedgerError::Protocol(_))));
}

// =============================================================================
// Response Encoding/Decoding Tests
// =============================================================================

#[test]
fn test_encode_decode_ok_with_value() {
    let response = Response::ok(Some("value".to_string()));
    let decoded = decode_response(&encode_response(&response)).unwrap();
    assert_eq!(decoded, response);
}

#[test]
fn test_ok_without_payload_decodes_as_empty_value() {
    let decoded = decode_response(&encode_response(&Response::ok(None))).unwrap();
    assert_eq!(decoded.status, Status::Ok);
    assert_eq!(decoded.into_result(), Ok(Some(String::new())));
}

#[test]
fn test_encode_decode_not_found() {
    let decoded = decode_response(&encode_response(&Response::not_found())).unwrap();
    assert_eq!(decoded, Response::not_found());
    assert_eq!(decoded.into_result(), Err(RequestError::NotFound));
}

#[test]
fn test_encode_decode_errors() {
    let invalid = Response::from_error(&RequestError::InvalidKey);
    let internal = Response::from_error(&RequestError::Internal("disk on fire".to_string()));

    let invalid = decode_response(&encode_response(&invalid)).unwrap();
    let internal = decode_response(&encode_response(&internal)).unwrap();

    assert_eq!(invalid.status, Status::InvalidKey);
    assert_eq!(invalid.into_result(), Err(RequestError::InvalidKey));
    assert_eq!(internal.status, Status::Internal);
    assert!(matches!(
        internal.into_result(),
        Err(RequestError::Internal(ref msg)) if msg.contains("disk on fire")
    ));
}

#[test]
fn test_decode_unknown_status() {
    assert!(matches!(
        decode_response(&[0x09, 0, 0, 0, 0]),
        Err(LedgerError::Protocol(_))
    ));
}

// =============================================================================
// Stream I/O Tests
// =============================================================================

#[test]
fn test_stream_commands_back_to_back() {
    let mut buf = Vec::new();
    let commands = vec![
        Command::Set {
            key: "a".to_string(),
            value: "1".to_string(),
        },
        Command::Get {
            key: "a".to_string(),
        },
        Command::Ping,
    ];
    for cmd in &commands {
        write_command(&mut buf, cmd).unwrap();
    }

    let mut cursor = Cursor::new(buf);
    for cmd in &commands {
        assert_eq!(&read_command(&mut cursor).unwrap(), cmd);
    }

    let err = read_command(&mut cursor).unwrap_err();
    assert!(matches!(err, LedgerError::Io(ref e) if e.kind() == std::io::ErrorKind::UnexpectedEof));
}

#[test]
fn test_stream_response() {
    let mut buf = Vec::new();
    let response = Response::ok(Some("multi\nline".to_string()));
    write_response(&mut buf, &response).unwrap();

    let decoded = read_response(&mut Cursor::new(buf)).unwrap();
    assert_eq!(decoded, response);
}

#[test]
fn test_stream_truncated_payload() {
    let mut buf = encode_response(&Response::ok(Some("value".to_string()))).to_vec();
    buf.truncate(buf.len() - 2);

    let err = read_response(&mut Cursor::new(buf)).unwrap_err();
    assert!(matches!(err, LedgerError::Io(_)));
}

#[test]
fn test_write_command_rejects_oversized_payload() {
    let cmd = Command::Set {
        key: "k".to_string(),
        value: "x".repeat(MAX_PAYLOAD_SIZE as usize),
    };
    let mut buf = Vec::new();

    let err = write_command(&mut buf, &cmd).unwrap_err();

    assert!(matches!(err, LedgerError::Protocol(_)));
    assert!(buf.is_empty());
}
