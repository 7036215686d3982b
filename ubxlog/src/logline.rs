use crate::frame::Frame;
use crate::report::Report;

/// Marker in a log line carrying a message received from the device.
pub const RESPONSE_MARKER: &str = "U_GNSS: decoded UBX response";

/// Marker in a log line carrying a message sent to the device.
pub const COMMAND_MARKER: &str = "U_GNSS: sent command";

// Character positions inside the text after the response marker:
//
//   " 0x0a 0x06: 01 05 00 ...[body 120 byte(s)]."
//
// class and id sit in the first 10 characters, the body bytes start at
// character 11, three characters per byte.
const CLASS_ID_CHARS: usize = 10;
const BODY_CHARS_START: usize = 11;
const CHARS_PER_BYTE: usize = 3;

/// The string introducing the body length.
const BODY_LENGTH_MARKER: &str = "body ";

/// Rebuild a full frame from a "decoded UBX response" log line.
///
/// `text` is everything after [RESPONSE_MARKER], trailing newline removed.
/// The line carries class, id and body in hex but neither sync characters,
/// length nor checksum; those are reconstructed here.
///
/// Any problem is reported against `line_number` and yields the empty
/// frame, except a bad body token: the body conversion is one batch, so a
/// single bad token empties the whole body while the declared length stays
/// in the header, and the short frame is still produced. Consumers that
/// need to spot such frames can compare [Frame::declared_len] against
/// [Frame::body].
pub fn decode_response_line<R>(line_number: usize, text: &str, report: &mut R) -> Frame
where
    R: Report,
{
    // class and id, from the first 10 characters: " 0x0a 0x06"
    let head: String = text.chars().take(CLASS_ID_CHARS).collect();
    let (class, id) = match batch_hex(head.split(" 0x")).as_deref() {
        Some(&[class, id]) => (class, id),
        _ => {
            report.warn(
                line_number,
                &format!("couldn't find message class/ID in \"{}\"", text),
            );
            return Frame::empty();
        }
    };

    // the body length is the only all-digit token after "body "
    let Some(length_at) = text.find(BODY_LENGTH_MARKER) else {
        report.warn(line_number, &format!("couldn't find \"body\" in \"{}\"", text));
        return Frame::empty();
    };
    let mut lengths = text[length_at..]
        .split_whitespace()
        .filter(|t| t.chars().all(|c| c.is_ascii_digit()) && !t.is_empty());
    let declared_len = match (lengths.next(), lengths.next()) {
        (Some(one), None) => one.parse::<u16>().ok(),
        _ => None,
    };
    let Some(declared_len) = declared_len else {
        report.warn(
            line_number,
            &format!("couldn't find body length in \"{}\"", text),
        );
        return Frame::empty();
    };

    // the body hex spans three characters per declared byte; conversion is
    // all or nothing, so one bad token means no body bytes at all
    let window: String = text
        .chars()
        .skip(BODY_CHARS_START)
        .take(CHARS_PER_BYTE * declared_len as usize)
        .collect();
    let body = match batch_hex(window.split_whitespace()) {
        Some(body) => body,
        None => {
            report.warn(
                line_number,
                &format!("found non-hex value in body of \"{}\"", text),
            );
            Vec::new()
        }
    };

    Frame::from_parts(class, id, declared_len, &body)
}

/// Transcribe a "sent command" log line, which already carries the whole
/// frame in hex.
///
/// Only the first two characters of each token count, so the period the
/// logger puts after the last byte is tolerated. A bad token fails the
/// whole conversion and yields the empty frame, with a warning against
/// `line_number`.
pub fn decode_command_line<R>(line_number: usize, text: &str, report: &mut R) -> Frame
where
    R: Report,
{
    let bytes: Option<Vec<u8>> = text
        .split_whitespace()
        .map(|t| {
            let head: String = t.chars().take(2).collect();
            u8::from_str_radix(&head, 16).ok()
        })
        .collect();

    match bytes {
        Some(bytes) => Frame::from_raw(bytes),
        None => {
            report.warn(
                line_number,
                &format!("found non-hex value in sent line \"{}\"", text),
            );
            Frame::empty()
        }
    }
}

/// Convert hex tokens as one batch: any bad token fails the lot.
fn batch_hex<'a, I>(tokens: I) -> Option<Vec<u8>>
where
    I: Iterator<Item = &'a str>,
{
    tokens
        .filter(|t| !t.is_empty())
        .map(|t| u8::from_str_radix(t, 16).ok())
        .collect()
}
