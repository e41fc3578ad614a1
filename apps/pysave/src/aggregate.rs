//! Parse delimiter-formatted linter output into a `DiagnosticIndex`.
//!
//! Both linters are invoked with a message template that prints one finding
//! per line as `line || column || code || message`. Lines that do not carry
//! all four fields (blank lines, banners, summaries) are skipped.

use crate::models::{Diagnostic, DiagnosticIndex};

/// Field separator used in the linter message templates.
pub const DELIMITER: &str = " || ";

/// Parse `raw` and append every well-formed finding to `index`.
///
/// The message field is the remainder of the line, so a message that itself
/// contains the delimiter is kept whole.
pub fn parse_tool_output(index: &mut DiagnosticIndex, raw: &str, delimiter: &str) {
    for line in raw.lines() {
        let fields: Vec<&str> = line.splitn(4, delimiter).collect();
        let [line_no, column, code, message] = fields.as_slice() else {
            continue;
        };
        index.push(Diagnostic {
            line: lenient_int(line_no),
            column: column.to_string(),
            code: code.to_string(),
            message: message.to_string(),
        });
    }
}

/// Read a leading integer the way the editor's scripting layer does:
/// skip leading whitespace, accept an optional sign and the longest run of
/// digits, and fall back to 0 when there are none.
///
/// Non-numeric input is not rejected; such findings land on line 0.
pub fn lenient_int(s: &str) -> i64 {
    let s = s.trim_start();
    let (neg, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let mut n: i64 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        n = n.saturating_mul(10).saturating_add(i64::from(b - b'0'));
    }
    if neg {
        -n
    } else {
        n
    }
}
