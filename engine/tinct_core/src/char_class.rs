//! Byte classification predicates shared by every lexer.
//!
//! Scanning works on bytes. Every byte `>= 0x80` counts as an identifier
//! byte so a UTF-8 sequence inside a word keeps the word's style; no lexer
//! in this workspace needs finer Unicode classes than that.
//!
//! All predicates are `const fn` so language tables can build on them in
//! constant context.

/// `\r` or `\n`.
#[inline]
pub const fn is_eol(ch: u8) -> bool {
    ch == b'\r' || ch == b'\n'
}

/// Space, tab, and the ASCII line/page separators (`0x09..=0x0D`).
#[inline]
pub const fn is_space_char(ch: u8) -> bool {
    ch == b' ' || (ch >= 0x09 && ch <= 0x0D)
}

#[inline]
pub const fn is_space_or_tab(ch: u8) -> bool {
    ch == b' ' || ch == b'\t'
}

#[inline]
pub const fn is_ascii_digit(ch: u8) -> bool {
    ch.is_ascii_digit()
}

#[inline]
pub const fn is_hex_digit(ch: u8) -> bool {
    ch.is_ascii_hexdigit()
}

#[inline]
pub const fn is_octal_digit(ch: u8) -> bool {
    ch >= b'0' && ch <= b'7'
}

/// Returns `true` if `ch` is a digit in `radix`.
///
/// Supports radix 2 through 36, with letters in either case. A radix of 0
/// is treated as 10, matching escape trackers that never set a base.
#[inline]
pub const fn is_digit(ch: u8, radix: u32) -> bool {
    let radix = if radix == 0 { 10 } else { radix };
    let value = match ch {
        b'0'..=b'9' => (ch - b'0') as u32,
        b'a'..=b'z' => (ch - b'a') as u32 + 10,
        b'A'..=b'Z' => (ch - b'A') as u32 + 10,
        _ => return false,
    };
    value < radix
}

#[inline]
pub const fn is_upper_case(ch: u8) -> bool {
    ch.is_ascii_uppercase()
}

#[inline]
pub const fn is_lower_case(ch: u8) -> bool {
    ch.is_ascii_lowercase()
}

#[inline]
pub const fn is_alpha_numeric(ch: u8) -> bool {
    ch.is_ascii_alphanumeric()
}

/// ASCII letter, `_`, or any non-ASCII byte.
#[inline]
pub const fn is_identifier_start(ch: u8) -> bool {
    ch.is_ascii_alphabetic() || ch == b'_' || ch >= 0x80
}

/// ASCII letter or digit, `_`, or any non-ASCII byte.
#[inline]
pub const fn is_identifier_char(ch: u8) -> bool {
    ch.is_ascii_alphanumeric() || ch == b'_' || ch >= 0x80
}

/// Printable ASCII punctuation (`!`..`~` minus letters and digits).
#[inline]
pub const fn is_graphic(ch: u8) -> bool {
    ch > b' ' && ch < 0x7F && !ch.is_ascii_alphanumeric()
}

/// The operator set used by the simple table-driven lexers.
#[inline]
pub const fn is_operator(ch: u8) -> bool {
    matches!(
        ch,
        b'%' | b'^'
            | b'&'
            | b'*'
            | b'('
            | b')'
            | b'-'
            | b'+'
            | b'='
            | b'|'
            | b'{'
            | b'}'
            | b'['
            | b']'
            | b':'
            | b';'
            | b'<'
            | b'>'
            | b','
            | b'/'
            | b'?'
            | b'!'
            | b'.'
            | b'~'
    )
}

/// A number starts at a digit, or at `.` directly followed by a digit.
#[inline]
pub const fn is_number_start(ch: u8, next: u8) -> bool {
    ch.is_ascii_digit() || (ch == b'.' && next.is_ascii_digit())
}

/// Returns `true` while `ch` still continues a decimal (or prefixed) number
/// literal whose previous byte was `prev`.
///
/// Accepts digits, letters (hex digits, radix prefixes, suffixes), `_`
/// separators, a `.` followed by a digit, and a sign directly after an
/// exponent marker.
#[inline]
pub const fn is_decimal_number(prev: u8, ch: u8, next: u8) -> bool {
    if ch.is_ascii_alphanumeric() || ch == b'_' {
        return true;
    }
    if ch == b'.' {
        return next.is_ascii_digit();
    }
    (ch == b'+' || ch == b'-') && (prev == b'e' || prev == b'E' || prev == b'p' || prev == b'P')
}

/// Bytes after which `identifier:` reads as a jump label rather than a
/// map key or a ternary branch.
#[inline]
pub const fn is_jump_label_prev_char(ch: u8) -> bool {
    ch == 0 || ch == b';' || ch == b'{' || ch == b'}'
}

/// Bytes that terminate a URL embedded in a string.
#[inline]
pub const fn is_invalid_url_char(ch: u8) -> bool {
    ch <= b' '
        || matches!(
            ch,
            b'"' | b'\'' | b'<' | b'>' | b'\\' | b'^' | b'`' | b'{' | b'|' | b'}' | 0x7F
        )
}

/// ASCII lowercase of a single byte; non-letters pass through.
#[inline]
pub const fn to_lower(ch: u8) -> u8 {
    ch.to_ascii_lowercase()
}
