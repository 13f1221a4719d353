//! Escape sequence sub-state.
//!
//! When a string sees its escape introducer, the lexer records the string
//! state in an [`EscapeSequence`], switches to its escape style, and steps
//! past the introducer and the escape letter. Each following byte goes
//! through [`EscapeSequence::at_end`]. Once that reports the end, the lexer
//! restores [`EscapeSequence::outer`] *without* advancing, so the
//! terminating byte is scanned once more in the string state.

use crate::char_class::is_digit;

/// Budget for a single-character escape such as `\n`.
pub const SIMPLE: u8 = 1;
/// Budget for `\xHH` and three-digit octal escapes (letter included).
pub const HEX_PAIR: u8 = 3;
/// Budget for `\uHHHH`.
pub const UNICODE_SHORT: u8 = 5;
/// Budget for `\u{HHHHHH}` (up to six digits plus the brace).
pub const UNICODE_BRACED: u8 = 7;
/// Budget for `\UHHHHHHHH`.
pub const UNICODE_LONG: u8 = 9;

/// In-flight escape: the state to return to and the digits still allowed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EscapeSequence<S> {
    /// State the escape returns to.
    pub outer: S,
    /// Remaining bytes the escape may still consume.
    pub digits_left: u8,
    /// Radix the remaining digits are validated against.
    pub radix: u32,
    /// Set for `\u{...}`; the closing brace belongs to the escape.
    pub brace: bool,
}

impl<S: Copy> EscapeSequence<S> {
    pub fn new(outer: S) -> Self {
        Self {
            outer,
            digits_left: 0,
            radix: 16,
            brace: false,
        }
    }

    /// Start an escape inside `outer` allowing `budget` bytes in `radix`.
    pub fn enter(&mut self, outer: S, budget: u8, radix: u32) {
        self.outer = outer;
        self.digits_left = budget;
        self.radix = radix;
        self.brace = false;
    }

    /// Consume the budget for `ch`. Returns `true` when `ch` is not part of
    /// the escape (budget spent or not a digit).
    pub fn at_end(&mut self, ch: u8) -> bool {
        self.digits_left = self.digits_left.saturating_sub(1);
        self.digits_left == 0 || !is_digit(ch, self.radix)
    }
}

#[cfg(test)]
mod tests;
