//! Per-line packed state.
//!
//! A line's packed state is the only thing carried from one scan pass to
//! the next. Decoding line N's state and starting line N+1 from it must
//! reproduce exactly what a whole-document scan produces, so every
//! language describes its state as an explicit struct and converts it with
//! an `encode`/`decode` pair built from [`BitWriter`] and [`BitReader`].
//! Field widths are fixed per language; a decoder rejects any bit pattern
//! its encoder cannot produce.

use bitflags::bitflags;

use crate::error::DecodeError;
use crate::style::Style;

bitflags! {
    /// Line categories published with every line state. The fold pass reads
    /// `LINE_COMMENT` and `IMPORT`.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct LineFlags: u8 {
        /// Nothing on the line but a line comment.
        const LINE_COMMENT = 1 << 0;
        /// The line is an import/include/part directive.
        const IMPORT = 1 << 1;
        /// The line ends inside a multi-line construct.
        const MULTILINE = 1 << 2;
        /// Whitespace only.
        const BLANK = 1 << 3;
    }
}

/// A language's decoded per-line state.
pub trait LineState: Sized + Clone + Default + PartialEq + std::fmt::Debug {
    type Style: Style;

    /// Pack into the host's per-line integer.
    fn encode(&self) -> u32;

    /// Inverse of [`LineState::encode`].
    fn decode(raw: u32) -> Result<Self, DecodeError>;

    /// State the next line starts in: the open construct, or the default
    /// style when the line ended at top level.
    fn resume_style(&self) -> Self::Style;

    /// Line categories for the fold pass.
    fn flags(&self) -> LineFlags;

    /// Fold level change the scan computed for this line, added by the
    /// fold pass at the line end.
    fn fold_delta(&self) -> i32 {
        0
    }
}

/// Fixed-width field packing, low bits first.
#[derive(Clone, Copy, Debug, Default)]
pub struct BitWriter {
    value: u32,
    shift: u32,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `value` in the next `bits` bits.
    ///
    /// Values wider than `bits` are a codec bug; debug builds assert, and
    /// release builds mask so the neighbouring fields stay intact.
    #[must_use]
    pub fn put(mut self, bits: u32, value: u32) -> Self {
        debug_assert!(bits > 0 && self.shift + bits <= 32, "field overflows u32");
        debug_assert!(value <= mask(bits), "{value} does not fit {bits} bits");
        self.value |= (value & mask(bits)) << self.shift;
        self.shift += bits;
        self
    }

    #[must_use]
    pub fn put_flag(self, flag: bool) -> Self {
        self.put(1, u32::from(flag))
    }

    pub fn finish(self) -> u32 {
        self.value
    }
}

/// Reader for values packed by [`BitWriter`].
#[derive(Clone, Copy, Debug)]
pub struct BitReader {
    value: u32,
}

impl BitReader {
    pub fn new(value: u32) -> Self {
        Self { value }
    }

    /// Take the next `bits` bits.
    pub fn take(&mut self, bits: u32) -> u32 {
        let field = self.value & mask(bits);
        self.value = if bits >= 32 { 0 } else { self.value >> bits };
        field
    }

    pub fn take_flag(&mut self) -> bool {
        self.take(1) != 0
    }

    /// Take a style id and check it against the style table.
    pub fn take_style<S: Style>(&mut self, bits: u32) -> Result<S, DecodeError> {
        let id = self.take(bits);
        u8::try_from(id)
            .ok()
            .and_then(S::from_id)
            .ok_or(DecodeError("style id outside the style table"))
    }

    /// Confirm no bits remain above the last field.
    pub fn finish(self) -> Result<(), DecodeError> {
        if self.value == 0 {
            Ok(())
        } else {
            Err(DecodeError("bits set above the last field"))
        }
    }
}

#[inline]
const fn mask(bits: u32) -> u32 {
    if bits >= 32 {
        u32::MAX
    } else {
        (1 << bits) - 1
    }
}
