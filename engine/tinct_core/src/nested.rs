//! Explicit stack for code embedded in string literals.
//!
//! Entering an interpolation such as `${` pushes a frame that remembers
//! the string state to return to; the scanner then runs its ordinary
//! top-level rules until the matching closer pops the frame. The stack
//! lives in the line state between passes, so it has to be a value, not
//! recursion.
//!
//! # Persistence cap
//!
//! Only a fixed number of frames fit in a packed line state. [`NestedStack::write`]
//! stores a saturating depth followed by the innermost `max_frames` frames.
//! A stack deeper than that decodes to its innermost frames with
//! [`NestedStack::truncated`] set. Once those are popped the scanner falls back to
//! top-level scanning, so the rest of the line is styled as plain code
//! instead of string content. This only happens on incremental restarts
//! inside pathologically deep nesting.

use smallvec::SmallVec;

use crate::error::DecodeError;
use crate::line_state::{BitReader, BitWriter};

/// Width of the saturating depth field.
pub const DEPTH_BITS: u32 = 3;

/// Largest depth the depth field records exactly.
pub const MAX_RECORDED_DEPTH: usize = (1 << DEPTH_BITS) - 1;

/// A stack frame with a fixed-width packed form.
pub trait PackedFrame: Copy + Eq + std::fmt::Debug {
    /// Width of one packed frame.
    const BITS: u32;

    fn pack(self) -> u32;

    /// Inverse of [`PackedFrame::pack`]; `None` for patterns `pack` never
    /// produces.
    fn unpack(bits: u32) -> Option<Self>;
}

/// Interpolation stack. Most documents never exceed two frames.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NestedStack<F> {
    frames: SmallVec<[F; 4]>,
    truncated: bool,
}

impl<F: PackedFrame> Default for NestedStack<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: PackedFrame> NestedStack<F> {
    pub fn new() -> Self {
        Self {
            frames: SmallVec::new(),
            truncated: false,
        }
    }

    /// Total packed width for a layout persisting `max_frames` frames.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "frame caps are single digits"
    )]
    pub const fn packed_bits(max_frames: usize) -> u32 {
        DEPTH_BITS + max_frames as u32 * F::BITS
    }

    #[inline]
    pub fn push(&mut self, frame: F) {
        self.frames.push(frame);
    }

    #[inline]
    pub fn pop(&mut self) -> Option<F> {
        self.frames.pop()
    }

    #[inline]
    pub fn top(&self) -> Option<&F> {
        self.frames.last()
    }

    #[inline]
    pub fn top_mut(&mut self) -> Option<&mut F> {
        self.frames.last_mut()
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// `true` when this stack was decoded from a state deeper than the
    /// persisted cap and lost its outer frames.
    pub fn truncated(&self) -> bool {
        self.truncated
    }

    /// Frames from outermost to innermost.
    pub fn frames(&self) -> &[F] {
        &self.frames
    }

    /// Append the packed stack: saturating depth, then `max_frames` slots
    /// holding the innermost frames (innermost first, unused slots zero).
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        reason = "depth saturates at MAX_RECORDED_DEPTH"
    )]
    pub fn write(&self, mut writer: BitWriter, max_frames: usize) -> BitWriter {
        let depth = self.frames.len().min(MAX_RECORDED_DEPTH);
        writer = writer.put(DEPTH_BITS, depth as u32);
        let mut slots = self.frames.iter().rev().take(max_frames);
        for _ in 0..max_frames {
            let bits = slots.next().map_or(0, |frame| frame.pack());
            writer = writer.put(F::BITS, bits);
        }
        writer
    }

    /// Read a stack packed by [`NestedStack::write`] with the same `max_frames`.
    pub fn read(reader: &mut BitReader, max_frames: usize) -> Result<Self, DecodeError> {
        let depth = reader.take(DEPTH_BITS) as usize;
        let stored = depth.min(max_frames);
        let mut frames: SmallVec<[F; 4]> = SmallVec::with_capacity(stored);
        for slot in 0..max_frames {
            let bits = reader.take(F::BITS);
            if slot < stored {
                let frame = F::unpack(bits).ok_or(DecodeError("unknown nested frame"))?;
                frames.push(frame);
            } else if bits != 0 {
                return Err(DecodeError("nested frame slot beyond recorded depth"));
            }
        }
        // Slots are innermost first; the stack is outermost first.
        frames.reverse();
        Ok(Self {
            frames,
            truncated: depth > max_frames,
        })
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
