//! Style ids and the scan-state tag.
//!
//! A lexer's scan state and the style it paints are the same value: while
//! the state machine sits in `StringDq`, every byte it passes is painted
//! `StringDq`. Each language therefore defines one `#[repr(u8)]` enum that
//! doubles as its state tag and its style table, and the document stores
//! the raw `u8` ids.

use std::fmt;

/// A language's style table / scan-state tag.
pub trait Style: Copy + Eq + fmt::Debug + 'static {
    /// Style of unclassified text and the state at document start.
    const DEFAULT: Self;

    /// Every style in id order.
    const ALL: &'static [Self];

    /// Raw id as stored in the document.
    fn id(self) -> u8;

    /// Inverse of [`Style::id`]. `None` for ids outside the table.
    fn from_id(id: u8) -> Option<Self>;

    /// Stable lowercase name used by tooling output.
    fn name(self) -> &'static str;
}

/// Define a style table enum with dense ids and its [`Style`] impl.
///
/// The first variant is the default style (and the enum's `Default`). Ids
/// are assigned in declaration order starting at 0, and each variant
/// carries a display name.
///
/// ```ignore
/// style_table! {
///     pub enum DemoStyle {
///         Default = "default",
///         Comment = "comment",
///     }
/// }
/// ```
#[macro_export]
macro_rules! style_table {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $first:ident = $first_name:literal,
            $($variant:ident = $variant_name:literal),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u8)]
        $vis enum $name {
            $first,
            $($variant),*
        }

        impl ::std::default::Default for $name {
            fn default() -> Self {
                $name::$first
            }
        }

        impl $crate::Style for $name {
            const DEFAULT: Self = $name::$first;
            const ALL: &'static [Self] = &[$name::$first, $($name::$variant),*];

            #[inline]
            fn id(self) -> u8 {
                self as u8
            }

            #[inline]
            fn from_id(id: u8) -> Option<Self> {
                <Self as $crate::Style>::ALL.get(usize::from(id)).copied()
            }

            fn name(self) -> &'static str {
                match self {
                    $name::$first => $first_name,
                    $($name::$variant => $variant_name),*
                }
            }
        }
    };
}
