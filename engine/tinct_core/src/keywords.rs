//! Keyword dictionaries.
//!
//! Dictionaries are owned by the host and handed to every scan call as an
//! ordered [`KeywordLists`]. Each lexer documents which index holds which
//! role (primary keywords, types, classes, constants). A missing index
//! behaves as an empty set, so a host may supply fewer lists than a lexer
//! knows about.
//!
//! # Case folding
//!
//! A [`KeywordSet`] built with [`CaseSensitivity::Insensitive`] stores its
//! words ASCII-lowercased and lowercases every lookup, which is how
//! command-style languages (CMake, PowerShell) match.
//!
//! # Suffixed entries
//!
//! Command dictionaries may store a word with a trailing marker, e.g.
//! `if(`, meaning "keyword when followed by `(`".
//! [`KeywordSet::contains_with_suffix`] matches either spelling.

use rustc_hash::FxHashSet;

/// Whether lookups must match case exactly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CaseSensitivity {
    #[default]
    Sensitive,
    Insensitive,
}

/// Membership-testable set of words.
#[derive(Clone, Debug, Default)]
pub struct KeywordSet {
    words: FxHashSet<Box<str>>,
    case: CaseSensitivity,
}

impl KeywordSet {
    /// Build from whitespace-separated words.
    pub fn new(words: &str, case: CaseSensitivity) -> Self {
        let words = words
            .split_ascii_whitespace()
            .map(|word| match case {
                CaseSensitivity::Sensitive => Box::from(word),
                CaseSensitivity::Insensitive => word.to_ascii_lowercase().into_boxed_str(),
            })
            .collect();
        Self { words, case }
    }

    pub fn case(&self) -> CaseSensitivity {
        self.case
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Exact (or case-folded) membership.
    pub fn contains(&self, token: &str) -> bool {
        if self.words.is_empty() || token.is_empty() {
            return false;
        }
        match self.case {
            CaseSensitivity::Sensitive => self.words.contains(token),
            CaseSensitivity::Insensitive => self.contains_folded(token, None),
        }
    }

    /// Membership of `token` or of `token` immediately followed by `suffix`.
    pub fn contains_with_suffix(&self, token: &str, suffix: u8) -> bool {
        if self.contains(token) {
            return true;
        }
        if self.words.is_empty() || token.is_empty() {
            return false;
        }
        self.contains_folded(token, Some(suffix))
    }

    fn contains_folded(&self, token: &str, suffix: Option<u8>) -> bool {
        // Lexers only look up short tokens; avoid allocating for them.
        let mut buf = [0u8; MAX_INLINE_KEY];
        let extra = usize::from(suffix.is_some());
        let len = token.len() + extra;
        let fold = self.case == CaseSensitivity::Insensitive;
        if len <= MAX_INLINE_KEY {
            for (dst, &src) in buf.iter_mut().zip(token.as_bytes()) {
                *dst = if fold { src.to_ascii_lowercase() } else { src };
            }
            if let Some(suffix) = suffix {
                buf[token.len()] = suffix;
            }
            return std::str::from_utf8(&buf[..len]).is_ok_and(|key| self.words.contains(key));
        }
        let mut key = if fold {
            token.to_ascii_lowercase()
        } else {
            token.to_owned()
        };
        if let Some(suffix) = suffix {
            key.push(char::from(suffix));
        }
        self.words.contains(key.as_str())
    }
}

/// Lookups up to this length are folded on the stack.
const MAX_INLINE_KEY: usize = 64;

/// Ordered dictionaries for one scan call.
#[derive(Clone, Debug, Default)]
pub struct KeywordLists {
    sets: Vec<KeywordSet>,
}

impl KeywordLists {
    pub fn new(sets: Vec<KeywordSet>) -> Self {
        Self { sets }
    }

    /// Build every list from text with one case policy.
    pub fn from_texts<'a>(texts: impl IntoIterator<Item = &'a str>, case: CaseSensitivity) -> Self {
        Self {
            sets: texts
                .into_iter()
                .map(|text| KeywordSet::new(text, case))
                .collect(),
        }
    }

    pub fn get(&self, index: usize) -> Option<&KeywordSet> {
        self.sets.get(index)
    }

    /// Membership in the list at `index`; a missing list contains nothing.
    #[inline]
    pub fn contains(&self, index: usize, token: &str) -> bool {
        self.get(index).is_some_and(|set| set.contains(token))
    }

    /// [`KeywordSet::contains_with_suffix`] on the list at `index`.
    #[inline]
    pub fn contains_with_suffix(&self, index: usize, token: &str, suffix: u8) -> bool {
        self.get(index)
            .is_some_and(|set| set.contains_with_suffix(token, suffix))
    }

    /// Replace or append the list at `index`, padding with empty sets.
    pub fn set(&mut self, index: usize, set: KeywordSet) {
        if self.sets.len() <= index {
            self.sets.resize_with(index + 1, KeywordSet::default);
        }
        self.sets[index] = set;
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

#[cfg(test)]
mod tests;
