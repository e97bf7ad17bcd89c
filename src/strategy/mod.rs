//! Reveal Strategies: how much of the target text becomes visible per tick.
//!
//! A strategy is invoked once per cadence tick with the full target text and
//! the current reveal cursor. It emits exactly one visible prefix of the text
//! and returns the new cursor.
//!
//! | Mode | One invocation reveals |
//! |------|------------------------|
//! | [`RevealMode::Character`] | one grapheme cluster |
//! | [`RevealMode::Word`] | an optional tag-like span, one word, and the spaces after it |
//! | [`RevealMode::Whole`] | the rest of the text |
//!
//! Offsets are byte offsets into the text and always sit on `char` boundaries.

mod character;
mod whole;
mod word;

pub use character::CharacterStrategy;
pub use whole::WholeStrategy;
pub use word::WordStrategy;

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, OnceLock};

/// Policy deciding how much text one reveal tick uncovers.
///
/// # Contract
///
/// - the returned cursor is never smaller than `cursor`
/// - if `cursor < text.len()`, the returned cursor is strictly greater
/// - the returned cursor lies on a `char` boundary of `text`
/// - every call to `emit` passes a prefix of `text`
///
/// The engine reports a violation of the first three as a
/// [`RevealError`](crate::RevealError) instead of looping forever.
pub trait RevealStrategy: Send + Sync + fmt::Debug {
    /// Reveal the next step of `text` starting at `cursor`.
    fn stream(&self, text: &str, cursor: usize, emit: &mut dyn FnMut(&str)) -> usize;
}

/// The built-in reveal strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RevealMode {
    /// One grapheme cluster per tick.
    #[default]
    Character,
    /// One word per tick.
    Word,
    /// The whole text in a single tick.
    Whole,
}

impl RevealMode {
    /// All modes, in declaration order.
    pub const ALL: [Self; 3] = [Self::Character, Self::Word, Self::Whole];

    /// Shared strategy instance for this mode.
    pub fn strategy(self) -> Arc<dyn RevealStrategy> {
        static CHARACTER: OnceLock<Arc<dyn RevealStrategy>> = OnceLock::new();
        static WORD: OnceLock<Arc<dyn RevealStrategy>> = OnceLock::new();
        static WHOLE: OnceLock<Arc<dyn RevealStrategy>> = OnceLock::new();

        let slot = match self {
            Self::Character => CHARACTER.get_or_init(|| Arc::new(CharacterStrategy)),
            Self::Word => WORD.get_or_init(|| Arc::new(WordStrategy)),
            Self::Whole => WHOLE.get_or_init(|| Arc::new(WholeStrategy)),
        };
        Arc::clone(slot)
    }

    /// Lowercase name of the mode.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Character => "character",
            Self::Word => "word",
            Self::Whole => "whole",
        }
    }
}

impl fmt::Display for RevealMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown [`RevealMode`] name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown reveal mode {0:?} (expected character, word, or whole)")]
pub struct ParseModeError(String);

impl FromStr for RevealMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "character" | "char" => Ok(Self::Character),
            "word" => Ok(Self::Word),
            "whole" => Ok(Self::Whole),
            _ => Err(ParseModeError(s.to_string())),
        }
    }
}

#[cfg(test)]
pub(crate) fn collect(strategy: &dyn RevealStrategy, text: &str) -> Vec<String> {
    let mut fragments = Vec::new();
    let mut cursor = 0;
    while cursor < text.len() {
        cursor = strategy.stream(text, cursor, &mut |f: &str| fragments.push(f.to_string()));
    }
    fragments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_round_trips_through_name() {
        for mode in RevealMode::ALL {
            assert_eq!(mode.to_string().parse::<RevealMode>(), Ok(mode));
        }
        assert_eq!(" Char ".parse::<RevealMode>(), Ok(RevealMode::Character));
    }

    #[test]
    fn test_unknown_mode() {
        let err = "sentence".parse::<RevealMode>().unwrap_err();
        assert!(err.to_string().contains("sentence"));
    }

    #[test]
    fn test_strategy_instances_are_shared() {
        let a = RevealMode::Word.strategy();
        let b = RevealMode::Word.strategy();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(collect(a.as_ref(), "a b"), vec!["a", "a b"]);
    }

    #[test]
    fn test_default_mode_is_character() {
        assert_eq!(RevealMode::default(), RevealMode::Character);
    }
}
