//! Character strategy: one grapheme cluster per tick.

use super::RevealStrategy;
use unicode_segmentation::UnicodeSegmentation;

/// Reveals exactly one more user-perceived character per invocation.
///
/// A "character" is an extended grapheme cluster, so combining sequences and
/// multi-codepoint emoji appear in one step.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharacterStrategy;

impl RevealStrategy for CharacterStrategy {
    fn stream(&self, text: &str, cursor: usize, emit: &mut dyn FnMut(&str)) -> usize {
        let step = text[cursor..].graphemes(true).next().map_or(0, str::len);
        let next = cursor + step;
        emit(&text[..next]);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::collect;

    #[test]
    fn test_every_prefix_in_order() {
        let fragments = collect(&CharacterStrategy, "hello");
        assert_eq!(fragments, vec!["h", "he", "hel", "hell", "hello"]);
    }

    #[test]
    fn test_grapheme_clusters_stay_whole() {
        // "e" + combining acute, then a family emoji joined by ZWJs
        let text = "e\u{301}\u{1F468}\u{200D}\u{1F469}\u{200D}\u{1F467}!";
        let fragments = collect(&CharacterStrategy, text);
        assert_eq!(fragments.len(), 3);
        assert_eq!(fragments[0], "e\u{301}");
        assert_eq!(fragments[2], text);
    }

    #[test]
    fn test_resumes_from_cursor() {
        let mut out = Vec::new();
        let next = CharacterStrategy.stream("help you", 3, &mut |f: &str| out.push(f.to_string()));
        assert_eq!(next, 4);
        assert_eq!(out, vec!["help"]);
    }

    #[test]
    fn test_at_end_emits_full_text() {
        let mut out = Vec::new();
        let next = CharacterStrategy.stream("ab", 2, &mut |f: &str| out.push(f.to_string()));
        assert_eq!(next, 2);
        assert_eq!(out, vec!["ab"]);
    }
}
