//! Word strategy: one word, plus any tag-like span in front of it, per tick.

use super::RevealStrategy;

/// Reveals one space-separated word per invocation.
///
/// If the word starts with `<`, the bracketed span is consumed first by
/// counting `<` and `>` as nesting depth until it returns to zero. This is a
/// bracket balance scan, not a markup parser: quoted `>` and stray `<` are
/// counted like any other, and an unbalanced span runs to the end of the
/// text. The spaces after a word are consumed with it and never emitted on
/// their own.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordStrategy;

impl WordStrategy {
    /// Offset just past a bracketed span starting at `at`, or `at` if there is none.
    fn skip_tag(bytes: &[u8], at: usize) -> usize {
        if bytes.get(at) != Some(&b'<') {
            return at;
        }
        let mut depth = 0_isize;
        let mut i = at;
        loop {
            match bytes[i] {
                b'<' => depth += 1,
                b'>' => depth -= 1,
                _ => {}
            }
            i += 1;
            if depth <= 0 || i >= bytes.len() {
                return i;
            }
        }
    }

    fn skip_while(bytes: &[u8], mut at: usize, pred: impl Fn(u8) -> bool) -> usize {
        while at < bytes.len() && pred(bytes[at]) {
            at += 1;
        }
        at
    }
}

impl RevealStrategy for WordStrategy {
    fn stream(&self, text: &str, cursor: usize, emit: &mut dyn FnMut(&str)) -> usize {
        // Only ASCII bytes stop the scans, so every offset is a char boundary.
        let bytes = text.as_bytes();
        let mut cursor = Self::skip_tag(bytes, cursor);
        cursor = Self::skip_while(bytes, cursor, |b| b != b' ');
        emit(&text[..cursor]);
        Self::skip_while(bytes, cursor, |b| b == b' ')
    }
}
