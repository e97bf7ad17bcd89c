//! Merging a dequeued chunk into the target text.

use super::config::Reconcile;
use unicode_segmentation::UnicodeSegmentation;

/// Byte length of the longest common prefix of `a` and `b`, compared
/// grapheme by grapheme so the result never splits a cluster of either side.
pub fn common_prefix_len(a: &str, b: &str) -> usize {
    a.grapheme_indices(true)
        .zip(b.grapheme_indices(true))
        .find(|((_, ga), (_, gb))| ga != gb)
        .map_or_else(|| a.len().min(b.len()), |((at, _), _)| at)
}

impl Reconcile {
    /// New target text and cursor after merging `chunk`.
    ///
    /// Append keeps the cursor. Replace moves it to the common prefix of the
    /// old and new text, which rewinds it when the new text diverges before
    /// the old cursor and never lets it exceed the new length.
    pub(crate) fn apply(self, target: &str, cursor: usize, chunk: &str) -> (String, usize) {
        match self {
            Self::Append => {
                let mut text = String::with_capacity(target.len() + chunk.len());
                text.push_str(target);
                text.push_str(chunk);
                (text, cursor)
            }
            Self::Replace => (chunk.to_string(), common_prefix_len(target, chunk)),
        }
    }
}
