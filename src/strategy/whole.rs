//! Whole strategy: everything at once.

use super::RevealStrategy;

/// Reveals the entire target text in a single invocation.
#[derive(Debug, Clone, Copy, Default)]
pub struct WholeStrategy;

impl RevealStrategy for WholeStrategy {
    fn stream(&self, text: &str, _cursor: usize, emit: &mut dyn FnMut(&str)) -> usize {
        emit(text);
        text.len()
    }
}
