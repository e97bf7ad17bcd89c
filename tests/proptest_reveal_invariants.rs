//! Property-based invariant tests for reveal strategies and reconciliation.
//!
//! These hold for any input text:
//!
//! 1. Every emitted fragment is a prefix of the text.
//! 2. Every returned cursor advances and lies on a char boundary.
//! 3. The last fragment is the full text.
//! 4. Character reveal grows by exactly one grapheme per step.
//! 5. Whole reveal emits exactly once.
//! 6. The common prefix is a prefix of both strings and never longer than
//!    either, so a replace never leaves the cursor past the new text.

use proptest::prelude::*;
use trickle::engine::common_prefix_len;
use trickle::{CharacterStrategy, RevealStrategy, WholeStrategy, WordStrategy};
use unicode_segmentation::UnicodeSegmentation;

// ── Helpers ─────────────────────────────────────────────────────────────

/// Run a strategy to completion, returning (fragment, cursor before, cursor after) per step.
fn drive(strategy: &dyn RevealStrategy, text: &str) -> Vec<(String, usize, usize)> {
    let mut steps = Vec::new();
    let mut cursor = 0;
    while cursor < text.len() {
        let mut emitted = Vec::new();
        let next = strategy.stream(text, cursor, &mut |f: &str| emitted.push(f.to_string()));
        assert_eq!(emitted.len(), 1, "strategy must emit exactly once per step");
        steps.push((emitted.remove(0), cursor, next));
        cursor = next;
    }
    steps
}

fn text_with_markup() -> impl Strategy<Value = String> {
    proptest::collection::vec(
        prop_oneof![
            Just("<".to_string()),
            Just(">".to_string()),
            Just(" ".to_string()),
            Just("  ".to_string()),
            "[a-z]{1,6}",
            "[é✓日]{1,2}",
        ],
        0..24,
    )
    .prop_map(|parts| parts.concat())
}

fn ascii_word() -> impl Strategy<Value = String> {
    "[a-z]{0,12}"
}

// ═════════════════════════════════════════════════════════════════════════
// 1-3. Prefixes, progress, completion for every strategy
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn fragments_are_prefixes_and_cursor_advances(text in text_with_markup()) {
        let strategies: [&dyn RevealStrategy; 3] =
            [&CharacterStrategy, &WordStrategy, &WholeStrategy];
        for strategy in strategies {
            let steps = drive(strategy, &text);
            for (fragment, before, after) in &steps {
                prop_assert!(text.starts_with(fragment.as_str()));
                prop_assert!(after > before, "{strategy:?} stalled at {before}");
                prop_assert!(*after <= text.len());
                prop_assert!(text.is_char_boundary(*after));
            }
            if !text.is_empty() {
                prop_assert_eq!(&steps.last().unwrap().0, &text);
            }
        }
    }

    #[test]
    fn arbitrary_unicode_never_panics(text in "\\PC{0,64}") {
        for strategy in [&CharacterStrategy as &dyn RevealStrategy, &WordStrategy, &WholeStrategy] {
            let steps = drive(strategy, &text);
            prop_assert!(steps.len() <= text.len());
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4-5. Strategy-specific step sizes
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn character_reveals_one_grapheme_per_step(text in "\\PC{0,48}") {
        let expected: Vec<String> = text
            .grapheme_indices(true)
            .map(|(i, g)| text[..i + g.len()].to_string())
            .collect();
        let fragments: Vec<String> =
            drive(&CharacterStrategy, &text).into_iter().map(|s| s.0).collect();
        prop_assert_eq!(fragments, expected);
    }

    #[test]
    fn word_fragments_never_end_in_a_space(
        words in proptest::collection::vec("[a-z]{1,8}", 1..10),
    ) {
        let text = words.join(" ");
        let fragments: Vec<String> = drive(&WordStrategy, &text).into_iter().map(|s| s.0).collect();
        prop_assert_eq!(fragments.len(), words.len());
        for fragment in &fragments {
            prop_assert!(!fragment.ends_with(' '));
        }
    }

    #[test]
    fn whole_emits_once(text in "\\PC{1,64}") {
        prop_assert_eq!(drive(&WholeStrategy, &text).len(), 1);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Common prefix and replace reconciliation
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn common_prefix_is_shared(a in "\\PC{0,32}", b in "\\PC{0,32}") {
        let n = common_prefix_len(&a, &b);
        prop_assert!(n <= a.len().min(b.len()));
        prop_assert!(a.is_char_boundary(n) && b.is_char_boundary(n));
        prop_assert_eq!(&a[..n], &b[..n]);
        prop_assert_eq!(common_prefix_len(&b, &a), n);
    }

    #[test]
    fn common_prefix_finds_divergence(
        prefix in ascii_word(),
        x in "[a-m][a-z]{0,5}",
        y in "[n-z][a-z]{0,5}",
    ) {
        let a = format!("{prefix}{x}");
        let b = format!("{prefix}{y}");
        prop_assert_eq!(common_prefix_len(&a, &b), prefix.len());
        prop_assert_eq!(common_prefix_len(&a, &a), a.len());
        prop_assert_eq!(common_prefix_len(&a, &prefix), prefix.len());
    }
}
