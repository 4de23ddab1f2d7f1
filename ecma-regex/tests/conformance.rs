//! End-to-end behavioral tests exercising whole compile+exec round trips
//! rather than individual module internals.

use ecma_regex::flags::Flags;
use ecma_regex::Pattern;

#[test]
fn catastrophic_backtracking_is_bounded() {
    // `(.*)*` over a body with no fixed anchor is the classic pathological
    // shape; the zero-width-progress guard plus the step budget must either
    // resolve it quickly or abandon it cleanly, never hang.
    let p = Pattern::builder()
        .pattern("^(.*)*b\\1$")
        .flags(Flags::empty())
        .failure_limit(1_000_000)
        .build()
        .unwrap();
    match p.exec("aaaabaa", Flags::empty()) {
        Ok(_) => {}
        Err(ecma_regex::Error::Complexity { .. }) => {}
        Err(other) => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn nested_alternation_with_backreference() {
    let p = Pattern::compile("(a(.)a|\\2(.)b){2}", Flags::empty()).unwrap();
    // Only asserting the search terminates with a definite answer (either
    // outcome is a legitimate backtracking result for this pattern); the
    // point of this test is that deeply nested alternation plus a
    // backreference into a not-yet-closed group doesn't panic or hang.
    let _ = p.exec("acaaabbb", Flags::empty()).unwrap();
}

#[test]
fn date_components_capture() {
    let p = Pattern::compile(r"^(\d{4})-(\d{2})-(\d{2})$", Flags::empty()).unwrap();
    let caps = p.exec("2024-01-15", Flags::empty()).unwrap().unwrap();
    assert_eq!(caps.get(1), Some((0, 4)));
    assert_eq!(caps.get(2), Some((5, 7)));
    assert_eq!(caps.get(3), Some((8, 10)));
}

#[test]
fn date_alternation_rejects_malformed_input() {
    let p = Pattern::compile(r"^(\d{4})-(\d{2})-(\d{2})$", Flags::empty()).unwrap();
    assert!(p.exec("2024-1-15", Flags::empty()).unwrap().is_none());
}

#[test]
fn fixed_width_lookbehind_anchors_the_match() {
    let p = Pattern::compile(r"(?<=\$)\d+", Flags::empty()).unwrap();
    let caps = p.exec("Price: $42", Flags::empty()).unwrap().unwrap();
    assert_eq!(caps.get(0), Some((8, 10)));
    assert!(p.exec("Price: 42", Flags::empty()).unwrap().is_none());
}

#[test]
fn negative_lookbehind_excludes_preceding_context() {
    let p = Pattern::compile(r"(?<!\$)\b\d+\b", Flags::empty()).unwrap();
    let caps = p.exec("$5 and 6", Flags::empty()).unwrap().unwrap();
    assert_eq!(caps.get(0), Some((7, 8)));
}

#[test]
fn variable_width_lookbehind_is_rejected_at_compile_time() {
    let err = Pattern::compile(r"(?<=a*)b", Flags::empty()).unwrap_err();
    assert!(matches!(err, ecma_regex::Error::Lookbehind { .. }));
}

#[test]
fn v_mode_string_class_prefers_longest_member() {
    // `\q{ab|a}` should greedily consume "ab" before falling back to "a",
    // per the class-set string-member longest-match-first lowering.
    let p = Pattern::compile(r"^[\q{ab|a}]+$", Flags::UNICODE_SETS).unwrap();
    assert!(p.exec("ababa", Flags::empty()).unwrap().is_some());
    assert!(p.exec("abc", Flags::empty()).unwrap().is_none());
}

#[test]
fn icase_unicode_folds_greek_final_sigma() {
    let p = Pattern::compile("σ", Flags::ICASE).unwrap();
    assert!(p.exec("ς", Flags::empty()).unwrap().is_some());
    assert!(p.exec("Σ", Flags::empty()).unwrap().is_some());
}

#[test]
fn multibyte_text_indices_are_code_point_based() {
    // Capture spans are code-point indices, not byte offsets — this pattern
    // would report the wrong span if the engine conflated the two for text
    // containing multi-byte characters before the match.
    let p = Pattern::compile(r"world", Flags::empty()).unwrap();
    let caps = p.exec("héllo world", Flags::empty()).unwrap().unwrap();
    assert_eq!(caps.get(0), Some((6, 11)));
}

#[test]
fn named_group_forward_reference_resolves() {
    let p = Pattern::compile(r"(?:\k<x>)?(?<x>a)", Flags::empty()).unwrap();
    assert!(p.exec("a", Flags::empty()).unwrap().is_some());
}

#[test]
fn lookahead_failure_does_not_discard_outer_backtrack_frames() {
    // The outer alternation tries "ab" first; the trailing `(?=b)` then fails
    // since there's nothing left to look at. That failure must only unwind
    // the lookahead's own internal state, not the alternation's still-pending
    // "a" branch — which does satisfy `(?=b)` (the 'b' right after it).
    let p = Pattern::compile(r"(ab|a)(?=b)", Flags::empty()).unwrap();
    let caps = p.exec("ab", Flags::empty()).unwrap().unwrap();
    assert_eq!(caps.get(1), Some((0, 1)));
}

#[test]
fn failed_negative_lookahead_does_not_leak_captures() {
    // `(?!(a))a` — the negative lookahead's inner group captures "a" while
    // probing, but the lookahead then fails overall (it did find "a"), so
    // that capture must not survive into the outer match.
    let p = Pattern::compile(r"(?!(a))a", Flags::empty()).unwrap();
    assert!(p.exec("a", Flags::empty()).unwrap().is_none());

    let p2 = Pattern::compile(r"(?:(?!(a))b|a)", Flags::empty()).unwrap();
    let caps = p2.exec("a", Flags::empty()).unwrap().unwrap();
    assert!(caps.get(1).is_none());
}

#[test]
fn inline_flag_group_scopes_icase_to_its_body() {
    // `(?i:...)` turns on case-insensitivity only for its own group; the
    // surrounding pattern keeps the caller's flags.
    let p = Pattern::compile(r"^(?i:abc)DEF$", Flags::empty()).unwrap();
    assert!(p.exec("ABCdef", Flags::empty()).unwrap().is_none());
    assert!(p.exec("ABCDEF", Flags::empty()).unwrap().is_some());
    assert!(p.exec("abcDEF", Flags::empty()).unwrap().is_some());
}

#[test]
fn unbounded_general_counter_quantifier() {
    // `{3,}` has no upper bound, forcing the general-counter encoding rather
    // than physical unrolling or the split-loop path.
    let p = Pattern::compile(r"^a{3,}$", Flags::empty()).unwrap();
    assert!(p.exec("aa", Flags::empty()).unwrap().is_none());
    assert!(p.exec("aaa", Flags::empty()).unwrap().is_some());
    assert!(p.exec("aaaaaaaa", Flags::empty()).unwrap().is_some());
}
