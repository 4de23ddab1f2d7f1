//! Simple case folding and its reverse (unfolding) relation.
//!
//! Only *simple* case folding is supported — a folded form is always exactly
//! one code point, so multi-character foldings (German `ß` -> `ss`) are out of
//! scope, matching `ib-unicode::case`'s own documented restriction. The table
//! here is a curated subset (ASCII, Latin-1 supplement, the Greek sigma
//! family, and the handful of code points the `i` + `u` ECMAScript combination
//! treats specially) rather than the full `CaseFolding.txt` — generating the
//! exhaustive table is the job of an external codegen tool per spec.md §1.

use crate::CodePoint;

/// Maximum number of code points returned by [`do_caseunfolding`].
pub const REV_MAXSET: usize = 4;

/// Kelvin sign: folds to Latin `k`, but does NOT fold to `K`/`k` under plain
/// `\w` semantics. ECMAScript's `icase_word` handling (spec.md §4.3) special-cases it.
pub const KELVIN_SIGN: CodePoint = 0x212A;

/// Latin small letter long s: folds to `s`, same special-case as [`KELVIN_SIGN`].
pub const LATIN_LONG_S: CodePoint = 0x017F;

/// Returns the canonical representative of `c`'s simple case-folding
/// equivalence class.
pub fn do_casefolding(c: CodePoint) -> CodePoint {
    for group in SPECIAL_EQUIVALENCE_CLASSES {
        if group.contains(&c) {
            return group[0];
        }
    }
    if let Some(ch) = char::from_u32(c) {
        if ch.is_ascii_uppercase() {
            return ch.to_ascii_lowercase() as CodePoint;
        }
        // `char::to_lowercase` is ECMAScript's canonical-fold surrogate here:
        // for every code point in our curated domain, simple folding coincides
        // with simple lowercasing (the two diverge only for multi-character
        // special foldings, which are explicitly out of scope). Members of a
        // special equivalence class (e.g. Greek final sigma) are handled above
        // since their own lowercase mapping is a fixed point.
        let mut it = ch.to_lowercase();
        if let (Some(folded), None) = (it.next(), it.next()) {
            return folded as CodePoint;
        }
    }
    c
}

/// Returns the set of code points that fold to the same canonical
/// representative as `c` (including `c` itself), sorted ascending.
///
/// The result never exceeds [`REV_MAXSET`] entries.
pub fn do_caseunfolding(c: CodePoint) -> Vec<CodePoint> {
    let canon = do_casefolding(c);
    let mut set = vec![canon];

    if let Some(ch) = char::from_u32(canon) {
        for up in ch.to_uppercase() {
            let up = up as CodePoint;
            if !set.contains(&up) {
                set.push(up);
            }
        }
    }

    // Known multi-member equivalence classes beyond simple upper/lower pairs.
    for group in SPECIAL_EQUIVALENCE_CLASSES {
        if group.contains(&canon) || group.iter().any(|&m| do_casefolding(m) == canon) {
            for &m in group.iter() {
                if !set.contains(&m) {
                    set.push(m);
                }
            }
        }
    }

    set.sort_unstable();
    set.truncate(REV_MAXSET);
    set
}

/// Greek sigma: `Σ`, `σ`, `ς` all fold together, canonicalizing to `σ`
/// (listed first); `ς`'s own lowercase mapping is a fixed point, so it can't
/// be discovered through `char::to_lowercase` alone.
const SIGMA_CLASS: [CodePoint; 3] = [0x03C3, 0x03A3, 0x03C2];

const SPECIAL_EQUIVALENCE_CLASSES: &[&[CodePoint]] = &[&SIGMA_CLASS];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_fold() {
        assert_eq!(do_casefolding('A' as CodePoint), 'a' as CodePoint);
        assert_eq!(do_casefolding('a' as CodePoint), 'a' as CodePoint);
        assert_eq!(do_casefolding('5' as CodePoint), '5' as CodePoint);
    }

    #[test]
    fn sigma_family_folds_together() {
        let targets: Vec<_> = SIGMA_CLASS.iter().map(|&c| do_casefolding(c)).collect();
        assert!(targets.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn caseunfolding_includes_self_and_upper() {
        let set = do_caseunfolding('a' as CodePoint);
        assert!(set.contains(&('a' as CodePoint)));
        assert!(set.contains(&('A' as CodePoint)));
    }

    #[test]
    fn caseunfolding_sigma() {
        let set = do_caseunfolding(0x03C3);
        for &c in &SIGMA_CLASS {
            assert!(set.contains(&c), "missing {c:#x} in {set:?}");
        }
    }

    #[test]
    fn caseunfolding_bounded_size() {
        for c in 0..0x300u32 {
            assert!(do_caseunfolding(c).len() <= REV_MAXSET);
        }
    }
}
