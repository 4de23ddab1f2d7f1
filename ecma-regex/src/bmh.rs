//! Boyer–Moore–Horspool acceleration for patterns the optimiser has proven
//! are a single literal run (see [`crate::optimizer::extract_bmh_literal`]).

use ecma_unicode::case_fold::do_casefolding;
use ecma_unicode::CodePoint;

/// A compiled literal search: either exact bytes or, under `icase`, decoded
/// code points compared via simple case folding.
#[derive(Clone, Debug)]
pub enum BmhTable {
    CaseSensitive { needle: Vec<u8>, skip: [usize; 256] },
    CaseInsensitive { needle: Vec<CodePoint> },
}

impl BmhTable {
    pub fn case_sensitive(needle: &str) -> Self {
        let bytes = needle.as_bytes().to_vec();
        let mut skip = [bytes.len(); 256];
        for (i, &b) in bytes.iter().enumerate().take(bytes.len().saturating_sub(1)) {
            skip[b as usize] = bytes.len() - 1 - i;
        }
        Self::CaseSensitive { needle: bytes, skip }
    }

    pub fn case_insensitive(needle: &[CodePoint]) -> Self {
        Self::CaseInsensitive { needle: needle.to_vec() }
    }

    /// Returns the byte (resp. code-point) offset of the first match at or
    /// after `from`, or `None`.
    pub fn find(&self, haystack: &str, from: usize) -> Option<usize> {
        match self {
            Self::CaseSensitive { needle, skip } => find_bmh_bytes(haystack.as_bytes(), needle, skip, from),
            Self::CaseInsensitive { needle } => {
                let hay: Vec<CodePoint> = haystack.chars().map(|c| c as CodePoint).collect();
                find_icase(&hay, needle, from)
            }
        }
    }
}

fn find_bmh_bytes(haystack: &[u8], needle: &[u8], skip: &[usize; 256], from: usize) -> Option<usize> {
    if needle.is_empty() {
        return Some(from.min(haystack.len()));
    }
    if needle.len() > haystack.len() {
        return None;
    }
    let mut pos = from;
    let last = needle.len() - 1;
    while pos + needle.len() <= haystack.len() {
        let window = &haystack[pos..pos + needle.len()];
        if window == needle {
            return Some(pos);
        }
        pos += skip[window[last] as usize];
    }
    None
}

/// `match_continuous`-style fallback: a simple left-to-right scan, used for
/// the case-insensitive path since Horspool's skip table assumes byte
/// equality, which simple case folding on multi-byte code points breaks.
fn find_icase(haystack: &[CodePoint], needle: &[CodePoint], from: usize) -> Option<usize> {
    if needle.is_empty() {
        return Some(from.min(haystack.len()));
    }
    if needle.len() > haystack.len() {
        return None;
    }
    'outer: for start in from..=haystack.len() - needle.len() {
        for (i, &n) in needle.iter().enumerate() {
            if do_casefolding(haystack[start + i]) != do_casefolding(n) {
                continue 'outer;
            }
        }
        return Some(start);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_sensitive_find() {
        let t = BmhTable::case_sensitive("needle");
        assert_eq!(t.find("a needle in a haystack", 0), Some(2));
        assert_eq!(t.find("no match here", 0), None);
    }

    #[test]
    fn case_insensitive_find() {
        let needle: Vec<CodePoint> = "NEEDLE".chars().map(|c| c as CodePoint).collect();
        let t = BmhTable::case_insensitive(&needle);
        assert_eq!(t.find("a needle here", 0), Some(2));
    }

    #[test]
    fn find_from_offset() {
        let t = BmhTable::case_sensitive("ab");
        assert_eq!(t.find("ababab", 1), Some(2));
    }
}
