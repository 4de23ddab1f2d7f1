//! `v`-mode sequence (string) properties, e.g. `\p{Basic_Emoji}`.
//!
//! Most Unicode properties classify single code points and are represented by
//! a plain [`crate::range::RangeSet`]. A handful — the ones `v`-mode's
//! `UnicodePropertyValueCharacterClass` production additionally allows —
//! classify whole *sequences* of code points. [`SequenceProperty`] holds both
//! halves: a range-set for the single-code-point members, and a
//! length-bucketed table of the multi-code-point ones, mirroring the
//! "concatenated array + length index" layout spec.md §3 describes for this
//! data shape.

use crate::range::RangeSet;
use crate::CodePoint;

/// A Unicode property whose members are sequences of one or more code points.
#[derive(Clone, Debug, Default)]
pub struct SequenceProperty {
    /// Members that are exactly one code point long.
    singles: RangeSet,
    /// Members of length >= 2, sorted by length then lexicographically,
    /// flattened into one array.
    sequences: Vec<CodePoint>,
    /// `index[k]` is the offset into `sequences` where length-`k` entries
    /// begin (`k` counted from 2); the final entry is `sequences.len()`.
    index: Vec<usize>,
    min_len: usize,
    max_len: usize,
}

impl SequenceProperty {
    /// Builds a property from an explicit member list. Members are
    /// deduplicated and sorted by length for matching's longest-first scan.
    pub fn from_members(mut members: Vec<Vec<CodePoint>>) -> Self {
        members.retain(|m| !m.is_empty());
        members.sort();
        members.dedup();

        let mut singles = RangeSet::new();
        let mut long: Vec<Vec<CodePoint>> = Vec::new();
        for m in members {
            if m.len() == 1 {
                singles.join((m[0], m[0]));
            } else {
                long.push(m);
            }
        }
        long.sort_by_key(|m| m.len());

        let min_len = long.first().map_or(usize::MAX, |m| m.len());
        let max_len = long.last().map_or(0, |m| m.len());

        let mut sequences = Vec::new();
        let mut index = Vec::new();
        if max_len >= 2 {
            let mut cursor = 0;
            for len in 2..=max_len {
                index.push(sequences.len());
                while cursor < long.len() && long[cursor].len() == len {
                    sequences.extend_from_slice(&long[cursor]);
                    cursor += 1;
                }
            }
            index.push(sequences.len());
        }

        let min_len = if singles.is_empty() { min_len } else { 1.min(min_len) };

        Self { singles, sequences, index, min_len, max_len }
    }

    /// Shortest member length, or `0` if the property has no members.
    pub fn min_len(&self) -> usize {
        if self.singles.is_empty() && self.sequences.is_empty() {
            0
        } else {
            self.min_len
        }
    }

    /// Longest member length, or `0` if the property has no members.
    pub fn max_len(&self) -> usize {
        self.max_len.max(if self.singles.is_empty() { 0 } else { 1 })
    }

    /// Finds the longest member of this property that matches a prefix of
    /// `text[pos..]`, returning its length in code points. Scans from
    /// `max_len()` down to `1` so multi-code-point members win over any
    /// single-code-point member that is also a prefix.
    pub fn longest_match_at(&self, text: &[CodePoint], pos: usize) -> Option<usize> {
        for len in (2..=self.max_len.max(1)).rev() {
            if len < 2 {
                break;
            }
            let Some(&start) = self.index.get(len - 2) else { continue };
            let end = *self.index.get(len - 1).unwrap_or(&self.sequences.len());
            let mut entry = start;
            while entry < end {
                let candidate = &self.sequences[entry..entry + len];
                if pos + len <= text.len() && &text[pos..pos + len] == candidate {
                    return Some(len);
                }
                entry += len;
            }
        }
        if pos < text.len() && self.singles.contains(text[pos]) {
            return Some(1);
        }
        None
    }
}

/// A toy `Basic_Emoji`-shaped sequence property seeded for `v`-mode testing:
/// a couple of single code points plus a couple of flag-style two-code-point
/// sequences, shaped like the real property without its full membership.
pub fn basic_emoji_sample() -> SequenceProperty {
    SequenceProperty::from_members(vec![
        vec![0x231A],         // ⌚ WATCH
        vec![0x2764],         // ❤ HEAVY BLACK HEART
        vec![0x1F1FA, 0x1F1F8], // 🇺🇸 regional indicator pair U+S
        vec![0x1F1EC, 0x1F1E7], // 🇬🇧 regional indicator pair G+B
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_and_sequence_members() {
        let prop = basic_emoji_sample();
        assert_eq!(prop.min_len(), 1);
        assert_eq!(prop.max_len(), 2);
    }

    #[test]
    fn longest_match_prefers_sequence_over_single() {
        let prop = SequenceProperty::from_members(vec![vec![0x41], vec![0x41, 0x42]]);
        let text = [0x41, 0x42, 0x43];
        assert_eq!(prop.longest_match_at(&text, 0), Some(2));
    }

    #[test]
    fn longest_match_falls_back_to_single() {
        let prop = basic_emoji_sample();
        let text = [0x231A, 0x20];
        assert_eq!(prop.longest_match_at(&text, 0), Some(1));
    }

    #[test]
    fn longest_match_flag_sequence() {
        let prop = basic_emoji_sample();
        let text = [0x1F1FA, 0x1F1F8, 0x20];
        assert_eq!(prop.longest_match_at(&text, 0), Some(2));
    }

    #[test]
    fn no_match_returns_none() {
        let prop = basic_emoji_sample();
        let text = [0x20];
        assert_eq!(prop.longest_match_at(&text, 0), None);
    }
}
