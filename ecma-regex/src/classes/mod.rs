//! Character-class registry: interning, predefined classes, and the
//! Eytzinger-layout finalisation that feeds the executor's fast path.

pub mod named_groups;

use std::collections::HashMap;

use ecma_unicode::case_fold::{do_caseunfolding, KELVIN_SIGN, LATIN_LONG_S};
use ecma_unicode::range::{Range, RangeSet};

use crate::state::{State, StateFlags, Tag};

/// Fixed indices for the classes every pattern can reference without
/// interning, mirroring the teacher's predefined-class-at-index-0 pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Predefined {
    Newline = 0,
    Dotall = 1,
    Space = 2,
    Digit = 3,
    Word = 4,
    IcaseWord = 5,
}

/// Interns [`RangeSet`]s and, once parsing is complete, lays them out as one
/// contiguous Eytzinger-ordered array for the executor.
#[derive(Clone, Debug, Default)]
pub struct ClassRegistry {
    classes: Vec<RangeSet>,
    index: HashMap<RangeSet, u32>,
    finalised: Option<FinalisedClasses>,
}

/// The read-only, post-optimisation layout: one flat Eytzinger table plus the
/// `(offset, length)` window each class occupies within it.
#[derive(Clone, Debug, Default)]
pub struct FinalisedClasses {
    pub table: Vec<Range>,
    pub windows: Vec<(u32, u32)>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        let mut reg = Self::default();
        reg.intern(newline_set());
        reg.intern(dotall_set());
        reg.intern(space_set());
        reg.intern(digit_set());
        reg.intern(word_set());
        reg.intern(icase_word_set());
        reg
    }

    /// Interns `set`, returning its (possibly pre-existing) registry index.
    pub fn intern(&mut self, set: RangeSet) -> u32 {
        if let Some(&idx) = self.index.get(&set) {
            return idx;
        }
        let idx = self.classes.len() as u32;
        self.index.insert(set.clone(), idx);
        self.classes.push(set);
        idx
    }

    pub fn predefined(&self, which: Predefined) -> u32 {
        which as u32
    }

    pub fn get(&self, idx: u32) -> &RangeSet {
        &self.classes[idx as usize]
    }

    /// Builds the Eytzinger table and rewrites every class-referencing
    /// state's `quantifier` to `(offset, length)` into it, per the state
    /// overloading table. Idempotent.
    pub fn finalise(&mut self, states: &mut [State]) {
        let mut table = Vec::new();
        let mut windows = Vec::with_capacity(self.classes.len());
        for set in &self.classes {
            let eyt = set.to_eytzinger();
            let offset = table.len() as u32;
            let len = eyt.len() as u32;
            table.extend(eyt);
            windows.push((offset, len));
        }

        for state in states.iter_mut() {
            if state.tag == Tag::CharacterClass {
                let (offset, len) = windows[state.char_num as usize];
                state.quantifier.atleast = offset;
                state.quantifier.atmost = len;
            }
        }

        self.finalised = Some(FinalisedClasses { table, windows });
    }

    pub fn finalised(&self) -> Option<&FinalisedClasses> {
        self.finalised.as_ref()
    }
}

fn newline_set() -> RangeSet {
    RangeSet::from_sorted_ranges(vec![(0x0A, 0x0A), (0x0D, 0x0D), (0x2028, 0x2029)])
}

fn dotall_set() -> RangeSet {
    RangeSet::from_sorted_ranges(vec![(0, ecma_unicode::MAX_CODE_POINT)])
}

fn space_set() -> RangeSet {
    RangeSet::from_sorted_ranges(vec![
        (0x09, 0x0D),
        (0x20, 0x20),
        (0xA0, 0xA0),
        (0x1680, 0x1680),
        (0x2000, 0x200A),
        (0x2028, 0x2029),
        (0x202F, 0x202F),
        (0x205F, 0x205F),
        (0x3000, 0x3000),
        (0xFEFF, 0xFEFF),
    ])
}

fn digit_set() -> RangeSet {
    RangeSet::from_sorted_ranges(vec![(b'0' as u32, b'9' as u32)])
}

fn word_set() -> RangeSet {
    RangeSet::from_sorted_ranges(vec![
        (b'0' as u32, b'9' as u32),
        (b'A' as u32, b'Z' as u32),
        (b'_' as u32, b'_' as u32),
        (b'a' as u32, b'z' as u32),
    ])
}

/// `\w` under the `iu` flag combination additionally folds in every code
/// point whose case-unfolding equivalence class intersects `\w`, plus the
/// two ECMAScript-mandated exceptions (Kelvin sign, long s) that fold INTO
/// `\w` members but are not themselves ASCII.
fn icase_word_set() -> RangeSet {
    let mut set = word_set();
    for &c in &[KELVIN_SIGN, LATIN_LONG_S] {
        for eq in do_caseunfolding(c) {
            if word_set().contains(eq) {
                set.join((c, c));
                break;
            }
        }
    }
    set
}

/// Looks up a class state's live range-set, honoring the flag-controlled
/// negation — used before [`ClassRegistry::finalise`] has run (e.g. by the
/// first-character-class optimiser pass, which needs actual membership).
pub fn effective_set(reg: &ClassRegistry, state: &State) -> RangeSet {
    let set = reg.get(state.char_num);
    if state.flags.contains(StateFlags::IS_NOT) {
        set.negated()
    } else {
        set.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predefined_classes_registered_in_order() {
        let reg = ClassRegistry::new();
        assert!(reg.get(Predefined::Newline as u32).contains(0x0A));
        assert!(reg.get(Predefined::Digit as u32).contains(b'5' as u32));
        assert!(!reg.get(Predefined::Digit as u32).contains(b'a' as u32));
    }

    #[test]
    fn interning_deduplicates() {
        let mut reg = ClassRegistry::new();
        let a = reg.intern(RangeSet::from_sorted_ranges(vec![(1, 5)]));
        let b = reg.intern(RangeSet::from_sorted_ranges(vec![(1, 5)]));
        assert_eq!(a, b);
    }

    #[test]
    fn finalise_patches_class_states() {
        let mut reg = ClassRegistry::new();
        let idx = reg.intern(RangeSet::from_sorted_ranges(vec![(10, 20)]));
        let mut states = vec![State::new(Tag::CharacterClass, idx)];
        reg.finalise(&mut states);
        let (offset, len) = (states[0].quantifier.atleast, states[0].quantifier.atmost);
        assert_eq!(len, 1);
        let table = &reg.finalised().unwrap().table;
        assert_eq!(table[offset as usize], (10, 20));
    }

    #[test]
    fn icase_word_includes_kelvin_and_long_s() {
        let set = icase_word_set();
        assert!(set.contains(KELVIN_SIGN));
        assert!(set.contains(LATIN_LONG_S));
    }
}
