//! The backtracking automaton interpreter.
//!
//! A single dispatch loop walks the compiled state array. Forks (alternation,
//! quantifiers) push a [`search_state::BacktrackFrame`] before committing to
//! the preferred branch; a failed path pops the most recent frame and
//! resumes there — the classic `MATCHED`/`NOT_MATCHED`/`JUDGE` shape, just
//! without separate named states for each, since Rust's `match` covers it.
//!
//! Lookaround is implemented by recursively re-entering this loop with a
//! `stop_at` sentinel rather than the iterative "push a stack-bottom marker"
//! technique production backtrackers use — recursion depth here is bounded
//! by the pattern's own lookaround nesting depth, not by input length, so
//! it's safe without a trampoline. The nested call still shares the outer
//! `bt_stack`, so it's given a `bt_floor` it may never pop below, and the
//! caller snapshots/restores captures, counters, and repeat guards around it
//! so a failed (or negative) probe can't leak its side effects outward.

pub mod search_state;

use crate::classes::Predefined;
use crate::error::Error;
use crate::state::{LookaroundKind, StateFlags, Tag};
use crate::CompiledPattern;

pub use search_state::SearchState;

/// Default step budget before a search is abandoned as catastrophic
/// backtracking (spec.md §9's Open Question, resolved in DESIGN.md: exposed
/// as a `Pattern` builder option rather than hardcoded).
pub const DEFAULT_FAILURE_LIMIT: u64 = 16_777_216;

/// Runs the pattern starting at `state.pos`, honoring `state.flags`.
/// Returns the end position of the match (captures are left in `state`), or
/// `None` if no match starts exactly at `state.pos`.
pub fn run(pattern: &CompiledPattern, state: &mut SearchState, failure_limit: u64) -> Result<Option<usize>, Error> {
    run_from(pattern, state, pattern.entry_state, state.pos, None, 0, failure_limit)
}

/// Core loop. `stop_at`, when set, is the index of the `Tag::Success` state
/// that ends a lookaround region; reaching it returns immediately instead of
/// continuing the interpreter (used by lookaround sub-matches).
///
/// `bt_floor` is the `bt_stack` length below which this call must never pop —
/// a lookaround sub-match shares the caller's `bt_stack`, and without a floor
/// its own failures would unwind frames the caller pushed before entering the
/// lookaround. Running out of frames to pop at the floor is treated exactly
/// like running out of frames at an empty stack: no match.
fn run_from(
    pattern: &CompiledPattern,
    st: &mut SearchState,
    start_state: usize,
    start_pos: usize,
    stop_at: Option<usize>,
    bt_floor: usize,
    failure_limit: u64,
) -> Result<Option<usize>, Error> {
    let states = &pattern.states;
    let mut pc = start_state;
    st.pos = start_pos;

    loop {
        st.failure_counter += 1;
        if st.failure_counter > failure_limit {
            #[cfg(feature = "logging")]
            tracing::debug!(failure_counter = st.failure_counter, "catastrophic backtracking guard tripped");
            return Err(Error::Complexity { detail: "exceeded the step budget" });
        }

        let outcome = step(pattern, st, pc, stop_at);
        match outcome? {
            StepOutcome::Matched(end) => return Ok(Some(end)),
            StepOutcome::Advance(next_pc) => pc = next_pc,
            StepOutcome::Failed => {
                if st.bt_stack.len() <= bt_floor {
                    return Ok(None);
                }
                match st.pop_backtrack() {
                    Some((resume_pc, resume_pos)) => {
                        pc = resume_pc;
                        st.pos = resume_pos;
                    }
                    None => return Ok(None),
                }
            }
        }
    }
}

enum StepOutcome {
    Matched(usize),
    Advance(usize),
    Failed,
}

fn step(
    pattern: &CompiledPattern,
    st: &mut SearchState,
    pc: usize,
    stop_at: Option<usize>,
) -> Result<StepOutcome, Error> {
    let states = &pattern.states;
    let s = &states[pc];

    if stop_at == Some(pc) && s.tag == Tag::Success {
        return Ok(StepOutcome::Matched(st.pos));
    }

    Ok(match s.tag {
        Tag::Success => StepOutcome::Matched(st.pos),

        Tag::Character => {
            let Some(&c) = st.text.get(st.pos) else { return Ok(StepOutcome::Failed) };
            let matched = if s.flags.contains(StateFlags::ICASE) {
                ecma_unicode::case_fold::do_casefolding(c as u32) == ecma_unicode::case_fold::do_casefolding(s.char_num)
            } else {
                c as u32 == s.char_num
            };
            if matched {
                st.pos += 1;
                StepOutcome::Advance(abs(pc, s.next1))
            } else {
                StepOutcome::Failed
            }
        }

        Tag::CharacterClass => {
            let Some(&c) = st.text.get(st.pos) else { return Ok(StepOutcome::Failed) };
            let in_class = class_contains(pattern, s.char_num, s.quantifier, c as u32);
            let hit = in_class != s.is_not();
            if hit {
                st.pos += 1;
                StepOutcome::Advance(abs(pc, s.next1))
            } else {
                StepOutcome::Failed
            }
        }

        Tag::Epsilon => {
            if s.next2 != 0 {
                st.push_backtrack(abs(pc, s.next2), st.pos);
            }
            StepOutcome::Advance(abs(pc, s.next1))
        }

        Tag::SaveAndResetCounter => {
            let id = s.char_num as usize;
            st.counter_stack.push((s.char_num, st.counters[id]));
            st.counters[id] = 0;
            StepOutcome::Advance(abs(pc, s.next1))
        }

        Tag::RestoreCounter => {
            let id = s.char_num;
            if let Some(pos) = st.counter_stack.iter().rposition(|&(i, _)| i == id) {
                let (_, old) = st.counter_stack.remove(pos);
                st.counters[id as usize] = old;
            }
            StepOutcome::Advance(abs(pc, s.next1))
        }

        Tag::DecrementCounter => {
            // Explicit decrement is redundant with the backtrack-frame
            // snapshot restore (search_state::BacktrackFrame captures the
            // whole counters array), so this is a no-op placement kept for
            // state-array symmetry with the spec'd tag set.
            StepOutcome::Advance(abs(pc, s.next1))
        }

        Tag::CheckCounter => {
            let id = s.char_num as usize;
            let can_more = st.counters[id] < s.quantifier.atmost;
            let can_exit = st.counters[id] >= s.quantifier.atleast;
            let body = abs(pc, s.next1);
            let exit = abs(pc, s.next2);
            match (s.quantifier.greedy, can_more, can_exit) {
                (true, true, true) => {
                    st.push_backtrack(exit, st.pos);
                    st.counters[id] += 1;
                    StepOutcome::Advance(body)
                }
                (true, true, false) => {
                    st.counters[id] += 1;
                    StepOutcome::Advance(body)
                }
                (true, false, true) => StepOutcome::Advance(exit),
                (false, true, true) => {
                    st.push_backtrack(body, st.pos);
                    StepOutcome::Advance(exit)
                }
                (false, false, true) => StepOutcome::Advance(exit),
                (false, true, false) => {
                    st.counters[id] += 1;
                    StepOutcome::Advance(body)
                }
                _ => StepOutcome::Failed,
            }
        }

        Tag::RepeatInPush => {
            let id = s.char_num;
            st.repeat_stack.push((id, st.repeats[id as usize]));
            st.repeats[id as usize] = usize::MAX;
            StepOutcome::Advance(abs(pc, s.next1))
        }

        Tag::RepeatInPop => {
            let id = s.char_num;
            if let Some(pos) = st.repeat_stack.iter().rposition(|&(i, _)| i == id) {
                let (_, old) = st.repeat_stack.remove(pos);
                st.repeats[id as usize] = old;
            }
            StepOutcome::Advance(abs(pc, s.next1))
        }

        Tag::Check0WidthRepeat => {
            let id = s.char_num as usize;
            if st.repeats[id] == st.pos {
                StepOutcome::Failed
            } else {
                st.repeats[id] = st.pos;
                StepOutcome::Advance(abs(pc, s.next1))
            }
        }

        Tag::RoundBracketOpen => {
            let idx = s.char_num as usize;
            st.brackets[idx] = Some((st.pos, st.pos));
            st.bracket_hits[idx] += 1;
            StepOutcome::Advance(abs(pc, s.next1))
        }

        Tag::RoundBracketClose => {
            let idx = s.char_num as usize;
            if let Some((open, _)) = st.brackets[idx] {
                st.brackets[idx] = Some((open, st.pos));
            }
            StepOutcome::Advance(abs(pc, s.next1))
        }

        Tag::Backreference => {
            let idx = s.char_num as usize;
            match st.brackets.get(idx).copied().flatten() {
                None => StepOutcome::Advance(abs(pc, s.next1)),
                Some((open, close)) => {
                    let len = close - open;
                    let icase = s.flags.contains(StateFlags::ICASE);
                    let ok = st.text.get(st.pos..st.pos + len).is_some_and(|slice| {
                        let wanted = &st.text[open..close];
                        if icase {
                            slice.iter().zip(wanted).all(|(&a, &b)| {
                                ecma_unicode::case_fold::do_casefolding(a as u32)
                                    == ecma_unicode::case_fold::do_casefolding(b as u32)
                            })
                        } else {
                            slice == wanted
                        }
                    });
                    if ok {
                        st.pos += len;
                        StepOutcome::Advance(abs(pc, s.next1))
                    } else {
                        StepOutcome::Failed
                    }
                }
            }
        }

        Tag::Bol => {
            let at_start = st.pos == 0 && !st.flags.contains(crate::flags::Flags::MATCH_NOT_BOL);
            let at_line_start = s.flags.contains(StateFlags::MULTILINE)
                && st.pos > 0
                && pattern.classes.get(Predefined::Newline as u32).contains(st.text[st.pos - 1] as u32);
            if at_start || at_line_start {
                StepOutcome::Advance(abs(pc, s.next1))
            } else {
                StepOutcome::Failed
            }
        }

        Tag::Eol => {
            let at_end = st.pos == st.text.len() && !st.flags.contains(crate::flags::Flags::MATCH_NOT_EOL);
            let at_line_end = s.flags.contains(StateFlags::MULTILINE)
                && st.pos < st.text.len()
                && pattern.classes.get(Predefined::Newline as u32).contains(st.text[st.pos] as u32);
            if at_end || at_line_end {
                StepOutcome::Advance(abs(pc, s.next1))
            } else {
                StepOutcome::Failed
            }
        }

        Tag::Boundary => {
            let icase = s.flags.contains(StateFlags::ICASE);
            let before = st.pos > 0 && is_word(pattern, st.text[st.pos - 1], icase);
            let after = st.pos < st.text.len() && is_word(pattern, st.text[st.pos], icase);
            let is_boundary = before != after;
            let want = is_boundary != s.is_not();
            if want {
                StepOutcome::Advance(abs(pc, s.next1))
            } else {
                StepOutcome::Failed
            }
        }

        Tag::LookaroundOpen => {
            let kind = LookaroundKind::from_u32(s.quantifier.atleast);
            let body_start = abs(pc, s.next1);
            let close = find_matching_close(states, body_start);
            let (probe_start, negate) = match kind {
                LookaroundKind::Ahead => (st.pos, s.is_not()),
                LookaroundKind::Behind | LookaroundKind::BehindRewinder | LookaroundKind::BehindRewinderRerun => {
                    let width = s.quantifier.atmost as usize;
                    match st.pos.checked_sub(width) {
                        Some(p) if p >= st.lblim => (p, s.is_not()),
                        _ => (usize::MAX, s.is_not()),
                    }
                }
            };

            if probe_start == usize::MAX {
                if negate {
                    StepOutcome::Advance(abs(pc, s.next2))
                } else {
                    StepOutcome::Failed
                }
            } else {
                let saved_pos = st.pos;
                let bt_floor = st.bt_stack.len();
                let brackets_snapshot = st.brackets.clone();
                let bracket_hits_snapshot = st.bracket_hits.clone();
                let counters_snapshot = st.counters.clone();
                let repeats_snapshot = st.repeats.clone();

                let found = run_from(pattern, st, body_start, probe_start, Some(close), bt_floor, u64::MAX)?;
                st.bt_stack.truncate(bt_floor);
                st.pos = saved_pos;

                let assertion_holds = matches!((found, negate), (Some(_), false) | (None, true));
                // Captures made inside the lookaround only survive a
                // successful *positive* lookaround — every other outcome
                // (failed positive, or any negative lookaround, which may
                // have partially matched before being rejected) restores the
                // pre-probe snapshot so no stray capture/counter/repeat side
                // effect from the probe leaks into the surrounding match.
                if !(found.is_some() && !negate) {
                    st.brackets = brackets_snapshot;
                    st.bracket_hits = bracket_hits_snapshot;
                    st.counters = counters_snapshot;
                    st.repeats = repeats_snapshot;
                }

                if assertion_holds {
                    StepOutcome::Advance(abs(pc, s.next2))
                } else {
                    StepOutcome::Failed
                }
            }
        }
    })
}

/// By the time the interpreter runs, [`crate::optimizer::resolve_absolute_jumps`]
/// has already turned every `next1`/`next2` into an absolute state index, so
/// this is just a narrowing cast — `pc` is unused but kept for readability at
/// call sites (`abs(pc, s.next1)` reads the same whether the field happens to
/// be relative or absolute).
fn abs(_pc: usize, stored: i32) -> usize {
    stored as usize
}

fn class_contains(pattern: &CompiledPattern, char_num: u32, quantifier: crate::state::Quantifier, c: u32) -> bool {
    match pattern.classes.finalised() {
        Some(finalised) => {
            ecma_unicode::range::RangeSet::is_included_el(
                &finalised.table,
                quantifier.atleast as usize,
                quantifier.atmost as usize,
                c,
            )
        }
        None => pattern.classes.get(char_num).contains(c),
    }
}

fn is_word(pattern: &CompiledPattern, c: char, icase: bool) -> bool {
    let which = if icase { Predefined::IcaseWord } else { Predefined::Word };
    pattern.classes.get(which as u32).contains(c as u32)
}

/// Finds the `Tag::Success`/`LOOKAROUND_CLOSE` state matching the
/// `LookaroundOpen` whose body starts at `body_start` — a simple forward
/// bracket-depth scan over the already-linked (absolute-offset) array.
fn find_matching_close(states: &[crate::state::State], body_start: usize) -> usize {
    let mut depth = 0i32;
    let mut i = body_start;
    while i < states.len() {
        match states[i].tag {
            Tag::LookaroundOpen => depth += 1,
            Tag::Success if states[i].flags.contains(StateFlags::LOOKAROUND_CLOSE) => {
                if depth == 0 {
                    return i;
                }
                depth -= 1;
            }
            _ => {}
        }
        i += 1;
    }
    states.len().saturating_sub(1)
}
