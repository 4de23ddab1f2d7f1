//! The crate's public surface: [`Pattern`] (compile once, search many times)
//! and [`Captures`] (the result of one search). Deliberately narrow — no
//! `find_iter`/`split`/`replace`, since those are straightforward to build
//! on top of `exec_at` and adding them here would be scope creep.

use bon::bon;

use crate::classes::named_groups::NamedGroups;
use crate::error::Error;
use crate::exec::search_state::SearchState;
use crate::flags::Flags;
use crate::{exec, optimizer, parser, CompiledPattern};

#[cfg(feature = "std")]
use crate::exec::search_state::Pool;

/// A half-open `(start, end)` code-point-index range into the searched text.
pub type Span = (usize, usize);

/// A compiled, reusable pattern.
#[derive(Debug)]
pub struct Pattern {
    compiled: CompiledPattern,
    failure_limit: u64,
    #[cfg(feature = "std")]
    pool: Pool,
}

#[bon]
impl Pattern {
    /// Compiles `pattern` under `flags`. `failure_limit` defaults to
    /// [`exec::DEFAULT_FAILURE_LIMIT`] and bounds how many interpreter steps
    /// one search may take before it's abandoned as catastrophic
    /// backtracking — use the builder to tighten it for untrusted patterns.
    #[builder]
    pub fn new(
        pattern: &str,
        flags: Flags,
        #[builder(default = exec::DEFAULT_FAILURE_LIMIT)] failure_limit: u64,
    ) -> Result<Self, Error> {
        let mut compiled = parser::compile(pattern, flags)?;
        optimizer::optimize(&mut compiled);
        Ok(new_pattern(compiled, failure_limit))
    }
}

#[cfg(feature = "std")]
fn new_pattern(compiled: CompiledPattern, failure_limit: u64) -> Pattern {
    Pattern { compiled, failure_limit, pool: Pool::new() }
}

#[cfg(not(feature = "std"))]
fn new_pattern(compiled: CompiledPattern, failure_limit: u64) -> Pattern {
    Pattern { compiled, failure_limit }
}

impl Pattern {
    /// Compiles `pattern` under `flags` with the default failure limit. For
    /// a custom limit, use [`Pattern::builder`].
    pub fn compile(pattern: &str, flags: Flags) -> Result<Self, Error> {
        Self::builder().pattern(pattern).flags(flags).build()
    }

    /// Searches `text` starting at code-point index 0.
    pub fn exec(&self, text: &str, flags: Flags) -> Result<Option<Captures>, Error> {
        self.exec_at(text, 0, flags)
    }

    /// Searches `text` starting no earlier than code-point index `start`,
    /// trying each successive start position until a match is found (unless
    /// `flags` includes [`Flags::MATCH_CONTINUOUS`], which requires the match
    /// to begin exactly at `start`).
    pub fn exec_at(&self, text: &str, start: usize, flags: Flags) -> Result<Option<Captures>, Error> {
        let chars: Vec<char> = text.chars().collect();
        if start > chars.len() {
            return Ok(None);
        }
        let combined = self.compiled.flags | flags;
        let anchored = combined.contains(Flags::MATCH_CONTINUOUS);

        #[cfg(feature = "std")]
        let mut state = self.pool.get_or_else(|| self.fresh_state(chars.clone(), start, combined));
        #[cfg(not(feature = "std"))]
        let mut state = self.fresh_state(chars.clone(), start, combined);

        state.reset_for(chars, start);
        state.flags = combined;

        let mut pos = start;
        let outcome = loop {
            let Some(candidate) = self.locate_start(text, &state.text, pos) else {
                break None;
            };
            state.bt_stack.clear();
            state.brackets.iter_mut().for_each(|b| *b = None);
            state.bracket_hits.iter_mut().for_each(|h| *h = 0);
            state.counters.iter_mut().for_each(|c| *c = 0);
            state.counter_stack.clear();
            state.repeats.iter_mut().for_each(|r| *r = usize::MAX);
            state.repeat_stack.clear();
            state.failure_counter = 0;

            match exec::run(&self.compiled, &mut state, self.failure_limit) {
                Ok(Some(end)) => break Some((candidate, end)),
                Ok(None) if anchored => break None,
                Ok(None) => pos = candidate + 1,
                Err(e) => {
                    #[cfg(feature = "std")]
                    self.pool.put(state);
                    return Err(e);
                }
            }
        };

        let result = outcome.map(|(match_start, end)| {
            state.brackets[0] = Some((match_start, end));
            Captures::from_state(&state, &self.compiled.named_groups)
        });

        #[cfg(feature = "std")]
        self.pool.put(state);

        Ok(result)
    }

    fn fresh_state(&self, text: Vec<char>, start: usize, flags: Flags) -> SearchState {
        SearchState::new(
            text,
            start,
            self.compiled.bracket_count as usize,
            self.compiled.counter_count as usize,
            self.compiled.repeat_count as usize,
            flags,
        )
    }

    /// Finds the next candidate start position at or after `from`, using
    /// whichever of the optimiser's precomputed hints apply: the BMH table
    /// for pure-literal patterns (ASCII text only, since its skip table
    /// assumes byte-width equals code-point-width), otherwise the
    /// first-character class, otherwise `from` itself.
    fn locate_start(&self, text: &str, chars: &[char], from: usize) -> Option<usize> {
        if from > chars.len() {
            return None;
        }
        if let Some(bmh) = &self.compiled.bmh {
            if text.is_ascii() {
                return bmh.find(text, from);
            }
        }
        if let Some(info) = &self.compiled.first_char {
            return (from..chars.len()).find(|&i| info.set.contains(chars[i] as u32));
        }
        Some(from)
    }
}

/// The capture groups of one successful match: group 0 is the whole match.
#[derive(Clone, Debug)]
pub struct Captures {
    spans: Vec<Option<Span>>,
    names: Vec<(String, u32)>,
}

impl Captures {
    fn from_state(state: &SearchState, named: &NamedGroups) -> Self {
        Self {
            spans: state.brackets.clone(),
            names: named.names().map(|n| (n.to_string(), named.lookup(n).unwrap())).collect(),
        }
    }

    /// The span of capture group `index` (`0` is the whole match), or `None`
    /// if that group didn't participate in the match.
    pub fn get(&self, index: usize) -> Option<Span> {
        self.spans.get(index).copied().flatten()
    }

    /// The span of the named capture group `name`, or `None` if it didn't
    /// participate (or no such name exists).
    pub fn get_by_name(&self, name: &str) -> Option<Span> {
        let index = self.names.iter().find(|(n, _)| n == name)?.1;
        self.get(index as usize)
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_and_matches_literal() {
        let p = Pattern::compile("abc", Flags::empty()).unwrap();
        let caps = p.exec("xxabcxx", Flags::empty()).unwrap().unwrap();
        assert_eq!(caps.get(0), Some((2, 5)));
    }

    #[test]
    fn no_match_returns_none() {
        let p = Pattern::compile("abc", Flags::empty()).unwrap();
        assert!(p.exec("xyz", Flags::empty()).unwrap().is_none());
    }

    #[test]
    fn captures_named_group() {
        let p = Pattern::compile("(?<word>[a-z]+)", Flags::empty()).unwrap();
        let caps = p.exec("  hello  ", Flags::empty()).unwrap().unwrap();
        assert_eq!(caps.get_by_name("word"), Some((2, 7)));
    }

    #[test]
    fn icase_matches_mixed_case() {
        let p = Pattern::compile("abc", Flags::ICASE).unwrap();
        assert!(p.exec("ABC", Flags::empty()).unwrap().is_some());
    }

    #[test]
    fn match_continuous_requires_exact_start() {
        let p = Pattern::compile("abc", Flags::empty()).unwrap();
        assert!(p.exec_at("xabc", 0, Flags::MATCH_CONTINUOUS).unwrap().is_none());
        assert!(p.exec_at("xabc", 1, Flags::MATCH_CONTINUOUS).unwrap().is_some());
    }

    #[test]
    fn builder_accepts_custom_failure_limit() {
        let p = Pattern::builder().pattern("a+").flags(Flags::empty()).failure_limit(64).build().unwrap();
        assert!(p.exec("aaaa", Flags::empty()).unwrap().is_some());
    }

    #[test]
    fn quantified_group_captures_last_iteration() {
        let p = Pattern::compile("(a)+", Flags::empty()).unwrap();
        let caps = p.exec("aaa", Flags::empty()).unwrap().unwrap();
        assert_eq!(caps.get(0), Some((0, 3)));
        assert_eq!(caps.get(1), Some((2, 3)));
    }

    #[test]
    fn backreference_matches_captured_text() {
        let p = Pattern::compile("(a+)\\1", Flags::empty()).unwrap();
        let caps = p.exec("aaaa", Flags::empty()).unwrap().unwrap();
        assert_eq!(caps.get(0), Some((0, 4)));
    }
}
