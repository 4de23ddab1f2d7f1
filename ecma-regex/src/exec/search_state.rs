//! Per-search scratch state: capture slots, counter/repeat slots, and the
//! four stacks the backtracking interpreter pushes and pops as it explores
//! alternatives.

use crate::flags::Flags;

/// A `(start, end)` code-point-index span, half-open, or `None` if the group
/// never participated in the match.
pub type Span = Option<(usize, usize)>;

/// One saved alternative the interpreter can resume at if the path it is
/// currently exploring fails. Snapshots the full slot state rather than
/// delta-patching it on unwind — simpler to get right, and the slot arrays
/// in any one pattern are small.
#[derive(Clone, Debug)]
pub struct BacktrackFrame {
    pub state: usize,
    pub pos: usize,
    brackets: Vec<Span>,
    bracket_hits: Vec<u32>,
    counters: Vec<u32>,
    repeats: Vec<usize>,
}

/// Mutable scratch space for one `exec`/`exec_at` call. Reusable across
/// searches against the same [`crate::regex::Pattern`] via [`Pool`] when the
/// `std` feature is enabled, mirroring the teacher's own cache-pooling shape.
#[derive(Clone, Debug)]
pub struct SearchState {
    pub text: Vec<char>,
    pub pos: usize,
    pub srchbegin: usize,
    pub srchend: usize,
    pub lblim: usize,
    pub flags: Flags,

    pub brackets: Vec<Span>,
    pub bracket_hits: Vec<u32>,
    pub counters: Vec<u32>,
    pub counter_stack: Vec<(u32, u32)>,
    pub repeats: Vec<usize>,
    pub repeat_stack: Vec<(u32, usize)>,
    pub bt_stack: Vec<BacktrackFrame>,
    pub failure_counter: u64,
}

impl SearchState {
    pub fn new(
        text: Vec<char>,
        start: usize,
        bracket_count: usize,
        counter_count: usize,
        repeat_count: usize,
        flags: Flags,
    ) -> Self {
        let len = text.len();
        Self {
            text,
            pos: start,
            srchbegin: 0,
            srchend: len,
            lblim: 0,
            flags,
            brackets: vec![None; bracket_count + 1],
            bracket_hits: vec![0; bracket_count + 1],
            counters: vec![0; counter_count],
            counter_stack: Vec::new(),
            repeats: vec![usize::MAX; repeat_count],
            repeat_stack: Vec::new(),
            bt_stack: Vec::new(),
            failure_counter: 0,
        }
    }

    /// Resets position-dependent state so the same scratch buffers can be
    /// reused for another search (what makes pooling worthwhile).
    pub fn reset_for(&mut self, text: Vec<char>, start: usize) {
        let len = text.len();
        self.text = text;
        self.pos = start;
        self.srchbegin = 0;
        self.srchend = len;
        self.lblim = 0;
        self.brackets.iter_mut().for_each(|b| *b = None);
        self.bracket_hits.iter_mut().for_each(|h| *h = 0);
        self.counters.iter_mut().for_each(|c| *c = 0);
        self.counter_stack.clear();
        self.repeats.iter_mut().for_each(|r| *r = usize::MAX);
        self.repeat_stack.clear();
        self.bt_stack.clear();
        self.failure_counter = 0;
    }

    pub fn push_backtrack(&mut self, state: usize, pos: usize) {
        self.bt_stack.push(BacktrackFrame {
            state,
            pos,
            brackets: self.brackets.clone(),
            bracket_hits: self.bracket_hits.clone(),
            counters: self.counters.clone(),
            repeats: self.repeats.clone(),
        });
    }

    /// Pops the most recent alternative and restores the slot arrays it
    /// captured, returning the `(state, pos)` to resume at.
    pub fn pop_backtrack(&mut self) -> Option<(usize, usize)> {
        let frame = self.bt_stack.pop()?;
        self.brackets = frame.brackets;
        self.bracket_hits = frame.bracket_hits;
        self.counters = frame.counters;
        self.repeats = frame.repeats;
        Some((frame.state, frame.pos))
    }
}

/// A pool of reusable [`SearchState`]s for repeated searches against one
/// compiled pattern, avoiding a fresh allocation per call. Mirrors the
/// teacher's `util::pool::Pool<Cache>`.
#[cfg(feature = "std")]
#[derive(Default, Debug)]
pub struct Pool {
    free: std::sync::Mutex<Vec<SearchState>>,
}

#[cfg(feature = "std")]
impl Pool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_else(&self, make: impl FnOnce() -> SearchState) -> SearchState {
        self.free.lock().unwrap().pop().unwrap_or_else(make)
    }

    pub fn put(&self, state: SearchState) {
        self.free.lock().unwrap().push(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backtrack_roundtrip_restores_slots() {
        let mut s = SearchState::new(vec!['a', 'b'], 0, 2, 1, 1, Flags::empty());
        s.brackets[1] = Some((0, 1));
        s.counters[0] = 3;
        s.push_backtrack(5, 1);
        s.brackets[1] = Some((0, 2));
        s.counters[0] = 9;
        let (state, pos) = s.pop_backtrack().unwrap();
        assert_eq!((state, pos), (5, 1));
        assert_eq!(s.brackets[1], Some((0, 1)));
        assert_eq!(s.counters[0], 3);
    }

    #[test]
    fn pop_on_empty_stack_is_none() {
        let mut s = SearchState::new(vec![], 0, 0, 0, 0, Flags::empty());
        assert!(s.pop_backtrack().is_none());
    }
}
