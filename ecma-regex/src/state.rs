//! The compiled representation: a flat array of tagged state records.
//!
//! Every state carries the same shape (`Tag`, `char_num`, two successor
//! offsets, a `(atleast, atmost, greedy)` quantifier triple, and a flag byte)
//! so the parser can emit states without knowing the optimiser's downstream
//! layout, and the optimiser can rewrite fields in place without changing the
//! array's length.

use ecma_unicode::INFINITY;

/// Discriminates what a [`State`] does when the executor visits it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tag {
    /// Matches a single literal code point (`char_num`), honoring `ICASE` via
    /// the flag byte.
    Character,
    /// Matches any code point in the class at `quantifier.0..+quantifier.1`
    /// of the shared Eytzinger class table (post-optimisation); before
    /// optimisation, `char_num` is a registry index instead.
    CharacterClass,
    /// Zero-width transition. `char_num` carries an [`EpsilonKind`] hint for
    /// the optimiser; the executor just follows `next1`.
    Epsilon,
    /// Tests the counter at `char_num` against `quantifier` bounds, taking
    /// `next1` if the loop may continue and `next2` if it must exit (or vice
    /// versa depending on greediness).
    CheckCounter,
    /// Decrements the counter at `char_num` (after a failed continuation, on
    /// backtrack-stack unwind) back toward its saved value.
    DecrementCounter,
    /// Pushes the counter at `char_num`'s current value and resets it to 0.
    SaveAndResetCounter,
    /// Pops the previously saved counter value at `char_num`.
    RestoreCounter,
    /// Opens capture group `char_num`; records the current position.
    RoundBracketOpen,
    /// Closes capture group `char_num`; records the current position.
    RoundBracketClose,
    /// Pushes a 0-width repeat guard for the group range in `quantifier`.
    RepeatInPush,
    /// Pops the most recent 0-width repeat guard.
    RepeatInPop,
    /// Fails the current path if the enclosing repeat made zero progress.
    Check0WidthRepeat,
    /// Matches the text previously captured by group `char_num`.
    Backreference,
    /// Opens a lookaround region; `quantifier.0` encodes its kind (see
    /// [`LookaroundKind`]).
    LookaroundOpen,
    /// `^` (or start-of-line under `m`).
    Bol,
    /// `$` (or end-of-line under `m`).
    Eol,
    /// `\b` / `\B`, sense given by the flag byte's `is_not` bit.
    Boundary,
    /// Successful match (top-level) or the end of a lookaround region.
    Success,
}

/// What kind of lookaround a [`Tag::LookaroundOpen`] state begins, packed
/// into `quantifier.0` per spec.md's state-field overloading table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LookaroundKind {
    Ahead = 0,
    Behind = 1,
    /// Fixed-width lookbehind compiled as a rewind-then-rerun-forward probe.
    BehindRewinder = 2,
    BehindRewinderRerun = 3,
}

impl LookaroundKind {
    pub fn from_u32(v: u32) -> Self {
        match v {
            0 => Self::Ahead,
            1 => Self::Behind,
            2 => Self::BehindRewinder,
            _ => Self::BehindRewinderRerun,
        }
    }
}

/// Optimiser hint carried by [`Tag::Epsilon`] states in `char_num`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum EpsilonKind {
    #[default]
    Plain,
    /// Marks the join point of an alternation, useful to the branch
    /// optimiser for deciding whether branches can be merged.
    AltJoin,
    /// Marks the entry point the BMH pre-scan may jump back into directly.
    SearchEntry,
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct StateFlags: u8 {
        /// Negates a class or boundary test (`[^...]`, `\B`).
        const IS_NOT = 1 << 0;
        /// This atom was compiled under the `i` flag.
        const ICASE = 1 << 1;
        /// This atom was compiled under the `m` flag.
        const MULTILINE = 1 << 2;
        /// This atom was compiled under the `s` flag.
        const DOTALL = 1 << 3;
        /// Marks the state as the first-character-class anchor (NFA[0]).
        const ENTRY_POINT = 1 << 4;
        /// Marks a `Tag::Success` state as the end of a lookaround region
        /// rather than the pattern's overall match point.
        const LOOKAROUND_CLOSE = 1 << 5;
    }
}

/// `(atleast, atmost, greedy)`, overloaded by [`Tag`] per module docs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Quantifier {
    pub atleast: u32,
    pub atmost: u32,
    pub greedy: bool,
}

impl Quantifier {
    pub const ONE: Quantifier = Quantifier { atleast: 1, atmost: 1, greedy: true };
    pub const NONE: Quantifier = Quantifier { atleast: 0, atmost: 0, greedy: true };

    pub fn star(greedy: bool) -> Self {
        Self { atleast: 0, atmost: INFINITY, greedy }
    }

    pub fn plus(greedy: bool) -> Self {
        Self { atleast: 1, atmost: INFINITY, greedy }
    }

    pub fn question(greedy: bool) -> Self {
        Self { atleast: 0, atmost: 1, greedy }
    }

    pub fn range(atleast: u32, atmost: u32, greedy: bool) -> Self {
        Self { atleast, atmost, greedy }
    }
}

/// One compiled instruction. `next1`/`next2` are relative offsets from this
/// state's own index until [`crate::optimizer::resolve_absolute_jumps`] turns
/// them into absolute indices (0 means "no such successor").
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct State {
    pub tag: Tag,
    pub char_num: u32,
    pub next1: i32,
    pub next2: i32,
    pub quantifier: Quantifier,
    pub flags: StateFlags,
}

impl State {
    pub fn new(tag: Tag, char_num: u32) -> Self {
        Self {
            tag,
            char_num,
            next1: 1,
            next2: 0,
            quantifier: Quantifier::NONE,
            flags: StateFlags::empty(),
        }
    }

    pub fn is_not(&self) -> bool {
        self.flags.contains(StateFlags::IS_NOT)
    }
}
