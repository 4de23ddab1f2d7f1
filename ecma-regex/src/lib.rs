/*!
An ECMAScript-compatible regular-expression compiler and backtracking
executor.

## Features
- [Parser](parser) — recursive-descent compiler from a pattern string to a flat
  state array.
- [Optimiser](optimizer) — mandatory array-freezing passes plus best-effort
  throughput passes.
- [BMH matcher](bmh) — literal-pattern fast path.
- [Executor](exec) — the backtracking interpreter and its per-search scratch
  state.
- [Pattern/Captures](regex) — the crate's public, intentionally narrow,
  compile/exec surface.

## Crate features
*/
#![cfg_attr(feature = "doc", doc = document_features::document_features!())]

pub mod bmh;
pub mod classes;
pub mod error;
pub mod exec;
pub mod flags;
pub mod optimizer;
pub mod parser;
pub mod regex;
pub mod state;

use bmh::BmhTable;
use classes::named_groups::NamedGroups;
use classes::ClassRegistry;
use flags::Flags;
use optimizer::FirstCharInfo;
use state::State;

pub use error::Error;
pub use regex::{Captures, Pattern, Span};

/// The immutable, `Arc`-shareable product of compiling a pattern: the state
/// array plus every table the executor needs to interpret it.
#[derive(Clone, Debug)]
pub struct CompiledPattern {
    pub states: Vec<State>,
    pub classes: ClassRegistry,
    pub named_groups: NamedGroups,
    pub bracket_count: u32,
    pub counter_count: u32,
    pub repeat_count: u32,
    /// Index to start execution from — group 0's `RoundBracketOpen`, so that
    /// entering it records the whole-match start position like any other
    /// capturing group.
    pub entry_state: usize,
    pub first_char: Option<FirstCharInfo>,
    pub bmh: Option<BmhTable>,
    pub flags: Flags,
}
