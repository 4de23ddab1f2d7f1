/*!
Code-point level Unicode data for the `ecma-regex` engine.

## Features
- [Range-set](range) — sorted, disjoint code-point intervals with set algebra and an
  Eytzinger-ordered lookup copy.
- [Case folding](case_fold) — simple case folding plus the reverse equivalence
  sets ECMAScript's `i` flag needs for character classes.
- [Binary/category properties](properties) and [sequence (string) properties](sequence)
  for `\p{...}` and `v`-mode `\p{StringProp}`.

## Crate features
*/
#![cfg_attr(feature = "doc", doc = document_features::document_features!())]

pub mod case_fold;
pub mod properties;
pub mod range;
pub mod sequence;

/// A Unicode code point, 21 bits wide (0..=0x10FFFF).
pub type CodePoint = u32;

/// Highest valid Unicode code point.
pub const MAX_CODE_POINT: CodePoint = 0x10FFFF;

/// Sentinel meaning "no value". Also doubles as [`COMPOSITE_MARK`], a header-row
/// marker used by composite character classes built from several sub-ranges.
pub const INVALID: CodePoint = CodePoint::MAX;

/// See [`INVALID`] — shares its bit pattern by design (both mean "not a plain code point").
pub const COMPOSITE_MARK: CodePoint = INVALID;

/// Unbounded quantifier upper bound (`{n,}`).
pub const INFINITY: u32 = u32::MAX;
