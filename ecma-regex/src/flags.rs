//! Public match/compile flags.

use bitflags::bitflags;

bitflags! {
    /// Compile-time and search-time flags, mirroring ECMAScript's `RegExp` flag
    /// letters plus a handful of POSIX-style match-time overrides.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Flags: u32 {
        /// `i` — case-insensitive matching (via simple case folding).
        const ICASE = 1 << 0;
        /// `m` — `^`/`$` match at line boundaries, not just string boundaries.
        const MULTILINE = 1 << 1;
        /// `s` — `.` also matches line terminators.
        const DOTALL = 1 << 2;
        /// `v` — unicode-sets mode: class-set operators (`&&`, `--`) and
        /// `\q{...}` string literals are recognised.
        const UNICODE_SETS = 1 << 3;

        /// Treat the start of `text` as NOT a line/string boundary for `^`.
        const MATCH_NOT_BOL = 1 << 8;
        /// Treat the end of `text` as NOT a line/string boundary for `$`.
        const MATCH_NOT_EOL = 1 << 9;
        /// Treat the start of `text` as NOT a word boundary for `\b`.
        const MATCH_NOT_BOW = 1 << 10;
        /// Treat the end of `text` as NOT a word boundary for `\b`.
        const MATCH_NOT_EOW = 1 << 11;
        /// Reject a match that is the empty string.
        const MATCH_NOT_NULL = 1 << 12;
        /// Only accept a match starting exactly at the search position.
        const MATCH_CONTINUOUS = 1 << 13;
        /// The caller guarantees there is readable text before the search
        /// start (affects lookbehind and `\b` at position 0).
        const MATCH_PREV_AVAIL = 1 << 14;
    }
}

impl Flags {
    pub fn icase(self) -> bool {
        self.contains(Flags::ICASE)
    }

    pub fn multiline(self) -> bool {
        self.contains(Flags::MULTILINE)
    }

    pub fn dotall(self) -> bool {
        self.contains(Flags::DOTALL)
    }

    pub fn unicode_sets(self) -> bool {
        self.contains(Flags::UNICODE_SETS)
    }
}
