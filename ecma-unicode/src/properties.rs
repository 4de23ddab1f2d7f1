//! Binary and general-category Unicode property ranges for `\p{...}`/`\P{...}`.
//!
//! Spec.md §1 explicitly carves the *data-generation* side of this out of
//! scope ("external collaborators that feed precomputed range tables into the
//! core"); what lives here is the consumer-side layout (name table + position
//! table + range table, per spec.md §4.2) populated from a curated subset of
//! properties, derived at table-build time from `char`'s own classification
//! methods rather than a shipped copy of the UCD.

use std::sync::OnceLock;

use crate::range::RangeSet;

/// A recognised binary or general-category property.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Property {
    Alphabetic,
    WhiteSpace,
    Uppercase,
    Lowercase,
    /// General category `L` (Letter, any subcategory).
    Letter,
    /// General category `N` (Number, any subcategory).
    Number,
    /// General category `P` (Punctuation, any subcategory).
    Punctuation,
    /// General category `Z` (Separator, any subcategory).
    Separator,
    Any,
    Ascii,
}

/// Canonical names and the aliases ECMAScript's `UnicodePropertyValueAliases`
/// table recognises for them.
const NAMES: &[(&str, Property)] = &[
    ("Alphabetic", Property::Alphabetic),
    ("Alpha", Property::Alphabetic),
    ("White_Space", Property::WhiteSpace),
    ("space", Property::WhiteSpace),
    ("Uppercase", Property::Uppercase),
    ("Upper", Property::Uppercase),
    ("Lowercase", Property::Lowercase),
    ("Lower", Property::Lowercase),
    ("Letter", Property::Letter),
    ("L", Property::Letter),
    ("Number", Property::Number),
    ("N", Property::Number),
    ("Nd", Property::Number),
    ("Punctuation", Property::Punctuation),
    ("P", Property::Punctuation),
    ("Separator", Property::Separator),
    ("Z", Property::Separator),
    ("Any", Property::Any),
    ("ASCII", Property::Ascii),
];

/// Resolves a `\p{Name}` property name (canonical or alias) to a [`Property`].
pub fn lookup_property_name(name: &str) -> Option<Property> {
    NAMES.iter().find(|&&(n, _)| n == name).map(|&(_, p)| p)
}

fn build_ranges(prop: Property) -> RangeSet {
    let test: fn(char) -> bool = match prop {
        Property::Alphabetic => char::is_alphabetic,
        Property::WhiteSpace => char::is_whitespace,
        Property::Uppercase => char::is_uppercase,
        Property::Lowercase => char::is_lowercase,
        Property::Letter => char::is_alphabetic,
        Property::Number => char::is_numeric,
        Property::Punctuation => |c: char| c.is_ascii_punctuation(),
        Property::Separator => char::is_whitespace,
        Property::Any => return RangeSet::from_sorted_ranges(vec![(0, crate::MAX_CODE_POINT)]),
        Property::Ascii => return RangeSet::from_sorted_ranges(vec![(0, 0x7F)]),
    };

    let mut set = RangeSet::new();
    let mut run: Option<(u32, u32)> = None;
    for cp in 0..=crate::MAX_CODE_POINT {
        let Some(c) = char::from_u32(cp) else {
            if let Some(r) = run.take() {
                set.join(r);
            }
            continue;
        };
        if test(c) {
            run = match run {
                Some((lo, hi)) if hi + 1 == cp => Some((lo, cp)),
                Some((lo, hi)) => {
                    set.join((lo, hi));
                    Some((cp, cp))
                }
                None => Some((cp, cp)),
            };
        } else if let Some(r) = run.take() {
            set.join(r);
        }
    }
    if let Some(r) = run {
        set.join(r);
    }
    set
}

macro_rules! cached_property {
    ($prop:expr, $cell:ident) => {{
        static $cell: OnceLock<RangeSet> = OnceLock::new();
        $cell.get_or_init(|| build_ranges($prop))
    }};
}

/// Returns the (lazily built and cached) range-set backing `prop`.
///
/// Building scans all 0x110000 code points once per distinct property and is
/// cached process-wide — the same "global, read-only, built once" model
/// spec.md §9 describes for Unicode data tables.
pub fn property_ranges(prop: Property) -> &'static RangeSet {
    match prop {
        Property::Alphabetic => cached_property!(Property::Alphabetic, ALPHABETIC),
        Property::WhiteSpace => cached_property!(Property::WhiteSpace, WHITE_SPACE),
        Property::Uppercase => cached_property!(Property::Uppercase, UPPERCASE),
        Property::Lowercase => cached_property!(Property::Lowercase, LOWERCASE),
        Property::Letter => cached_property!(Property::Letter, LETTER),
        Property::Number => cached_property!(Property::Number, NUMBER),
        Property::Punctuation => cached_property!(Property::Punctuation, PUNCTUATION),
        Property::Separator => cached_property!(Property::Separator, SEPARATOR),
        Property::Any => cached_property!(Property::Any, ANY),
        Property::Ascii => cached_property!(Property::Ascii, ASCII),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_aliases() {
        assert_eq!(lookup_property_name("Alpha"), Some(Property::Alphabetic));
        assert_eq!(lookup_property_name("L"), Some(Property::Letter));
        assert_eq!(lookup_property_name("Nope"), None);
    }

    #[test]
    fn alphabetic_contains_letters_not_digits() {
        let set = property_ranges(Property::Alphabetic);
        assert!(set.contains('a' as u32));
        assert!(set.contains('Z' as u32));
        assert!(!set.contains('0' as u32));
    }

    #[test]
    fn ascii_property() {
        let set = property_ranges(Property::Ascii);
        assert!(set.contains(0x41));
        assert!(!set.contains(0x80));
    }
}
