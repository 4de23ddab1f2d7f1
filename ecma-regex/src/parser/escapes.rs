//! Escape-sequence decoding shared between atom context (`\d`, `\uXXXX`, ...)
//! and bracket-expression context (`[\d\s]`, `\q{...}`, ...).

use ecma_unicode::properties::{lookup_property_name, property_ranges, Property};
use ecma_unicode::range::RangeSet;
use ecma_unicode::CodePoint;

use crate::error::Error;

/// The result of decoding one `\...` escape.
pub enum Escape {
    /// A single literal code point (`\n`, `\xHH`, `\u{H+}`, `\cX`, ...).
    Literal(CodePoint),
    /// A predefined class shorthand (`\d`, `\D`, `\s`, `\S`, `\w`, `\W`); the
    /// bool is whether it is negated.
    Class(ShorthandClass, bool),
    /// `\p{Name}` / `\P{Name}`, negated per the bool.
    Property(RangeSet, bool),
    /// `\b` inside a class body means backspace (U+0008), handled by the caller.
    Backspace,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShorthandClass {
    Digit,
    Space,
    Word,
}

/// Decodes the escape beginning right after the `\` at `chars[*pos]`,
/// advancing `*pos` past it.
pub fn decode_escape(chars: &[char], pos: &mut usize, offset_base: usize) -> Result<Escape, Error> {
    let start = *pos;
    let Some(&c) = chars.get(*pos) else {
        return Err(Error::Escape { offset: offset_base + start });
    };
    *pos += 1;

    Ok(match c {
        'n' => Escape::Literal('\n' as CodePoint),
        'r' => Escape::Literal('\r' as CodePoint),
        't' => Escape::Literal('\t' as CodePoint),
        'f' => Escape::Literal(0x0C),
        'v' => Escape::Literal(0x0B),
        'b' => Escape::Backspace,
        '0' => Escape::Literal(0),
        'd' => Escape::Class(ShorthandClass::Digit, false),
        'D' => Escape::Class(ShorthandClass::Digit, true),
        's' => Escape::Class(ShorthandClass::Space, false),
        'S' => Escape::Class(ShorthandClass::Space, true),
        'w' => Escape::Class(ShorthandClass::Word, false),
        'W' => Escape::Class(ShorthandClass::Word, true),
        'x' => Escape::Literal(decode_hex_fixed(chars, pos, 2, offset_base)?),
        'u' => Escape::Literal(decode_unicode_escape(chars, pos, offset_base)?),
        'c' => {
            let Some(&ctrl) = chars.get(*pos) else {
                return Err(Error::Escape { offset: offset_base + *pos });
            };
            *pos += 1;
            Escape::Literal((ctrl as u32) % 32)
        }
        'p' | 'P' => {
            let negated = c == 'P';
            let name = decode_brace_name(chars, pos, offset_base)?;
            let prop = lookup_property_name(&name)
                .ok_or_else(|| Error::Property { name: name.clone(), offset: offset_base + start })?;
            Escape::Property(property_ranges(prop).clone(), negated)
        }
        other if other.is_ascii_punctuation() || other == ' ' => Escape::Literal(other as CodePoint),
        other => Escape::Literal(other as CodePoint),
    })
}

fn decode_hex_fixed(chars: &[char], pos: &mut usize, n: usize, offset_base: usize) -> Result<CodePoint, Error> {
    let digits: String = chars.get(*pos..*pos + n).map(|s| s.iter().collect()).ok_or(Error::Escape {
        offset: offset_base + *pos,
    })?;
    let value = u32::from_str_radix(&digits, 16).map_err(|_| Error::Escape { offset: offset_base + *pos })?;
    *pos += n;
    Ok(value)
}

fn decode_unicode_escape(chars: &[char], pos: &mut usize, offset_base: usize) -> Result<CodePoint, Error> {
    if chars.get(*pos) == Some(&'{') {
        *pos += 1;
        let start = *pos;
        while chars.get(*pos).is_some_and(|c| c.is_ascii_hexdigit()) {
            *pos += 1;
        }
        let digits: String = chars[start..*pos].iter().collect();
        if chars.get(*pos) != Some(&'}') || digits.is_empty() {
            return Err(Error::Escape { offset: offset_base + start });
        }
        *pos += 1;
        let value = u32::from_str_radix(&digits, 16).map_err(|_| Error::Escape { offset: offset_base + start })?;
        if value > ecma_unicode::MAX_CODE_POINT {
            return Err(Error::Escape { offset: offset_base + start });
        }
        Ok(value)
    } else {
        decode_hex_fixed(chars, pos, 4, offset_base)
    }
}

fn decode_brace_name(chars: &[char], pos: &mut usize, offset_base: usize) -> Result<String, Error> {
    if chars.get(*pos) != Some(&'{') {
        return Err(Error::Escape { offset: offset_base + *pos });
    }
    *pos += 1;
    let start = *pos;
    while chars.get(*pos).is_some_and(|&c| c != '}') {
        *pos += 1;
    }
    if chars.get(*pos) != Some(&'}') {
        return Err(Error::Escape { offset: offset_base + start });
    }
    let name: String = chars[start..*pos].iter().collect();
    *pos += 1;
    Ok(name)
}

pub fn shorthand_set(which: ShorthandClass) -> RangeSet {
    match which {
        ShorthandClass::Digit => RangeSet::from_sorted_ranges(vec![(b'0' as u32, b'9' as u32)]),
        ShorthandClass::Space => property_ranges(Property::WhiteSpace).clone(),
        ShorthandClass::Word => RangeSet::from_sorted_ranges(vec![
            (b'0' as u32, b'9' as u32),
            (b'A' as u32, b'Z' as u32),
            (b'_' as u32, b'_' as u32),
            (b'a' as u32, b'z' as u32),
        ]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(s: &str) -> Escape {
        let chars: Vec<char> = s.chars().collect();
        let mut pos = 1;
        decode_escape(&chars, &mut pos, 0).unwrap()
    }

    #[test]
    fn hex_escape() {
        assert!(matches!(decode("\\x41"), Escape::Literal(0x41)));
    }

    #[test]
    fn unicode_brace_escape() {
        assert!(matches!(decode("\\u{1F600}"), Escape::Literal(0x1F600)));
    }

    #[test]
    fn property_escape() {
        assert!(matches!(decode("\\p{Alphabetic}"), Escape::Property(_, false)));
        assert!(matches!(decode("\\P{Alphabetic}"), Escape::Property(_, true)));
    }

    #[test]
    fn shorthand_word() {
        assert!(matches!(decode("\\w"), Escape::Class(ShorthandClass::Word, false)));
    }
}
