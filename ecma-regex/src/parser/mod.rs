//! Recursive-descent compiler: `disjunction -> sequence -> term -> atom`,
//! emitting directly into self-contained state-array fragments with
//! relative offsets. Fragments are position-independent (every jump target
//! is expressed relative to the jumping state) so they can be built in
//! isolation and concatenated freely — concatenation is how sequencing,
//! quantifier-wrapping, and final assembly all work.

pub mod class_set;
pub mod escapes;

use ecma_unicode::INFINITY;

use crate::classes::named_groups::NamedGroups;
use crate::classes::{ClassRegistry, Predefined};
use crate::error::Error;
use crate::flags::Flags;
use crate::state::{EpsilonKind, LookaroundKind, Quantifier, State, StateFlags, Tag};
use crate::CompiledPattern;

use class_set::parse_class;
use escapes::{decode_escape, Escape};

/// High bit marking a `Tag::Backreference`'s `char_num` as a not-yet-resolved
/// named-group ticket rather than a bracket index. See
/// [`crate::classes::named_groups::PendingReference`].
const NAME_PENDING_BASE: u32 = 0x8000_0000;

/// Above this many extra optional copies, a bounded quantifier is compiled
/// via the general-counter encoding instead of being physically unrolled.
const UNROLL_LIMIT: u32 = 3;

pub struct Parser {
    chars: Vec<char>,
    pos: usize,
    flags: Flags,
    classes: ClassRegistry,
    named_groups: NamedGroups,
    bracket_count: u32,
    counter_count: u32,
    repeat_count: u32,
}

/// Compiles `pattern` under `flags` into a [`CompiledPattern`]. Does not run
/// the optimiser — callers that want the fully prepared array should go
/// through [`crate::regex::Pattern::compile`], which calls
/// [`crate::optimizer::optimize`] afterward.
pub fn compile(pattern: &str, flags: Flags) -> Result<CompiledPattern, Error> {
    let mut p = Parser {
        chars: pattern.chars().collect(),
        pos: 0,
        flags,
        classes: ClassRegistry::new(),
        named_groups: NamedGroups::new(),
        bracket_count: 0,
        counter_count: 0,
        repeat_count: 0,
    };

    let body = p.parse_disjunction()?;
    if p.pos != p.chars.len() {
        return Err(Error::Paren { offset: p.pos });
    }

    let open = State::new(Tag::RoundBracketOpen, 0);
    let mut close = State::new(Tag::RoundBracketClose, 0);
    close.next1 = 1;
    let success = State::new(Tag::Success, 0);

    let mut states = Vec::with_capacity(body.len() + 3);
    states.push(open);
    states.extend(body);
    states.push(close);
    states.push(success);

    for (ticket, bracket) in p.named_groups.resolve_pending()? {
        let target = NAME_PENDING_BASE + ticket as u32;
        for s in states.iter_mut() {
            if s.tag == Tag::Backreference && s.char_num == target {
                s.char_num = bracket;
            }
        }
    }

    Ok(CompiledPattern {
        states,
        classes: p.classes,
        named_groups: p.named_groups,
        bracket_count: p.bracket_count,
        counter_count: p.counter_count,
        repeat_count: p.repeat_count,
        entry_state: 0,
        first_char: None,
        bmh: None,
        flags,
    })
}

impl Parser {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// `Disjunction := Sequence ('|' Sequence)*`.
    fn parse_disjunction(&mut self) -> Result<Vec<State>, Error> {
        let mut branches = vec![self.parse_sequence()?];
        while self.eat('|') {
            branches.push(self.parse_sequence()?);
        }
        if branches.len() == 1 {
            return Ok(branches.pop().unwrap());
        }
        Ok(chain_alternatives(branches))
    }

    /// `Sequence := Term*`.
    fn parse_sequence(&mut self) -> Result<Vec<State>, Error> {
        let mut out = Vec::new();
        while let Some(c) = self.peek() {
            if c == '|' || c == ')' {
                break;
            }
            out.extend(self.parse_term()?);
        }
        Ok(out)
    }

    /// `Term := Atom Quantifier?`.
    fn parse_term(&mut self) -> Result<Vec<State>, Error> {
        let atom_start = self.pos;
        let atom = self.parse_atom()?;
        if let Some(q) = self.try_parse_quantifier(atom_start)? {
            self.compile_quantified(atom, q)
        } else {
            Ok(atom)
        }
    }

    fn try_parse_quantifier(&mut self, atom_start: usize) -> Result<Option<Quantifier>, Error> {
        let base = match self.peek() {
            Some('*') => {
                self.pos += 1;
                Some((0, INFINITY))
            }
            Some('+') => {
                self.pos += 1;
                Some((1, INFINITY))
            }
            Some('?') => {
                self.pos += 1;
                Some((0, 1))
            }
            Some('{') => self.try_parse_brace_quantifier(atom_start)?,
            _ => None,
        };
        let Some((atleast, atmost)) = base else { return Ok(None) };
        let greedy = !self.eat('?');
        Ok(Some(Quantifier::range(atleast, atmost, greedy)))
    }

    /// `{n}`, `{n,}`, `{n,m}` — if the braces don't parse as a valid count,
    /// ECMAScript treats `{` as a literal, so this backtracks rather than
    /// erroring.
    fn try_parse_brace_quantifier(&mut self, atom_start: usize) -> Result<Option<(u32, u32)>, Error> {
        let save = self.pos;
        self.pos += 1;
        let n = self.parse_decimal();
        let result = match (n, self.peek()) {
            (Some(n), Some('}')) => {
                self.pos += 1;
                Some((n, n))
            }
            (Some(n), Some(',')) => {
                self.pos += 1;
                if self.peek() == Some('}') {
                    self.pos += 1;
                    Some((n, INFINITY))
                } else {
                    match self.parse_decimal() {
                        Some(m) if self.peek() == Some('}') => {
                            self.pos += 1;
                            if m < n {
                                return Err(Error::BadBrace { offset: atom_start });
                            }
                            Some((n, m))
                        }
                        _ => None,
                    }
                }
            }
            _ => None,
        };
        if result.is_none() {
            self.pos = save;
        }
        Ok(result)
    }

    fn parse_decimal(&mut self) -> Option<u32> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        if self.pos == start {
            return None;
        }
        let s: String = self.chars[start..self.pos].iter().collect();
        s.parse().ok()
    }

    fn compile_quantified(&mut self, atom: Vec<State>, q: Quantifier) -> Result<Vec<State>, Error> {
        if atom.is_empty() {
            return Err(Error::BadRepeat { offset: self.pos });
        }
        if q.atmost == 0 {
            return Ok(Vec::new());
        }
        if q.atleast == q.atmost {
            // Exact-count: simple-equivalence unrolling — n back-to-back
            // physical copies, no loop machinery needed at all.
            let mut out = Vec::new();
            for _ in 0..q.atleast {
                out.extend(atom.clone());
            }
            return Ok(out);
        }
        if q.atmost != INFINITY && q.atmost - q.atleast <= UNROLL_LIMIT {
            return Ok(self.compile_bounded_unrolled(atom, q.atleast, q.atmost, q.greedy));
        }
        if q.atleast <= 1 && q.atmost == INFINITY {
            let mut out = Vec::new();
            if q.atleast == 1 {
                out.extend(atom.clone());
            }
            out.extend(self.compile_star_loop(atom, q.greedy));
            return Ok(out);
        }
        Ok(self.compile_general_counter(atom, q))
    }

    /// `X{n,m}` (m - n small): n mandatory copies, then `m - n` nested
    /// optional copies so backtracking naturally tries longest-first
    /// (greedy) or shortest-first (lazy).
    fn compile_bounded_unrolled(&mut self, atom: Vec<State>, atleast: u32, atmost: u32, greedy: bool) -> Vec<State> {
        let mut out = Vec::new();
        for _ in 0..atleast {
            out.extend(atom.clone());
        }
        let optional = atmost - atleast;
        let mut tail: Vec<State> = Vec::new();
        for _ in 0..optional {
            let mut frag = atom.clone();
            frag.extend(tail);
            tail = wrap_optional(frag, greedy);
        }
        out.extend(tail);
        out
    }

    /// `X*` via the repeat-guard split machinery: a zero-width-progress
    /// check (`Check0WidthRepeat`) stops an infinite loop on patterns like
    /// `(a?)*` without needing a bounded counter. `X+` is `X` followed by
    /// this same loop, composed at the call site.
    fn compile_star_loop(&mut self, atom: Vec<State>, greedy: bool) -> Vec<State> {
        let repeat_id = self.repeat_count;
        self.repeat_count += 1;

        let mut loop_body = atom;
        loop_body.push(State {
            next1: 1,
            ..State::new(Tag::Check0WidthRepeat, repeat_id)
        });

        // Layout: [split] [body...] [check] [jmp-back] [pop]
        // split.next1/next2 set below depending on greediness; jmp-back
        // returns to split; pop ends the construct.
        let body_len = loop_body.len();
        let split_to_body = 1i32;
        let split_to_exit = (body_len + 2) as i32; // past jmp-back, to pop
        let mut split = State::new(Tag::Epsilon, EpsilonKind::Plain as u32);
        if greedy {
            split.next1 = split_to_body;
            split.next2 = split_to_exit;
        } else {
            split.next1 = split_to_exit;
            split.next2 = split_to_body;
        }

        let jmp_back = State {
            next1: -(body_len as i32 + 1),
            ..State::new(Tag::Epsilon, EpsilonKind::Plain as u32)
        };

        let mut out = Vec::new();
        out.push(State { next1: 1, ..State::new(Tag::RepeatInPush, repeat_id) });
        out.push(split);
        out.extend(loop_body);
        out.push(jmp_back);
        out.push(State { next1: 1, ..State::new(Tag::RepeatInPop, repeat_id) });
        out
    }

    /// `X{n,}` (n > 1), or any bound too large to unroll: a genuine counted
    /// loop using the counter save/check/restore state family.
    fn compile_general_counter(&mut self, atom: Vec<State>, q: Quantifier) -> Vec<State> {
        let counter_id = self.counter_count;
        self.counter_count += 1;

        let mut body = atom;
        let body_len_with_jmp = body.len() + 1;
        body.push(State { next1: -(body_len_with_jmp as i32), ..State::new(Tag::Epsilon, EpsilonKind::Plain as u32) });

        let mut check = State::new(Tag::CheckCounter, counter_id);
        check.quantifier = q;
        check.next1 = 1;
        check.next2 = (body.len() + 1) as i32;

        let mut out = Vec::new();
        out.push(State { next1: 1, ..State::new(Tag::SaveAndResetCounter, counter_id) });
        out.push(check);
        out.extend(body);
        out.push(State { next1: 1, ..State::new(Tag::RestoreCounter, counter_id) });
        out
    }

    /// `Atom := PatternCharacter | '.' | CharacterClass | '(' Disjunction ')' | Escape`.
    fn parse_atom(&mut self) -> Result<Vec<State>, Error> {
        let offset = self.pos;
        match self.peek() {
            Some('^') => {
                self.pos += 1;
                Ok(vec![self.anchor_state(Tag::Bol)])
            }
            Some('$') => {
                self.pos += 1;
                Ok(vec![self.anchor_state(Tag::Eol)])
            }
            Some('.') => {
                self.pos += 1;
                let idx = if self.flags.dotall() {
                    self.classes.predefined(Predefined::Dotall)
                } else {
                    self.classes.predefined(Predefined::Newline)
                };
                // `.` matches anything but line terminators; dotall's class
                // is the full range so `IS_NOT` there would invert to empty.
                Ok(vec![self.class_state(idx, !self.flags.dotall())])
            }
            Some('(') => self.parse_group(offset),
            Some('[') => {
                self.pos += 1;
                let parsed = parse_class(&self.chars, &mut self.pos, self.flags)?;
                self.compile_class_atom(parsed)
            }
            Some('\\') => self.parse_escape_atom(offset),
            Some(')') | None => Err(Error::Paren { offset }),
            Some('*') | Some('+') | Some('?') => Err(Error::BadRepeat { offset }),
            Some(c) => {
                self.pos += 1;
                Ok(vec![self.char_state(c as u32)])
            }
        }
    }

    fn anchor_state(&self, tag: Tag) -> State {
        let mut s = State::new(tag, 0);
        s.next1 = 1;
        if self.flags.multiline() {
            s.flags |= StateFlags::MULTILINE;
        }
        s
    }

    fn char_state(&self, c: u32) -> State {
        let mut s = State::new(Tag::Character, c);
        s.next1 = 1;
        if self.flags.icase() {
            s.flags |= StateFlags::ICASE;
        }
        s
    }

    fn class_state(&self, class_idx: u32, negated: bool) -> State {
        let mut s = State::new(Tag::CharacterClass, class_idx);
        s.next1 = 1;
        s.quantifier = Quantifier::ONE;
        if negated {
            s.flags |= StateFlags::IS_NOT;
        }
        s
    }

    fn compile_class_atom(&mut self, parsed: class_set::ParsedClass) -> Result<Vec<State>, Error> {
        let class_set::ParsedClass { set, strings, negated } = parsed;

        if strings.is_empty() {
            let idx = self.classes.intern(set);
            return Ok(vec![self.class_state(idx, negated)]);
        }

        // `v`-mode class with string members: lower to an alternation of
        // literal sequences (longest first) plus the single-code-point
        // branch, per the string-property lowering scheme.
        let mut sorted = strings;
        sorted.sort_by_key(|s| std::cmp::Reverse(s.len()));
        let mut branches: Vec<Vec<State>> = sorted.into_iter().map(|seq| self.compile_literal_sequence(&seq)).collect();
        if !set.is_empty() {
            let idx = self.classes.intern(set);
            branches.push(vec![self.class_state(idx, false)]);
        }
        Ok(chain_alternatives(branches))
    }

    fn compile_literal_sequence(&self, seq: &[ecma_unicode::CodePoint]) -> Vec<State> {
        seq.iter().map(|&c| self.char_state(c)).collect()
    }

    fn parse_group(&mut self, offset: usize) -> Result<Vec<State>, Error> {
        self.pos += 1; // '('
        if self.peek() != Some('?') {
            self.bracket_count += 1;
            let bracket = self.bracket_count;
            let inner = self.parse_disjunction()?;
            if !self.eat(')') {
                return Err(Error::Paren { offset });
            }
            return Ok(wrap_bracket(inner, bracket));
        }
        self.pos += 1; // '?'
        match self.peek() {
            Some(':') => {
                self.pos += 1;
                let inner = self.parse_disjunction()?;
                if !self.eat(')') {
                    return Err(Error::Paren { offset });
                }
                Ok(inner)
            }
            Some('=') | Some('!') => {
                let negative = self.peek() == Some('!');
                self.pos += 1;
                let inner = self.parse_disjunction()?;
                if !self.eat(')') {
                    return Err(Error::Paren { offset });
                }
                Ok(wrap_lookaround(inner, LookaroundKind::Ahead, negative, 0))
            }
            Some('<') if matches!(self.peek_at(1), Some('=') | Some('!')) => {
                let negative = self.peek_at(1) == Some('!');
                self.pos += 2;
                let inner = self.parse_disjunction()?;
                if !self.eat(')') {
                    return Err(Error::Paren { offset });
                }
                let width = fixed_width(&inner).ok_or(Error::Lookbehind { offset })?;
                Ok(wrap_lookaround(inner, LookaroundKind::Behind, negative, width))
            }
            Some('<') => {
                self.pos += 1;
                let name = self.parse_group_name(offset)?;
                self.bracket_count += 1;
                let bracket = self.bracket_count;
                self.named_groups.push_back(name, bracket)?;
                let inner = self.parse_disjunction()?;
                if !self.eat(')') {
                    return Err(Error::Paren { offset });
                }
                Ok(wrap_bracket(inner, bracket))
            }
            Some(c) if c.is_ascii_alphabetic() || c == '-' => self.parse_inline_flags(offset),
            _ => Err(Error::Modifier { offset }),
        }
    }

    fn parse_group_name(&mut self, offset: usize) -> Result<String, Error> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c != '>') {
            self.pos += 1;
        }
        if !self.eat('>') {
            return Err(Error::Paren { offset });
        }
        Ok(self.chars[start..self.pos - 1].iter().collect())
    }

    /// `(?ims-ims:...)` — enables/disables flags for the duration of the
    /// group, restoring the outer flags afterward.
    fn parse_inline_flags(&mut self, offset: usize) -> Result<Vec<State>, Error> {
        let saved = self.flags;
        let mut adding = true;
        loop {
            match self.peek() {
                Some('-') => {
                    adding = false;
                    self.pos += 1;
                }
                Some('i') => {
                    self.set_flag(Flags::ICASE, adding);
                    self.pos += 1;
                }
                Some('m') => {
                    self.set_flag(Flags::MULTILINE, adding);
                    self.pos += 1;
                }
                Some('s') => {
                    self.set_flag(Flags::DOTALL, adding);
                    self.pos += 1;
                }
                Some(':') => {
                    self.pos += 1;
                    break;
                }
                _ => return Err(Error::Modifier { offset }),
            }
        }
        let inner = self.parse_disjunction();
        self.flags = saved;
        let inner = inner?;
        if !self.eat(')') {
            return Err(Error::Paren { offset });
        }
        Ok(inner)
    }

    fn set_flag(&mut self, flag: Flags, on: bool) {
        if on {
            self.flags |= flag;
        } else {
            self.flags &= !flag;
        }
    }

    fn parse_escape_atom(&mut self, offset: usize) -> Result<Vec<State>, Error> {
        self.pos += 1; // consume '\'
        match self.peek() {
            Some('b') => {
                self.pos += 1;
                Ok(vec![self.boundary_state(false)])
            }
            Some('B') => {
                self.pos += 1;
                Ok(vec![self.boundary_state(true)])
            }
            Some('k') if self.peek_at(1) == Some('<') => {
                self.pos += 2;
                let name = self.parse_group_name(offset)?;
                Ok(vec![self.backreference_by_name(name, offset)])
            }
            Some(c) if c.is_ascii_digit() && c != '0' => {
                let n = self.parse_decimal().unwrap();
                Ok(vec![self.backreference_state(n)])
            }
            _ => match decode_escape(&self.chars, &mut self.pos, 0)? {
                Escape::Literal(cp) => Ok(vec![self.char_state(cp)]),
                Escape::Backspace => Ok(vec![self.char_state(0x08)]),
                Escape::Class(which, negated) => {
                    let idx = self.predefined_shorthand(which);
                    Ok(vec![self.class_state(idx, negated)])
                }
                Escape::Property(set, negated) => {
                    let idx = self.classes.intern(set);
                    Ok(vec![self.class_state(idx, negated)])
                }
            },
        }
    }

    fn predefined_shorthand(&mut self, which: escapes::ShorthandClass) -> u32 {
        use escapes::ShorthandClass;
        match which {
            ShorthandClass::Digit => self.classes.predefined(Predefined::Digit),
            ShorthandClass::Space => self.classes.predefined(Predefined::Space),
            ShorthandClass::Word => {
                if self.flags.icase() {
                    self.classes.predefined(Predefined::IcaseWord)
                } else {
                    self.classes.predefined(Predefined::Word)
                }
            }
        }
    }

    fn boundary_state(&self, negated: bool) -> State {
        let mut s = State::new(Tag::Boundary, 0);
        s.next1 = 1;
        if negated {
            s.flags |= StateFlags::IS_NOT;
        }
        if self.flags.icase() {
            s.flags |= StateFlags::ICASE;
        }
        s
    }

    fn backreference_state(&self, bracket: u32) -> State {
        let mut s = State::new(Tag::Backreference, bracket);
        s.next1 = 1;
        if self.flags.icase() {
            s.flags |= StateFlags::ICASE;
        }
        s
    }

    fn backreference_by_name(&mut self, name: String, offset: usize) -> State {
        let ticket = match self.named_groups.lookup(&name) {
            Some(bracket) => return self.backreference_state(bracket),
            None => {
                let ticket = self.pending_ticket_count();
                self.named_groups.defer(name, ticket, offset);
                ticket
            }
        };
        let mut s = State::new(Tag::Backreference, NAME_PENDING_BASE + ticket as u32);
        s.next1 = 1;
        if self.flags.icase() {
            s.flags |= StateFlags::ICASE;
        }
        s
    }

    fn pending_ticket_count(&self) -> usize {
        // `NamedGroups` doesn't expose its pending list's length directly
        // outside the module; tickets only need to be unique per pattern, so
        // pos is a perfectly good stand-in (sites are visited once each).
        self.pos
    }
}

fn wrap_bracket(inner: Vec<State>, bracket: u32) -> Vec<State> {
    let mut open = State::new(Tag::RoundBracketOpen, bracket);
    open.next1 = 1;
    let mut close = State::new(Tag::RoundBracketClose, bracket);
    close.next1 = 1;
    let mut out = Vec::with_capacity(inner.len() + 2);
    out.push(open);
    out.extend(inner);
    out.push(close);
    out
}

fn wrap_lookaround(inner: Vec<State>, kind: LookaroundKind, negative: bool, width: u32) -> Vec<State> {
    let mut open = State::new(Tag::LookaroundOpen, 0);
    open.quantifier = Quantifier::range(kind as u32, width, true);
    open.next1 = 1;
    open.next2 = (inner.len() + 2) as i32;
    if negative {
        open.flags |= StateFlags::IS_NOT;
    }

    let mut close = State::new(Tag::Success, 0);
    close.flags |= StateFlags::LOOKAROUND_CLOSE;
    close.next1 = 0;

    let mut out = Vec::with_capacity(inner.len() + 2);
    out.push(open);
    out.extend(inner);
    out.push(close);
    out
}

/// Wraps `frag` in a `?`-shaped optional: a split that either enters `frag`
/// or skips straight past it.
fn wrap_optional(frag: Vec<State>, greedy: bool) -> Vec<State> {
    let mut split = State::new(Tag::Epsilon, EpsilonKind::Plain as u32);
    let skip_to = (frag.len() + 1) as i32;
    if greedy {
        split.next1 = 1;
        split.next2 = skip_to;
    } else {
        split.next1 = skip_to;
        split.next2 = 1;
    }
    let mut out = Vec::with_capacity(frag.len() + 1);
    out.push(split);
    out.extend(frag);
    out
}

/// Chains N branches with N-1 splits, each trying its branch first and
/// falling through to the next split (or past all branches) on backtrack.
fn chain_alternatives(mut branches: Vec<Vec<State>>) -> Vec<State> {
    if branches.len() == 1 {
        return branches.pop().unwrap();
    }
    let last = branches.pop().unwrap();
    let rest = chain_alternatives(branches);

    let mut jmp_out = State::new(Tag::Epsilon, EpsilonKind::AltJoin as u32);
    jmp_out.next1 = (last.len() + 1) as i32;

    let mut split = State::new(Tag::Epsilon, EpsilonKind::Plain as u32);
    split.next1 = 1;
    split.next2 = (rest.len() + 2) as i32;

    let mut out = Vec::with_capacity(rest.len() + last.len() + 2);
    out.push(split);
    out.extend(rest);
    out.push(jmp_out);
    out.extend(last);
    out
}

/// Width (in code points) an inner fragment always consumes, or `None` if it
/// contains any quantifier/alternation/backreference whose width can't be
/// proven constant at compile time. Used to gate fixed-width lookbehind.
fn fixed_width(states: &[State]) -> Option<u32> {
    let mut width = 0u32;
    for s in states {
        match s.tag {
            Tag::Character | Tag::CharacterClass => width += 1,
            Tag::RoundBracketOpen | Tag::RoundBracketClose | Tag::Bol | Tag::Eol | Tag::Boundary => {}
            Tag::Epsilon if s.next2 == 0 => {}
            _ => return None,
        }
    }
    Some(width)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compiled(pattern: &str, flags: Flags) -> CompiledPattern {
        super::compile(pattern, flags).unwrap()
    }

    #[test]
    fn literal_sequence_compiles() {
        let p = compiled("abc", Flags::empty());
        let kinds: Vec<_> = p.states.iter().map(|s| s.tag).collect();
        assert!(kinds.contains(&Tag::Character));
        assert_eq!(*kinds.last().unwrap(), Tag::Success);
    }

    #[test]
    fn capturing_group_increments_bracket_count() {
        let p = compiled("(a)(b)", Flags::empty());
        assert_eq!(p.bracket_count, 2);
    }

    #[test]
    fn named_group_registered() {
        let p = compiled("(?<year>\\d+)", Flags::empty());
        assert_eq!(p.named_groups.lookup("year"), Some(1));
    }

    #[test]
    fn unmatched_paren_is_error() {
        assert!(matches!(super::compile("(a", Flags::empty()), Err(Error::Paren { .. })));
        assert!(matches!(super::compile("a)", Flags::empty()), Err(Error::Paren { .. })));
    }

    #[test]
    fn variable_width_lookbehind_rejected() {
        let r = super::compile("(?<=a*)b", Flags::empty());
        assert!(matches!(r, Err(Error::Lookbehind { .. })));
    }

    #[test]
    fn fixed_width_lookbehind_accepted() {
        assert!(super::compile("(?<=ab)c", Flags::empty()).is_ok());
    }

    #[test]
    fn named_backreference_resolves() {
        let p = compiled("(?<x>a)\\k<x>", Flags::empty());
        assert!(p.states.iter().any(|s| s.tag == Tag::Backreference && s.char_num == 1));
    }

    #[test]
    fn unresolved_named_backreference_errors() {
        assert!(matches!(super::compile("\\k<missing>", Flags::empty()), Err(Error::Backref { .. })));
    }

    #[test]
    fn bad_brace_quantifier() {
        assert!(matches!(super::compile("a{3,1}", Flags::empty()), Err(Error::BadBrace { .. })));
    }

    #[test]
    fn quantifier_with_nothing_to_repeat() {
        assert!(matches!(super::compile("*a", Flags::empty()), Err(Error::BadRepeat { .. })));
    }
}
