// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use compile::special;
use input::{decode_utf8, ByteInput, CharInput};
use nfa::Nfa;
use program::Program;
use Error;

/// Escapes all regular expression metacharacters in `text`, so the
/// returned string is a regular expression matching the literal text.
/// For example, `quote("[foo]")` returns `\[foo\]`.
pub fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(2 * text.len());
    for c in text.chars() {
        if special(c) {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted
}

/// Compiles the expression and tests whether it matches the string.
/// Anything more involved should compile once with `Regexp::new` and use
/// the methods on the result.
pub fn is_match(expr: &str, text: &str) -> Result<bool, Error> {
    Regexp::new(expr).map(|re| re.is_match(text))
}

/// Compiles the expression and tests whether it matches the byte slice.
pub fn is_match_bytes(expr: &str, bytes: &[u8]) -> Result<bool, Error> {
    Regexp::new(expr).map(|re| re.is_match_bytes(bytes))
}

/// Regexp is a compiled regular expression.
///
/// Compiling is the only fallible step; every search method on a compiled
/// Regexp simply reports the absence of a match. The compiled program is
/// never mutated by searching, so a Regexp can be shared freely.
#[derive(Clone, Debug)]
pub struct Regexp {
    prog: Program,
}

impl Regexp {
    /// Compiles the regular expression, returning an error if the
    /// expression does not belong to the accepted grammar.
    pub fn new(expr: &str) -> Result<Regexp, Error> {
        Program::new(expr).map(|prog| Regexp { prog: prog })
    }

    /// Like `new`, but panics if the expression cannot be parsed.
    ///
    /// This simplifies initialization from expression literals that are
    /// known to be well formed.
    pub fn must_compile(expr: &str) -> Regexp {
        match Regexp::new(expr) {
            Ok(re) => re,
            Err(err) => panic!("regexp: compiling `{}`: {}", expr, err),
        }
    }

    /// The original expression string.
    pub fn as_str(&self) -> &str {
        &self.prog.original
    }

    /// The number of parenthesized subexpressions in the expression.
    pub fn num_subexp(&self) -> usize {
        self.prog.nbra
    }

    /// Matches the expression against the string, returning an array of
    /// byte offsets in pairs identifying the positions of matching
    /// substrings: `text[a[0]..a[1]]` is the substring matched by the
    /// whole expression and `text[a[2*i]..a[2*i+1]]` the one matched by
    /// the i-th parenthesized subexpression. A negative pair means the
    /// subexpression did not match anything. An empty array means no
    /// match.
    pub fn execute(&self, text: &str) -> Vec<isize> {
        self.exec_str(text, 0).unwrap_or(Vec::new())
    }

    /// Like `execute`, on a byte slice.
    pub fn execute_bytes(&self, bytes: &[u8]) -> Vec<isize> {
        self.exec_bytes(bytes, 0).unwrap_or(Vec::new())
    }

    /// Returns whether the expression matches the string.
    pub fn is_match(&self, text: &str) -> bool {
        self.exec_str(text, 0).is_some()
    }

    /// Returns whether the expression matches the byte slice.
    pub fn is_match_bytes(&self, bytes: &[u8]) -> bool {
        self.exec_bytes(bytes, 0).is_some()
    }

    /// Matches the expression against the string, returning the matched
    /// substrings: the whole match first, then one entry per
    /// parenthesized subexpression. A subexpression that did not match
    /// yields the empty string at its slot. An empty vector means no
    /// match.
    pub fn match_strings<'t>(&self, text: &'t str) -> Vec<&'t str> {
        match self.exec_str(text, 0) {
            None => Vec::new(),
            Some(m) => (0..m.len() / 2)
                .map(|i| {
                    if m[2 * i] >= 0 {
                        &text[m[2 * i] as usize..m[2 * i + 1] as usize]
                    } else {
                        ""
                    }
                })
                .collect(),
        }
    }

    /// Like `match_strings`, on a byte slice.
    pub fn match_slices<'t>(&self, bytes: &'t [u8]) -> Vec<&'t [u8]> {
        match self.exec_bytes(bytes, 0) {
            None => Vec::new(),
            Some(m) => (0..m.len() / 2)
                .map(|i| {
                    if m[2 * i] >= 0 {
                        &bytes[m[2 * i] as usize..m[2 * i + 1] as usize]
                    } else {
                        &bytes[0..0]
                    }
                })
                .collect(),
        }
    }

    /// Returns a copy of `src` in which all matches of the expression
    /// have been replaced by `repl`. No support is provided for
    /// expressions (e.g. `\1`) in the replacement string.
    pub fn replace_all(&self, src: &str, repl: &str) -> String {
        self.replace_all_func(src, |_| repl.to_owned())
    }

    /// Returns a copy of `src` in which all matches of the expression
    /// have been replaced by the return value of `repl` applied to the
    /// matched substring.
    pub fn replace_all_func<F>(&self, src: &str, mut repl: F) -> String
    where
        F: FnMut(&str) -> String,
    {
        let mut out = String::with_capacity(src.len());
        // end of the most recent match
        let mut last_match_end = 0;
        // where we next look for a match
        let mut search_pos = 0;
        while search_pos <= src.len() {
            let m = match self.exec_str(src, search_pos) {
                None => break,
                Some(m) => m,
            };
            let (ms, me) = (m[0] as usize, m[1] as usize);

            // copy the unmatched text before this match
            out.push_str(&src[last_match_end..ms]);

            // Insert the replacement, but not for a match of the empty
            // string immediately after another match. (Otherwise patterns
            // that match both empty and nonempty strings would get a
            // double replacement.)
            if me > last_match_end || ms == 0 {
                out.push_str(&repl(&src[ms..me]));
            }
            last_match_end = me;

            // move past this match, always by at least one rune
            let width = src[search_pos..]
                .chars()
                .next()
                .map_or(0, |c| c.len_utf8());
            if search_pos + width > me {
                search_pos += width;
            } else if search_pos + 1 > me {
                // a zero width only happens at the end of the input
                search_pos += 1;
            } else {
                search_pos = me;
            }
        }
        // the unmatched tail
        out.push_str(&src[last_match_end..]);
        out
    }

    /// Like `replace_all`, on a byte slice.
    pub fn replace_all_bytes(&self, src: &[u8], repl: &[u8]) -> Vec<u8> {
        self.replace_all_bytes_func(src, |_| repl.to_vec())
    }

    /// Like `replace_all_func`, on a byte slice.
    pub fn replace_all_bytes_func<F>(&self, src: &[u8], mut repl: F) -> Vec<u8>
    where
        F: FnMut(&[u8]) -> Vec<u8>,
    {
        let mut out = Vec::with_capacity(src.len());
        let mut last_match_end = 0;
        let mut search_pos = 0;
        while search_pos <= src.len() {
            let m = match self.exec_bytes(src, search_pos) {
                None => break,
                Some(m) => m,
            };
            let (ms, me) = (m[0] as usize, m[1] as usize);
            out.extend_from_slice(&src[last_match_end..ms]);
            if me > last_match_end || ms == 0 {
                out.extend_from_slice(&repl(&src[ms..me]));
            }
            last_match_end = me;
            let width =
                decode_utf8(&src[search_pos..]).map_or(0, |(_, width)| width);
            if search_pos + width > me {
                search_pos += width;
            } else if search_pos + 1 > me {
                search_pos += 1;
            } else {
                search_pos = me;
            }
        }
        out.extend_from_slice(&src[last_match_end..]);
        out
    }

    /// Collects the successive, non-overlapping matches of the expression
    /// within the string. An empty match abutting a preceding match is
    /// skipped. At most `n` matches are returned, with `n == 0` meaning
    /// no limit.
    pub fn all_matches<'t>(&self, text: &'t str, n: usize) -> Vec<&'t str> {
        self.all_matches_iter(text, n).collect()
    }

    /// Like `all_matches`, on a byte slice.
    pub fn all_matches_bytes<'t>(
        &self,
        bytes: &'t [u8],
        n: usize,
    ) -> Vec<&'t [u8]> {
        self.all_matches_bytes_iter(bytes, n).collect()
    }

    /// Returns an iterator over the successive, non-overlapping matches
    /// of the expression within the string, yielding them lazily from
    /// left to right under the same rules as `all_matches`. Dropping the
    /// iterator early costs nothing; the expression is not consumed.
    pub fn all_matches_iter<'r, 't>(
        &'r self,
        text: &'t str,
        n: usize,
    ) -> Matches<'r, 't> {
        Matches {
            re: self,
            text: text,
            pos: 0,
            prev_match_end: None,
            limit: n,
            count: 0,
        }
    }

    /// Like `all_matches_iter`, on a byte slice.
    pub fn all_matches_bytes_iter<'r, 't>(
        &'r self,
        bytes: &'t [u8],
        n: usize,
    ) -> MatchesBytes<'r, 't> {
        MatchesBytes {
            re: self,
            bytes: bytes,
            pos: 0,
            prev_match_end: None,
            limit: n,
            count: 0,
        }
    }

    fn exec_str(&self, text: &str, pos: usize) -> Option<Vec<isize>> {
        Nfa::exec(&self.prog, CharInput::new(text), pos)
    }

    fn exec_bytes(&self, bytes: &[u8], pos: usize) -> Option<Vec<isize>> {
        Nfa::exec(&self.prog, ByteInput::new(bytes), pos)
    }
}

/// An iterator over the successive matches of an expression in a string.
#[derive(Debug)]
pub struct Matches<'r, 't> {
    re: &'r Regexp,
    text: &'t str,
    pos: usize,
    prev_match_end: Option<usize>,
    limit: usize,
    count: usize,
}

impl<'r, 't> Iterator for Matches<'r, 't> {
    type Item = &'t str;

    fn next(&mut self) -> Option<&'t str> {
        let end = self.text.len();
        while (self.limit == 0 || self.count < self.limit) && self.pos <= end
        {
            let m = match self.re.exec_str(self.text, self.pos) {
                None => return None,
                Some(m) => m,
            };
            let (ms, me) = (m[0] as usize, m[1] as usize);
            let mut accept = true;
            if me == self.pos {
                // An empty match. Don't allow one right after a previous
                // match, and step over it by a rune either way.
                if Some(ms) == self.prev_match_end {
                    accept = false;
                }
                let width = self.text[self.pos..]
                    .chars()
                    .next()
                    .map_or(0, |c| c.len_utf8());
                if width > 0 {
                    self.pos += width;
                } else {
                    self.pos = end + 1;
                }
            } else {
                self.pos = me;
            }
            self.prev_match_end = Some(me);
            if accept {
                self.count += 1;
                return Some(&self.text[ms..me]);
            }
        }
        None
    }
}

/// An iterator over the successive matches of an expression in a byte
/// slice.
#[derive(Debug)]
pub struct MatchesBytes<'r, 't> {
    re: &'r Regexp,
    bytes: &'t [u8],
    pos: usize,
    prev_match_end: Option<usize>,
    limit: usize,
    count: usize,
}

impl<'r, 't> Iterator for MatchesBytes<'r, 't> {
    type Item = &'t [u8];

    fn next(&mut self) -> Option<&'t [u8]> {
        let end = self.bytes.len();
        while (self.limit == 0 || self.count < self.limit) && self.pos <= end
        {
            let m = match self.re.exec_bytes(self.bytes, self.pos) {
                None => return None,
                Some(m) => m,
            };
            let (ms, me) = (m[0] as usize, m[1] as usize);
            let mut accept = true;
            if me == self.pos {
                if Some(ms) == self.prev_match_end {
                    accept = false;
                }
                let width = decode_utf8(&self.bytes[self.pos..])
                    .map_or(0, |(_, width)| width);
                if width > 0 {
                    self.pos += width;
                } else {
                    self.pos = end + 1;
                }
            } else {
                self.pos = me;
            }
            self.prev_match_end = Some(me);
            if accept {
                self.count += 1;
                return Some(&self.bytes[ms..me]);
            }
        }
        None
    }
}
