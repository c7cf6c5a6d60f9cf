// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A simple regular expression library.
//!
//! The syntax of the regular expressions accepted is:
//!
//! ```text
//! regexp:
//!     concatenation { '|' concatenation }
//! concatenation:
//!     { closure }
//! closure:
//!     term [ '*' | '+' | '?' ]
//! term:
//!     '^'
//!     '$'
//!     '.'
//!     character
//!     '[' [ '^' ] character-ranges ']'
//!     '(' regexp ')'
//! ```
//!
//! Patterns are compiled into a Thompson-style NFA and executed by a
//! virtual machine that advances every live state in lock step, one rune
//! at a time. There is no backtracking, so matching time is bounded by
//! the product of the program size and the input length regardless of the
//! pattern. Among all matches the engine picks the leftmost-longest one:
//! the match with the smallest start offset, and of those, the largest
//! end offset.
//!
//! Both `&str` and `&[u8]` inputs are supported; all reported offsets are
//! byte offsets. Byte slices are decoded as UTF-8 during matching, with
//! invalid sequences treated as U+FFFD of width one.
//!
//! # Examples
//!
//! ```rust
//! use regexp::Regexp;
//!
//! let re = Regexp::new("h.llo").unwrap();
//! assert!(re.is_match("well, hello there"));
//! assert_eq!(re.execute("well, hello there"), vec![6, 11]);
//! ```
//!
//! Parenthesized subexpressions capture the text they match:
//!
//! ```rust
//! use regexp::Regexp;
//!
//! let re = Regexp::new("(a+)(b+)").unwrap();
//! assert_eq!(re.match_strings("xaabbbx"), vec!["aabbb", "aa", "bbb"]);
//! ```

extern crate memchr;

use std::error;
use std::fmt;

pub use re::{is_match, is_match_bytes, quote, Matches, MatchesBytes, Regexp};

mod arena;
mod compile;
mod input;
mod inst;
mod literals;
mod nfa;
mod program;
mod re;

/// An error that occurred while parsing a regular expression.
///
/// (Once an expression is compiled, it is not possible to produce an error
/// via searching or replacing.)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// The parser reached an impossible state. Seeing this is a bug.
    Internal,
    /// A `(` with no matching `)`.
    UnmatchedLpar,
    /// A `)` with no matching `(`.
    UnmatchedRpar,
    /// A `[` with no matching `]`.
    UnmatchedLbkt,
    /// A `]` with no matching `[`.
    UnmatchedRbkt,
    /// A malformed range in a character class, e.g. `[z-a]`.
    BadRange,
    /// A `\` at the end of the pattern.
    ExtraneousBackslash,
    /// A closure applied to a closure, e.g. `a**`.
    BadClosure,
    /// A closure with no preceding term, e.g. `*`.
    BareClosure,
    /// An escape of a character that is not a metacharacter.
    BadBackslash,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let msg = match *self {
            Error::Internal => "internal error",
            Error::UnmatchedLpar => "unmatched '('",
            Error::UnmatchedRpar => "unmatched ')'",
            Error::UnmatchedLbkt => "unmatched '['",
            Error::UnmatchedRbkt => "unmatched ']'",
            Error::BadRange => "bad range in character class",
            Error::ExtraneousBackslash => "extraneous backslash",
            Error::BadClosure => "repeated closure (**, ++, etc.)",
            Error::BareClosure => "closure applies to nothing",
            Error::BadBackslash => "illegal backslash escape",
        };
        write!(f, "{}", msg)
    }
}

impl error::Error for Error {}
