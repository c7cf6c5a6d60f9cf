// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::fmt;

use compile::Parser;
use inst::{Inst, InstIdx};
use literals::{BuildPrefix, Literal};
use Error;

/// Program represents a compiled regular expression. Once an expression
/// is compiled, its representation is immutable and never changes, so one
/// program may serve any number of simultaneous searches; each search
/// owns its own thread lists and submatch arena.
#[derive(Clone)]
pub struct Program {
    /// The original expression string.
    pub original: String,
    /// The instruction vector. Slot 0 is `Start`; instruction indices are
    /// dense and equal to insertion order.
    pub insts: Vec<Inst>,
    /// The literal every match must begin with (possibly empty).
    pub prefix: Literal,
    /// Where to resume the machine after skipping over the prefix.
    pub prefix_start: InstIdx,
    /// The number of parenthesized subexpressions.
    pub nbra: usize,
}

impl Program {
    /// Compile an expression.
    pub fn new(expr: &str) -> Result<Program, Error> {
        let (insts, nbra) = Parser::parse(expr)?;
        let (prefix, prefix_start) = BuildPrefix::new(&insts).literal();
        Ok(Program {
            original: expr.to_owned(),
            insts: insts,
            prefix: prefix,
            prefix_start: prefix_start,
            nbra: nbra,
        })
    }

    /// The instruction the machine is primed at when no prefix skipping
    /// has happened: the target of `Start`.
    pub fn start(&self) -> InstIdx {
        match self.insts[0] {
            Inst::Start(ref inst) => inst.goto,
            _ => unreachable!("program must begin with Start"),
        }
    }

    /// The number of slots in a submatch vector: a start/end pair for the
    /// whole match and for every subexpression.
    pub fn num_slots(&self) -> usize {
        2 * (self.nbra + 1)
    }
}

impl fmt::Debug for Program {
    /// Renders the instruction listing, one instruction per line with its
    /// index and successor.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "prefix <{}>", self.prefix.as_str())?;
        for (pc, inst) in self.insts.iter().enumerate() {
            match *inst {
                Inst::Match => writeln!(f, "{:3}: match", pc)?,
                Inst::Start(ref i) => {
                    writeln!(f, "{:3}: start -> {}", pc, i.goto)?
                }
                Inst::EmptyLook(ref i) => {
                    writeln!(f, "{:3}: {:?} -> {}", pc, i.look, i.goto)?
                }
                Inst::Char(ref i) => {
                    writeln!(f, "{:3}: char {:?} -> {}", pc, i.c, i.goto)?
                }
                Inst::Ranges(ref i) => {
                    write!(f, "{:3}: class", pc)?;
                    if i.negate {
                        write!(f, " (negated)")?;
                    }
                    for &(lo, hi) in &i.ranges {
                        if lo == hi {
                            write!(f, " [{:?}]", lo)?;
                        } else {
                            write!(f, " [{:?}-{:?}]", lo, hi)?;
                        }
                    }
                    writeln!(f, " -> {}", i.goto)?
                }
                Inst::Any(ref i) => {
                    let name = if i.nl { "any" } else { "notnl" };
                    writeln!(f, "{:3}: {} -> {}", pc, name, i.goto)?
                }
                Inst::Save(ref i) => {
                    writeln!(f, "{:3}: save {} -> {}", pc, i.slot, i.goto)?
                }
                Inst::Split(ref i) => {
                    writeln!(f, "{:3}: split({}) -> {}", pc, i.goto1, i.goto2)?
                }
                Inst::Nop(ref i) => {
                    writeln!(f, "{:3}: nop -> {}", pc, i.goto)?
                }
            }
        }
        Ok(())
    }
}
