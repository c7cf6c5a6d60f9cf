// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use inst::{EmptyLook, Inst, InstAny, InstChar, InstEmptyLook, InstGoto,
           InstIdx, InstRanges, InstSave, InstSplit};
use Error;

/// Returns true if the character is a metacharacter outside a class and
/// must be escaped to be matched literally.
pub fn special(c: char) -> bool {
    "\\.+*?()|[]^$".contains(c)
}

/// Returns true if the character may be escaped inside a character class.
fn special_class(c: char) -> bool {
    "\\-[]".contains(c)
}

/// A recursive descent parser that emits instructions as it goes.
///
/// Each non-terminal returns the `(start, end)` instruction indices of the
/// subgraph it built, so its caller can graft that subgraph into its own by
/// patching fall-through edges. A failed production propagates the first
/// error outward and the partial program is discarded.
pub struct Parser<'e> {
    expr: &'e str,
    /// The current character, or None at the end of the expression.
    chr: Option<char>,
    /// Byte offset just past `chr`.
    pos: usize,
    /// Open parenthesis depth.
    nlpar: usize,
    /// Parenthesized subexpressions seen so far; also their numbering.
    nbra: usize,
    insts: Vec<Inst>,
}

impl<'e> Parser<'e> {
    /// Parse an expression into a linked instruction vector, returning it
    /// along with the number of parenthesized subexpressions.
    ///
    /// The vector begins with `Start` and reaches `Match` on success; all
    /// `Nop`s emitted while linking have been cut out of the graph.
    pub fn parse(expr: &str) -> Result<(Vec<Inst>, usize), Error> {
        let mut p = Parser {
            expr: expr,
            chr: None,
            pos: 0,
            nlpar: 0,
            nbra: 0,
            insts: Vec::with_capacity(expr.len() + 2),
        };
        p.nextc();
        let start = p.push(Inst::Start(InstGoto { goto: 0 }));
        let (s, e) = p.regexp()?;
        p.insts[start].set_goto(s);
        let mtch = p.push(Inst::Match);
        p.insts[e].set_goto(mtch);
        eliminate_nops(&mut p.insts);
        Ok((p.insts, p.nbra))
    }

    /// Advance to the next character of the expression and return it.
    fn nextc(&mut self) -> Option<char> {
        self.chr = self.expr[self.pos..].chars().next();
        if let Some(c) = self.chr {
            self.pos += c.len_utf8();
        }
        self.chr
    }

    fn push(&mut self, inst: Inst) -> InstIdx {
        self.insts.push(inst);
        self.insts.len() - 1
    }

    fn push_char(&mut self, c: char) -> (InstIdx, InstIdx) {
        let i = self.push(Inst::Char(InstChar { goto: 0, c: c }));
        (i, i)
    }

    /// regexp := concatenation { '|' concatenation }
    fn regexp(&mut self) -> Result<(InstIdx, InstIdx), Error> {
        let (mut start, mut end) = self.concatenation()?;
        while self.chr == Some('|') {
            self.nextc();
            let (nstart, nend) = self.concatenation()?;
            let alt = self.push(Inst::Split(InstSplit {
                goto1: start,
                goto2: nstart,
            }));
            let nop = self.push(Inst::Nop(InstGoto { goto: 0 }));
            self.insts[end].set_goto(nop);
            self.insts[nend].set_goto(nop);
            start = alt;
            end = nop;
        }
        Ok((start, end))
    }

    /// concatenation := { closure }
    fn concatenation(&mut self) -> Result<(InstIdx, InstIdx), Error> {
        let mut built: Option<(InstIdx, InstIdx)> = None;
        loop {
            match self.closure()? {
                // End of this concatenation. The empty string yields a
                // placeholder so callers always have something to patch.
                None => {
                    return Ok(match built {
                        None => {
                            let nop =
                                self.push(Inst::Nop(InstGoto { goto: 0 }));
                            (nop, nop)
                        }
                        Some(se) => se,
                    });
                }
                Some((nstart, nend)) => {
                    built = Some(match built {
                        None => (nstart, nend),
                        Some((start, end)) => {
                            self.insts[end].set_goto(nstart);
                            (start, nend)
                        }
                    });
                }
            }
        }
    }

    /// closure := term [ '*' | '+' | '?' ]
    fn closure(&mut self) -> Result<Option<(InstIdx, InstIdx)>, Error> {
        let (start, end) = match self.term()? {
            None => return Ok(None),
            Some(se) => se,
        };
        let closed = match self.chr {
            // (start,end)*: after the term, fork back to its start. The
            // fall-through is patched by the caller.
            Some('*') => {
                let alt = self.push(Inst::Split(InstSplit {
                    goto1: start,
                    goto2: 0,
                }));
                self.insts[end].set_goto(alt);
                (alt, alt)
            }
            // (start,end)+: as `*`, but entry still runs the term once.
            Some('+') => {
                let alt = self.push(Inst::Split(InstSplit {
                    goto1: start,
                    goto2: 0,
                }));
                self.insts[end].set_goto(alt);
                (start, alt)
            }
            // (start,end)?: fork over the term into a shared exit.
            Some('?') => {
                let alt = self.push(Inst::Split(InstSplit {
                    goto1: start,
                    goto2: 0,
                }));
                let nop = self.push(Inst::Nop(InstGoto { goto: 0 }));
                self.insts[alt].set_goto(nop);
                self.insts[end].set_goto(nop);
                (alt, nop)
            }
            _ => return Ok(Some((start, end))),
        };
        match self.nextc() {
            Some('*') | Some('+') | Some('?') => Err(Error::BadClosure),
            _ => Ok(Some(closed)),
        }
    }

    /// term := '^' | '$' | '.' | character | class | '(' regexp ')'
    ///
    /// Returns None (without consuming) at anything that ends a
    /// concatenation: `|`, a closing parenthesis, or the end of the
    /// expression.
    fn term(&mut self) -> Result<Option<(InstIdx, InstIdx)>, Error> {
        let c = match self.chr {
            None => return Ok(None),
            Some(c) => c,
        };
        match c {
            '|' => Ok(None),
            '*' | '+' => Err(Error::BareClosure),
            ')' => {
                if self.nlpar == 0 {
                    Err(Error::UnmatchedRpar)
                } else {
                    Ok(None)
                }
            }
            ']' => Err(Error::UnmatchedRbkt),
            '^' => {
                self.nextc();
                let i = self.push(Inst::EmptyLook(InstEmptyLook {
                    goto: 0,
                    look: EmptyLook::StartText,
                }));
                Ok(Some((i, i)))
            }
            '$' => {
                self.nextc();
                let i = self.push(Inst::EmptyLook(InstEmptyLook {
                    goto: 0,
                    look: EmptyLook::EndText,
                }));
                Ok(Some((i, i)))
            }
            '.' => {
                self.nextc();
                let i = self.push(Inst::Any(InstAny { goto: 0, nl: true }));
                Ok(Some((i, i)))
            }
            '[' => {
                self.nextc();
                let i = self.char_class()?;
                if self.chr != Some(']') {
                    return Err(Error::UnmatchedLbkt);
                }
                self.nextc();
                Ok(Some((i, i)))
            }
            '(' => {
                self.nextc();
                self.nlpar += 1;
                // number the group before recursing so that outer groups
                // get lower numbers than the groups they contain
                self.nbra += 1;
                let n = self.nbra;
                let (start, end) = self.regexp()?;
                if self.chr != Some(')') {
                    return Err(Error::UnmatchedLpar);
                }
                self.nlpar -= 1;
                self.nextc();
                let bra = self.push(Inst::Save(InstSave {
                    goto: 0,
                    slot: 2 * n,
                }));
                let ebra = self.push(Inst::Save(InstSave {
                    goto: 0,
                    slot: 2 * n + 1,
                }));
                self.insts[bra].set_goto(start);
                self.insts[end].set_goto(ebra);
                Ok(Some((bra, ebra)))
            }
            '\\' => {
                let c = match self.nextc() {
                    None => return Err(Error::ExtraneousBackslash),
                    Some('n') => '\n',
                    Some(c) if special(c) => c,
                    Some(_) => return Err(Error::BadBackslash),
                };
                self.nextc();
                Ok(Some(self.push_char(c)))
            }
            _ => {
                self.nextc();
                Ok(Some(self.push_char(c)))
            }
        }
    }

    /// class := '[' [ '^' ] { character [ '-' character ] } ']'
    ///
    /// Called just past the `[`. The closing `]` is left for the caller,
    /// which reports the unmatched `[` if the expression ended instead.
    fn char_class(&mut self) -> Result<InstIdx, Error> {
        let mut negate = false;
        if self.chr == Some('^') {
            negate = true;
            self.nextc();
        }
        let mut ranges: Vec<(char, char)> = Vec::new();
        // pending lower bound of a range, between `a-` and its `b`
        let mut left: Option<char> = None;
        loop {
            match self.chr {
                None | Some(']') => {
                    if left.is_some() {
                        return Err(Error::BadRange);
                    }
                    return Ok(self.push_class(negate, ranges));
                }
                // a literal '-' must be escaped
                Some('-') => return Err(Error::BadRange),
                Some(mut c) => {
                    if c == '\\' {
                        c = match self.nextc() {
                            None => return Err(Error::ExtraneousBackslash),
                            Some('n') => '\n',
                            Some(c) if special_class(c) => c,
                            Some(_) => return Err(Error::BadBackslash),
                        };
                    }
                    self.nextc();
                    match left {
                        None => {
                            if self.chr == Some('-') {
                                self.nextc();
                                left = Some(c);
                            } else {
                                ranges.push((c, c));
                            }
                        }
                        Some(lo) if lo <= c => {
                            ranges.push((lo, c));
                            left = None;
                        }
                        Some(_) => return Err(Error::BadRange),
                    }
                }
            }
        }
    }

    /// Emit a parsed class, collapsed to a simpler instruction when one
    /// expresses it exactly.
    fn push_class(
        &mut self,
        negate: bool,
        ranges: Vec<(char, char)>,
    ) -> InstIdx {
        // [^\n] comes up often enough to merit its own instruction
        if negate && ranges.len() == 1 && ranges[0] == ('\n', '\n') {
            return self.push(Inst::Any(InstAny { goto: 0, nl: false }));
        }
        // [a] is just a
        if !negate && ranges.len() == 1 && ranges[0].0 == ranges[0].1 {
            let c = ranges[0].0;
            return self.push(Inst::Char(InstChar { goto: 0, c: c }));
        }
        self.push(Inst::Ranges(InstRanges {
            goto: 0,
            negate: negate,
            ranges: ranges,
        }))
    }
}

/// Follow a chain of `Nop`s to the first real instruction.
fn un_nop(insts: &[Inst], mut pc: InstIdx) -> InstIdx {
    while let Inst::Nop(ref inst) = insts[pc] {
        pc = inst.goto;
    }
    pc
}

/// Rewrite every edge to bypass `Nop`s, so the machine never has to step
/// over one. The `Nop`s themselves stay in the vector, unreferenced.
fn eliminate_nops(insts: &mut Vec<Inst>) {
    let linked = insts.clone();
    for inst in insts.iter_mut() {
        match *inst {
            Inst::Match => {}
            Inst::Split(ref mut i) => {
                i.goto1 = un_nop(&linked, i.goto1);
                i.goto2 = un_nop(&linked, i.goto2);
            }
            Inst::Start(ref mut i) | Inst::Nop(ref mut i) => {
                i.goto = un_nop(&linked, i.goto);
            }
            Inst::EmptyLook(ref mut i) => i.goto = un_nop(&linked, i.goto),
            Inst::Char(ref mut i) => i.goto = un_nop(&linked, i.goto),
            Inst::Ranges(ref mut i) => i.goto = un_nop(&linked, i.goto),
            Inst::Any(ref mut i) => i.goto = un_nop(&linked, i.goto),
            Inst::Save(ref mut i) => i.goto = un_nop(&linked, i.goto),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Parser;
    use inst::{Inst, InstIdx};

    /// Collect the instructions reachable from `Start`.
    fn reachable(insts: &[Inst]) -> Vec<InstIdx> {
        let mut seen = vec![false; insts.len()];
        let mut stack = vec![0];
        while let Some(pc) = stack.pop() {
            if seen[pc] {
                continue;
            }
            seen[pc] = true;
            match insts[pc] {
                Inst::Match => {}
                Inst::Split(ref i) => {
                    stack.push(i.goto1);
                    stack.push(i.goto2);
                }
                Inst::Start(ref i) | Inst::Nop(ref i) => stack.push(i.goto),
                Inst::EmptyLook(ref i) => stack.push(i.goto),
                Inst::Char(ref i) => stack.push(i.goto),
                Inst::Ranges(ref i) => stack.push(i.goto),
                Inst::Any(ref i) => stack.push(i.goto),
                Inst::Save(ref i) => stack.push(i.goto),
            }
        }
        (0..insts.len()).filter(|&pc| seen[pc]).collect()
    }

    #[test]
    fn no_reachable_nops() {
        for expr in &["", "a?", "a|b", "(a*|b)(c*|d)", "()", "a||b"] {
            let (insts, _) = Parser::parse(expr).unwrap();
            for pc in reachable(&insts) {
                match insts[pc] {
                    Inst::Nop(_) => {
                        panic!("`{}` leaves a reachable nop at {}", expr, pc)
                    }
                    _ => {}
                }
            }
        }
    }

    #[test]
    fn class_collapses() {
        let (insts, _) = Parser::parse("[a]").unwrap();
        assert!(insts.iter().any(|i| match *i {
            Inst::Char(ref i) => i.c == 'a',
            _ => false,
        }));
        let (insts, _) = Parser::parse("[^\\n]").unwrap();
        assert!(insts.iter().any(|i| match *i {
            Inst::Any(ref i) => !i.nl,
            _ => false,
        }));
    }

    #[test]
    fn group_numbering() {
        let (_, nbra) = Parser::parse("((a)(b))(c)").unwrap();
        assert_eq!(nbra, 4);
        let (_, nbra) = Parser::parse("a*").unwrap();
        assert_eq!(nbra, 0);
    }
}
