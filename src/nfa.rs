// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

// The machine runs every live state forward in lock step, one rune per
// round, so nothing ever backtracks: a state either consumes the current
// rune and moves to the next list, or dies. The number of live states is
// bounded by the program length (duplicate program counters are dropped,
// keeping the earliest, which is also what gives the leftmost its
// priority), so the worst case is O(program size * input length).
//
// Submatch bookkeeping rides along in ref-counted vectors shared between
// states until a fork gives each branch its own copy.

use std::mem;

use arena::{MatchArena, MatchIdx};
use input::Input;
use inst::{Inst, InstIdx};
use program::Program;

/// An NFA simulation matching engine: one compiled program applied to one
/// input.
#[derive(Debug)]
pub struct Nfa<'r, I> {
    prog: &'r Program,
    input: I,
}

impl<'r, I: Input> Nfa<'r, I> {
    /// Execute the program against the input, looking for the
    /// leftmost-longest match that starts at or after `pos`.
    ///
    /// On a match, returns the submatch vector: `[start, end]` pairs of
    /// byte offsets, the whole match first, `-1` for a subexpression that
    /// did not take part.
    pub fn exec(
        prog: &'r Program,
        input: I,
        mut pos: usize,
    ) -> Option<Vec<isize>> {
        let end = input.len();

        // fast scan for the mandatory literal prefix, if there is one
        let mut prefixed = false;
        if !prog.prefix.is_empty() {
            match prog.prefix.find(&input.as_bytes()[pos..]) {
                None => return None,
                Some(advance) => {
                    pos += advance + prog.prefix.len();
                    prefixed = true;
                }
            }
        }

        let nfa = Nfa {
            prog: prog,
            input: input,
        };
        let mut arena = MatchArena::new(prog.num_slots());
        let mut clist = Threads::new(prog.insts.len());
        let mut nlist = Threads::new(prog.insts.len());
        let mut found = false;
        let mut fin: Option<MatchIdx> = None;

        while pos <= end {
            if !found {
                // prime the pump: a fresh state at the start of the
                // machine, opening the whole match here
                let m = arena.no_match();
                arena.set(m, 0, pos as isize);
                let start = if prefixed {
                    // later primings run the whole machine
                    prefixed = false;
                    nfa.prog.prefix_start
                } else {
                    nfa.prog.start()
                };
                nfa.add(&mut nlist, &mut arena, start, m, pos);
                // if add kept the state, the ref was bumped
                arena.free(m);
            }
            // the freshly extended list becomes current; the list it
            // replaces was dispatched last round and its states can go
            mem::swap(&mut clist, &mut nlist);
            for i in 0..nlist.size {
                let m = nlist.dense[i].m;
                arena.free(m);
            }
            nlist.clear();
            if found && clist.size == 0 {
                // nothing left that could extend the match
                break;
            }

            let (c, width) = match nfa.input.at(pos) {
                None => (None, 1),
                Some((c, width)) => (Some(c), width),
            };
            pos += width;
            for i in 0..clist.size {
                let t = clist.dense[i];
                match nfa.prog.insts[t.pc] {
                    Inst::Char(ref inst) => {
                        if c == Some(inst.c) {
                            nfa.add(
                                &mut nlist, &mut arena, inst.goto, t.m, pos,
                            );
                        }
                    }
                    Inst::Ranges(ref inst) => {
                        if c.map_or(false, |c| inst.matches(c)) {
                            nfa.add(
                                &mut nlist, &mut arena, inst.goto, t.m, pos,
                            );
                        }
                    }
                    Inst::Any(ref inst) => {
                        if c.map_or(false, |c| inst.matches(c)) {
                            nfa.add(
                                &mut nlist, &mut arena, inst.goto, t.m, pos,
                            );
                        }
                    }
                    // forks were resolved when the state was added
                    Inst::Split(_) => {}
                    Inst::Match => {
                        // keep the leftmost match, breaking a tie on the
                        // start in favor of the larger end; the candidate
                        // ended before the rune decoded this round
                        let match_end = (pos - width) as isize;
                        let start = arena.get(t.m, 0);
                        let better = match fin {
                            None => true,
                            Some(f) => {
                                start < arena.get(f, 0)
                                    || (start == arena.get(f, 0)
                                        && match_end > arena.get(f, 1))
                            }
                        };
                        if better {
                            if let Some(f) = fin {
                                arena.free(f);
                            }
                            arena.inc_ref(t.m);
                            arena.set(t.m, 1, match_end);
                            fin = Some(t.m);
                        }
                        found = true;
                    }
                    Inst::Start(_) | Inst::EmptyLook(_) | Inst::Save(_)
                    | Inst::Nop(_) => {
                        unreachable!("unexpected instruction in thread list")
                    }
                }
            }
        }

        let f = match fin {
            None => return None,
            Some(f) => f,
        };
        let mut m = arena.slice(f).to_vec();
        if !prog.prefix.is_empty() {
            // the machine never saw the prefix; the match began before it
            m[0] -= prog.prefix.len() as isize;
        }
        Some(m)
    }

    /// Add a state for `pc` to `list`, first following any transitions
    /// that consume no input. States land in source order and duplicate
    /// program counters are dropped, so the first (leftmost) occupant of
    /// an instruction wins. The vector `m` gains one reference per state
    /// that keeps it.
    fn add(
        &self,
        list: &mut Threads,
        arena: &mut MatchArena,
        pc: InstIdx,
        m: MatchIdx,
        pos: usize,
    ) {
        match self.prog.insts[pc] {
            Inst::EmptyLook(ref inst) => {
                if inst.matches(pos, self.input.len()) {
                    self.add(list, arena, inst.goto, m, pos);
                }
            }
            Inst::Save(ref inst) => {
                arena.set(m, inst.slot, pos as isize);
                self.add(list, arena, inst.goto, m, pos);
            }
            Inst::Split(ref inst) => {
                if list.contains(pc) {
                    return;
                }
                // the fork occupies a slot itself; this is what keeps an
                // epsilon cycle from recursing forever
                list.add(pc, m);
                arena.inc_ref(m);
                // each branch gets its own copy of the submatches
                let left = arena.copy(m);
                self.add(list, arena, inst.goto1, left, pos);
                let right = arena.copy(m);
                self.add(list, arena, inst.goto2, right, pos);
            }
            Inst::Match | Inst::Char(_) | Inst::Ranges(_) | Inst::Any(_) => {
                if list.contains(pc) {
                    return;
                }
                list.add(pc, m);
                arena.inc_ref(m);
            }
            Inst::Start(_) | Inst::Nop(_) => {
                unreachable!("unlinked instruction in running program")
            }
        }
    }
}

/// A set of live states, indexable by program counter in constant time.
///
/// `dense` holds the states in insertion order; `sparse[pc]` points back
/// into `dense` so membership is one comparison, with no clearing cost
/// beyond resetting `size`.
#[derive(Debug)]
struct Threads {
    dense: Vec<Thread>,
    sparse: Vec<usize>,
    size: usize,
}

#[derive(Clone, Copy, Debug)]
struct Thread {
    pc: InstIdx,
    m: MatchIdx,
}

impl Threads {
    fn new(num_insts: usize) -> Threads {
        Threads {
            dense: vec![Thread { pc: 0, m: 0 }; num_insts],
            sparse: vec![0; num_insts],
            size: 0,
        }
    }

    fn add(&mut self, pc: InstIdx, m: MatchIdx) {
        self.dense[self.size] = Thread { pc: pc, m: m };
        self.sparse[pc] = self.size;
        self.size += 1;
    }

    fn contains(&self, pc: InstIdx) -> bool {
        let i = self.sparse[pc];
        i < self.size && self.dense[i].pc == pc
    }

    fn clear(&mut self) {
        self.size = 0;
    }
}
