// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Compiled deterministic automata over an [`Alphabet`].
//!
//! An automaton is a flat transition table of `states * letters` entries plus
//! an ordered annotation list ("yields") per state. Entries are state indices
//! or a negative dead sentinel. The engine never interprets annotations; it
//! only reports where they were reached.
//!
//! Two scanning policies coexist:
//!
//! - [`Automaton::evaluate`] tolerates bytes outside the alphabet and treats
//!   them as a reset to state 0.
//! - [`Automaton::has_cycle`] is strict: any byte outside the alphabet is a
//!   [`KernelError::UnknownSymbol`].

mod builders;

pub use builders::{action_automaton, clause_automaton, word_matcher};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::alphabet::Alphabet;
use crate::error::{KernelError, KernelResult};
use crate::transfer::Restorable;

/// Canonical dead sentinel written by the builders. Any negative entry is dead.
pub const DEAD_STATE: i64 = -1;

/// Where a traversal ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Terminal {
    /// Traversal finished in this state.
    State(usize),
    /// Traversal fell into the dead sentinel and stopped.
    Dead,
}

/// One annotation reached during a full scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match<'a, A> {
    /// 1-based index of the byte whose transition reached the annotated state.
    pub position: usize,
    /// The annotation, borrowed from the automaton.
    pub annotation: &'a A,
}

/// Result of [`Automaton::evaluate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Evaluation<'a, A> {
    /// Quick-exit mode reached an annotated state.
    Hit,
    /// Quick-exit mode consumed the word without reaching an annotated state.
    Settled(Terminal),
    /// Full mode: every annotation reached, in order, plus the final state.
    Scanned {
        /// `(position, annotation)` pairs in traversal order.
        matches: Vec<Match<'a, A>>,
        /// Final state of the traversal.
        terminal: Terminal,
    },
}

impl<A> Evaluation<'_, A> {
    /// True if the word reached at least one annotated state.
    pub fn is_hit(&self) -> bool {
        match self {
            Self::Hit => true,
            Self::Settled(_) => false,
            Self::Scanned { matches, .. } => !matches.is_empty(),
        }
    }
}

/// Plain descriptor an [`Automaton`] is compiled from and saved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomatonDescriptor<A> {
    /// Alphabet symbols in index order.
    pub alphabet: String,
    /// Flattened `states * letters` table; negative entries are dead.
    pub transitions: Vec<i64>,
    /// Annotation list per state; its length defines the state count.
    pub yields: Vec<Vec<A>>,
}

/// Deterministic automaton with opaque per-state annotations.
///
/// State 0 is the start state. The automaton is read-only once compiled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Automaton<A = String> {
    alphabet: Alphabet,
    transitions: Vec<i64>,
    yields: Vec<Vec<A>>,
}

impl<A> Automaton<A> {
    /// Compiles an automaton from its alphabet, flat transition table and yield table.
    ///
    /// The yield table fixes the state count. The transition table must hold
    /// exactly `states * alphabet.len()` entries, each either negative (dead)
    /// or a valid state index.
    pub fn new(alphabet: &str, transitions: Vec<i64>, yields: Vec<Vec<A>>) -> KernelResult<Self> {
        let alphabet = Alphabet::new(alphabet)?;
        let states = yields.len();
        if states == 0 {
            return Err(KernelError::Config(
                "automaton needs at least one state".to_owned(),
            ));
        }
        if transitions.len() != states * alphabet.len() {
            return Err(KernelError::TableShape {
                len: transitions.len(),
                states,
                letters: alphabet.len(),
            });
        }
        for (index, &target) in transitions.iter().enumerate() {
            if usize::try_from(target).is_ok_and(|target| target >= states) {
                return Err(KernelError::StateOutOfRange {
                    index,
                    target,
                    states,
                });
            }
        }
        debug!(
            states,
            letters = alphabet.len(),
            annotated = yields.iter().filter(|y| !y.is_empty()).count(),
            "automaton compiled"
        );
        Ok(Self {
            alphabet,
            transitions,
            yields,
        })
    }

    /// Number of states.
    pub fn num_states(&self) -> usize {
        self.yields.len()
    }

    /// The alphabet transitions are indexed by.
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Annotations attached to `state`, or `None` if the state does not exist.
    pub fn annotations(&self, state: usize) -> Option<&[A]> {
        self.yields.get(state).map(Vec::as_slice)
    }

    #[inline]
    fn step(&self, state: usize, letter: usize) -> Terminal {
        let target = self.transitions[state * self.alphabet.len() + letter];
        usize::try_from(target).map_or(Terminal::Dead, Terminal::State)
    }

    /// Runs `word` from state 0.
    ///
    /// Bytes outside the alphabet reset the traversal to state 0. The dead
    /// sentinel stops it. With `quick_exit` the scan stops at the first
    /// annotated state and returns [`Evaluation::Hit`]; otherwise every
    /// annotation of every annotated state reached is collected with the
    /// 1-based position that reached it.
    pub fn evaluate(&self, word: &[u8], quick_exit: bool) -> Evaluation<'_, A> {
        let mut matches = Vec::new();
        let mut terminal = Terminal::State(0);
        for (offset, &byte) in word.iter().enumerate() {
            let Terminal::State(state) = terminal else {
                break;
            };
            terminal = match self.alphabet.index_of(byte) {
                Some(letter) => self.step(state, letter),
                None => Terminal::State(0),
            };
            let Terminal::State(next) = terminal else {
                break;
            };
            let annotations = &self.yields[next];
            if annotations.is_empty() {
                continue;
            }
            if quick_exit {
                return Evaluation::Hit;
            }
            matches.extend(annotations.iter().map(|annotation| Match {
                position: offset + 1,
                annotation,
            }));
        }
        if quick_exit {
            Evaluation::Settled(terminal)
        } else {
            Evaluation::Scanned { matches, terminal }
        }
    }

    /// Quick-exit probe: does `word` reach any annotated state?
    pub fn hits(&self, word: &[u8]) -> bool {
        self.evaluate(word, true).is_hit()
    }

    /// Full scan returning only the ordered matches.
    pub fn matches(&self, word: &[u8]) -> Vec<Match<'_, A>> {
        match self.evaluate(word, false) {
            Evaluation::Scanned { matches, .. } => matches,
            Evaluation::Hit | Evaluation::Settled(_) => Vec::new(),
        }
    }

    /// Does `word`, applied as a transition sequence, fix some start state?
    ///
    /// Candidate starts are `0..max_start`, clamped to the state count; `None`
    /// tries every state. Every byte must belong to the alphabet. An empty
    /// word fixes every state, so it returns true whenever the bound is
    /// non-zero; callers that find that meaningless must guard against it.
    pub fn has_cycle(&self, word: &[u8], max_start: Option<usize>) -> KernelResult<bool> {
        let states = self.num_states();
        let bound = match max_start {
            Some(depth) if depth > states => {
                trace!(depth, states, "cycle bound clamped to state count");
                states
            }
            Some(depth) => depth,
            None => states,
        };
        let letters = word
            .iter()
            .enumerate()
            .map(|(position, &byte)| {
                self.alphabet
                    .index_of(byte)
                    .ok_or(KernelError::UnknownSymbol { byte, position })
            })
            .collect::<KernelResult<Vec<_>>>()?;
        Ok((0..bound).any(|start| self.run_from(start, &letters) == Terminal::State(start)))
    }

    fn run_from(&self, start: usize, letters: &[usize]) -> Terminal {
        let mut state = start;
        for &letter in letters {
            match self.step(state, letter) {
                Terminal::State(next) => state = next,
                Terminal::Dead => return Terminal::Dead,
            }
        }
        Terminal::State(state)
    }
}

impl<A> Restorable for Automaton<A>
where
    A: Clone + Serialize + for<'de> Deserialize<'de>,
{
    type Descriptor = AutomatonDescriptor<A>;

    fn save(&self) -> Self::Descriptor {
        AutomatonDescriptor {
            alphabet: self.alphabet.as_str().to_owned(),
            transitions: self.transitions.clone(),
            yields: self.yields.clone(),
        }
    }

    fn from_descriptor(descriptor: Self::Descriptor) -> KernelResult<Self> {
        Self::new(
            &descriptor.alphabet,
            descriptor.transitions,
            descriptor.yields,
        )
    }
}
