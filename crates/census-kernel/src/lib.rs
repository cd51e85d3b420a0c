// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! census-kernel: the inner-loop engines of the word census.
//!
//! The enumeration driver generates candidate words over a small generator
//! alphabet and asks three independent engines about each one:
//!
//! - [`Automaton`] scans a word against a compiled transition table and
//!   reports annotated states (forbidden or noteworthy subwords), or probes
//!   whether the word acts with a fixed point ([`Automaton::has_cycle`]).
//! - [`CanonicalChecker`] decides whether a proposed extension keeps the
//!   current word the cyclically-minimal representative of its orbit.
//! - [`IntMatrix`] carries the exact integer linear algebra used for
//!   auxiliary invariants (products, diagonal shifts, Bareiss determinant).
//!
//! # Transfer Invariant
//!
//! Every engine is rebuilt from its descriptor alone. `save` followed by
//! `from_descriptor` yields an instance that answers every query identically,
//! and the CBOR bytes produced by [`Restorable::to_bytes`] carry exactly that
//! descriptor. Engines hold no references to each other and no hidden state.
//!
//! # Arithmetic
//!
//! Matrix arithmetic is `i64` with explicit overflow detection; an overflow is
//! reported as [`KernelError::Overflow`] instead of wrapping.
#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms, unused_must_use)]
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
#![allow(
    clippy::must_use_candidate,
    clippy::return_self_not_must_use,
    clippy::unreadable_literal,
    clippy::missing_const_for_fn,
    clippy::redundant_pub_crate,
    clippy::module_name_repetitions,
    clippy::missing_errors_doc
)]

mod alphabet;
pub mod automaton;
mod canonical;
mod config;
mod error;
mod matrix;
mod transfer;

pub use alphabet::Alphabet;
pub use automaton::{
    action_automaton, clause_automaton, word_matcher, Automaton, AutomatonDescriptor, Evaluation,
    Match, Terminal, DEAD_STATE,
};
pub use canonical::{
    cyclic_le, cyclic_le_reversed, CanonicalChecker, CanonicalDescriptor, Translator,
};
pub use config::{KernelConfig, KernelSet};
pub use error::{KernelError, KernelResult};
pub use matrix::{IntMatrix, MatrixDescriptor};
pub use transfer::{decode_cbor, encode_cbor, Restorable};
