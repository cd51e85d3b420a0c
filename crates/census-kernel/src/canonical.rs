// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Canonical-form pruning for cyclic words under letter-substitution symmetry.
//!
//! A cyclic word is canonical when no rotation of any of its images under the
//! symmetry group is lexicographically smaller (byte order). The group is
//! generated by rotation, the swapcase duality (generator ↔ inverse), optional
//! reversal, and the configured automorphisms. The driver grows words one
//! extension at a time and calls [`CanonicalChecker::is_admissible_extension`]
//! to prune every branch whose images would undercut the current word.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::alphabet::Alphabet;
use crate::error::{KernelError, KernelResult};
use crate::transfer::Restorable;

/// True iff `a` is not greater than any rotation of `b`.
///
/// For every rotation offset of `b`, the first position where the two differ
/// must hold the smaller byte in `a`. Slices of different lengths are never
/// ordered and return false.
pub fn cyclic_le(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    (0..b.len()).all(|offset| {
        let rotated = b[offset..].iter().chain(&b[..offset]);
        first_difference_ok(a, rotated)
    })
}

/// Like [`cyclic_le`], but reads `b` backward from every rotation offset.
///
/// Equivalently, `a` is not greater than any rotation of `b` reversed.
/// Slices of different lengths return false.
pub fn cyclic_le_reversed(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    (0..b.len()).all(|offset| {
        let backward = b[..=offset].iter().rev().chain(b[offset + 1..].iter().rev());
        first_difference_ok(a, backward)
    })
}

#[inline]
fn first_difference_ok<'a>(a: &[u8], b: impl Iterator<Item = &'a u8>) -> bool {
    a.iter()
        .zip(b)
        .find(|(x, y)| x != y)
        .is_none_or(|(x, y)| x < y)
}

/// Full byte-range substitution table; bytes never remapped map to themselves.
#[derive(Clone, PartialEq, Eq)]
pub struct Translator {
    table: [u8; 256],
}

impl Translator {
    /// The identity substitution.
    pub fn identity() -> Self {
        let mut table = [0u8; 256];
        for (slot, byte) in table.iter_mut().zip(0..=u8::MAX) {
            *slot = byte;
        }
        Self { table }
    }

    /// Maps the `i`-th symbol of `alphabet` to `images[i]`.
    ///
    /// `images` must have one letter per symbol, each drawn from the alphabet.
    pub fn from_images(alphabet: &Alphabet, images: &[u8]) -> KernelResult<Self> {
        if images.len() != alphabet.len() {
            return Err(KernelError::Config(format!(
                "substitution {:?} has {} letters, alphabet {:?} has {}",
                String::from_utf8_lossy(images),
                images.len(),
                alphabet.as_str(),
                alphabet.len()
            )));
        }
        if let Some(position) = images.iter().position(|&b| !alphabet.contains(b)) {
            return Err(KernelError::ForeignLetter {
                text: String::from_utf8_lossy(images).into_owned(),
                byte: images[position],
                position,
            });
        }
        let mut translator = Self::identity();
        for (&from, &to) in alphabet.symbols().iter().zip(images) {
            translator.table[usize::from(from)] = to;
        }
        Ok(translator)
    }

    /// Image of a single byte.
    #[inline]
    pub fn apply(&self, byte: u8) -> u8 {
        self.table[usize::from(byte)]
    }

    /// Translates `word` into a fresh vector.
    pub fn translate(&self, word: &[u8]) -> Vec<u8> {
        word.iter().map(|&b| self.apply(b)).collect()
    }
}

impl fmt::Debug for Translator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let moved: Vec<(char, char)> = self
            .table
            .iter()
            .zip(0..=u8::MAX)
            .filter(|(to, from)| **to != *from)
            .map(|(to, from)| (char::from(from), char::from(*to)))
            .collect();
        f.debug_struct("Translator").field("moved", &moved).finish()
    }
}

/// Plain descriptor a [`CanonicalChecker`] is compiled from and saved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalDescriptor {
    /// Whether reversal belongs to the symmetry group.
    pub symmetric_generators: bool,
    /// Alphabet symbols in order.
    pub alphabet: String,
    /// Dual of each alphabet symbol, position by position.
    pub swapcase: String,
    /// Automorphism images checked on every extension (identity is implicit).
    pub always: Vec<String>,
    /// `(trigger letter, automorphism images)` pairs checked only when the
    /// trigger's generator pair is absent from the extension.
    pub conditional: Vec<(String, String)>,
}

#[derive(Debug, Clone)]
struct Conditional {
    trigger: usize,
    translator: Translator,
}

/// Decides whether extensions keep a word canonical. Read-only after construction.
#[derive(Debug, Clone)]
pub struct CanonicalChecker {
    descriptor: CanonicalDescriptor,
    alphabet: Alphabet,
    swapcase: Translator,
    lower: [Option<u8>; 256],
    lower_count: usize,
    always: Vec<Translator>,
    conditional: Vec<Conditional>,
}

impl CanonicalChecker {
    /// Compiles a checker from its descriptor.
    pub fn new(descriptor: CanonicalDescriptor) -> KernelResult<Self> {
        let alphabet = Alphabet::new(&descriptor.alphabet)?;
        let swapcase = Translator::from_images(&alphabet, descriptor.swapcase.as_bytes())?;

        // A letter and its dual share one lower index.
        let mut lower = [None; 256];
        let mut lower_count = 0u8;
        for &letter in alphabet.symbols() {
            let dual = swapcase.apply(letter);
            lower[usize::from(letter)] = match lower[usize::from(dual)] {
                Some(index) => Some(index),
                None => {
                    let index = lower_count;
                    lower_count += 1;
                    Some(index)
                }
            };
        }

        let mut always = vec![Translator::identity()];
        for images in &descriptor.always {
            always.push(Translator::from_images(&alphabet, images.as_bytes())?);
        }

        let mut conditional = Vec::with_capacity(descriptor.conditional.len());
        for (trigger, images) in &descriptor.conditional {
            let trigger = trigger
                .as_bytes()
                .first()
                .and_then(|&b| lower[usize::from(b)])
                .ok_or_else(|| {
                    KernelError::Config(format!(
                        "trigger {trigger:?} is not a letter of {:?}",
                        alphabet.as_str()
                    ))
                })?;
            conditional.push(Conditional {
                trigger: usize::from(trigger),
                translator: Translator::from_images(&alphabet, images.as_bytes())?,
            });
        }

        debug!(
            letters = alphabet.len(),
            pairs = lower_count,
            always = always.len(),
            conditional = conditional.len(),
            symmetric = descriptor.symmetric_generators,
            "canonical checker compiled"
        );
        Ok(Self {
            descriptor,
            alphabet,
            swapcase,
            lower,
            lower_count: usize::from(lower_count),
            always,
            conditional,
        })
    }

    /// Whether reversal is part of the symmetry group.
    pub fn symmetric_generators(&self) -> bool {
        self.descriptor.symmetric_generators
    }

    /// The checker's alphabet.
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Shared index of `byte` and its dual, or `None` outside the alphabet.
    pub fn lower_index(&self, byte: u8) -> Option<usize> {
        self.lower[usize::from(byte)].map(usize::from)
    }

    /// Always-automorphisms (including the identity) plus conditional ones.
    pub fn automorphism_count(&self) -> usize {
        self.always.len() + self.conditional.len()
    }

    /// Does substituting `extension` keep `word` the minimal representative?
    ///
    /// Every always-automorphism is checked; when `is_prefix` is false, each
    /// conditional automorphism whose trigger pair does not occur in
    /// `extension` is checked too. For an automorphism `T`, with
    /// `w = T(extension)` and `w2 = swapcase(w)`, the extension survives only
    /// if `word` is cyclically at most `w`, at most reversed `w` (symmetric
    /// groups), at most `w2` (symmetric groups), and at most reversed `w2`.
    ///
    /// Bytes outside the alphabet pass through unchanged.
    pub fn is_admissible_extension(
        &self,
        word: &[u8],
        extension: &[u8],
        is_prefix: bool,
    ) -> KernelResult<bool> {
        if word.len() != extension.len() {
            return Err(KernelError::LengthMismatch {
                word: word.len(),
                extension: extension.len(),
            });
        }
        let mut image = Vec::with_capacity(extension.len());
        let mut dual = Vec::with_capacity(extension.len());

        for (index, translator) in self.always.iter().enumerate() {
            if !self.survives(translator, word, extension, &mut image, &mut dual) {
                trace!(automorphism = index, "extension rejected");
                return Ok(false);
            }
        }
        if is_prefix || self.conditional.is_empty() {
            return Ok(true);
        }

        let mut present = vec![false; self.lower_count];
        for &byte in extension {
            if let Some(index) = self.lower_index(byte) {
                present[index] = true;
            }
        }
        for (index, conditional) in self.conditional.iter().enumerate() {
            if present[conditional.trigger] {
                continue;
            }
            if !self.survives(&conditional.translator, word, extension, &mut image, &mut dual) {
                trace!(conditional = index, "extension rejected");
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn survives(
        &self,
        translator: &Translator,
        word: &[u8],
        extension: &[u8],
        image: &mut Vec<u8>,
        dual: &mut Vec<u8>,
    ) -> bool {
        image.clear();
        dual.clear();
        for &byte in extension {
            let mapped = translator.apply(byte);
            image.push(mapped);
            dual.push(self.swapcase.apply(mapped));
        }
        let symmetric = self.descriptor.symmetric_generators;
        cyclic_le(word, image)
            && (!symmetric || cyclic_le_reversed(word, image))
            && (!symmetric || cyclic_le(word, dual))
            && cyclic_le_reversed(word, dual)
    }
}

impl Restorable for CanonicalChecker {
    type Descriptor = CanonicalDescriptor;

    fn save(&self) -> Self::Descriptor {
        self.descriptor.clone()
    }

    fn from_descriptor(descriptor: Self::Descriptor) -> KernelResult<Self> {
        Self::new(descriptor)
    }
}
