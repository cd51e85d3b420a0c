// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! JSON configuration document naming every engine a census run needs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::automaton::{Automaton, AutomatonDescriptor};
use crate::canonical::{CanonicalChecker, CanonicalDescriptor};
use crate::error::{KernelError, KernelResult};
use crate::matrix::{IntMatrix, MatrixDescriptor};
use crate::transfer::Restorable;

/// Named descriptors for automata, canonical checkers and matrices.
///
/// Every section is optional in the JSON form. Automaton annotations are strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KernelConfig {
    /// Automaton descriptors by name.
    #[serde(default)]
    pub automata: BTreeMap<String, AutomatonDescriptor<String>>,
    /// Canonical checker descriptors by name.
    #[serde(default)]
    pub checkers: BTreeMap<String, CanonicalDescriptor>,
    /// Matrix descriptors by name.
    #[serde(default)]
    pub matrices: BTreeMap<String, MatrixDescriptor>,
}

impl KernelConfig {
    /// Parses a config document.
    pub fn from_json(text: &str) -> KernelResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Parses a config document from raw bytes.
    pub fn from_json_slice(bytes: &[u8]) -> KernelResult<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Pretty-printed JSON form.
    pub fn to_json(&self) -> KernelResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Compiles every entry. The first failure is reported with its section and name.
    #[instrument(level = "debug", skip_all)]
    pub fn build(&self) -> KernelResult<KernelSet> {
        let automata = compile(&self.automata, "automaton", Automaton::from_descriptor)?;
        let checkers = compile(&self.checkers, "checker", CanonicalChecker::from_descriptor)?;
        let matrices = compile(&self.matrices, "matrix", IntMatrix::from_descriptor)?;
        debug!(
            automata = automata.len(),
            checkers = checkers.len(),
            matrices = matrices.len(),
            "kernel set built"
        );
        Ok(KernelSet {
            automata,
            checkers,
            matrices,
        })
    }
}

fn compile<D: Clone, T>(
    entries: &BTreeMap<String, D>,
    kind: &'static str,
    build: impl Fn(D) -> KernelResult<T>,
) -> KernelResult<BTreeMap<String, T>> {
    entries
        .iter()
        .map(|(name, descriptor)| {
            build(descriptor.clone())
                .map(|engine| (name.clone(), engine))
                .map_err(|source| KernelError::InvalidEntry {
                    kind,
                    name: name.clone(),
                    source: Box::new(source),
                })
        })
        .collect()
}

/// Compiled engines produced by [`KernelConfig::build`].
#[derive(Debug, Clone, Default)]
pub struct KernelSet {
    /// Automata by name.
    pub automata: BTreeMap<String, Automaton<String>>,
    /// Canonical checkers by name.
    pub checkers: BTreeMap<String, CanonicalChecker>,
    /// Matrices by name.
    pub matrices: BTreeMap<String, IntMatrix>,
}

impl KernelSet {
    /// Saves every engine back into a config document.
    pub fn save(&self) -> KernelConfig {
        KernelConfig {
            automata: saved(&self.automata),
            checkers: saved(&self.checkers),
            matrices: saved(&self.matrices),
        }
    }
}

fn saved<T: Restorable>(engines: &BTreeMap<String, T>) -> BTreeMap<String, T::Descriptor> {
    engines
        .iter()
        .map(|(name, engine)| (name.clone(), engine.save()))
        .collect()
}
