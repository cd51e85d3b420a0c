// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Table generators producing ready-to-use [`Automaton`]s.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use tracing::debug;

use super::{Automaton, DEAD_STATE};
use crate::alphabet::Alphabet;
use crate::error::{KernelError, KernelResult};

/// Largest clause count [`clause_automaton`] accepts (`2^24` states).
const MAX_CLAUSES: usize = 24;

fn state_entry(index: usize) -> KernelResult<i64> {
    i64::try_from(index).map_err(|_| KernelError::Config(format!("state {index} exceeds i64")))
}

/// Aho–Corasick matcher annotating every occurrence of `patterns`.
///
/// States are the distinct pattern prefixes in breadth-first discovery order,
/// with the empty prefix as state 0. A state's annotations are the patterns
/// that end it, in byte order, so a full [`Automaton::evaluate`] reports each
/// occurrence at the position of its last letter.
pub fn word_matcher<S: AsRef<str>>(
    alphabet: &str,
    patterns: &[S],
) -> KernelResult<Automaton<String>> {
    let letters = Alphabet::new(alphabet)?;
    let mut targets: BTreeMap<&[u8], &str> = BTreeMap::new();
    let mut prefixes: HashSet<&[u8]> = HashSet::new();
    for pattern in patterns {
        let pattern = pattern.as_ref();
        let bytes = pattern.as_bytes();
        if bytes.is_empty() {
            return Err(KernelError::Config(
                "empty pattern cannot be matched".to_owned(),
            ));
        }
        if let Some(position) = bytes.iter().position(|&b| !letters.contains(b)) {
            return Err(KernelError::ForeignLetter {
                text: pattern.to_owned(),
                byte: bytes[position],
                position,
            });
        }
        targets.insert(bytes, pattern);
        prefixes.extend((1..=bytes.len()).map(|end| &bytes[..end]));
    }

    let mut states: Vec<Vec<u8>> = vec![Vec::new()];
    let mut ids: HashMap<Vec<u8>, usize> = HashMap::from([(Vec::new(), 0)]);
    let mut queue = VecDeque::from([0usize]);
    let mut rows: Vec<Vec<i64>> = Vec::new();
    let mut yields: Vec<Vec<String>> = Vec::new();

    while let Some(id) = queue.pop_front() {
        let word = states[id].clone();
        let ending: Vec<String> = targets
            .iter()
            .filter(|(target, _)| word.ends_with(target))
            .map(|(_, &pattern)| pattern.to_owned())
            .collect();

        let mut row = Vec::with_capacity(letters.len());
        for &letter in letters.symbols() {
            let mut next = word.clone();
            next.push(letter);
            let longest = (0..next.len())
                .map(|start| &next[start..])
                .find(|suffix| prefixes.contains(suffix))
                .unwrap_or_default()
                .to_vec();
            let target = match ids.get(&longest) {
                Some(&known) => known,
                None => {
                    let fresh = states.len();
                    ids.insert(longest.clone(), fresh);
                    states.push(longest);
                    queue.push_back(fresh);
                    fresh
                }
            };
            row.push(state_entry(target)?);
        }
        // BFS pops ids in order, so rows line up with state ids.
        rows.push(row);
        yields.push(ending);
    }

    debug!(
        patterns = targets.len(),
        states = states.len(),
        "word matcher built"
    );
    Automaton::new(alphabet, rows.concat(), yields)
}

/// Tracker for a conjunction of clauses, each a set of letters.
///
/// State `s` is the bitset of clauses already satisfied; reading a letter ORs
/// in every clause containing it. Only the all-satisfied state carries an
/// annotation (`marker`), so [`Automaton::hits`] answers "does the word touch
/// every clause". Letters of a clause outside the alphabet are ignored.
pub fn clause_automaton<A, S>(alphabet: &str, clauses: &[S], marker: A) -> KernelResult<Automaton<A>>
where
    S: AsRef<str>,
{
    let letters = Alphabet::new(alphabet)?;
    if clauses.len() > MAX_CLAUSES {
        return Err(KernelError::Config(format!(
            "{} clauses exceed the limit of {MAX_CLAUSES}",
            clauses.len()
        )));
    }
    let flags: Vec<usize> = letters
        .symbols()
        .iter()
        .map(|&letter| {
            clauses
                .iter()
                .enumerate()
                .filter(|(_, clause)| clause.as_ref().as_bytes().contains(&letter))
                .fold(0usize, |acc, (bit, _)| acc | (1 << bit))
        })
        .collect();

    let states = 1usize << clauses.len();
    let mut transitions = Vec::with_capacity(states * letters.len());
    for state in 0..states {
        for &flag in &flags {
            transitions.push(state_entry(state | flag)?);
        }
    }
    let mut yields: Vec<Vec<A>> = (0..states).map(|_| Vec::new()).collect();
    yields[states - 1].push(marker);
    Automaton::new(alphabet, transitions, yields)
}

/// Explores a group action breadth-first from `seeds` up to `max_depth` steps.
///
/// `actions` gives one map per letter; the alphabet is their letters in
/// sorted order. Every value within `max_depth` applications of a seed
/// becomes a state (seeds first, duplicates dropped). Images that fall outside
/// the explored set become dead transitions. Returns the automaton together
/// with the value behind each state, ready for [`Automaton::has_cycle`].
pub fn action_automaton<S, A, F>(
    actions: &[(u8, F)],
    seeds: &[S],
    max_depth: usize,
) -> KernelResult<(Automaton<A>, Vec<S>)>
where
    S: Ord + Clone,
    F: Fn(&S) -> S,
{
    let mut ordered: Vec<&(u8, F)> = actions.iter().collect();
    ordered.sort_by_key(|(letter, _)| *letter);
    let alphabet: String = ordered.iter().map(|(letter, _)| char::from(*letter)).collect();

    let mut labels: Vec<S> = Vec::new();
    let mut depths: BTreeMap<S, (usize, usize)> = BTreeMap::new();
    let mut queue = VecDeque::new();
    for seed in seeds {
        if !depths.contains_key(seed) {
            depths.insert(seed.clone(), (labels.len(), 0));
            queue.push_back(labels.len());
            labels.push(seed.clone());
        }
    }

    let mut images: Vec<Vec<S>> = Vec::new();
    while let Some(id) = queue.pop_front() {
        let current = labels[id].clone();
        let depth = depths.get(&current).map_or(0, |&(_, depth)| depth);
        let mut arrows = Vec::with_capacity(ordered.len());
        for (_, action) in &ordered {
            let image = action(&current);
            if depth < max_depth && !depths.contains_key(&image) {
                depths.insert(image.clone(), (labels.len(), depth + 1));
                queue.push_back(labels.len());
                labels.push(image.clone());
            }
            arrows.push(image);
        }
        images.push(arrows);
    }

    let mut transitions = Vec::with_capacity(labels.len() * ordered.len());
    for image in images.iter().flatten() {
        transitions.push(match depths.get(image) {
            Some(&(id, _)) => state_entry(id)?,
            None => DEAD_STATE,
        });
    }
    debug!(
        states = labels.len(),
        letters = ordered.len(),
        max_depth,
        "action automaton built"
    );
    let yields = (0..labels.len()).map(|_| Vec::new()).collect();
    let automaton = Automaton::new(&alphabet, transitions, yields)?;
    Ok((automaton, labels))
}
