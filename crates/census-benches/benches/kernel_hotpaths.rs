// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
//! Benchmark: census-kernel inner loops
//!
//! Inputs come from a fixed linear congruential generator so runs are
//! comparable across machines. Sizes grow by roughly an order of magnitude to
//! show scaling without long runtimes.
use census_kernel::{word_matcher, CanonicalChecker, CanonicalDescriptor, IntMatrix};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;
use std::time::Duration;

const LETTERS: &[u8] = b"aAbB";

struct Lcg(u64);

impl Lcg {
    fn next_u64(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }

    fn word(&mut self, len: usize) -> Vec<u8> {
        (0..len)
            .map(|_| LETTERS[(self.next_u64() % LETTERS.len() as u64) as usize])
            .collect()
    }
}

fn bench_automaton_scan(c: &mut Criterion) {
    // Free reductions plus one longer relator.
    let fsm = word_matcher("aAbB", &["aA", "Aa", "bB", "Bb", "abAB"]).expect("matcher");
    let mut rng = Lcg(0x5eed);
    let mut group = c.benchmark_group("automaton_scan");
    group
        .warm_up_time(Duration::from_secs(2))
        .measurement_time(Duration::from_secs(5));
    for &n in &[16usize, 256, 4_096] {
        let word = rng.word(n);
        group.throughput(Throughput::Bytes(n as u64));
        group.bench_with_input(BenchmarkId::new("full", n), &word, |b, word| {
            b.iter(|| black_box(fsm.matches(black_box(word)).len()));
        });
        group.bench_with_input(BenchmarkId::new("quick_exit", n), &word, |b, word| {
            b.iter(|| black_box(fsm.hits(black_box(word))));
        });
    }
    group.finish();
}

fn bench_canonical_prune(c: &mut Criterion) {
    let checker = CanonicalChecker::new(CanonicalDescriptor {
        symmetric_generators: true,
        alphabet: "aAbB".to_owned(),
        swapcase: "AaBb".to_owned(),
        always: vec!["bBaA".to_owned()],
        conditional: vec![("a".to_owned(), "AabB".to_owned())],
    })
    .expect("checker");
    let mut rng = Lcg(0xc0ffee);
    let mut group = c.benchmark_group("canonical_prune");
    for &n in &[8usize, 32, 128] {
        let words: Vec<Vec<u8>> = (0..64).map(|_| rng.word(n)).collect();
        group.throughput(Throughput::Elements(words.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &words, |b, words| {
            b.iter(|| {
                words
                    .iter()
                    .filter(|w| {
                        checker
                            .is_admissible_extension(w, w, false)
                            .unwrap_or(false)
                    })
                    .count()
            });
        });
    }
    group.finish();
}

fn bench_bareiss_determinant(c: &mut Criterion) {
    let mut rng = Lcg(0xde7);
    let mut group = c.benchmark_group("bareiss_determinant");
    for &d in &[4usize, 8, 12] {
        let entries = (0..d * d).map(|_| (rng.next_u64() % 7) as i64 - 3).collect();
        let m = IntMatrix::new(d, entries).expect("square");
        group.bench_with_input(BenchmarkId::from_parameter(d), &m, |b, m| {
            b.iter(|| black_box(m.determinant().ok()));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_automaton_scan,
    bench_canonical_prune,
    bench_bareiss_determinant
);
criterion_main!(benches);
