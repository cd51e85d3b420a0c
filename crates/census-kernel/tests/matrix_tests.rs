// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
use std::collections::BTreeMap;

use proptest::prelude::*;
use proptest::test_runner::{Config as PropConfig, RngAlgorithm, TestRng, TestRunner};

use census_kernel::{IntMatrix, KernelError};

fn matrix<const N: usize>(rows: [[i64; N]; N]) -> IntMatrix {
    IntMatrix::from_rows(&rows).expect("square")
}

#[test]
fn two_by_two_product_and_determinant() {
    let m = matrix([[1, 2], [3, 4]]);
    assert_eq!(m.determinant().expect("det"), -2);
    let square = m.multiply(&m).expect("same dimension");
    assert_eq!(square, matrix([[7, 10], [15, 22]]));
}

#[test]
fn known_determinants() {
    assert_eq!(matrix([[0, 1], [1, 0]]).determinant().expect("det"), -1);
    assert_eq!(matrix([[1, 2], [2, 4]]).determinant().expect("det"), 0);
    assert_eq!(
        matrix([[2, -1, 0], [-1, 2, -1], [0, -1, 2]])
            .determinant()
            .expect("det"),
        4
    );
}

#[test]
fn degenerate_dimensions() {
    let empty = IntMatrix::new(0, Vec::new()).expect("empty matrix");
    assert_eq!(empty.determinant().expect("det"), 1);
    let single = IntMatrix::new(1, vec![-7]).expect("1x1");
    assert_eq!(single.determinant().expect("det"), -7);
    assert_eq!(IntMatrix::new(1, vec![i64::MIN]).expect("1x1").determinant().expect("det"), i64::MIN);
}

#[test]
fn shape_errors() {
    let err = IntMatrix::new(2, vec![1, 2, 3]).expect_err("short entries");
    assert!(matches!(
        err,
        KernelError::EntryCount {
            dimension: 2,
            expected: 4,
            actual: 3
        }
    ));

    let err = IntMatrix::identity(2)
        .multiply(&IntMatrix::identity(3))
        .expect_err("dimension mismatch");
    assert!(matches!(err, KernelError::DimensionMismatch { left: 2, right: 3 }));

    let err = IntMatrix::from_rows(&[vec![1_i64, 2], vec![3]]).expect_err("ragged rows");
    assert!(matches!(err, KernelError::Config(_)));
}

#[test]
fn overflow_is_reported_not_wrapped() {
    let big = matrix([[i64::MAX]]);
    let err = big.multiply(&matrix([[2]])).expect_err("product overflows");
    assert!(matches!(err, KernelError::Overflow("multiply")));

    let err = matrix([[i64::MAX, 0], [0, 2]])
        .determinant()
        .expect_err("determinant overflows");
    assert!(matches!(err, KernelError::Overflow("determinant")));
}

#[test]
fn failed_diagonal_shift_leaves_matrix_unchanged() {
    let mut m = matrix([[i64::MAX, 0], [0, 0]]);
    let before = m.copy();
    let err = m.add_diagonal(1).expect_err("diagonal overflows");
    assert!(matches!(err, KernelError::Overflow("add_diagonal")));
    assert_eq!(m, before);
}

#[test]
fn diagonal_shift_round_trips() {
    let mut m = matrix([[2, -1, 0], [-1, 2, -1], [0, -1, 2]]);
    let original = m.copy();
    m.add_diagonal(5).expect("no overflow");
    assert_eq!(m.get(1, 1), Some(7));
    assert_eq!(m.get(0, 1), Some(-1));
    m.add_diagonal(-5).expect("no overflow");
    assert_eq!(m, original);
}

#[test]
fn abelianized_action_counts_letters_minus_inverses() {
    let action = BTreeMap::from([(b'a', b"ab".to_vec()), (b'b', b"bAB".to_vec())]);
    let m = IntMatrix::abelianized_action("aAbB", &action).expect("action");
    assert_eq!(m.dimension(), 2);
    assert_eq!(m.entries(), &[1, -1, 1, 0]);
    assert_eq!(m.determinant().expect("det"), 1);
    assert_eq!(m.to_string(), "[1, -1]\n[1, 0]");
}

#[test]
fn abelianized_action_leaves_missing_images_zero() {
    let action = BTreeMap::from([(b'a', b"ab".to_vec())]);
    let m = IntMatrix::abelianized_action("aAbB", &action).expect("action");
    assert_eq!(m.entries(), &[1, 0, 1, 0]);
}

fn cofactor_determinant(rows: &[Vec<i64>]) -> i64 {
    match rows.len() {
        0 => 1,
        1 => rows[0][0],
        n => (0..n)
            .map(|col| {
                let minor: Vec<Vec<i64>> = rows[1..]
                    .iter()
                    .map(|row| {
                        row.iter()
                            .enumerate()
                            .filter(|(j, _)| *j != col)
                            .map(|(_, v)| *v)
                            .collect()
                    })
                    .collect();
                let sign = if col % 2 == 0 { 1 } else { -1 };
                sign * rows[0][col] * cofactor_determinant(&minor)
            })
            .sum(),
    }
}

fn small_matrix() -> impl Strategy<Value = (usize, Vec<i64>)> {
    (0usize..=4).prop_flat_map(|d| prop::collection::vec(-9i64..=9, d * d).prop_map(move |e| (d, e)))
}

#[test]
fn proptest_seed_pinned_bareiss_matches_cofactor_expansion() {
    const SEED_BYTES: [u8; 32] = [
        0x42, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        0, 0, 0,
    ];
    let rng = TestRng::from_seed(RngAlgorithm::ChaCha, &SEED_BYTES);
    let mut runner = TestRunner::new_with_rng(
        PropConfig {
            cases: 512,
            ..PropConfig::default()
        },
        rng,
    );

    runner
        .run(&small_matrix(), |(d, entries)| {
            let rows: Vec<Vec<i64>> = entries.chunks(d.max(1)).map(<[i64]>::to_vec).collect();
            let expected = if d == 0 { 1 } else { cofactor_determinant(&rows) };
            let m = IntMatrix::new(d, entries).expect("generated shape");
            prop_assert_eq!(m.determinant().expect("small entries"), expected);
            Ok(())
        })
        .expect("bareiss agrees with cofactor expansion");
}

proptest! {
    #[test]
    fn copies_share_determinants((d, entries) in small_matrix()) {
        let m = IntMatrix::new(d, entries).expect("generated shape");
        let copy = m.copy();
        prop_assert_eq!(&copy, &m);
        prop_assert_eq!(copy.determinant().expect("det"), m.determinant().expect("det"));
    }

    #[test]
    fn identity_is_neutral((d, entries) in small_matrix()) {
        let m = IntMatrix::new(d, entries).expect("generated shape");
        let id = IntMatrix::identity(d);
        prop_assert_eq!(m.multiply(&id).expect("same dimension"), m.clone());
        prop_assert_eq!(id.multiply(&m).expect("same dimension"), m);
    }

    #[test]
    fn diagonal_shift_is_reversible((d, entries) in small_matrix(), k in -1000i64..1000) {
        let original = IntMatrix::new(d, entries).expect("generated shape");
        let mut m = original.copy();
        m.add_diagonal(k).expect("no overflow");
        m.add_diagonal(-k).expect("no overflow");
        prop_assert_eq!(m, original);
    }
}
