//! Shared test harness for aligners: reproducible random inputs and the checks
//! every aligner has to pass against a reference aligner.

use affine_types::*;
use itertools::Itertools;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const DNA: &[u8] = b"ACGT";

fn test_sequences() -> Vec<(Seq<'static>, Seq<'static>)> {
    vec![
        (b"ACGT", b"ACGT"),
        (b"ACGT", b"CGT"),
        (b"AGT", b"ACGT"),
        (b"CGCGCGCGCG", b"CGCGCGTTTTCGCG"),
        (b"TTGGGTCAATCAGCCAGTTTTTA", b"TTTGAGTGGGTCATCACCGATTTTAT"),
        (b"ACTGACCAGT", b"CCGACAGGA"),
        (b"AGTTTTAT", b"ACCGATTTTTA"),
        (b"CTCTCTTCTCTCTCTA", b"CCTCTCTCTCTCCTCTC"),
        (b"GCACGTCGCCCCCCGCCCGCG", b"GCCCGCCCGCCCGCCCCCGCCCCC"),
        (b"A", b""),
        (b"", b"GATTACA"),
        (b"", b""),
    ]
}

pub fn random_sequence(n: usize, rng: &mut impl Rng) -> Sequence {
    (0..n).map(|_| DNA[rng.gen_range(0..DNA.len())]).collect()
}

/// Apply `edits` random substitutions, insertions and deletions to `a`.
pub fn random_mutate(a: Seq, edits: usize, rng: &mut impl Rng) -> Sequence {
    let mut b = a.to_vec();
    for _ in 0..edits {
        let base = DNA[rng.gen_range(0..DNA.len())];
        match rng.gen_range(0..3) {
            0 if !b.is_empty() => {
                let i = rng.gen_range(0..b.len());
                b[i] = base;
            }
            1 if !b.is_empty() => {
                b.remove(rng.gen_range(0..b.len()));
            }
            _ => {
                let i = rng.gen_range(0..=b.len());
                b.insert(i, base);
            }
        }
    }
    b
}

/// A random sequence of length `n` and a copy with `n * e` random edits.
pub fn setup_with_seed(n: usize, e: f32, seed: u64) -> (Sequence, Sequence) {
    let rng = &mut ChaCha8Rng::seed_from_u64(seed);
    let a = random_sequence(n, rng);
    let b = random_mutate(&a, (n as f32 * e) as usize, rng);
    (a, b)
}

pub fn setup(n: usize, e: f32) -> (Sequence, Sequence) {
    setup_with_seed(n, e, 31415)
}

/// All combinations of a fixed set of lengths, error rates and seeds.
pub fn gen_seqs() -> impl Iterator<Item = ((Sequence, Sequence), (usize, f32, u64))> {
    let ns = [0usize, 1, 2, 3, 4, 5, 7, 10, 16, 20, 33, 50, 100, 128, 200];
    let es = [0.0f32, 0.05, 0.10, 0.30, 1.0];
    let seeds = [31415u64, 2718];
    ns.into_iter()
        .cartesian_product(es)
        .cartesian_product(seeds)
        .map(|((n, e), seed)| (setup_with_seed(n, e, seed), (n, e, seed)))
}

/// Check `aligner` on `a` and `b`:
/// - score and cigar equal those of `reference`,
/// - the cigar consumes exactly `a` and `b`,
/// - rendering and removing the gaps gives back `a` and `b`,
/// - when `model` is given, rescoring the rendered rows gives the score.
pub fn test_aligner_on_input(
    a: Seq,
    b: Seq,
    aligner: &mut impl Aligner,
    reference: &mut impl Aligner,
    model: Option<&ScoringModel>,
    params: &str,
) {
    let expected = reference.align(a, b).unwrap();
    let aln = aligner.align(a, b).unwrap();
    let msg = || {
        format!(
            "\n{params}\na {}\nb {}\n{aligner:?}\nexpected {} {}\ngot      {} {}",
            String::from_utf8_lossy(a),
            String::from_utf8_lossy(b),
            expected.score,
            expected.cigar,
            aln.score,
            aln.cigar,
        )
    };
    assert_eq!(aln, expected, "{}", msg());

    assert_eq!(aln.cigar.len_a(), a.len(), "{}", msg());
    assert_eq!(aln.cigar.len_b(), b.len(), "{}", msg());

    let (row_a, row_b) = aln.render(a, b);
    assert_eq!(row_a.len(), row_b.len());
    let ungap = |row: &str| row.bytes().filter(|&c| c != GAP_CHAR).collect_vec();
    assert_eq!(ungap(&row_a), a, "{}", msg());
    assert_eq!(ungap(&row_b), b, "{}", msg());

    if let Some(model) = model {
        assert_eq!(
            model.score_alignment(row_a.as_bytes(), row_b.as_bytes()),
            Ok(aln.score),
            "{}\n{row_a}\n{row_b}",
            msg()
        );
    }
}

/// Test `aligner` against `reference` on the hardcoded pairs and all of [`gen_seqs`].
pub fn test_aligner(
    aligner: impl Aligner,
    reference: impl Aligner,
    model: Option<&ScoringModel>,
) {
    test_aligner_up_to(aligner, reference, model, usize::MAX);
}

/// As [`test_aligner`], but only random inputs with `n <= max_n`.
pub fn test_aligner_up_to(
    mut aligner: impl Aligner,
    mut reference: impl Aligner,
    model: Option<&ScoringModel>,
    max_n: usize,
) {
    for (a, b) in test_sequences() {
        test_aligner_on_input(
            a,
            b,
            &mut aligner,
            &mut reference,
            model,
            "hardcoded test_sequences",
        );
    }
    for ((a, b), (n, e, seed)) in gen_seqs() {
        if n > max_n {
            continue;
        }
        test_aligner_on_input(
            &a,
            &b,
            &mut aligner,
            &mut reference,
            model,
            &format!("seed {seed:>10} n {n:>5} e {e:>.2}"),
        );
    }
}
