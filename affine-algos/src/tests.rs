use crate::full::FullDp;
use crate::scorer::{ChunkScorer, PairScorer};
use crate::*;
use affine_test::*;
use affine_types::*;

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn engine(backend: Backend, tile: usize) -> Engine {
    AlignParams {
        backend,
        tile_size: TileSize::square(tile),
        ..AlignParams::default()
    }
    .make_engine()
}

fn rendered(a: &str, b: &str) -> (Alignment, (String, String)) {
    let model = ScoringModel::default();
    let aln = align_global(a.as_bytes(), b.as_bytes(), &model).unwrap();
    let rows = aln.render(a.as_bytes(), b.as_bytes());
    (aln, rows)
}

#[test]
fn identical_sequences() {
    let (aln, (ra, rb)) = rendered("ACGT", "ACGT");
    assert_eq!(aln.score, 91 + 100 + 100 + 91);
    assert_eq!((ra.as_str(), rb.as_str()), ("ACGT", "ACGT"));
}

#[test]
fn gap_in_second() {
    let (aln, (ra, rb)) = rendered("ACGT", "CGT");
    assert_eq!((ra.as_str(), rb.as_str()), ("ACGT", "-CGT"));
    assert_eq!(aln.score, -430 + 291);
}

#[test]
fn gap_in_first() {
    let (aln, (ra, rb)) = rendered("AGT", "ACGT");
    assert_eq!((ra.as_str(), rb.as_str()), ("A-GT", "ACGT"));
    assert_eq!(aln.score, 91 - 430 + 100 + 91);
}

#[test]
fn insertion_is_one_run() {
    let (aln, (ra, rb)) = rendered("CGCGCGCGCG", "CGCGCGTTTTCGCG");
    assert_eq!(ra, "CGCGCG----CGCG");
    assert_eq!(rb, "CGCGCGTTTTCGCG");
    assert_eq!(aln.cigar.to_string(), "6M4I4M");
    assert_eq!(aln.score, 10 * 100 - 400 - 4 * 30);
}

#[test]
fn worked_examples_on_small_tiles() {
    init();
    let model = ScoringModel::default();
    for (a, b) in [
        ("ACGT", "ACGT"),
        ("ACGT", "CGT"),
        ("AGT", "ACGT"),
        ("CGCGCGCGCG", "CGCGCGTTTTCGCG"),
    ] {
        let (a, b) = (a.as_bytes(), b.as_bytes());
        let full = align_global(a, b, &model).unwrap();
        for t in 1..=4 {
            assert_eq!(
                align_global_tiled(a, b, &model, TileSize::square(t)).unwrap(),
                full
            );
        }
    }
}

#[test]
fn tiled_equals_full() {
    init();
    let model = ScoringModel::default();
    for tile in [3, 5, 7, 16] {
        test_aligner(
            engine(Backend::Tiled, tile),
            engine(Backend::Full, 1),
            Some(&model),
        );
    }
}

#[test]
fn tiled_equals_full_tiny_tiles() {
    init();
    let model = ScoringModel::default();
    for tile in [1, 2] {
        test_aligner_up_to(
            engine(Backend::Tiled, tile),
            engine(Backend::Full, 1),
            Some(&model),
            50,
        );
    }
}

#[test]
fn tiled_equals_full_rectangular_tiles() {
    init();
    let model = ScoringModel::default();
    for (rows, cols) in [(1, 4), (4, 1), (3, 8), (13, 5)] {
        let params = AlignParams {
            backend: Backend::Tiled,
            tile_size: TileSize::new(rows, cols),
            ..AlignParams::default()
        };
        test_aligner_up_to(
            params.make_engine(),
            engine(Backend::Full, 1),
            Some(&model),
            100,
        );
    }
}

#[test]
fn tiled_equals_full_human_chimp() {
    init();
    let params = AlignParams {
        preset: ScoringPreset::HumanChimp,
        ..AlignParams::default()
    };
    let tiled = AlignParams {
        backend: Backend::Tiled,
        tile_size: TileSize::square(6),
        ..params
    };
    test_aligner(
        tiled.make_engine(),
        params.make_engine(),
        Some(&ScoringPreset::HumanChimp.model()),
    );
}

#[test]
fn tiled_equals_full_free_end_gaps() {
    init();
    let full = AlignParams {
        mode: Mode::FreeEndGaps,
        ..AlignParams::default()
    };
    for tile in [2, 5, 11] {
        let tiled = AlignParams {
            backend: Backend::Tiled,
            tile_size: TileSize::square(tile),
            ..full
        };
        // Free end gaps are not charged by `score_alignment`, so skip rescoring.
        test_aligner_up_to(tiled.make_engine(), full.make_engine(), None, 100);
    }
}

#[test]
fn chunk_size_one_is_plain_alignment() {
    let model = ScoringModel::default();
    for ((a, b), _) in gen_seqs() {
        let (a, b) = (encode(&a).unwrap(), encode(&b).unwrap());
        let plain = FullDp::default().run(
            &PairScorer {
                a: &a,
                b: &b,
                model: &model,
            },
            Mode::Global,
        );
        let chunked = FullDp::default().run(
            &ChunkScorer::new(&a, &b, &model, 1).unwrap(),
            Mode::Global,
        );
        assert_eq!(plain, chunked);
    }
}

#[test]
fn chunked_gap_runs_are_whole_chunks() {
    init();
    let model = ScoringModel::default();
    let a = b"TTGTTCTTCTTCTTC";
    let b = b"TTGTTCTTCTTATTATTATTCTTC";
    let aln = align_chunked(a, b, &model, 3).unwrap();
    assert!(aln.cigar.ops.iter().all(|e| e.cnt % 3 == 0), "{}", aln.cigar);
    assert_eq!((aln.cigar.len_a(), aln.cigar.len_b()), (a.len(), b.len()));

    let (row_a, row_b) = aln.render(a, b);
    let gap_runs = row_a
        .split(|c: char| c != '-')
        .filter(|run| !run.is_empty())
        .map(str::len)
        .collect::<Vec<_>>();
    assert!(!gap_runs.is_empty());
    assert!(gap_runs.iter().all(|l| l % 3 == 0), "{row_a}\n{row_b}");
    assert_eq!(
        model.score_alignment(row_a.as_bytes(), row_b.as_bytes()),
        Ok(aln.score)
    );
}

#[test]
fn chunked_tiled_equals_chunked_full() {
    init();
    let model = ScoringModel::default();
    let params = |backend| AlignParams {
        backend,
        tile_size: TileSize::square(2),
        chunk_size: 3,
        ..AlignParams::default()
    };
    let mut tiled = params(Backend::Tiled).make_engine();
    let mut full = params(Backend::Full).make_engine();
    for ((a, b), (n, e, seed)) in gen_seqs() {
        let a = &a[..a.len() / 3 * 3];
        let b = &b[..b.len() / 3 * 3];
        test_aligner_on_input(
            a,
            b,
            &mut tiled,
            &mut full,
            Some(&model),
            &format!("chunked seed {seed} n {n} e {e}"),
        );
    }
}

#[test]
fn score_is_symmetric() {
    for preset in [ScoringPreset::Default, ScoringPreset::HumanChimp] {
        let model = preset.model();
        assert!(model.matrix().is_symmetric());
        for ((a, b), (n, ..)) in gen_seqs() {
            if n > 100 {
                continue;
            }
            assert_eq!(
                align_global(&a, &b, &model).unwrap().score,
                align_global(&b, &a, &model).unwrap().score,
                "{preset:?}"
            );
        }
    }
}

#[test]
fn free_end_gaps_place_read() {
    let model = ScoringModel::default();
    let (target, _) = setup(200, 0.0);
    let query = &target[50..80];
    let self_score: Score = encode(query)
        .unwrap()
        .iter()
        .map(|&r| model.sub(r, r))
        .sum();

    let aln = align_local_free_end_gaps(&target, query, &model).unwrap();
    assert_eq!(aln.score, self_score);
    assert_eq!(aln.cigar.to_string(), "50D30M120D");

    // Globally, the same ends cost two long gaps.
    let global = align_global(&target, query, &model).unwrap();
    assert!(global.score < aln.score);
}

#[test]
fn invalid_input_is_reported() {
    let model = ScoringModel::default();
    assert_eq!(
        align_global(b"ACXT", b"ACGT", &model),
        Err(AlignError::OutOfRangeSymbol {
            symbol: b'X',
            position: 2
        })
    );
    assert_eq!(
        align_global_tiled(b"ACGT", b"AC-T", &model, TileSize::square(2)),
        Err(AlignError::OutOfRangeSymbol {
            symbol: b'-',
            position: 2
        })
    );
    assert_eq!(
        align_chunked(b"ACGT", b"ACG", &model, 3),
        Err(AlignError::LengthNotDivisible {
            len: 4,
            chunk_size: 3
        })
    );
    assert_eq!(
        align_chunked(b"ACG", b"ACGT", &model, 3),
        Err(AlignError::LengthNotDivisible {
            len: 4,
            chunk_size: 3
        })
    );
    assert_eq!(
        align_chunked(b"ACG", b"ACG", &model, 0),
        Err(AlignError::ZeroChunkSize)
    );
}

#[test]
fn engine_reuse_and_reset() {
    let mut e = engine(Backend::Tiled, 4);
    let (a, b) = setup(100, 0.1);
    let first = e.align(&a, &b).unwrap();
    e.align(b"ACGT", b"CGT").unwrap();
    assert_eq!(e.align(&a, &b).unwrap(), first);
    e.reset();
    assert_eq!(e.align(&a, &b).unwrap(), first);
    assert_eq!(e.params().tile_size, TileSize::square(4));
}

#[test]
fn batch_matches_sequential() {
    init();
    let model = ScoringModel::default();
    let pairs = gen_seqs()
        .filter(|(_, (n, ..))| *n <= 100)
        .map(|(pair, _)| pair)
        .collect::<Vec<_>>();
    let params = AlignParams {
        backend: Backend::Tiled,
        tile_size: TileSize::square(8),
        ..AlignParams::default()
    };
    let batch = align_batch(model, params, &pairs, 3).unwrap();
    assert_eq!(batch.len(), pairs.len());
    for ((a, b), aln) in pairs.iter().zip(&batch) {
        assert_eq!(aln, &align_global(a, b, &model).unwrap());
    }
}

#[test]
fn batch_fails_on_bad_pair() {
    let pairs = vec![
        (b"ACGT".to_vec(), b"ACGT".to_vec()),
        (b"ACGT".to_vec(), b"ACNT!".to_vec()),
    ];
    assert_eq!(
        align_batch(ScoringModel::default(), AlignParams::default(), &pairs, 2),
        Err(AlignError::OutOfRangeSymbol {
            symbol: b'!',
            position: 4
        })
    );
}

#[test]
fn pool_streams_results() {
    init();
    let mut pool = AlignerPool::new(ScoringModel::default(), AlignParams::default(), 4, 2);
    let jobs = pool.sender().unwrap();
    pool.finish();
    let pairs = gen_seqs().take(40).map(|(p, _)| p).collect::<Vec<_>>();
    let mut seen = vec![false; pairs.len()];
    std::thread::scope(|s| {
        s.spawn(|| {
            for (tag, (a, b)) in pairs.iter().enumerate() {
                jobs.send(Job {
                    tag,
                    a: a.clone(),
                    b: b.clone(),
                })
                .unwrap();
            }
            drop(jobs);
        });
        for Finished { tag, result } in pool.results() {
            let (a, b) = &pairs[tag];
            let cigar = result.unwrap().cigar;
            assert_eq!((cigar.len_a(), cigar.len_b()), (a.len(), b.len()));
            seen[tag] = true;
        }
    });
    pool.join();
    assert!(seen.into_iter().all(|s| s));
}
