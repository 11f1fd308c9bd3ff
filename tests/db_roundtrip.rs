use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use pushfight_solver::db::{files, writer, Outcome, Value, WinLossDatabase};
use pushfight_solver::error::SolverError;

fn unique_temp_dir(name: &str) -> PathBuf {
    let base = std::env::temp_dir()
        .join("pushfight_solver_tests")
        .join(name);
    let _ = fs::create_dir_all(&base);

    let pid = std::process::id();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();

    for i in 0..1000u32 {
        let p = base.join(format!("{pid}-{nanos}-{i}"));
        if fs::create_dir(&p).is_ok() {
            return p;
        }
    }

    panic!("failed to create a unique temp dir under {}", base.display());
}

#[test]
fn writer_splits_long_intervals_into_byte_lengths() {
    let dir = unique_temp_dir("writer_split");
    let starts_path = dir.join("win-0.bin");
    let lengths_path = dir.join("win-0.len");

    writer::write_interval_files(
        vec![vec![(0, 1), (10, 12), (100, 356)]],
        &starts_path,
        &lengths_path,
    )
    .unwrap();

    let starts = fs::read(&starts_path).unwrap();
    let expected_starts: Vec<u8> = [0u64, 10, 100, 355]
        .iter()
        .flat_map(|s| s.to_le_bytes())
        .collect();
    assert_eq!(starts, expected_starts);
    assert_eq!(fs::read(&lengths_path).unwrap(), vec![1u8, 2, 255, 1]);

    let db =
        WinLossDatabase::open(&[(starts_path, lengths_path, Value::Win)]).unwrap();
    let expectations = [
        (0, Outcome::Win),
        (1, Outcome::Unknown),
        (10, Outcome::Win),
        (11, Outcome::Win),
        (12, Outcome::Unknown),
        (100, Outcome::Win),
        (354, Outcome::Win),
        (355, Outcome::Win),
        (356, Outcome::Unknown),
    ];
    for (rank, expected) in expectations {
        assert_eq!(db.query(rank), expected, "rank {rank}");
    }
}

#[test]
fn writer_orders_lists_by_leading_start() {
    let dir = unique_temp_dir("writer_order");
    let starts_path = dir.join("loss-1.bin");
    let lengths_path = dir.join("loss-1.len");

    // Lists arrive in worker completion order.
    writer::write_interval_files(
        vec![vec![(500, 510)], vec![], vec![(20, 22), (40, 41)]],
        &starts_path,
        &lengths_path,
    )
    .unwrap();

    let starts = fs::read(&starts_path).unwrap();
    let expected: Vec<u8> = [20u64, 40, 500]
        .iter()
        .flat_map(|s| s.to_le_bytes())
        .collect();
    assert_eq!(starts, expected);
    assert_eq!(fs::read(&lengths_path).unwrap(), vec![2u8, 1, 10]);
}

#[test]
fn empty_pair_is_skipped() {
    let dir = unique_temp_dir("empty_pair");
    let starts_path = dir.join("win-0.bin");
    let lengths_path = dir.join("win-0.len");
    writer::write_interval_files(vec![], &starts_path, &lengths_path).unwrap();

    let db =
        WinLossDatabase::open(&[(starts_path, lengths_path, Value::Win)]).unwrap();
    assert_eq!(db.mapping_count(), 0);
    assert_eq!(db.query(0), Outcome::Unknown);
}

#[test]
fn half_empty_pair_is_refused() {
    let dir = unique_temp_dir("half_empty");
    let starts_path = dir.join("win-0.bin");
    let lengths_path = dir.join("win-0.len");
    fs::write(&starts_path, 7u64.to_le_bytes()).unwrap();
    fs::write(&lengths_path, []).unwrap();

    let err = WinLossDatabase::open(&[(starts_path, lengths_path, Value::Win)])
        .unwrap_err();
    assert!(matches!(err, SolverError::LengthMismatch { .. }), "{err}");
}

#[test]
fn missing_generation_is_refused() {
    let dir = unique_temp_dir("missing_gen");
    // Generation 0 files exist but generation 1 files do not.
    for value in [Value::Win, Value::Loss] {
        let (starts, lengths) = files::aggregate_paths(&dir, 0, value);
        writer::write_interval_files(vec![vec![(0, 3)]], &starts, &lengths).unwrap();
    }

    assert!(files::open_through_generation(&dir, 1).is_ok());
    let err = files::open_through_generation(&dir, 2).unwrap_err();
    assert!(
        matches!(err, SolverError::MissingGeneration { generation: 1, .. }),
        "{err}"
    );
}

#[test]
fn shard_promotion_and_overwrite_refusal() {
    let dir = unique_temp_dir("promotion");
    files::ensure_tmp_dir(&dir).unwrap();
    let paths = files::shard_paths(&dir, Value::Win, 2, 7, Some(123));
    assert!(paths.final_starts.ends_with("win-2-07-123.bin"));
    assert!(paths.tmp_starts.parent().unwrap().ends_with("tmp"));

    files::refuse_existing(&paths).unwrap();
    writer::write_interval_files(vec![vec![(5, 9)]], &paths.tmp_starts, &paths.tmp_lengths)
        .unwrap();
    files::promote(&paths).unwrap();
    assert!(paths.final_starts.exists());
    assert!(paths.final_lengths.exists());
    assert!(!paths.tmp_starts.exists());

    // A finished shard must not be clobbered by a rerun.
    assert!(files::refuse_existing(&paths).is_err());
}

#[test]
fn multiple_value_mappings_answer_point_queries() {
    let dir = unique_temp_dir("multi_value");
    let win_starts = dir.join("win.bin");
    let win_lengths = dir.join("win.len");
    let loss_starts = dir.join("loss.bin");
    let loss_lengths = dir.join("loss.len");
    writer::write_interval_files(vec![vec![(1, 5), (6, 10)]], &win_starts, &win_lengths)
        .unwrap();
    writer::write_interval_files(
        vec![vec![(0, 1), (5, 6), (10, 11)]],
        &loss_starts,
        &loss_lengths,
    )
    .unwrap();

    let db = WinLossDatabase::open(&[
        (win_starts, win_lengths, Value::Win),
        (loss_starts, loss_lengths, Value::Loss),
    ])
    .unwrap();
    for rank in [1u64, 2, 3, 4, 6, 7, 8, 9] {
        assert_eq!(db.query(rank), Outcome::Win, "rank {rank}");
    }
    for rank in [0u64, 5, 10] {
        assert_eq!(db.query(rank), Outcome::Loss, "rank {rank}");
    }
    assert_eq!(db.query(11), Outcome::Unknown);
}
