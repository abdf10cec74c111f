//! Full runs over fixture bricks

use crate::{write_bytes, write_hdt, write_parquet, write_sqlite, Workspace};
use brickcheck::assets::{AssetRef, StaticCatalog};
use brickcheck::verify::{run_bricks, BrickOptions, BrickReport, MemoryFailureLog, RunObserver};

#[test]
fn test_valid_brick_and_failed_lookup() {
    let ws = Workspace::new();
    ws.write_catalog("brickA\nbrickB\n");
    let parquet = write_parquet(&ws.brick_dir("brickA").join("compounds.parquet"), 10);
    let catalog = StaticCatalog::new().with_brick("brickA", [("compounds_parquet", &parquet)]);

    let summary = ws.run(&catalog).unwrap();

    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.exit_code(), 1);
    assert_eq!(ws.failure_log().as_deref(), Some("brickB\n"));
}

#[test]
fn test_comment_only_catalog_passes_without_log() {
    let ws = Workspace::new();
    ws.write_catalog("# nothing enabled yet\n\n#chembl\n");

    let summary = ws.run(&StaticCatalog::new()).unwrap();

    assert_eq!(summary.total(), 0);
    assert_eq!(summary.exit_code(), 0);
    assert_eq!(ws.failure_log(), None);
}

#[test]
fn test_previous_failures_are_discarded() {
    let ws = Workspace::new();
    write_bytes(&ws.failure_log_path(), b"old-brick\n");
    let db = write_sqlite(&ws.brick_dir("tox21").join("tox21.sqlite"), &[("a", 3), ("b", 0)]);
    ws.write_catalog("tox21\n");
    let catalog = StaticCatalog::new().with_brick("tox21", [("tox21_sqlite", &db)]);

    let summary = ws.run(&catalog).unwrap();

    assert!(summary.all_passed());
    assert_eq!(ws.failure_log(), None);
}

#[test]
fn test_repeated_runs_are_identical() {
    let ws = Workspace::new();
    ws.write_catalog("good\nempty-db\nmissing\n");
    let good = write_parquet(&ws.brick_dir("good").join("good.parquet"), 5);
    let empty = write_sqlite(&ws.brick_dir("empty-db").join("empty.db"), &[("t", 0)]);
    let catalog = StaticCatalog::new()
        .with_brick("good", [("good_parquet", &good)])
        .with_brick("empty-db", [("empty_db", &empty)]);

    let first = ws.run(&catalog).unwrap();
    let first_log = ws.failure_log();
    let second = ws.run(&catalog).unwrap();
    let second_log = ws.failure_log();

    assert_eq!(first, second);
    assert_eq!(first_log, second_log);
    assert_eq!(first_log.as_deref(), Some("empty-db\nmissing\n"));
}

#[test]
fn test_failures_follow_catalog_order() {
    let ws = Workspace::new();
    ws.write_catalog("zeta\nalpha\nok\nmid\n");
    let ok = write_bytes(&ws.brick_dir("ok").join("ok.txt"), b"data");
    let ok_ref = ok.to_string_lossy().to_string();
    let catalog = StaticCatalog::new().with_entries(
        "ok",
        vec![AssetRef::new(ok_ref.clone())],
        [(ok_ref, ok.clone())].into_iter().collect(),
    );

    ws.run(&catalog).unwrap();

    assert_eq!(ws.failure_log().as_deref(), Some("zeta\nalpha\nmid\n"));
}

/// Records which assets were reported as passing, per brick
#[derive(Default)]
struct PassedAssets(Vec<(String, Vec<String>)>);

impl RunObserver for PassedAssets {
    fn brick_finished(&mut self, report: &BrickReport) {
        let passed = report
            .passed_checks()
            .map(|check| check.asset.key().to_string())
            .collect();
        self.0.push((report.brick.clone(), passed));
    }
}

#[test]
fn test_short_circuit_hides_later_assets() {
    let ws = Workspace::new();
    let dir = ws.brick_dir("chembl");
    let first = write_parquet(&dir.join("activities.parquet"), 3);
    let broken = write_bytes(&dir.join("molecules.hdt"), b"<a> <b> <c> .\n");
    let never = write_sqlite(&dir.join("targets.sqlite"), &[("targets", 2)]);
    let catalog = StaticCatalog::new().with_brick(
        "chembl",
        [
            ("activities", &first),
            ("molecules", &broken),
            ("targets", &never),
        ],
    );

    let mut sink = MemoryFailureLog::default();
    let mut observer = PassedAssets::default();
    let summary = run_bricks(
        &["chembl".to_string()],
        &catalog,
        &mut sink,
        BrickOptions::default(),
        &mut observer,
    )
    .unwrap();

    assert_eq!(summary.failed, 1);
    assert_eq!(sink.bricks, vec!["chembl"]);
    assert_eq!(
        observer.0,
        vec![("chembl".to_string(), vec!["activities".to_string()])]
    );
}

#[test]
fn test_mixed_formats_all_pass() {
    let ws = Workspace::new();
    ws.write_catalog("hmdb\n");
    let dir = ws.brick_dir("hmdb");
    let dataset = dir.join("metabolites.parquet");
    std::fs::create_dir_all(&dataset).unwrap();
    write_parquet(&dataset.join("part-0.parquet"), 2);
    write_parquet(&dataset.join("part-1.parquet"), 0);
    let db = write_sqlite(&dir.join("hmdb.sqlite3"), &[("a", 1)]);
    let graph = write_hdt(&dir.join("hmdb.hdt"));
    let catalog = StaticCatalog::new().with_brick(
        "hmdb",
        [
            ("metabolites_parquet", &dataset),
            ("hmdb_sqlite3", &db),
            ("hmdb_hdt", &graph),
        ],
    );

    let summary = ws.run(&catalog).unwrap();
    assert!(summary.all_passed(), "{summary:?}");
    assert_eq!(ws.failure_log(), None);
}

#[test]
fn test_valid_triple_store_brick_passes() {
    let ws = Workspace::new();
    let graph = write_hdt(&ws.brick_dir("snik").join("snikmeta.HDT"));
    let catalog = StaticCatalog::new().with_brick("snik", [("snikmeta_hdt", &graph)]);

    let mut sink = MemoryFailureLog::default();
    let mut observer = PassedAssets::default();
    let summary = run_bricks(
        &["snik".to_string()],
        &catalog,
        &mut sink,
        BrickOptions::default(),
        &mut observer,
    )
    .unwrap();

    assert!(summary.all_passed(), "{summary:?}");
    assert!(sink.bricks.is_empty());
    assert_eq!(
        observer.0,
        vec![("snik".to_string(), vec!["snikmeta_hdt".to_string()])]
    );
}
