mod helpers;

use helpers::cli_runner::CliRunner;
use memora_engine::logger::GameRecord;
use serde_json::Value;

#[test]
fn no_arguments_prints_usage_and_fails() {
    let cli = CliRunner::new().unwrap();
    let res = cli.run(&[]);
    assert_eq!(res.exit_code, 2);
    assert!(res.stderr.contains("Usage: memora <command>"));
    for c in ["play", "deal", "sim", "stats", "best", "cfg"] {
        assert!(res.stderr.contains(&format!("  {c}")), "missing {c}");
    }
}

#[test]
fn version_exits_zero() {
    let cli = CliRunner::new().unwrap();
    let res = cli.run(&["--version"]);
    assert_eq!(res.exit_code, 0);
    assert!(res.stdout.contains("memora"));
}

#[test]
fn deal_is_deterministic_per_seed() {
    let cli = CliRunner::new().unwrap();
    let a = cli.run(&["deal", "--seed", "42"]);
    let b = cli.run(&["deal", "--seed", "42"]);
    let c = cli.run(&["deal", "--seed", "43"]);
    assert_eq!(a.exit_code, 0);
    assert_eq!(a.stdout, b.stdout);
    assert_ne!(a.stdout, c.stdout);
    assert!(a.stdout.starts_with("Seed: 42"));
    assert_eq!(a.stdout.matches("lion").count(), 2);
}

#[test]
fn deal_with_custom_kinds() {
    let cli = CliRunner::new().unwrap();
    let res = cli.run(&["deal", "--seed", "1", "--kinds", "owl,cat,dog"]);
    assert_eq!(res.exit_code, 0);
    for kind in ["owl", "cat", "dog"] {
        assert_eq!(res.stdout.matches(kind).count(), 2, "{kind}");
    }
    assert!(!res.stdout.contains("lion"));
}

#[test]
fn deal_rejects_a_single_kind() {
    let cli = CliRunner::new().unwrap();
    let res = cli.run(&["deal", "--kinds", "owl"]);
    assert_eq!(res.exit_code, 2);
    assert!(res.stderr.contains("Configuration error"));
}

#[test]
fn sim_then_stats() {
    let cli = CliRunner::new().unwrap();
    let log = cli.path("out/sim.jsonl");
    let log_str = log.to_string_lossy().into_owned();

    let sim = cli.run(&["sim", "--games", "4", "--seed", "9", "--output", log_str.as_str()]);
    assert_eq!(sim.exit_code, 0, "{}", sim.stderr);
    assert!(sim.stdout.contains("Games: 4"));

    let records: Vec<GameRecord> = std::fs::read_to_string(&log)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(records.len(), 4);
    assert!(records.iter().all(|r| r.moves >= 6 && r.seed == Some(9)));
    assert!(records[0].new_record);

    let stats = cli.run(&["stats", "--input", log_str.as_str()]);
    assert_eq!(stats.exit_code, 0, "{}", stats.stderr);
    let json: Value = serde_json::from_str(&stats.stdout).unwrap();
    assert_eq!(json["games"], 4);
    let best = records.iter().map(|r| r.moves).min().unwrap();
    assert_eq!(json["best_score"], best);
}

#[test]
fn sim_break_hook_exits_130() {
    let cli = CliRunner::new().unwrap();
    let res = cli.run_with_env(
        &["sim", "--games", "10", "--seed", "3"],
        &[("MEMORA_SIM_BREAK_AFTER", "2")],
    );
    assert_eq!(res.exit_code, 130);
    assert!(res.stdout.contains("Games: 2"));
    assert!(res.stderr.contains("stopped after 2 of 10 games"));
}

#[test]
fn stats_on_missing_file_fails() {
    let cli = CliRunner::new().unwrap();
    let res = cli.run(&["stats", "--input", "nope.jsonl"]);
    assert_eq!(res.exit_code, 2);
    assert!(res.stderr.contains("Error:"));
}

#[test]
fn best_show_and_reset() {
    let cli = CliRunner::new().unwrap();
    let file = cli.path("scores.json");
    std::fs::write(&file, r#"{"bestScore": 8, "volume": 3}"#).unwrap();
    let file_str = file.to_string_lossy().into_owned();

    let shown = cli.run(&["best", "--score-file", file_str.as_str()]);
    assert_eq!(shown.exit_code, 0);
    assert!(shown.stdout.contains("Best: 8"));

    let reset = cli.run(&["best", "--reset", "--score-file", file_str.as_str()]);
    assert_eq!(reset.exit_code, 0);
    let raw: Value = serde_json::from_str(&std::fs::read_to_string(&file).unwrap()).unwrap();
    assert!(raw.get("bestScore").is_none());
    assert_eq!(raw["volume"], 3);

    let again = cli.run(&["best", "--score-file", file_str.as_str()]);
    assert!(again.stdout.contains("Best: -"));
}
