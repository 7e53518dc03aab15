use std::process::Command;

fn run_sim(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_sim"))
        .args(args)
        .output()
        .expect("failed to run sim binary")
}

#[test]
fn sim_binary_smoke() {
    let output = run_sim(&["1", "easy"]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("non utf8 output");
    let v: serde_json::Value = serde_json::from_str(stdout.trim()).expect("invalid json");
    assert_eq!(v["won"], true);
    assert_eq!(v["difficulty"], "easy");
    assert!(v["moves"].as_u64().unwrap() >= 4);
    assert!(v["score"].is_u64());
}

#[test]
fn sim_is_deterministic_per_seed() {
    let a = run_sim(&["7", "hard"]);
    let b = run_sim(&["7", "hard"]);
    assert!(a.status.success());
    assert_eq!(a.stdout, b.stdout);
}

#[test]
fn sim_rejects_unknown_level() {
    let output = run_sim(&["1", "extreme"]);
    assert!(!output.status.success());
}
