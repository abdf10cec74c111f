//! Runs of the compiled binary

use crate::{write_bytes, write_parquet, Workspace};
use std::path::Path;
use std::process::{Command, Output};

fn brickcheck(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_brickcheck"))
        .args(args)
        .current_dir(dir)
        .env("NO_COLOR", "1")
        .env_remove("BRICKCHECK_LOG")
        .output()
        .expect("run brickcheck")
}

#[test]
fn test_missing_brick_list_exits_one() {
    let ws = Workspace::new();

    let output = brickcheck(ws.root(), &[]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("list/bricks.txt not found"), "{stderr}");
    assert!(!ws.root().join("fail").exists());
}

#[test]
fn test_check_subcommand_exit_status() {
    let ws = Workspace::new();
    let good = write_parquet(&ws.root().join("ok.parquet"), 4);
    let empty = write_bytes(&ws.root().join("empty.txt"), b"");

    let pass = brickcheck(ws.root(), &["check", good.to_str().unwrap()]);
    assert_eq!(pass.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&pass.stdout).contains("Parquet file has 4 rows"));

    let fail = brickcheck(
        ws.root(),
        &["check", good.to_str().unwrap(), empty.to_str().unwrap()],
    );
    assert_eq!(fail.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&fail.stdout).contains("File is empty (0 bytes)"));
}

#[cfg(unix)]
mod with_tool {
    use super::*;
    use crate::write_tool;

    fn tool_for_brick_a(ws: &Workspace) -> String {
        let parquet = write_parquet(&ws.brick_dir("brickA").join("compounds.parquet"), 10);
        let script = format!(
            r#"[ "$1" = "assets" ] || exit 2
case "$2" in
  brickA) echo "compounds_parquet: {}" ;;
  *) echo "brick $2 not found" >&2; exit 1 ;;
esac"#,
            parquet.display()
        );
        write_tool(ws.root(), &script).to_string_lossy().to_string()
    }

    #[test]
    fn test_run_reports_failures_and_exits_one() {
        let ws = Workspace::new();
        ws.write_catalog("# bricks\nbrickA\nbrickB\n");
        let tool = tool_for_brick_a(&ws);

        let output = brickcheck(ws.root(), &["run", "--tool", &tool]);

        assert_eq!(output.status.code(), Some(1));
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("Starting verification of 2 bricks..."), "{stdout}");
        assert!(stdout.contains("compounds.parquet: Parquet file has 10 rows"), "{stdout}");
        assert!(stdout.contains("brickA verification passed"), "{stdout}");
        assert!(
            stdout.contains("FAILED: brickB - No assets found or asset lookup failed"),
            "{stdout}"
        );
        assert!(stdout.contains("Successful: 1"), "{stdout}");
        assert!(stdout.contains("Failed: 1"), "{stdout}");
        assert_eq!(ws.failure_log().as_deref(), Some("brickB\n"));
    }

    #[test]
    fn test_run_json_summary() {
        let ws = Workspace::new();
        ws.write_catalog("brickA\nbrickB\n");
        let tool = tool_for_brick_a(&ws);

        let output = brickcheck(ws.root(), &["run", "--tool", &tool, "--json"]);

        assert_eq!(output.status.code(), Some(1));
        let summary: serde_json::Value =
            serde_json::from_slice(&output.stdout).expect("stdout is JSON");
        assert_eq!(summary["succeeded"], 1);
        assert_eq!(summary["failed"], 1);
        assert_eq!(summary["failed_bricks"], serde_json::json!(["brickB"]));
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(
            stderr.contains("FAILED: brickB - No assets found"),
            "{stderr}"
        );
    }

    #[test]
    fn test_all_passing_run_exits_zero() {
        let ws = Workspace::new();
        ws.write_catalog("brickA\n");
        let tool = tool_for_brick_a(&ws);

        let output = brickcheck(ws.root(), &["run", "--tool", &tool]);

        assert_eq!(output.status.code(), Some(0));
        assert!(String::from_utf8_lossy(&output.stdout).contains("All bricks verified successfully!"));
        assert_eq!(ws.failure_log(), None);
    }

    #[test]
    fn test_lookup_timeout_counts_as_failure() {
        let ws = Workspace::new();
        ws.write_catalog("slow\n");
        let tool = write_tool(ws.root(), "exec sleep 10");

        let output = brickcheck(
            ws.root(),
            &["run", "--tool", tool.to_str().unwrap(), "--timeout", "1"],
        );

        assert_eq!(output.status.code(), Some(1));
        assert_eq!(ws.failure_log().as_deref(), Some("slow\n"));
    }
}
