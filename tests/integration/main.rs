//! Integration tests for Trellis
//!
//! These tests drive snapshot loading, the matrix/catalog pipeline, report
//! rendering and the CLI together.

use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

const CURRENT: &str = r#"
nodes:
  - { id: ba1, name: Enterprise, classification: BusinessArea }
  - { id: d1, name: Sales, classification: Domain }
  - { id: d2, name: Finance, classification: Domain }
  - { id: a1, name: Order System, classification: Application }
  - { id: a2, name: Portal, classification: Application }
  - { id: a3, name: MobileApp, classification: Application }
  - { id: a4, name: Billing, classification: Application }
containment:
  - { parent: ba1, child: d1 }
  - { parent: d1, child: a1 }
  - { parent: d1, child: a2 }
  - { parent: d1, child: a3 }
  - { parent: d1, child: a4 }
  - { parent: d2, child: a4 }
triggers:
  - source: a2
    target: a1
    name: IF-orders
    properties: { Interface: [REST] }
  - source: a3
    target: a1
    name: IF-mobile-orders
    properties: { Interface: [REST] }
  - source: a1
    target: a2
    name: notifies
"#;

const BASELINE: &str = r#"
nodes:
  - { id: d1, name: Sales, classification: Domain }
  - { id: a1, name: Order System, classification: Application }
  - { id: a2, name: Portal, classification: Application }
containment:
  - { parent: d1, child: a1 }
  - { parent: d1, child: a2 }
triggers:
  - source: a2
    target: a1
    name: IF-orders
    properties: { Interface: [REST] }
"#;

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn trellis(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_trellis"));
    cmd.current_dir(dir);
    cmd
}

/// Test the library pipeline end to end on snapshot files
#[test]
fn test_compare_pipeline() {
    use trellis_core::{load_graph, run_matrix, ChangeTag, MatrixOutcome, TrellisConfig};
    use trellis_report::{render_matrix_csv, MatrixSheet};

    let temp_dir = TempDir::new().unwrap();
    let current = load_graph(&write(temp_dir.path(), "current.yaml", CURRENT)).unwrap();
    let baseline = load_graph(&write(temp_dir.path(), "baseline.yaml", BASELINE)).unwrap();

    let outcome = run_matrix(&current, Some(&baseline), &TrellisConfig::default()).unwrap();
    let MatrixOutcome::Report(report) = outcome else {
        panic!("expected a report");
    };

    let diff = report.diff.as_ref().unwrap();
    assert_eq!(diff.row_tag("Order System", "REST"), ChangeTag::Changed);
    assert_eq!(diff.cell_tag("Order System", "REST", "MobileApp"), Some(ChangeTag::New));
    assert_eq!(diff.cell_tag("Order System", "REST", "Portal"), Some(ChangeTag::Unchanged));

    let csv = render_matrix_csv(&MatrixSheet::layout(&report)).unwrap();
    assert!(csv.contains("Sales,Order System [changed],REST,intern,changed,x [new],x"));
}

/// Test that the CLI can be invoked
#[test]
fn test_cli_invocation() {
    let temp_dir = TempDir::new().unwrap();
    let output = trellis(temp_dir.path()).arg("--help").output().unwrap();

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Connectivity matrix and application catalog"));
}

#[test]
fn test_cli_matrix_writes_report() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "current.yaml", CURRENT);
    write(temp_dir.path(), "baseline.yaml", BASELINE);

    let output = trellis(temp_dir.path())
        .args(["matrix", "--model", "current.yaml", "--baseline", "baseline.yaml", "--output", "out"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let report = std::fs::read_to_string(temp_dir.path().join("out/connectivity-matrix.csv")).unwrap();
    let first_line = report.lines().next().unwrap();
    assert_eq!(first_line, "Domain,Element,Interface,Scope,Change,MobileApp [new],Portal");
}

#[test]
fn test_cli_matrix_without_relationships() {
    let temp_dir = TempDir::new().unwrap();
    write(
        temp_dir.path(),
        ".trellis.toml",
        "[matrix]\ntrigger_prefix = \"NOPE-\"\n",
    );
    write(temp_dir.path(), "current.yaml", CURRENT);

    let output = trellis(temp_dir.path())
        .args(["matrix", "--model", "current.yaml"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No relationships found"));
    assert!(!temp_dir.path().join("connectivity-matrix.csv").exists());
}

#[test]
fn test_cli_catalog_json() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "current.yaml", CURRENT);

    let output = trellis(temp_dir.path())
        .args(["catalog", "--model", "current.yaml", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let json = std::fs::read_to_string(temp_dir.path().join("application-catalog.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let rows = value["data"].as_array().unwrap();

    assert_eq!(rows.len(), 4);
    // Billing has two domains; everything under Enterprise comes first
    assert_eq!(rows[0]["name"], "Billing");
    assert_eq!(rows[0]["domain"], "Finance, Sales");
    assert_eq!(rows[0]["business_area"], "Enterprise");
}

#[test]
fn test_cli_resolve() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "current.yaml", CURRENT);

    let output = trellis(temp_dir.path())
        .args(["resolve", "--model", "current.yaml", "--node", "a4"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "Finance, Sales");

    let missing = trellis(temp_dir.path())
        .args(["resolve", "--model", "current.yaml", "--node", "zz"])
        .output()
        .unwrap();
    assert!(!missing.status.success());
}
