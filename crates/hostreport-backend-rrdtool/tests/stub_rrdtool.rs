//! Runs the orchestrator against a shell script standing in for rrdtool.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use hostreport_backend_rrdtool::{Rrdtool, RrdtoolConfig, RrdtoolError};
use hostreport_spec::{
    BackendError, Color, GraphSpec, Renderer, SeriesStore, TimePolicy, TimeRange,
};
use tempfile::TempDir;

fn stub(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("rrdtool");
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn rrdtool(script: &Path) -> Rrdtool {
    Rrdtool::with_config(RrdtoolConfig::default().rrdtool_path(script))
}

fn net_spec(output: PathBuf) -> GraphSpec {
    GraphSpec::builder(output, TimeRange::new(1000, 2000, TimePolicy::Explicit))
        .title("web01 Network")
        .vertical_label("Bytes")
        .def("in", "/data/web01/bytes_in.rrd")
        .line(1, "in", Color::new(0x33, 0xcc, 0x33), "In")
        .build()
        .unwrap()
}

#[test]
fn test_last_parses_timestamp() {
    let tmp = TempDir::new().unwrap();
    let script = stub(
        tmp.path(),
        r#"[ "$1" = "last" ] || exit 3
echo 1700000000"#,
    );

    let rrd = rrdtool(&script);
    assert_eq!(rrd.last(Path::new("/data/cpu_user.rrd")).unwrap(), 1_700_000_000);
    assert_eq!(
        rrd.last_update(Path::new("/data/cpu_user.rrd")).unwrap(),
        1_700_000_000
    );
}

#[test]
fn test_last_rejects_garbage() {
    let tmp = TempDir::new().unwrap();
    let script = stub(tmp.path(), "echo not-a-number");

    let err = rrdtool(&script).last(Path::new("x.rrd")).unwrap_err();
    assert!(matches!(err, RrdtoolError::InvalidLastOutput { .. }));
    assert_eq!(err.code(), "RRDTOOL_005");
}

#[test]
fn test_failure_carries_stderr() {
    let tmp = TempDir::new().unwrap();
    let script = stub(
        tmp.path(),
        r#"echo "ERROR: opening '$2': No such file or directory" >&2
exit 1"#,
    );

    let err = rrdtool(&script).last(Path::new("mem_free.rrd")).unwrap_err();
    match err {
        RrdtoolError::ProcessFailed { exit_code, stderr } => {
            assert_eq!(exit_code, 1);
            assert!(stderr.contains("opening 'mem_free.rrd'"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_render_writes_output_and_passes_args() {
    let tmp = TempDir::new().unwrap();
    let log = tmp.path().join("args.log");
    let script = stub(
        tmp.path(),
        &format!(
            r#"for a in "$@"; do echo "$a" >> '{}'; done
touch "$2"
echo 481x173"#,
            log.display()
        ),
    );

    let output = tmp.path().join("web01_net.png");
    rrdtool(&script).render(net_spec(output.clone())).unwrap();

    assert!(output.exists());
    let logged = fs::read_to_string(&log).unwrap();
    let lines: Vec<&str> = logged.lines().collect();
    assert_eq!(lines[0], "graph");
    assert_eq!(lines[1], output.to_string_lossy());
    assert!(lines.contains(&"DEF:in=/data/web01/bytes_in.rrd:sum:AVERAGE"));
    assert!(lines.contains(&"LINE1:in#33cc33:In"));
}

#[test]
fn test_render_without_output_file_fails() {
    let tmp = TempDir::new().unwrap();
    let script = stub(tmp.path(), "exit 0");

    let err = rrdtool(&script)
        .render(net_spec(tmp.path().join("missing.png")))
        .unwrap_err();
    assert!(matches!(err, RrdtoolError::OutputNotFound { .. }));
}

#[test]
fn test_timeout_kills_process() {
    let tmp = TempDir::new().unwrap();
    let script = stub(tmp.path(), "exec sleep 10");

    let rrd = Rrdtool::with_config(
        RrdtoolConfig::default()
            .rrdtool_path(&script)
            .timeout(Duration::from_millis(200)),
    );
    let err = rrd.last(Path::new("x.rrd")).unwrap_err();
    assert!(matches!(err, RrdtoolError::Timeout { .. }));
    assert_eq!(err.code(), "RRDTOOL_003");
}
