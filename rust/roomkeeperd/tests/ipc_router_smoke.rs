use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_dir(prefix: &str) -> PathBuf {
    let p = std::env::temp_dir().join(format!(
        "{}-{}",
        prefix,
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos()
    ));
    std::fs::create_dir_all(&p).expect("create temp dir");
    p
}

fn spawn_sidecar() -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_roomkeeperd");
    let mut child = Command::new(exe)
        .env_remove("ROOMKEEPER_WORKSPACE")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn roomkeeperd");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

fn request(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let payload = json!({
        "id": id,
        "method": method,
        "params": params,
    });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");

    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    assert!(!line.trim().is_empty(), "empty response for {}", method);
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("parse response json");
    assert_eq!(value.get("id").and_then(|v| v.as_str()), Some(id));
    if value.get("ok").and_then(|v| v.as_bool()) == Some(false) {
        let code = value
            .get("error")
            .and_then(|e| e.get("code"))
            .and_then(|v| v.as_str())
            .unwrap_or("unknown");
        assert_ne!(
            code, "not_implemented",
            "unexpected unknown method for {}",
            method
        );
    }
    value
}

#[test]
fn router_dispatch_smoke_covers_handler_families() {
    let workspace = temp_dir("roomkeeper-router-smoke");
    let bundle_out = workspace.join("smoke.rkbundle.zip");

    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let health = request(&mut stdin, &mut reader, "1", "health", json!({}));
    assert_eq!(
        health
            .get("result")
            .and_then(|r| r.get("persistent"))
            .and_then(|v| v.as_bool()),
        Some(false)
    );
    let _ = request(
        &mut stdin,
        &mut reader,
        "2",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );

    let calls = [
        ("roster.set", json!({ "students": [] })),
        ("roster.list", json!({})),
        ("seats.configure", json!({ "courseId": "101", "count": 2 })),
        ("seats.list", json!({ "courseId": "101" })),
        ("seats.assign", json!({ "seatId": "x", "studentId": "1" })),
        ("seats.unassign", json!({ "seatId": "x" })),
        ("seats.updateCondition", json!({ "seatId": "x", "condition": "Fair" })),
        ("seats.autoAssign", json!({ "courseId": "101" })),
        ("seats.stats", json!({ "courseId": "101" })),
        ("seats.unseated", json!({ "courseId": "101" })),
        ("workstations.configure", json!({ "courseId": "101", "rows": 1, "cols": 1, "perTable": 1 })),
        ("workstations.list", json!({ "courseId": "101" })),
        ("workstations.assign", json!({ "tableId": "x", "slot": 0 })),
        ("workstations.unassign", json!({ "tableId": "x", "slot": 0 })),
        ("workstations.updateFields", json!({ "tableId": "x", "slot": 0 })),
        ("supervisors.add", json!({ "fields": {} })),
        ("supervisors.update", json!({ "id": "x", "fields": {} })),
        ("supervisors.remove", json!({ "id": "x" })),
        ("supervisors.list", json!({ "courseId": "101" })),
        ("teacherStations.add", json!({ "fields": {} })),
        ("teacherStations.remove", json!({ "id": "x" })),
        ("teacherStations.list", json!({})),
        ("equipment.add", json!({ "fields": {} })),
        ("equipment.update", json!({ "id": "x", "fields": {} })),
        ("equipment.remove", json!({ "id": "x" })),
        ("equipment.list", json!({})),
        ("course.summary", json!({ "courseId": "101" })),
        ("attendance.save", json!({ "courseId": "101", "date": "2026-03-02", "entries": [] })),
        ("attendance.get", json!({ "courseId": "101", "date": "2026-03-02" })),
        ("attendance.list", json!({ "courseId": "101" })),
        ("state.export", json!({})),
        ("state.import", json!({})),
        ("backup.exportBundle", json!({ "outPath": bundle_out.to_string_lossy() })),
        ("backup.importBundle", json!({ "inPath": bundle_out.to_string_lossy() })),
        ("history.save", json!({})),
        ("history.list", json!({})),
        ("history.restore", json!({ "id": "missing" })),
        ("course.clear", json!({ "courseId": "101" })),
        ("state.clearAll", json!({})),
    ];
    for (i, (method, params)) in calls.iter().enumerate() {
        let id = format!("c{}", i);
        let _ = request(&mut stdin, &mut reader, &id, method, params.clone());
    }

    let unknown = request_raw(&mut stdin, &mut reader, "u", "seats.teleport");
    assert_eq!(
        unknown
            .get("error")
            .and_then(|e| e.get("code"))
            .and_then(|v| v.as_str()),
        Some("not_implemented")
    );

    drop(stdin);
    let _ = child.wait();
    let _ = std::fs::remove_dir_all(workspace);
}

fn request_raw(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
) -> serde_json::Value {
    writeln!(stdin, "{}", json!({ "id": id, "method": method })).expect("write request");
    stdin.flush().expect("flush request");
    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    serde_json::from_str(line.trim()).expect("parse response json")
}
