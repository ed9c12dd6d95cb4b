use crate::db;
use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use crate::roster::{Roster, ROSTER_FILE};
use crate::store::Store;
use serde_json::json;
use std::path::{Path, PathBuf};

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "workspacePath": state.workspace.as_ref().map(|p| p.to_string_lossy().to_string()),
            "persistent": state.db.is_some()
        }),
    )
}

/// Opens the workspace database and loads the stored state and roster.
pub fn select_workspace(state: &mut AppState, path: &Path) -> anyhow::Result<()> {
    let conn = db::open_db(path)?;
    let store = match db::state_load(&conn)? {
        Some(blob) => Store::from_blob(blob)?,
        None => Store::new(),
    };

    // Best-effort: a missing or broken roster file must not prevent the workspace from opening.
    let roster_path = path.join(ROSTER_FILE);
    let roster = if roster_path.is_file() {
        match Roster::load_file(&roster_path) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %format!("{e:#}"), "ignoring roster file");
                Roster::default()
            }
        }
    } else {
        Roster::default()
    };

    tracing::info!(
        workspace = %path.to_string_lossy(),
        seats = store.seats().len(),
        tables = store.tables().len(),
        students = roster.all().len(),
        "workspace opened"
    );
    state.workspace = Some(path.to_path_buf());
    state.db = Some(conn);
    state.store = store;
    state.roster = roster;
    Ok(())
}

fn handle_workspace_select(state: &mut AppState, req: &Request) -> serde_json::Value {
    let p = req
        .params
        .get("path")
        .and_then(|v| v.as_str())
        .map(PathBuf::from);
    let Some(path) = p else {
        return err(&req.id, "bad_params", "missing params.path", None);
    };

    match select_workspace(state, &path) {
        Ok(()) => ok(
            &req.id,
            json!({
                "workspacePath": path.to_string_lossy(),
                "students": state.roster.all().len()
            }),
        ),
        Err(e) => err(&req.id, "db_open_failed", format!("{e:?}"), None),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        "workspace.select" => Some(handle_workspace_select(state, req)),
        _ => None,
    }
}
