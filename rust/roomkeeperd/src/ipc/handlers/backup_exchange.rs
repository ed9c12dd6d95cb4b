use crate::backup;
use crate::ipc::error::HandlerErr;
use crate::ipc::helpers::{get_required_str, respond, respond_mut};
use crate::ipc::types::{AppState, Request};
use crate::store::{StateBlob, Store};
use serde_json::json;
use std::path::PathBuf;

fn store_from_value(value: serde_json::Value) -> Result<Store, HandlerErr> {
    let blob: StateBlob = serde_json::from_value(value).map_err(|e| HandlerErr {
        code: "bad_params",
        message: format!("invalid state: {}", e),
        details: None,
    })?;
    Ok(Store::from_blob(blob)?)
}

fn state_export(state: &AppState, _params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    Ok(json!({ "state": state.store.to_blob() }))
}

/// Replaces the whole store. The current state stays untouched if the blob is rejected.
fn state_import(state: &mut AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let Some(raw) = params.get("state") else {
        return Err(HandlerErr::bad_params("missing state"));
    };
    state.store = store_from_value(raw.clone())?;
    Ok(json!({
        "seats": state.store.seats().len(),
        "tables": state.store.tables().len(),
        "attendance": state.store.attendance().len(),
        "supervisors": state.store.supervisors().len(),
        "teacherStations": state.store.teacher_stations().len(),
        "equipment": state.store.equipment().len()
    }))
}

/// Empties every registry; the roster is external and stays loaded.
fn state_clear_all(state: &mut AppState, _params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let cleared = state.store.clear_all();
    tracing::warn!(
        seats = cleared.seats,
        tables = cleared.tables,
        attendance = cleared.attendance,
        "cleared all data"
    );
    Ok(json!({ "cleared": cleared }))
}

fn bundle_export(state: &AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let out_path = PathBuf::from(get_required_str(params, "outPath")?);
    let value = serde_json::to_value(state.store.to_blob()).map_err(|e| HandlerErr {
        code: "export_failed",
        message: e.to_string(),
        details: None,
    })?;
    let summary = backup::export_state_bundle(&value, &out_path).map_err(|e| HandlerErr {
        code: "export_failed",
        message: format!("{e:#}"),
        details: Some(json!({ "outPath": out_path.to_string_lossy() })),
    })?;
    tracing::info!(out_path = %out_path.to_string_lossy(), "exported bundle");
    Ok(json!({
        "bundleFormat": summary.bundle_format,
        "entryCount": summary.entry_count,
        "sha256": summary.sha256,
        "outPath": out_path.to_string_lossy()
    }))
}

fn bundle_import(state: &mut AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let in_path = PathBuf::from(get_required_str(params, "inPath")?);
    let summary = backup::import_state_bundle(&in_path).map_err(|e| HandlerErr {
        code: "import_failed",
        message: format!("{e:#}"),
        details: Some(json!({ "inPath": in_path.to_string_lossy() })),
    })?;
    state.store = store_from_value(summary.state)?;
    tracing::info!(in_path = %in_path.to_string_lossy(), format = %summary.bundle_format_detected, "imported bundle");
    Ok(json!({
        "bundleFormatDetected": summary.bundle_format_detected,
        "seats": state.store.seats().len(),
        "tables": state.store.tables().len()
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "state.export" => Some(respond(req, state_export(state, &req.params))),
        "state.import" => Some(respond_mut(state, req, state_import)),
        "state.clearAll" => Some(respond_mut(state, req, state_clear_all)),
        "backup.exportBundle" => Some(respond(req, bundle_export(state, &req.params))),
        "backup.importBundle" => Some(respond_mut(state, req, bundle_import)),
        _ => None,
    }
}
