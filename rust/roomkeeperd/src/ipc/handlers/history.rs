use crate::db;
use crate::ipc::error::HandlerErr;
use crate::ipc::helpers::{get_required_str, respond, respond_mut};
use crate::ipc::types::{AppState, Request};
use crate::store::Store;
use rusqlite::Connection;
use serde_json::json;

fn require_db(state: &AppState) -> Result<&Connection, HandlerErr> {
    state.db.as_ref().ok_or_else(|| HandlerErr {
        code: "no_workspace",
        message: "select a workspace first".to_string(),
        details: None,
    })
}

fn db_err(e: anyhow::Error) -> HandlerErr {
    HandlerErr {
        code: "db_query_failed",
        message: format!("{e:#}"),
        details: Some(json!({ "table": "snapshots" })),
    }
}

fn history_save(state: &AppState, _params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let conn = require_db(state)?;
    let meta = db::snapshot_save(conn, &state.store.to_blob(), state.config.history_limit)
        .map_err(db_err)?;
    Ok(json!({ "snapshot": meta }))
}

fn history_list(state: &AppState, _params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let conn = require_db(state)?;
    let snapshots = db::snapshot_list(conn).map_err(db_err)?;
    Ok(json!({ "snapshots": snapshots }))
}

fn history_restore(state: &mut AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let id = get_required_str(params, "id")?;
    let conn = require_db(state)?;
    let Some(blob) = db::snapshot_get(conn, &id).map_err(db_err)? else {
        return Err(HandlerErr {
            code: "not_found",
            message: "snapshot not found".to_string(),
            details: Some(json!({ "id": id })),
        });
    };
    state.store = Store::from_blob(blob)?;
    Ok(json!({
        "restored": id,
        "seats": state.store.seats().len(),
        "tables": state.store.tables().len()
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "history.save" => Some(respond(req, history_save(state, &req.params))),
        "history.list" => Some(respond(req, history_list(state, &req.params))),
        "history.restore" => Some(respond_mut(state, req, history_restore)),
        _ => None,
    }
}
