use super::handlers;
use super::types::{AppState, Request};
use crate::ipc::error::err;

pub fn handle_request(state: &mut AppState, req: Request) -> serde_json::Value {
    tracing::debug!(id = %req.id, method = %req.method, "request");
    if let Some(resp) = handlers::core::try_handle(state, &req) {
        return resp;
    }
    if let Some(resp) = handlers::roster::try_handle(state, &req) {
        return resp;
    }
    if let Some(resp) = handlers::seats::try_handle(state, &req) {
        return resp;
    }
    if let Some(resp) = handlers::workstations::try_handle(state, &req) {
        return resp;
    }
    if let Some(resp) = handlers::supervisors::try_handle(state, &req) {
        return resp;
    }
    if let Some(resp) = handlers::teacher_stations::try_handle(state, &req) {
        return resp;
    }
    if let Some(resp) = handlers::equipment::try_handle(state, &req) {
        return resp;
    }
    if let Some(resp) = handlers::course::try_handle(state, &req) {
        return resp;
    }
    if let Some(resp) = handlers::attendance::try_handle(state, &req) {
        return resp;
    }
    if let Some(resp) = handlers::backup_exchange::try_handle(state, &req) {
        return resp;
    }
    if let Some(resp) = handlers::history::try_handle(state, &req) {
        return resp;
    }

    err(
        &req.id,
        "not_implemented",
        format!("unknown method: {}", req.method),
        None,
    )
}
