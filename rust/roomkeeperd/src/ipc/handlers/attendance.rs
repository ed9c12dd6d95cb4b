use crate::ipc::error::HandlerErr;
use crate::ipc::helpers::{get_required_course, get_required_str, respond, respond_mut};
use crate::ipc::types::{AppState, Request};
use crate::model::AttendanceEntry;
use serde_json::json;

fn attendance_save(state: &mut AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let course_id = get_required_course(params)?;
    let date = get_required_str(params, "date")?;
    let Some(raw) = params.get("entries").filter(|v| v.is_array()) else {
        return Err(HandlerErr::bad_params("missing entries"));
    };
    let entries: Vec<AttendanceEntry> = serde_json::from_value(raw.clone()).map_err(|e| HandlerErr {
        code: "bad_params",
        message: format!("invalid entries: {}", e),
        details: None,
    })?;
    let record = state.store.save_attendance(&course_id, &date, entries)?;
    let present = record.entries.iter().filter(|e| e.present).count();
    Ok(json!({
        "record": record,
        "present": present,
        "absent": record.entries.len() - present
    }))
}

fn attendance_get(state: &AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let course_id = get_required_course(params)?;
    let date = get_required_str(params, "date")?;
    let record = state.store.get_attendance(&course_id, &date)?;
    Ok(json!({ "record": record }))
}

fn attendance_list(state: &AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let course_id = get_required_course(params)?;
    Ok(json!({ "records": state.store.list_attendance(&course_id) }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "attendance.save" => Some(respond_mut(state, req, attendance_save)),
        "attendance.get" => Some(respond(req, attendance_get(state, &req.params))),
        "attendance.list" => Some(respond(req, attendance_list(state, &req.params))),
        _ => None,
    }
}
