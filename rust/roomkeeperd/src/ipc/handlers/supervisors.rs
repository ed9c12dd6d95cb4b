use crate::ipc::error::HandlerErr;
use crate::ipc::helpers::{get_optional_object, get_optional_str, get_required_str, respond, respond_mut};
use crate::ipc::types::{AppState, Request};
use crate::model::SupervisorFields;
use serde_json::json;

fn supervisors_add(state: &mut AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let fields: SupervisorFields = get_optional_object(params, "fields")?;
    let supervisor = state.store.add_supervisor(&fields)?;
    Ok(json!({ "supervisor": supervisor }))
}

fn supervisors_update(state: &mut AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let id = get_required_str(params, "id")?;
    let fields: SupervisorFields = get_optional_object(params, "fields")?;
    let supervisor = state.store.update_supervisor(&id, &fields)?;
    Ok(json!({ "supervisor": supervisor }))
}

fn supervisors_remove(state: &mut AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let id = get_required_str(params, "id")?;
    let removed = state.store.remove_supervisor(&id)?;
    Ok(json!({ "removed": removed.id }))
}

fn supervisors_list(state: &AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let course_id = get_optional_str(params, "courseId");
    let course_id = course_id.trim();
    if course_id.is_empty() {
        return Ok(json!({ "supervisors": state.store.supervisors() }));
    }
    Ok(json!({ "supervisors": state.store.supervisors_for_course(course_id) }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "supervisors.add" => Some(respond_mut(state, req, supervisors_add)),
        "supervisors.update" => Some(respond_mut(state, req, supervisors_update)),
        "supervisors.remove" => Some(respond_mut(state, req, supervisors_remove)),
        "supervisors.list" => Some(respond(req, supervisors_list(state, &req.params))),
        _ => None,
    }
}
