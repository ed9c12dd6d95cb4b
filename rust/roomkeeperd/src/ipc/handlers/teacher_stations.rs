use crate::ipc::error::HandlerErr;
use crate::ipc::helpers::{get_optional_object, get_optional_str, get_required_str, respond, respond_mut};
use crate::ipc::types::{AppState, Request};
use crate::model::TeacherStationInput;
use serde_json::json;

fn stations_add(state: &mut AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let mut input: TeacherStationInput = get_optional_object(params, "fields")?;
    if input.teacher_name.trim().is_empty() && !input.teacher_document_id.trim().is_empty() {
        // Teachers are picked from the course's registered supervisors.
        if let Some(name) = state
            .store
            .supervisor_name(input.course_id.trim(), input.teacher_document_id.trim())
        {
            input.teacher_name = name.to_string();
        }
    }
    let station = state.store.add_teacher_station(&input)?;
    Ok(json!({ "station": station }))
}

fn stations_remove(state: &mut AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let id = get_required_str(params, "id")?;
    let removed = state.store.remove_teacher_station(&id)?;
    Ok(json!({ "removed": removed.id }))
}

fn stations_list(state: &AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let course_id = get_optional_str(params, "courseId");
    let course_id = course_id.trim();
    if course_id.is_empty() {
        return Ok(json!({ "stations": state.store.teacher_stations() }));
    }
    Ok(json!({ "stations": state.store.teacher_stations_for_course(course_id) }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "teacherStations.add" => Some(respond_mut(state, req, stations_add)),
        "teacherStations.remove" => Some(respond_mut(state, req, stations_remove)),
        "teacherStations.list" => Some(respond(req, stations_list(state, &req.params))),
        _ => None,
    }
}
