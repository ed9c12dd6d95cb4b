use crate::ipc::error::HandlerErr;
use crate::ipc::helpers::{get_optional_str, respond};
use crate::ipc::types::{AppState, Request};
use crate::model::Student;
use serde_json::json;

fn roster_set(state: &mut AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let Some(raw) = params.get("students") else {
        return Err(HandlerErr::bad_params("missing students"));
    };
    let students: Vec<Student> = serde_json::from_value(raw.clone()).map_err(|e| HandlerErr {
        code: "bad_params",
        message: format!("invalid students: {}", e),
        details: None,
    })?;
    let count = state.roster.replace(students);
    Ok(json!({ "count": count }))
}

fn roster_list(state: &AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let course_id = get_optional_str(params, "courseId");
    let students: Vec<&Student> = if course_id.is_empty() {
        state.roster.all().iter().collect()
    } else {
        state.roster.students_for_course(&course_id)
    };
    Ok(json!({ "students": students }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "roster.set" => Some(respond(req, roster_set(state, &req.params))),
        "roster.list" => Some(respond(req, roster_list(state, &req.params))),
        _ => None,
    }
}
