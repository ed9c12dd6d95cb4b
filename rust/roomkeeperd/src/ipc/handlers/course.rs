use crate::ipc::error::HandlerErr;
use crate::ipc::helpers::{get_required_course, respond, respond_mut};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn course_clear(state: &mut AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let course_id = get_required_course(params)?;
    let (seats_removed, tables_removed) = state.store.clear_course(&course_id);
    tracing::info!(course_id = %course_id, seats_removed, tables_removed, "cleared course");
    Ok(json!({
        "seatsRemoved": seats_removed,
        "tablesRemoved": tables_removed
    }))
}

fn course_summary(state: &AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let course_id = get_required_course(params)?;
    Ok(json!({
        "summary": state.store.course_summary(&course_id),
        "enrolled": state.roster.students_for_course(&course_id).len(),
        "hasOtherCourseData": state.store.has_other_course_data(&course_id)
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "course.clear" => Some(respond_mut(state, req, course_clear)),
        "course.summary" => Some(respond(req, course_summary(state, &req.params))),
        _ => None,
    }
}
