use crate::ipc::error::HandlerErr;
use crate::ipc::helpers::{
    get_condition, get_optional_str, get_required_course, get_required_str, get_required_u32,
    respond, respond_mut,
};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn seats_configure(state: &mut AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let course_id = get_required_course(params)?;
    let count = get_required_u32(params, "count")?;
    let enrolled = state.roster.students_for_course(&course_id).len();
    if (count as usize) < enrolled {
        return Err(HandlerErr {
            code: "bad_params",
            message: format!(
                "insufficient capacity: {} seats for {} enrolled students",
                count, enrolled
            ),
            details: Some(json!({ "count": count, "enrolled": enrolled })),
        });
    }
    let seats = state.store.configure_seats(count, &course_id)?;
    Ok(json!({ "seats": seats }))
}

fn seats_list(state: &AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let course_id = get_required_course(params)?;
    Ok(json!({ "seats": state.store.seats_for_course(&course_id) }))
}

fn seats_assign(state: &mut AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let seat_id = get_required_str(params, "seatId")?;
    let student_id = get_optional_str(params, "studentId");
    let mut student_name = get_optional_str(params, "studentName");
    if student_name.trim().is_empty() && !student_id.is_empty() {
        // Fall back to the roster when the caller only sent a document id.
        if let Some(course_id) = state.store.seat(&seat_id).map(|s| s.course_id.clone()) {
            if let Some(st) = state.roster.find(&course_id, student_id.trim()) {
                student_name = st.display_name();
            }
        }
    }
    state.store.assign_seat(&seat_id, &student_id, &student_name)?;
    Ok(json!({ "assigned": true, "seat": state.store.seat(&seat_id) }))
}

fn seats_unassign(state: &mut AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let seat_id = get_required_str(params, "seatId")?;
    state.store.unassign_seat(&seat_id)?;
    Ok(json!({ "ok": true }))
}

fn seats_update_condition(
    state: &mut AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let seat_id = get_required_str(params, "seatId")?;
    let condition = get_condition(params, "condition")?;
    let notes = get_optional_str(params, "notes");
    state.store.update_seat_condition(&seat_id, condition, &notes)?;
    Ok(json!({ "seat": state.store.seat(&seat_id) }))
}

fn seats_auto_assign(state: &mut AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let course_id = get_required_course(params)?;
    let AppState { store, roster, .. } = state;
    let placed = store.auto_assign_seats(roster, &course_id)?;
    Ok(json!({
        "assigned": placed,
        "stats": store.seat_stats(&course_id)
    }))
}

fn seats_stats(state: &AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let course_id = get_required_course(params)?;
    Ok(json!({ "stats": state.store.seat_stats(&course_id) }))
}

fn seats_unseated(state: &AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let course_id = get_required_course(params)?;
    Ok(json!({
        "students": state.store.students_without_seat(&state.roster, &course_id)
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "seats.configure" => Some(respond_mut(state, req, seats_configure)),
        "seats.list" => Some(respond(req, seats_list(state, &req.params))),
        "seats.assign" => Some(respond_mut(state, req, seats_assign)),
        "seats.unassign" => Some(respond_mut(state, req, seats_unassign)),
        "seats.updateCondition" => Some(respond_mut(state, req, seats_update_condition)),
        "seats.autoAssign" => Some(respond_mut(state, req, seats_auto_assign)),
        "seats.stats" => Some(respond(req, seats_stats(state, &req.params))),
        "seats.unseated" => Some(respond(req, seats_unseated(state, &req.params))),
        _ => None,
    }
}
