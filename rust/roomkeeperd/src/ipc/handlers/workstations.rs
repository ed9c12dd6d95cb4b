use crate::ipc::error::HandlerErr;
use crate::ipc::helpers::{
    get_optional_object, get_optional_str, get_required_course, get_required_str,
    get_required_u32, respond, respond_mut,
};
use crate::ipc::types::{AppState, Request};
use crate::model::WorkstationFields;
use serde_json::json;

fn get_slot(params: &serde_json::Value) -> Result<usize, HandlerErr> {
    Ok(get_required_u32(params, "slot")? as usize)
}

fn tables_json(state: &AppState, course_id: &str) -> serde_json::Value {
    let tables: Vec<serde_json::Value> = state
        .store
        .tables_for_course(course_id)
        .into_iter()
        .map(|t| {
            json!({
                "id": t.id,
                "courseId": t.course_id,
                "rowIndex": t.row_index,
                "colIndex": t.col_index,
                "workstations": t.workstations,
                "stats": t.stats()
            })
        })
        .collect();
    json!(tables)
}

fn workstations_configure(
    state: &mut AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let course_id = get_required_course(params)?;
    let rows = get_required_u32(params, "rows")?;
    let cols = get_required_u32(params, "cols")?;
    let per_table = get_required_u32(params, "perTable")?;
    let tables = state
        .store
        .configure_grid(rows, cols, per_table, &course_id)?;
    let workstation_count: usize = tables.iter().map(|t| t.workstations.len()).sum();
    Ok(json!({
        "tables": tables,
        "workstationCount": workstation_count
    }))
}

fn workstations_list(state: &AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let course_id = get_required_course(params)?;
    Ok(json!({
        "tables": tables_json(state, &course_id),
        "assignedDocumentIds": state.store.assigned_document_ids(&course_id)
    }))
}

fn workstations_assign(
    state: &mut AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let table_id = get_required_str(params, "tableId")?;
    let slot = get_slot(params)?;
    let student_id = get_optional_str(params, "studentId");
    let mut student_name = get_optional_str(params, "studentName");
    let fields: WorkstationFields = get_optional_object(params, "fields")?;
    if student_name.trim().is_empty() && !student_id.is_empty() {
        if let Some(course_id) = state.store.table(&table_id).map(|t| t.course_id.clone()) {
            if let Some(st) = state.roster.find(&course_id, student_id.trim()) {
                student_name = st.display_name();
            }
        }
    }
    state
        .store
        .assign_workstation(&table_id, slot, &student_id, &student_name, &fields)?;
    let workstation = state
        .store
        .table(&table_id)
        .and_then(|t| t.workstations.get(slot));
    Ok(json!({ "assigned": true, "workstation": workstation }))
}

fn workstations_unassign(
    state: &mut AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let table_id = get_required_str(params, "tableId")?;
    let slot = get_slot(params)?;
    state.store.unassign_workstation(&table_id, slot)?;
    Ok(json!({ "ok": true }))
}

fn workstations_update_fields(
    state: &mut AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let table_id = get_required_str(params, "tableId")?;
    let slot = get_slot(params)?;
    let fields: WorkstationFields = get_optional_object(params, "fields")?;
    state
        .store
        .update_workstation_fields(&table_id, slot, &fields)?;
    let workstation = state
        .store
        .table(&table_id)
        .and_then(|t| t.workstations.get(slot));
    Ok(json!({ "workstation": workstation }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "workstations.configure" => Some(respond_mut(state, req, workstations_configure)),
        "workstations.list" => Some(respond(req, workstations_list(state, &req.params))),
        "workstations.assign" => Some(respond_mut(state, req, workstations_assign)),
        "workstations.unassign" => Some(respond_mut(state, req, workstations_unassign)),
        "workstations.updateFields" => Some(respond_mut(state, req, workstations_update_fields)),
        _ => None,
    }
}
