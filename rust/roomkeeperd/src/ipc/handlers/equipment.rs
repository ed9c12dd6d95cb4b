use crate::ipc::error::HandlerErr;
use crate::ipc::helpers::{get_optional_object, get_required_str, respond, respond_mut};
use crate::ipc::types::{AppState, Request};
use crate::model::EquipmentFields;
use serde_json::json;

fn equipment_add(state: &mut AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let fields: EquipmentFields = get_optional_object(params, "fields")?;
    let item = state.store.add_equipment(&fields)?;
    Ok(json!({ "equipment": item }))
}

fn equipment_update(state: &mut AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let id = get_required_str(params, "id")?;
    let fields: EquipmentFields = get_optional_object(params, "fields")?;
    let item = state.store.update_equipment(&id, &fields)?;
    Ok(json!({ "equipment": item }))
}

fn equipment_remove(state: &mut AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let id = get_required_str(params, "id")?;
    let removed = state.store.remove_equipment(&id)?;
    Ok(json!({ "removed": removed.id }))
}

fn equipment_list(state: &AppState, _params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    Ok(json!({ "equipment": state.store.equipment() }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "equipment.add" => Some(respond_mut(state, req, equipment_add)),
        "equipment.update" => Some(respond_mut(state, req, equipment_update)),
        "equipment.remove" => Some(respond_mut(state, req, equipment_remove)),
        "equipment.list" => Some(respond(req, equipment_list(state, &req.params))),
        _ => None,
    }
}
