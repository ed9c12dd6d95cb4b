use super::error::{ok, HandlerErr};
use super::types::{AppState, Request};
use crate::db;
use crate::model::Condition;
use serde::de::DeserializeOwned;

pub fn get_required_str(params: &serde_json::Value, key: &str) -> Result<String, HandlerErr> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| HandlerErr::bad_params(format!("missing {}", key)))
}

pub fn get_optional_str(params: &serde_json::Value, key: &str) -> String {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string()
}

pub fn get_required_u32(params: &serde_json::Value, key: &str) -> Result<u32, HandlerErr> {
    let raw = params
        .get(key)
        .ok_or_else(|| HandlerErr::bad_params(format!("missing {}", key)))?;
    if let Some(v) = raw.as_u64() {
        return u32::try_from(v)
            .map_err(|_| HandlerErr::bad_params(format!("{} is too large", key)));
    }
    if raw.as_i64().is_some() {
        return Err(HandlerErr::bad_params(format!("{} must not be negative", key)));
    }
    Err(HandlerErr::bad_params(format!("{} must be an integer", key)))
}

/// Deserializes an optional object param; absent or null yields the default.
pub fn get_optional_object<T>(params: &serde_json::Value, key: &str) -> Result<T, HandlerErr>
where
    T: DeserializeOwned + Default,
{
    match params.get(key) {
        None => Ok(T::default()),
        Some(v) if v.is_null() => Ok(T::default()),
        Some(v) => serde_json::from_value(v.clone()).map_err(|e| HandlerErr {
            code: "bad_params",
            message: format!("invalid {}: {}", key, e),
            details: Some(serde_json::json!({ "field": key, "value": v })),
        }),
    }
}

pub fn get_required_course(params: &serde_json::Value) -> Result<String, HandlerErr> {
    let course_id = get_required_str(params, "courseId")?;
    if course_id.trim().is_empty() {
        return Err(HandlerErr::bad_params("courseId must not be empty"));
    }
    Ok(course_id.trim().to_string())
}

pub fn get_condition(params: &serde_json::Value, key: &str) -> Result<Condition, HandlerErr> {
    let raw = get_required_str(params, key)?;
    Condition::parse(&raw).ok_or_else(|| HandlerErr {
        code: "bad_params",
        message: "condition must be one of: Excellent, Good, Fair, Poor".to_string(),
        details: Some(serde_json::json!({ "field": key, "value": raw })),
    })
}

/// Best-effort write-through of the whole store. Failures are logged, never surfaced.
pub fn persist(state: &AppState) {
    let Some(conn) = state.db.as_ref() else {
        return;
    };
    if let Err(e) = db::state_save(conn, &state.store.to_blob()) {
        tracing::error!(error = %format!("{e:#}"), "failed to persist state");
    }
}

pub fn respond(req: &Request, result: Result<serde_json::Value, HandlerErr>) -> serde_json::Value {
    match result {
        Ok(value) => ok(&req.id, value),
        Err(error) => error.response(&req.id),
    }
}

/// Runs a mutating handler and writes the store through on success.
pub fn respond_mut(
    state: &mut AppState,
    req: &Request,
    f: fn(&mut AppState, &serde_json::Value) -> Result<serde_json::Value, HandlerErr>,
) -> serde_json::Value {
    let result = f(state, &req.params);
    if result.is_ok() {
        persist(state);
    }
    respond(req, result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message(r: Result<u32, HandlerErr>) -> String {
        match r {
            Ok(v) => panic!("expected error, got {}", v),
            Err(e) => e.message,
        }
    }

    #[test]
    fn required_u32_reports_each_failure_distinctly() {
        assert_eq!(get_required_u32(&json!({ "count": 7 }), "count").ok(), Some(7));
        assert_eq!(message(get_required_u32(&json!({}), "count")), "missing count");
        assert_eq!(
            message(get_required_u32(&json!({ "count": "5" }), "count")),
            "count must be an integer"
        );
        assert_eq!(
            message(get_required_u32(&json!({ "count": 2.5 }), "count")),
            "count must be an integer"
        );
        assert_eq!(
            message(get_required_u32(&json!({ "count": -1 }), "count")),
            "count must not be negative"
        );
        assert_eq!(
            message(get_required_u32(&json!({ "count": 1u64 << 40 }), "count")),
            "count is too large"
        );
    }
}
