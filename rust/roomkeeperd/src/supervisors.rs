use crate::attendance::parse_date_key;
use crate::error::StoreError;
use crate::model::{Condition, Supervisor, SupervisorFields};
use crate::store::Store;
use chrono::NaiveTime;
use uuid::Uuid;

pub(crate) fn required(name: &str, value: &str) -> Result<String, StoreError> {
    let v = value.trim();
    if v.is_empty() {
        return Err(StoreError::validation(format!("{} must not be empty", name)));
    }
    Ok(v.to_string())
}

fn parse_time(name: &str, raw: &str) -> Result<String, StoreError> {
    let t = raw.trim();
    if t.is_empty() {
        return Ok(String::new());
    }
    NaiveTime::parse_from_str(t, "%H:%M")
        .map(|v| v.format("%H:%M").to_string())
        .map_err(|_| StoreError::validation(format!("{} must be HH:MM", name)))
}

impl SupervisorFields {
    fn apply(&self, s: &mut Supervisor) {
        if let Some(v) = &self.course_id {
            s.course_id = v.clone();
        }
        if let Some(v) = &self.name {
            s.name = v.clone();
        }
        if let Some(v) = &self.document_id {
            s.document_id = v.trim().to_string();
        }
        if let Some(v) = &self.room {
            s.room = v.clone();
        }
        if let Some(v) = &self.date {
            s.date = v.clone();
        }
        if let Some(v) = &self.start_time {
            s.start_time = v.clone();
        }
        if let Some(v) = &self.end_time {
            s.end_time = v.clone();
        }
        if let Some(c) = self.equipment_condition {
            s.equipment_condition = c;
        }
        if let Some(c) = self.cleanliness {
            s.cleanliness = c;
        }
        if let Some(v) = &self.notes {
            s.notes = v.clone();
        }
    }
}

/// Normalises a merged record in place; the stored copy is only replaced on success.
fn validate(s: &mut Supervisor) -> Result<(), StoreError> {
    s.course_id = required("courseId", &s.course_id)?;
    s.name = required("name", &s.name)?;
    s.room = required("room", &s.room)?;
    s.date = parse_date_key(&s.date)?;
    s.start_time = parse_time("startTime", &s.start_time)?;
    s.end_time = parse_time("endTime", &s.end_time)?;
    if !s.start_time.is_empty() && !s.end_time.is_empty() && s.end_time <= s.start_time {
        return Err(StoreError::validation("endTime must be after startTime"));
    }
    Ok(())
}

impl Store {
    pub fn add_supervisor(&mut self, fields: &SupervisorFields) -> Result<Supervisor, StoreError> {
        let mut supervisor = Supervisor {
            id: Uuid::new_v4().to_string(),
            course_id: String::new(),
            name: String::new(),
            document_id: String::new(),
            room: String::new(),
            date: String::new(),
            start_time: String::new(),
            end_time: String::new(),
            equipment_condition: Condition::Excellent,
            cleanliness: Condition::Good,
            notes: String::new(),
            registered_at: chrono::Utc::now().to_rfc3339(),
            modified_at: None,
        };
        fields.apply(&mut supervisor);
        validate(&mut supervisor)?;
        self.supervisors.push(supervisor.clone());
        tracing::info!(supervisor_id = %supervisor.id, course_id = %supervisor.course_id, "added supervisor");
        Ok(supervisor)
    }

    pub fn update_supervisor(
        &mut self,
        supervisor_id: &str,
        fields: &SupervisorFields,
    ) -> Result<Supervisor, StoreError> {
        let idx = self
            .supervisors
            .iter()
            .position(|s| s.id == supervisor_id)
            .ok_or_else(|| StoreError::not_found("supervisor", supervisor_id))?;
        let mut updated = self.supervisors[idx].clone();
        fields.apply(&mut updated);
        validate(&mut updated)?;
        updated.modified_at = Some(chrono::Utc::now().to_rfc3339());
        self.supervisors[idx] = updated.clone();
        Ok(updated)
    }

    pub fn remove_supervisor(&mut self, supervisor_id: &str) -> Result<Supervisor, StoreError> {
        let idx = self
            .supervisors
            .iter()
            .position(|s| s.id == supervisor_id)
            .ok_or_else(|| StoreError::not_found("supervisor", supervisor_id))?;
        Ok(self.supervisors.remove(idx))
    }

    pub fn supervisors_for_course(&self, course_id: &str) -> Vec<&Supervisor> {
        self.supervisors
            .iter()
            .filter(|s| s.course_id == course_id)
            .collect()
    }

    /// Name of the course supervisor with this document id, if one is registered.
    pub fn supervisor_name(&self, course_id: &str, document_id: &str) -> Option<&str> {
        self.supervisors
            .iter()
            .find(|s| s.course_id == course_id && s.document_id == document_id)
            .map(|s| s.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(course: &str, name: &str) -> SupervisorFields {
        SupervisorFields {
            course_id: Some(course.into()),
            name: Some(name.into()),
            document_id: Some("D-77".into()),
            room: Some("Lab 3".into()),
            date: Some("2026-03-02".into()),
            start_time: Some(" 07:30".into()),
            end_time: Some("09:00".into()),
            ..SupervisorFields::default()
        }
    }

    #[test]
    fn add_normalises_and_defaults_conditions() {
        let mut store = Store::new();
        let s = store.add_supervisor(&fields("101", " Marta Leal ")).expect("add");
        assert_eq!(s.name, "Marta Leal");
        assert_eq!(s.start_time, "07:30");
        assert_eq!(s.equipment_condition, Condition::Excellent);
        assert_eq!(s.cleanliness, Condition::Good);
        assert!(s.modified_at.is_none());
        assert_eq!(store.supervisor_name("101", "D-77"), Some("Marta Leal"));
    }

    #[test]
    fn add_rejects_missing_room_bad_date_and_reversed_hours() {
        let mut store = Store::new();
        let mut no_room = fields("101", "Marta");
        no_room.room = Some("  ".into());
        assert!(store.add_supervisor(&no_room).is_err());

        let mut bad_date = fields("101", "Marta");
        bad_date.date = Some("02/03/2026".into());
        assert!(store.add_supervisor(&bad_date).is_err());

        let mut reversed = fields("101", "Marta");
        reversed.end_time = Some("07:00".into());
        assert!(store.add_supervisor(&reversed).is_err());
        assert!(store.supervisors().is_empty());
    }

    #[test]
    fn update_merges_and_rejected_update_keeps_record() {
        let mut store = Store::new();
        let s = store.add_supervisor(&fields("101", "Marta")).expect("add");
        let patch = SupervisorFields {
            cleanliness: Some(Condition::Poor),
            notes: Some("projector cable missing".into()),
            ..SupervisorFields::default()
        };
        let updated = store.update_supervisor(&s.id, &patch).expect("update");
        assert_eq!(updated.cleanliness, Condition::Poor);
        assert_eq!(updated.room, "Lab 3");
        assert!(updated.modified_at.is_some());

        let bad = SupervisorFields {
            date: Some("yesterday".into()),
            ..SupervisorFields::default()
        };
        assert!(store.update_supervisor(&s.id, &bad).is_err());
        assert_eq!(store.supervisors()[0], updated);
    }

    #[test]
    fn list_filters_by_course_and_remove_is_by_id() {
        let mut store = Store::new();
        let a = store.add_supervisor(&fields("101", "Marta")).expect("a");
        store.add_supervisor(&fields("102", "Pablo")).expect("b");
        assert_eq!(store.supervisors_for_course("101").len(), 1);
        assert_eq!(store.remove_supervisor(&a.id).expect("remove").name, "Marta");
        assert!(matches!(
            store.remove_supervisor(&a.id),
            Err(StoreError::NotFound { kind: "supervisor", .. })
        ));
        assert!(store.supervisors_for_course("101").is_empty());
    }
}
