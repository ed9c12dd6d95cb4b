use crate::error::StoreError;
use crate::model::{Condition, Network, PeripheralConditions, TeacherStation, TeacherStationInput};
use crate::store::Store;
use crate::supervisors::required;
use uuid::Uuid;

impl Store {
    pub fn add_teacher_station(&mut self, input: &TeacherStationInput) -> Result<TeacherStation, StoreError> {
        let f = &input.fields;
        let station = TeacherStation {
            id: Uuid::new_v4().to_string(),
            course_id: required("courseId", &input.course_id)?,
            teacher_name: input.teacher_name.trim().to_string(),
            teacher_document_id: input.teacher_document_id.trim().to_string(),
            serial: required("serial", &input.serial)?,
            condition: f.condition.unwrap_or(Condition::Excellent),
            peripheral_conditions: PeripheralConditions {
                mouse: f.mouse.unwrap_or_default(),
                keyboard: f.keyboard.unwrap_or_default(),
                display: f.display.unwrap_or_default(),
            },
            network: f.network.unwrap_or(Network::Working),
            cleanliness: input.cleanliness.unwrap_or_default(),
            notes: f.notes.clone().unwrap_or_default(),
            created_at: chrono::Utc::now().to_rfc3339(),
        };
        self.teacher_stations.push(station.clone());
        tracing::info!(station_id = %station.id, course_id = %station.course_id, "added teacher station");
        Ok(station)
    }

    pub fn remove_teacher_station(&mut self, station_id: &str) -> Result<TeacherStation, StoreError> {
        let idx = self
            .teacher_stations
            .iter()
            .position(|s| s.id == station_id)
            .ok_or_else(|| StoreError::not_found("teacher station", station_id))?;
        Ok(self.teacher_stations.remove(idx))
    }

    pub fn teacher_stations_for_course(&self, course_id: &str) -> Vec<&TeacherStation> {
        self.teacher_stations
            .iter()
            .filter(|s| s.course_id == course_id)
            .collect()
    }
}
