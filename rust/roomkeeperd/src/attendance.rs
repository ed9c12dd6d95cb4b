use crate::error::StoreError;
use crate::model::{AttendanceEntry, AttendanceRecord};
use crate::store::Store;
use chrono::NaiveDate;
use uuid::Uuid;

pub(crate) fn parse_date_key(date: &str) -> Result<String, StoreError> {
    let t = date.trim();
    NaiveDate::parse_from_str(t, "%Y-%m-%d")
        .map(|d| d.format("%Y-%m-%d").to_string())
        .map_err(|_| StoreError::validation("date must be YYYY-MM-DD"))
}

impl Store {
    /// One sheet per (course, date); saving again replaces the earlier sheet.
    pub fn save_attendance(
        &mut self,
        course_id: &str,
        date: &str,
        entries: Vec<AttendanceEntry>,
    ) -> Result<AttendanceRecord, StoreError> {
        let course_id = course_id.trim();
        if course_id.is_empty() {
            return Err(StoreError::validation("courseId must not be empty"));
        }
        let date = parse_date_key(date)?;
        let record = AttendanceRecord {
            id: Uuid::new_v4().to_string(),
            course_id: course_id.to_string(),
            date: date.clone(),
            entries,
            recorded_at: chrono::Utc::now().to_rfc3339(),
        };
        match self
            .attendance
            .iter_mut()
            .find(|a| a.course_id == course_id && a.date == date)
        {
            Some(existing) => *existing = record.clone(),
            None => self.attendance.push(record.clone()),
        }
        Ok(record)
    }

    pub fn get_attendance(&self, course_id: &str, date: &str) -> Result<Option<&AttendanceRecord>, StoreError> {
        let date = parse_date_key(date)?;
        Ok(self
            .attendance
            .iter()
            .find(|a| a.course_id == course_id && a.date == date))
    }

    /// Sheets of the course, oldest date first.
    pub fn list_attendance(&self, course_id: &str) -> Vec<&AttendanceRecord> {
        let mut out: Vec<&AttendanceRecord> = self
            .attendance
            .iter()
            .filter(|a| a.course_id == course_id)
            .collect();
        out.sort_by(|a, b| a.date.cmp(&b.date));
        out
    }
}
