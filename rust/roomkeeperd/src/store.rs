use crate::error::StoreError;
use crate::model::{AttendanceRecord, Equipment, Seat, Supervisor, Table, TeacherStation};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const STATE_FORMAT_V1: &str = "roomkeeper-state-v1";

/// Full-state JSON blob: the persisted shape and the import/export contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateBlob {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub exported_at: String,
    #[serde(default)]
    pub seats: Vec<Seat>,
    #[serde(default)]
    pub tables: Vec<Table>,
    #[serde(default)]
    pub attendance: Vec<AttendanceRecord>,
    #[serde(default)]
    pub supervisors: Vec<Supervisor>,
    #[serde(default)]
    pub teacher_stations: Vec<TeacherStation>,
    #[serde(default)]
    pub equipment: Vec<Equipment>,
}

fn default_version() -> String {
    STATE_FORMAT_V1.to_string()
}

/// In-memory source of truth for one running session.
///
/// Registries are `impl Store` blocks in their own modules; only `seats`
/// and `workstations` write assignment fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Store {
    pub(crate) seats: Vec<Seat>,
    pub(crate) tables: Vec<Table>,
    pub(crate) attendance: Vec<AttendanceRecord>,
    pub(crate) supervisors: Vec<Supervisor>,
    pub(crate) teacher_stations: Vec<TeacherStation>,
    pub(crate) equipment: Vec<Equipment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseSummary {
    pub seat_count: usize,
    pub seats_assigned: usize,
    pub table_count: usize,
    pub workstation_count: usize,
    pub workstations_assigned: usize,
    pub attendance_days: usize,
    pub supervisor_count: usize,
    pub teacher_station_count: usize,
}

/// Record counts dropped by `Store::clear_all`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearedCounts {
    pub seats: usize,
    pub tables: usize,
    pub attendance: usize,
    pub supervisors: usize,
    pub teacher_stations: usize,
    pub equipment: usize,
}

fn check_unique_ids<'a, I>(kind: &str, ids: I) -> Result<(), StoreError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen: HashSet<&str> = HashSet::new();
    for id in ids {
        if id.is_empty() {
            return Err(StoreError::validation(format!("{} with empty id", kind)));
        }
        if !seen.insert(id) {
            return Err(StoreError::validation(format!("duplicate {} id: {}", kind, id)));
        }
    }
    Ok(())
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn attendance(&self) -> &[AttendanceRecord] {
        &self.attendance
    }

    pub fn supervisors(&self) -> &[Supervisor] {
        &self.supervisors
    }

    pub fn teacher_stations(&self) -> &[TeacherStation] {
        &self.teacher_stations
    }

    pub fn equipment(&self) -> &[Equipment] {
        &self.equipment
    }

    pub fn to_blob(&self) -> StateBlob {
        StateBlob {
            version: STATE_FORMAT_V1.to_string(),
            exported_at: chrono::Utc::now().to_rfc3339(),
            seats: self.seats.clone(),
            tables: self.tables.clone(),
            attendance: self.attendance.clone(),
            supervisors: self.supervisors.clone(),
            teacher_stations: self.teacher_stations.clone(),
            equipment: self.equipment.clone(),
        }
    }

    pub fn from_blob(blob: StateBlob) -> Result<Self, StoreError> {
        if blob.version != STATE_FORMAT_V1 {
            return Err(StoreError::validation(format!(
                "unsupported state format: {}",
                blob.version
            )));
        }
        let store = Store {
            seats: blob.seats,
            tables: blob.tables,
            attendance: blob.attendance,
            supervisors: blob.supervisors,
            teacher_stations: blob.teacher_stations,
            equipment: blob.equipment,
        };
        store.check_ids()?;
        store.check_assignments()?;
        Ok(store)
    }

    /// Record ids must be non-empty and unique per kind, and every workstation
    /// must point back at the table that holds it. Lookups and the guard key on ids.
    fn check_ids(&self) -> Result<(), StoreError> {
        check_unique_ids("seat", self.seats.iter().map(|s| s.id.as_str()))?;
        check_unique_ids("table", self.tables.iter().map(|t| t.id.as_str()))?;
        check_unique_ids(
            "workstation",
            self.tables
                .iter()
                .flat_map(|t| t.workstations.iter())
                .map(|w| w.id.as_str()),
        )?;
        for t in &self.tables {
            if let Some(w) = t.workstations.iter().find(|w| w.table_id != t.id) {
                return Err(StoreError::validation(format!(
                    "workstation {} lists table {} but sits in table {}",
                    w.id, w.table_id, t.id
                )));
            }
        }
        check_unique_ids("supervisor", self.supervisors.iter().map(|s| s.id.as_str()))?;
        check_unique_ids(
            "teacher station",
            self.teacher_stations.iter().map(|s| s.id.as_str()),
        )?;
        check_unique_ids("equipment", self.equipment.iter().map(|e| e.id.as_str()))?;
        Ok(())
    }

    /// Rejects state where a student holds two records of one kind in a course.
    fn check_assignments(&self) -> Result<(), StoreError> {
        let mut seen: HashSet<(&str, &str)> = HashSet::new();
        for s in self.seats.iter().filter(|s| !s.assigned_student_id.is_empty()) {
            if !seen.insert((s.course_id.as_str(), s.assigned_student_id.as_str())) {
                return Err(StoreError::validation(format!(
                    "student {} holds more than one seat in course {}",
                    s.assigned_student_id, s.course_id
                )));
            }
        }
        seen.clear();
        for t in &self.tables {
            for w in t
                .workstations
                .iter()
                .filter(|w| !w.assigned_student_id.is_empty())
            {
                if !seen.insert((t.course_id.as_str(), w.assigned_student_id.as_str())) {
                    return Err(StoreError::validation(format!(
                        "student {} holds more than one workstation in course {}",
                        w.assigned_student_id, t.course_id
                    )));
                }
            }
        }
        Ok(())
    }

    /// Drops every seat and table of the course. Attendance is kept.
    pub fn clear_course(&mut self, course_id: &str) -> (usize, usize) {
        let seats_before = self.seats.len();
        let tables_before = self.tables.len();
        self.seats.retain(|s| s.course_id != course_id);
        self.tables.retain(|t| t.course_id != course_id);
        (
            seats_before - self.seats.len(),
            tables_before - self.tables.len(),
        )
    }

    /// Empties every registry. The roster lives outside the store and is kept.
    pub fn clear_all(&mut self) -> ClearedCounts {
        let cleared = ClearedCounts {
            seats: self.seats.len(),
            tables: self.tables.len(),
            attendance: self.attendance.len(),
            supervisors: self.supervisors.len(),
            teacher_stations: self.teacher_stations.len(),
            equipment: self.equipment.len(),
        };
        *self = Store::new();
        cleared
    }

    pub fn course_summary(&self, course_id: &str) -> CourseSummary {
        let seats: Vec<&Seat> = self
            .seats
            .iter()
            .filter(|s| s.course_id == course_id)
            .collect();
        let tables: Vec<&Table> = self
            .tables
            .iter()
            .filter(|t| t.course_id == course_id)
            .collect();
        let workstations = tables.iter().flat_map(|t| t.workstations.iter());
        CourseSummary {
            seat_count: seats.len(),
            seats_assigned: seats
                .iter()
                .filter(|s| !s.assigned_student_id.is_empty())
                .count(),
            table_count: tables.len(),
            workstation_count: workstations.clone().count(),
            workstations_assigned: workstations
                .filter(|w| !w.assigned_student_id.is_empty())
                .count(),
            attendance_days: self
                .attendance
                .iter()
                .filter(|a| a.course_id == course_id)
                .count(),
            supervisor_count: self
                .supervisors
                .iter()
                .filter(|s| s.course_id == course_id)
                .count(),
            teacher_station_count: self
                .teacher_stations
                .iter()
                .filter(|s| s.course_id == course_id)
                .count(),
        }
    }

    /// True when any seat or table belongs to a course other than `course_id`.
    pub fn has_other_course_data(&self, course_id: &str) -> bool {
        self.seats.iter().any(|s| s.course_id != course_id)
            || self.tables.iter().any(|t| t.course_id != course_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EquipmentFields, SupervisorFields, TeacherStationInput, WorkstationFields};
    use proptest::prelude::*;
    use std::collections::HashMap;

    fn supervisor_fields() -> SupervisorFields {
        SupervisorFields {
            course_id: Some("101".into()),
            name: Some("Marta Leal".into()),
            room: Some("Lab 3".into()),
            date: Some("2026-03-02".into()),
            ..SupervisorFields::default()
        }
    }

    fn populated() -> Store {
        let mut store = Store::new();
        store.configure_seats(2, "101").expect("seats");
        store.configure_grid(1, 2, 2, "101").expect("grid");
        store.add_supervisor(&supervisor_fields()).expect("supervisor");
        store
            .add_teacher_station(&TeacherStationInput {
                course_id: "101".into(),
                serial: "DOC-01".into(),
                ..TeacherStationInput::default()
            })
            .expect("station");
        store
            .add_equipment(&EquipmentFields {
                kind: Some("Projector".into()),
                serial: Some("PJ-204".into()),
                ..EquipmentFields::default()
            })
            .expect("equipment");
        store
    }

    #[test]
    fn export_then_import_reproduces_registries() {
        let mut store = Store::new();
        store.configure_seats(4, "101").expect("seats");
        store.configure_grid(2, 2, 2, "101").expect("grid");
        let seat_id = store.seats()[1].id.clone();
        store.assign_seat(&seat_id, "S1", "Ana Ruiz").expect("assign seat");
        let table_id = store.tables()[0].id.clone();
        store
            .assign_workstation(&table_id, 1, "S1", "Ana Ruiz", &WorkstationFields::default())
            .expect("assign pc");

        let blob = store.to_blob();
        let text = serde_json::to_string(&blob).expect("serialize");
        let parsed: StateBlob = serde_json::from_str(&text).expect("parse");
        let restored = Store::from_blob(parsed).expect("import");
        assert_eq!(restored, store);
    }

    #[test]
    fn import_rejects_double_assignment() {
        let mut store = Store::new();
        store.configure_seats(2, "101").expect("seats");
        let mut blob = store.to_blob();
        for s in &mut blob.seats {
            s.assigned_student_id = "S1".into();
        }
        assert!(matches!(
            Store::from_blob(blob),
            Err(StoreError::Validation(_))
        ));
    }

    #[test]
    fn round_trip_keeps_staff_and_equipment() {
        let store = populated();
        let text = serde_json::to_string(&store.to_blob()).expect("serialize");
        let restored = Store::from_blob(serde_json::from_str(&text).expect("parse")).expect("import");
        assert_eq!(restored, store);
        assert_eq!(restored.supervisors().len(), 1);
        assert_eq!(restored.teacher_stations().len(), 1);
        assert_eq!(restored.equipment().len(), 1);
    }

    #[test]
    fn import_rejects_repeated_seat_id() {
        let mut store = Store::new();
        store.configure_seats(2, "101").expect("seats");
        let mut blob = store.to_blob();
        blob.seats[1].id = blob.seats[0].id.clone();
        blob.seats[1].assigned_student_id = "S1".into();
        assert!(matches!(
            Store::from_blob(blob),
            Err(StoreError::Validation(_))
        ));
    }

    #[test]
    fn accepted_import_cannot_be_used_to_double_seat() {
        let mut store = Store::new();
        let seats = store.configure_seats(2, "101").expect("seats");
        store.assign_seat(&seats[1].id, "S1", "Ana").expect("assign");
        let mut restored = Store::from_blob(store.to_blob()).expect("import");
        assert!(restored.assign_seat(&seats[0].id, "S1", "Ana").is_err());
        let holders = restored
            .seats_for_course("101")
            .iter()
            .filter(|s| s.assigned_student_id == "S1")
            .count();
        assert_eq!(holders, 1);
    }

    #[test]
    fn import_rejects_repeated_workstation_and_table_ids() {
        let store = populated();

        let mut dup_pc = store.to_blob();
        let first = dup_pc.tables[0].workstations[0].id.clone();
        dup_pc.tables[1].workstations[0].id = first;
        assert!(Store::from_blob(dup_pc).is_err());

        let mut dup_table = store.to_blob();
        let first_table = dup_table.tables[0].id.clone();
        dup_table.tables[1].id = first_table.clone();
        for w in &mut dup_table.tables[1].workstations {
            w.table_id = first_table.clone();
        }
        assert!(Store::from_blob(dup_table).is_err());

        let mut empty_seat = store.to_blob();
        empty_seat.seats[0].id.clear();
        assert!(Store::from_blob(empty_seat).is_err());

        let mut dup_equipment = store.to_blob();
        let item = dup_equipment.equipment[0].clone();
        dup_equipment.equipment.push(item);
        assert!(Store::from_blob(dup_equipment).is_err());
    }

    #[test]
    fn import_rejects_workstation_filed_under_wrong_table() {
        let store = populated();
        let mut blob = store.to_blob();
        let other = blob.tables[1].id.clone();
        blob.tables[0].workstations[1].table_id = other;
        assert!(matches!(
            Store::from_blob(blob),
            Err(StoreError::Validation(_))
        ));
    }

    #[test]
    fn clear_all_empties_every_registry() {
        let mut store = populated();
        store
            .save_attendance("101", "2026-03-02", Vec::new())
            .expect("attendance");
        let cleared = store.clear_all();
        assert_eq!(cleared.seats, 2);
        assert_eq!(cleared.tables, 2);
        assert_eq!(cleared.attendance, 1);
        assert_eq!(cleared.supervisors, 1);
        assert_eq!(cleared.teacher_stations, 1);
        assert_eq!(cleared.equipment, 1);
        assert_eq!(store, Store::new());
    }

    #[test]
    fn import_rejects_unknown_format() {
        let mut blob = Store::new().to_blob();
        blob.version = "something-else".into();
        assert!(Store::from_blob(blob).is_err());
    }

    #[test]
    fn clear_course_leaves_other_courses() {
        let mut store = Store::new();
        store.configure_seats(3, "101").expect("seats 101");
        store.configure_seats(2, "102").expect("seats 102");
        store.configure_grid(1, 1, 1, "101").expect("grid");
        assert_eq!(store.clear_course("101"), (3, 1));
        assert_eq!(store.seats().len(), 2);
        assert!(store.tables().is_empty());
        assert!(store.has_other_course_data("101"));
    }

    const STUDENTS: [&str; 4] = ["", "S1", "S2", "S3"];

    #[derive(Debug, Clone)]
    enum Op {
        AssignSeat { seat: usize, student: usize },
        UnassignSeat { seat: usize },
        AssignPc { table: usize, slot: usize, student: usize },
        UnassignPc { table: usize, slot: usize },
    }

    fn arb_op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0..5usize, 0..4usize).prop_map(|(seat, student)| Op::AssignSeat { seat, student }),
            (0..5usize).prop_map(|seat| Op::UnassignSeat { seat }),
            (0..3usize, 0..3usize, 0..4usize)
                .prop_map(|(table, slot, student)| Op::AssignPc { table, slot, student }),
            (0..3usize, 0..3usize).prop_map(|(table, slot)| Op::UnassignPc { table, slot }),
        ]
    }

    /// Largest number of same-kind records one student holds in one course.
    fn most_held(store: &Store) -> usize {
        let mut counts: HashMap<(&str, &str, &str), usize> = HashMap::new();
        for s in store.seats().iter().filter(|s| !s.assigned_student_id.is_empty()) {
            *counts
                .entry(("seat", s.course_id.as_str(), s.assigned_student_id.as_str()))
                .or_default() += 1;
        }
        for t in store.tables() {
            for w in t.workstations.iter().filter(|w| !w.assigned_student_id.is_empty()) {
                *counts
                    .entry(("workstation", t.course_id.as_str(), w.assigned_student_id.as_str()))
                    .or_default() += 1;
            }
        }
        counts.values().copied().max().unwrap_or(0)
    }

    proptest! {
        #[test]
        fn no_double_assignment_after_any_sequence(ops in prop::collection::vec(arb_op(), 1..60)) {
            let mut store = Store::new();
            let mut seats: Vec<String> = Vec::new();
            for (course, count) in [("101", 3), ("102", 2)] {
                seats.extend(store.configure_seats(count, course).expect("seats").into_iter().map(|s| s.id));
            }
            let mut tables: Vec<String> = Vec::new();
            for (course, cols) in [("101", 2), ("102", 1)] {
                tables.extend(store.configure_grid(1, cols, 2, course).expect("grid").into_iter().map(|t| t.id));
            }

            for op in ops {
                let before = store.clone();
                let result = match &op {
                    Op::AssignSeat { seat, student } => {
                        store.assign_seat(&seats[*seat], STUDENTS[*student], "Student")
                    }
                    Op::UnassignSeat { seat } => store.unassign_seat(&seats[*seat]),
                    Op::AssignPc { table, slot, student } => store.assign_workstation(
                        &tables[*table],
                        *slot,
                        STUDENTS[*student],
                        "Student",
                        &WorkstationFields::default(),
                    ),
                    Op::UnassignPc { table, slot } => store.unassign_workstation(&tables[*table], *slot),
                };
                if result.is_err() {
                    prop_assert_eq!(&store, &before);
                }
                prop_assert!(most_held(&store) <= 1, "{:?} left a student holding two records", op);
            }
        }
    }
}
