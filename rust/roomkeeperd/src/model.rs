use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Condition {
    Excellent,
    #[default]
    Good,
    Fair,
    Poor,
}

impl Condition {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "excellent" => Some(Condition::Excellent),
            "good" => Some(Condition::Good),
            "fair" => Some(Condition::Fair),
            "poor" => Some(Condition::Poor),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Network {
    #[default]
    Working,
    Slow,
    Down,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub document_id: String,
    pub first_names: String,
    pub last_names: String,
    pub course_id: String,
}

impl Student {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_names, self.last_names)
            .trim()
            .to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seat {
    pub id: String,
    pub course_id: String,
    pub number: u32,
    pub serial: String,
    #[serde(default)]
    pub assigned_student_id: String,
    #[serde(default)]
    pub assigned_student_name: String,
    #[serde(default)]
    pub condition: Condition,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PeripheralConditions {
    pub mouse: Condition,
    pub keyboard: Condition,
    pub display: Condition,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workstation {
    pub id: String,
    pub table_id: String,
    pub serial: String,
    #[serde(default)]
    pub assigned_student_id: String,
    #[serde(default)]
    pub assigned_student_name: String,
    #[serde(default)]
    pub condition: Condition,
    #[serde(default)]
    pub peripheral_conditions: PeripheralConditions,
    #[serde(default)]
    pub network: Network,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub id: String,
    pub course_id: String,
    pub row_index: u32,
    pub col_index: u32,
    #[serde(default)]
    pub workstations: Vec<Workstation>,
}

/// Optional per-field updates merged into a workstation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkstationFields {
    pub condition: Option<Condition>,
    pub mouse: Option<Condition>,
    pub keyboard: Option<Condition>,
    pub display: Option<Condition>,
    pub network: Option<Network>,
    pub notes: Option<String>,
}

/// Staff member in charge of a course's room for one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supervisor {
    pub id: String,
    pub course_id: String,
    pub name: String,
    #[serde(default)]
    pub document_id: String,
    pub room: String,
    pub date: String,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    #[serde(default)]
    pub equipment_condition: Condition,
    #[serde(default)]
    pub cleanliness: Condition,
    #[serde(default)]
    pub notes: String,
    pub registered_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupervisorFields {
    pub course_id: Option<String>,
    pub name: Option<String>,
    pub document_id: Option<String>,
    pub room: Option<String>,
    pub date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub equipment_condition: Option<Condition>,
    pub cleanliness: Option<Condition>,
    pub notes: Option<String>,
}

/// The instructor's own computer. Never part of the student assignment rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherStation {
    pub id: String,
    pub course_id: String,
    #[serde(default)]
    pub teacher_name: String,
    #[serde(default)]
    pub teacher_document_id: String,
    pub serial: String,
    #[serde(default)]
    pub condition: Condition,
    #[serde(default)]
    pub peripheral_conditions: PeripheralConditions,
    #[serde(default)]
    pub network: Network,
    #[serde(default)]
    pub cleanliness: Condition,
    #[serde(default)]
    pub notes: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherStationInput {
    #[serde(default)]
    pub course_id: String,
    #[serde(default)]
    pub teacher_name: String,
    #[serde(default)]
    pub teacher_document_id: String,
    #[serde(default)]
    pub serial: String,
    pub cleanliness: Option<Condition>,
    #[serde(flatten)]
    pub fields: WorkstationFields,
}

/// Audio-visual equipment kept in the room (projector, speakers, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Equipment {
    pub id: String,
    pub kind: String,
    pub serial: String,
    #[serde(default)]
    pub condition: Condition,
    #[serde(default)]
    pub cleanliness: Condition,
    #[serde(default)]
    pub notes: String,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentFields {
    pub kind: Option<String>,
    pub serial: Option<String>,
    pub condition: Option<Condition>,
    pub cleanliness: Option<Condition>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceEntry {
    pub document_id: String,
    pub present: bool,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: String,
    pub course_id: String,
    pub date: String,
    #[serde(default)]
    pub entries: Vec<AttendanceEntry>,
    pub recorded_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ConditionCounts {
    pub excellent: usize,
    pub good: usize,
    pub fair: usize,
    pub poor: usize,
}

impl ConditionCounts {
    pub fn tally<I>(conditions: I) -> Self
    where
        I: IntoIterator<Item = Condition>,
    {
        let mut counts = ConditionCounts::default();
        for c in conditions {
            match c {
                Condition::Excellent => counts.excellent += 1,
                Condition::Good => counts.good += 1,
                Condition::Fair => counts.fair += 1,
                Condition::Poor => counts.poor += 1,
            }
        }
        counts
    }
}
