use crate::error::StoreError;
use crate::guard::{self, Verdict};
use crate::model::{
    Condition, ConditionCounts, Network, PeripheralConditions, Table, Workstation,
    WorkstationFields,
};
use crate::store::Store;
use serde::Serialize;
use uuid::Uuid;

pub const GRID_MAX_ROWS: u32 = 10;
pub const GRID_MAX_COLS: u32 = 6;
pub const GRID_MAX_PER_TABLE: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableStats {
    pub total: usize,
    pub assigned: usize,
    pub conditions: ConditionCounts,
}

pub fn workstation_serial(row: u32, col: u32, slot: u32) -> String {
    format!("PC{:02}{:02}{:02}", row + 1, col + 1, slot + 1)
}

pub(crate) fn check_dimension(name: &str, value: u32, max: u32) -> Result<(), StoreError> {
    if value < 1 || value > max {
        return Err(StoreError::validation(format!(
            "{} must be between 1 and {}",
            name, max
        )));
    }
    Ok(())
}

impl WorkstationFields {
    fn apply(&self, w: &mut Workstation) {
        if let Some(c) = self.condition {
            w.condition = c;
        }
        if let Some(c) = self.mouse {
            w.peripheral_conditions.mouse = c;
        }
        if let Some(c) = self.keyboard {
            w.peripheral_conditions.keyboard = c;
        }
        if let Some(c) = self.display {
            w.peripheral_conditions.display = c;
        }
        if let Some(n) = self.network {
            w.network = n;
        }
        if let Some(notes) = &self.notes {
            w.notes = notes.clone();
        }
    }
}

impl Table {
    pub fn stats(&self) -> TableStats {
        TableStats {
            total: self.workstations.len(),
            assigned: self
                .workstations
                .iter()
                .filter(|w| !w.assigned_student_id.is_empty())
                .count(),
            conditions: ConditionCounts::tally(self.workstations.iter().map(|w| w.condition)),
        }
    }
}

impl Store {
    /// Replaces every table of the course with a fresh `rows x cols` grid.
    ///
    /// Out-of-range dimensions reject the whole request; nothing is clamped.
    pub fn configure_grid(
        &mut self,
        rows: u32,
        cols: u32,
        per_table: u32,
        course_id: &str,
    ) -> Result<Vec<Table>, StoreError> {
        let course_id = course_id.trim();
        if course_id.is_empty() {
            return Err(StoreError::validation("courseId must not be empty"));
        }
        check_dimension("rows", rows, GRID_MAX_ROWS)?;
        check_dimension("cols", cols, GRID_MAX_COLS)?;
        check_dimension("perTable", per_table, GRID_MAX_PER_TABLE)?;

        self.tables.retain(|t| t.course_id != course_id);
        let mut created = Vec::with_capacity((rows * cols) as usize);
        for row in 0..rows {
            for col in 0..cols {
                let table_id = Uuid::new_v4().to_string();
                let workstations = (0..per_table)
                    .map(|slot| Workstation {
                        id: Uuid::new_v4().to_string(),
                        table_id: table_id.clone(),
                        serial: workstation_serial(row, col, slot),
                        assigned_student_id: String::new(),
                        assigned_student_name: String::new(),
                        condition: Condition::Excellent,
                        peripheral_conditions: PeripheralConditions::default(),
                        network: Network::Working,
                        notes: String::new(),
                    })
                    .collect();
                created.push(Table {
                    id: table_id,
                    course_id: course_id.to_string(),
                    row_index: row,
                    col_index: col,
                    workstations,
                });
            }
        }
        self.tables.extend(created.iter().cloned());
        tracing::info!(course_id, rows, cols, per_table, "configured workstation grid");
        Ok(created)
    }

    pub fn tables_for_course(&self, course_id: &str) -> Vec<&Table> {
        self.tables
            .iter()
            .filter(|t| t.course_id == course_id)
            .collect()
    }

    pub fn table(&self, table_id: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.id == table_id)
    }

    /// Document ids holding a workstation anywhere in the course.
    pub fn assigned_document_ids(&self, course_id: &str) -> Vec<String> {
        self.tables_for_course(course_id)
            .into_iter()
            .flat_map(|t| t.workstations.iter())
            .filter(|w| !w.assigned_student_id.is_empty())
            .map(|w| w.assigned_student_id.clone())
            .collect()
    }

    fn locate_slot(&self, table_id: &str, slot: usize) -> Result<usize, StoreError> {
        let idx = self
            .tables
            .iter()
            .position(|t| t.id == table_id)
            .ok_or_else(|| StoreError::not_found("table", table_id))?;
        if slot >= self.tables[idx].workstations.len() {
            return Err(StoreError::not_found(
                "workstation",
                format!("{}#{}", table_id, slot),
            ));
        }
        Ok(idx)
    }

    pub fn assign_workstation(
        &mut self,
        table_id: &str,
        slot: usize,
        student_id: &str,
        student_name: &str,
        fields: &WorkstationFields,
    ) -> Result<(), StoreError> {
        let idx = self.locate_slot(table_id, slot)?;
        let student_id = student_id.trim();
        let course_id = self.tables[idx].course_id.clone();
        let target_id = self.tables[idx].workstations[slot].id.clone();

        if let Verdict::Rejected { holder_id } =
            guard::can_assign_workstation(&self.tables, &course_id, student_id, &target_id)
        {
            tracing::warn!(table_id, slot, student_id, %holder_id, "workstation assignment rejected");
            return Err(StoreError::Conflict {
                kind: "workstation",
                student_id: student_id.to_string(),
                holder_id,
            });
        }

        let w = &mut self.tables[idx].workstations[slot];
        fields.apply(w);
        if student_id.is_empty() {
            w.assigned_student_id.clear();
            w.assigned_student_name.clear();
        } else {
            w.assigned_student_id = student_id.to_string();
            w.assigned_student_name = student_name.trim().to_string();
        }
        Ok(())
    }

    pub fn unassign_workstation(&mut self, table_id: &str, slot: usize) -> Result<(), StoreError> {
        let idx = self.locate_slot(table_id, slot)?;
        let w = &mut self.tables[idx].workstations[slot];
        w.assigned_student_id.clear();
        w.assigned_student_name.clear();
        Ok(())
    }

    pub fn update_workstation_fields(
        &mut self,
        table_id: &str,
        slot: usize,
        fields: &WorkstationFields,
    ) -> Result<(), StoreError> {
        let idx = self.locate_slot(table_id, slot)?;
        fields.apply(&mut self.tables[idx].workstations[slot]);
        Ok(())
    }
}
