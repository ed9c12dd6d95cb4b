//! Assignment guard: a student holds at most one record of each kind per course.
//!
//! Callers pass only the records that belong to the course being checked.
//! Registries call the guard inside the same mutable borrow that applies the
//! assignment, so the scan never runs on a stale view of the collection.

use crate::model::{Seat, Table, Workstation};

pub trait Assignable {
    fn record_id(&self) -> &str;
    fn assigned_student_id(&self) -> &str;
}

impl Assignable for Seat {
    fn record_id(&self) -> &str {
        &self.id
    }
    fn assigned_student_id(&self) -> &str {
        &self.assigned_student_id
    }
}

impl Assignable for Workstation {
    fn record_id(&self) -> &str {
        &self.id
    }
    fn assigned_student_id(&self) -> &str {
        &self.assigned_student_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Permitted,
    Rejected { holder_id: String },
}

pub fn can_assign<'a, R, I>(student_id: &str, target_id: &str, records: I) -> Verdict
where
    R: Assignable + 'a,
    I: IntoIterator<Item = &'a R>,
{
    if student_id.is_empty() {
        return Verdict::Permitted;
    }
    records
        .into_iter()
        .find(|r| r.assigned_student_id() == student_id && r.record_id() != target_id)
        .map(|r| Verdict::Rejected {
            holder_id: r.record_id().to_string(),
        })
        .unwrap_or(Verdict::Permitted)
}

pub fn can_assign_seat(seats: &[Seat], course_id: &str, student_id: &str, target_id: &str) -> Verdict {
    can_assign(
        student_id,
        target_id,
        seats.iter().filter(|s| s.course_id == course_id),
    )
}

pub fn can_assign_workstation(
    tables: &[Table],
    course_id: &str,
    student_id: &str,
    target_id: &str,
) -> Verdict {
    can_assign(
        student_id,
        target_id,
        tables
            .iter()
            .filter(|t| t.course_id == course_id)
            .flat_map(|t| t.workstations.iter()),
    )
}
