use crate::error::StoreError;
use crate::guard::{self, Verdict};
use crate::model::{Condition, ConditionCounts, Seat, Student};
use crate::roster::Roster;
use crate::store::Store;
use crate::workstations::check_dimension;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatStats {
    pub total: usize,
    pub occupied: usize,
    pub available: usize,
    pub conditions: ConditionCounts,
}

pub const SEATS_MAX_PER_COURSE: u32 = 100;

pub fn seat_serial(course_id: &str, number: u32) -> String {
    format!("SEAT-{}-{:03}", course_id, number)
}

impl Store {
    /// Replaces every seat of the course with `count` fresh, unassigned seats.
    pub fn configure_seats(&mut self, count: u32, course_id: &str) -> Result<Vec<Seat>, StoreError> {
        let course_id = course_id.trim();
        if course_id.is_empty() {
            return Err(StoreError::validation("courseId must not be empty"));
        }
        check_dimension("count", count, SEATS_MAX_PER_COURSE)?;

        self.seats.retain(|s| s.course_id != course_id);
        let created: Vec<Seat> = (1..=count)
            .map(|number| Seat {
                id: Uuid::new_v4().to_string(),
                course_id: course_id.to_string(),
                number,
                serial: seat_serial(course_id, number),
                assigned_student_id: String::new(),
                assigned_student_name: String::new(),
                condition: Condition::Good,
                notes: String::new(),
            })
            .collect();
        self.seats.extend(created.iter().cloned());
        tracing::info!(course_id, count, "configured seats");
        Ok(created)
    }

    pub fn seats_for_course(&self, course_id: &str) -> Vec<&Seat> {
        self.seats
            .iter()
            .filter(|s| s.course_id == course_id)
            .collect()
    }

    pub fn seat(&self, seat_id: &str) -> Option<&Seat> {
        self.seats.iter().find(|s| s.id == seat_id)
    }

    pub fn assign_seat(
        &mut self,
        seat_id: &str,
        student_id: &str,
        student_name: &str,
    ) -> Result<(), StoreError> {
        let idx = self
            .seats
            .iter()
            .position(|s| s.id == seat_id)
            .ok_or_else(|| StoreError::not_found("seat", seat_id))?;
        let student_id = student_id.trim();
        let course_id = self.seats[idx].course_id.clone();

        if let Verdict::Rejected { holder_id } =
            guard::can_assign_seat(&self.seats, &course_id, student_id, seat_id)
        {
            tracing::warn!(seat_id, student_id, %holder_id, "seat assignment rejected");
            return Err(StoreError::Conflict {
                kind: "seat",
                student_id: student_id.to_string(),
                holder_id,
            });
        }

        let seat = &mut self.seats[idx];
        if student_id.is_empty() {
            seat.assigned_student_id.clear();
            seat.assigned_student_name.clear();
        } else {
            seat.assigned_student_id = student_id.to_string();
            seat.assigned_student_name = student_name.trim().to_string();
        }
        Ok(())
    }

    pub fn unassign_seat(&mut self, seat_id: &str) -> Result<(), StoreError> {
        let seat = self
            .seats
            .iter_mut()
            .find(|s| s.id == seat_id)
            .ok_or_else(|| StoreError::not_found("seat", seat_id))?;
        seat.assigned_student_id.clear();
        seat.assigned_student_name.clear();
        Ok(())
    }

    pub fn update_seat_condition(
        &mut self,
        seat_id: &str,
        condition: Condition,
        notes: &str,
    ) -> Result<(), StoreError> {
        let seat = self
            .seats
            .iter_mut()
            .find(|s| s.id == seat_id)
            .ok_or_else(|| StoreError::not_found("seat", seat_id))?;
        seat.condition = condition;
        seat.notes = notes.to_string();
        Ok(())
    }

    pub fn seat_stats(&self, course_id: &str) -> SeatStats {
        let seats = self.seats_for_course(course_id);
        let occupied = seats
            .iter()
            .filter(|s| !s.assigned_student_id.is_empty())
            .count();
        SeatStats {
            total: seats.len(),
            occupied,
            available: seats.len() - occupied,
            conditions: ConditionCounts::tally(seats.iter().map(|s| s.condition)),
        }
    }

    pub fn students_without_seat<'r>(&self, roster: &'r Roster, course_id: &str) -> Vec<&'r Student> {
        roster
            .students_for_course(course_id)
            .into_iter()
            .filter(|st| {
                !self.seats.iter().any(|s| {
                    s.course_id == course_id && s.assigned_student_id == st.document_id
                })
            })
            .collect()
    }

    /// Pairs unseated students with free seats in seat order. Returns how many were placed.
    pub fn auto_assign_seats(&mut self, roster: &Roster, course_id: &str) -> Result<usize, StoreError> {
        if self.seats_for_course(course_id).is_empty() {
            return Err(StoreError::validation("no seats configured for course"));
        }
        let students: Vec<(String, String)> = self
            .students_without_seat(roster, course_id)
            .into_iter()
            .map(|st| (st.document_id.clone(), st.display_name()))
            .collect();
        let free: Vec<String> = self
            .seats_for_course(course_id)
            .into_iter()
            .filter(|s| s.assigned_student_id.is_empty())
            .map(|s| s.id.clone())
            .collect();

        let mut placed = 0;
        for (seat_id, (student_id, name)) in free.iter().zip(students.iter()) {
            if self.assign_seat(seat_id, student_id, name).is_ok() {
                placed += 1;
            }
        }
        tracing::info!(course_id, placed, "auto-assigned seats");
        Ok(placed)
    }
}
