use crate::model::Student;
use anyhow::Context;
use serde::Deserialize;
use std::path::Path;

pub const ROSTER_FILE: &str = "students.json";

#[derive(Debug, Deserialize)]
struct RosterFile {
    #[serde(default)]
    students: Vec<Student>,
}

/// Enrolled students. Registries only read from it.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    students: Vec<Student>,
}

impl Roster {
    pub fn from_students(students: Vec<Student>) -> Self {
        let mut roster = Roster::default();
        roster.replace(students);
        roster
    }

    /// Replaces the roster, keeping the first entry for a repeated (course, document) pair.
    pub fn replace(&mut self, students: Vec<Student>) -> usize {
        self.students.clear();
        for st in students {
            let dup = self
                .students
                .iter()
                .any(|s| s.course_id == st.course_id && s.document_id == st.document_id);
            if dup || st.document_id.trim().is_empty() {
                continue;
            }
            self.students.push(st);
        }
        self.students.len()
    }

    pub fn load_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read roster {}", path.to_string_lossy()))?;
        let parsed: RosterFile = serde_json::from_str(&text)
            .with_context(|| format!("roster {} is invalid JSON", path.to_string_lossy()))?;
        Ok(Roster::from_students(parsed.students))
    }

    pub fn all(&self) -> &[Student] {
        &self.students
    }

    pub fn students_for_course(&self, course_id: &str) -> Vec<&Student> {
        self.students
            .iter()
            .filter(|s| s.course_id == course_id)
            .collect()
    }

    pub fn find(&self, course_id: &str, document_id: &str) -> Option<&Student> {
        self.students
            .iter()
            .find(|s| s.course_id == course_id && s.document_id == document_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn st(doc: &str, course: &str) -> Student {
        Student {
            document_id: doc.into(),
            first_names: "Ana".into(),
            last_names: "Ruiz".into(),
            course_id: course.into(),
        }
    }

    #[test]
    fn duplicates_within_course_are_dropped() {
        let roster = Roster::from_students(vec![
            st("1", "101"),
            st("1", "101"),
            st("1", "102"),
            st("", "101"),
        ]);
        assert_eq!(roster.all().len(), 2);
        assert_eq!(roster.students_for_course("101").len(), 1);
        assert!(roster.find("102", "1").is_some());
        assert!(roster.find("103", "1").is_none());
    }

    #[test]
    fn roster_file_uses_camel_case() {
        let parsed: RosterFile = serde_json::from_str(
            r#"{"students":[{"documentId":"9","firstNames":"Luis","lastNames":"Paz","courseId":"101"}]}"#,
        )
        .expect("parse");
        assert_eq!(parsed.students[0].display_name(), "Luis Paz");
    }
}
