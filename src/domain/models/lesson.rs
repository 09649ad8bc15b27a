//! Lesson records and their listing filters
//!
//! Lessons carry an archive flag instead of being hard-deleted; the archived
//! listing drives the restore/delete workflow.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::Listable;
use crate::shared::FieldValue;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: u64,
    pub name: String,
    pub content: String,
    pub course_name: String,
    pub archived: bool,
    /// User who last touched the record (shown as "deactivated by" in the
    /// archived listing).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Lesson {
    pub fn new(id: u64, name: impl Into<String>, course_name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: name.into(),
            content: String::new(),
            course_name: course_name.into(),
            archived: false,
            updated_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn archive(&mut self, by: impl Into<String>) {
        self.archived = true;
        self.updated_by = Some(by.into());
        self.touch();
    }

    pub fn restore(&mut self, by: impl Into<String>) {
        self.archived = false;
        self.updated_by = Some(by.into());
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Listable for Lesson {
    type Key = u64;

    fn entity() -> &'static str {
        "lesson"
    }

    fn key(&self) -> u64 {
        self.id
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "name" => Some(self.name.as_str().into()),
            "course_name" => Some(self.course_name.as_str().into()),
            "archived" => Some(self.archived.into()),
            "created_at" => Some(self.created_at.into()),
            "updated_at" => Some(self.updated_at.into()),
            _ => None,
        }
    }

    fn sortable_fields() -> &'static [&'static str] {
        &["name", "course_name", "created_at", "updated_at"]
    }

    fn matches(&self, field: &str, value: &FieldValue) -> bool {
        if field == "search" {
            let FieldValue::Text(query) = value else {
                return false;
            };
            let query = query.to_lowercase();
            return query.is_empty()
                || self.name.to_lowercase().contains(&query)
                || self.course_name.to_lowercase().contains(&query);
        }
        self.field(field).is_some_and(|v| v == *value)
    }
}

/// Filter keys the lesson listings accept.
#[derive(Debug, Clone, PartialEq)]
pub enum LessonFilter {
    Search(String),
    Archived(bool),
    Course(String),
}

impl From<LessonFilter> for (String, FieldValue) {
    fn from(filter: LessonFilter) -> Self {
        match filter {
            LessonFilter::Search(q) => ("search".to_string(), FieldValue::Text(q)),
            LessonFilter::Archived(v) => ("archived".to_string(), FieldValue::Boolean(v)),
            LessonFilter::Course(name) => ("course_name".to_string(), FieldValue::Text(name)),
        }
    }
}
