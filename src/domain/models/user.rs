//! User records and their listing filters

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Listable;
use crate::shared::FieldValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Admin,
    Editor,
    Member,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Admin => "admin",
            UserType::Editor => "editor",
            UserType::Member => "member",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    /// Public identifier used by detail lookups.
    pub uuid: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub user_type: UserType,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        id: u64,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        user_type: UserType,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            uuid: Uuid::new_v4(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            user_type,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn deactivate(&mut self) {
        self.active = false;
        self.updated_at = Utc::now();
    }

    pub fn activate(&mut self) {
        self.active = true;
        self.updated_at = Utc::now();
    }
}

impl Listable for User {
    type Key = u64;

    fn entity() -> &'static str {
        "user"
    }

    fn key(&self) -> u64 {
        self.id
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "first_name" => Some(self.first_name.as_str().into()),
            "last_name" => Some(self.last_name.as_str().into()),
            "email" => Some(self.email.as_str().into()),
            "user_type" => Some(self.user_type.as_str().into()),
            "active" => Some(self.active.into()),
            "created_at" => Some(self.created_at.into()),
            "updated_at" => Some(self.updated_at.into()),
            _ => None,
        }
    }

    fn sortable_fields() -> &'static [&'static str] {
        &[
            "first_name",
            "last_name",
            "email",
            "created_at",
            "updated_at",
        ]
    }

    fn matches(&self, field: &str, value: &FieldValue) -> bool {
        if field == "search" {
            let FieldValue::Text(query) = value else {
                return false;
            };
            let query = query.to_lowercase();
            return query.is_empty()
                || self.first_name.to_lowercase().contains(&query)
                || self.last_name.to_lowercase().contains(&query)
                || self.email.to_lowercase().contains(&query);
        }
        self.field(field).is_some_and(|v| v == *value)
    }
}

/// Filter keys the team listing accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum UserFilter {
    Search(String),
    UserType(UserType),
    Active(bool),
}

impl From<UserFilter> for (String, FieldValue) {
    fn from(filter: UserFilter) -> Self {
        match filter {
            UserFilter::Search(q) => ("search".to_string(), FieldValue::Text(q)),
            UserFilter::UserType(t) => ("user_type".to_string(), FieldValue::Text(t.as_str().to_string())),
            UserFilter::Active(v) => ("active".to_string(), FieldValue::Boolean(v)),
        }
    }
}
