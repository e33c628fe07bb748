use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Project {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub created_at: DateTime<Utc>,
}

/// Closed project lifecycle. Status strings from clients are validated
/// against this enum at the request boundary, never stored verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "project_status", rename_all = "snake_case")]
pub enum ProjectStatus {
    Active,
    Completed,
}

impl ProjectStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "active" => Some(ProjectStatus::Active),
            "completed" => Some(ProjectStatus::Completed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Active => "active",
            ProjectStatus::Completed => "completed",
        }
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_values_only() {
        assert_eq!(ProjectStatus::parse("active"), Some(ProjectStatus::Active));
        assert_eq!(ProjectStatus::parse(" completed "), Some(ProjectStatus::Completed));
        assert_eq!(ProjectStatus::parse("archived"), None);
        assert_eq!(ProjectStatus::parse(""), None);
    }

    #[test]
    fn serializes_as_snake_case() {
        let json = serde_json::to_string(&ProjectStatus::Completed).unwrap();
        assert_eq!(json, "\"completed\"");
    }
}
