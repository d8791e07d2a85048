use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use mongodb::{Collection, bson::doc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use uuid::Uuid;

use crate::BugStoreError;

pub const TITLE_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MAX_CHARS: usize = 1000;

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, EnumString, Display, Default,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum BugStatus {
    #[default]
    Open,
    InProgress,
    Resolved,
}

impl BugStatus {
    pub const ALL: [BugStatus; 3] = [BugStatus::Open, BugStatus::InProgress, BugStatus::Resolved];
}

/// A tracked bug. Stored verbatim in the collection; `id` is assigned on
/// creation and never changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Bug {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: BugStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBug {
    pub title: String,
    pub description: String,
    pub status: Option<BugStatus>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateBug {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<BugStatus>,
}

/// Trim `value` and reject it when empty or longer than `max` characters.
fn validated_text(field: &str, value: &str, max: usize) -> Result<String, BugStoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(BugStoreError::Validation(format!("{field} is required")));
    }
    if trimmed.chars().count() > max {
        return Err(BugStoreError::Validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(trimmed.to_string())
}

impl Bug {
    /// All bugs, newest-created first.
    pub async fn find_all(bugs: &Collection<Bug>) -> Result<Vec<Self>, BugStoreError> {
        let cursor = bugs.find(doc! {}).await?;
        let mut records: Vec<Bug> = cursor.try_collect().await?;
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    pub async fn find_by_id(bugs: &Collection<Bug>, id: Uuid) -> Result<Option<Self>, BugStoreError> {
        Ok(bugs.find_one(doc! { "id": id.to_string() }).await?)
    }

    /// Validate and insert a new bug. The store assigns the id and both
    /// timestamps.
    pub async fn create(bugs: &Collection<Bug>, data: &CreateBug) -> Result<Self, BugStoreError> {
        let title = validated_text("title", &data.title, TITLE_MAX_CHARS)?;
        let description = validated_text("description", &data.description, DESCRIPTION_MAX_CHARS)?;

        let now = Utc::now();
        let bug = Bug {
            id: Uuid::new_v4(),
            title,
            description,
            status: data.status.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };
        bugs.insert_one(&bug).await?;
        Ok(bug)
    }

    /// Apply any provided subset of fields to an existing bug. Last write
    /// wins; `updated_at` is refreshed on every accepted mutation.
    pub async fn update(
        bugs: &Collection<Bug>,
        id: Uuid,
        data: &UpdateBug,
    ) -> Result<Self, BugStoreError> {
        let mut bug = Self::find_by_id(bugs, id)
            .await?
            .ok_or(BugStoreError::NotFound(id))?;

        if let Some(title) = &data.title {
            bug.title = validated_text("title", title, TITLE_MAX_CHARS)?;
        }
        if let Some(description) = &data.description {
            bug.description = validated_text("description", description, DESCRIPTION_MAX_CHARS)?;
        }
        if let Some(status) = data.status {
            bug.status = status;
        }
        bug.updated_at = Utc::now();

        bugs.replace_one(doc! { "id": id.to_string() }, &bug).await?;
        Ok(bug)
    }

    pub async fn delete(bugs: &Collection<Bug>, id: Uuid) -> Result<(), BugStoreError> {
        let result = bugs.delete_one(doc! { "id": id.to_string() }).await?;
        if result.deleted_count == 0 {
            return Err(BugStoreError::NotFound(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validated_text_trims() {
        assert_eq!(validated_text("title", "  Login crash  ", 100).unwrap(), "Login crash");
    }

    #[test]
    fn test_validated_text_rejects_empty() {
        assert!(matches!(
            validated_text("title", "", 100),
            Err(BugStoreError::Validation(msg)) if msg == "title is required"
        ));
    }

    #[test]
    fn test_validated_text_rejects_whitespace_only() {
        assert!(matches!(
            validated_text("description", "   \t\n", 1000),
            Err(BugStoreError::Validation(_))
        ));
    }

    #[test]
    fn test_validated_text_rejects_overlong() {
        let long = "x".repeat(TITLE_MAX_CHARS + 1);
        assert!(matches!(
            validated_text("title", &long, TITLE_MAX_CHARS),
            Err(BugStoreError::Validation(msg)) if msg.contains("at most 100")
        ));
    }

    #[test]
    fn test_validated_text_accepts_exact_cap() {
        let exact = "x".repeat(TITLE_MAX_CHARS);
        assert_eq!(validated_text("title", &exact, TITLE_MAX_CHARS).unwrap(), exact);
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(serde_json::to_string(&BugStatus::InProgress).unwrap(), r#""in-progress""#);
        assert_eq!(
            serde_json::from_str::<BugStatus>(r#""resolved""#).unwrap(),
            BugStatus::Resolved
        );
        assert!(serde_json::from_str::<BugStatus>(r#""closed""#).is_err());
    }

    #[test]
    fn test_status_defaults_to_open() {
        assert_eq!(BugStatus::default(), BugStatus::Open);
        assert_eq!(BugStatus::InProgress.to_string(), "in-progress");
    }
}
