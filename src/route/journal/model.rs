use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::route::model::not_blank;

/// A single journal entry, written by a user.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct JournalEntry {
	pub id: Uuid,
	pub user_id: Uuid,
	/// The RV this entry is about, if any. Entries outlive the vehicle:
	/// deleting the RV clears the reference instead of deleting the entry.
	pub rv_id: Option<Uuid>,
	pub title: String,
	pub content: String,
	pub location: Option<String>,
	pub created_at: chrono::DateTime<chrono::Utc>,
	pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateEntryInput {
	#[validate(custom(function = "not_blank"))]
	pub title: String,
	#[validate(custom(function = "not_blank"))]
	pub content: String,
	pub location: Option<String>,
	pub rv_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateEntryInput {
	#[validate(custom(function = "not_blank"))]
	pub title: Option<String>,
	#[validate(custom(function = "not_blank"))]
	pub content: Option<String>,
	pub location: Option<String>,
	pub rv_id: Option<Uuid>,
}
