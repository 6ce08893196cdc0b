use axum::{
	extract::{Path, State},
	http::StatusCode,
};
use uuid::Uuid;

use crate::{
	extract::{Json, Session},
	Database,
};

use super::{model, Error, RouteError};

/// Confirms the referenced RV belongs to the user before linking it. A
/// foreign RV reads as missing, like everywhere else.
async fn check_rv(database: &Database, user_id: Uuid, rv_id: Uuid) -> Result<(), RouteError> {
	let owned = sqlx::query_scalar::<_, Uuid>("SELECT id FROM rvs WHERE id = $1 AND user_id = $2")
		.bind(rv_id)
		.bind(user_id)
		.fetch_optional(database)
		.await?;

	owned.ok_or(Error::UnknownRv(rv_id))?;

	Ok(())
}

/// Returns all of your journal entries, newest first.
pub async fn list_entries(
	State(database): State<Database>,
	session: Session,
) -> Result<Json<Vec<model::JournalEntry>>, RouteError> {
	let entries = sqlx::query_as::<_, model::JournalEntry>(
		r#"
			SELECT * FROM journal_entries
			WHERE user_id = $1
			ORDER BY created_at DESC
		"#,
	)
	.bind(session.user.id)
	.fetch_all(&database)
	.await?;

	Ok(Json(entries))
}

/// Writes a new journal entry, optionally linked to one of your RVs.
pub async fn create_entry(
	State(database): State<Database>,
	session: Session,
	Json(input): Json<model::CreateEntryInput>,
) -> Result<(StatusCode, Json<model::JournalEntry>), RouteError> {
	if let Some(rv_id) = input.rv_id {
		check_rv(&database, session.user.id, rv_id).await?;
	}

	let entry = sqlx::query_as::<_, model::JournalEntry>(
		r#"
			INSERT INTO journal_entries (user_id, rv_id, title, content, location)
			VALUES ($1, $2, $3, $4, $5)
			RETURNING *
		"#,
	)
	.bind(session.user.id)
	.bind(input.rv_id)
	.bind(&input.title)
	.bind(&input.content)
	.bind(&input.location)
	.fetch_one(&database)
	.await?;

	Ok((StatusCode::CREATED, Json(entry)))
}

/// Returns a single journal entry by its unique id.
pub async fn get_entry(
	State(database): State<Database>,
	session: Session,
	Path(entry_id): Path<Uuid>,
) -> Result<Json<model::JournalEntry>, RouteError> {
	let entry = sqlx::query_as::<_, model::JournalEntry>(
		"SELECT * FROM journal_entries WHERE id = $1 AND user_id = $2",
	)
	.bind(entry_id)
	.bind(session.user.id)
	.fetch_optional(&database)
	.await?;

	Ok(Json(entry.ok_or(Error::UnknownEntry(entry_id))?))
}

/// Updates a journal entry; only the supplied fields change.
pub async fn update_entry(
	State(database): State<Database>,
	session: Session,
	Path(entry_id): Path<Uuid>,
	Json(input): Json<model::UpdateEntryInput>,
) -> Result<Json<model::JournalEntry>, RouteError> {
	if let Some(rv_id) = input.rv_id {
		check_rv(&database, session.user.id, rv_id).await?;
	}

	let entry = sqlx::query_as::<_, model::JournalEntry>(
		r#"
			UPDATE journal_entries
			SET title = COALESCE($1, title),
				content = COALESCE($2, content),
				location = COALESCE($3, location),
				rv_id = COALESCE($4, rv_id),
				updated_at = now()
			WHERE id = $5 AND user_id = $6
			RETURNING *
		"#,
	)
	.bind(&input.title)
	.bind(&input.content)
	.bind(&input.location)
	.bind(input.rv_id)
	.bind(entry_id)
	.bind(session.user.id)
	.fetch_optional(&database)
	.await?;

	Ok(Json(entry.ok_or(Error::UnknownEntry(entry_id))?))
}

/// Deletes a journal entry.
pub async fn delete_entry(
	State(database): State<Database>,
	session: Session,
	Path(entry_id): Path<Uuid>,
) -> Result<StatusCode, RouteError> {
	let status = sqlx::query("DELETE FROM journal_entries WHERE id = $1 AND user_id = $2")
		.bind(entry_id)
		.bind(session.user.id)
		.execute(&database)
		.await?;

	if status.rows_affected() == 0 {
		return Err(Error::UnknownEntry(entry_id).into());
	}

	Ok(StatusCode::NO_CONTENT)
}
