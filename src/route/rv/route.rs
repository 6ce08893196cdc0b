use axum::{
	body::Bytes,
	extract::{Path, State},
	http::{header, HeaderMap, StatusCode},
	response::IntoResponse,
};
use uuid::Uuid;

use crate::{
	extract::{Json, Session},
	image, AppState, Database,
};

use super::{model, Error, RouteError};

/// Returns all of your RVs, the current one first, then newest first.
pub async fn list_rvs(
	State(database): State<Database>,
	session: Session,
) -> Result<Json<Vec<model::Rv>>, RouteError> {
	let rvs = sqlx::query_as::<_, model::Rv>(
		r#"
			SELECT * FROM rvs
			WHERE user_id = $1
			ORDER BY is_current DESC, created_at DESC
		"#,
	)
	.bind(session.user.id)
	.fetch_all(&database)
	.await?;

	Ok(Json(rvs))
}

/// Registers a new RV.
///
/// The first RV automatically becomes the current one; marking a later RV
/// current demotes the others within the same transaction.
pub async fn create_rv(
	State(database): State<Database>,
	session: Session,
	Json(input): Json<model::CreateRvInput>,
) -> Result<(StatusCode, Json<model::Rv>), RouteError> {
	let mut tx = database.begin().await?;

	let owned: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM rvs WHERE user_id = $1")
		.bind(session.user.id)
		.fetch_one(&mut *tx)
		.await?;

	let is_current = input.is_current.unwrap_or(owned == 0);

	if is_current {
		sqlx::query("UPDATE rvs SET is_current = false WHERE user_id = $1")
			.bind(session.user.id)
			.execute(&mut *tx)
			.await?;
	}

	let rv = sqlx::query_as::<_, model::Rv>(
		r#"
			INSERT INTO rvs (user_id, name, make, model, year, length, description, is_current)
			VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
			RETURNING *
		"#,
	)
	.bind(session.user.id)
	.bind(&input.name)
	.bind(&input.make)
	.bind(&input.model)
	.bind(input.year)
	.bind(input.length)
	.bind(&input.description)
	.bind(is_current)
	.fetch_one(&mut *tx)
	.await?;

	tx.commit().await?;

	Ok((StatusCode::CREATED, Json(rv)))
}

/// Returns a single RV by its unique id.
pub async fn get_rv(
	State(database): State<Database>,
	session: Session,
	Path(rv_id): Path<Uuid>,
) -> Result<Json<model::Rv>, RouteError> {
	let rv = sqlx::query_as::<_, model::Rv>("SELECT * FROM rvs WHERE id = $1 AND user_id = $2")
		.bind(rv_id)
		.bind(session.user.id)
		.fetch_optional(&database)
		.await?;

	Ok(Json(rv.ok_or(Error::UnknownRv(rv_id))?))
}

/// Partially updates an RV; only the supplied fields change.
///
/// Marking it current demotes every other RV in the same transaction.
/// Explicitly clearing the flag promotes nothing.
pub async fn update_rv(
	State(database): State<Database>,
	session: Session,
	Path(rv_id): Path<Uuid>,
	Json(input): Json<model::UpdateRvInput>,
) -> Result<Json<model::Rv>, RouteError> {
	let mut tx = database.begin().await?;

	if input.is_current == Some(true) {
		sqlx::query("UPDATE rvs SET is_current = false WHERE user_id = $1 AND id != $2")
			.bind(session.user.id)
			.bind(rv_id)
			.execute(&mut *tx)
			.await?;
	}

	let rv = sqlx::query_as::<_, model::Rv>(
		r#"
			UPDATE rvs
			SET name = COALESCE($1, name),
				make = COALESCE($2, make),
				model = COALESCE($3, model),
				year = COALESCE($4, year),
				length = COALESCE($5, length),
				description = COALESCE($6, description),
				is_current = COALESCE($7, is_current),
				updated_at = now()
			WHERE id = $8 AND user_id = $9
			RETURNING *
		"#,
	)
	.bind(&input.name)
	.bind(&input.make)
	.bind(&input.model)
	.bind(input.year)
	.bind(input.length)
	.bind(&input.description)
	.bind(input.is_current)
	.bind(rv_id)
	.bind(session.user.id)
	.fetch_optional(&mut *tx)
	.await?;

	// Dropping the transaction on a miss also rolls the demotion back.
	let rv = rv.ok_or(Error::UnknownRv(rv_id))?;

	tx.commit().await?;

	Ok(Json(rv))
}

/// Deletes an RV; its attached image is purged in the background.
pub async fn delete_rv(
	State(state): State<AppState>,
	session: Session,
	Path(rv_id): Path<Uuid>,
) -> Result<StatusCode, RouteError> {
	let image = sqlx::query_scalar::<_, Option<String>>(
		"DELETE FROM rvs WHERE id = $1 AND user_id = $2 RETURNING image",
	)
	.bind(rv_id)
	.bind(session.user.id)
	.fetch_optional(&state.database)
	.await?;

	let Some(image) = image else {
		return Err(Error::UnknownRv(rv_id).into());
	};

	if let Some(image) = image {
		state.images.purge_later(image);
	}

	Ok(StatusCode::NO_CONTENT)
}

/// Returns the attached image with its content type.
pub async fn get_rv_image(
	State(state): State<AppState>,
	session: Session,
	Path(rv_id): Path<Uuid>,
) -> Result<impl IntoResponse, RouteError> {
	let image = sqlx::query_scalar::<_, Option<String>>(
		"SELECT image FROM rvs WHERE id = $1 AND user_id = $2",
	)
	.bind(rv_id)
	.bind(session.user.id)
	.fetch_optional(&state.database)
	.await?
	.ok_or(Error::UnknownRv(rv_id))?;

	let name = image.ok_or(Error::NoImage)?;
	let content_type = image::content_type(&name).ok_or(Error::NoImage)?;
	let bytes = state.images.read(&name).await?;

	Ok(([(header::CONTENT_TYPE, content_type)], bytes))
}

/// Replaces the RV's image.
///
/// JPEG, PNG or GIF, at most 5MB. A rejected upload leaves the previously
/// stored image untouched; a successful one purges it in the background.
pub async fn upload_rv_image(
	State(state): State<AppState>,
	session: Session,
	Path(rv_id): Path<Uuid>,
	headers: HeaderMap,
	body: Bytes,
) -> Result<Json<model::Rv>, RouteError> {
	let content_type = headers
		.get(header::CONTENT_TYPE)
		.and_then(|value| value.to_str().ok());

	let image_type = image::check(content_type, body.len()).map_err(Error::Image)?;

	let previous = sqlx::query_scalar::<_, Option<String>>(
		"SELECT image FROM rvs WHERE id = $1 AND user_id = $2",
	)
	.bind(rv_id)
	.bind(session.user.id)
	.fetch_optional(&state.database)
	.await?
	.ok_or(Error::UnknownRv(rv_id))?;

	let name = state.images.save(&body, image_type).await?;

	let rv = sqlx::query_as::<_, model::Rv>(
		r#"
			UPDATE rvs
			SET image = $1, updated_at = now()
			WHERE id = $2 AND user_id = $3
			RETURNING *
		"#,
	)
	.bind(&name)
	.bind(rv_id)
	.bind(session.user.id)
	.fetch_optional(&state.database)
	.await?
	.ok_or(Error::UnknownRv(rv_id))?;

	if let Some(previous) = previous {
		state.images.purge_later(previous);
	}

	Ok(Json(rv))
}

/// Detaches the RV's image and purges it in the background.
pub async fn delete_rv_image(
	State(state): State<AppState>,
	session: Session,
	Path(rv_id): Path<Uuid>,
) -> Result<StatusCode, RouteError> {
	let image = sqlx::query_scalar::<_, Option<String>>(
		"SELECT image FROM rvs WHERE id = $1 AND user_id = $2",
	)
	.bind(rv_id)
	.bind(session.user.id)
	.fetch_optional(&state.database)
	.await?
	.ok_or(Error::UnknownRv(rv_id))?;

	let Some(image) = image else {
		return Err(Error::NoImage.into());
	};

	sqlx::query("UPDATE rvs SET image = NULL, updated_at = now() WHERE id = $1 AND user_id = $2")
		.bind(rv_id)
		.bind(session.user.id)
		.execute(&state.database)
		.await?;

	state.images.purge_later(image);

	Ok(StatusCode::NO_CONTENT)
}
