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

/// Returns all of your tow vehicles, the current one first, then newest first.
pub async fn list_tow_vehicles(
	State(database): State<Database>,
	session: Session,
) -> Result<Json<Vec<model::TowVehicle>>, RouteError> {
	let vehicles = sqlx::query_as::<_, model::TowVehicle>(
		r#"
			SELECT * FROM tow_vehicles
			WHERE user_id = $1
			ORDER BY is_current DESC, created_at DESC
		"#,
	)
	.bind(session.user.id)
	.fetch_all(&database)
	.await?;

	Ok(Json(vehicles))
}

/// Registers a new tow vehicle.
///
/// The current flag behaves exactly like the RV one, but over the user's tow
/// vehicles only.
pub async fn create_tow_vehicle(
	State(database): State<Database>,
	session: Session,
	Json(input): Json<model::CreateTowVehicleInput>,
) -> Result<(StatusCode, Json<model::TowVehicle>), RouteError> {
	let mut tx = database.begin().await?;

	let owned: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tow_vehicles WHERE user_id = $1")
		.bind(session.user.id)
		.fetch_one(&mut *tx)
		.await?;

	let is_current = input.is_current.unwrap_or(owned == 0);

	if is_current {
		sqlx::query("UPDATE tow_vehicles SET is_current = false WHERE user_id = $1")
			.bind(session.user.id)
			.execute(&mut *tx)
			.await?;
	}

	let vehicle = sqlx::query_as::<_, model::TowVehicle>(
		r#"
			INSERT INTO tow_vehicles (user_id, name, make, model, year, description, is_current)
			VALUES ($1, $2, $3, $4, $5, $6, $7)
			RETURNING *
		"#,
	)
	.bind(session.user.id)
	.bind(&input.name)
	.bind(&input.make)
	.bind(&input.model)
	.bind(input.year)
	.bind(&input.description)
	.bind(is_current)
	.fetch_one(&mut *tx)
	.await?;

	tx.commit().await?;

	Ok((StatusCode::CREATED, Json(vehicle)))
}

/// Returns a single tow vehicle by its unique id.
pub async fn get_tow_vehicle(
	State(database): State<Database>,
	session: Session,
	Path(vehicle_id): Path<Uuid>,
) -> Result<Json<model::TowVehicle>, RouteError> {
	let vehicle = sqlx::query_as::<_, model::TowVehicle>(
		"SELECT * FROM tow_vehicles WHERE id = $1 AND user_id = $2",
	)
	.bind(vehicle_id)
	.bind(session.user.id)
	.fetch_optional(&database)
	.await?;

	Ok(Json(vehicle.ok_or(Error::UnknownTowVehicle(vehicle_id))?))
}

/// Updates a tow vehicle; only the supplied fields change.
pub async fn update_tow_vehicle(
	State(database): State<Database>,
	session: Session,
	Path(vehicle_id): Path<Uuid>,
	Json(input): Json<model::UpdateTowVehicleInput>,
) -> Result<Json<model::TowVehicle>, RouteError> {
	let mut tx = database.begin().await?;

	if input.is_current == Some(true) {
		sqlx::query("UPDATE tow_vehicles SET is_current = false WHERE user_id = $1 AND id != $2")
			.bind(session.user.id)
			.bind(vehicle_id)
			.execute(&mut *tx)
			.await?;
	}

	let vehicle = sqlx::query_as::<_, model::TowVehicle>(
		r#"
			UPDATE tow_vehicles
			SET name = COALESCE($1, name),
				make = COALESCE($2, make),
				model = COALESCE($3, model),
				year = COALESCE($4, year),
				description = COALESCE($5, description),
				is_current = COALESCE($6, is_current),
				updated_at = now()
			WHERE id = $7 AND user_id = $8
			RETURNING *
		"#,
	)
	.bind(&input.name)
	.bind(&input.make)
	.bind(&input.model)
	.bind(input.year)
	.bind(&input.description)
	.bind(input.is_current)
	.bind(vehicle_id)
	.bind(session.user.id)
	.fetch_optional(&mut *tx)
	.await?;

	let vehicle = vehicle.ok_or(Error::UnknownTowVehicle(vehicle_id))?;

	tx.commit().await?;

	Ok(Json(vehicle))
}

/// Deletes a tow vehicle; its attached image is purged in the background.
pub async fn delete_tow_vehicle(
	State(state): State<AppState>,
	session: Session,
	Path(vehicle_id): Path<Uuid>,
) -> Result<StatusCode, RouteError> {
	let image = sqlx::query_scalar::<_, Option<String>>(
		"DELETE FROM tow_vehicles WHERE id = $1 AND user_id = $2 RETURNING image",
	)
	.bind(vehicle_id)
	.bind(session.user.id)
	.fetch_optional(&state.database)
	.await?;

	let Some(image) = image else {
		return Err(Error::UnknownTowVehicle(vehicle_id).into());
	};

	if let Some(image) = image {
		state.images.purge_later(image);
	}

	Ok(StatusCode::NO_CONTENT)
}

/// Returns the attached image with its content type.
pub async fn get_tow_vehicle_image(
	State(state): State<AppState>,
	session: Session,
	Path(vehicle_id): Path<Uuid>,
) -> Result<impl IntoResponse, RouteError> {
	let image = sqlx::query_scalar::<_, Option<String>>(
		"SELECT image FROM tow_vehicles WHERE id = $1 AND user_id = $2",
	)
	.bind(vehicle_id)
	.bind(session.user.id)
	.fetch_optional(&state.database)
	.await?
	.ok_or(Error::UnknownTowVehicle(vehicle_id))?;

	let name = image.ok_or(Error::NoImage)?;
	let content_type = image::content_type(&name).ok_or(Error::NoImage)?;
	let bytes = state.images.read(&name).await?;

	Ok(([(header::CONTENT_TYPE, content_type)], bytes))
}

/// Replaces the tow vehicle's image, with the same rules as the RV one.
pub async fn upload_tow_vehicle_image(
	State(state): State<AppState>,
	session: Session,
	Path(vehicle_id): Path<Uuid>,
	headers: HeaderMap,
	body: Bytes,
) -> Result<Json<model::TowVehicle>, RouteError> {
	let content_type = headers
		.get(header::CONTENT_TYPE)
		.and_then(|value| value.to_str().ok());

	let image_type = image::check(content_type, body.len()).map_err(Error::Image)?;

	let previous = sqlx::query_scalar::<_, Option<String>>(
		"SELECT image FROM tow_vehicles WHERE id = $1 AND user_id = $2",
	)
	.bind(vehicle_id)
	.bind(session.user.id)
	.fetch_optional(&state.database)
	.await?
	.ok_or(Error::UnknownTowVehicle(vehicle_id))?;

	let name = state.images.save(&body, image_type).await?;

	let vehicle = sqlx::query_as::<_, model::TowVehicle>(
		r#"
			UPDATE tow_vehicles
			SET image = $1, updated_at = now()
			WHERE id = $2 AND user_id = $3
			RETURNING *
		"#,
	)
	.bind(&name)
	.bind(vehicle_id)
	.bind(session.user.id)
	.fetch_optional(&state.database)
	.await?
	.ok_or(Error::UnknownTowVehicle(vehicle_id))?;

	if let Some(previous) = previous {
		state.images.purge_later(previous);
	}

	Ok(Json(vehicle))
}

/// Detaches the tow vehicle's image and purges it in the background.
pub async fn delete_tow_vehicle_image(
	State(state): State<AppState>,
	session: Session,
	Path(vehicle_id): Path<Uuid>,
) -> Result<StatusCode, RouteError> {
	let image = sqlx::query_scalar::<_, Option<String>>(
		"SELECT image FROM tow_vehicles WHERE id = $1 AND user_id = $2",
	)
	.bind(vehicle_id)
	.bind(session.user.id)
	.fetch_optional(&state.database)
	.await?
	.ok_or(Error::UnknownTowVehicle(vehicle_id))?;

	let Some(image) = image else {
		return Err(Error::NoImage.into());
	};

	sqlx::query(
		"UPDATE tow_vehicles SET image = NULL, updated_at = now() WHERE id = $1 AND user_id = $2",
	)
	.bind(vehicle_id)
	.bind(session.user.id)
	.execute(&state.database)
	.await?;

	state.images.purge_later(image);

	Ok(StatusCode::NO_CONTENT)
}
