use axum::{extract::State, http::StatusCode};

use crate::{
	extract::{Json, Session},
	route::{rv, tow_vehicle},
	AppState, Database,
};

use super::model;

/// Returns the authenticated user's profile, with the vehicles they own.
pub async fn get_me(
	State(database): State<Database>,
	session: Session,
) -> Result<Json<model::Profile>, crate::Error> {
	let rvs = sqlx::query_as::<_, rv::model::Rv>(
		r#"
			SELECT * FROM rvs
			WHERE user_id = $1
			ORDER BY is_current DESC, created_at DESC
		"#,
	)
	.bind(session.user.id)
	.fetch_all(&database)
	.await?;

	let tow_vehicles = sqlx::query_as::<_, tow_vehicle::model::TowVehicle>(
		r#"
			SELECT * FROM tow_vehicles
			WHERE user_id = $1
			ORDER BY is_current DESC, created_at DESC
		"#,
	)
	.bind(session.user.id)
	.fetch_all(&database)
	.await?;

	Ok(Json(model::Profile {
		user: session.user,
		rvs,
		tow_vehicles,
	}))
}

/// Updates the authenticated user's display name and bio. Only the supplied
/// fields change.
pub async fn update_me(
	State(database): State<Database>,
	session: Session,
	Json(input): Json<model::UpdateProfileInput>,
) -> Result<Json<model::User>, crate::Error> {
	let user = sqlx::query_as::<_, model::User>(
		r#"
			UPDATE users
			SET display_name = COALESCE($1, display_name),
				bio = COALESCE($2, bio),
				updated_at = now()
			WHERE id = $3
			RETURNING *
		"#,
	)
	.bind(input.display_name)
	.bind(input.bio)
	.bind(session.user.id)
	.fetch_one(&database)
	.await?;

	Ok(Json(user))
}

/// Deletes the authenticated user and everything they own. This action is
/// irreversible.
pub async fn delete_me(
	State(state): State<AppState>,
	session: Session,
) -> Result<StatusCode, crate::Error> {
	// Collect attachment names before the cascade wipes the rows.
	let images = sqlx::query_scalar::<_, String>(
		r#"
			SELECT image FROM rvs WHERE user_id = $1 AND image IS NOT NULL
			UNION ALL
			SELECT image FROM tow_vehicles WHERE user_id = $1 AND image IS NOT NULL
		"#,
	)
	.bind(session.user.id)
	.fetch_all(&state.database)
	.await?;

	sqlx::query("DELETE FROM users WHERE id = $1")
		.bind(session.user.id)
		.execute(&state.database)
		.await?;

	for image in images {
		state.images.purge_later(image);
	}

	Ok(StatusCode::NO_CONTENT)
}
