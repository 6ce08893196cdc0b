pub mod auth;
pub mod journal;
pub mod model;
pub mod rv;
pub mod tow_vehicle;
pub mod user;

use axum::Router;

use crate::AppState;

pub fn router(state: AppState) -> Router {
	Router::new()
		.nest("/auth", auth::routes())
		.nest("/users", user::routes())
		.nest("/rvs", rv::routes())
		.nest("/tow-vehicles", tow_vehicle::routes())
		.nest("/journal", journal::routes())
		.with_state(state)
}
