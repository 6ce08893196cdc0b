use axum::{routing::get, Router};

use crate::AppState;

pub mod model;
pub mod route;

pub fn routes() -> Router<AppState> {
	Router::new().route(
		"/me",
		get(route::get_me)
			.patch(route::update_me)
			.delete(route::delete_me),
	)
}
