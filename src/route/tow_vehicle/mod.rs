use axum::{http::StatusCode, routing::get, Router};
use uuid::Uuid;

use crate::{
	error::{self, ErrorShape, Message},
	image::ImageError,
	AppState,
};

pub mod model;
pub mod route;

/// An error that can occur while working with tow vehicles. Rows owned by
/// somebody else read as missing, like everywhere else.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("unknown tow vehicle")]
	UnknownTowVehicle(Uuid),
	#[error("no image attached")]
	NoImage,
	#[error(transparent)]
	Image(#[from] ImageError),
}

pub type RouteError = error::RouteError<Error>;

impl From<Error> for RouteError {
	fn from(error: Error) -> Self {
		Self::Route(error)
	}
}

pub fn routes() -> Router<AppState> {
	Router::new()
		.route("/", get(route::list_tow_vehicles).post(route::create_tow_vehicle))
		.route(
			"/:id",
			get(route::get_tow_vehicle)
				.put(route::update_tow_vehicle)
				.delete(route::delete_tow_vehicle),
		)
		.route(
			"/:id/image",
			get(route::get_tow_vehicle_image)
				.put(route::upload_tow_vehicle_image)
				.delete(route::delete_tow_vehicle_image),
		)
}

impl ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::UnknownTowVehicle(..) | Self::NoImage => StatusCode::NOT_FOUND,
			Self::Image(error) => error.status(),
		}
	}

	fn errors(&self) -> Vec<Message<'_>> {
		match self {
			Self::UnknownTowVehicle(id) => Message::new(self.to_string())
				.detail("tow_vehicle", id.to_string())
				.into_vec(),
			Self::NoImage => Message::new(self.to_string()).into_vec(),
			Self::Image(error) => error.errors(),
		}
	}
}
