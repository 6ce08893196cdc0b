use axum::{http::StatusCode, routing::get, Router};
use uuid::Uuid;

use crate::{
	error::{self, ErrorShape, Message},
	AppState,
};

pub mod model;
pub mod route;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("unknown journal entry")]
	UnknownEntry(Uuid),
	#[error("unknown rv")]
	UnknownRv(Uuid),
}

pub type RouteError = error::RouteError<Error>;

impl From<Error> for RouteError {
	fn from(error: Error) -> Self {
		Self::Route(error)
	}
}

pub fn routes() -> Router<AppState> {
	Router::new()
		.route("/", get(route::list_entries).post(route::create_entry))
		.route(
			"/:id",
			get(route::get_entry)
				.put(route::update_entry)
				.delete(route::delete_entry),
		)
}

impl ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::UnknownEntry(..) | Self::UnknownRv(..) => StatusCode::NOT_FOUND,
		}
	}

	fn errors(&self) -> Vec<Message<'_>> {
		match self {
			Self::UnknownEntry(id) => Message::new(self.to_string())
				.detail("entry", id.to_string())
				.into_vec(),
			Self::UnknownRv(id) => Message::new(self.to_string())
				.detail("rv", id.to_string())
				.into_vec(),
		}
	}
}
