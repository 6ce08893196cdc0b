use std::borrow::Cow;

use axum::{
	body::Body,
	extract::rejection::JsonRejection,
	http::{Response, StatusCode},
	response::IntoResponse,
	Json,
};
use serde::Serialize;
use tower_governor::GovernorError;

/// Map type used for structured error details.
pub type Map = serde_json::Map<String, serde_json::Value>;

/// A single client-facing error message, optionally scoped to a field of the
/// request payload.
#[derive(Debug, Serialize)]
pub struct Message<'e> {
	pub message: Cow<'e, str>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub field: Option<Cow<'e, str>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub details: Option<Cow<'e, Map>>,
}

impl<'e> Message<'e> {
	pub fn new(message: impl Into<Cow<'e, str>>) -> Self {
		Self {
			message: message.into(),
			field: None,
			details: None,
		}
	}

	#[must_use]
	pub fn field(mut self, field: impl Into<Cow<'e, str>>) -> Self {
		self.field = Some(field.into());
		self
	}

	#[must_use]
	pub fn detail(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
		self.details
			.get_or_insert_with(|| Cow::Owned(Map::new()))
			.to_mut()
			.insert(key.into(), value.into());
		self
	}

	pub fn into_vec(self) -> Vec<Self> {
		vec![self]
	}
}

#[derive(Debug, Serialize)]
struct Errors<'e> {
	errors: Vec<Message<'e>>,
}

/// Maps an error onto the wire contract: an HTTP status and a list of
/// [`Message`]s.
///
/// Note that the messages are presented to the client, so they should not
/// contain sensitive information.
pub trait ErrorShape {
	fn status(&self) -> StatusCode;
	fn errors(&self) -> Vec<Message<'_>>;

	fn response(&self) -> Response<Body> {
		(
			self.status(),
			Json(Errors {
				errors: self.errors(),
			}),
		)
			.into_response()
	}
}

/// Error type for failures outside a route's own domain.
///
/// The `Display` output is logged, never sent to the client, so it can show
/// sensitive information.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("validation error: {0}")]
	Validation(#[from] validator::ValidationErrors),
	#[error("json error: {0}")]
	Json(#[from] JsonRejection),
	#[error("database error: {0}")]
	Database(#[from] sqlx::Error),
	#[error("io error: {0}")]
	Io(#[from] std::io::Error),
	#[error("rate limited")]
	RateLimit(#[from] GovernorError),
}

impl ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::Validation(..) | Self::Json(..) => StatusCode::BAD_REQUEST,
			Self::Database(sqlx::Error::PoolTimedOut) => StatusCode::SERVICE_UNAVAILABLE,
			Self::Database(..) | Self::Io(..) => StatusCode::INTERNAL_SERVER_ERROR,
			Self::RateLimit(GovernorError::TooManyRequests { .. }) => StatusCode::TOO_MANY_REQUESTS,
			Self::RateLimit(..) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	fn errors(&self) -> Vec<Message<'_>> {
		match self {
			Self::Validation(errors) => validation_messages(errors),
			Self::Json(rejection) => Message::new(rejection.body_text()).into_vec(),
			Self::Database(sqlx::Error::PoolTimedOut) => {
				Message::new("storage timed out, retry later").into_vec()
			}
			Self::RateLimit(GovernorError::TooManyRequests { wait_time, .. }) => {
				Message::new("too many requests")
					.detail("retry_after_s", *wait_time)
					.into_vec()
			}
			Self::Database(..) | Self::Io(..) | Self::RateLimit(..) => internal_messages(self),
		}
	}
}

/// One message per violation, scoped to the offending field. All violations
/// are reported together.
fn validation_messages(errors: &validator::ValidationErrors) -> Vec<Message<'_>> {
	errors
		.field_errors()
		.into_iter()
		.flat_map(|(field, errors)| {
			errors.iter().map(move |error| {
				let content = error.message.as_deref().unwrap_or(error.code.as_ref());

				Message::new(content.to_string()).field(field)
			})
		})
		.collect()
}

/// Internal detail stays in the logs outside of a debug build.
fn internal_messages(error: &Error) -> Vec<Message<'_>> {
	let message = Message::new("internal server error");

	if cfg!(debug_assertions) {
		message.detail("cause", error.to_string()).into_vec()
	} else {
		message.into_vec()
	}
}

impl IntoResponse for Error {
	fn into_response(self) -> Response<Body> {
		if self.status().is_server_error() {
			tracing::error!(error = %self, "request failed");
		}

		self.response()
	}
}

/// Error type for a route module: either a route-specific error or a
/// process-level [`enum@Error`].
#[derive(Debug)]
pub enum RouteError<E> {
	App(Error),
	Route(E),
}

impl<E> From<Error> for RouteError<E> {
	fn from(error: Error) -> Self {
		Self::App(error)
	}
}

impl<E> From<sqlx::Error> for RouteError<E> {
	fn from(error: sqlx::Error) -> Self {
		Self::App(Error::Database(error))
	}
}

impl<E> From<validator::ValidationErrors> for RouteError<E> {
	fn from(errors: validator::ValidationErrors) -> Self {
		Self::App(Error::Validation(errors))
	}
}

impl<E> From<std::io::Error> for RouteError<E> {
	fn from(error: std::io::Error) -> Self {
		Self::App(Error::Io(error))
	}
}

impl<E: ErrorShape> IntoResponse for RouteError<E> {
	fn into_response(self) -> Response<Body> {
		match self {
			Self::App(error) => error.into_response(),
			Self::Route(error) => error.response(),
		}
	}
}
