use axum::{
	http::StatusCode,
	routing::{get, post},
	Router,
};

use crate::{
	error::{self, ErrorShape, Message},
	AppState,
};

pub mod model;
pub mod route;

/// An error that can occur during authentication.
///
/// Note that the messages are presented to the client, so they should not
/// contain sensitive information. In particular, [`Error::InvalidCredentials`]
/// is deliberately the same for an unknown email and a wrong password.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("invalid email or password")]
	InvalidCredentials,
	#[error("password hashing error")]
	PasswordHash(#[from] argon2::password_hash::Error),
	#[error("token signing error")]
	Token(#[from] jsonwebtoken::errors::Error),
	#[error("missing authorization header")]
	NoAuthorizationHeader,
	#[error("invalid or expired token")]
	InvalidToken,
	#[error("username already taken")]
	UsernameTaken,
	#[error("email already taken")]
	EmailTaken,
}

pub type RouteError = error::RouteError<Error>;

impl From<Error> for RouteError {
	fn from(error: Error) -> Self {
		Self::Route(error)
	}
}

pub fn routes() -> Router<AppState> {
	Router::new()
		.route("/register", post(route::register))
		.route("/login", post(route::login))
		.route("/verify", get(route::verify))
}

impl ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::InvalidCredentials | Self::NoAuthorizationHeader | Self::InvalidToken => {
				StatusCode::UNAUTHORIZED
			}
			Self::PasswordHash(..) | Self::Token(..) => StatusCode::INTERNAL_SERVER_ERROR,
			Self::UsernameTaken | Self::EmailTaken => StatusCode::CONFLICT,
		}
	}

	fn errors(&self) -> Vec<Message<'_>> {
		match self {
			Self::UsernameTaken => Message::new(self.to_string()).field("username").into_vec(),
			Self::EmailTaken => Message::new(self.to_string()).field("email").into_vec(),
			_ => Message::new(self.to_string()).into_vec(),
		}
	}
}
