use axum::{
	extract::{FromRef, FromRequestParts},
	http::{header, request},
};

use crate::{error::RouteError, route::auth, token::TokenSigner, Database};

pub const AUTHORIZATION_PREFIX: &str = "Bearer ";

/// Extracts the bearer token and the user it was issued to from the request.
///
/// If the `Authorization` header is missing, an [`auth::Error::NoAuthorizationHeader`]
/// is returned. If the token is malformed, expired or signed with a different
/// secret, an [`auth::Error::InvalidToken`] is returned.
///
/// ```rust
/// async fn route(session: Session) {
///   println!("{:?}", session.user);
/// }
/// ```
#[derive(Debug)]
pub struct Session {
	pub user: auth::model::User,
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Session
where
	Database: FromRef<S>,
	TokenSigner: FromRef<S>,
	S: Sync + Send,
{
	type Rejection = RouteError<auth::Error>;

	/// Extracts the session from the `Authorization` header.
	async fn from_request_parts(
		parts: &mut request::Parts,
		state: &S,
	) -> Result<Self, Self::Rejection> {
		let header = parts
			.headers
			.get(header::AUTHORIZATION)
			.ok_or(auth::Error::NoAuthorizationHeader)?;

		let token = header
			.to_str()
			.ok()
			.and_then(|value| value.strip_prefix(AUTHORIZATION_PREFIX))
			.ok_or(auth::Error::InvalidToken)?;

		let claims = TokenSigner::from_ref(state)
			.verify(token)
			.map_err(|_| auth::Error::InvalidToken)?;

		let database = Database::from_ref(state);
		let user = sqlx::query_as::<_, auth::model::User>("SELECT * FROM users WHERE id = $1")
			.bind(claims.sub)
			.fetch_optional(&database)
			.await?;

		// A valid token for an account that no longer exists is rejected.
		Ok(Self {
			user: user.ok_or(auth::Error::InvalidToken)?,
		})
	}
}
