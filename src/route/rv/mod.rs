use axum::{http::StatusCode, routing::get, Router};
use uuid::Uuid;

use crate::{
	error::{self, ErrorShape, Message},
	image::ImageError,
	AppState,
};

pub mod model;
pub mod route;

/// An error that can occur while working with RVs.
///
/// A row owned by somebody else is reported exactly like a missing one, so
/// the response does not reveal whether the id exists at all.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("unknown rv")]
	UnknownRv(Uuid),
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
		.route("/", get(route::list_rvs).post(route::create_rv))
		.route(
			"/:id",
			get(route::get_rv)
				.patch(route::update_rv)
				.delete(route::delete_rv),
		)
		.route(
			"/:id/image",
			get(route::get_rv_image)
				.put(route::upload_rv_image)
				.delete(route::delete_rv_image),
		)
}

impl ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::UnknownRv(..) | Self::NoImage => StatusCode::NOT_FOUND,
			Self::Image(error) => error.status(),
		}
	}

	fn errors(&self) -> Vec<Message<'_>> {
		match self {
			Self::UnknownRv(id) => Message::new(self.to_string())
				.detail("rv", id.to_string())
				.into_vec(),
			Self::NoImage => Message::new(self.to_string()).into_vec(),
			Self::Image(error) => error.errors(),
		}
	}
}

#[cfg(test)]
mod test {
	use axum::body::Bytes;
	use chrono::Datelike;

	use crate::test::*;

	#[sqlx::test]
	async fn test_current_rv_is_exclusive(pool: Database) {
		let app = app(pool);
		let token = register(&app, "alice", "alice@example.com").await;

		let response = app
			.post("/rvs")
			.add_header(AUTHORIZATION, bearer(&token))
			.json(&json!({
				"name": "Big Bertha",
				"make": "Winnebago",
				"model": "View",
				"year": 2022,
				"is_current": true,
			}))
			.await;

		assert_eq!(response.status_code(), 201);
		assert_eq!(response.json::<Value>()["is_current"], true);

		let response = app
			.post("/rvs")
			.add_header(AUTHORIZATION, bearer(&token))
			.json(&json!({
				"name": "Scout",
				"make": "Airstream",
				"model": "Basecamp",
				"year": 2024,
				"is_current": true,
			}))
			.await;

		assert_eq!(response.status_code(), 201);

		let response = app
			.get("/rvs")
			.add_header(AUTHORIZATION, bearer(&token))
			.await;

		let body = response.json::<Value>();
		let rvs = body.as_array().unwrap();

		assert_eq!(rvs.len(), 2);
		assert_eq!(rvs[0]["name"], "Scout");
		assert_eq!(rvs[0]["is_current"], true);
		assert_eq!(rvs[1]["name"], "Big Bertha");
		assert_eq!(rvs[1]["is_current"], false);
	}

	#[sqlx::test]
	async fn test_first_rv_defaults_to_current(pool: Database) {
		let app = app(pool);
		let token = register(&app, "alice", "alice@example.com").await;

		let response = app
			.post("/rvs")
			.add_header(AUTHORIZATION, bearer(&token))
			.json(&json!({ "name": "Big Bertha" }))
			.await;

		assert_eq!(response.json::<Value>()["is_current"], true);

		// Only the first one gets the flag by default.
		let response = app
			.post("/rvs")
			.add_header(AUTHORIZATION, bearer(&token))
			.json(&json!({ "name": "Scout" }))
			.await;

		assert_eq!(response.json::<Value>()["is_current"], false);
	}

	#[sqlx::test]
	async fn test_demotion_promotes_nothing(pool: Database) {
		let app = app(pool);
		let token = register(&app, "alice", "alice@example.com").await;

		let response = app
			.post("/rvs")
			.add_header(AUTHORIZATION, bearer(&token))
			.json(&json!({ "name": "Big Bertha" }))
			.await;

		let id = response.json::<Value>()["id"].as_str().unwrap().to_owned();

		let response = app
			.patch(&format!("/rvs/{id}"))
			.add_header(AUTHORIZATION, bearer(&token))
			.json(&json!({ "is_current": false }))
			.await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(response.json::<Value>()["is_current"], false);

		// No current rv at all is a valid state.
		let response = app
			.get("/rvs")
			.add_header(AUTHORIZATION, bearer(&token))
			.await;

		let body = response.json::<Value>();

		assert!(body
			.as_array()
			.unwrap()
			.iter()
			.all(|rv| rv["is_current"] == false));
	}

	#[sqlx::test]
	async fn test_marking_current_demotes_the_rest(pool: Database) {
		let app = app(pool);
		let token = register(&app, "alice", "alice@example.com").await;

		let first = app
			.post("/rvs")
			.add_header(AUTHORIZATION, bearer(&token))
			.json(&json!({ "name": "Big Bertha" }))
			.await;

		let second = app
			.post("/rvs")
			.add_header(AUTHORIZATION, bearer(&token))
			.json(&json!({ "name": "Scout" }))
			.await;

		let second_id = second.json::<Value>()["id"].as_str().unwrap().to_owned();

		let response = app
			.patch(&format!("/rvs/{second_id}"))
			.add_header(AUTHORIZATION, bearer(&token))
			.json(&json!({ "is_current": true }))
			.await;

		assert_eq!(response.status_code(), 200);

		let first_id = first.json::<Value>()["id"].as_str().unwrap().to_owned();
		let response = app
			.get(&format!("/rvs/{first_id}"))
			.add_header(AUTHORIZATION, bearer(&token))
			.await;

		assert_eq!(response.json::<Value>()["is_current"], false);
	}

	#[sqlx::test]
	async fn test_year_bounds(pool: Database) {
		let app = app(pool);
		let token = register(&app, "alice", "alice@example.com").await;

		let response = app
			.post("/rvs")
			.add_header(AUTHORIZATION, bearer(&token))
			.json(&json!({ "name": "Relic", "year": 1899 }))
			.await;

		assert_eq!(response.status_code(), 400);
		assert_eq!(response.json::<Value>()["errors"][0]["field"], "year");

		let response = app
			.post("/rvs")
			.add_header(AUTHORIZATION, bearer(&token))
			.json(&json!({ "name": "Antique", "year": 1900 }))
			.await;

		assert_eq!(response.status_code(), 201);

		let next_years_model = chrono::Utc::now().year() + 1;
		let response = app
			.post("/rvs")
			.add_header(AUTHORIZATION, bearer(&token))
			.json(&json!({ "name": "Early Bird", "year": next_years_model }))
			.await;

		assert_eq!(response.status_code(), 201);

		let response = app
			.post("/rvs")
			.add_header(AUTHORIZATION, bearer(&token))
			.json(&json!({ "name": "Time Machine", "year": next_years_model + 1 }))
			.await;

		assert_eq!(response.status_code(), 400);
	}

	#[sqlx::test]
	async fn test_foreign_rv_reads_as_missing(pool: Database) {
		let app = app(pool);
		let alice = register(&app, "alice", "alice@example.com").await;
		let bob = register(&app, "bob", "bob@example.com").await;

		let response = app
			.post("/rvs")
			.add_header(AUTHORIZATION, bearer(&alice))
			.json(&json!({ "name": "Big Bertha" }))
			.await;

		let id = response.json::<Value>()["id"].as_str().unwrap().to_owned();

		let response = app
			.get(&format!("/rvs/{id}"))
			.add_header(AUTHORIZATION, bearer(&bob))
			.await;

		assert_eq!(response.status_code(), 404);

		let response = app
			.patch(&format!("/rvs/{id}"))
			.add_header(AUTHORIZATION, bearer(&bob))
			.json(&json!({ "name": "Stolen" }))
			.await;

		assert_eq!(response.status_code(), 404);

		let response = app
			.delete(&format!("/rvs/{id}"))
			.add_header(AUTHORIZATION, bearer(&bob))
			.await;

		assert_eq!(response.status_code(), 404);

		// Alice's rv is untouched.
		let response = app
			.get(&format!("/rvs/{id}"))
			.add_header(AUTHORIZATION, bearer(&alice))
			.await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(response.json::<Value>()["name"], "Big Bertha");
	}

	#[sqlx::test]
	async fn test_round_trip(pool: Database) {
		let app = app(pool);
		let token = register(&app, "alice", "alice@example.com").await;

		let response = app
			.post("/rvs")
			.add_header(AUTHORIZATION, bearer(&token))
			.json(&json!({
				"name": "Big Bertha",
				"make": "Winnebago",
				"model": "View",
				"year": 2022,
				"length": 25.5,
				"description": "Our first rig.",
			}))
			.await;

		assert_eq!(response.status_code(), 201);

		let id = response.json::<Value>()["id"].as_str().unwrap().to_owned();

		let response = app
			.get(&format!("/rvs/{id}"))
			.add_header(AUTHORIZATION, bearer(&token))
			.await;

		let body = response.json::<Value>();

		assert_eq!(body["name"], "Big Bertha");
		assert_eq!(body["make"], "Winnebago");
		assert_eq!(body["model"], "View");
		assert_eq!(body["year"], 2022);
		assert_eq!(body["length"], 25.5);
		assert_eq!(body["description"], "Our first rig.");
	}

	#[sqlx::test]
	async fn test_update_is_partial(pool: Database) {
		let app = app(pool);
		let token = register(&app, "alice", "alice@example.com").await;

		let response = app
			.post("/rvs")
			.add_header(AUTHORIZATION, bearer(&token))
			.json(&json!({ "name": "Big Bertha", "make": "Winnebago" }))
			.await;

		let id = response.json::<Value>()["id"].as_str().unwrap().to_owned();

		let response = app
			.patch(&format!("/rvs/{id}"))
			.add_header(AUTHORIZATION, bearer(&token))
			.json(&json!({ "year": 2020 }))
			.await;

		assert_eq!(response.status_code(), 200);

		let body = response.json::<Value>();

		assert_eq!(body["name"], "Big Bertha");
		assert_eq!(body["make"], "Winnebago");
		assert_eq!(body["year"], 2020);
	}

	#[sqlx::test]
	async fn test_image_upload_and_fetch(pool: Database) {
		let app = app(pool);
		let token = register(&app, "alice", "alice@example.com").await;

		let response = app
			.post("/rvs")
			.add_header(AUTHORIZATION, bearer(&token))
			.json(&json!({ "name": "Big Bertha" }))
			.await;

		let id = response.json::<Value>()["id"].as_str().unwrap().to_owned();

		let bytes = vec![0xFF, 0xD8, 0xFF, 0xE0];
		let response = app
			.put(&format!("/rvs/{id}/image"))
			.add_header(AUTHORIZATION, bearer(&token))
			.content_type("image/jpeg")
			.bytes(Bytes::from(bytes.clone()))
			.await;

		assert_eq!(response.status_code(), 200);
		assert!(response.json::<Value>()["image"].is_string());

		let response = app
			.get(&format!("/rvs/{id}/image"))
			.add_header(AUTHORIZATION, bearer(&token))
			.await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(response.header("content-type"), "image/jpeg");
		assert_eq!(response.as_bytes().as_ref(), bytes.as_slice());
	}

	#[sqlx::test]
	async fn test_oversized_image_is_rejected(pool: Database) {
		let app = app(pool);
		let token = register(&app, "alice", "alice@example.com").await;

		let response = app
			.post("/rvs")
			.add_header(AUTHORIZATION, bearer(&token))
			.json(&json!({ "name": "Big Bertha" }))
			.await;

		let id = response.json::<Value>()["id"].as_str().unwrap().to_owned();

		let small = vec![0xFF, 0xD8];
		let response = app
			.put(&format!("/rvs/{id}/image"))
			.add_header(AUTHORIZATION, bearer(&token))
			.content_type("image/jpeg")
			.bytes(Bytes::from(small.clone()))
			.await;

		assert_eq!(response.status_code(), 200);

		let response = app
			.put(&format!("/rvs/{id}/image"))
			.add_header(AUTHORIZATION, bearer(&token))
			.content_type("image/jpeg")
			.bytes(Bytes::from(vec![0u8; 6 * 1024 * 1024]))
			.await;

		assert_eq!(response.status_code(), 400);
		assert_eq!(response.json::<Value>()["errors"][0]["field"], "image");

		// The previously stored image is untouched.
		let response = app
			.get(&format!("/rvs/{id}/image"))
			.add_header(AUTHORIZATION, bearer(&token))
			.await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(response.as_bytes().as_ref(), small.as_slice());
	}

	#[sqlx::test]
	async fn test_unsupported_image_type_is_rejected(pool: Database) {
		let app = app(pool);
		let token = register(&app, "alice", "alice@example.com").await;

		let response = app
			.post("/rvs")
			.add_header(AUTHORIZATION, bearer(&token))
			.json(&json!({ "name": "Big Bertha" }))
			.await;

		let id = response.json::<Value>()["id"].as_str().unwrap().to_owned();

		let response = app
			.put(&format!("/rvs/{id}/image"))
			.add_header(AUTHORIZATION, bearer(&token))
			.content_type("image/webp")
			.bytes(Bytes::from(vec![0u8; 16]))
			.await;

		assert_eq!(response.status_code(), 400);
		assert_eq!(response.json::<Value>()["errors"][0]["field"], "image");

		let response = app
			.get(&format!("/rvs/{id}/image"))
			.add_header(AUTHORIZATION, bearer(&token))
			.await;

		assert_eq!(response.status_code(), 404);
	}

	#[sqlx::test]
	async fn test_image_removal(pool: Database) {
		let app = app(pool);
		let token = register(&app, "alice", "alice@example.com").await;

		let response = app
			.post("/rvs")
			.add_header(AUTHORIZATION, bearer(&token))
			.json(&json!({ "name": "Big Bertha" }))
			.await;

		let id = response.json::<Value>()["id"].as_str().unwrap().to_owned();

		let response = app
			.put(&format!("/rvs/{id}/image"))
			.add_header(AUTHORIZATION, bearer(&token))
			.content_type("image/png")
			.bytes(Bytes::from(vec![0x89, 0x50]))
			.await;

		assert_eq!(response.status_code(), 200);

		let response = app
			.delete(&format!("/rvs/{id}/image"))
			.add_header(AUTHORIZATION, bearer(&token))
			.await;

		assert_eq!(response.status_code(), 204);

		let response = app
			.get(&format!("/rvs/{id}/image"))
			.add_header(AUTHORIZATION, bearer(&token))
			.await;

		assert_eq!(response.status_code(), 404);
	}
}
