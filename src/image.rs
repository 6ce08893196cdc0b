use std::path::PathBuf;

use axum::http::StatusCode;
use uuid::Uuid;

use crate::error::{ErrorShape, Message};

/// Largest accepted attachment, in bytes (5 MiB).
pub const MAX_BYTES: usize = 5 * 1024 * 1024;

/// The accepted attachment content types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageType {
	Jpeg,
	Png,
	Gif,
}

impl ImageType {
	pub fn from_mime(mime: &str) -> Option<Self> {
		match mime {
			"image/jpeg" => Some(Self::Jpeg),
			"image/png" => Some(Self::Png),
			"image/gif" => Some(Self::Gif),
			_ => None,
		}
	}

	pub fn from_ext(ext: &str) -> Option<Self> {
		match ext {
			"jpg" => Some(Self::Jpeg),
			"png" => Some(Self::Png),
			"gif" => Some(Self::Gif),
			_ => None,
		}
	}

	pub fn mime(self) -> &'static str {
		match self {
			Self::Jpeg => "image/jpeg",
			Self::Png => "image/png",
			Self::Gif => "image/gif",
		}
	}

	pub fn ext(self) -> &'static str {
		match self {
			Self::Jpeg => "jpg",
			Self::Png => "png",
			Self::Gif => "gif",
		}
	}
}

/// An attachment that failed validation.
///
/// A rejected upload never reaches storage, so whatever image was stored
/// before stays untouched.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
	#[error("image must be a JPEG, PNG or GIF")]
	UnsupportedType,
	#[error("image is too large (max 5MB)")]
	TooLarge,
}

impl ErrorShape for ImageError {
	fn status(&self) -> StatusCode {
		StatusCode::BAD_REQUEST
	}

	fn errors(&self) -> Vec<Message<'_>> {
		Message::new(self.to_string()).field("image").into_vec()
	}
}

/// Checks the declared content type and size of an upload.
pub fn check(content_type: Option<&str>, len: usize) -> Result<ImageType, ImageError> {
	let image_type = content_type
		.and_then(ImageType::from_mime)
		.ok_or(ImageError::UnsupportedType)?;

	if len > MAX_BYTES {
		return Err(ImageError::TooLarge);
	}

	Ok(image_type)
}

/// Content type of a stored attachment, from its file name.
pub fn content_type(name: &str) -> Option<&'static str> {
	let (_, ext) = name.rsplit_once('.')?;

	ImageType::from_ext(ext).map(ImageType::mime)
}

/// Filesystem-backed attachment storage.
///
/// Rows store the generated file name; the bytes live under the configured
/// upload directory.
#[derive(Debug, Clone)]
pub struct ImageStore {
	root: PathBuf,
}

impl ImageStore {
	pub fn new(root: PathBuf) -> Self {
		Self { root }
	}

	/// Writes the bytes under a fresh name and returns it.
	pub async fn save(&self, data: &[u8], image_type: ImageType) -> std::io::Result<String> {
		tokio::fs::create_dir_all(&self.root).await?;

		let name = format!("{}.{}", Uuid::new_v4(), image_type.ext());
		tokio::fs::write(self.root.join(&name), data).await?;

		Ok(name)
	}

	/// Reads a stored attachment back.
	pub async fn read(&self, name: &str) -> std::io::Result<Vec<u8>> {
		tokio::fs::read(self.root.join(name)).await
	}

	/// Deletes a stored attachment in the background.
	///
	/// Best-effort: the surrounding request does not wait on it and cannot
	/// fail with it.
	pub fn purge_later(&self, name: String) {
		let path = self.root.join(&name);

		tokio::spawn(async move {
			if let Err(error) = tokio::fs::remove_file(&path).await {
				tracing::warn!(%error, path = %path.display(), "failed to purge image");
			}
		});
	}
}
