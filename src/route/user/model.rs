pub use crate::route::auth::model::User;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::route::{rv, tow_vehicle};

/// The authenticated user's profile, with the vehicles they own.
#[derive(Debug, Serialize)]
pub struct Profile {
	#[serde(flatten)]
	pub user: User,
	pub rvs: Vec<rv::model::Rv>,
	pub tow_vehicles: Vec<tow_vehicle::model::TowVehicle>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileInput {
	#[validate(length(max = 50))]
	pub display_name: Option<String>,
	#[validate(length(max = 500))]
	pub bio: Option<String>,
}
