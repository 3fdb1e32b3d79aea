#[macro_use]
extern crate tracing;

use garde::Validate;
use serde::Serialize;
use tasktracker_error::{tasktracker_error, ErrorType, Result};

pub mod admin;
pub mod auth;
pub mod client;
pub mod profile;
pub mod tag;
pub mod task;

pub use self::client::ApiClient;

/// Serialises to `{}`, for endpoints that want a JSON body without any content
#[derive(Serialize)]
struct EmptyObject {}

/// Validate a request before it is sent anywhere
fn validate<T>(value: &T) -> Result<()>
where
    T: Validate,
    T::Context: Default,
{
    value.validate().map_err(|report| {
        let message = report.to_string();
        let error_type = ErrorType::BadRequest(Some(message.clone()));
        tasktracker_error!(type = error_type, message)
    })
}
