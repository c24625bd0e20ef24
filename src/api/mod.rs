//! JSON request API
//!
//! Requests map one-to-one onto table store operations. Responses use a
//! fixed envelope; store error codes pass through unchanged.

mod errors;
mod handler;
mod request;
mod response;

pub use errors::{ApiError, ApiResult};
pub use handler::RequestHandler;
pub use request::Request;
pub use response::Response;
