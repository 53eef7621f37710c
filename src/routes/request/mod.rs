mod handler;
mod model;

pub use handler::{get_request, list_requests};
pub use model::{NewRequest, Request};
