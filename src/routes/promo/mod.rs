mod handler;
mod model;

pub use handler::{create_promo_code, get_promo_code, list_promo_codes};
