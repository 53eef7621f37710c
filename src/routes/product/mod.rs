mod handler;
mod model;

pub use handler::{get_product, list_products, list_to_display};
pub use model::Product;
