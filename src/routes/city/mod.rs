mod handler;
mod model;

pub use handler::list_cities;
pub use model::City;
