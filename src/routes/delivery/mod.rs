mod handler;

pub use handler::calculate;
