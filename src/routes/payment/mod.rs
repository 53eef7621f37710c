mod handler;

pub use handler::init_payment;
