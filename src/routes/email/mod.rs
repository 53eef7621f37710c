mod handler;

pub use handler::{email_callback, send_email};
