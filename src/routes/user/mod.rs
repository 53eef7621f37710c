mod handler;
mod model;

pub use handler::{get_user, list_users, login, register};
pub use model::UserOut;
