/// 缓存操作
pub mod read_through;
pub mod token;

pub use read_through::ReadThroughCache;
pub use token::TokenCache;
