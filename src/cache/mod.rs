// 缓存模块
// 包含缓存存储、缓存数据结构和操作逻辑

pub mod keys;
pub mod memory;
pub mod models;
pub mod operations;
pub mod store;

// 重新导出常用类型，方便其他模块使用
pub use memory::MemoryCacheStore;
pub use models::CachedToken;
pub use operations::{ReadThroughCache, TokenCache};
pub use store::{CacheError, CacheStore, RedisCacheStore};
