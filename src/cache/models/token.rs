use serde::{Deserialize, Serialize};

/// 外部服务访问令牌缓存数据模型
///
/// `expires_at` 在本地计算：获取时刻加上服务方声明的 `expires_in`。
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CachedToken {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    pub expires_in: i64,
    pub expires_at: i64, // Unix timestamp
}

impl CachedToken {
    /// 恰好在 `now` 过期的令牌同样视为已过期
    pub fn is_expired(&self, now: i64) -> bool {
        self.expires_at <= now
    }
}
