/// 已发布商品列表缓存键
pub const PRODUCTS_KEY: &str = "products";

/// 首页展示商品列表缓存键
pub const PRODUCTS_TO_DISPLAY_KEY: &str = "to_display";

/// 城市列表缓存键
pub const CITIES_KEY: &str = "cities_cdek";

/// 订单列表缓存键
pub const REQUESTS_KEY: &str = "request_list";

/// CDEK 访问令牌缓存键
pub const CDEK_TOKEN_KEY: &str = "cdek_token";

const PRODUCT_PREFIX: &str = "product:";
const REQUEST_PREFIX: &str = "request:";
const USER_PREFIX: &str = "user:";

pub fn product_key(id: i32) -> String {
    format!("{}{}", PRODUCT_PREFIX, id)
}

pub fn request_key(id: i32) -> String {
    format!("{}{}", REQUEST_PREFIX, id)
}

pub fn user_key(id: i32) -> String {
    format!("{}{}", USER_PREFIX, id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_keys_embed_the_id() {
        assert_eq!(product_key(42), "product:42");
        assert_eq!(request_key(7), "request:7");
        assert_eq!(user_key(1), "user:1");
    }
}
