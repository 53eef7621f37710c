// 路由处理模块，每个资源一个子模块

pub mod city;
pub mod delivery;
pub mod email;
pub mod payment;
pub mod product;
pub mod promo;
pub mod request;
pub mod root;
pub mod user;
