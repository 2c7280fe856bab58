//! HTTP API - 路由和处理器
//!
//! 每个资源一个子模块，`mod.rs` 定义路由，`handler.rs` 实现处理器。
//! 所有路由都挂在 `/api` 下，由 [`crate::services::https::build_app`] 合并。

pub mod common;

pub mod health;

// Accounts
pub mod address;
pub mod user;

// Catalog
pub mod category;
pub mod product;
pub mod review;

// Shopping
pub mod cart;
pub mod my_list;
pub mod order;

// Content
pub mod banner;
pub mod blog;
pub mod home_slide;
