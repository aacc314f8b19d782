//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 存活与健康检查
//! - [`auth`] - 编辑端登录
//! - [`menu`] - 菜单读写、内容编辑、语言信息
//! - [`prices`] - 价格表与价格同步
//! - [`orders`] - 点单

pub mod auth;
pub mod health;
pub mod menu;
pub mod orders;
pub mod prices;
