//! 认证模块
//!
//! - [`JwtService`] - JWT 令牌服务
//! - [`CurrentUser`] - 当前用户上下文
//! - [`AdminCredentials`] - 编辑端账号校验
//! - [`require_auth`] - 认证中间件

pub mod credentials;
pub mod jwt;
pub mod middleware;

pub use credentials::{AdminCredentials, hash_password};
pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{is_public_api_route, require_auth};
