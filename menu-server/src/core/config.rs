use std::path::PathBuf;

/// 服务器配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖 (启动时先加载 `.env`)：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录 (数据库、日志) |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | DATABASE_FILE | menu.redb | redb 文件名 (位于 WORK_DIR 下) |
/// | STATIC_DIR | public | 静态页面目录 |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | (未设置) | 按天滚动的日志目录 |
/// | ADMIN_USERNAME | admin | 编辑端用户名 |
/// | ADMIN_PASSWORD_HASH | (未设置) | 编辑端密码的 argon2 PHC 哈希 |
/// | JWT_SECRET | 开发环境自动生成 | HS256 密钥 (≥ 32 字符) |
/// | JWT_EXPIRATION_MINUTES | 1440 | 令牌有效期 |
/// | JWT_ISSUER / JWT_AUDIENCE | menu-server / menu-editor | 令牌声明 |
///
/// JWT 相关变量由 [`crate::auth::JwtConfig::from_env`] 读取。
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/srv/menu HTTP_PORT=8080 cargo run --bin menu-server
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存放数据库和日志
    pub work_dir: String,
    /// HTTP 服务端口
    pub http_port: u16,
    /// redb 数据库文件名
    pub database_file: String,
    /// 静态页面目录
    pub static_dir: String,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 日志级别
    pub log_level: String,
    /// 日志目录 (未设置时输出到终端)
    pub log_dir: Option<String>,
    /// 编辑端用户名
    pub admin_username: String,
    /// 编辑端密码哈希
    pub admin_password_hash: Option<String>,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            database_file: std::env::var("DATABASE_FILE").unwrap_or_else(|_| "menu.redb".into()),
            static_dir: std::env::var("STATIC_DIR").unwrap_or_else(|_| "public".into()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
            admin_username: std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".into()),
            admin_password_hash: std::env::var("ADMIN_PASSWORD_HASH")
                .ok()
                .filter(|h| !h.is_empty()),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// 数据库文件完整路径
    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join(&self.database_file)
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_and_database_path() {
        let mut config = Config::with_overrides("/tmp/menu-test", 9000);
        config.database_file = "menu.redb".into();
        assert_eq!(config.http_port, 9000);
        assert_eq!(
            config.database_path(),
            PathBuf::from("/tmp/menu-test/menu.redb")
        );
    }

    #[test]
    fn test_is_production() {
        let mut config = Config::with_overrides("/tmp", 0);
        config.environment = "production".into();
        assert!(config.is_production());
        config.environment = "staging".into();
        assert!(!config.is_production());
    }
}
