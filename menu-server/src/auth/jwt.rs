//! JWT 令牌服务
//!
//! 处理编辑端令牌的生成、验证和解析。

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 密钥最短长度
pub const MIN_SECRET_LEN: usize = 32;

const PRINTABLE_CHARS: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*()-_=+[]{}|;:,.<>?";

/// JWT 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// JWT 密钥 (至少 32 字符)
    pub secret: String,
    /// 令牌过期时间 (分钟)
    pub expiration_minutes: i64,
    /// 令牌签发者
    pub issuer: String,
    /// 令牌受众
    pub audience: String,
}

impl JwtConfig {
    /// 从环境变量加载
    ///
    /// `require_secret` 为 true (生产环境) 时必须设置 `JWT_SECRET`，
    /// 否则未设置时生成临时密钥 (重启后旧令牌失效)。
    pub fn from_env(require_secret: bool) -> Result<Self, JwtError> {
        Ok(Self {
            secret: load_jwt_secret(require_secret)?,
            expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1440), // 默认 24 小时
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "menu-server".to_string()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "menu-editor".to_string()),
        })
    }

    /// 使用随机密钥的配置 (测试用)
    pub fn ephemeral() -> Result<Self, JwtError> {
        Ok(Self {
            secret: generate_secure_printable_jwt_secret()?,
            expiration_minutes: 60,
            issuer: "menu-server".to_string(),
            audience: "menu-editor".to_string(),
        })
    }
}

/// 存储在令牌中的 JWT Claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// 用户 ID (Subject)
    pub sub: String,
    /// 用户名
    pub username: String,
    /// 过期时间戳
    pub exp: i64,
    /// 签发时间戳
    pub iat: i64,
    /// 签发者
    pub iss: String,
    /// 受众
    pub aud: String,
}

/// JWT 错误
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("无效令牌: {0}")]
    InvalidToken(String),

    #[error("令牌已过期")]
    ExpiredToken,

    #[error("无效签名")]
    InvalidSignature,

    #[error("令牌生成失败: {0}")]
    GenerationFailed(String),

    #[error("密钥生成失败: {0}")]
    KeyGenerationFailed(String),

    #[error("配置错误: {0}")]
    ConfigError(String),
}

/// 生成可打印的安全 JWT 密钥 (64 字符)
pub fn generate_secure_printable_jwt_secret() -> Result<String, JwtError> {
    let rng = SystemRandom::new();
    let mut bytes = [0u8; 64];
    rng.fill(&mut bytes).map_err(|_| {
        JwtError::KeyGenerationFailed("Failed to generate secure random key".to_string())
    })?;

    Ok(bytes
        .iter()
        .map(|b| PRINTABLE_CHARS[*b as usize % PRINTABLE_CHARS.len()] as char)
        .collect())
}

/// 从环境变量安全地加载 JWT 密钥
fn load_jwt_secret(require_secret: bool) -> Result<String, JwtError> {
    match std::env::var("JWT_SECRET") {
        Ok(secret) => {
            if secret.len() < MIN_SECRET_LEN {
                return Err(JwtError::ConfigError(format!(
                    "JWT_SECRET must be at least {MIN_SECRET_LEN} characters long"
                )));
            }
            Ok(secret)
        }
        Err(_) if require_secret => Err(JwtError::ConfigError(
            "JWT_SECRET environment variable must be set in production!".to_string(),
        )),
        Err(_) => {
            tracing::warn!("⚠️  JWT_SECRET not set! Generating temporary key for development.");
            generate_secure_printable_jwt_secret()
        }
    }
}

/// JWT 令牌服务
#[derive(Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("issuer", &self.config.issuer)
            .field("audience", &self.config.audience)
            .finish_non_exhaustive()
    }
}

impl JwtService {
    /// 使用指定配置创建 JWT 服务
    pub fn with_config(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// 为用户生成新令牌
    pub fn generate_token(&self, user_id: &str, username: &str) -> Result<String, JwtError> {
        let now = Utc::now();
        let expiration = now + Duration::minutes(self.config.expiration_minutes);

        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// 验证并解码令牌
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                ErrorKind::InvalidToken => JwtError::InvalidToken(e.to_string()),
                _ => JwtError::InvalidToken(format!("Token validation failed: {}", e)),
            }
        })?;

        Ok(token_data.claims)
    }

    /// 从 Authorization 头提取令牌
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }

    /// 令牌有效期 (秒)
    pub fn expires_in_seconds(&self) -> i64 {
        self.config.expiration_minutes * 60
    }
}

/// 当前用户上下文 (从 JWT Claims 解析)
///
/// 由认证中间件注入请求扩展
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// 用户 ID
    pub id: String,
    /// 用户名
    pub username: String,
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            username: claims.username,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        JwtService::with_config(JwtConfig::ephemeral().unwrap())
    }

    #[test]
    fn test_jwt_generation_and_validation() {
        let service = service();
        let token = service.generate_token("admin", "admin").unwrap();

        let claims = service.validate_token(&token).unwrap();
        assert_eq!(claims.sub, "admin");
        assert_eq!(claims.iss, "menu-server");
        assert_eq!(claims.aud, "menu-editor");

        let user = CurrentUser::from(claims);
        assert_eq!(user.username, "admin");
    }

    #[test]
    fn test_token_from_other_secret_is_rejected() {
        let token = service().generate_token("admin", "admin").unwrap();
        assert!(matches!(
            service().validate_token(&token),
            Err(JwtError::InvalidSignature)
        ));
    }

    #[test]
    fn test_expired_token() {
        let mut config = JwtConfig::ephemeral().unwrap();
        config.expiration_minutes = -10;
        let service = JwtService::with_config(config);

        let token = service.generate_token("admin", "admin").unwrap();
        assert!(matches!(
            service.validate_token(&token),
            Err(JwtError::ExpiredToken)
        ));
    }

    #[test]
    fn test_wrong_audience() {
        let issuer = service();
        let mut config = issuer.config.clone();
        config.audience = "someone-else".to_string();
        let verifier = JwtService::with_config(config);

        let token = issuer.generate_token("admin", "admin").unwrap();
        assert!(verifier.validate_token(&token).is_err());
    }

    #[test]
    fn test_extract_from_header() {
        assert_eq!(JwtService::extract_from_header("Bearer abc"), Some("abc"));
        assert_eq!(JwtService::extract_from_header("Basic abc"), None);
    }

    #[test]
    fn test_printable_secret() {
        let a = generate_secure_printable_jwt_secret().unwrap();
        let b = generate_secure_printable_jwt_secret().unwrap();
        assert_eq!(a.len(), 64);
        assert!(a.len() >= MIN_SECRET_LEN);
        assert_ne!(a, b);
        assert!(a.chars().all(|c| c.is_ascii_graphic()));
    }
}
