//! 编辑端账号
//!
//! 只有一个编辑账号，用户名和 argon2 PHC 哈希来自配置。

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

/// Editor account checked at login
#[derive(Clone)]
pub struct AdminCredentials {
    pub username: String,
    /// `None` disables login
    password_hash: Option<String>,
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("configured", &self.is_configured())
            .finish()
    }
}

impl AdminCredentials {
    pub fn new(username: impl Into<String>, password_hash: Option<String>) -> Self {
        Self {
            username: username.into(),
            password_hash: password_hash.filter(|h| !h.trim().is_empty()),
        }
    }

    /// Build from a plain password (tests and first-run tooling)
    pub fn with_password(
        username: impl Into<String>,
        password: &str,
    ) -> Result<Self, argon2::password_hash::Error> {
        Ok(Self::new(username, Some(hash_password(password)?)))
    }

    pub fn is_configured(&self) -> bool {
        self.password_hash.is_some()
    }

    /// Check a login attempt. A wrong username and a wrong password are
    /// indistinguishable to the caller.
    pub fn verify(&self, username: &str, password: &str) -> Result<bool, argon2::password_hash::Error> {
        let Some(hash) = &self.password_hash else {
            return Ok(false);
        };
        let parsed_hash = PasswordHash::new(hash)?;
        let password_ok = Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok();
        Ok(password_ok && username == self.username)
    }
}

/// Hash password using argon2
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(password_hash.to_string())
}
