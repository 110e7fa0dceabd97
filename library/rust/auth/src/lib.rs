//! barista-auth: サーバー用 JWT JWKS 検証 + パーミッションゲートライブラリ
//!
//! JWKS エンドポイントから公開鍵を取得し、JWT の署名検証を行う。
//! 認可サーバーが発行する JWT Claims の permissions 配列に基づく
//! パーミッションチェックを提供する。
//!
//! # 使い方
//!
//! ```ignore
//! use barista_auth::JwksVerifier;
//! use std::time::Duration;
//!
//! let verifier = JwksVerifier::new(
//!     "https://auth.example.com/.well-known/jwks.json",
//!     "https://auth.example.com/",
//!     "barista-api",
//!     Duration::from_secs(600),
//! )?;
//!
//! let claims = verifier.verify_token("eyJ...").await?;
//! ```

pub mod claims;
pub mod middleware;
pub mod permissions;
pub mod verifier;

pub use claims::Claims;
pub use middleware::{auth_middleware, require_permission, AuthErrorResponse, AuthState};
pub use permissions::{check_permission, has_permission};
pub use verifier::{AuthError, HttpJwksFetcher, JwkKey, JwksFetcher, JwksVerifier};
