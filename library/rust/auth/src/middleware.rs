//! axum 用の認証ミドルウェア。

use crate::claims::Claims;
use crate::permissions;
use crate::verifier::{AuthError, JwksVerifier};
use axum::{
    body::Body,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;

/// ミドルウェアファクトリの戻り値型。
type AuthMiddlewareFuture =
    std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AuthErrorResponse>> + Send>>;

/// AuthState はミドルウェアが使用する共有状態。
#[derive(Clone)]
pub struct AuthState {
    pub verifier: Arc<JwksVerifier>,
}

/// auth_middleware は JWT 認証ミドルウェア。
/// Authorization ヘッダーから Bearer トークンを取得し、JWKS 検証を行う。
/// 検証成功時は Claims をリクエストエクステンションに格納する。
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AuthErrorResponse> {
    let token = extract_bearer_token(&req).map_err(AuthErrorResponse::from_auth_error)?;

    let claims = state
        .verifier
        .verify_token(&token)
        .await
        .map_err(AuthErrorResponse::from_auth_error)?;

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// require_permission は指定パーミッションを必須とするミドルウェアファクトリ。
/// auth_middleware の後に使用すること。
pub fn require_permission(
    permission: &'static str,
) -> impl Fn(Request<Body>, Next) -> AuthMiddlewareFuture + Clone {
    move |req: Request<Body>, next: Next| {
        Box::pin(async move {
            let claims = req
                .extensions()
                .get::<Claims>()
                .ok_or_else(AuthErrorResponse::unauthenticated)?;

            permissions::check_permission(claims, permission)
                .map_err(AuthErrorResponse::from_auth_error)?;

            Ok(next.run(req).await)
        })
    }
}

/// リクエストエクステンションから Claims を取得する。
pub fn get_claims(req: &Request<Body>) -> Option<&Claims> {
    req.extensions().get::<Claims>()
}

/// Bearer トークンを Authorization ヘッダーから取得する。
///
/// ヘッダーは空白区切りでちょうど 2 要素、先頭要素は大文字小文字を
/// 無視して "bearer" でなければならない。
fn extract_bearer_token(req: &Request<Body>) -> Result<String, AuthError> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::MalformedAuthHeader)?;

    let parts: Vec<&str> = auth_header.split(' ').collect();
    if parts.len() != 2 {
        return Err(AuthError::MalformedAuthHeader);
    }

    if !parts[0].eq_ignore_ascii_case("bearer") {
        return Err(AuthError::InvalidScheme);
    }

    let token = parts[1];
    if token.is_empty() {
        return Err(AuthError::MalformedAuthHeader);
    }

    Ok(token.to_string())
}

/// AuthErrorResponse は認証エラーの HTTP レスポンス。
#[derive(Debug)]
pub struct AuthErrorResponse {
    pub status: StatusCode,
    pub message: String,
}

impl AuthErrorResponse {
    pub fn from_auth_error(err: AuthError) -> Self {
        match err {
            AuthError::MissingToken => Self {
                status: StatusCode::UNAUTHORIZED,
                message: "Authorization ヘッダーがありません".into(),
            },
            AuthError::MalformedAuthHeader => Self {
                status: StatusCode::UNAUTHORIZED,
                message: "Authorization ヘッダーの形式が不正です".into(),
            },
            AuthError::InvalidScheme => Self {
                status: StatusCode::UNAUTHORIZED,
                message: "Bearer スキームが必要です".into(),
            },
            AuthError::MissingKeyId => Self {
                status: StatusCode::UNAUTHORIZED,
                message: "認証ヘッダーが正しく構成されていません".into(),
            },
            AuthError::TokenExpired => Self {
                status: StatusCode::UNAUTHORIZED,
                message: "トークンの有効期限が切れています".into(),
            },
            AuthError::InvalidClaims(_) => Self {
                status: StatusCode::UNAUTHORIZED,
                message: "トークンのクレームが不正です".into(),
            },
            AuthError::InvalidToken(_) | AuthError::UnknownKeyId(_) => Self {
                status: StatusCode::BAD_REQUEST,
                message: "トークンを処理できません".into(),
            },
            AuthError::JwksFetchFailed(_) => Self {
                status: StatusCode::BAD_REQUEST,
                message: "署名鍵の取得に失敗しました".into(),
            },
            AuthError::MissingPermissions => Self {
                status: StatusCode::FORBIDDEN,
                message: "権限情報がトークンに含まれていません".into(),
            },
            AuthError::PermissionDenied(_) => Self {
                status: StatusCode::FORBIDDEN,
                message: "この操作を実行する権限がありません".into(),
            },
        }
    }

    fn unauthenticated() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: "認証が必要です".into(),
        }
    }
}

impl IntoResponse for AuthErrorResponse {
    fn into_response(self) -> Response {
        let body = json!({
            "success": false,
            "error": self.status.as_u16(),
            "message": self.message,
        });

        (self.status, Json(body)).into_response()
    }
}
