//! パーミッションゲート: permissions Claim に基づくアクセス判定。

use crate::claims::Claims;
use crate::verifier::AuthError;

/// Claims に指定のパーミッションが含まれるかを判定する。
pub fn has_permission(claims: &Claims, permission: &str) -> bool {
    claims.permission_list().iter().any(|p| p == permission)
}

/// 指定パーミッションによるアクセスを検査する。
///
/// permissions Claim 自体が無い場合と、一覧に指定パーミッションが
/// 含まれない場合を区別してエラーを返す。どちらも Forbidden 扱い。
pub fn check_permission(claims: &Claims, permission: &str) -> Result<(), AuthError> {
    let Some(permissions) = claims.permissions.as_ref() else {
        return Err(AuthError::MissingPermissions);
    };

    if permissions.iter().any(|p| p == permission) {
        Ok(())
    } else {
        Err(AuthError::PermissionDenied(permission.to_string()))
    }
}
