use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::domain::UserId;

use super::error::ApiError;

/// 呼び出し元ユーザーを運ぶヘッダ
///
/// 認証は存在しない。ヘッダの値をそのまま行為者IDとして信頼する。
pub const SHARER_USER_ID_HEADER: &str = "X-Sharer-User-Id";

/// `X-Sharer-User-Id`ヘッダの抽出器
pub struct SharerId(pub UserId);

#[async_trait]
impl<S> FromRequestParts<S> for SharerId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(SHARER_USER_ID_HEADER)
            .ok_or_else(|| ApiError::validation("X-Sharer-User-Id header is required"))?;

        let raw = value
            .to_str()
            .map_err(|_| ApiError::validation("X-Sharer-User-Id header is not valid UTF-8"))?;

        let uuid = Uuid::parse_str(raw).map_err(|_| {
            ApiError::validation(format!("Invalid X-Sharer-User-Id header: {}", raw))
        })?;

        Ok(SharerId(UserId::from_uuid(uuid)))
    }
}
