use crate::application::booking::BookingApplicationError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::types::ErrorResponse;

/// API層のエラー型
///
/// アプリケーション層のエラーをラップし、HTTPレスポンスへのマッピングを提供する。
/// NotFound（404）とAccessDenied（403）は必ず区別して返す。
#[derive(Debug)]
pub struct ApiError(BookingApplicationError);

impl From<BookingApplicationError> for ApiError {
    fn from(err: BookingApplicationError) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    /// ビジネスルール違反（HTTP 400）を直接組み立てる
    ///
    /// stateパラメータやヘッダのパース失敗など、アプリケーション層に
    /// 届く前の境界バリデーションで使用する。
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError(BookingApplicationError::Validation(message.into()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self.0 {
            // 404 Not Found - 参照されたリソースが存在しない
            BookingApplicationError::UserNotFound(_) => {
                (StatusCode::NOT_FOUND, "USER_NOT_FOUND", self.0.to_string())
            }
            BookingApplicationError::ItemNotFound(_) => {
                (StatusCode::NOT_FOUND, "ITEM_NOT_FOUND", self.0.to_string())
            }
            BookingApplicationError::BookingNotFound(_) => (
                StatusCode::NOT_FOUND,
                "BOOKING_NOT_FOUND",
                self.0.to_string(),
            ),

            // 403 Forbidden - 予約者でも所有者でもない
            BookingApplicationError::AccessDenied => (
                StatusCode::FORBIDDEN,
                "ACCESS_DENIED",
                "Access denied".to_string(),
            ),

            // 400 Bad Request - ビジネスルール違反
            BookingApplicationError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION", msg.clone())
            }

            // 500 Internal Server Error - コラボレーターの失敗
            // 詳細はログに記録し、クライアントには一般的なメッセージのみを返す
            BookingApplicationError::StoreError(_)
            | BookingApplicationError::CommentStoreError(_)
            | BookingApplicationError::UserDirectoryError(_)
            | BookingApplicationError::ItemDirectoryError(_) => {
                tracing::error!(error = ?self.0, "Collaborator failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An unexpected error occurred".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse::new(error_type, message));
        (status, body).into_response()
    }
}
