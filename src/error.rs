/// 서비스 오류 타입
/// 모든 영속 계층/인증/검증 오류를 하나의 열거형으로 표현하고
/// HTTP 응답 코드와 기계 판독용 코드로 매핑한다.
// region:    --- Imports
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

// endregion: --- Imports

// region:    --- ServiceError
#[derive(Debug, Error)]
pub enum ServiceError {
    /// 경매 없음
    #[error("경매를 찾을 수 없습니다.")]
    AuctionNotFound,

    /// 사용자 없음
    #[error("사용자를 찾을 수 없습니다.")]
    UserNotFound,

    /// 자원 소유자가 아님
    #[error("해당 작업에 대한 권한이 없습니다.")]
    Forbidden,

    /// 진행 중이 아닌 경매에 입찰
    #[error("경매가 진행 중이 아닙니다.")]
    AuctionNotActive,

    /// 종료 시간이 지난 경매에 입찰
    #[error("경매가 이미 종료되었습니다.")]
    AuctionEnded,

    /// 판매자가 잠근 경매에 입찰
    #[error("판매자가 잠근 경매입니다.")]
    AuctionLocked,

    /// 이미 낙찰 처리된 경매를 다시 잠그려 함
    #[error("이미 낙찰 처리된 경매입니다.")]
    AlreadyLocked,

    /// 입찰이 없는 경매를 잠그려 함
    #[error("입찰이 없는 경매는 잠글 수 없습니다.")]
    NoBids,

    /// 입찰 금액이 현재 가격 이하
    #[error("입찰 금액이 현재 가격보다 낮습니다.")]
    BidTooLow { current_price: i64 },

    /// 현재 상태에서 허용되지 않는 작업(삭제, 상태 전이 등)
    #[error("현재 상태에서는 허용되지 않는 작업입니다: {0}")]
    InvalidState(String),

    /// 입력값 검증 실패
    #[error("입력값 검증에 실패했습니다: {0}")]
    Validation(String),

    /// 동일 이메일/역할의 사용자가 이미 존재
    #[error("이미 등록된 사용자입니다.")]
    UserAlreadyExists,

    /// 이메일 또는 비밀번호 불일치
    #[error("이메일 또는 비밀번호가 올바르지 않습니다.")]
    InvalidCredentials,

    /// 인증 토큰 누락 또는 검증 실패
    #[error("유효하지 않은 인증 토큰입니다.")]
    InvalidToken,

    /// 데이터베이스 오류(트랜잭션은 이미 롤백됨)
    #[error("데이터베이스 오류: {0}")]
    Store(#[from] sqlx::Error),

    /// 알림 발행 오류
    #[error("알림 발행에 실패했습니다: {0}")]
    Notification(String),

    /// 설정 오류
    #[error("설정 오류: {0}")]
    Config(String),

    /// 기타 내부 오류
    #[error("내부 오류: {0}")]
    Internal(String),
}

impl ServiceError {
    /// 기계 판독용 오류 코드
    pub fn code(&self) -> &'static str {
        match self {
            Self::AuctionNotFound | Self::UserNotFound => "NOT_FOUND",
            Self::Forbidden => "FORBIDDEN",
            Self::AuctionNotActive => "NOT_ACTIVE",
            Self::AuctionEnded => "ALREADY_ENDED",
            Self::AuctionLocked => "LOCKED",
            Self::AlreadyLocked => "ALREADY_LOCKED",
            Self::NoBids => "NO_BIDS",
            Self::BidTooLow { .. } => "LOW_BID",
            Self::InvalidState(_) => "INVALID_STATE",
            Self::Validation(_) => "VALIDATION",
            Self::UserAlreadyExists => "USER_EXISTS",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::Store(_) => "STORE_ERROR",
            Self::Notification(_) => "NOTIFICATION_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// HTTP 응답 상태 코드
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::AuctionNotFound | Self::UserNotFound => StatusCode::NOT_FOUND,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::InvalidToken => StatusCode::UNAUTHORIZED,
            Self::AuctionNotActive
            | Self::AuctionEnded
            | Self::AuctionLocked
            | Self::AlreadyLocked
            | Self::NoBids
            | Self::BidTooLow { .. }
            | Self::InvalidState(_)
            | Self::Validation(_)
            | Self::UserAlreadyExists
            | Self::InvalidCredentials => StatusCode::BAD_REQUEST,
            Self::Store(_) | Self::Notification(_) | Self::Config(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// 오류 응답 본문: {"error": 메시지, "code": 코드}
impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let mut body = serde_json::json!({
            "error": self.to_string(),
            "code": self.code(),
        });
        if let Self::BidTooLow { current_price } = &self {
            body["current_price"] = serde_json::json!(current_price);
        }
        (status, Json(body)).into_response()
    }
}

// endregion: --- ServiceError

// endregion: --- Tests
