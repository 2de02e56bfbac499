// region:    --- Imports
use crate::auction::commands::{self as auction_commands, CreateAuctionCommand};
use crate::auction::events::OutbidNotification;
use crate::auction::status::{AuctionStatus, UserRole};
use crate::auth::{self, Claims, LoginCommand, RegisterCommand};
use crate::bidding::commands::{handle_lock_auction, handle_place_bid, PlaceBidCommand};
use crate::config::Config;
use crate::database::DatabaseManager;
use crate::error::ServiceError;
use crate::message_broker::NotificationPublisher;
use crate::query;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

// endregion: --- Imports

// region:    --- App State
/// 핸들러 공유 상태
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseManager>,
    pub notifier: Arc<dyn NotificationPublisher>,
    pub config: Arc<Config>,
}

// endregion: --- App State

// region:    --- Request Models
/// 경매 등록 요청
/// 이미지는 업로드 서비스가 미리 저장한 URL을 받는다.
#[derive(Debug, Deserialize)]
pub struct CreateAuctionRequest {
    pub item_name: String,
    #[serde(default)]
    pub description: String,
    pub min_bid: i64,
    #[serde(default)]
    pub image_url: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// 입찰 요청
#[derive(Debug, Deserialize)]
pub struct PlaceBidRequest {
    pub auction_id: i64,
    pub bid_amount: i64,
}

/// 관리자 상태 변경 요청
#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub new_status: AuctionStatus,
}

// endregion: --- Request Models

// region:    --- Helpers
/// 호출자 역할 검사
fn require_role(claims: &Claims, role: UserRole) -> Result<(), ServiceError> {
    if claims.role == role {
        Ok(())
    } else {
        Err(ServiceError::Forbidden)
    }
}

// endregion: --- Helpers

// region:    --- Health
/// 헬스 체크
pub async fn handle_health() -> impl IntoResponse {
    "Auction backend running"
}

// endregion: --- Health

// region:    --- Auth Handlers
/// 회원 가입
pub async fn handle_register(
    State(state): State<AppState>,
    Json(cmd): Json<RegisterCommand>,
) -> Result<impl IntoResponse, ServiceError> {
    let user = auth::register(&state.db, cmd, &state.config.jwt_secret).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// 로그인(역할별)
pub async fn handle_login(
    State(state): State<AppState>,
    Path(role): Path<UserRole>,
    Json(cmd): Json<LoginCommand>,
) -> Result<impl IntoResponse, ServiceError> {
    let user = auth::login(&state.db, cmd, role, &state.config.jwt_secret).await?;
    Ok(Json(user))
}

// endregion: --- Auth Handlers

// region:    --- Public Query Handlers
/// 모든 경매 조회
pub async fn handle_get_auctions(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let auctions = query::handlers::get_all_auctions(&state.db).await?;
    Ok(Json(auctions))
}

/// 진행 중 경매 조회(메인 페이지)
pub async fn handle_get_active_auctions(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let auctions = query::handlers::get_active_auctions(&state.db).await?;
    Ok(Json(auctions))
}

/// 경매 상세 조회
pub async fn handle_get_auction(
    State(state): State<AppState>,
    Path(auction_id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    let auction = query::handlers::get_auction_by_id(&state.db, auction_id)
        .await?
        .ok_or(ServiceError::AuctionNotFound)?;
    Ok(Json(auction))
}

/// 경매 입찰 이력 조회
pub async fn handle_get_auction_bids(
    State(state): State<AppState>,
    Path(auction_id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    let bids = query::handlers::get_bids_by_auction(&state.db, auction_id).await?;
    Ok(Json(bids))
}

// endregion: --- Public Query Handlers

// region:    --- Vendor Handlers
/// 경매 등록(판매자 전용)
pub async fn handle_create_auction(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateAuctionRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let claims = auth::bearer_claims(&headers, &state.config.jwt_secret)?;
    require_role(&claims, UserRole::Vendor)?;

    let cmd = CreateAuctionCommand {
        vendor_id: claims.user_id()?,
        item_name: req.item_name,
        description: req.description,
        min_bid: req.min_bid,
        image_url: req.image_url,
        start_time: req.start_time,
        end_time: req.end_time,
    };
    let auction =
        auction_commands::create_auction(&state.db, cmd, state.config.initial_status()).await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "경매가 성공적으로 등록되었습니다.",
            "auction": auction,
        })),
    ))
}

/// 판매자의 경매 목록 조회
pub async fn handle_get_vendor_auctions(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ServiceError> {
    let claims = auth::bearer_claims(&headers, &state.config.jwt_secret)?;
    require_role(&claims, UserRole::Vendor)?;

    let auctions = query::handlers::get_auctions_by_vendor(&state.db, claims.user_id()?).await?;
    Ok(Json(auctions))
}

/// 경매 삭제(판매자 전용, pending/rejected 상태만)
pub async fn handle_delete_auction(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(auction_id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    let claims = auth::bearer_claims(&headers, &state.config.jwt_secret)?;

    auction_commands::delete_auction(&state.db, auction_id, claims.user_id()?).await?;
    Ok(Json(serde_json::json!({
        "message": "경매가 삭제되었습니다.",
    })))
}

/// 조기 낙찰(판매자 잠금)
pub async fn handle_lock(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(auction_id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    let claims = auth::bearer_claims(&headers, &state.config.jwt_secret)?;

    let outcome = handle_lock_auction(auction_id, claims.user_id()?, &state.db).await?;
    Ok(Json(serde_json::json!({
        "message": "경매가 성공적으로 잠겼습니다.",
        "winner_id": outcome.winner_id,
        "final_price": outcome.final_price,
    })))
}

// endregion: --- Vendor Handlers

// region:    --- Customer Handlers
/// 입찰 요청 처리
/// 입찰 성공 시 직전 입찰자가 새 입찰자와 다르면 상위 입찰 알림을 발행한다.
pub async fn handle_bid(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<PlaceBidRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let claims = auth::bearer_claims(&headers, &state.config.jwt_secret)?;
    let user_id = claims.user_id()?;

    let cmd = PlaceBidCommand {
        auction_id: req.auction_id,
        user_id,
        bid_amount: req.bid_amount,
    };
    let outcome = handle_place_bid(cmd, &state.db).await?;

    // 알림 발행 실패는 이미 커밋된 입찰을 되돌리지 않는다
    if let Some(previous) = outcome.previous_bidder_id {
        if previous != user_id {
            let notification = OutbidNotification::new(req.auction_id, previous);
            if let Err(e) = state.notifier.publish_outbid(notification).await {
                error!("{:<12} --> 상위 입찰 알림 발행 실패: {}", "Handler", e);
            } else {
                info!(
                    "{:<12} --> 상위 입찰 알림 발행: 경매 {}, 대상 {}",
                    "Handler", req.auction_id, previous
                );
            }
        }
    }

    Ok(Json(serde_json::json!({
        "message": "입찰이 성공적으로 처리되었습니다.",
        "current_bid": outcome.current_bid,
        "previous_bidder_id": outcome.previous_bidder_id,
    })))
}

/// 고객 입찰 이력 조회(본인 또는 관리자)
pub async fn handle_customer_bid_history(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(customer_id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let claims = auth::bearer_claims(&headers, &state.config.jwt_secret)?;
    if claims.user_id()? != customer_id && claims.role != UserRole::Admin {
        return Err(ServiceError::Forbidden);
    }

    let history = query::handlers::get_customer_bid_history(&state.db, customer_id).await?;
    Ok(Json(history))
}

/// 고객 낙찰 내역 조회(본인 또는 관리자)
pub async fn handle_customer_wins(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(customer_id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let claims = auth::bearer_claims(&headers, &state.config.jwt_secret)?;
    if claims.user_id()? != customer_id && claims.role != UserRole::Admin {
        return Err(ServiceError::Forbidden);
    }

    let wins = query::handlers::get_customer_wins(&state.db, customer_id).await?;
    Ok(Json(wins))
}

/// 고객 활동 통계 조회(본인 또는 관리자)
pub async fn handle_customer_stats(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(customer_id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let claims = auth::bearer_claims(&headers, &state.config.jwt_secret)?;
    if claims.user_id()? != customer_id && claims.role != UserRole::Admin {
        return Err(ServiceError::Forbidden);
    }

    let stats = query::handlers::get_customer_stats(&state.db, customer_id).await?;
    Ok(Json(stats))
}

// endregion: --- Customer Handlers

// region:    --- Admin Handlers
/// 관리자 승인/거절
pub async fn handle_set_status(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(auction_id): Path<i64>,
    Json(req): Json<SetStatusRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let claims = auth::bearer_claims(&headers, &state.config.jwt_secret)?;
    require_role(&claims, UserRole::Admin)?;

    auction_commands::set_status(&state.db, auction_id, req.new_status).await?;
    Ok(Json(serde_json::json!({
        "message": format!("경매 상태가 {}(으)로 변경되었습니다.", req.new_status),
    })))
}

// endregion: --- Admin Handlers
