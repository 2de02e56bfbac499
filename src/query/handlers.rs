// region:    --- Imports
use super::queries;
use crate::auction::model::{
    AuctionDetail, BidRecord, CustomerBidHistoryRow, CustomerStats, CustomerWinRow, User,
};
use crate::auction::status::UserRole;
use crate::database::DatabaseManager;
use crate::error::ServiceError;
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

// endregion: --- Imports

// region:    --- Query Handlers

/// 모든 경매 조회
pub async fn get_all_auctions(db: &DatabaseManager) -> Result<Vec<AuctionDetail>, ServiceError> {
    info!("{:<12} --> 모든 경매 조회", "Query");
    db.transaction(|tx| {
        Box::pin(async move {
            sqlx::query_as::<_, AuctionDetail>(queries::GET_ALL_AUCTIONS)
                .fetch_all(&mut **tx)
                .await
                .map_err(ServiceError::from)
        })
    })
    .await
}

/// 진행 중 경매 조회
pub async fn get_active_auctions(db: &DatabaseManager) -> Result<Vec<AuctionDetail>, ServiceError> {
    info!("{:<12} --> 진행 중 경매 조회", "Query");
    db.transaction(|tx| {
        Box::pin(async move {
            sqlx::query_as::<_, AuctionDetail>(queries::GET_ACTIVE_AUCTIONS)
                .bind(Utc::now())
                .fetch_all(&mut **tx)
                .await
                .map_err(ServiceError::from)
        })
    })
    .await
}

/// 경매 단건 조회
pub async fn get_auction_by_id(
    db: &DatabaseManager,
    auction_id: i64,
) -> Result<Option<AuctionDetail>, ServiceError> {
    info!("{:<12} --> 경매 조회 id: {}", "Query", auction_id);
    db.transaction(|tx| {
        Box::pin(async move {
            sqlx::query_as::<_, AuctionDetail>(queries::GET_AUCTION_BY_ID)
                .bind(auction_id)
                .fetch_optional(&mut **tx)
                .await
                .map_err(ServiceError::from)
        })
    })
    .await
}

/// 판매자의 경매 목록 조회
pub async fn get_auctions_by_vendor(
    db: &DatabaseManager,
    vendor_id: Uuid,
) -> Result<Vec<AuctionDetail>, ServiceError> {
    info!("{:<12} --> 판매자 경매 조회 id: {}", "Query", vendor_id);
    db.transaction(|tx| {
        Box::pin(async move {
            sqlx::query_as::<_, AuctionDetail>(queries::GET_AUCTIONS_BY_VENDOR)
                .bind(vendor_id)
                .fetch_all(&mut **tx)
                .await
                .map_err(ServiceError::from)
        })
    })
    .await
}

/// 경매 입찰 이력 조회
pub async fn get_bids_by_auction(
    db: &DatabaseManager,
    auction_id: i64,
) -> Result<Vec<BidRecord>, ServiceError> {
    info!("{:<12} --> 입찰 이력 조회 id: {}", "Query", auction_id);
    db.transaction(|tx| {
        Box::pin(async move {
            sqlx::query_as::<_, BidRecord>(queries::GET_BIDS_BY_AUCTION)
                .bind(auction_id)
                .fetch_all(&mut **tx)
                .await
                .map_err(ServiceError::from)
        })
    })
    .await
}

/// 사용자 조회(이메일 + 역할)
pub async fn find_user_by_email(
    db: &DatabaseManager,
    email: &str,
    role: UserRole,
) -> Result<Option<User>, ServiceError> {
    info!("{:<12} --> 사용자 조회: {} ({})", "Query", email, role);
    let email = email.to_owned();
    db.transaction(|tx| {
        Box::pin(async move {
            sqlx::query_as::<_, User>(queries::FIND_USER_BY_EMAIL)
                .bind(&email)
                .bind(role)
                .fetch_optional(&mut **tx)
                .await
                .map_err(ServiceError::from)
        })
    })
    .await
}

/// 사용자 생성
pub async fn create_user(
    db: &DatabaseManager,
    name: &str,
    email: &str,
    password_hash: &str,
    role: UserRole,
) -> Result<User, ServiceError> {
    info!("{:<12} --> 사용자 생성: {} ({})", "Query", email, role);
    let id = Uuid::new_v4();
    let name = name.to_owned();
    let email = email.to_owned();
    let password_hash = password_hash.to_owned();
    db.transaction(|tx| {
        Box::pin(async move {
            sqlx::query_as::<_, User>(queries::CREATE_USER)
                .bind(id)
                .bind(&name)
                .bind(&email)
                .bind(&password_hash)
                .bind(role)
                .fetch_one(&mut **tx)
                .await
                .map_err(ServiceError::from)
        })
    })
    .await
}

/// 고객 입찰 이력 조회
pub async fn get_customer_bid_history(
    db: &DatabaseManager,
    customer_id: Uuid,
) -> Result<Vec<CustomerBidHistoryRow>, ServiceError> {
    info!("{:<12} --> 고객 입찰 이력 조회 id: {}", "Query", customer_id);
    db.transaction(|tx| {
        Box::pin(async move {
            sqlx::query_as::<_, CustomerBidHistoryRow>(queries::GET_CUSTOMER_BID_HISTORY)
                .bind(customer_id)
                .fetch_all(&mut **tx)
                .await
                .map_err(ServiceError::from)
        })
    })
    .await
}

/// 고객 낙찰 내역 조회
pub async fn get_customer_wins(
    db: &DatabaseManager,
    customer_id: Uuid,
) -> Result<Vec<CustomerWinRow>, ServiceError> {
    info!("{:<12} --> 고객 낙찰 내역 조회 id: {}", "Query", customer_id);
    db.transaction(|tx| {
        Box::pin(async move {
            sqlx::query_as::<_, CustomerWinRow>(queries::GET_CUSTOMER_WINS)
                .bind(customer_id)
                .fetch_all(&mut **tx)
                .await
                .map_err(ServiceError::from)
        })
    })
    .await
}

/// 고객 활동 통계 조회
pub async fn get_customer_stats(
    db: &DatabaseManager,
    customer_id: Uuid,
) -> Result<CustomerStats, ServiceError> {
    info!("{:<12} --> 고객 활동 통계 조회 id: {}", "Query", customer_id);
    db.transaction(|tx| {
        Box::pin(async move {
            sqlx::query_as::<_, CustomerStats>(queries::GET_CUSTOMER_STATS)
                .bind(customer_id)
                .fetch_one(&mut **tx)
                .await
                .map_err(ServiceError::from)
        })
    })
    .await
}

// endregion: --- Query Handlers
