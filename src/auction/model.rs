use crate::auction::status::{AuctionStatus, UserRole};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// 사용자 모델
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
}

// 경매 모델(auctions 테이블의 원시 행, 트랜잭션 코어에서 사용)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Auction {
    pub id: i64,
    pub vendor_id: Uuid,
    pub item_name: String,
    pub description: String,
    pub image_url: String,
    pub min_bid: i64,
    pub current_bid: Option<i64>,
    pub locked_price: Option<i64>,
    pub status: AuctionStatus,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub winner_user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Auction {
    /// 입찰이 넘어야 하는 가격 하한(현재가가 없으면 최소 입찰가)
    pub fn bid_floor(&self) -> i64 {
        self.current_bid.unwrap_or(self.min_bid).max(self.min_bid)
    }
}

// 낙찰자 이름이 조인된 경매 조회 모델
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AuctionDetail {
    pub id: i64,
    pub vendor_id: Uuid,
    pub item_name: String,
    pub description: String,
    pub image_url: String,
    pub min_bid: i64,
    pub current_bid: Option<i64>,
    pub locked_price: Option<i64>,
    pub status: AuctionStatus,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub winner_user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub winner_name: Option<String>,
}

// 입찰 모델
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Bid {
    pub id: i64,
    pub auction_id: i64,
    pub user_id: Uuid,
    pub bid_amount: i64,
    pub created_at: DateTime<Utc>,
}

// 입찰 이력 조회 모델(입찰자 이름 조인)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BidRecord {
    pub bid_amount: i64,
    pub created_at: DateTime<Utc>,
    pub bidder_name: String,
}

// 고객 입찰 이력 행(대시보드)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CustomerBidHistoryRow {
    pub bid_id: i64,
    pub bid_amount: i64,
    pub bid_time: DateTime<Utc>,
    pub auction_id: i64,
    pub item_name: String,
    pub description: String,
    pub image_url: String,
    pub min_bid: i64,
    pub current_bid: Option<i64>,
    pub locked_price: Option<i64>,
    pub status: AuctionStatus,
    pub end_time: DateTime<Utc>,
    pub winner_user_id: Option<Uuid>,
    pub vendor_name: String,
    pub highest_bid: Option<i64>,
    pub is_highest_bid: bool,
}

// 고객 낙찰 내역 행(대시보드)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CustomerWinRow {
    pub auction_id: i64,
    pub item_name: String,
    pub description: String,
    pub image_url: String,
    pub locked_price: Option<i64>,
    pub current_bid: Option<i64>,
    pub end_time: DateTime<Utc>,
    pub status: AuctionStatus,
    pub vendor_name: String,
    pub vendor_email: String,
    pub my_winning_bid: Option<i64>,
}

// 고객 활동 통계(대시보드)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CustomerStats {
    pub total_auctions_participated: i64,
    pub total_bids_placed: i64,
    pub total_wins: i64,
}
