/// 경매 생명주기 커맨드 처리
/// 1. 경매 등록
/// 2. 관리자 승인/거절(상태 전이)
/// 3. 경매 삭제
// region:    --- Imports
use crate::auction::model::Auction;
use crate::auction::status::AuctionStatus;
use crate::database::DatabaseManager;
use crate::error::ServiceError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

// endregion: --- Imports

// region:    --- Commands
/// 경매 등록 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CreateAuctionCommand {
    pub vendor_id: Uuid,
    pub item_name: String,
    pub description: String,
    pub min_bid: i64,
    pub image_url: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// 1. 경매 등록
/// 초기 상태는 승인 정책에 따라 pending 또는 active이다.
pub async fn create_auction(
    db: &DatabaseManager,
    cmd: CreateAuctionCommand,
    initial_status: AuctionStatus,
) -> Result<Auction, ServiceError> {
    info!(
        "{:<12} --> 경매 등록 요청: 판매자 {}, 상품 {}",
        "Command", cmd.vendor_id, cmd.item_name
    );

    // 쓰기 전에 입력값 검증
    if cmd.item_name.trim().is_empty() {
        return Err(ServiceError::Validation("상품명은 비어 있을 수 없습니다.".into()));
    }
    if cmd.min_bid < 0 {
        return Err(ServiceError::Validation(
            "최소 입찰가는 0 이상이어야 합니다.".into(),
        ));
    }
    if cmd.end_time <= cmd.start_time {
        return Err(ServiceError::Validation(
            "종료 시간은 시작 시간보다 늦어야 합니다.".into(),
        ));
    }

    db.transaction(|tx| {
        Box::pin(async move {
            sqlx::query_as::<_, Auction>(
                "INSERT INTO auctions
                     (vendor_id, item_name, description, min_bid, image_url, status, start_time, end_time)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                 RETURNING *",
            )
            .bind(cmd.vendor_id)
            .bind(&cmd.item_name)
            .bind(&cmd.description)
            .bind(cmd.min_bid)
            .bind(&cmd.image_url)
            .bind(initial_status)
            .bind(cmd.start_time)
            .bind(cmd.end_time)
            .fetch_one(&mut **tx)
            .await
            .map_err(ServiceError::from)
        })
    })
    .await
}

/// 2. 관리자 승인/거절
/// 상태 머신으로 전이를 검증한다. pending에서 벗어나는 전이만 허용된다.
pub async fn set_status(
    db: &DatabaseManager,
    auction_id: i64,
    new_status: AuctionStatus,
) -> Result<(), ServiceError> {
    info!(
        "{:<12} --> 경매 상태 변경 요청: id {}, 새 상태 {}",
        "Command", auction_id, new_status
    );

    db.transaction(|tx| {
        Box::pin(async move {
            let auction = sqlx::query_as::<_, Auction>(
                "SELECT * FROM auctions WHERE id = $1 FOR UPDATE",
            )
            .bind(auction_id)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or(ServiceError::AuctionNotFound)?;

            if !auction.status.can_transition_to(new_status) {
                return Err(ServiceError::InvalidState(format!(
                    "{}에서 {}로 전이할 수 없습니다.",
                    auction.status, new_status
                )));
            }

            sqlx::query("UPDATE auctions SET status = $1 WHERE id = $2")
                .bind(new_status)
                .bind(auction_id)
                .execute(&mut **tx)
                .await?;

            Ok(())
        })
    })
    .await
}

/// 3. 경매 삭제
/// pending/rejected 상태에서만 허용되며, 입찰 행을 먼저 지운 뒤
/// 같은 트랜잭션에서 경매 행을 지운다.
pub async fn delete_auction(
    db: &DatabaseManager,
    auction_id: i64,
    vendor_id: Uuid,
) -> Result<u64, ServiceError> {
    info!(
        "{:<12} --> 경매 삭제 요청: id {}, 판매자 {}",
        "Command", auction_id, vendor_id
    );

    db.transaction(|tx| {
        Box::pin(async move {
            let auction = sqlx::query_as::<_, Auction>(
                "SELECT * FROM auctions WHERE id = $1 FOR UPDATE",
            )
            .bind(auction_id)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or(ServiceError::AuctionNotFound)?;

            if auction.vendor_id != vendor_id {
                return Err(ServiceError::Forbidden);
            }
            if !auction.status.is_deletable() {
                return Err(ServiceError::InvalidState(
                    "진행 중이거나 완료된 경매는 삭제할 수 없습니다.".into(),
                ));
            }

            // 참조 무결성: 입찰 행 먼저 삭제
            sqlx::query("DELETE FROM bids WHERE auction_id = $1")
                .bind(auction_id)
                .execute(&mut **tx)
                .await?;

            let result = sqlx::query("DELETE FROM auctions WHERE id = $1 AND vendor_id = $2")
                .bind(auction_id)
                .bind(vendor_id)
                .execute(&mut **tx)
                .await?;

            Ok(result.rows_affected())
        })
    })
    .await
}

// endregion: --- Commands
