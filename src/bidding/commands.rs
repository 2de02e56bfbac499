/// 입찰 관련 커맨드 처리
/// 1. 입찰
/// 2. 조기 낙찰(판매자 잠금)
/// 3. 만료 스윕
///
/// 세 커맨드 모두 대상 경매 행에 대한 배타 잠금(SELECT ... FOR UPDATE)으로
/// 시작하는 단일 트랜잭션이다. 같은 경매에 대한 동시 입찰, 입찰과 잠금,
/// 입찰과 만료는 모두 행 잠금에서 직렬화된다.
// region:    --- Imports
use crate::auction::model::Auction;
use crate::auction::status::AuctionStatus;
use crate::database::DatabaseManager;
use crate::error::ServiceError;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::Row;
use tracing::{debug, info};
use uuid::Uuid;

// endregion: --- Imports

// region:    --- Commands
/// 입찰 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlaceBidCommand {
    pub auction_id: i64,
    pub user_id: Uuid,
    pub bid_amount: i64,
}

/// 입찰 결과
/// previous_bidder_id는 호출자가 상위 입찰 알림을 보낼 때 사용한다.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BidOutcome {
    pub previous_bidder_id: Option<Uuid>,
    pub current_bid: i64,
}

/// 조기 낙찰 결과
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LockOutcome {
    pub winner_id: Uuid,
    pub final_price: i64,
}

/// 최고 입찰 선정 규칙: 금액 내림차순, 동률이면 먼저 등록된 입찰
const WINNING_BID_QUERY: &str = "SELECT user_id, bid_amount FROM bids
     WHERE auction_id = $1
     ORDER BY bid_amount DESC, created_at ASC
     LIMIT 1";

/// 1. 입찰
/// 경매 행을 잠근 뒤 사전 조건을 검사하고, 입찰 행 삽입과 현재가 갱신을
/// 하나의 트랜잭션으로 적용한다. 실패 시 전체 롤백된다.
pub async fn handle_place_bid(
    cmd: PlaceBidCommand,
    db: &DatabaseManager,
) -> Result<BidOutcome, ServiceError> {
    info!("{:<12} --> 입찰 요청 처리 시작: {:?}", "Command", cmd);

    db.transaction(|tx| {
        Box::pin(async move {
            // 대상 경매 행 배타 잠금
            let auction =
                sqlx::query_as::<_, Auction>("SELECT * FROM auctions WHERE id = $1 FOR UPDATE")
                    .bind(cmd.auction_id)
                    .fetch_optional(&mut **tx)
                    .await?
                    .ok_or(ServiceError::AuctionNotFound)?;

            if !auction.status.is_biddable() {
                return Err(ServiceError::AuctionNotActive);
            }

            // 스윕이 아직 돌지 않았어도 종료 시간이 지났으면 거절
            let now = Utc::now();
            if auction.end_time < now {
                return Err(ServiceError::AuctionEnded);
            }

            if auction.status == AuctionStatus::Sold || auction.locked_price.is_some() {
                return Err(ServiceError::AuctionLocked);
            }

            if cmd.bid_amount <= auction.bid_floor() {
                return Err(ServiceError::BidTooLow {
                    current_price: auction.bid_floor(),
                });
            }

            // 직전 입찰자 조회: 최근 입찰 기준(금액 기준이 아님)
            // 상위 입찰 알림의 수신자를 결정한다.
            let previous_bidder_id: Option<Uuid> = sqlx::query(
                "SELECT user_id FROM bids WHERE auction_id = $1
                 ORDER BY created_at DESC LIMIT 1",
            )
            .bind(cmd.auction_id)
            .fetch_optional(&mut **tx)
            .await?
            .map(|row| row.get("user_id"));

            sqlx::query(
                "INSERT INTO bids (auction_id, user_id, bid_amount, created_at)
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(cmd.auction_id)
            .bind(cmd.user_id)
            .bind(cmd.bid_amount)
            .bind(now)
            .execute(&mut **tx)
            .await?;

            sqlx::query("UPDATE auctions SET current_bid = $1 WHERE id = $2")
                .bind(cmd.bid_amount)
                .bind(cmd.auction_id)
                .execute(&mut **tx)
                .await?;

            info!(
                "{:<12} --> 입찰 성공: 경매 {}, 현재가 {}",
                "Command", cmd.auction_id, cmd.bid_amount
            );

            Ok(BidOutcome {
                previous_bidder_id,
                current_bid: cmd.bid_amount,
            })
        })
    })
    .await
}

/// 2. 조기 낙찰(판매자 잠금)
/// 판매자가 경매를 즉시 종료하고 현재 최고 입찰자에게 낙찰한다.
/// 낙찰자 선정 규칙은 만료 스윕과 동일하다.
pub async fn handle_lock_auction(
    auction_id: i64,
    vendor_id: Uuid,
    db: &DatabaseManager,
) -> Result<LockOutcome, ServiceError> {
    info!(
        "{:<12} --> 조기 낙찰 요청 처리 시작: 경매 {}, 판매자 {}",
        "Command", auction_id, vendor_id
    );

    db.transaction(|tx| {
        Box::pin(async move {
            let auction =
                sqlx::query_as::<_, Auction>("SELECT * FROM auctions WHERE id = $1 FOR UPDATE")
                    .bind(auction_id)
                    .fetch_optional(&mut **tx)
                    .await?
                    .ok_or(ServiceError::AuctionNotFound)?;

            if auction.vendor_id != vendor_id {
                return Err(ServiceError::Forbidden);
            }
            if auction.status == AuctionStatus::Sold {
                return Err(ServiceError::AlreadyLocked);
            }

            let winner = sqlx::query(WINNING_BID_QUERY)
                .bind(auction_id)
                .fetch_optional(&mut **tx)
                .await?
                .ok_or(ServiceError::NoBids)?;

            let winner_id: Uuid = winner.get("user_id");
            let final_price: i64 = winner.get("bid_amount");

            sqlx::query(
                "UPDATE auctions SET status = $1, winner_user_id = $2, locked_price = $3
                 WHERE id = $4",
            )
            .bind(AuctionStatus::Sold)
            .bind(winner_id)
            .bind(final_price)
            .bind(auction_id)
            .execute(&mut **tx)
            .await?;

            info!(
                "{:<12} --> 조기 낙찰 성공: 경매 {}, 낙찰자 {}, 최종가 {}",
                "Command", auction_id, winner_id, final_price
            );

            Ok(LockOutcome {
                winner_id,
                final_price,
            })
        })
    })
    .await
}

/// 3. 만료 스윕
/// 종료 시간이 지난 active/approved 경매를 모두 잠그고 일괄 해소한다.
/// 입찰이 있으면 sold + 낙찰자 기록, 없으면 expired.
/// 배치 전체가 하나의 트랜잭션이다. 하나라도 실패하면 전부 롤백되고
/// 다음 틱에서 재시도된다.
pub async fn expire_auctions(db: &DatabaseManager) -> Result<u64, ServiceError> {
    db.transaction(|tx| {
        Box::pin(async move {
            let now = Utc::now();

            let expired: Vec<i64> = sqlx::query_scalar(
                "SELECT id FROM auctions
                 WHERE status IN ('active', 'approved') AND end_time < $1
                 FOR UPDATE",
            )
            .bind(now)
            .fetch_all(&mut **tx)
            .await?;

            for &auction_id in &expired {
                let winner = sqlx::query(WINNING_BID_QUERY)
                    .bind(auction_id)
                    .fetch_optional(&mut **tx)
                    .await?;

                match winner {
                    Some(row) => {
                        let winner_id: Uuid = row.get("user_id");
                        let final_price: i64 = row.get("bid_amount");
                        sqlx::query(
                            "UPDATE auctions
                             SET status = $1, winner_user_id = $2, locked_price = $3
                             WHERE id = $4",
                        )
                        .bind(AuctionStatus::Sold)
                        .bind(winner_id)
                        .bind(final_price)
                        .bind(auction_id)
                        .execute(&mut **tx)
                        .await?;
                        debug!(
                            "{:<12} --> 경매 {} 낙찰 처리: 낙찰자 {}, 최종가 {}",
                            "Command", auction_id, winner_id, final_price
                        );
                    }
                    None => {
                        sqlx::query("UPDATE auctions SET status = $1 WHERE id = $2")
                            .bind(AuctionStatus::Expired)
                            .bind(auction_id)
                            .execute(&mut **tx)
                            .await?;
                        debug!("{:<12} --> 경매 {} 유찰 처리", "Command", auction_id);
                    }
                }
            }

            Ok(expired.len() as u64)
        })
    })
    .await
}

// endregion: --- Commands
