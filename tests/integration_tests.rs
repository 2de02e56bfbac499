//! 커맨드 계층 통합 테스트
//! 실행 전 DATABASE_URL이 가리키는 PostgreSQL이 필요하다:
//! `cargo test -- --ignored`
use auction_marketplace::auction::commands as auction_commands;
use auction_marketplace::auction::model::{Auction, User};
use auction_marketplace::auction::status::{AuctionStatus, UserRole};
use auction_marketplace::bidding::commands::{
    expire_auctions, handle_lock_auction, handle_place_bid, PlaceBidCommand,
};
use auction_marketplace::config::Config;
use auction_marketplace::database::DatabaseManager;
use auction_marketplace::error::ServiceError;
use auction_marketplace::query;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use uuid::Uuid;

/// 데이터베이스 매니저 설정
async fn setup() -> Arc<DatabaseManager> {
    let config = Config::from_env().expect("설정 로드 실패");
    let db = DatabaseManager::new(&config).await.expect("풀 생성 실패");
    db.initialize_database().await.expect("스키마 초기화 실패");
    Arc::new(db)
}

/// 테스트용 사용자 생성(이메일 충돌을 피하기 위해 무작위 접미사 사용)
async fn create_test_user(db: &DatabaseManager, name: &str, role: UserRole) -> User {
    let email = format!("{}+{}@example.com", name, Uuid::new_v4());
    query::handlers::create_user(db, name, &email, "not-a-real-hash", role)
        .await
        .expect("사용자 생성 실패")
}

/// 테스트용 경매 생성
async fn create_test_auction(
    db: &DatabaseManager,
    vendor_id: Uuid,
    min_bid: i64,
    status: AuctionStatus,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
) -> Auction {
    db.transaction(|tx| {
        Box::pin(async move {
            sqlx::query_as::<_, Auction>(
                "INSERT INTO auctions
                     (vendor_id, item_name, description, min_bid, image_url, status, start_time, end_time)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                 RETURNING *",
            )
            .bind(vendor_id)
            .bind("통합 테스트 상품")
            .bind("통합 테스트를 위한 상품입니다.")
            .bind(min_bid)
            .bind("")
            .bind(status)
            .bind(start_time)
            .bind(end_time)
            .fetch_one(&mut **tx)
            .await
        })
    })
    .await
    .expect("경매 생성 실패")
}

/// 경매 재조회
async fn reload_auction(db: &DatabaseManager, auction_id: i64) -> Auction {
    db.transaction(|tx| {
        Box::pin(async move {
            sqlx::query_as::<_, Auction>("SELECT * FROM auctions WHERE id = $1")
                .bind(auction_id)
                .fetch_one(&mut **tx)
                .await
        })
    })
    .await
    .expect("경매 조회 실패")
}

/// 경매의 입찰 수 조회
async fn count_bids(db: &DatabaseManager, auction_id: i64) -> i64 {
    db.transaction(|tx| {
        Box::pin(async move {
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM bids WHERE auction_id = $1")
                .bind(auction_id)
                .fetch_one(&mut **tx)
                .await
        })
    })
    .await
    .expect("입찰 수 조회 실패")
}

fn bid(auction_id: i64, user_id: Uuid, bid_amount: i64) -> PlaceBidCommand {
    PlaceBidCommand {
        auction_id,
        user_id,
        bid_amount,
    }
}

/// 입찰 검증 테스트: 최소 입찰가 미만은 거절, 초과는 수락
#[tokio::test]
#[ignore = "DATABASE_URL이 가리키는 PostgreSQL 필요"]
async fn test_place_bid_validation() {
    let db = setup().await;
    let vendor = create_test_user(&db, "vendor", UserRole::Vendor).await;
    let customer = create_test_user(&db, "customer", UserRole::Customer).await;
    let now = Utc::now();
    let auction = create_test_auction(
        &db,
        vendor.id,
        10,
        AuctionStatus::Active,
        now,
        now + Duration::hours(2),
    )
    .await;

    // 최소 입찰가 미만
    let result = handle_place_bid(bid(auction.id, customer.id, 5), &db).await;
    assert!(matches!(
        result,
        Err(ServiceError::BidTooLow { current_price: 10 })
    ));

    // 최소 입찰가 초과
    let outcome = handle_place_bid(bid(auction.id, customer.id, 15), &db)
        .await
        .expect("입찰 실패");
    assert_eq!(outcome.current_bid, 15);
    assert_eq!(outcome.previous_bidder_id, None);

    let updated = reload_auction(&db, auction.id).await;
    assert_eq!(updated.current_bid, Some(15));

    // 현재가 이하 재입찰은 거절
    let result = handle_place_bid(bid(auction.id, customer.id, 15), &db).await;
    assert!(matches!(result, Err(ServiceError::BidTooLow { .. })));
}

/// 종료 시간이 지난 경매는 스윕 전이라도 입찰 거절
#[tokio::test]
#[ignore = "DATABASE_URL이 가리키는 PostgreSQL 필요"]
async fn test_bid_on_ended_auction_fails() {
    let db = setup().await;
    let vendor = create_test_user(&db, "vendor", UserRole::Vendor).await;
    let customer = create_test_user(&db, "customer", UserRole::Customer).await;
    let now = Utc::now();
    let auction = create_test_auction(
        &db,
        vendor.id,
        10,
        AuctionStatus::Active,
        now - Duration::hours(2),
        now - Duration::seconds(1),
    )
    .await;

    let result = handle_place_bid(bid(auction.id, customer.id, 100), &db).await;
    assert!(matches!(result, Err(ServiceError::AuctionEnded)));
}

/// 직전 입찰자는 최근 입찰 기준으로 반환된다
#[tokio::test]
#[ignore = "DATABASE_URL이 가리키는 PostgreSQL 필요"]
async fn test_previous_bidder_is_most_recent() {
    let db = setup().await;
    let vendor = create_test_user(&db, "vendor", UserRole::Vendor).await;
    let alice = create_test_user(&db, "alice", UserRole::Customer).await;
    let bob = create_test_user(&db, "bob", UserRole::Customer).await;
    let carol = create_test_user(&db, "carol", UserRole::Customer).await;
    let now = Utc::now();
    let auction = create_test_auction(
        &db,
        vendor.id,
        10,
        AuctionStatus::Active,
        now,
        now + Duration::hours(2),
    )
    .await;

    handle_place_bid(bid(auction.id, alice.id, 20), &db)
        .await
        .expect("입찰 실패");
    let outcome = handle_place_bid(bid(auction.id, bob.id, 30), &db)
        .await
        .expect("입찰 실패");
    assert_eq!(outcome.previous_bidder_id, Some(alice.id));

    let outcome = handle_place_bid(bid(auction.id, carol.id, 40), &db)
        .await
        .expect("입찰 실패");
    assert_eq!(outcome.previous_bidder_id, Some(bob.id));
}

/// 조기 낙찰: 최고 금액 입찰자가 낙찰되고, 재잠금은 거절된다
#[tokio::test]
#[ignore = "DATABASE_URL이 가리키는 PostgreSQL 필요"]
async fn test_lock_auction_picks_highest_bid() {
    let db = setup().await;
    let vendor = create_test_user(&db, "vendor", UserRole::Vendor).await;
    let alice = create_test_user(&db, "alice", UserRole::Customer).await;
    let bob = create_test_user(&db, "bob", UserRole::Customer).await;
    let now = Utc::now();
    let auction = create_test_auction(
        &db,
        vendor.id,
        10,
        AuctionStatus::Active,
        now,
        now + Duration::hours(2),
    )
    .await;

    handle_place_bid(bid(auction.id, alice.id, 20), &db)
        .await
        .expect("입찰 실패");
    handle_place_bid(bid(auction.id, bob.id, 30), &db)
        .await
        .expect("입찰 실패");

    // 소유자가 아니면 거절
    let result = handle_lock_auction(auction.id, alice.id, &db).await;
    assert!(matches!(result, Err(ServiceError::Forbidden)));

    let outcome = handle_lock_auction(auction.id, vendor.id, &db)
        .await
        .expect("조기 낙찰 실패");
    assert_eq!(outcome.winner_id, bob.id);
    assert_eq!(outcome.final_price, 30);

    let locked = reload_auction(&db, auction.id).await;
    assert_eq!(locked.status, AuctionStatus::Sold);
    assert_eq!(locked.winner_user_id, Some(bob.id));
    assert_eq!(locked.locked_price, Some(30));

    // 이미 낙찰된 경매는 다시 잠글 수 없다
    let result = handle_lock_auction(auction.id, vendor.id, &db).await;
    assert!(matches!(result, Err(ServiceError::AlreadyLocked)));

    // 잠긴 경매에는 입찰할 수 없다
    let result = handle_place_bid(bid(auction.id, alice.id, 100), &db).await;
    assert!(matches!(result, Err(ServiceError::AuctionNotActive)));
}

/// 입찰이 없는 경매는 잠글 수 없다
#[tokio::test]
#[ignore = "DATABASE_URL이 가리키는 PostgreSQL 필요"]
async fn test_lock_without_bids_fails() {
    let db = setup().await;
    let vendor = create_test_user(&db, "vendor", UserRole::Vendor).await;
    let now = Utc::now();
    let auction = create_test_auction(
        &db,
        vendor.id,
        10,
        AuctionStatus::Active,
        now,
        now + Duration::hours(2),
    )
    .await;

    let result = handle_lock_auction(auction.id, vendor.id, &db).await;
    assert!(matches!(result, Err(ServiceError::NoBids)));
}

/// 만료 스윕: 입찰 있으면 sold, 없으면 expired, 두 번째 스윕은 0건 처리
#[tokio::test]
#[ignore = "DATABASE_URL이 가리키는 PostgreSQL 필요"]
async fn test_expiry_sweep() {
    let db = setup().await;
    let vendor = create_test_user(&db, "vendor", UserRole::Vendor).await;
    let alice = create_test_user(&db, "alice", UserRole::Customer).await;
    let now = Utc::now();

    // 입찰이 있는 경매(곧 종료)
    let with_bids = create_test_auction(
        &db,
        vendor.id,
        10,
        AuctionStatus::Active,
        now - Duration::hours(1),
        now + Duration::seconds(2),
    )
    .await;
    handle_place_bid(bid(with_bids.id, alice.id, 50), &db)
        .await
        .expect("입찰 실패");

    // 입찰이 없는 경매(이미 종료)
    let without_bids = create_test_auction(
        &db,
        vendor.id,
        10,
        AuctionStatus::Approved,
        now - Duration::hours(2),
        now - Duration::seconds(1),
    )
    .await;

    // 종료 시간 경과 대기
    tokio::time::sleep(tokio::time::Duration::from_secs(3)).await;

    let processed = expire_auctions(&db).await.expect("만료 스윕 실패");
    assert!(processed >= 2);

    let sold = reload_auction(&db, with_bids.id).await;
    assert_eq!(sold.status, AuctionStatus::Sold);
    assert_eq!(sold.winner_user_id, Some(alice.id));
    assert_eq!(sold.locked_price, Some(50));

    let expired = reload_auction(&db, without_bids.id).await;
    assert_eq!(expired.status, AuctionStatus::Expired);
    assert_eq!(expired.winner_user_id, None);
    assert_eq!(expired.locked_price, None);

    // 새 입찰이 없으면 두 번째 스윕은 이 경매들을 다시 처리하지 않는다
    let sold_before = reload_auction(&db, with_bids.id).await;
    expire_auctions(&db).await.expect("만료 스윕 실패");
    let sold_after = reload_auction(&db, with_bids.id).await;
    assert_eq!(sold_before.status, sold_after.status);
    assert_eq!(sold_before.winner_user_id, sold_after.winner_user_id);
}

/// 동시 입찰 직렬화: 최종 현재가는 최고 입찰가, 입찰 행은 성공 건수만큼
#[tokio::test]
#[ignore = "DATABASE_URL이 가리키는 PostgreSQL 필요"]
async fn test_concurrent_bids_serialize() {
    let db = setup().await;
    let vendor = create_test_user(&db, "vendor", UserRole::Vendor).await;
    let alice = create_test_user(&db, "alice", UserRole::Customer).await;
    let bob = create_test_user(&db, "bob", UserRole::Customer).await;
    let carol = create_test_user(&db, "carol", UserRole::Customer).await;
    let now = Utc::now();
    let auction = create_test_auction(
        &db,
        vendor.id,
        10,
        AuctionStatus::Active,
        now,
        now + Duration::hours(2),
    )
    .await;

    handle_place_bid(bid(auction.id, carol.id, 40), &db)
        .await
        .expect("입찰 실패");

    // 50과 60을 거의 동시에 제출
    let db_a = Arc::clone(&db);
    let db_b = Arc::clone(&db);
    let auction_id = auction.id;
    let (result_a, result_b) = tokio::join!(
        tokio::spawn(async move {
            handle_place_bid(bid(auction_id, alice.id, 50), &db_a).await
        }),
        tokio::spawn(async move { handle_place_bid(bid(auction_id, bob.id, 60), &db_b).await }),
    );

    let results = [result_a.unwrap(), result_b.unwrap()];
    let successes = results.iter().filter(|r| r.is_ok()).count();
    // 60이 먼저 커밋되면 50은 LOW_BID로 거절될 수 있다
    assert!(successes >= 1);
    for result in &results {
        if let Err(e) = result {
            assert!(matches!(e, ServiceError::BidTooLow { .. }));
        }
    }

    // 갱신 손실 없음: 최종 현재가는 항상 60
    let updated = reload_auction(&db, auction.id).await;
    assert_eq!(updated.current_bid, Some(60));

    // 수락된 제출 건수만큼만 입찰 행이 존재한다(기존 40 포함)
    assert_eq!(count_bids(&db, auction.id).await, successes as i64 + 1);
}

/// 삭제 규칙: pending/rejected만 삭제 가능, 소유자만 가능
#[tokio::test]
#[ignore = "DATABASE_URL이 가리키는 PostgreSQL 필요"]
async fn test_delete_auction_rules() {
    let db = setup().await;
    let vendor = create_test_user(&db, "vendor", UserRole::Vendor).await;
    let other = create_test_user(&db, "other", UserRole::Vendor).await;
    let now = Utc::now();

    let active = create_test_auction(
        &db,
        vendor.id,
        10,
        AuctionStatus::Active,
        now,
        now + Duration::hours(2),
    )
    .await;
    let result = auction_commands::delete_auction(&db, active.id, vendor.id).await;
    assert!(matches!(result, Err(ServiceError::InvalidState(_))));

    let pending = create_test_auction(
        &db,
        vendor.id,
        10,
        AuctionStatus::Pending,
        now,
        now + Duration::hours(2),
    )
    .await;

    // 소유자가 아니면 거절
    let result = auction_commands::delete_auction(&db, pending.id, other.id).await;
    assert!(matches!(result, Err(ServiceError::Forbidden)));

    let affected = auction_commands::delete_auction(&db, pending.id, vendor.id)
        .await
        .expect("삭제 실패");
    assert_eq!(affected, 1);

    // 존재하지 않는 경매
    let result = auction_commands::delete_auction(&db, pending.id, vendor.id).await;
    assert!(matches!(result, Err(ServiceError::AuctionNotFound)));
}

/// 관리자 상태 전이: pending에서만 승인/거절 가능
#[tokio::test]
#[ignore = "DATABASE_URL이 가리키는 PostgreSQL 필요"]
async fn test_set_status_transitions() {
    let db = setup().await;
    let vendor = create_test_user(&db, "vendor", UserRole::Vendor).await;
    let now = Utc::now();
    let auction = create_test_auction(
        &db,
        vendor.id,
        10,
        AuctionStatus::Pending,
        now,
        now + Duration::hours(2),
    )
    .await;

    auction_commands::set_status(&db, auction.id, AuctionStatus::Approved)
        .await
        .expect("승인 실패");
    let approved = reload_auction(&db, auction.id).await;
    assert_eq!(approved.status, AuctionStatus::Approved);

    // approved에서 pending으로 되돌릴 수 없다
    let result = auction_commands::set_status(&db, auction.id, AuctionStatus::Pending).await;
    assert!(matches!(result, Err(ServiceError::InvalidState(_))));

    // 거절은 pending에서만 가능하다
    let result = auction_commands::set_status(&db, auction.id, AuctionStatus::Rejected).await;
    assert!(matches!(result, Err(ServiceError::InvalidState(_))));
}

/// HTTP 전체 흐름 테스트: 가입 → 경매 등록 → 입찰 → 오류 코드 확인
/// 실행 중인 서버(cargo run)와 데이터베이스가 필요하다.
#[tokio::test]
#[ignore = "localhost:3000에서 실행 중인 서버 필요"]
async fn test_http_register_create_and_bid_flow() {
    let client = reqwest::Client::new();
    let base = "http://localhost:3000";
    let suffix = Uuid::new_v4();

    // 판매자 가입
    let response = client
        .post(format!("{}/api/auth/register", base))
        .json(&serde_json::json!({
            "name": "HTTP 판매자",
            "email": format!("vendor+{}@example.com", suffix),
            "password": "vendor-password",
            "role": "vendor"
        }))
        .send()
        .await
        .expect("가입 요청 실패");
    assert_eq!(response.status(), 201);
    let vendor: serde_json::Value = response.json().await.expect("응답 파싱 실패");
    let vendor_token = vendor["token"].as_str().expect("토큰 없음").to_string();

    // 경매 등록
    let now = Utc::now();
    let response = client
        .post(format!("{}/api/vendor/auctions", base))
        .bearer_auth(&vendor_token)
        .json(&serde_json::json!({
            "item_name": "HTTP 테스트 상품",
            "description": "HTTP 흐름 테스트를 위한 상품입니다.",
            "min_bid": 10,
            "start_time": now,
            "end_time": now + Duration::hours(2)
        }))
        .send()
        .await
        .expect("경매 등록 요청 실패");
    assert_eq!(response.status(), 201);
    let created: serde_json::Value = response.json().await.expect("응답 파싱 실패");
    let auction_id = created["auction"]["id"].as_i64().expect("경매 id 없음");

    // 고객 가입
    let response = client
        .post(format!("{}/api/auth/register", base))
        .json(&serde_json::json!({
            "name": "HTTP 고객",
            "email": format!("customer+{}@example.com", suffix),
            "password": "customer-password",
            "role": "customer"
        }))
        .send()
        .await
        .expect("가입 요청 실패");
    assert_eq!(response.status(), 201);
    let customer: serde_json::Value = response.json().await.expect("응답 파싱 실패");
    let customer_token = customer["token"].as_str().expect("토큰 없음").to_string();

    // 최소 입찰가 이하 입찰은 LOW_BID로 거절
    let response = client
        .post(format!("{}/api/customer/bid", base))
        .bearer_auth(&customer_token)
        .json(&serde_json::json!({ "auction_id": auction_id, "bid_amount": 5 }))
        .send()
        .await
        .expect("입찰 요청 실패");
    assert_eq!(response.status(), 400);
    let error_info: serde_json::Value = response.json().await.expect("응답 파싱 실패");
    assert_eq!(error_info["code"], "LOW_BID");

    // 정상 입찰
    let response = client
        .post(format!("{}/api/customer/bid", base))
        .bearer_auth(&customer_token)
        .json(&serde_json::json!({ "auction_id": auction_id, "bid_amount": 15 }))
        .send()
        .await
        .expect("입찰 요청 실패");
    assert_eq!(response.status(), 200);
    let bid_result: serde_json::Value = response.json().await.expect("응답 파싱 실패");
    assert_eq!(bid_result["current_bid"], 15);

    // 경매 상세에 현재가 반영 확인
    let response = client
        .get(format!("{}/api/auctions/{}", base, auction_id))
        .send()
        .await
        .expect("경매 조회 요청 실패");
    assert_eq!(response.status(), 200);
    let auction: serde_json::Value = response.json().await.expect("응답 파싱 실패");
    assert_eq!(auction["current_bid"], 15);

    // 토큰 없는 입찰은 401
    let response = client
        .post(format!("{}/api/customer/bid", base))
        .json(&serde_json::json!({ "auction_id": auction_id, "bid_amount": 20 }))
        .send()
        .await
        .expect("입찰 요청 실패");
    assert_eq!(response.status(), 401);
}

/// 고객 대시보드 집계 조회
#[tokio::test]
#[ignore = "DATABASE_URL이 가리키는 PostgreSQL 필요"]
async fn test_customer_dashboard_queries() {
    let db = setup().await;
    let vendor = create_test_user(&db, "vendor", UserRole::Vendor).await;
    let alice = create_test_user(&db, "alice", UserRole::Customer).await;
    let bob = create_test_user(&db, "bob", UserRole::Customer).await;
    let now = Utc::now();
    let auction = create_test_auction(
        &db,
        vendor.id,
        10,
        AuctionStatus::Active,
        now,
        now + Duration::hours(2),
    )
    .await;

    handle_place_bid(bid(auction.id, alice.id, 20), &db)
        .await
        .expect("입찰 실패");
    handle_place_bid(bid(auction.id, bob.id, 30), &db)
        .await
        .expect("입찰 실패");
    handle_lock_auction(auction.id, vendor.id, &db)
        .await
        .expect("조기 낙찰 실패");

    let history = query::handlers::get_customer_bid_history(&db, alice.id)
        .await
        .expect("입찰 이력 조회 실패");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].bid_amount, 20);
    assert!(!history[0].is_highest_bid);

    let wins = query::handlers::get_customer_wins(&db, bob.id)
        .await
        .expect("낙찰 내역 조회 실패");
    assert_eq!(wins.len(), 1);
    assert_eq!(wins[0].auction_id, auction.id);
    assert_eq!(wins[0].my_winning_bid, Some(30));

    let stats = query::handlers::get_customer_stats(&db, bob.id)
        .await
        .expect("통계 조회 실패");
    assert_eq!(stats.total_bids_placed, 1);
    assert_eq!(stats.total_wins, 1);

    let stats = query::handlers::get_customer_stats(&db, alice.id)
        .await
        .expect("통계 조회 실패");
    assert_eq!(stats.total_wins, 0);
}
