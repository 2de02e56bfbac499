// region:    --- Imports
use auction_marketplace::config::Config;
use auction_marketplace::database::DatabaseManager;
use auction_marketplace::handlers::{self, AppState};
use auction_marketplace::message_broker::{KafkaManager, NOTIFICATIONS_TOPIC};
use auction_marketplace::scheduler::AuctionScheduler;
use axum::routing::{delete, get, patch, post};
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

// endregion: --- Imports

// region:    --- Main
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // logging 초기화
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .without_time()
        .with_target(false)
        .init();

    // 설정 로드(한 번 로드해서 아래 구성 요소에 주입)
    let config = Arc::new(Config::from_env()?);

    // DatabaseManager 생성
    let db_manager = Arc::new(DatabaseManager::new(&config).await?);

    // 데이터베이스 초기화
    if let Err(e) = db_manager.initialize_database().await {
        error!("{:<12} --> 데이터베이스 초기화 실패: {:?}", "Main", e);
        return Err(e.into());
    }
    info!("{:<12} --> 데이터베이스 초기화 성공", "Main");

    // Kafka 매니저 생성 및 알림 토픽 생성
    let kafka_manager = KafkaManager::new(&config.kafka_brokers)?;
    kafka_manager.create_topic(NOTIFICATIONS_TOPIC, 5, 1).await?;
    info!("{:<12} --> Kafka 초기화 성공", "Main");

    // 만료 스케줄러 시작(시작 시 1회 + 고정 간격)
    let scheduler = AuctionScheduler::new(
        Arc::clone(&db_manager),
        Duration::from_secs(config.sweep_interval_secs),
    );
    let scheduler_handle = scheduler.start();

    // 테스트 페이지를 위한 cors 설정
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // 핸들러 공유 상태
    let state = AppState {
        db: Arc::clone(&db_manager),
        notifier: kafka_manager.get_producer(),
        config: Arc::clone(&config),
    };

    // 라우터 설정
    let routes_all = Router::new()
        .route("/", get(handlers::handle_health))
        .route("/api/auth/register", post(handlers::handle_register))
        .route("/api/auth/login/:role", post(handlers::handle_login))
        .route("/api/auctions", get(handlers::handle_get_auctions))
        .route(
            "/api/auctions/active",
            get(handlers::handle_get_active_auctions),
        )
        .route("/api/auctions/:id", get(handlers::handle_get_auction))
        .route(
            "/api/auctions/:id/bids",
            get(handlers::handle_get_auction_bids),
        )
        .route(
            "/api/vendor/auctions",
            post(handlers::handle_create_auction).get(handlers::handle_get_vendor_auctions),
        )
        .route(
            "/api/vendor/auctions/:id",
            delete(handlers::handle_delete_auction),
        )
        .route("/api/vendor/auctions/:id/lock", post(handlers::handle_lock))
        .route("/api/customer/bid", post(handlers::handle_bid))
        .route(
            "/api/customer/:customer_id/bid-history",
            get(handlers::handle_customer_bid_history),
        )
        .route(
            "/api/customer/:customer_id/wins",
            get(handlers::handle_customer_wins),
        )
        .route(
            "/api/customer/:customer_id/stats",
            get(handlers::handle_customer_stats),
        )
        .route(
            "/api/admin/auctions/:id/status",
            patch(handlers::handle_set_status),
        )
        .layer(cors)
        .with_state(state);

    // 리스너 생성
    let listener = TcpListener::bind(config.listen_addr).await?;
    info!(
        "{:<12} --> Web Server: Listening on {}",
        "Main",
        listener.local_addr()?
    );

    // 서버 실행(Ctrl-C에서 정리 종료)
    if let Err(err) = axum::serve(listener, routes_all.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("{:<12} --> Server error: {}", "Main", err);
    }

    // 스케줄러와 풀 정리
    scheduler_handle.shutdown().await;
    db_manager.close().await;
    info!("{:<12} --> 서비스 종료", "Main");
    Ok(())
}

/// Ctrl-C 수신 대기
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("{:<12} --> 종료 시그널 수신 실패: {:?}", "Main", e);
    }
}
// endregion: --- Main
