/// 서비스 설정
/// 모든 값은 환경 변수(또는 .env 파일)에서 읽어온다.
// region:    --- Imports
use crate::auction::status::AuctionStatus;
use std::net::SocketAddr;

// endregion: --- Imports

// region:    --- Config
/// 서비스 전역 설정
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP 서버 바인딩 주소
    pub listen_addr: SocketAddr,
    /// PostgreSQL 접속 URL
    pub database_url: String,
    /// 커넥션 풀 최대 커넥션 수
    pub database_max_connections: u32,
    /// Kafka 브로커 주소
    pub kafka_brokers: String,
    /// JWT 서명 비밀키
    pub jwt_secret: String,
    /// 만료 스윕 실행 간격(초)
    pub sweep_interval_secs: u64,
    /// 신규 경매 승인 정책(true: 관리자 승인 필요, false: 즉시 활성)
    pub require_approval: bool,
}

impl Config {
    /// 환경 변수에서 설정 로드
    /// DATABASE_URL 외에는 모두 기본값이 있다.
    pub fn from_env() -> Result<Self, crate::error::ServiceError> {
        dotenvy::dotenv().ok();

        let listen_addr: SocketAddr = std::env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
            .parse()
            .map_err(|e| {
                crate::error::ServiceError::Config(format!("LISTEN_ADDR 파싱 실패: {}", e))
            })?;

        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| crate::error::ServiceError::Config("DATABASE_URL must be set".into()))?;

        let kafka_brokers =
            std::env::var("KAFKA_BROKERS").unwrap_or_else(|_| "localhost:9092".to_string());

        let jwt_secret =
            std::env::var("JWT_SECRET").unwrap_or_else(|_| "your-default-secret".to_string());

        Ok(Self {
            listen_addr,
            database_url,
            database_max_connections: parse_env("DATABASE_MAX_CONNECTIONS", 5),
            kafka_brokers,
            jwt_secret,
            sweep_interval_secs: parse_env("SWEEP_INTERVAL_SECS", 60),
            require_approval: parse_env_bool("AUCTION_REQUIRE_APPROVAL", false),
        })
    }

    /// 신규 경매의 초기 상태
    pub fn initial_status(&self) -> AuctionStatus {
        if self.require_approval {
            AuctionStatus::Pending
        } else {
            AuctionStatus::Active
        }
    }
}

/// 환경 변수를 T로 파싱. 없거나 잘못된 값이면 기본값 사용
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// 환경 변수를 bool로 파싱("true"/"1"/"false"/"0")
fn parse_env_bool(key: &str, default: bool) -> bool {
    match std::env::var(key).ok().as_deref() {
        Some("true") | Some("TRUE") | Some("1") => true,
        Some("false") | Some("FALSE") | Some("0") => false,
        _ => default,
    }
}

// endregion: --- Config

// endregion: --- Tests
