use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// 상위 입찰 발생 알림 이벤트
// 입찰 성공 후 직전 입찰자가 새 입찰자와 다를 때만 발행된다.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OutbidNotification {
    pub auction_id: i64,
    pub outbid_user_id: Uuid,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl OutbidNotification {
    pub fn new(auction_id: i64, outbid_user_id: Uuid) -> Self {
        Self {
            auction_id,
            outbid_user_id,
            message: format!("경매 {}에서 더 높은 입찰이 등록되었습니다!", auction_id),
            timestamp: Utc::now(),
        }
    }
}
