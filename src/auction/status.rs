/// 경매 생명주기 상태 머신
/// pending → approved | rejected
/// approved | active → sold | expired
/// sold, expired, rejected는 종단 상태이다.
// region:    --- Imports
use serde::{Deserialize, Serialize};

// endregion: --- Imports

// region:    --- Auction Status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "auction_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AuctionStatus {
    Pending,
    Approved,
    Active,
    Rejected,
    Sold,
    Expired,
}

impl AuctionStatus {
    /// 입찰을 받을 수 있는 상태인지
    pub fn is_biddable(self) -> bool {
        matches!(self, Self::Approved | Self::Active)
    }

    /// 더 이상 전이할 수 없는 종단 상태인지
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Sold | Self::Expired | Self::Rejected)
    }

    /// 삭제 가능한 상태인지(입찰을 받은 적 없는 상태만)
    pub fn is_deletable(self) -> bool {
        matches!(self, Self::Pending | Self::Rejected)
    }

    /// 상태 전이 가능 여부
    pub fn can_transition_to(self, next: AuctionStatus) -> bool {
        match self {
            Self::Pending => matches!(next, Self::Approved | Self::Rejected),
            Self::Approved | Self::Active => matches!(next, Self::Sold | Self::Expired),
            Self::Sold | Self::Expired | Self::Rejected => false,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Active => "active",
            Self::Rejected => "rejected",
            Self::Sold => "sold",
            Self::Expired => "expired",
        }
    }
}

impl std::fmt::Display for AuctionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// endregion: --- Auction Status

// region:    --- User Role
/// 사용자 역할
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Customer,
    Vendor,
    Admin,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Vendor => "vendor",
            Self::Admin => "admin",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// endregion: --- User Role

// endregion: --- Tests
