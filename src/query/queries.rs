/// 모든 경매 조회(낙찰자 이름 조인)
pub const GET_ALL_AUCTIONS: &str = r#"
    SELECT a.*, u.name AS winner_name
    FROM auctions a
    LEFT JOIN users u ON a.winner_user_id = u.id
    ORDER BY a.id DESC
"#;

/// 진행 중 경매 조회(메인 페이지용: 입찰 가능 상태이고 아직 종료되지 않음)
pub const GET_ACTIVE_AUCTIONS: &str = r#"
    SELECT a.*, u.name AS winner_name
    FROM auctions a
    LEFT JOIN users u ON a.winner_user_id = u.id
    WHERE a.status IN ('active', 'approved') AND a.end_time > $1
    ORDER BY a.end_time ASC
"#;

/// 경매 단건 조회
pub const GET_AUCTION_BY_ID: &str = r#"
    SELECT a.*, u.name AS winner_name
    FROM auctions a
    LEFT JOIN users u ON a.winner_user_id = u.id
    WHERE a.id = $1
"#;

/// 판매자의 경매 목록 조회
pub const GET_AUCTIONS_BY_VENDOR: &str = r#"
    SELECT a.*, u.name AS winner_name
    FROM auctions a
    LEFT JOIN users u ON a.winner_user_id = u.id
    WHERE a.vendor_id = $1
    ORDER BY a.id DESC
"#;

/// 경매 입찰 이력 조회(금액 내림차순, 입찰자 이름 조인)
pub const GET_BIDS_BY_AUCTION: &str = r#"
    SELECT b.bid_amount, b.created_at, u.name AS bidder_name
    FROM bids b
    JOIN users u ON b.user_id = u.id
    WHERE b.auction_id = $1
    ORDER BY b.bid_amount DESC
"#;

/// 사용자 조회(이메일 + 역할)
pub const FIND_USER_BY_EMAIL: &str = r#"
    SELECT id, name, email, password_hash, role
    FROM users
    WHERE email = $1 AND role = $2
    LIMIT 1
"#;

/// 사용자 생성
pub const CREATE_USER: &str = r#"
    INSERT INTO users (id, name, email, password_hash, role)
    VALUES ($1, $2, $3, $4, $5)
    RETURNING id, name, email, password_hash, role
"#;

/// 고객 입찰 이력 조회(경매/판매자 정보와 최고 입찰 여부 포함)
pub const GET_CUSTOMER_BID_HISTORY: &str = r#"
    SELECT
        b.id AS bid_id,
        b.bid_amount,
        b.created_at AS bid_time,
        a.id AS auction_id,
        a.item_name,
        a.description,
        a.image_url,
        a.min_bid,
        a.current_bid,
        a.locked_price,
        a.status,
        a.end_time,
        a.winner_user_id,
        v.name AS vendor_name,
        (SELECT MAX(b2.bid_amount) FROM bids b2 WHERE b2.auction_id = a.id) AS highest_bid,
        (b.bid_amount = (SELECT MAX(b3.bid_amount) FROM bids b3 WHERE b3.auction_id = a.id)) AS is_highest_bid
    FROM bids b
    INNER JOIN auctions a ON b.auction_id = a.id
    INNER JOIN users v ON a.vendor_id = v.id
    WHERE b.user_id = $1
    ORDER BY b.created_at DESC
"#;

/// 고객 낙찰 내역 조회
pub const GET_CUSTOMER_WINS: &str = r#"
    SELECT
        a.id AS auction_id,
        a.item_name,
        a.description,
        a.image_url,
        a.locked_price,
        a.current_bid,
        a.end_time,
        a.status,
        v.name AS vendor_name,
        v.email AS vendor_email,
        (SELECT bid_amount FROM bids
         WHERE auction_id = a.id AND user_id = $1
         ORDER BY bid_amount DESC LIMIT 1) AS my_winning_bid
    FROM auctions a
    INNER JOIN users v ON a.vendor_id = v.id
    WHERE a.winner_user_id = $1 AND a.status = 'sold'
    ORDER BY a.end_time DESC
"#;

/// 고객 활동 통계 조회
pub const GET_CUSTOMER_STATS: &str = r#"
    SELECT
        COUNT(DISTINCT b.auction_id) AS total_auctions_participated,
        COUNT(DISTINCT b.id) AS total_bids_placed,
        (SELECT COUNT(*) FROM auctions
         WHERE winner_user_id = $1 AND status = 'sold') AS total_wins
    FROM bids b
    WHERE b.user_id = $1
"#;
