/// 인증 처리
/// 1. 회원 가입(비밀번호 해시 후 사용자 생성)
/// 2. 로그인(역할별, 비밀번호 검증)
/// 3. JWT 발급/검증
// region:    --- Imports
use crate::auction::model::User;
use crate::auction::status::UserRole;
use crate::database::DatabaseManager;
use crate::error::ServiceError;
use crate::query;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand::rngs::OsRng;
use axum::http::HeaderMap;
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

// endregion: --- Imports

/// 토큰 유효 기간(초)
const TOKEN_TTL_SECS: i64 = 24 * 60 * 60;

// region:    --- Claims
/// JWT 클레임
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub role: UserRole,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    /// 토큰 주체의 사용자 id
    pub fn user_id(&self) -> Result<Uuid, ServiceError> {
        Uuid::parse_str(&self.sub).map_err(|_| ServiceError::InvalidToken)
    }
}

// endregion: --- Claims

// region:    --- Password
/// 비밀번호 해시(argon2, PHC 문자열)
pub fn hash_password(password: &str) -> Result<String, ServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ServiceError::Internal(format!("비밀번호 해시 실패: {}", e)))
}

/// 비밀번호 검증
pub fn verify_password(password: &str, hash: &str) -> Result<bool, ServiceError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| ServiceError::Internal(format!("비밀번호 해시 파싱 실패: {}", e)))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

// endregion: --- Password

// region:    --- Token
/// JWT 발급(HS256, 24시간 유효)
pub fn issue_token(user: &User, secret: &str) -> Result<String, ServiceError> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: user.id.to_string(),
        email: user.email.clone(),
        role: user.role,
        iat: now,
        exp: now + TOKEN_TTL_SECS,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ServiceError::Internal(format!("토큰 발급 실패: {}", e)))
}

/// JWT 검증
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, ServiceError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
    .map_err(|_| ServiceError::InvalidToken)
}

/// Authorization 헤더에서 Bearer 토큰을 꺼내 검증
pub fn bearer_claims(headers: &HeaderMap, secret: &str) -> Result<Claims, ServiceError> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(ServiceError::InvalidToken)?;
    let token = header
        .strip_prefix("Bearer ")
        .ok_or(ServiceError::InvalidToken)?;
    verify_token(token, secret)
}

// endregion: --- Token

// region:    --- Commands
/// 회원 가입 명령
#[derive(Debug, Deserialize)]
pub struct RegisterCommand {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
}

/// 로그인 명령
#[derive(Debug, Deserialize)]
pub struct LoginCommand {
    pub email: String,
    pub password: String,
}

/// 인증된 사용자 응답(토큰 포함)
#[derive(Debug, Serialize)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub token: String,
}

/// 1. 회원 가입
pub async fn register(
    db: &DatabaseManager,
    cmd: RegisterCommand,
    jwt_secret: &str,
) -> Result<AuthenticatedUser, ServiceError> {
    info!(
        "{:<12} --> 회원 가입 요청: {} ({})",
        "Auth", cmd.email, cmd.role
    );

    if cmd.name.trim().is_empty() || cmd.email.trim().is_empty() || cmd.password.is_empty() {
        return Err(ServiceError::Validation(
            "이름, 이메일, 비밀번호는 필수입니다.".into(),
        ));
    }

    // 동일 이메일/역할 중복 검사
    if query::handlers::find_user_by_email(db, &cmd.email, cmd.role)
        .await?
        .is_some()
    {
        return Err(ServiceError::UserAlreadyExists);
    }

    let password_hash = hash_password(&cmd.password)?;
    let user =
        query::handlers::create_user(db, &cmd.name, &cmd.email, &password_hash, cmd.role).await?;
    let token = issue_token(&user, jwt_secret)?;

    Ok(AuthenticatedUser {
        id: user.id,
        name: user.name,
        email: user.email,
        role: user.role,
        token,
    })
}

/// 2. 로그인
pub async fn login(
    db: &DatabaseManager,
    cmd: LoginCommand,
    role: UserRole,
    jwt_secret: &str,
) -> Result<AuthenticatedUser, ServiceError> {
    info!("{:<12} --> 로그인 요청: {} ({})", "Auth", cmd.email, role);

    if cmd.email.trim().is_empty() || cmd.password.is_empty() {
        return Err(ServiceError::Validation(
            "이메일과 비밀번호는 필수입니다.".into(),
        ));
    }

    let user = query::handlers::find_user_by_email(db, &cmd.email, role)
        .await?
        .ok_or(ServiceError::UserNotFound)?;

    if !verify_password(&cmd.password, &user.password_hash)? {
        return Err(ServiceError::InvalidCredentials);
    }

    let token = issue_token(&user, jwt_secret)?;

    Ok(AuthenticatedUser {
        id: user.id,
        name: user.name,
        email: user.email,
        role: user.role,
        token,
    })
}

// endregion: --- Commands

// endregion: --- Tests
