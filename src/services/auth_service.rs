use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use password_hash::rand_core::OsRng;
use sqlx::FromRow;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    commission::PLATFORM_RATE_BPS,
    db::DbPool,
    dto::auth::{Claims, LoginRequest, LoginResponse, RegisterRequest},
    error::{AppError, AppResult},
    models::{AccountStatus, User, UserRole},
    response::{ApiResponse, Meta},
};

#[derive(FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    password_hash: String,
    full_name: String,
    phone: Option<String>,
    user_type: String,
    business_name: Option<String>,
    address: Option<String>,
    city: Option<String>,
    pincode: Option<String>,
    commission_rate_bps: i32,
    status: String,
    is_verified: bool,
    created_at: DateTime<Utc>,
}

pub async fn register_user(
    pool: &DbPool,
    payload: RegisterRequest,
) -> AppResult<ApiResponse<User>> {
    if payload.user_type == UserRole::Admin {
        return Err(AppError::BadRequest(
            "admin accounts cannot self-register".to_string(),
        ));
    }

    let exist: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
        .bind(payload.email.as_str())
        .fetch_optional(pool)
        .await?;

    if exist.is_some() {
        return Err(AppError::BadRequest("Email is already taken".to_string()));
    }

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(payload.password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();

    let id = Uuid::new_v4();

    let row: UserRow = sqlx::query_as(
        r#"
        INSERT INTO users
            (id, email, password_hash, full_name, phone, user_type, business_name, commission_rate_bps)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(payload.email.as_str())
    .bind(password_hash)
    .bind(payload.full_name.as_str())
    .bind(payload.phone.as_deref())
    .bind(payload.user_type.as_str())
    .bind(payload.business_name.as_deref())
    .bind(PLATFORM_RATE_BPS)
    .fetch_one(pool)
    .await?;

    let user = user_from_row(row)?;

    if let Err(err) = log_audit(
        pool,
        Some(user.id),
        "user_register",
        Some("users"),
        Some(serde_json::json!({ "user_id": user.id, "user_type": user.user_type })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }
    Ok(ApiResponse::success("User created", user, None))
}

pub async fn login_user(
    pool: &DbPool,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let LoginRequest { email, password } = payload;
    let row: Option<UserRow> = sqlx::query_as("SELECT * FROM users WHERE email = $1")
        .bind(email.as_str())
        .fetch_optional(pool)
        .await?;

    let row = match row {
        Some(r) => r,
        None => return Err(AppError::BadRequest("Invalid email or password".into())),
    };

    let parsed_hash = PasswordHash::new(&row.password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;

    let argon2 = Argon2::default();
    if argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_err()
    {
        return Err(AppError::BadRequest("Invalid email or password".into()));
    }

    let user = user_from_row(row)?;

    if user.status != AccountStatus::Active {
        return Err(AppError::Forbidden);
    }

    let secret = std::env::var("JWT_SECRET")
        .map_err(|_| AppError::Internal(anyhow::anyhow!("JWT_SECRET is not set")))?;

    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(24))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: user.id.to_string(),
        role: user.user_type,
        exp: expiration.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;

    let resp = LoginResponse {
        token: format!("Bearer {}", token),
    };

    if let Err(err) = log_audit(
        pool,
        Some(user.id),
        "user_login",
        Some("users"),
        Some(serde_json::json!({ "user_id": user.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success("Logged in", resp, Some(Meta::empty())))
}

fn user_from_row(row: UserRow) -> AppResult<User> {
    let user_type: UserRole = row
        .user_type
        .parse()
        .map_err(|e: String| AppError::Internal(anyhow::anyhow!(e)))?;
    let status = match row.status.as_str() {
        "active" => AccountStatus::Active,
        "inactive" => AccountStatus::Inactive,
        "suspended" => AccountStatus::Suspended,
        other => {
            return Err(AppError::Internal(anyhow::anyhow!(
                "unknown account status: {other}"
            )));
        }
    };

    Ok(User {
        id: row.id,
        email: row.email,
        full_name: row.full_name,
        phone: row.phone,
        user_type,
        business_name: row.business_name,
        address: row.address,
        city: row.city,
        pincode: row.pincode,
        commission_rate_bps: row.commission_rate_bps,
        status,
        is_verified: row.is_verified,
        created_at: row.created_at,
    })
}
