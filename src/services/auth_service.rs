use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use password_hash::rand_core::OsRng;
use uuid::Uuid;

use crate::{
    db::DbPool,
    dto::auth::{
        Claims, ConfirmEmailRequest, LoginRequest, LoginResponse, RegisterRequest,
        UpdateDetailsRequest,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::User,
    notify,
    response::{ApiResponse, Meta},
};

const MIN_PASSWORD_LEN: usize = 8;

fn hash_password(password: &str) -> AppResult<String> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(hash)
}

pub async fn register_user(pool: &DbPool, payload: RegisterRequest) -> AppResult<ApiResponse<User>> {
    let RegisterRequest {
        first_name,
        last_name,
        email,
        password,
        company,
        position,
        role,
    } = payload;

    for (field, value) in [
        ("first_name", &first_name),
        ("last_name", &last_name),
        ("email", &email),
    ] {
        if value.trim().is_empty() {
            return Err(AppError::Validation(format!("{field} is required")));
        }
    }

    let role = role.unwrap_or_else(|| "buyer".to_string());
    if role != "buyer" && role != "shop" {
        return Err(AppError::Validation(
            "role must be 'buyer' or 'shop'".to_string(),
        ));
    }

    let password_hash = hash_password(&password)?;

    let exist: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
        .bind(email.as_str())
        .fetch_optional(pool)
        .await?;
    if exist.is_some() {
        return Err(AppError::Validation("Email is already taken".to_string()));
    }

    let id = Uuid::new_v4();
    let user: User = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, password_hash, first_name, last_name, company, position, role)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(email.as_str())
    .bind(password_hash)
    .bind(first_name)
    .bind(last_name)
    .bind(company)
    .bind(position)
    .bind(role)
    .fetch_one(pool)
    .await?;

    let key = Uuid::new_v4().simple().to_string();
    sqlx::query("INSERT INTO confirm_email_tokens (id, user_id, key) VALUES ($1, $2, $3)")
        .bind(Uuid::new_v4())
        .bind(user.id)
        .bind(key.as_str())
        .execute(pool)
        .await?;

    if let Err(err) = notify::send_email(
        pool,
        Some(user.id),
        &user.email,
        "Confirm your email",
        &format!("Your confirmation token: {key}"),
    )
    .await
    {
        tracing::warn!(error = %err, "confirmation email failed");
    }

    Ok(ApiResponse::success("User created", user, None))
}

pub async fn confirm_email(
    pool: &DbPool,
    payload: ConfirmEmailRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let token: Option<(Uuid, Uuid)> = sqlx::query_as(
        r#"
        SELECT t.id, t.user_id
        FROM confirm_email_tokens t
        JOIN users u ON u.id = t.user_id
        WHERE u.email = $1 AND t.key = $2
        "#,
    )
    .bind(payload.email.as_str())
    .bind(payload.token.as_str())
    .fetch_optional(pool)
    .await?;

    // A mismatched pair stays indistinguishable from an unknown email.
    let (token_id, user_id) = match token {
        Some(row) => row,
        None => {
            return Err(AppError::Validation(
                "invalid token or email".to_string(),
            ));
        }
    };

    sqlx::query("UPDATE users SET is_active = TRUE WHERE id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;
    sqlx::query("DELETE FROM confirm_email_tokens WHERE id = $1")
        .bind(token_id)
        .execute(pool)
        .await?;

    Ok(ApiResponse::success(
        "Email confirmed",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub async fn login_user(
    pool: &DbPool,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let LoginRequest { email, password } = payload;
    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE email = $1")
        .bind(email.as_str())
        .fetch_optional(pool)
        .await?;

    let user = match user {
        Some(u) => u,
        None => return Err(AppError::Validation("Invalid email or password".into())),
    };

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;

    let argon2 = Argon2::default();
    if argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_err()
    {
        return Err(AppError::Validation("Invalid email or password".into()));
    }

    if !user.is_active {
        return Err(AppError::Forbidden);
    }

    let secret = std::env::var("JWT_SECRET")
        .map_err(|_| AppError::Internal(anyhow::anyhow!("JWT_SECRET is not set")))?;

    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(24))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: user.id.to_string(),
        role: user.role.clone(),
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

    Ok(ApiResponse::success("Logged in", resp, Some(Meta::empty())))
}

pub async fn get_details(pool: &DbPool, user: &AuthUser) -> AppResult<ApiResponse<User>> {
    let details: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(user.user_id)
        .fetch_optional(pool)
        .await?;
    match details {
        Some(u) => Ok(ApiResponse::success("OK", u, Some(Meta::empty()))),
        None => Err(AppError::NotFound),
    }
}

pub async fn update_details(
    pool: &DbPool,
    user: &AuthUser,
    payload: UpdateDetailsRequest,
) -> AppResult<ApiResponse<User>> {
    let password_hash = match payload.password.as_deref() {
        Some(password) => Some(hash_password(password)?),
        None => None,
    };

    let updated: Option<User> = sqlx::query_as(
        r#"
        UPDATE users
        SET first_name = COALESCE($2, first_name),
            last_name = COALESCE($3, last_name),
            company = COALESCE($4, company),
            position = COALESCE($5, position),
            password_hash = COALESCE($6, password_hash)
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(user.user_id)
    .bind(payload.first_name)
    .bind(payload.last_name)
    .bind(payload.company)
    .bind(payload.position)
    .bind(password_hash)
    .fetch_optional(pool)
    .await?;

    match updated {
        Some(u) => Ok(ApiResponse::success("Details updated", u, Some(Meta::empty()))),
        None => Err(AppError::NotFound),
    }
}
