//! User Repository

use super::{BaseRepository, RepoError, RepoResult, record_id};
use crate::db::models::{OtpPurpose, User, UserStatus, UserUpdate};
use shared::util::now_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "user";

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all users, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<User>> {
        self.base
            .list(TABLE, "", Vec::new(), "ORDER BY createdAt DESC", None)
            .await
    }

    /// Find user by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        self.base.get(TABLE, id).await
    }

    /// Find user by (already normalized) email
    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let email_owned = email.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM user WHERE email = $email LIMIT 1")
            .bind(("email", email_owned))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    /// Create a new user; the email must be unused
    pub async fn create(&self, mut user: User) -> RepoResult<User> {
        if self.find_by_email(&user.email).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Email '{}' already registered",
                user.email
            )));
        }
        let now = now_millis();
        user.id = None;
        user.created_at = now;
        user.updated_at = now;
        self.base.insert(TABLE, user).await
    }

    /// Store a fresh OTP hash, resetting the attempt counter
    pub async fn set_otp(
        &self,
        id: &str,
        otp_hash: String,
        expires_at: i64,
        purpose: OtpPurpose,
    ) -> RepoResult<()> {
        let thing = record_id(TABLE, id)?;
        self.base
            .db()
            .query(
                r#"UPDATE $thing SET
                    otp = $otp,
                    otpExpires = $expires,
                    otpAttempts = 0,
                    otpPurpose = $purpose,
                    passwordResetVerified = false,
                    updatedAt = $now"#,
            )
            .bind(("thing", thing))
            .bind(("otp", otp_hash))
            .bind(("expires", expires_at))
            .bind(("purpose", purpose))
            .bind(("now", now_millis()))
            .await?
            .check()?;
        Ok(())
    }

    /// Remove any pending OTP
    pub async fn clear_otp(&self, id: &str) -> RepoResult<()> {
        let thing = record_id(TABLE, id)?;
        self.base
            .db()
            .query(
                r#"UPDATE $thing SET
                    otp = NONE,
                    otpExpires = NONE,
                    otpAttempts = 0,
                    otpPurpose = NONE,
                    updatedAt = $now"#,
            )
            .bind(("thing", thing))
            .bind(("now", now_millis()))
            .await?
            .check()?;
        Ok(())
    }

    /// Count a wrong OTP submission, returning the new count
    pub async fn increment_otp_attempts(&self, id: &str) -> RepoResult<u32> {
        let thing = record_id(TABLE, id)?;
        let mut result = self
            .base
            .db()
            .query("UPDATE $thing SET otpAttempts += 1 RETURN AFTER")
            .bind(("thing", thing))
            .await?;
        let users: Vec<User> = result.take(0)?;
        users
            .into_iter()
            .next()
            .map(|u| u.otp_attempts)
            .ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))
    }

    /// Mark the email verified and drop the OTP
    pub async fn mark_email_verified(&self, id: &str) -> RepoResult<()> {
        let thing = record_id(TABLE, id)?;
        self.base
            .db()
            .query(
                r#"UPDATE $thing SET
                    verifyEmail = true,
                    otp = NONE,
                    otpExpires = NONE,
                    otpAttempts = 0,
                    otpPurpose = NONE,
                    updatedAt = $now"#,
            )
            .bind(("thing", thing))
            .bind(("now", now_millis()))
            .await?
            .check()?;
        Ok(())
    }

    /// The reset OTP was accepted; `reset_password` may now run once
    pub async fn mark_reset_verified(&self, id: &str) -> RepoResult<()> {
        let thing = record_id(TABLE, id)?;
        self.base
            .db()
            .query(
                r#"UPDATE $thing SET
                    passwordResetVerified = true,
                    otp = NONE,
                    otpExpires = NONE,
                    otpAttempts = 0,
                    updatedAt = $now"#,
            )
            .bind(("thing", thing))
            .bind(("now", now_millis()))
            .await?
            .check()?;
        Ok(())
    }

    /// Store a new password hash and close the reset flow
    pub async fn reset_password(&self, id: &str, password_hash: String) -> RepoResult<()> {
        let thing = record_id(TABLE, id)?;
        self.base
            .db()
            .query(
                r#"UPDATE $thing SET
                    password = $password,
                    passwordResetVerified = false,
                    otp = NONE,
                    otpExpires = NONE,
                    otpAttempts = 0,
                    otpPurpose = NONE,
                    refreshTokenId = NONE,
                    updatedAt = $now"#,
            )
            .bind(("thing", thing))
            .bind(("password", password_hash))
            .bind(("now", now_millis()))
            .await?
            .check()?;
        Ok(())
    }

    /// Record a successful login and the refresh token id it issued
    pub async fn record_login(&self, id: &str, refresh_jti: &str) -> RepoResult<()> {
        let thing = record_id(TABLE, id)?;
        let now = now_millis();
        self.base
            .db()
            .query("UPDATE $thing SET lastLoginDate = $now, refreshTokenId = $jti, updatedAt = $now")
            .bind(("thing", thing))
            .bind(("now", now))
            .bind(("jti", refresh_jti.to_string()))
            .await?
            .check()?;
        Ok(())
    }

    /// Revoke (None) or replace the stored refresh token id
    pub async fn set_refresh_token_id(&self, id: &str, jti: Option<String>) -> RepoResult<()> {
        let thing = record_id(TABLE, id)?;
        self.base
            .db()
            .query("UPDATE $thing SET refreshTokenId = $jti, updatedAt = $now")
            .bind(("thing", thing))
            .bind(("jti", jti))
            .bind(("now", now_millis()))
            .await?
            .check()?;
        Ok(())
    }

    /// Merge profile fields; rejects an email owned by someone else
    pub async fn update_profile(&self, id: &str, mut data: UserUpdate) -> RepoResult<User> {
        if let Some(email) = &data.email
            && let Some(owner) = self.find_by_email(email).await?
            && owner.id_string() != record_id(TABLE, id)?.to_string()
        {
            return Err(RepoError::Duplicate(format!(
                "Email '{}' already registered",
                email
            )));
        }
        data.updated_at = now_millis();
        self.base
            .merge(TABLE, id, data)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))
    }

    pub async fn set_avatar(&self, id: &str, avatar: String) -> RepoResult<()> {
        let thing = record_id(TABLE, id)?;
        self.base
            .db()
            .query("UPDATE $thing SET avatar = $avatar, updatedAt = $now")
            .bind(("thing", thing))
            .bind(("avatar", avatar))
            .bind(("now", now_millis()))
            .await?
            .check()?;
        Ok(())
    }

    pub async fn set_status(&self, id: &str, status: UserStatus) -> RepoResult<User> {
        self.base
            .merge(
                TABLE,
                id,
                serde_json::json!({ "status": status, "updatedAt": now_millis() }),
            )
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))
    }

    /// Hard delete a user, returning the removed document
    pub async fn delete(&self, id: &str) -> RepoResult<Option<User>> {
        self.base.remove(TABLE, id).await
    }

    pub async fn delete_many(&self, ids: &[String]) -> RepoResult<Vec<User>> {
        self.base.remove_many(TABLE, ids).await
    }

    pub async fn count_all(&self) -> RepoResult<u64> {
        self.base.count(TABLE, "", Vec::new()).await
    }

    /// Creation timestamps of every user, for the monthly report
    pub async fn created_timestamps(&self) -> RepoResult<Vec<i64>> {
        let mut result = self
            .base
            .db()
            .query("SELECT VALUE createdAt FROM user")
            .await?;
        let stamps: Vec<Option<i64>> = result.take(0)?;
        Ok(stamps.into_iter().flatten().collect())
    }
}
