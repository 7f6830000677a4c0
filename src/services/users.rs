//! Authentication and user management service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::{
    config::{AdminConfig, AuthConfig},
    error::{AppError, AppResult},
    models::{
        issue::IssueRecordDetails,
        user::{Role, User, UserClaims},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: AuthConfig,
}

impl UsersService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Register a new reader account
    pub async fn register(&self, name: &str, email: &str, password: &str) -> AppResult<User> {
        if self.repository.users.email_exists(email, None).await? {
            return Err(AppError::Conflict(format!("Email {} is already registered", email)));
        }

        let password_hash = hash_password(password)?;
        let user = self
            .repository
            .users
            .create(name.trim(), email, &password_hash, Role::User)
            .await?;

        tracing::info!("Registered user id={} email={}", user.id, user.email);
        Ok(user)
    }

    /// Create the configured administrator unless the email is already taken
    pub async fn ensure_admin(&self, admin: &AdminConfig) -> AppResult<()> {
        if self.repository.users.email_exists(&admin.email, None).await? {
            tracing::debug!("Bootstrap admin {} already exists", admin.email);
            return Ok(());
        }

        let password_hash = hash_password(&admin.password)?;
        let user = self
            .repository
            .users
            .create(admin.name.trim(), &admin.email, &password_hash, Role::Admin)
            .await?;

        tracing::info!("Created bootstrap admin id={} email={}", user.id, user.email);
        Ok(())
    }

    /// Authenticate by email and password, returning a JWT token and the user
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<(String, User)> {
        let user = self
            .repository
            .users
            .get_by_email(email)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid email or password".to_string()))?;

        if !verify_password(&user, password)? {
            return Err(AppError::Authentication("Invalid email or password".to_string()));
        }

        let token = self.create_token_for_user(&user)?;
        Ok((token, user))
    }

    /// Create JWT token for a user
    fn create_token_for_user(&self, user: &User) -> AppResult<String> {
        UserClaims::for_user(user, self.config.jwt_expiration_hours)
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Load the user behind a validated token.
    ///
    /// Looked up by id, so a session survives its owner changing email.
    pub async fn resolve_caller(&self, claims: &UserClaims) -> AppResult<User> {
        match self.repository.users.get_by_id(claims.user_id).await {
            Err(AppError::NotFound(_)) => Err(AppError::Authentication("User no longer exists".to_string())),
            result => result,
        }
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }

    /// List all users
    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        self.repository.users.list().await
    }

    /// Issue history of a user
    pub async fn user_issues(&self, caller: &User) -> AppResult<Vec<IssueRecordDetails>> {
        self.repository.issues.list_details_for_user(caller.id).await
    }

    /// Update own name and email
    pub async fn update_profile(&self, caller: &User, name: &str, email: &str) -> AppResult<User> {
        if self.repository.users.email_exists(email, Some(caller.id)).await? {
            return Err(AppError::Conflict(format!("Email {} is already registered", email)));
        }

        self.repository.users.update_profile(caller.id, name.trim(), email).await
    }

    /// Change own password after checking the current one
    pub async fn change_password(&self, caller: &User, current_password: &str, new_password: &str) -> AppResult<()> {
        if !verify_password(caller, current_password)? {
            return Err(AppError::Authentication("Current password is incorrect".to_string()));
        }

        let password_hash = hash_password(new_password)?;
        self.repository.users.update_password(caller.id, &password_hash).await
    }

    /// Update a user's role (admin only)
    pub async fn update_role(&self, user_id: i64, role: Role) -> AppResult<User> {
        let user = self.repository.users.update_role(user_id, role).await?;
        tracing::info!("User id={} role set to {}", user.id, user.role);
        Ok(user)
    }

    /// Delete a user and everything that references them
    pub async fn delete_user(&self, user_id: i64) -> AppResult<()> {
        self.repository.users.delete(user_id).await?;
        tracing::info!("Deleted user id={}", user_id);
        Ok(())
    }
}

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Verify a password against the user's stored hash
pub fn verify_password(user: &User, password: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(&user.password)
        .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
