//! User management service.
//!
//! Owns the business rules around accounts. Every failure is an [`ApiError`]
//! kind, so the pipeline's classification table covers the whole service
//! surface. Validation rules are injected at construction from
//! configuration, not embedded as process-wide constants.

use chrono::Utc;
use regex::Regex;
use std::sync::Arc;

use crate::auth::password::PasswordHasher;
use crate::config::schema::{BootstrapAdmin, ValidationConfig};
use crate::error::ApiError;
use crate::users::model::{User, UserRequest, UserResponse};
use crate::users::repository::UserRepository;

/// Compiled account validation rules.
pub struct ValidationPolicy {
    email: Regex,
    min_password_length: usize,
    require_letter: bool,
    require_digit: bool,
    require_special: bool,
}

impl ValidationPolicy {
    pub fn from_config(config: &ValidationConfig) -> Result<Self, regex::Error> {
        Ok(Self {
            email: Regex::new(&config.email_pattern)?,
            min_password_length: config.min_password_length,
            require_letter: config.require_letter,
            require_digit: config.require_digit,
            require_special: config.require_special,
        })
    }

    fn check_email(&self, email: &str) -> Result<(), ApiError> {
        if self.email.is_match(email) {
            Ok(())
        } else {
            Err(ApiError::BusinessRule("Invalid email format.".into()))
        }
    }

    fn check_password(&self, plain: &str) -> Result<(), ApiError> {
        let strong = plain.chars().count() >= self.min_password_length
            && (!self.require_letter || plain.chars().any(|c| c.is_alphabetic()))
            && (!self.require_digit || plain.chars().any(|c| c.is_ascii_digit()))
            && (!self.require_special || plain.chars().any(|c| !c.is_alphanumeric()));
        if strong {
            Ok(())
        } else {
            Err(ApiError::BusinessRule(format!(
                "Password must be at least {} characters and include letters, numbers and special characters.",
                self.min_password_length
            )))
        }
    }
}

pub struct UserService {
    repository: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    policy: ValidationPolicy,
}

impl UserService {
    pub fn new(
        repository: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        policy: ValidationPolicy,
    ) -> Self {
        Self {
            repository,
            hasher,
            policy,
        }
    }

    pub async fn list(&self) -> Vec<UserResponse> {
        self.repository
            .all()
            .await
            .iter()
            .map(UserResponse::from)
            .collect()
    }

    pub async fn get(&self, user_id: &str) -> Result<UserResponse, ApiError> {
        match self.repository.find(&user_id.to_uppercase()).await {
            Some(user) => Ok(UserResponse::from(&user)),
            None => Err(ApiError::NotFound(format!(
                "User with ID {user_id} not found."
            ))),
        }
    }

    pub async fn create(&self, request: UserRequest) -> Result<UserResponse, ApiError> {
        let user_id = request.user_id.to_uppercase();
        let email = request.email.to_lowercase();

        let active = self.active_users().await;
        if active.iter().any(|u| u.user_id == user_id) {
            return Err(ApiError::Validation(
                "UserId already exists. Try another one.".into(),
            ));
        }
        if active.iter().any(|u| u.email == email) {
            return Err(ApiError::Validation(
                "E-mail already used by another active user. Try another one.".into(),
            ));
        }
        self.policy.check_email(&email)?;
        self.policy.check_password(&request.password)?;

        let user = User {
            user_id,
            name: request.name,
            email,
            password_hash: self.hasher.hash(&request.password),
            is_active: request.is_active,
            is_admin: request.is_admin,
            created_at: Utc::now(),
            updated_at: None,
        };
        let created = self.repository.insert(user).await;
        Ok(UserResponse::from(&created))
    }

    pub async fn update(&self, request: UserRequest) -> Result<UserResponse, ApiError> {
        let user_id = request.user_id.to_uppercase();
        let email = request.email.to_lowercase();

        let active = self.active_users().await;
        let Some(existing) = active.iter().find(|u| u.user_id == user_id) else {
            return Err(ApiError::NotFound(format!(
                "User with ID {} not found.",
                request.user_id
            )));
        };
        if active
            .iter()
            .any(|u| u.user_id != user_id && u.email == email)
        {
            return Err(ApiError::Validation(
                "E-mail already used by another active user. Try another one.".into(),
            ));
        }
        self.policy.check_email(&email)?;
        self.policy.check_password(&request.password)?;

        let user = User {
            user_id,
            name: request.name,
            email,
            password_hash: self.hasher.hash(&request.password),
            is_active: request.is_active,
            is_admin: request.is_admin,
            created_at: existing.created_at,
            updated_at: Some(Utc::now()),
        };
        let updated = self.repository.update(user).await;
        Ok(UserResponse::from(&updated))
    }

    pub async fn delete(&self, user_id: &str) -> Result<(), ApiError> {
        if self.repository.deactivate(&user_id.to_uppercase()).await {
            Ok(())
        } else {
            Err(ApiError::NotFound(format!(
                "User with ID {user_id} not found."
            )))
        }
    }

    pub async fn validate_credentials(
        &self,
        user_id: &str,
        password: &str,
    ) -> Result<User, ApiError> {
        if let Some(user) = self.repository.find(&user_id.to_uppercase()).await {
            if user.is_active && self.hasher.verify(password, &user.password_hash) {
                return Ok(user);
            }
        }
        Err(ApiError::Unauthorized("User or password invalid.".into()))
    }

    /// Seed the configured administrator account on startup, if absent.
    pub async fn bootstrap(&self, admin: &BootstrapAdmin) {
        let user_id = admin.user_id.to_uppercase();
        if self.repository.find(&user_id).await.is_some() {
            return;
        }
        tracing::info!(user_id = %user_id, "seeding bootstrap administrator");
        self.repository
            .insert(User {
                user_id,
                name: admin.name.clone(),
                email: admin.email.to_lowercase(),
                password_hash: self.hasher.hash(&admin.password),
                is_active: true,
                is_admin: true,
                created_at: Utc::now(),
                updated_at: None,
            })
            .await;
    }

    async fn active_users(&self) -> Vec<User> {
        self.repository
            .all()
            .await
            .into_iter()
            .filter(|u| u.is_active)
            .collect()
    }
}
