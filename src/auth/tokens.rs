//! Opaque bearer-token sessions.
//!
//! Login hands out an opaque token backed by an in-process session table
//! with a TTL. The token format is deliberately unspecified surface: callers
//! treat it as an opaque string, and the identity layer resolves it back to
//! an [`AuthInfo`] on each request.

use dashmap::DashMap;
use std::time::{Duration, Instant};
use uuid::Uuid;

use crate::users::model::User;

/// Resolved caller identity attached to authenticated requests.
#[derive(Debug, Clone)]
pub struct AuthInfo {
    pub user_id: String,
    pub name: String,
    pub is_admin: bool,
}

struct Session {
    info: AuthInfo,
    expires_at: Instant,
}

pub struct TokenIssuer {
    sessions: DashMap<String, Session>,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl,
        }
    }

    /// Issue a fresh token for an authenticated user.
    pub fn issue(&self, user: &User) -> String {
        let token = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());
        self.sessions.insert(
            token.clone(),
            Session {
                info: AuthInfo {
                    user_id: user.user_id.clone(),
                    name: user.name.clone(),
                    is_admin: user.is_admin,
                },
                expires_at: Instant::now() + self.ttl,
            },
        );
        token
    }

    /// Resolve a token to its identity; expired tokens are evicted lazily.
    pub fn validate(&self, token: &str) -> Option<AuthInfo> {
        {
            let session = self.sessions.get(token)?;
            if session.expires_at > Instant::now() {
                return Some(session.info.clone());
            }
        }
        self.sessions.remove(token);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user() -> User {
        User {
            user_id: "ADMIN".into(),
            name: "Admin".into(),
            email: "admin@example.com".into(),
            password_hash: "irrelevant".into(),
            is_active: true,
            is_admin: true,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn issued_tokens_validate_until_expiry() {
        let issuer = TokenIssuer::new(Duration::from_secs(3600));
        let token = issuer.issue(&user());

        let info = issuer.validate(&token).unwrap();
        assert_eq!(info.user_id, "ADMIN");
        assert!(info.is_admin);

        assert!(issuer.validate("not-a-token").is_none());
    }

    #[test]
    fn expired_tokens_are_rejected_and_evicted() {
        let issuer = TokenIssuer::new(Duration::ZERO);
        let token = issuer.issue(&user());

        assert!(issuer.validate(&token).is_none());
        assert!(issuer.sessions.get(&token).is_none());
    }
}
