//! HTTP handlers.
//!
//! Handlers return `Result<_, ApiError>`; failures ride the response as an
//! extension until the classification layer renders them, so a handler
//! never builds an error body itself.

pub mod auth;
pub mod docs;
pub mod health;
pub mod users;

use crate::auth::tokens::AuthInfo;
use crate::error::ApiError;
use crate::http::middleware::identity::CallerIdentity;

/// Gate for administrator-only endpoints.
pub fn require_admin(identity: &CallerIdentity) -> Result<&AuthInfo, ApiError> {
    let info = identity
        .0
        .as_ref()
        .ok_or_else(|| ApiError::Unauthorized("Invalid Token, not Authenticated.".into()))?;
    if !info.is_admin {
        return Err(ApiError::Unauthorized(
            "Access Denied! You do not have permission to perform this operation.".into(),
        ));
    }
    Ok(info)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_and_non_admin_callers_are_rejected() {
        assert!(require_admin(&CallerIdentity(None)).is_err());

        let member = CallerIdentity(Some(AuthInfo {
            user_id: "BOB".into(),
            name: "Bob".into(),
            is_admin: false,
        }));
        assert!(require_admin(&member).is_err());

        let admin = CallerIdentity(Some(AuthInfo {
            user_id: "ADMIN".into(),
            name: "Admin".into(),
            is_admin: true,
        }));
        assert_eq!(require_admin(&admin).unwrap().user_id, "ADMIN");
    }
}
