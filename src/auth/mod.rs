//! Authentication collaborators: password hashing and bearer-token
//! sessions. Token issuance and credential verification are boundaries the
//! observability pipeline treats as opaque; only the resolved identity
//! matters to the audit trail.

pub mod password;
pub mod tokens;

pub use password::{PasswordHasher, Sha256PasswordHasher};
pub use tokens::{AuthInfo, TokenIssuer};
