//! User account management: entity, persistence boundary, and the service
//! carrying the business rules. All failures surface as the crate-wide
//! error taxonomy so the pipeline can classify them.

pub mod model;
pub mod repository;
pub mod service;

pub use model::{User, UserRequest, UserResponse};
pub use repository::{MemoryUserRepository, UserRepository};
pub use service::{UserService, ValidationPolicy};
