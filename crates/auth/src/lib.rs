//! `stocktake-auth`: users, roles and credential checks.
//!
//! This crate is decoupled from HTTP and storage; the user directory that
//! persists accounts lives in infra.

pub mod authorize;
pub mod password;
pub mod roles;
pub mod user;

pub use authorize::{AuthzError, require_admin};
pub use password::{PasswordError, hash_password, verify_password};
pub use roles::Role;
pub use user::{NewUser, User, UserProfile};
