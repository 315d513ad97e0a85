//! Authentication and authorization core.
//!
//! Pure, transport-agnostic building blocks: bcrypt credential hashing,
//! signed bearer tokens (access/refresh) plus a separately-keyed safe-token
//! scheme for email links, a persistent revocation list, and the request
//! gates that tie them together. HTTP status mapping lives in
//! `crate::error`; handlers only ever see `AuthError` values.

pub mod error;
pub mod gate;
pub mod identity;
pub mod password;
pub mod revocation;
pub mod role;
pub mod token;

pub use error::{AuthError, StorageError};
pub use gate::BearerGate;
pub use identity::IdentityResolver;
pub use revocation::{PgRevocationStore, RevocationStore};
pub use role::RoleGate;
pub use token::{Claims, SafeTokenCodec, TokenCodec, TokenKind};
