//! Domain layer for the `AuthN` module.

pub mod authenticator;
pub mod identifier;
pub mod realm_storage;

pub use authenticator::{Authenticator, IdentifierFactory};
pub use identifier::Identifier;
pub use realm_storage::RealmStorage;
