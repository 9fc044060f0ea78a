//! Accounts Module
//!
//! Registration, credential checks and bearer tokens.

mod password;
mod store;
mod token;

pub use password::{Credential, DEFAULT_HASH_ROUNDS};
pub use store::{Account, AccountProfile, AccountStore, InMemoryAccountStore, NewAccount};
pub use token::{Claims, TokenError, TokenService};
