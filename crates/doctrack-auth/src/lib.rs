//! # doctrack-auth
//!
//! Token handling shared with the document service.
//!
//! ## Modules
//!
//! - `jwt`: HS256 signing and verification of tokens
//! - `callback`: locating and verifying the token of an inbound callback

pub mod callback;
pub mod jwt;

pub use callback::{CallbackAuthenticator, TrustedCallback, bearer_token};
pub use jwt::{JwtDecoder, JwtEncoder, PayloadClaims, SignedQuery};
