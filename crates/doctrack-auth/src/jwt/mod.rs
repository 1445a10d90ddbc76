//! JWT token encoding, decoding, and claims management.

pub mod claims;
pub mod decoder;
pub mod encoder;

pub use claims::{PayloadClaims, SignedQuery};
pub use decoder::JwtDecoder;
pub use encoder::JwtEncoder;
