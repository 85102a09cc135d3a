//! Session issuance: credential check and token pair minting.

pub mod issuer;

pub use issuer::{AuthError, SessionIssuer, INVALID_CREDENTIALS};
