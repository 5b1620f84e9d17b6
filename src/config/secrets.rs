//! Secret handling utilities.
//!
//! Re-exports secrecy types used for broker and counter-store
//! connection URLs.

pub use secrecy::{ExposeSecret, SecretBox, SecretString};
