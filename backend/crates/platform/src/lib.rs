//! Platform Crate - Technical Infrastructure
//!
//! Shared technical capabilities with no domain knowledge:
//! - Cryptographic utilities (random tokens, SHA-256, Base64)
//! - Password hashing (Argon2id)
//! - Cookie management
//! - Outbound mail

pub mod cookie;
pub mod crypto;
pub mod mail;
pub mod password;
