//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (HMAC-SHA256, Base64, random bytes)
//! - Password hashing (Argon2id, salted, constant-time verification)
//! - Cookie management (attributes + tamper-evident signed envelope)

pub mod cookie;
pub mod crypto;
pub mod password;
