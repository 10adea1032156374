//! Plain HTTP routes. Everything else belongs to the relay fallback.

pub mod health;
