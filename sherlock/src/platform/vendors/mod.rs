//! Built-in vendor platforms.

pub mod arista;
pub mod cisco;
