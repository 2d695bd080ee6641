//! Request middleware.

pub mod owner;
