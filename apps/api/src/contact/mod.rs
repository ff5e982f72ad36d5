//! Visitor contact form and the admin inbox behind it.

pub mod handlers;
pub mod store;
