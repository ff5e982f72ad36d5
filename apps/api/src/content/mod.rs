// Portfolio content: the eight display tables, their validation rules,
// and the public + admin HTTP surface over them.

pub mod handlers;
pub mod repository;
pub mod snapshot;
pub mod tables;
pub mod validation;
