// Real-time change notification for the public site and admin dashboard.
// Writers never publish directly; every change arrives through the database trigger.

pub mod feed;
pub mod handlers;

pub use feed::{ChangeEvent, ChangeFeed, FeedMessage};
