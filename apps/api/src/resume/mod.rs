//! Resume generator: aggregates the portfolio, renders a standalone HTML
//! document for preview and a paginated A4 PDF for download.

pub mod contact;
pub mod document;
#[cfg(test)]
pub mod fixtures;
pub mod handlers;
pub mod html;
pub mod pdf;

/// Only the first projects by `order_index` make it onto the resume.
pub const MAX_RESUME_PROJECTS: usize = 4;
