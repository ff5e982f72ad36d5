//! Vector page layout for the resume PDF: Helvetica metrics, line wrapping and
//! a continuous column sliced into A4 pages.

pub mod flow;
pub mod font_metrics;

pub use flow::{paginate, Column, ColumnBuilder, Frame, Item, Page, Rule, Style, TextRun};
pub use font_metrics::{a4_page_config, to_builtin_charset, FontFamily, PageConfig};
