//! Database models.

pub mod page;
pub mod sidebar;

pub use page::{NewPage, Page, PageChanges};
pub use sidebar::{SIDEBAR_ID, Sidebar};
