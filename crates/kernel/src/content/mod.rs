//! Content management: static pages and the sidebar widget.

pub mod error;
pub mod page_service;
pub mod sidebar_service;
pub mod slug;
pub mod validation;

pub use error::{ContentError, ContentResult, FieldError};
pub use page_service::{MenuEntry, PageInput, PageService};
pub use sidebar_service::SidebarService;
