//! Dashboard View-Models
//!
//! Rendering-framework-free state for the role dashboards.
//!
//! - [`nav`]: sidebar navigation shell (open/mobile state, tab requests, logout)
//! - [`dashboard`]: per-role layout, loading/error/ready panels with refetch
//! - [`widgets`]: fetched records mapped to label/value rows with placeholders

pub mod dashboard;
pub mod nav;
pub mod widgets;

pub use dashboard::{DashboardKind, Panel, RenderedView, ViewState};
pub use nav::{NavEffect, NavEvent, NavItem, NavigationShell, MOBILE_BREAKPOINT};
pub use widgets::{DisplayProfile, PartialProfile, WidgetRow, WidgetView, NOT_PROVIDED, NOT_SET};
