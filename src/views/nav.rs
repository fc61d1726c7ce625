//! Navigation Shell
//!
//! Sidebar state for the dashboards. Nothing here outlives the view: the
//! shell holds whether the sidebar is expanded and whether the viewport is
//! mobile-sized. The active tab belongs to the parent, so selecting an item
//! only produces a [`NavEffect::TabChange`] request.

use super::dashboard::DashboardKind;
use crate::session::SessionContext;

/// Viewports narrower than this are treated as mobile
pub const MOBILE_BREAKPOINT: u32 = 768;

/// One sidebar entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    pub key: &'static str,
    pub label: &'static str,
}

impl NavItem {
    pub const fn new(key: &'static str, label: &'static str) -> Self {
        Self { key, label }
    }
}

/// Input to the shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavEvent {
    /// Viewport width changed
    Resize(u32),
    /// Hamburger / collapse button
    Toggle,
    /// A navigation item was clicked
    Select(String),
    Logout,
    /// Pointer down outside the sidebar
    ClickOutside,
}

/// Requests the shell sends upward
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavEffect {
    TabChange(String),
    Navigate(String),
}

#[derive(Debug, Clone)]
pub struct NavigationShell {
    is_open: bool,
    is_mobile: bool,
    active_tab: String,
    items: Vec<NavItem>,
}

impl NavigationShell {
    /// Shell for a dashboard at the given initial viewport width
    pub fn new(kind: DashboardKind, width: u32) -> Self {
        let is_mobile = width < MOBILE_BREAKPOINT;
        Self {
            is_open: !is_mobile,
            is_mobile,
            active_tab: kind.default_tab().to_string(),
            items: kind.nav_items().to_vec(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn is_mobile(&self) -> bool {
        self.is_mobile
    }

    pub fn active_tab(&self) -> &str {
        &self.active_tab
    }

    pub fn items(&self) -> &[NavItem] {
        &self.items
    }

    /// Parent pushes its tab down after accepting a `TabChange`
    pub fn set_active_tab(&mut self, key: impl Into<String>) {
        self.active_tab = key.into();
    }

    pub fn handle(&mut self, event: NavEvent, session: &mut SessionContext) -> Option<NavEffect> {
        match event {
            NavEvent::Resize(width) => {
                self.resize(width);
                None
            }
            NavEvent::Toggle => {
                self.is_open = !self.is_open;
                None
            }
            NavEvent::Select(key) => {
                if !self.items.iter().any(|item| item.key == key) {
                    tracing::debug!(key = %key, "Ignoring unknown navigation item");
                    return None;
                }
                if self.is_mobile {
                    self.is_open = false;
                }
                Some(NavEffect::TabChange(key))
            }
            NavEvent::Logout => {
                let route = session.logout();
                Some(NavEffect::Navigate(route.to_string()))
            }
            NavEvent::ClickOutside => {
                if self.is_open && self.is_mobile {
                    self.is_open = false;
                }
                None
            }
        }
    }

    fn resize(&mut self, width: u32) {
        let was_mobile = self.is_mobile;
        self.is_mobile = width < MOBILE_BREAKPOINT;

        // Only band crossings touch is_open
        match (was_mobile, self.is_mobile) {
            (false, true) => self.is_open = false,
            (true, false) => self.is_open = true,
            _ => {}
        }
    }
}
