//! Role Dashboards
//!
//! Each dashboard panel shows fetched data in one of three states. Panels
//! never fetch on their own; the caller hands in a refetch callback and the
//! panel just drives it.

use std::future::Future;

use super::nav::NavItem;
use super::widgets::WidgetView;
use crate::model::UserRole;

/// Which dashboard a user lands on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardKind {
    SuperAdmin,
    Admin,
    TeamLeader,
    TeamMember,
}

const SUPER_ADMIN_ITEMS: &[NavItem] = &[
    NavItem::new("overview", "Overview"),
    NavItem::new("admins", "Admins"),
    NavItem::new("teams", "Teams"),
    NavItem::new("results", "Results"),
    NavItem::new("payments", "Payments"),
];

const ADMIN_ITEMS: &[NavItem] = &[
    NavItem::new("overview", "Overview"),
    NavItem::new("teams", "Teams"),
    NavItem::new("results", "Results"),
    NavItem::new("payments", "Payments"),
];

const LEADER_ITEMS: &[NavItem] = &[
    NavItem::new("overview", "Overview"),
    NavItem::new("team", "My Team"),
    NavItem::new("payment", "Payment"),
    NavItem::new("results", "Results"),
    NavItem::new("profile", "Profile"),
];

const MEMBER_ITEMS: &[NavItem] = &[
    NavItem::new("overview", "Overview"),
    NavItem::new("team", "My Team"),
    NavItem::new("results", "Results"),
    NavItem::new("profile", "Profile"),
];

impl DashboardKind {
    pub fn for_role(role: UserRole) -> Self {
        match role {
            UserRole::SuperAdmin => DashboardKind::SuperAdmin,
            UserRole::Admin => DashboardKind::Admin,
            UserRole::TeamLeader => DashboardKind::TeamLeader,
            UserRole::TeamMember => DashboardKind::TeamMember,
        }
    }

    pub fn nav_items(&self) -> &'static [NavItem] {
        match self {
            DashboardKind::SuperAdmin => SUPER_ADMIN_ITEMS,
            DashboardKind::Admin => ADMIN_ITEMS,
            DashboardKind::TeamLeader => LEADER_ITEMS,
            DashboardKind::TeamMember => MEMBER_ITEMS,
        }
    }

    pub fn default_tab(&self) -> &'static str {
        "overview"
    }

    /// Route the dashboard is mounted at
    pub fn route(&self) -> &'static str {
        match self {
            DashboardKind::SuperAdmin => "/super-admin",
            DashboardKind::Admin => "/admin",
            DashboardKind::TeamLeader => "/leader",
            DashboardKind::TeamMember => "/member",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            DashboardKind::SuperAdmin => "Super Admin Dashboard",
            DashboardKind::Admin => "Admin Dashboard",
            DashboardKind::TeamLeader => "Team Leader Dashboard",
            DashboardKind::TeamMember => "Team Member Dashboard",
        }
    }
}

/// Lifecycle of fetched data on screen
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Loading,
    Error(String),
    Ready(T),
}

impl<T> ViewState<T> {
    pub fn from_result(result: Result<T, String>) -> Self {
        match result {
            Ok(data) => ViewState::Ready(data),
            Err(message) => ViewState::Error(message),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            ViewState::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ViewState::Error(message) => Some(message),
            _ => None,
        }
    }

    /// Map ready data to a widget; other states get their fixed layout
    pub fn render(&self, widget: impl FnOnce(&T) -> WidgetView) -> RenderedView {
        match self {
            ViewState::Loading => RenderedView::Spinner,
            ViewState::Error(message) => RenderedView::ErrorBanner {
                message: message.clone(),
                retry_label: "Retry",
            },
            ViewState::Ready(data) => RenderedView::Widget(widget(data)),
        }
    }
}

/// What ends up on screen for a panel
#[derive(Debug, Clone, PartialEq)]
pub enum RenderedView {
    Spinner,
    ErrorBanner {
        message: String,
        retry_label: &'static str,
    },
    Widget(WidgetView),
}

/// A dashboard panel bound to its refetch callback
pub struct Panel<T, F> {
    state: ViewState<T>,
    refetch: F,
}

impl<T, F, Fut> Panel<T, F>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, String>>,
{
    /// Panels start out loading until the first refresh lands
    pub fn new(refetch: F) -> Self {
        Self {
            state: ViewState::Loading,
            refetch,
        }
    }

    pub fn state(&self) -> &ViewState<T> {
        &self.state
    }

    /// Invoke the callback and settle on its result
    pub async fn refresh(&mut self) -> &ViewState<T> {
        self.state = ViewState::Loading;
        let result = (self.refetch)().await;
        if let Err(message) = &result {
            tracing::warn!(error = %message, "Panel fetch failed");
        }
        self.state = ViewState::from_result(result);
        &self.state
    }

    /// Retry affordance on the error banner; a no-op unless in `Error`
    pub async fn retry(&mut self) -> &ViewState<T> {
        if self.state.error().is_some() {
            return self.refresh().await;
        }
        &self.state
    }

    pub fn render(&self, widget: impl FnOnce(&T) -> WidgetView) -> RenderedView {
        self.state.render(widget)
    }
}
