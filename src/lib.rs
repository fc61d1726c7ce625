//! # HackHub
//!
//! Backend and dashboard view-models for running a hackathon: participant
//! accounts, team rosters capped at three Members plus a Leader, published
//! results, and payment screenshot review.
//!
//! ## Modules
//!
//! - [`roster`]: roster capacity calculator
//! - [`views`]: role dashboards, navigation shell, widgets
//! - [`session`]: signed-in user and route guards
//! - [`client`]: HTTP access layer for the REST API
//! - [`media`]: payment screenshot validation and storage
//! - [`mail`]: notification emails over SMTP
//! - [`store`]: SQLite persistence
//! - [`api`]: REST API server with Axum
//!
//! ## Quick Start
//!
//! ```rust
//! use hackhub::roster::{MemberRole, RosterSnapshot, TeamMember};
//!
//! let members = vec![
//!     TeamMember::new("1", "Lin", MemberRole::Leader),
//!     TeamMember::new("2", "Sam", MemberRole::Member),
//! ];
//! let roster = RosterSnapshot::from_members(&members);
//! assert_eq!(roster.slots_available, 2);
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod mail;
pub mod media;
pub mod model;
pub mod roster;
pub mod session;
pub mod store;
pub mod views;

pub use api::{build_router, serve, ApiError, AppState};
pub use client::{ApiClient, ClientError, RequestConfig, DEFAULT_BASE_URL};
pub use config::{Config, ConfigError, LoggingConfig};
pub use mail::{Email, MailError, Mailer};
pub use media::{StoredMedia, UploadError, UploadPolicy, Uploader};
pub use model::{PaymentScreenshot, PaymentStatus, ResultEntry, Team, User, UserRole};
pub use roster::{MemberRole, RosterSnapshot, TeamMember, MAX_MEMBERS};
pub use session::{GuardOutcome, SessionContext};
pub use store::{Store, StoreError, StoreResult, StoreStats};
