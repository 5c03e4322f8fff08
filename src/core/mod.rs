//! Core dashboard logic: records, derivation and view lifecycle

pub mod actions;
pub mod aggregate;
pub mod builder;
pub mod config;
pub mod error;
pub mod log;
pub mod model;
pub mod money;
pub mod snapshot;
pub mod source;
pub mod view;

// Re-export main types for cleaner imports
pub use builder::{DashboardViewModel, ViewModelBuilder};
pub use error::{LoadError, SnapshotError};
pub use money::Money;
pub use snapshot::{RawSnapshot, Snapshot};
pub use source::SnapshotSource;
pub use view::{DashboardView, MountedDashboard, ViewState};
