//! Extension points around the packaging core.
//!
//! Neither module performs nontrivial algorithmic work; both are thin
//! indirection layers the host wires in at its boundary.

pub mod registry;
pub mod tracking;

pub use registry::{plugin, set_plugin, DefaultPlugin, Plugin, RemoteConfig, RemoteSession};
pub use tracking::{
    LogBackend, Tracked, TrackingBackend, TrackingConfig, TrackingRun, LINK_TYPE_KEY,
    TRACKING_RUN_VALUE,
};
