//! Explicit wrapper that runs a user callable inside a tracking session.
//!
//! Composition is an explicit wrapping call: build a [`Tracked`] value
//! around the callable and its captured configuration, then `invoke` it.
//! The run handle is passed to the callable, which can attach metadata
//! before the run is finished.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Key under which the link type is surfaced to host UIs.
pub const LINK_TYPE_KEY: &str = "link_type";
/// Link-type value identifying tracking-run links.
pub const TRACKING_RUN_VALUE: &str = "tracking-run-id";

/// Captured configuration for a tracking run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingConfig {
    /// Tracking project the run is recorded under.
    pub project: String,
    /// Tracking service host.
    pub host: String,
    /// Execution identifier recorded on the run, when known.
    #[serde(default)]
    pub execution_id: Option<String>,
}

impl TrackingConfig {
    pub fn new(project: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            host: host.into(),
            execution_id: None,
        }
    }

    pub fn with_execution_id(mut self, id: impl Into<String>) -> Self {
        self.execution_id = Some(id.into());
        self
    }
}

/// An open tracking run; fields become searchable metadata upstream.
#[derive(Debug, Default)]
pub struct TrackingRun {
    fields: BTreeMap<String, String>,
}

impl TrackingRun {
    /// Attach a metadata field to the run.
    pub fn set_field(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }
}

/// Where run lifecycle events and metadata are delivered.
pub trait TrackingBackend {
    fn start_run(&self, config: &TrackingConfig) -> TrackingRun;
    fn finish_run(&self, run: TrackingRun);
}

/// Backend that emits run metadata as log events.
#[derive(Debug, Default)]
pub struct LogBackend;

impl TrackingBackend for LogBackend {
    fn start_run(&self, config: &TrackingConfig) -> TrackingRun {
        debug!(project = %config.project, host = %config.host, "tracking run started");
        let mut run = TrackingRun::default();
        if let Some(id) = &config.execution_id {
            run.set_field("execution_id", id);
        }
        run
    }

    fn finish_run(&self, run: TrackingRun) {
        debug!(fields = run.fields.len(), "tracking run finished");
    }
}

/// A user callable plus its captured tracking configuration.
pub struct Tracked<F> {
    inner: F,
    config: TrackingConfig,
}

impl<F> Tracked<F> {
    /// Wrap `inner` with the given configuration.
    pub fn new(inner: F, config: TrackingConfig) -> Self {
        Self { inner, config }
    }

    /// Extra configuration surfaced next to the wrapped callable, so a
    /// host UI can render the run link.
    pub fn extra_config(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            ("host".to_string(), self.config.host.clone()),
            ("project".to_string(), self.config.project.clone()),
            (LINK_TYPE_KEY.to_string(), TRACKING_RUN_VALUE.to_string()),
        ])
    }
}

impl<F, T> Tracked<F>
where
    F: Fn(&mut TrackingRun) -> T,
{
    /// Run the callable inside a tracking session: open a run, hand it
    /// to the callable, finish the run, return the callable's output.
    pub fn invoke(&self, backend: &dyn TrackingBackend) -> T {
        let mut run = backend.start_run(&self.config);
        let output = (self.inner)(&mut run);
        backend.finish_run(run);
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Backend that records the lifecycle for assertions.
    #[derive(Default)]
    struct Recording {
        started: RefCell<u32>,
        finished_fields: RefCell<Vec<BTreeMap<String, String>>>,
    }

    impl TrackingBackend for Recording {
        fn start_run(&self, config: &TrackingConfig) -> TrackingRun {
            *self.started.borrow_mut() += 1;
            let mut run = TrackingRun::default();
            if let Some(id) = &config.execution_id {
                run.set_field("execution_id", id);
            }
            run
        }

        fn finish_run(&self, run: TrackingRun) {
            self.finished_fields.borrow_mut().push(run.fields.clone());
        }
    }

    #[test]
    fn invoke_wraps_the_callable_in_a_run() {
        let config = TrackingConfig::new("vision", "https://tracking.corp").with_execution_id("exec-7");
        let tracked = Tracked::new(
            |run: &mut TrackingRun| {
                run.set_field("loss", "0.03");
                21 * 2
            },
            config,
        );

        let backend = Recording::default();
        let output = tracked.invoke(&backend);

        assert_eq!(output, 42);
        assert_eq!(*backend.started.borrow(), 1);
        let finished = backend.finished_fields.borrow();
        assert_eq!(finished.len(), 1);
        assert_eq!(finished[0].get("execution_id").map(String::as_str), Some("exec-7"));
        assert_eq!(finished[0].get("loss").map(String::as_str), Some("0.03"));
    }

    #[test]
    fn invoke_is_repeatable() {
        let tracked = Tracked::new(
            |_run: &mut TrackingRun| "ok",
            TrackingConfig::new("p", "h"),
        );
        let backend = Recording::default();
        assert_eq!(tracked.invoke(&backend), "ok");
        assert_eq!(tracked.invoke(&backend), "ok");
        assert_eq!(*backend.started.borrow(), 2);
    }

    #[test]
    fn extra_config_carries_the_link_type() {
        let tracked = Tracked::new(
            |_run: &mut TrackingRun| (),
            TrackingConfig::new("vision", "https://tracking.corp"),
        );
        let extra = tracked.extra_config();
        assert_eq!(extra.get("host").map(String::as_str), Some("https://tracking.corp"));
        assert_eq!(extra.get("project").map(String::as_str), Some("vision"));
        assert_eq!(
            extra.get(LINK_TYPE_KEY).map(String::as_str),
            Some(TRACKING_RUN_VALUE)
        );
    }

    #[test]
    fn config_survives_serde() {
        let config = TrackingConfig::new("vision", "https://tracking.corp");
        let json = serde_json::to_string(&config).unwrap();
        let back: TrackingConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.project, "vision");
        assert_eq!(back.execution_id, None);
    }
}
