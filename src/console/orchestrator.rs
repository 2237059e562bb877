//! Run orchestration state machine
//!
//! Owns the single [`RunSession`] and drives it through
//! `Idle → Submitting → Streaming → Completed → Idle`. Submission is only
//! possible from `Idle`; while a run is in flight the form is disabled, so
//! no second session can start. The streaming loop polls the output
//! endpoint on a fixed interval and exits only on the stream sentinel.

use std::collections::HashSet;
use std::time::Duration;

use tokio::time::MissedTickBehavior;

use crate::api::{ConsoleApi, DeviceRegistry, PromptBundleSet, RunRequest, STREAM_SENTINEL};
use crate::common::{Error, Result};

use super::ansi;
use super::order::TestOrderModel;
use super::session::{RunSession, RunState};

/// Display surface receiving live output
pub trait OutputSink {
    /// A freshly translated chunk was appended to the transcript
    fn append(&mut self, chunk: &str);

    /// Keep the latest output visible
    fn scroll_to_bottom(&mut self);
}

/// Sink that writes chunks straight to stdout. Scrolling is the terminal's
/// own behavior, so that notification is a no-op.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn append(&mut self, chunk: &str) {
        use std::io::Write;
        print!("{chunk}");
        let _ = std::io::stdout().flush();
    }

    fn scroll_to_bottom(&mut self) {}
}

/// The run submission form: device and bundle selections plus the mirrored
/// test order. Disabled for the whole Submitting+Streaming span.
#[derive(Debug, Default)]
pub struct RunForm {
    device: String,
    prompts: String,
    tests: Vec<String>,
    disabled: bool,
}

impl RunForm {
    pub fn device(&self) -> &str {
        &self.device
    }

    pub fn prompts(&self) -> &str {
        &self.prompts
    }

    pub fn tests(&self) -> &[String] {
        &self.tests
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    fn disable(&mut self) {
        self.disabled = true;
    }

    fn enable(&mut self) {
        self.disabled = false;
    }
}

/// Outcome of one polling tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not streaming; the tick was ignored with no buffer mutation
    Ignored,
    /// No new data pending, or a transport failure that will be retried
    NoData,
    /// A chunk was translated and appended
    Appended,
    /// The sentinel arrived; the session is complete
    Finished,
}

/// Top-level coordinator for run submission and output streaming
pub struct RunOrchestrator<A: ConsoleApi, S: OutputSink> {
    api: A,
    sink: S,
    poll_interval: Duration,
    devices: DeviceRegistry,
    bundles: PromptBundleSet,
    catalog_names: HashSet<String>,
    order: TestOrderModel,
    form: RunForm,
    session: RunSession,
}

impl<A: ConsoleApi, S: OutputSink> RunOrchestrator<A, S> {
    pub fn new(api: A, sink: S, poll_interval: Duration) -> Self {
        Self {
            api,
            sink,
            poll_interval,
            devices: DeviceRegistry::new(),
            bundles: PromptBundleSet::new(),
            catalog_names: HashSet::new(),
            order: TestOrderModel::default(),
            form: RunForm::default(),
            session: RunSession::default(),
        }
    }

    /// Load the registries and the default test order, then probe the output
    /// endpoint for a run already in flight.
    ///
    /// Registry fetch failures are logged and leave the corresponding list
    /// empty; the console stays usable but validation will block submission
    /// until a valid selection exists. Returns `true` when a pending run was
    /// found, in which case the console is already `Streaming` and the probe
    /// chunk has been appended.
    pub async fn startup(&mut self) -> bool {
        match self.api.get_devices().await {
            Ok(devices) => self.devices = devices,
            Err(e) => tracing::warn!(error = %e, "failed to load device registry"),
        }
        match self.api.get_bundles().await {
            Ok(bundles) => self.bundles = bundles,
            Err(e) => tracing::warn!(error = %e, "failed to load prompt bundles"),
        }
        match self.api.get_tests().await {
            Ok(catalog) => {
                self.catalog_names = catalog
                    .into_values()
                    .flatten()
                    .map(|t| t.name)
                    .collect();
            }
            Err(e) => tracing::warn!(error = %e, "failed to load test catalog"),
        }
        match self.api.get_test_order().await {
            Ok(names) => {
                self.order = TestOrderModel::new(names);
                self.sync_order();
            }
            Err(e) => tracing::warn!(error = %e, "failed to load default test order"),
        }

        // A pending chunk means the server is mid-run (e.g. this console was
        // restarted while a suite was executing). Attach to it instead of
        // presenting an idle form; the probe chunk itself is kept.
        match self.api.fetch_output().await {
            Ok(Some(chunk)) if chunk != STREAM_SENTINEL => {
                tracing::info!("run already in progress, resuming output stream");
                self.form.disable();
                self.session.set_state(RunState::Streaming);
                self.append_chunk(&chunk);
                true
            }
            Ok(_) => false,
            Err(e) => {
                tracing::warn!(error = %e, "output probe failed");
                false
            }
        }
    }

    /// Select the device under test
    pub fn select_device(&mut self, name: &str) -> Result<()> {
        self.ensure_editable("select a device")?;
        if !self.devices.contains_key(name) {
            return Err(Error::UnknownDevice(name.to_string()));
        }
        self.form.device = name.to_string();
        Ok(())
    }

    /// Select the prompt bundle parameterizing the run
    pub fn select_bundle(&mut self, name: &str) -> Result<()> {
        self.ensure_editable("select a bundle")?;
        if !self.bundles.contains_key(name) {
            return Err(Error::UnknownBundle(name.to_string()));
        }
        self.form.prompts = name.to_string();
        Ok(())
    }

    /// Add a test from the catalog suggestions to the end of the order.
    ///
    /// Unlike [`TestOrderModel::append`] this path refuses duplicates and
    /// names the catalog does not know.
    pub fn add_test(&mut self, name: &str) -> Result<()> {
        self.ensure_editable("edit the test order")?;
        if self.order.contains(name) {
            return Err(Error::DuplicateTest(name.to_string()));
        }
        if !self.catalog_names.is_empty() && !self.catalog_names.contains(name) {
            return Err(Error::UnknownTest(name.to_string()));
        }
        self.order.append(name);
        self.sync_order();
        Ok(())
    }

    /// Remove the test at `index` from the order
    pub fn remove_test(&mut self, index: usize) -> Result<String> {
        self.ensure_editable("edit the test order")?;
        let removed = self.order.remove(index)?;
        self.sync_order();
        Ok(removed)
    }

    /// Move the test at `from` to position `to`
    pub fn move_test(&mut self, from: usize, to: usize) -> Result<()> {
        self.ensure_editable("edit the test order")?;
        self.order.reorder(from, to)?;
        self.sync_order();
        Ok(())
    }

    /// Submit the current form as a run request.
    ///
    /// Only allowed from `Idle`. Synchronously disables the form, clears the
    /// previous transcript, and enters `Submitting` before the trigger call;
    /// enters `Streaming` unconditionally afterwards. A failed trigger is
    /// logged, not fatal: the server may already have a run in flight, and
    /// the console always attaches to the output stream.
    pub async fn submit(&mut self) -> Result<()> {
        if self.session.state() != RunState::Idle {
            return Err(Error::invalid_state(
                "submit",
                &self.session.state().to_string(),
            ));
        }
        if self.form.device.is_empty() || !self.devices.contains_key(&self.form.device) {
            return Err(Error::UnknownDevice(self.form.device.clone()));
        }
        if self.form.prompts.is_empty() || !self.bundles.contains_key(&self.form.prompts) {
            return Err(Error::UnknownBundle(self.form.prompts.clone()));
        }

        let request = RunRequest {
            prompts: self.form.prompts.clone(),
            device: self.form.device.clone(),
            tests: self.form.tests.clone(),
        };

        self.form.disable();
        self.session.clear_output();
        self.session.set_state(RunState::Submitting);

        tracing::info!(
            device = %request.device,
            prompts = %request.prompts,
            tests = request.tests.len(),
            "submitting run"
        );
        if let Err(e) = self.api.submit_run(&request).await {
            tracing::warn!(error = %e, "run trigger failed, attaching to output anyway");
        }

        self.session.set_state(RunState::Streaming);
        Ok(())
    }

    /// Poll the output endpoint until the sentinel arrives.
    ///
    /// One fetch per tick, never overlapping: the fetch is awaited inside
    /// the loop body, and a slow response delays the next tick instead of
    /// piling up re-entrant ones. Transport failures are logged and the
    /// loop keeps ticking; only the sentinel ends it. Afterwards the state
    /// moves from `Completed` back to `Idle` with the transcript intact.
    pub async fn stream(&mut self) -> Result<()> {
        if self.session.state() != RunState::Streaming {
            return Err(Error::invalid_state(
                "stream output",
                &self.session.state().to_string(),
            ));
        }

        let mut interval = tokio::time::interval(self.poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            if self.poll_once().await == TickOutcome::Finished {
                break;
            }
        }

        self.session.set_state(RunState::Idle);
        Ok(())
    }

    /// One polling tick. Ticks outside `Streaming` are ignored without
    /// touching the buffer, so stray ticks after completion are harmless.
    pub async fn poll_once(&mut self) -> TickOutcome {
        if self.session.state() != RunState::Streaming {
            return TickOutcome::Ignored;
        }
        match self.api.fetch_output().await {
            Ok(None) => TickOutcome::NoData,
            Ok(Some(chunk)) if chunk == STREAM_SENTINEL => {
                tracing::info!("run complete");
                self.form.enable();
                self.session.set_state(RunState::Completed);
                TickOutcome::Finished
            }
            Ok(Some(chunk)) => {
                self.append_chunk(&chunk);
                TickOutcome::Appended
            }
            Err(e) => {
                // Transient transport failures self-heal; keep ticking.
                tracing::warn!(error = %e, "output fetch failed, retrying");
                TickOutcome::NoData
            }
        }
    }

    /// Translate a freshly received chunk exactly once, append it, and
    /// notify the display surface.
    fn append_chunk(&mut self, chunk: &str) {
        let translated = ansi::translate(chunk);
        self.session.push_output(&translated);
        self.sink.append(&translated);
        self.sink.scroll_to_bottom();
    }

    /// Mirror the order model into the form's `tests` value so the next
    /// submission carries the current order
    fn sync_order(&mut self) {
        self.form.tests = self.order.names().to_vec();
    }

    fn ensure_editable(&self, action: &str) -> Result<()> {
        if self.form.is_disabled() {
            return Err(Error::invalid_state(
                action,
                &self.session.state().to_string(),
            ));
        }
        Ok(())
    }

    pub fn state(&self) -> RunState {
        self.session.state()
    }

    pub fn output(&self) -> &str {
        self.session.output()
    }

    pub fn form(&self) -> &RunForm {
        &self.form
    }

    pub fn order(&self) -> &TestOrderModel {
        &self.order
    }

    pub fn devices(&self) -> &DeviceRegistry {
        &self.devices
    }

    pub fn bundles(&self) -> &PromptBundleSet {
        &self.bundles
    }
}
