//! Periodic background runner.
//!
//! One long-lived task owns the connectors and runs cycles strictly one at
//! a time on a fixed interval. Between cycles it waits on an interruptible
//! timer: a control command wakes it immediately instead of waiting out the
//! interval. Commands are only consumed between cycles, so a stop never
//! cancels a cycle mid-flight; the in-flight pass finishes first.

use std::sync::Arc;

use calmirror_connectors::{MirrorConnector, SourceConnector};
use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, RwLock};
use tracing::{info, warn};

use crate::config::SyncConfig;
use crate::cycle::{run_cycle, CycleReport};

/// Control commands accepted by the runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerCommand {
    /// Begin periodic cycles. A no-op with a logged notice while running.
    Start,
    /// Halt after the in-flight cycle. A no-op with a logged notice while
    /// stopped.
    Stop,
    /// End the runner task entirely.
    Shutdown,
}

/// Observable runner state.
#[derive(Debug, Clone, Default)]
pub struct RunnerState {
    /// Whether periodic cycles are active.
    pub running: bool,
    /// Cycles that ran to completion (successfully or faulted).
    pub cycles_completed: u64,
    /// Report from the most recent successful cycle.
    pub last_report: Option<CycleReport>,
    /// Error from the most recent faulted cycle.
    pub last_error: Option<String>,
    /// When the most recent cycle finished.
    pub last_cycle_at: Option<DateTime<Utc>>,
}

impl RunnerState {
    fn record_success(&mut self, report: CycleReport) {
        self.cycles_completed += 1;
        self.last_report = Some(report);
        self.last_error = None;
        self.last_cycle_at = Some(Utc::now());
    }

    fn record_fault(&mut self, error: impl Into<String>) {
        self.cycles_completed += 1;
        self.last_error = Some(error.into());
        self.last_cycle_at = Some(Utc::now());
    }
}

/// The periodic sync runner.
pub struct SyncRunner {
    source: Arc<dyn SourceConnector>,
    mirror: Arc<dyn MirrorConnector>,
    config: SyncConfig,
    state: Arc<RwLock<RunnerState>>,
    command_tx: mpsc::Sender<RunnerCommand>,
    command_rx: Option<mpsc::Receiver<RunnerCommand>>,
}

impl SyncRunner {
    /// Creates a runner over the given connectors. Cycles do not start
    /// until a `Start` command arrives.
    pub fn new(
        source: Arc<dyn SourceConnector>,
        mirror: Arc<dyn MirrorConnector>,
        config: SyncConfig,
    ) -> Self {
        let (command_tx, command_rx) = mpsc::channel(16);
        Self {
            source,
            mirror,
            config,
            state: Arc::new(RwLock::new(RunnerState::default())),
            command_tx,
            command_rx: Some(command_rx),
        }
    }

    /// Returns a handle for controlling the runner.
    pub fn handle(&self) -> RunnerHandle {
        RunnerHandle {
            command_tx: self.command_tx.clone(),
            state: self.state.clone(),
        }
    }

    /// Runs the control loop until shutdown.
    pub async fn run(mut self) {
        let mut command_rx = self.command_rx.take().expect("run called twice");

        info!(
            interval_secs = self.config.interval.as_secs(),
            calendar_id = %self.config.calendar_id,
            "sync runner ready"
        );

        loop {
            let running = self.state.read().await.running;

            if !running {
                match command_rx.recv().await {
                    Some(RunnerCommand::Start) => {
                        self.state.write().await.running = true;
                        info!("sync started");
                        self.run_one().await;
                    }
                    Some(RunnerCommand::Stop) => {
                        info!("sync is not currently running");
                    }
                    Some(RunnerCommand::Shutdown) | None => break,
                }
                continue;
            }

            tokio::select! {
                cmd = command_rx.recv() => match cmd {
                    Some(RunnerCommand::Start) => {
                        info!("sync is already running");
                    }
                    Some(RunnerCommand::Stop) => {
                        self.state.write().await.running = false;
                        info!("sync stopped");
                    }
                    Some(RunnerCommand::Shutdown) | None => break,
                },
                _ = tokio::time::sleep(self.config.interval) => {
                    self.run_one().await;
                }
            }
        }

        info!("sync runner shut down");
    }

    async fn run_one(&self) {
        match run_cycle(self.source.as_ref(), self.mirror.as_ref(), &self.config).await {
            Ok(report) => {
                self.state.write().await.record_success(report);
            }
            Err(error) => {
                warn!(%error, "cycle faulted, retrying on next interval");
                self.state.write().await.record_fault(error.to_string());
            }
        }
    }
}

/// Handle for controlling a running [`SyncRunner`].
#[derive(Clone)]
pub struct RunnerHandle {
    command_tx: mpsc::Sender<RunnerCommand>,
    state: Arc<RwLock<RunnerState>>,
}

impl RunnerHandle {
    /// Requests that periodic cycles begin.
    pub async fn start(&self) -> Result<(), mpsc::error::SendError<RunnerCommand>> {
        self.command_tx.send(RunnerCommand::Start).await
    }

    /// Requests a halt once the in-flight cycle has finished.
    pub async fn stop(&self) -> Result<(), mpsc::error::SendError<RunnerCommand>> {
        self.command_tx.send(RunnerCommand::Stop).await
    }

    /// Ends the runner task.
    pub async fn shutdown(&self) -> Result<(), mpsc::error::SendError<RunnerCommand>> {
        self.command_tx.send(RunnerCommand::Shutdown).await
    }

    /// Returns a copy of the current runner state.
    pub async fn state(&self) -> RunnerState {
        self.state.read().await.clone()
    }

    /// True while periodic cycles are active.
    pub async fn is_running(&self) -> bool {
        self.state.read().await.running
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeMirror, FakeSource};
    use calmirror_connectors::RawSourceEvent;
    use chrono::Duration as ChronoDuration;
    use std::time::Duration;

    fn test_config(interval: Duration) -> SyncConfig {
        SyncConfig::new("mirror-cal", "UTC")
            .unwrap()
            .with_interval(interval)
    }

    fn in_window_event(id: &str, subject: &str) -> RawSourceEvent {
        let start = Utc::now() + ChronoDuration::hours(1);
        RawSourceEvent::new(
            id,
            subject,
            start.naive_utc(),
            (start + ChronoDuration::hours(1)).naive_utc(),
        )
    }

    fn spawn_runner(
        source: Arc<FakeSource>,
        mirror: Arc<FakeMirror>,
        interval: Duration,
    ) -> (RunnerHandle, tokio::task::JoinHandle<()>) {
        let runner = SyncRunner::new(source, mirror, test_config(interval));
        let handle = runner.handle();
        let task = tokio::spawn(runner.run());
        (handle, task)
    }

    #[tokio::test]
    async fn start_runs_an_immediate_cycle() {
        let source = Arc::new(FakeSource::with_events(vec![in_window_event("O1", "Standup")]));
        let mirror = Arc::new(FakeMirror::new());
        let (handle, task) = spawn_runner(source, mirror.clone(), Duration::from_secs(3600));

        handle.start().await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        let state = handle.state().await;
        assert!(state.running);
        assert_eq!(state.cycles_completed, 1);
        assert_eq!(state.last_report.unwrap().created, 1);
        assert!(mirror.managed_by_source().contains_key("O1"));

        handle.shutdown().await.unwrap();
        task.await.unwrap();
    }

    #[tokio::test]
    async fn start_while_running_is_a_no_op() {
        let source = Arc::new(FakeSource::with_events(vec![]));
        let mirror = Arc::new(FakeMirror::new());
        let (handle, task) = spawn_runner(source, mirror, Duration::from_secs(3600));

        handle.start().await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.start().await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        let state = handle.state().await;
        assert!(state.running);
        // The second start did not trigger another immediate cycle.
        assert_eq!(state.cycles_completed, 1);

        handle.shutdown().await.unwrap();
        task.await.unwrap();
    }

    #[tokio::test]
    async fn stop_wakes_the_interval_wait_immediately() {
        let source = Arc::new(FakeSource::with_events(vec![]));
        let mirror = Arc::new(FakeMirror::new());
        // An hour-long interval: only an interrupted wait lets this test
        // finish quickly.
        let (handle, task) = spawn_runner(source, mirror, Duration::from_secs(3600));

        handle.start().await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.stop().await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(!handle.is_running().await);

        handle.shutdown().await.unwrap();
        task.await.unwrap();
    }

    #[tokio::test]
    async fn stop_while_stopped_is_a_no_op() {
        let source = Arc::new(FakeSource::with_events(vec![]));
        let mirror = Arc::new(FakeMirror::new());
        let (handle, task) = spawn_runner(source, mirror, Duration::from_secs(3600));

        handle.stop().await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        let state = handle.state().await;
        assert!(!state.running);
        assert_eq!(state.cycles_completed, 0);

        handle.shutdown().await.unwrap();
        task.await.unwrap();
    }

    #[tokio::test]
    async fn periodic_cycles_run_on_the_interval() {
        let source = Arc::new(FakeSource::with_events(vec![]));
        let mirror = Arc::new(FakeMirror::new());
        let (handle, task) = spawn_runner(source, mirror, Duration::from_millis(20));

        handle.start().await.unwrap();
        tokio::time::sleep(Duration::from_millis(120)).await;

        let state = handle.state().await;
        assert!(state.cycles_completed >= 3);

        handle.shutdown().await.unwrap();
        task.await.unwrap();
    }

    #[tokio::test]
    async fn faulted_cycle_is_recorded_and_retried() {
        let source = Arc::new(FakeSource::with_events(vec![]));
        source.set_fail(true);
        let mirror = Arc::new(FakeMirror::new());
        let (handle, task) = spawn_runner(source.clone(), mirror, Duration::from_millis(20));

        handle.start().await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        let state = handle.state().await;
        assert!(state.last_error.is_some());
        assert!(state.running);

        // The source recovers; a later cycle succeeds on its own.
        source.set_fail(false);
        tokio::time::sleep(Duration::from_millis(80)).await;
        let state = handle.state().await;
        assert!(state.last_error.is_none());
        assert!(state.last_report.is_some());

        handle.shutdown().await.unwrap();
        task.await.unwrap();
    }
}
