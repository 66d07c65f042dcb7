//! Background refresh controller.
//!
//! One actor task owns the refresh schedule. It fetches once at start,
//! then on every timer tick and on demand. Only the most recently started
//! fetch may publish a result: starting a new fetch cancels the previous
//! one, and any completion carrying an older generation is dropped.
//!
//! Interval changes are debounced so a burst of edits re-arms the timer
//! once.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use leeway_core::{DEFAULT_ERROR_DISPLAY_LEN, UsageData, truncate_error};
use leeway_fetch::{CredentialProvider, FetchError, UsageFetcher};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::config::{INTERVAL_DEBOUNCE, RefreshConfig, resolve_interval, resolve_thresholds};
use crate::events::{EngineEvent, RefreshOutcome};
use crate::notifications::{NotificationState, evaluate};

// ============================================================================
// Public Types
// ============================================================================

/// What the controller is doing right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshPhase {
    /// Not started, or torn down.
    Idle,
    /// Timer armed, no fetch outstanding.
    Scheduled,
    /// A fetch is outstanding.
    FetchInFlight,
}

/// Handle to a running [`RefreshController`].
///
/// Cheap to clone. Dropping every handle tears the controller down.
#[derive(Debug, Clone)]
pub struct RefreshHandle {
    commands: mpsc::UnboundedSender<Command>,
    phase: watch::Receiver<RefreshPhase>,
}

impl RefreshHandle {
    /// Requests an immediate refresh. The periodic timer is not reset.
    ///
    /// Returns false if the controller has stopped.
    pub fn refresh(&self) -> bool {
        self.commands.send(Command::Refresh).is_ok()
    }

    /// Signals that the configured interval may have changed.
    ///
    /// Returns false if the controller has stopped.
    pub fn interval_changed(&self) -> bool {
        self.commands.send(Command::IntervalChanged).is_ok()
    }

    /// Stops the controller and waits for teardown to finish.
    ///
    /// Cancels any in-flight fetch. Safe to call more than once.
    pub async fn shutdown(&self) {
        let (ack, done) = oneshot::channel();
        if self.commands.send(Command::Shutdown(ack)).is_err() {
            return;
        }
        let _ = done.await;
    }

    /// Returns true until the controller has been torn down.
    pub fn is_running(&self) -> bool {
        !self.commands.is_closed()
    }

    /// Current phase.
    pub fn phase(&self) -> RefreshPhase {
        *self.phase.borrow()
    }
}

// ============================================================================
// Controller
// ============================================================================

#[derive(Debug)]
enum Command {
    Refresh,
    IntervalChanged,
    Shutdown(oneshot::Sender<()>),
}

struct FetchCompletion {
    generation: u64,
    result: Result<UsageData, FetchError>,
}

enum Step {
    Command(Command),
    Closed,
    Tick,
    ApplyInterval,
    Completed(FetchCompletion),
}

#[derive(Default)]
struct RefreshSchedule {
    interval: Duration,
    timer: Option<Interval>,
    debounce: Option<Instant>,
    in_flight: Option<CancellationToken>,
    generation: u64,
}

/// Periodic usage refresh with cancellation and threshold notifications.
pub struct RefreshController {
    credentials: Arc<dyn CredentialProvider>,
    fetcher: Arc<dyn UsageFetcher>,
    config: Arc<dyn RefreshConfig>,
    events: mpsc::UnboundedSender<EngineEvent>,
    phase: watch::Sender<RefreshPhase>,
    completions: mpsc::UnboundedSender<FetchCompletion>,
    schedule: RefreshSchedule,
    notifications: NotificationState,
}

impl RefreshController {
    /// Spawns the controller on the current Tokio runtime.
    ///
    /// Returns a handle and the stream of events. The first fetch starts
    /// immediately.
    pub fn spawn(
        credentials: Arc<dyn CredentialProvider>,
        fetcher: Arc<dyn UsageFetcher>,
        config: Arc<dyn RefreshConfig>,
    ) -> (RefreshHandle, mpsc::UnboundedReceiver<EngineEvent>) {
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        let (phase_tx, phase_rx) = watch::channel(RefreshPhase::Idle);

        let controller = Self {
            credentials,
            fetcher,
            config,
            events: events_tx,
            phase: phase_tx,
            completions: completions_tx,
            schedule: RefreshSchedule::default(),
            notifications: NotificationState::new(),
        };
        tokio::spawn(controller.run(commands_rx, completions_rx));

        let handle = RefreshHandle {
            commands: commands_tx,
            phase: phase_rx,
        };
        (handle, events_rx)
    }

    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<Command>,
        mut completions: mpsc::UnboundedReceiver<FetchCompletion>,
    ) {
        info!("Starting refresh controller");

        self.start_fetch().await;
        let interval = resolve_interval(self.config.as_ref()).await;
        self.arm_timer(interval);

        loop {
            let step = tokio::select! {
                command = commands.recv() => command.map_or(Step::Closed, Step::Command),
                () = next_tick(&mut self.schedule.timer) => Step::Tick,
                () = deadline(self.schedule.debounce) => Step::ApplyInterval,
                Some(completion) = completions.recv() => Step::Completed(completion),
            };

            match step {
                Step::Command(Command::Refresh) => {
                    debug!("Manual refresh requested");
                    self.start_fetch().await;
                }
                Step::Command(Command::IntervalChanged) => {
                    debug!("Interval change requested");
                    self.schedule.debounce = Some(Instant::now() + INTERVAL_DEBOUNCE);
                }
                Step::Command(Command::Shutdown(ack)) => {
                    self.teardown();
                    commands.close();
                    let _ = ack.send(());
                    break;
                }
                Step::Closed => {
                    self.teardown();
                    break;
                }
                Step::Tick => self.start_fetch().await,
                Step::ApplyInterval => self.apply_interval_change().await,
                Step::Completed(completion) => self.handle_completion(completion).await,
            }
        }

        info!("Refresh controller stopped");
    }

    #[instrument(skip_all, fields(generation = self.schedule.generation + 1))]
    async fn start_fetch(&mut self) {
        self.emit(EngineEvent::Refreshing);

        let credentials = match self.credentials.read().await {
            Ok(credentials) => credentials,
            Err(e) => {
                warn!(error = %e, "Failed to read credentials");
                let message = truncate_error(&e.to_string(), DEFAULT_ERROR_DISPLAY_LEN);
                self.emit(EngineEvent::Refresh(RefreshOutcome::Failure(message)));
                return;
            }
        };

        if credentials.is_expired() {
            warn!(expires_at = %credentials.expires_at, "OAuth token has expired");
            self.emit(EngineEvent::Refresh(RefreshOutcome::CredentialExpired));
            return;
        }

        if let Some(previous) = self.schedule.in_flight.take() {
            debug!("Cancelling superseded fetch");
            previous.cancel();
        }

        self.schedule.generation += 1;
        let generation = self.schedule.generation;
        let cancel = CancellationToken::new();
        self.schedule.in_flight = Some(cancel.clone());

        let fetcher = Arc::clone(&self.fetcher);
        let completions = self.completions.clone();
        let token = credentials.access_token;
        tokio::spawn(async move {
            let result = fetcher.fetch(&token, &cancel).await;
            let _ = completions.send(FetchCompletion { generation, result });
        });

        self.update_phase();
    }

    async fn handle_completion(&mut self, completion: FetchCompletion) {
        if completion.generation != self.schedule.generation {
            debug!(
                generation = completion.generation,
                current = self.schedule.generation,
                "Dropping superseded fetch result"
            );
            return;
        }

        self.schedule.in_flight = None;
        self.update_phase();

        match completion.result {
            Ok(data) => {
                info!(session = ?data.session_pct(), weekly = ?data.weekly_pct(), "Usage refreshed");
                self.emit(EngineEvent::Refresh(RefreshOutcome::Success(data.clone())));

                let thresholds = resolve_thresholds(self.config.as_ref()).await;
                for event in evaluate(&data, &thresholds, &mut self.notifications, Utc::now()) {
                    self.emit(EngineEvent::Notification(event));
                }
            }
            Err(e) if e.is_cancelled() => debug!("Fetch cancelled"),
            Err(e) => {
                warn!(error = %e, "Usage fetch failed");
                let message = truncate_error(&e.to_string(), DEFAULT_ERROR_DISPLAY_LEN);
                self.emit(EngineEvent::Refresh(RefreshOutcome::Failure(message)));
            }
        }
    }

    async fn apply_interval_change(&mut self) {
        self.schedule.debounce = None;
        let interval = resolve_interval(self.config.as_ref()).await;
        info!(
            from = self.schedule.interval.as_secs(),
            to = interval.as_secs(),
            "Applying refresh interval"
        );
        self.arm_timer(interval);
    }

    fn arm_timer(&mut self, interval: Duration) {
        let mut timer = tokio::time::interval_at(Instant::now() + interval, interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.schedule.interval = interval;
        self.schedule.timer = Some(timer);
        self.update_phase();
        self.emit(EngineEvent::ScheduleChanged { interval });
    }

    fn teardown(&mut self) {
        debug!("Tearing down refresh controller");
        self.schedule.timer = None;
        self.schedule.debounce = None;
        if let Some(in_flight) = self.schedule.in_flight.take() {
            in_flight.cancel();
        }
        self.update_phase();
    }

    fn update_phase(&self) {
        let phase = if self.schedule.in_flight.is_some() {
            RefreshPhase::FetchInFlight
        } else if self.schedule.timer.is_some() {
            RefreshPhase::Scheduled
        } else {
            RefreshPhase::Idle
        };
        self.phase.send_replace(phase);
    }

    fn emit(&self, event: EngineEvent) {
        if self.events.send(event).is_err() {
            debug!("Event receiver dropped");
        }
    }
}

async fn next_tick(timer: &mut Option<Interval>) {
    match timer {
        Some(timer) => {
            timer.tick().await;
        }
        None => std::future::pending().await,
    }
}

async fn deadline(at: Option<Instant>) {
    match at {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}
