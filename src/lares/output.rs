use crate::coordinator::{Coordinator, PollSource, Snapshot};
use crate::lares::client::{FetchError, LaresClient};
use crate::lares::domain::{DeviceInfo, OUTPUT_CONTROL, OUTPUT_OFF, OUTPUT_OFF_VALUE, OUTPUT_ON, OUTPUT_ON_VALUE, OutputStatus};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio_retry::Retry;
use tokio_retry::strategy::FixedInterval;
use tracing::{debug, instrument, warn};

pub type OutputCoordinator = Coordinator<OutputStatusSource>;
pub type OutputSnapshot = Snapshot<OutputStatus>;

/// Polls the full output status set for the coordinator.
pub struct OutputStatusSource {
    client: Arc<LaresClient>,
    device: DeviceInfo,
}

impl OutputStatusSource {
    pub fn new(client: Arc<LaresClient>, device: DeviceInfo) -> Self {
        OutputStatusSource { client, device }
    }
}

#[async_trait]
impl PollSource for OutputStatusSource {
    type Row = OutputStatus;

    async fn poll(&self) -> Result<Vec<OutputStatus>, FetchError> {
        self.client.output_status(&self.device).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputState {
    On,
    Off,
    Unknown,
}

/// Outcome of the bounded confirmation poll after a write. `TimedOut` means
/// the panel never reported the requested state within the retry budget, not
/// that the command failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    TimedOut,
}

/// A single controllable output, projected from the coordinator's cache.
///
/// State transitions come only from refresh results; a write is a command,
/// never a local state mutation.
pub struct OutputLight {
    client: Arc<LaresClient>,
    coordinator: Arc<OutputCoordinator>,
    rx: watch::Receiver<OutputSnapshot>,
    pin: String,
    name: String,
    index: usize,
    confirm_attempts: usize,
    confirm_delay: Duration,
}

impl OutputLight {
    pub fn new(
        client: Arc<LaresClient>,
        coordinator: Arc<OutputCoordinator>,
        pin: String,
        name: String,
        index: usize,
        confirm_attempts: usize,
        confirm_delay: Duration,
    ) -> Self {
        let rx = coordinator.subscribe();

        OutputLight {
            client,
            coordinator,
            rx,
            pin,
            name,
            index,
            confirm_attempts,
            confirm_delay,
        }
    }

    pub fn id(&self) -> String {
        self.index.to_string()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn subscribe(&self) -> watch::Receiver<OutputSnapshot> {
        self.coordinator.subscribe()
    }

    /// `Unknown` whenever the row is absent or carries an unrecognized status.
    pub fn state(&self) -> OutputState {
        match self.rx.borrow().get(self.index) {
            Some(row) if row.status == OUTPUT_ON => OutputState::On,
            Some(row) if row.status == OUTPUT_OFF => OutputState::Off,
            _ => OutputState::Unknown,
        }
    }

    pub fn is_on(&self) -> bool {
        self.state() == OutputState::On
    }

    pub fn is_available(&self) -> bool {
        self.rx.borrow().get(self.index).is_some_and(|row| row.remote_control == OUTPUT_CONTROL)
    }

    #[instrument(skip(self), fields(output = self.index))]
    pub async fn turn_on(&self) -> Confirmation {
        self.set(OUTPUT_ON_VALUE, OutputState::On).await
    }

    #[instrument(skip(self), fields(output = self.index))]
    pub async fn turn_off(&self) -> Confirmation {
        self.set(OUTPUT_OFF_VALUE, OutputState::Off).await
    }

    async fn set(&self, value: &str, desired: OutputState) -> Confirmation {
        debug!("🟠 Output {} command value {} sent", self.index, value);
        if let Err(e) = self.client.send_output_command(&self.pin, &self.id(), value).await {
            // Command sends are fire-and-forget; the confirmation poll below
            // decides what the panel actually did.
            debug!("🔴 Output {} command failed: {}", self.index, e);
        }

        let strategy = FixedInterval::new(self.confirm_delay).take(self.confirm_attempts.saturating_sub(1));
        let confirmed = Retry::spawn(strategy, || async {
            self.coordinator.refresh().await;
            if self.state() == desired { Ok(()) } else { Err(()) }
        })
        .await;

        match confirmed {
            Ok(()) => {
                debug!("🟢 Output {} confirmed {:?}", self.index, desired);
                Confirmation::Confirmed
            }
            Err(()) => {
                #[rustfmt::skip]
                warn!("⏳ Output {} still not {:?} after {} poll(s)", self.index, desired, self.confirm_attempts);
                Confirmation::TimedOut
            }
        }
    }
}
