use crate::lares::output::{OutputLight, OutputState};
use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;
use tracing::{info, instrument};

/// Capability seam towards the host automation platform. The core only ever
/// calls into this trait; collaborators arrive by constructor, never through
/// a process-wide registry.
#[async_trait]
pub trait Platform: Debug + Send + Sync {
    /// Hands over the controllable entities once setup has resolved them.
    async fn register(&self, entities: Vec<Arc<OutputLight>>);

    /// Invoked when the runtime configuration changed behind the platform's back.
    async fn on_options_changed(&self);
}

/// Stand-in platform for running the bridge as a plain daemon: logs
/// registrations and state transitions observed on the coordinator's
/// notification channel.
#[derive(Debug)]
pub struct LogPlatform;

impl LogPlatform {
    pub fn new() -> Self {
        LogPlatform
    }
}

#[async_trait]
impl Platform for LogPlatform {
    #[instrument(skip_all)]
    async fn register(&self, entities: Vec<Arc<OutputLight>>) {
        for entity in &entities {
            #[rustfmt::skip]
            info!("💡 Registered output '{}' (id {}), on: {}, available: {}", entity.name(), entity.id(), entity.is_on(), entity.is_available());
        }

        let Some(first) = entities.first() else { return };
        let mut rx = first.subscribe();

        tokio::spawn(async move {
            let mut previous: Vec<OutputState> = entities.iter().map(|entity| entity.state()).collect();

            while rx.changed().await.is_ok() {
                for (entity, last) in entities.iter().zip(previous.iter_mut()) {
                    let state = entity.state();
                    if state != *last {
                        info!("💡 Output '{}' is now {:?}", entity.name(), state);
                        *last = state;
                    }
                }
            }
        });
    }

    async fn on_options_changed(&self) {
        info!("🔄 Options changed, restart the bridge to apply them");
    }
}
