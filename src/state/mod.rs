pub mod buzz;
pub mod engine;
pub mod game;
pub mod questions;
pub mod scoring;
mod sse;
pub mod state_machine;
pub mod timers;

use std::{sync::Arc, time::Duration};

use tokio::{
    sync::Mutex,
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};
use tracing::{debug, info};

use crate::{
    config::AppConfig,
    services::sse_events,
    state::{
        engine::{Applied, GameEngine, OperatorCommand, Rejection, TickOutcome},
        timers::TimerTicket,
    },
};

pub use self::sse::{AdminChannel, SseHub};
use self::sse::SseState;

pub type SharedState = Arc<AppState>;

const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Central application state: configuration, the live game and the SSE hubs.
pub struct AppState {
    config: AppConfig,
    runtime: Mutex<GameRuntime>,
    sse: SseState,
}

/// Engine plus the countdown task currently driving it. Both only change under the same lock.
struct GameRuntime {
    engine: GameEngine,
    countdown: Option<ScheduledCountdown>,
}

struct ScheduledCountdown {
    ticket: TimerTicket,
    handle: JoinHandle<()>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    pub fn new(config: AppConfig) -> SharedState {
        let engine = GameEngine::new(&config);
        Arc::new(Self {
            config,
            runtime: Mutex::new(GameRuntime {
                engine,
                countdown: None,
            }),
            sse: SseState::new(64, 16),
        })
    }

    /// Loaded configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Broadcast hub used for the public SSE stream.
    pub fn public_sse(&self) -> &SseHub {
        self.sse.public()
    }

    /// Broadcast hub used for the admin SSE stream.
    pub fn admin_sse(&self) -> &SseHub {
        self.sse.admin().hub()
    }

    /// Token bookkeeping for the single admin stream.
    pub fn admin_channel(&self) -> &AdminChannel {
        self.sse.admin()
    }

    /// Read the engine under the runtime lock.
    pub async fn read_engine<T>(&self, read: impl FnOnce(&GameEngine) -> T) -> T {
        let runtime = self.runtime.lock().await;
        read(&runtime.engine)
    }

    /// Run one operator command, then let `view` observe the result while still holding the
    /// lock so broadcasts stay ordered with countdown ticks.
    pub async fn dispatch_with<T>(
        self: &Arc<Self>,
        command: OperatorCommand,
        view: impl FnOnce(&GameEngine, &Result<Applied, Rejection>) -> T,
    ) -> (Result<Applied, Rejection>, T) {
        let mut runtime = self.runtime.lock().await;
        let result = runtime.engine.dispatch(command);
        if result.is_ok() {
            self.reschedule(&mut runtime);
        }
        let viewed = view(&runtime.engine, &result);
        (result, viewed)
    }

    /// Feed one countdown tick. Returns whether the countdown behind `ticket` should keep going.
    async fn apply_tick(self: &Arc<Self>, ticket: TimerTicket) -> bool {
        let mut runtime = self.runtime.lock().await;
        match runtime.engine.tick(ticket) {
            TickOutcome::Stale => {
                debug!(?ticket, "dropping stale countdown tick");
                return false;
            }
            TickOutcome::Counted { kind, remaining } => {
                debug!(?kind, remaining, "countdown tick");
                sse_events::broadcast_timer(self, &runtime.engine);
            }
            TickOutcome::Expired => {
                info!(
                    question_index = runtime.engine.question_index(),
                    "question time expired"
                );
                sse_events::broadcast_timer(self, &runtime.engine);
                sse_events::broadcast_phase_changed(self, &runtime.engine);
            }
            TickOutcome::Holding => {}
        }

        self.reschedule(&mut runtime);
        runtime
            .countdown
            .as_ref()
            .is_some_and(|countdown| countdown.ticket == ticket)
    }

    /// Align the running countdown task with the one the engine wants.
    fn reschedule(self: &Arc<Self>, runtime: &mut GameRuntime) {
        let wanted = runtime.engine.active_timer();
        if runtime.countdown.as_ref().map(|countdown| countdown.ticket) == wanted {
            return;
        }

        if let Some(previous) = runtime.countdown.take() {
            previous.handle.abort();
            debug!(ticket = ?previous.ticket, "countdown stopped");
        }
        if let Some(ticket) = wanted {
            let handle = tokio::spawn(run_countdown(Arc::clone(self), ticket));
            runtime.countdown = Some(ScheduledCountdown { ticket, handle });
            debug!(?ticket, "countdown scheduled");
        }
    }
}

/// Tick once per second until the engine stops wanting this countdown.
async fn run_countdown(state: SharedState, ticket: TimerTicket) {
    let mut interval = time::interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;
        if !state.apply_tick(ticket).await {
            break;
        }
    }
}
