//! Snapshot polling
//!
//! A poller is a tokio task that re-fetches one duel or game on a fixed
//! interval and forwards each result over a channel. Fetches run inline in
//! the task, so a poller never has more than one request in flight.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, warn};
use worduel_core::{Duel, Game};
use worduel_net::DuelService;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollTarget {
    Duel(String),
    Game(String),
}

#[derive(Debug, Clone)]
pub enum PollEvent {
    Duel(Duel),
    Game(Game),
    /// The service answered `null` for the target
    Missing,
    /// Request failed; the previous snapshot still stands
    Failed(String),
}

/// Handle to a running poll task
///
/// Dropping the handle stops the task.
pub struct Poller {
    target: PollTarget,
    event_rx: mpsc::Receiver<PollEvent>,
    refresh_tx: mpsc::Sender<()>,
    task: JoinHandle<()>,
}

impl Poller {
    /// Start polling; the first fetch happens immediately
    pub fn spawn<S>(service: Arc<S>, target: PollTarget, period: Duration) -> Self
    where
        S: DuelService + Send + Sync + 'static,
    {
        let (event_tx, event_rx) = mpsc::channel(16);
        // One slot: refresh requests made while one is pending collapse into it
        let (refresh_tx, refresh_rx) = mpsc::channel(1);

        debug!(poll = ?target, ?period, "Starting poller");
        let task = tokio::spawn(poll_task(
            service,
            target.clone(),
            period,
            refresh_rx,
            event_tx,
        ));

        Self {
            target,
            event_rx,
            refresh_tx,
            task,
        }
    }

    /// Ask for a fetch now instead of waiting for the next tick
    pub fn refresh(&self) {
        // Full means a refresh is already queued
        let _ = self.refresh_tx.try_send(());
    }

    /// Wait for the next fetch result
    pub async fn next_event(&mut self) -> Option<PollEvent> {
        self.event_rx.recv().await
    }

    pub fn try_recv(&mut self) -> Option<PollEvent> {
        self.event_rx.try_recv().ok()
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        debug!(poll = ?self.target, "Stopping poller");
        self.task.abort();
    }
}

async fn poll_task<S>(
    service: Arc<S>,
    target: PollTarget,
    period: Duration,
    mut refresh_rx: mpsc::Receiver<()>,
    event_tx: mpsc::Sender<PollEvent>,
) where
    S: DuelService + Send + Sync + 'static,
{
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            request = refresh_rx.recv() => {
                if request.is_none() {
                    break;
                }
                ticker.reset();
            }
        }

        let event = fetch(service.as_ref(), &target).await;
        if event_tx.send(event).await.is_err() {
            break;
        }
    }

    debug!(poll = ?target, "Poll task finished");
}

async fn fetch<S: DuelService>(service: &S, target: &PollTarget) -> PollEvent {
    let result = match target {
        PollTarget::Duel(id) => service
            .get_duel(id)
            .await
            .map(|d| d.map_or(PollEvent::Missing, PollEvent::Duel)),
        PollTarget::Game(id) => service
            .get_game(id)
            .await
            .map(|g| g.map_or(PollEvent::Missing, PollEvent::Game)),
    };

    result.unwrap_or_else(|e| {
        warn!(poll = ?target, error = %e, "Poll failed");
        PollEvent::Failed(e.to_string())
    })
}
