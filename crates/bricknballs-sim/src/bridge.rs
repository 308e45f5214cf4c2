//! Event bridge between the physics step and the game-state consumer.
//!
//! Two unbounded multi-producer/single-consumer queues: brick hits carry the
//! brick handle, ball-lost carries nothing. Producers may run on many
//! detection workers at once; the consumer drains on the tick thread.
//!
//! The queues are unbounded. A caller that stops draining every tick will
//! accumulate facts without limit; draining is the caller's obligation.

use crossbeam_channel::{unbounded, Receiver, Sender};
use hecs::Entity;
use tracing::{debug, warn};

struct Channels {
    hit_tx: Sender<Entity>,
    hit_rx: Receiver<Entity>,
    lost_tx: Sender<()>,
    lost_rx: Receiver<()>,
}

impl Channels {
    fn open() -> Self {
        let (hit_tx, hit_rx) = unbounded();
        let (lost_tx, lost_rx) = unbounded();
        Self {
            hit_tx,
            hit_rx,
            lost_tx,
            lost_rx,
        }
    }
}

/// Owned bridge with an explicit init/teardown lifecycle.
///
/// Every operation is safe before `init` and after `teardown`: enqueues are
/// dropped and dequeues report empty.
#[derive(Default)]
pub struct EventBridge {
    channels: Option<Channels>,
}

impl EventBridge {
    /// An uninitialized bridge. Call [`EventBridge::init`] before use.
    pub fn new() -> Self {
        Self { channels: None }
    }

    /// A bridge with live storage.
    pub fn initialized() -> Self {
        let mut bridge = Self::new();
        bridge.init();
        bridge
    }

    /// Allocate the queues. Returns false (and keeps the existing queues)
    /// if the bridge is already live.
    pub fn init(&mut self) -> bool {
        if self.channels.is_some() {
            warn!("event bridge already initialized, keeping existing queues");
            return false;
        }
        self.channels = Some(Channels::open());
        debug!("event bridge initialized");
        true
    }

    /// Release the queues. Pending facts are discarded.
    pub fn teardown(&mut self) {
        if let Some(channels) = self.channels.take() {
            debug!(
                pending_hits = channels.hit_rx.len(),
                pending_lost = channels.lost_rx.len(),
                "event bridge torn down"
            );
        }
    }

    /// Whether the queues are live.
    pub fn is_ready(&self) -> bool {
        self.channels.is_some()
    }

    /// Queue a brick hit. Returns false if the bridge is not live.
    pub fn enqueue_hit(&self, brick: Entity) -> bool {
        match &self.channels {
            // The receiver lives alongside the sender, so send cannot fail.
            Some(channels) => channels.hit_tx.send(brick).is_ok(),
            None => false,
        }
    }

    pub fn try_dequeue_hit(&self) -> Option<Entity> {
        self.channels
            .as_ref()
            .and_then(|channels| channels.hit_rx.try_recv().ok())
    }

    /// Queue a ball-lost signal. Returns false if the bridge is not live.
    pub fn enqueue_ball_lost(&self) -> bool {
        match &self.channels {
            Some(channels) => channels.lost_tx.send(()).is_ok(),
            None => false,
        }
    }

    pub fn try_dequeue_ball_lost(&self) -> bool {
        self.channels
            .as_ref()
            .is_some_and(|channels| channels.lost_rx.try_recv().is_ok())
    }

    /// Drain both queues. Used on game reset.
    pub fn clear(&self) {
        let Some(channels) = &self.channels else {
            return;
        };
        let hits = channels.hit_rx.try_iter().count();
        let lost = channels.lost_rx.try_iter().count();
        if hits > 0 || lost > 0 {
            debug!(hits, lost, "event bridge cleared");
        }
    }

    /// Pending (brick hits, ball-lost signals).
    pub fn pending(&self) -> (usize, usize) {
        match &self.channels {
            Some(channels) => (channels.hit_rx.len(), channels.lost_rx.len()),
            None => (0, 0),
        }
    }
}
