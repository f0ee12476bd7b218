//! # Event Sources
//!
//! The monitor never fabricates events; it pulls them from an injected
//! [`EventSource`]. A source returning `None` means "nothing pending this
//! cycle", not end of session.

use std::collections::VecDeque;
use std::sync::mpsc;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use dpc_core::{DpEvent, EventType};

/// Supplies the next live event to the monitor.
pub trait EventSource: Send {
    /// The next pending event, if any.
    fn next_event(&mut self) -> Option<DpEvent>;
}

impl<S: EventSource + ?Sized> EventSource for Box<S> {
    fn next_event(&mut self) -> Option<DpEvent> {
        (**self).next_event()
    }
}

// ---------------------------------------------------------------------------
// QueueEventSource
// ---------------------------------------------------------------------------

/// Replays a fixed list of events in order.
#[derive(Debug, Clone, Default)]
pub struct QueueEventSource {
    queue: VecDeque<DpEvent>,
}

impl QueueEventSource {
    /// An empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the given events.
    pub fn from_events(events: impl IntoIterator<Item = DpEvent>) -> Self {
        Self {
            queue: events.into_iter().collect(),
        }
    }

    /// Append an event at the back.
    pub fn push(&mut self, event: DpEvent) {
        self.queue.push_back(event);
    }

    /// Events still queued.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether the queue is drained.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl EventSource for QueueEventSource {
    fn next_event(&mut self) -> Option<DpEvent> {
        self.queue.pop_front()
    }
}

// ---------------------------------------------------------------------------
// ChannelEventSource
// ---------------------------------------------------------------------------

/// Receives events pushed from another thread. Never blocks.
#[derive(Debug)]
pub struct ChannelEventSource {
    rx: mpsc::Receiver<DpEvent>,
}

impl ChannelEventSource {
    /// Create a source and the sender that feeds it.
    pub fn channel() -> (mpsc::Sender<DpEvent>, Self) {
        let (tx, rx) = mpsc::channel();
        (tx, Self { rx })
    }

    /// Wrap an existing receiver.
    pub fn from_receiver(rx: mpsc::Receiver<DpEvent>) -> Self {
        Self { rx }
    }
}

impl EventSource for ChannelEventSource {
    fn next_event(&mut self) -> Option<DpEvent> {
        self.rx.try_recv().ok()
    }
}

// ---------------------------------------------------------------------------
// SimulatedEventSource
// ---------------------------------------------------------------------------

/// Seeded random events for drills and demonstrations.
///
/// Each draw is `Normal` with probability `normal_ratio` (0.7 by default),
/// otherwise a uniformly chosen fault type.
#[derive(Debug)]
pub struct SimulatedEventSource {
    vessel_id: String,
    rng: StdRng,
    normal_ratio: f64,
    remaining: Option<usize>,
}

impl SimulatedEventSource {
    /// Default share of neutral events.
    pub const DEFAULT_NORMAL_RATIO: f64 = 0.7;

    /// Unlimited source for a vessel.
    pub fn new(vessel_id: impl Into<String>, seed: u64) -> Self {
        Self {
            vessel_id: vessel_id.into(),
            rng: StdRng::seed_from_u64(seed),
            normal_ratio: Self::DEFAULT_NORMAL_RATIO,
            remaining: None,
        }
    }

    /// Builder: share of neutral events, clamped to `[0, 1]`. A NaN or
    /// infinite ratio is ignored and the current ratio kept.
    pub fn with_normal_ratio(mut self, ratio: f64) -> Self {
        if ratio.is_finite() {
            self.normal_ratio = ratio.clamp(0.0, 1.0);
        } else {
            tracing::warn!(ratio, kept = self.normal_ratio, "ignoring non-finite normal ratio");
        }
        self
    }

    /// Builder: stop producing after `count` events.
    pub fn with_limit(mut self, count: usize) -> Self {
        self.remaining = Some(count);
        self
    }

    fn draw(&mut self) -> EventType {
        if self.rng.gen_bool(self.normal_ratio) {
            return EventType::Normal;
        }
        let faults: Vec<EventType> = EventType::all()
            .iter()
            .copied()
            .filter(|t| !t.is_neutral())
            .collect();
        faults
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(EventType::Normal)
    }
}

impl EventSource for SimulatedEventSource {
    fn next_event(&mut self) -> Option<DpEvent> {
        if let Some(remaining) = self.remaining.as_mut() {
            if *remaining == 0 {
                return None;
            }
            *remaining -= 1;
        }
        let event_type = self.draw();
        Some(DpEvent::new(event_type, self.vessel_id.clone()))
    }
}
