//! Single-tap / double-tap classifier.
//!
//! Gestures are told apart by the time between consecutive touch starts, not
//! by how long a touch is held. A first tap arms a deferred single-tap timer;
//! a second tap inside the window cancels that timer and yields a double tap.
//! The timer is polled, never spawned: the host calls [`TouchClassifier::poll_at`]
//! once per frame and receives the single-tap intent when the window expires.

use std::time::Instant;

use arrayvec::ArrayVec;
use tracing::debug;

use crate::types::{TouchIntent, DOUBLE_TAP_WINDOW_MS};

/// Tracks touch timing for one player.
#[derive(Debug, Clone)]
pub struct TouchClassifier {
    is_touching: bool,
    touch_count: u32,
    last_touch_ms: Option<u64>,
    window_ms: u64,
    /// When the armed single-tap timer fires
    pending_deadline: Option<u64>,
    origin: Instant,
}

impl Default for TouchClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl TouchClassifier {
    pub fn new() -> Self {
        Self::with_window_ms(DOUBLE_TAP_WINDOW_MS)
    }

    pub fn with_window_ms(window_ms: u64) -> Self {
        Self {
            is_touching: false,
            touch_count: 0,
            last_touch_ms: None,
            window_ms,
            pending_deadline: None,
            origin: Instant::now(),
        }
    }

    pub fn window_ms(&self) -> u64 {
        self.window_ms
    }

    pub fn is_touching(&self) -> bool {
        self.is_touching
    }

    pub fn touch_count(&self) -> u32 {
        self.touch_count
    }

    pub fn last_touch_ms(&self) -> Option<u64> {
        self.last_touch_ms
    }

    /// Deadline of the armed single-tap timer, if one is outstanding.
    pub fn pending_deadline(&self) -> Option<u64> {
        self.pending_deadline
    }

    /// Milliseconds on this classifier's own monotonic clock.
    pub fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }

    /// Touch start, timestamped internally.
    pub fn touch_start(&mut self) -> ArrayVec<TouchIntent, 2> {
        let now = self.now_ms();
        self.touch_start_at(now)
    }

    /// Touch start at an explicit time.
    ///
    /// If a single-tap timer expired without being polled, its `Jump` is
    /// emitted first so intents always come out in time order.
    pub fn touch_start_at(&mut self, now_ms: u64) -> ArrayVec<TouchIntent, 2> {
        let mut intents = ArrayVec::new();
        if let Some(expired) = self.poll_at(now_ms) {
            intents.push(expired);
        }

        self.is_touching = true;
        let within_window = self
            .last_touch_ms
            .is_some_and(|last| now_ms.saturating_sub(last) < self.window_ms);
        self.last_touch_ms = Some(now_ms);

        if within_window {
            self.pending_deadline = None;
            self.touch_count = 0;
            debug!(now_ms, "double tap");
            intents.push(TouchIntent::DoubleJump);
        } else {
            // Supersedes any timer still outstanding.
            self.touch_count = 1;
            self.pending_deadline = Some(now_ms + self.window_ms);
        }
        intents
    }

    /// Touch end. Never produces a gesture.
    pub fn touch_end(&mut self) {
        self.is_touching = false;
    }

    /// Fire the single-tap timer if its deadline has passed.
    pub fn poll_at(&mut self, now_ms: u64) -> Option<TouchIntent> {
        match self.pending_deadline {
            Some(deadline) if now_ms >= deadline => {
                self.pending_deadline = None;
                self.touch_count = 0;
                debug!(deadline, "single tap");
                Some(TouchIntent::Jump)
            }
            _ => None,
        }
    }

    pub fn poll(&mut self) -> Option<TouchIntent> {
        let now = self.now_ms();
        self.poll_at(now)
    }

    /// Drop the pending timer and forget the last tap.
    pub fn reset(&mut self) {
        self.is_touching = false;
        self.touch_count = 0;
        self.last_touch_ms = None;
        self.pending_deadline = None;
    }
}
