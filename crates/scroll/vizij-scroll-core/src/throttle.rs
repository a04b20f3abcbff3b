//! Scroll throttle state machine.
//!
//! `Idle` accepts the next trigger and moves to `Throttled`; `Throttled` drops
//! triggers until the release timer fires. Every accepted scroll event also
//! (re)arms a trailing timer that replays the trigger once, so the final scroll
//! position is applied even when scrolling stops mid-window. The trailing
//! replay never arms another trailing timer.
//!
//! This type only tracks state and timer handles; the owner (see
//! [`crate::Binding`]) talks to the host's scheduler.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Timer delays, in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ThrottleConfig {
    /// Minimum spacing of accepted triggers (one 60fps frame).
    pub window_ms: u32,
    /// Delay of the trailing replay after the last accepted scroll event.
    pub trailing_ms: u32,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            window_ms: 16,
            trailing_ms: 64,
        }
    }
}

impl ThrottleConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_ms == 0 {
            return Err(ConfigError::InvalidThrottle {
                field: "windowMs",
                value: self.window_ms,
            });
        }
        if self.trailing_ms == 0 {
            return Err(ConfigError::InvalidThrottle {
                field: "trailingMs",
                value: self.trailing_ms,
            });
        }
        // The replay must find the window closed, otherwise it is dropped.
        if self.trailing_ms <= self.window_ms {
            return Err(ConfigError::ThrottleOrder {
                window_ms: self.window_ms,
                trailing_ms: self.trailing_ms,
            });
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ThrottleState {
    #[default]
    Idle,
    Throttled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trigger {
    /// A scroll event from the host.
    Scroll,
    /// Replay fired by the trailing timer.
    Trailing,
}

/// Outcome of [`ScrollThrottle::trigger`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision<T> {
    Dropped,
    /// Apply now and arm the release timer. When `arm_trailing` is set, cancel
    /// `cancel_trailing` (if any) and arm a fresh trailing timer.
    Accepted {
        cancel_trailing: Option<T>,
        arm_trailing: bool,
    },
}

#[derive(Debug)]
pub struct ScrollThrottle<T> {
    state: ThrottleState,
    release: Option<T>,
    trailing: Option<T>,
    accepted: u64,
    dropped: u64,
}

impl<T> Default for ScrollThrottle<T> {
    fn default() -> Self {
        Self {
            state: ThrottleState::Idle,
            release: None,
            trailing: None,
            accepted: 0,
            dropped: 0,
        }
    }
}

impl<T: Copy> ScrollThrottle<T> {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn state(&self) -> ThrottleState {
        self.state
    }

    pub fn pending_trailing(&self) -> Option<T> {
        self.trailing
    }

    pub fn pending_release(&self) -> Option<T> {
        self.release
    }

    /// Number of accepted triggers so far.
    pub fn accepted(&self) -> u64 {
        self.accepted
    }

    /// Number of dropped triggers so far.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn trigger(&mut self, trigger: Trigger) -> Decision<T> {
        match self.state {
            ThrottleState::Throttled => {
                self.dropped += 1;
                Decision::Dropped
            }
            ThrottleState::Idle => {
                self.state = ThrottleState::Throttled;
                self.accepted += 1;
                match trigger {
                    Trigger::Scroll => Decision::Accepted {
                        cancel_trailing: self.trailing.take(),
                        arm_trailing: true,
                    },
                    Trigger::Trailing => Decision::Accepted {
                        cancel_trailing: None,
                        arm_trailing: false,
                    },
                }
            }
        }
    }

    pub fn set_release_timer(&mut self, handle: T) {
        self.release = Some(handle);
    }

    pub fn set_trailing_timer(&mut self, handle: T) {
        self.trailing = Some(handle);
    }

    /// Release timer fired: accept triggers again.
    pub fn release(&mut self) {
        self.state = ThrottleState::Idle;
        self.release = None;
    }

    /// Trailing timer fired; its handle is spent.
    pub fn trailing_fired(&mut self) {
        self.trailing = None;
    }

    /// Back to `Idle`, handing out whatever timers are still pending so the
    /// owner can cancel them.
    pub fn reset(&mut self) -> [Option<T>; 2] {
        self.state = ThrottleState::Idle;
        [self.release.take(), self.trailing.take()]
    }
}
