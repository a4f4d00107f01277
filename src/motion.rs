//! Motion state machine
//!
//! Classifies each consolidated fix into a power/motion event. The state is a
//! plain value owned by the caller; [`MotionState::transition`] returns the
//! event together with the next state and never mutates anything.
//!
//! Speed is compared strictly against zero with no deadband, so receiver
//! jitter around 0.1 m/s flips between MOVING and STOPPED.

use crate::types::{ConsolidatedFix, EventKind};

/// Motion state across the life of the process
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MotionState {
    /// No valid fix seen yet
    #[default]
    Uninitialized,
    Stationary,
    Moving,
}

impl MotionState {
    /// Event and next state for a fix that has already passed the gate
    pub fn classify(self, speed_m_s: f64) -> (EventKind, MotionState) {
        let moving = speed_m_s > 0.0;
        match (self, moving) {
            (MotionState::Uninitialized, true) => (EventKind::PowerOn, MotionState::Moving),
            (MotionState::Uninitialized, false) => (EventKind::PowerOn, MotionState::Stationary),
            (MotionState::Stationary, true) => (EventKind::Moving, MotionState::Moving),
            (MotionState::Stationary, false) => {
                (EventKind::PositionReport, MotionState::Stationary)
            }
            (MotionState::Moving, false) => (EventKind::Stopped, MotionState::Stationary),
            (MotionState::Moving, true) => (EventKind::PositionReport, MotionState::Moving),
        }
    }

    /// Classify a fix; `None` (state unchanged) unless it is valid and geolocated
    pub fn transition(self, fix: &ConsolidatedFix) -> Option<(EventKind, MotionState)> {
        if !fix.is_locatable() {
            return None;
        }
        Some(self.classify(fix.speed_m_s))
    }

    pub fn is_moving(&self) -> bool {
        matches!(self, MotionState::Moving)
    }
}
