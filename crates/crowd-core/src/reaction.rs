//! Crowd reactions: the excite / soothe hook that widens or narrows the
//! swing amplitude range of every block.
//!
//! Gameplay code may fire reactions from any thread through a
//! [`ReactionHandle`]. They are queued and applied by the crowd system in
//! arrival order between frames, never while a fan-out is reading configs.

use crate::config::BlockConfig;
use crate::constants::EXCITEMENT_INCREMENT;
use std::sync::mpsc::Sender;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reaction {
    Excite,
    Soothe,
}

impl Reaction {
    pub fn delta(self) -> f32 {
        match self {
            Reaction::Excite => EXCITEMENT_INCREMENT,
            Reaction::Soothe => -EXCITEMENT_INCREMENT,
        }
    }

    /// Apply to every block. Returns `true` if any block hit a bound.
    pub fn apply(self, configs: &mut [BlockConfig]) -> bool {
        let mut clamped = false;
        for config in configs.iter_mut() {
            clamped |= config.nudge_swing_amplitude(self.delta());
        }
        clamped
    }
}

/// Cloneable, `Send` sender for reactions.
#[derive(Clone, Debug)]
pub struct ReactionHandle {
    tx: Sender<Reaction>,
}

impl ReactionHandle {
    pub(crate) fn new(tx: Sender<Reaction>) -> Self {
        Self { tx }
    }

    pub fn excite(&self) {
        self.send(Reaction::Excite);
    }

    pub fn soothe(&self) {
        self.send(Reaction::Soothe);
    }

    pub fn send(&self, reaction: Reaction) {
        if self.tx.send(reaction).is_err() {
            log::debug!("[reaction] crowd system gone; dropping {:?}", reaction);
        }
    }
}
