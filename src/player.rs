use crate::hand::Hand;
use crate::revolver::Revolver;
use serde::{Deserialize, Serialize};

/// One seat at the table. Players are created once per game and never
/// removed; elimination only flips `alive`.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Player {
    pub(crate) id: usize,
    pub(crate) name: String,
    pub(crate) hand: Hand,
    pub(crate) alive: bool,
    pub(crate) revolver: Revolver,
    pub(crate) shots_fired: u32,
    pub(crate) challenge_success: u32,
    pub(crate) challenge_fail: u32,
    pub(crate) rounds_survived: u32,
    pub(crate) last_action: Option<String>,
}

/// Lifetime counters for one seat, reported at game over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerTally {
    pub seat: usize,
    pub alive: bool,
    pub shots_fired: u32,
    pub challenge_success: u32,
    pub challenge_fail: u32,
    pub rounds_survived: u32,
}

impl Player {
    pub(crate) fn new(id: usize, revolver: Revolver) -> Self {
        Self {
            id,
            name: format!("P{id}"),
            hand: Hand::empty(),
            alive: true,
            revolver,
            shots_fired: 0,
            challenge_success: 0,
            challenge_fail: 0,
            rounds_survived: 0,
            last_action: None,
        }
    }

    /// Returns the stable 0-based seat index
    pub fn id(&self) -> usize {
        self.id
    }

    /// Returns the player's display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the player's current cards
    pub fn hand(&self) -> &Hand {
        &self.hand
    }

    /// Returns whether the player is still in the game
    pub fn alive(&self) -> bool {
        self.alive
    }

    /// Returns the player's revolver state
    pub fn revolver(&self) -> &Revolver {
        &self.revolver
    }

    /// Returns how many times this player has pulled the trigger
    pub fn shots_fired(&self) -> u32 {
        self.shots_fired
    }

    /// Returns how many of this player's challenges caught a lie
    pub fn challenge_success(&self) -> u32 {
        self.challenge_success
    }

    /// Returns how many of this player's challenges hit a truthful play
    pub fn challenge_fail(&self) -> u32 {
        self.challenge_fail
    }

    /// Returns how many round resets this player has lived through
    pub fn rounds_survived(&self) -> u32 {
        self.rounds_survived
    }

    /// Returns the player's last action as a string
    pub fn last_action(&self) -> Option<&str> {
        self.last_action.as_deref()
    }

    pub fn tally(&self) -> PlayerTally {
        PlayerTally {
            seat: self.id,
            alive: self.alive,
            shots_fired: self.shots_fired,
            challenge_success: self.challenge_success,
            challenge_fail: self.challenge_fail,
            rounds_survived: self.rounds_survived,
        }
    }

    /// One trigger pull. A hit eliminates the player and drops their cards.
    pub(crate) fn pull_trigger(&mut self) -> bool {
        let hit = self.revolver.pull();
        self.shots_fired += 1;
        if hit {
            self.eliminate();
        }
        hit
    }

    pub(crate) fn eliminate(&mut self) {
        self.alive = false;
        self.hand.clear();
    }
}
