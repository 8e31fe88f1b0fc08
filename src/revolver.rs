//! Six-chamber revolver owned by each player.
//!
//! The hammer starts at chamber 1 and moves forward one chamber on every
//! trigger pull, hit or miss. A pull is a hit when the hammer sits on the
//! bullet's chamber at the moment of the pull.

use rand::Rng;
use serde::{Deserialize, Serialize};

pub const CHAMBERS: u8 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revolver {
    bullet: u8,
    hammer: u8,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ChamberError {
    #[error("chamber must be between 1 and {CHAMBERS}, got {0}")]
    OutOfRange(u8),
}

impl Revolver {
    /// Load the bullet into `bullet` with the hammer on chamber 1.
    ///
    /// ```
    /// use liars_bar::revolver::Revolver;
    ///
    /// let mut gun = Revolver::new(2).unwrap();
    /// assert!(!gun.pull());
    /// assert!(gun.pull());
    /// assert_eq!(gun.hammer(), 3);
    /// ```
    pub fn new(bullet: u8) -> Result<Self, ChamberError> {
        if !(1..=CHAMBERS).contains(&bullet) {
            return Err(ChamberError::OutOfRange(bullet));
        }
        Ok(Self { bullet, hammer: 1 })
    }

    /// Fresh revolver with the bullet in a uniformly random chamber.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self { bullet: rng.random_range(1..=CHAMBERS), hammer: 1 }
    }

    /// Re-roll the bullet and put the hammer back on chamber 1.
    pub fn reload<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        *self = Self::random(rng);
    }

    pub fn bullet(&self) -> u8 {
        self.bullet
    }

    pub fn hammer(&self) -> u8 {
        self.hammer
    }

    /// Pulls the hammer has left before it reaches the bullet; 0 means the
    /// next pull fires.
    pub fn pulls_until_hit(&self) -> u8 {
        (self.bullet + CHAMBERS - self.hammer) % CHAMBERS
    }

    /// Pull the trigger. The hit check happens before the hammer advances.
    pub fn pull(&mut self) -> bool {
        let hit = self.hammer == self.bullet;
        self.hammer = self.hammer % CHAMBERS + 1;
        hit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn rejects_out_of_range_bullet() {
        assert_eq!(Revolver::new(0).unwrap_err(), ChamberError::OutOfRange(0));
        assert_eq!(Revolver::new(7).unwrap_err(), ChamberError::OutOfRange(7));
    }

    #[test]
    fn hammer_wraps_from_six_to_one() {
        let mut gun = Revolver::new(1).unwrap();
        assert!(gun.pull());
        for _ in 0..5 {
            assert!(!gun.pull());
        }
        assert_eq!(gun.hammer(), 1);
        assert!(gun.pull(), "second lap fires again on the bullet chamber");
    }

    #[test]
    fn reload_resets_hammer() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut gun = Revolver::new(6).unwrap();
        gun.pull();
        gun.pull();
        gun.reload(&mut rng);
        assert_eq!(gun.hammer(), 1);
        assert!((1..=CHAMBERS).contains(&gun.bullet()));
    }

    #[test]
    fn pulls_until_hit_counts_down() {
        let mut gun = Revolver::new(4).unwrap();
        assert_eq!(gun.pulls_until_hit(), 3);
        gun.pull();
        assert_eq!(gun.pulls_until_hit(), 2);
    }
}
