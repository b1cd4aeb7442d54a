//! Score, combo multiplier and lives bookkeeping

use serde::{Deserialize, Serialize};

use crate::settings::Settings;

/// What a lost ball cost the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BallLoss {
    /// Cheats on: no life taken
    Shielded,
    LifeLost,
    /// Lives went negative; the run is lost
    GameOver,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scoreboard {
    pub score: u64,
    /// Always >= 1.0
    pub multiplier: f32,
    /// -1 only on the frame the run is lost
    pub lives: i32,
}

impl Scoreboard {
    pub fn new(lives: i32) -> Self {
        Self {
            score: 0,
            multiplier: 1.0,
            lives,
        }
    }

    /// Credit a destroyed block; returns the points added
    pub fn award_block(&mut self, settings: &Settings) -> u64 {
        let points = (settings.points_per_block as f32 * self.multiplier).round() as u64;
        self.score += points;
        self.multiplier += settings.multiplier_step;
        points
    }

    /// Charge a lost ball. The multiplier resets either way.
    pub fn lose_ball(&mut self, cheats: bool) -> BallLoss {
        self.multiplier = 1.0;
        if cheats {
            return BallLoss::Shielded;
        }
        self.lives -= 1;
        if self.lives < 0 {
            BallLoss::GameOver
        } else {
            BallLoss::LifeLost
        }
    }

    /// Room for another ball within the life budget
    pub fn can_spawn(&self, balls_in_play: usize, cheats: bool) -> bool {
        cheats || (balls_in_play as i64) <= self.lives as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_award_scales_with_multiplier() {
        let s = Settings::default();
        let mut board = Scoreboard::new(2);
        assert_eq!(board.award_block(&s), 10);
        assert!((board.multiplier - 1.1).abs() < 1e-6);
        assert_eq!(board.award_block(&s), 11);
        assert_eq!(board.score, 21);
    }

    #[test]
    fn test_third_loss_is_game_over() {
        let mut board = Scoreboard::new(2);
        assert_eq!(board.lose_ball(false), BallLoss::LifeLost);
        assert_eq!(board.lives, 1);
        assert_eq!(board.lose_ball(false), BallLoss::LifeLost);
        assert_eq!(board.lives, 0);
        assert_eq!(board.lose_ball(false), BallLoss::GameOver);
        assert_eq!(board.lives, -1);
    }

    #[test]
    fn test_loss_resets_multiplier_even_with_cheats() {
        let s = Settings::default();
        let mut board = Scoreboard::new(2);
        board.award_block(&s);
        board.award_block(&s);
        assert_eq!(board.lose_ball(true), BallLoss::Shielded);
        assert_eq!(board.multiplier, 1.0);
        assert_eq!(board.lives, 2);
    }

    #[test]
    fn test_spawn_budget() {
        let board = Scoreboard::new(0);
        assert!(board.can_spawn(0, false));
        assert!(!board.can_spawn(1, false));
        assert!(board.can_spawn(5, true));
    }
}
