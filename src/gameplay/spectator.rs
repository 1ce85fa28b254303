//! Spectator auto-play driver
//!
//! An explicit scheduler that issues one full turn of commands per tick
//! with a sleep cadence, in first-mover order, through the exact same
//! command surface a UI would use. It tolerates game-over at any point;
//! cancellation is simply not scheduling the next tick.

use std::thread;
use std::time::Duration;

use tracing::info;

use crate::core::error::Result;
use crate::core::types::Side;
use crate::gameplay::ai::AiStrategy;
use crate::gameplay::session::{GameResult, GameSession};

/// Drives a session with an AI per side until game-over
pub struct SpectatorDriver<P: AiStrategy, O: AiStrategy> {
    session: GameSession,
    player_ai: P,
    opponent_ai: O,
    interval: Duration,
}

impl<P: AiStrategy, O: AiStrategy> SpectatorDriver<P, O> {
    pub fn new(session: GameSession, player_ai: P, opponent_ai: O, interval: Duration) -> Self {
        Self {
            session,
            player_ai,
            opponent_ai,
            interval,
        }
    }

    /// The driven session, for inspection during or after the run
    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Play turns until the session reports game-over, sleeping for the
    /// configured interval between turns
    pub fn run(&mut self) -> Result<Option<GameResult>> {
        while !self.session.is_game_over() {
            self.play_turn()?;
            if self.session.is_game_over() {
                break;
            }
            if !self.interval.is_zero() {
                thread::sleep(self.interval);
            }
        }
        Ok(self.session.result().copied())
    }

    /// Issue one full turn of commands: Initiative is already resolved
    /// when a turn begins, so advance through Movement, WeaponAttack and
    /// PhysicalAttack with both sides acting in first-mover order, then
    /// let Heat, End, and the next Initiative resolve on advance.
    pub fn play_turn(&mut self) -> Result<()> {
        info!(turn = self.session.state().turn, "spectator turn");

        // Initiative -> Movement -> WeaponAttack -> PhysicalAttack
        for _ in 0..3 {
            if self.session.is_game_over() {
                return Ok(());
            }
            self.session.advance_phase()?;
            self.act_both_sides()?;
        }

        // Heat, End, next Initiative
        for _ in 0..3 {
            if self.session.is_game_over() {
                return Ok(());
            }
            self.session.advance_phase()?;
        }
        Ok(())
    }

    fn act_both_sides(&mut self) -> Result<()> {
        let first = self
            .session
            .state()
            .first_mover
            .unwrap_or(Side::Player);
        for side in [first, first.opposite()] {
            if self.session.is_game_over() {
                return Ok(());
            }
            match side {
                Side::Player => self.session.run_ai_turn(side, &mut self.player_ai)?,
                Side::Opponent => self.session.run_ai_turn(side, &mut self.opponent_ai)?,
            }
        }
        Ok(())
    }
}
