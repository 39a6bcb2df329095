//! Headless game runner
//!
//! Plays complete games with the autopilot and reports how they ended.

use crate::sim::{GameEvent, GamePhase, GameState, TickInput, tick};

/// How a headless game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Won,
    Lost,
    /// Tick budget ran out mid-game
    TimedOut,
}

/// Result of one headless game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSummary {
    /// 1-based game number within the session
    pub game: u32,
    pub outcome: Outcome,
    pub score: u64,
    pub lives_left: u8,
    pub bricks_destroyed: usize,
    /// Frames simulated for this game
    pub ticks: u64,
}

/// Play one game on autopilot, calling `on_frame` after every tick.
///
/// Works from any phase that awaits a start trigger, so consecutive calls on
/// the same state play consecutive games.
pub fn play_autopilot_game<F>(state: &mut GameState, max_ticks: u64, mut on_frame: F) -> GameSummary
where
    F: FnMut(&GameState, &[GameEvent]),
{
    let input = TickInput {
        autopilot: true,
        ..Default::default()
    };
    let game = state.games_started + 1;
    let first_tick = state.time_ticks;

    let outcome = loop {
        let events = tick(state, &input);
        on_frame(state, &events);

        if state.games_started >= game {
            match state.phase {
                GamePhase::Win => break Outcome::Won,
                GamePhase::GameOver => break Outcome::Lost,
                GamePhase::Menu | GamePhase::Playing => {}
            }
        }
        if state.time_ticks - first_tick >= max_ticks {
            break Outcome::TimedOut;
        }
    };

    GameSummary {
        game,
        outcome,
        score: state.score,
        lives_left: state.lives,
        bricks_destroyed: state.bricks.destroyed_count(),
        ticks: state.time_ticks - first_tick,
    }
}
