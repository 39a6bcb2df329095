//! Game state to vertex list
//!
//! Pure function of the state; text (score, titles) is drawn by the HUD.

use glam::Vec2;

use super::shapes::{self, CORNER_RADIUS};
use super::vertex::{Vertex, colors};
use crate::sim::{GamePhase, GameState, Rect};
use crate::tuning::Tuning;

const CIRCLE_SEGMENTS: u32 = 32;
const CORNER_SEGMENTS: u32 = 3;

/// Life marker size and spacing
const LIFE_SIZE: f32 = 15.0;
const LIFE_SPACING: f32 = 17.0;
const LIFE_Y: f32 = 24.0;

const PLAY_BUTTON_RADIUS: f32 = 50.0;

/// Center of the play button shown on the menu and end screens
pub fn play_button_center(tuning: &Tuning) -> Vec2 {
    Vec2::new(tuning.field_width / 2.0, 100.0 + tuning.field_height / 2.0)
}

/// Build the frame's geometry in field coordinates
pub fn build(state: &GameState) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(1024);
    match state.phase {
        GamePhase::Menu => play_button(&mut vertices, &state.tuning),
        GamePhase::Playing => field(&mut vertices, state),
        GamePhase::GameOver | GamePhase::Win => {
            field(&mut vertices, state);
            play_button(&mut vertices, &state.tuning);
        }
    }
    vertices
}

fn field(out: &mut Vec<Vertex>, state: &GameState) {
    for brick in state.bricks.iter().filter(|b| b.is_intact()) {
        let color = colors::linear(colors::brick(brick.row));
        out.extend(shapes::rounded_rect(
            brick.rect,
            CORNER_RADIUS,
            color,
            CORNER_SEGMENTS,
        ));
    }

    let white = colors::linear(colors::FOREGROUND);
    if state.ball.is_active() {
        out.extend(shapes::circle(
            state.ball.pos,
            state.ball.radius,
            white,
            CIRCLE_SEGMENTS,
        ));
    }
    out.extend(shapes::rounded_rect(
        state.paddle.rect(),
        CORNER_RADIUS,
        white,
        CORNER_SEGMENTS,
    ));

    lives(out, state);
}

/// One marker per starting life, centered at the top; spent lives are dimmed
fn lives(out: &mut Vec<Vertex>, state: &GameState) {
    let total = state.tuning.starting_lives as usize;
    let row_width = total as f32 * LIFE_SPACING - (LIFE_SPACING - LIFE_SIZE);
    let left = ((state.tuning.field_width - row_width) / 2.0).round();
    let on = colors::linear(colors::FOREGROUND);
    let off = colors::linear(colors::LIFE_SPENT);

    for i in 0..total {
        let color = if (state.lives as usize) > i { on } else { off };
        let r = Rect::new(left + i as f32 * LIFE_SPACING, LIFE_Y, LIFE_SIZE, LIFE_SIZE);
        out.extend(shapes::rounded_rect(r, CORNER_RADIUS, color, CORNER_SEGMENTS));
    }
}

fn play_button(out: &mut Vec<Vertex>, tuning: &Tuning) {
    let c = play_button_center(tuning);
    out.extend(shapes::circle(
        c,
        PLAY_BUTTON_RADIUS,
        colors::linear(colors::FOREGROUND),
        CIRCLE_SEGMENTS * 2,
    ));
    out.extend(shapes::triangle(
        c + Vec2::new(-14.0, -20.0),
        c + Vec2::new(22.0, 0.0),
        c + Vec2::new(-14.0, 20.0),
        colors::linear(colors::BACKGROUND),
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_color(vertices: &[Vertex], hex: u32) -> usize {
        let c = colors::linear(hex);
        vertices.iter().filter(|v| v.color == c).count()
    }

    #[test]
    fn test_menu_shows_only_play_button() {
        let state = GameState::new(1);
        let v = build(&state);
        assert_eq!(v.len(), (CIRCLE_SEGMENTS * 2 * 3 + 3) as usize);
        assert_eq!(count_color(&v, colors::BACKGROUND), 3);
    }

    #[test]
    fn test_playing_draws_every_intact_brick() {
        let mut state = GameState::new(1);
        state.start_game();
        let full = build(&state);

        let per_rect = (18 + 12 * CORNER_SEGMENTS) as usize;
        // 56 bricks, paddle, 3 lives, ball
        let expected = (56 + 1 + 3) * per_rect + (CIRCLE_SEGMENTS * 3) as usize;
        assert_eq!(full.len(), expected);

        state.bricks.destroy(0);
        let fewer = build(&state);
        assert_eq!(full.len() - fewer.len(), per_rect);
    }

    #[test]
    fn test_spent_lives_dimmed() {
        let mut state = GameState::new(1);
        state.start_game();
        state.lives = 1;
        let per_rect = (18 + 12 * CORNER_SEGMENTS) as usize;
        assert_eq!(count_color(&build(&state), colors::LIFE_SPENT), 2 * per_rect);
    }

    #[test]
    fn test_end_screen_overlays_button() {
        let mut state = GameState::new(1);
        state.start_game();
        let playing = build(&state).len();
        state.phase = GamePhase::GameOver;
        state.ball.retire();
        let over = build(&state);
        // Ball gone, button added
        assert_eq!(
            over.len(),
            playing - (CIRCLE_SEGMENTS * 3) as usize + (CIRCLE_SEGMENTS * 2 * 3 + 3) as usize
        );
    }
}
