//! Frame drawing.
//!
//! Lays out one frame of the session through a `RenderBackend`. The layout
//! is proportional to the court so any canvas size works.

use pong_shared::{
    ball::Ball,
    config::Court,
    net::Scores,
    paddle::Paddle,
    render::{Color, RenderBackend},
};

use crate::session::{GameState, Session};

/// Draws the whole frame for the current state.
pub fn draw_frame(session: &Session, r: &mut impl RenderBackend) {
    let court = session.cfg.court;
    let state = session.state();
    draw_field(court, matches!(state, GameState::Serve | GameState::Playing), r);
    match state {
        GameState::Waiting => draw_title(court, "pong", "waiting for opponent...", r),
        GameState::Start => draw_title(court, "pong", "press space to start", r),
        GameState::Over => {
            let headline = if session.scores.player > session.scores.opponent {
                "you won!"
            } else {
                "game over"
            };
            draw_title(court, headline, "press space to play again", r);
        }
        GameState::Serve | GameState::Playing => {
            draw_elements(&session.player, &session.opponent, &session.ball, r);
            draw_scores(court, session.scores, r);
        }
    }
}

/// Black field, plus the dashed center line during play.
pub fn draw_field(court: Court, center_line: bool, r: &mut impl RenderBackend) {
    r.clear(Color::BLACK);
    r.fill_rect(0.0, 0.0, court.width, court.height, Color::BLACK);
    if center_line {
        let dash = court.height / 41.0;
        let x = court.center_x();
        let mut y = 0.0;
        while y < court.height {
            r.line(x, y, x, (y + dash).min(court.height), 5.0, Color::WHITE);
            y += dash * 2.0;
        }
    }
}

pub fn draw_title(court: Court, headline: &str, hint: &str, r: &mut impl RenderBackend) {
    r.text(
        headline,
        court.center_x(),
        court.height / 3.0,
        court.height / 8.0,
        Color::WHITE,
    );
    r.text(
        hint,
        court.center_x(),
        court.height * 2.0 / 3.0,
        court.height / 32.0,
        Color::WHITE,
    );
}

/// Opponent score on the left quarter, player score on the right.
pub fn draw_scores(court: Court, scores: Scores, r: &mut impl RenderBackend) {
    let y = court.height / 6.0;
    let size = court.height / 8.0;
    r.text(&scores.opponent.to_string(), court.width / 4.0, y, size, Color::WHITE);
    r.text(&scores.player.to_string(), court.width * 3.0 / 4.0, y, size, Color::WHITE);
}

/// Paddles, ball, and the fading trail behind it.
pub fn draw_elements(player: &Paddle, opponent: &Paddle, ball: &Ball, r: &mut impl RenderBackend) {
    for paddle in [player, opponent] {
        let hb = &paddle.hitbox;
        r.fill_rect(hb.nw_x, hb.nw_y, hb.width(), hb.height(), Color::WHITE);
    }

    let radius = ball.hitbox.width() / 2.0;
    let center = ball.position();
    r.fill_circle(center.x, center.y, radius, Color::WHITE);

    let mut alpha = 64u8;
    for p in ball.trail() {
        r.fill_circle(p.x, p.y, radius, Color::rgba(255, 255, 255, alpha));
        alpha /= 2;
    }
}
