//! Network reconciliation layer.
//!
//! Applies messages from the peer (via the relay) to the local session.
//! Ball state arrives in the sender's orientation and is mirrored here:
//! `x -> width - x`, `degrees -> 180 - degrees`.
//!
//! Payloads are not validated. Lost messages are never detected: a missed
//! `paddleSpeedChange` is corrected by the next `paddlePosition` heartbeat,
//! and a missed `paddleHit` stays visible until the next serve, which
//! carries a complete vector.

use pong_shared::{
    math::mirror_x,
    net::{NetMsg, Scores},
};
use tracing::{debug, info};

use crate::session::{GameState, Session};

/// Applies one inbound message. Takes effect immediately.
pub fn apply(session: &mut Session, msg: NetMsg) {
    debug!(event = msg.event_name(), "Inbound");
    match msg {
        NetMsg::InRoom => {
            info!("Opponent joined the room");
            session.set_state(GameState::Start);
        }
        NetMsg::OpponentName { name } => {
            info!(opponent = %name, "Opponent name");
            session.opponent_name = Some(name);
        }
        NetMsg::StartGame { vector } => {
            // A peer's start begins a new match, even from Over.
            session.scores = Scores::default();
            session.serve(vector, true);
        }
        NetMsg::Scored { vector } | NetMsg::OpponentScored { vector } => {
            session.serve(vector, true);
        }
        NetMsg::PaddleHit(hit) => {
            let width = session.cfg.court.width;
            session.ball.set_position(mirror_x(width, hit.ball.x), hit.ball.y);
            session.ball.set_vector(hit.vector.invert());
            session.opponent.set_y(hit.paddle_y);
        }
        NetMsg::PaddleSpeedChange { speed } => {
            session.opponent.set_speed(speed);
        }
        NetMsg::PaddlePosition { y } => {
            session.opponent.set_y(y);
        }
        NetMsg::Scores(scores) => {
            session.scores = scores;
        }
        NetMsg::CancelGame => {
            info!("Game cancelled by relay");
            session.reset_match();
            session.opponent_name = None;
            session.set_state(GameState::Waiting);
        }
        other => {
            debug!(event = other.event_name(), "Ignoring message not meant for a client");
        }
    }
}

#[cfg(test)]
mod tests {
    use pong_shared::{
        config::PongConfig,
        math::{Point, Vector},
        net::{PaddleHit, Scores},
    };

    use super::*;

    fn session() -> Session {
        Session::new(PongConfig {
            seed: Some(5),
            ..Default::default()
        })
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn paddle_hit_is_mirrored_into_local_court() {
        let mut s = session();
        apply(
            &mut s,
            NetMsg::PaddleHit(PaddleHit {
                ball: Point::new(550.0, 200.0),
                vector: Vector::new(15.0, 170.0),
                paddle_y: 230.0,
            }),
        );
        assert_eq!(s.ball.position(), Point::new(50.0, 200.0));
        let v = s.ball.vector();
        assert!(approx(v.magnitude, 15.0));
        assert!(approx(v.degrees, 10.0));
        assert_eq!(s.opponent.center_y(), 230.0);
        assert_eq!(s.opponent.hitbox.position().x, 60.0);
        assert!(s.drain_outbox().is_empty());
    }

    #[test]
    fn in_room_moves_to_start() {
        let mut s = session();
        apply(&mut s, NetMsg::InRoom);
        assert_eq!(s.state(), GameState::Start);
    }

    #[test]
    fn start_game_serves_inverted_vector() {
        let mut s = session();
        apply(&mut s, NetMsg::InRoom);
        apply(
            &mut s,
            NetMsg::StartGame {
                vector: Vector::new(10.0, 12.0),
            },
        );
        assert_eq!(s.state(), GameState::Serve);
        assert!(approx(s.ball.vector().degrees, 168.0));
    }

    #[test]
    fn start_game_clears_previous_match_scores() {
        let mut s = session();
        apply(
            &mut s,
            NetMsg::Scores(Scores {
                player: 0,
                opponent: 7,
            }),
        );
        s.set_state(GameState::Over);
        apply(
            &mut s,
            NetMsg::StartGame {
                vector: Vector::new(10.0, 0.0),
            },
        );
        assert_eq!(s.state(), GameState::Serve);
        assert_eq!(s.scores, Scores::default());
    }

    #[test]
    fn scored_and_opponent_scored_reserve() {
        for msg in [
            NetMsg::Scored {
                vector: Vector::new(10.0, -5.0),
            },
            NetMsg::OpponentScored {
                vector: Vector::new(10.0, -5.0),
            },
        ] {
            let mut s = session();
            apply(&mut s, msg);
            assert_eq!(s.state(), GameState::Serve);
            let degrees = s.ball.vector().degrees;
            assert!(approx(degrees, -175.0) || approx(degrees, 185.0));
        }
    }

    #[test]
    fn speed_change_moves_opponent_without_echo() {
        let mut s = session();
        apply(&mut s, NetMsg::PaddleSpeedChange { speed: 10.0 });
        apply(&mut s, NetMsg::PaddleSpeedChange { speed: 10.0 });
        assert_eq!(s.opponent.speed(), 10.0);
        assert!(s.drain_outbox().is_empty());
    }

    #[test]
    fn heartbeat_snaps_opponent() {
        let mut s = session();
        apply(&mut s, NetMsg::PaddlePosition { y: 77.0 });
        assert_eq!(s.opponent.center_y(), 77.0);
    }

    #[test]
    fn scores_overwrite_idempotently() {
        let mut s = session();
        let msg = NetMsg::Scores(Scores {
            player: 4,
            opponent: 2,
        });
        apply(&mut s, msg.clone());
        let first = s.scores;
        apply(&mut s, msg);
        assert_eq!(s.scores, first);
        assert_eq!(
            s.scores,
            Scores {
                player: 4,
                opponent: 2
            }
        );
    }

    #[test]
    fn cancel_resets_to_waiting() {
        let mut s = session();
        apply(&mut s, NetMsg::InRoom);
        apply(
            &mut s,
            NetMsg::OpponentName {
                name: "bob".to_string(),
            },
        );
        apply(
            &mut s,
            NetMsg::Scores(Scores {
                player: 1,
                opponent: 1,
            }),
        );
        apply(&mut s, NetMsg::CancelGame);
        assert_eq!(s.state(), GameState::Waiting);
        assert_eq!(s.scores, Scores::default());
        assert_eq!(s.opponent_name, None);
    }

    #[test]
    fn relay_bound_messages_are_ignored() {
        let mut s = session();
        apply(&mut s, NetMsg::Leave);
        apply(
            &mut s,
            NetMsg::Login {
                name: "x".to_string(),
            },
        );
        assert_eq!(s.state(), GameState::Waiting);
        assert!(s.drain_outbox().is_empty());
    }
}
