/// Game lifecycle controller: Ready → Starting → Running → GameOver → Ready.
///
/// The controller is the only place that starts or cancels timers
/// for whole-round concerns. Time moves forward through `advance`,
/// which fires due timers one at a time and routes each to its
/// handler here, so every state change happens inside one call and
/// no two handlers ever overlap.

use tracing::info;

use crate::domain::entity::GhostColour;

use super::event::GameEvent;
use super::step;
use super::timer::TimerId;
use super::world::{Phase, WorldState, GAME_OVER_TEXT, READY_TEXT};

/// Press of the start control. Only honoured in Ready.
pub fn start(world: &mut WorldState) -> Vec<GameEvent> {
    if !world.start_enabled() {
        return vec![];
    }
    world.phase = Phase::Starting;
    world
        .timers
        .schedule_once(TimerId::RoundStart, world.timing.intro_delay_ms);
    info!(delay_ms = world.timing.intro_delay_ms, "intro started");
    vec![GameEvent::IntroStarted]
}

/// Let `elapsed_ms` of game time pass, firing whatever comes due.
pub fn advance(world: &mut WorldState, elapsed_ms: u64) -> Vec<GameEvent> {
    let mut events = Vec::new();
    let until = world.timers.now_ms() + elapsed_ms;
    while let Some(id) = world.timers.pop_due(until) {
        dispatch(world, id, &mut events);
    }
    world.timers.settle(until);
    events
}

fn dispatch(world: &mut WorldState, id: TimerId, events: &mut Vec<GameEvent>) {
    match id {
        TimerId::Ghost(idx) => step::ghost_tick(world, idx, events),
        TimerId::ScareExpiry => step::unscare_ghosts(world, events),
        TimerId::RoundStart => begin_round(world, events),
        TimerId::RoundReset => events.extend(reset_board(world)),
    }
}

fn begin_round(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    if world.phase != Phase::Starting {
        return;
    }
    world.phase = Phase::Running;
    world.score = 0;
    world.ready_message.clear();
    world.state_message.clear();
    for (i, g) in world.ghosts.iter().enumerate() {
        world.timers.schedule_every(TimerId::Ghost(i), g.period_ms);
    }
    info!("round started");
    events.push(GameEvent::RoundStarted);
}

/// The player met a ghost that was not scared.
pub fn end_round(world: &mut WorldState, by: GhostColour, events: &mut Vec<GameEvent>) {
    world.phase = Phase::GameOver;
    world
        .timers
        .cancel_where(|id| matches!(id, TimerId::Ghost(_) | TimerId::ScareExpiry));
    events.push(GameEvent::PlayerKilled { by });

    world.player.reset();
    for g in world.ghosts.iter_mut() {
        g.reset();
    }

    if world.score > world.high_score {
        world.high_score = world.score;
        events.push(GameEvent::NewHighScore { score: world.score });
    }
    world.state_message = GAME_OVER_TEXT.to_string();
    world
        .timers
        .schedule_once(TimerId::RoundReset, world.timing.reset_delay_ms);
    info!(
        by = by.name(),
        score = world.score,
        high_score = world.high_score,
        pending_timers = world.timers.pending(),
        "game over"
    );
}

/// Rebuild the board and return to Ready. Safe to call at any time;
/// cancels every pending timer first.
pub fn reset_board(world: &mut WorldState) -> Vec<GameEvent> {
    world.timers.cancel_all();
    world.board.reset();
    world.player.reset();
    for g in world.ghosts.iter_mut() {
        g.reset();
    }
    world.state_message.clear();
    world.ready_message = READY_TEXT.to_string();
    world.phase = Phase::Ready;
    info!("board reset");
    vec![GameEvent::RoundReset]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimingConfig;
    use crate::domain::entity::Direction;
    use crate::domain::maze;

    fn world() -> WorldState {
        WorldState::new(TimingConfig::default(), Some(42))
    }

    fn running() -> WorldState {
        let mut w = world();
        start(&mut w);
        let intro = w.timing.intro_delay_ms;
        advance(&mut w, intro);
        assert_eq!(w.phase, Phase::Running);
        w
    }

    #[test]
    fn start_waits_for_intro() {
        let mut w = world();
        let events = start(&mut w);
        assert_eq!(events, vec![GameEvent::IntroStarted]);
        assert_eq!(w.phase, Phase::Starting);
        assert!(!w.start_enabled());
        // Keys do nothing during the intro.
        step::move_player(&mut w, Direction::Left);
        assert_eq!(w.player.position, maze::PLAYER_START);

        let intro = w.timing.intro_delay_ms;
        advance(&mut w, intro - 1);
        assert_eq!(w.phase, Phase::Starting);
        let events = advance(&mut w, 1);
        assert!(events.contains(&GameEvent::RoundStarted));
        assert_eq!(w.phase, Phase::Running);
        assert!(w.ready_message.is_empty());
        for i in 0..4 {
            assert!(w.timers.is_scheduled(TimerId::Ghost(i)));
        }
    }

    #[test]
    fn second_start_is_ignored() {
        let mut w = world();
        start(&mut w);
        assert!(start(&mut w).is_empty());
        let mut w = running();
        assert!(start(&mut w).is_empty());
    }

    #[test]
    fn round_start_resets_score() {
        let mut w = world();
        w.score = 99;
        start(&mut w);
        let intro = w.timing.intro_delay_ms;
        advance(&mut w, intro);
        assert_eq!(w.score, 0);
    }

    #[test]
    fn ghosts_step_on_their_own_periods() {
        let mut w = running();
        // Keep the player out of the way.
        w.player.position = w.board.index(1, 21).unwrap();
        let events = advance(&mut w, 1_000);
        let steps = |idx: usize| {
            events
                .iter()
                .filter(|e| matches!(e, GameEvent::GhostMoved { ghost, .. } if *ghost == idx))
                .count()
        };
        assert_eq!(steps(0), 2); // 500 ms
        assert_eq!(steps(1), 1); // 600 ms
        assert_eq!(steps(2), 1); // 700 ms
        assert_eq!(steps(3), 1); // 800 ms
    }

    #[test]
    fn ghosts_never_enter_walls_or_forbidden() {
        let mut w = running();
        w.player.position = w.board.index(1, 21).unwrap();
        for _ in 0..600 {
            advance(&mut w, 100);
            if w.phase != Phase::Running {
                break;
            }
            for g in &w.ghosts {
                assert!(!w.board.is_wall(g.position));
                assert!(!w.board.is_forbidden(g.position));
            }
        }
    }

    #[test]
    fn scare_lasts_ten_seconds() {
        let mut w = running();
        w.player.position = w.board.index(2, 17).unwrap();
        step::move_player(&mut w, Direction::Left);
        assert!(w.ghosts.iter().all(|g| g.scared));

        // Park the ghosts' timers so nobody wanders into the player.
        w.timers.cancel_where(|id| matches!(id, TimerId::Ghost(_)));
        advance(&mut w, 9_999);
        assert!(w.ghosts.iter().all(|g| g.scared));
        let events = advance(&mut w, 1);
        assert!(events.contains(&GameEvent::ScareEnded));
        assert!(w.ghosts.iter().all(|g| !g.scared));
    }

    #[test]
    fn second_pellet_restarts_scare_window() {
        let mut w = running();
        w.timers.cancel_where(|id| matches!(id, TimerId::Ghost(_)));
        w.player.position = w.board.index(2, 17).unwrap();
        step::move_player(&mut w, Direction::Left);
        advance(&mut w, 6_000);

        // Second power pellet at (26,17).
        w.player.position = w.board.index(25, 17).unwrap();
        step::move_player(&mut w, Direction::Right);
        assert_eq!(w.score, 10);
        advance(&mut w, 9_000);
        assert!(w.ghosts.iter().all(|g| g.scared), "stale expiry fired");
        advance(&mut w, 1_000);
        assert!(w.ghosts.iter().all(|g| !g.scared));
    }

    #[test]
    fn game_over_then_reset_to_ready() {
        let mut w = running();
        w.score = 30;
        let here = w.player.position;
        w.ghosts[0].position = here;
        w.ghosts[0].scared = false;
        let mut events = vec![];
        step::check_collision(&mut w, &mut events);

        assert_eq!(w.phase, Phase::GameOver);
        assert_eq!(w.state_message, GAME_OVER_TEXT);
        assert_eq!(w.high_score, 30);
        assert!(!w.start_enabled());
        for i in 0..4 {
            assert!(!w.timers.is_scheduled(TimerId::Ghost(i)));
        }
        // Ghost timers are gone: nothing moves during the pause.
        let pause = w.timing.reset_delay_ms;
        let events = advance(&mut w, pause - 1);
        assert!(events.is_empty());
        assert_eq!(w.phase, Phase::GameOver);

        let events = advance(&mut w, 1);
        assert_eq!(events, vec![GameEvent::RoundReset]);
        assert_eq!(w.phase, Phase::Ready);
        assert!(w.start_enabled());
        assert_eq!(w.ready_message, READY_TEXT);
        assert!(w.state_message.is_empty());
    }

    #[test]
    fn high_score_tracks_best_round() {
        let mut w = running();
        for score in [40, 15, 55, 20] {
            w.score = score;
            let mut events = vec![];
            end_round(&mut w, GhostColour::Red, &mut events);
            reset_board(&mut w);
            start(&mut w);
            let intro = w.timing.intro_delay_ms;
        advance(&mut w, intro);
        }
        assert_eq!(w.high_score, 55);
    }

    #[test]
    fn reset_board_is_idempotent() {
        let mut w = running();
        // Dirty the session: eat, scare, move a ghost.
        w.player.position = w.board.index(2, 17).unwrap();
        step::move_player(&mut w, Direction::Left);
        w.ghosts[0].step_to(w.board.index(15, 10).unwrap());

        reset_board(&mut w);
        let board = w.board.clone();
        let player = w.player.clone();
        let ghosts = w.ghosts.clone();
        let timers = w.timers.clone();

        reset_board(&mut w);
        assert_eq!(w.board, board);
        assert_eq!(w.player, player);
        assert_eq!(w.ghosts, ghosts);
        assert_eq!(w.timers, timers);
        assert_eq!(w.phase, Phase::Ready);
        assert_eq!(w.board, crate::domain::board::Board::build());
        assert_eq!(w.player.position, maze::PLAYER_START);
        assert!(w.ghosts.iter().all(|g| g.position == g.start && !g.scared));
    }
}
