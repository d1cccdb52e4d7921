/// Per-event game operations: one player move, one ghost step,
/// and the collision and scoring that follow each of them.
///
/// Processing order for a player move:
///   1. Facing update
///   2. Target resolution (shortcut wrap, wall/lair rejection)
///   3. Pellet consumption (+1 dot, +5 power pellet → scare window)
///   4. Collision check at the player's tile
///
/// Processing order for a ghost tick:
///   1. Direction choice (legal neighbours, no backtracking)
///   2. Commit + last-position update
///   3. Collision check between that ghost and the player only

use tracing::{debug, trace};

use crate::domain::ai;
use crate::domain::board::Pellet;
use crate::domain::entity::Direction;
use crate::domain::rules;

use super::event::GameEvent;
use super::lifecycle;
use super::timer::TimerId;
use super::world::WorldState;

pub const PAC_DOT_POINTS: u32 = 1;
pub const POWER_PELLET_POINTS: u32 = 5;
pub const SCARED_GHOST_POINTS: u32 = 25;

// ══════════════════════════════════════════════════════════════
// Player
// ══════════════════════════════════════════════════════════════

/// Handle one directional input. Ignored unless the round is running.
pub fn move_player(world: &mut WorldState, dir: Direction) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if !world.is_running() {
        return events;
    }

    world.player.facing = dir;

    match rules::player_target(&world.board, world.player.position, dir) {
        Some(target) => {
            world.player.position = target;
            events.push(GameEvent::PlayerMoved { to: target });
            eat_at(world, target, &mut events);
        }
        None => events.push(GameEvent::PlayerBlocked),
    }

    check_collision(world, &mut events);
    events
}

fn eat_at(world: &mut WorldState, at: usize, events: &mut Vec<GameEvent>) {
    match world.board.eat_pellet(at) {
        Some(Pellet::Dot) => {
            world.score += PAC_DOT_POINTS;
            events.push(GameEvent::PacDotEaten { at });
        }
        Some(Pellet::Power) => {
            world.score += POWER_PELLET_POINTS;
            debug!(at, score = world.score, "power pellet eaten");
            events.push(GameEvent::PowerPelletEaten { at });
            scare_ghosts(world, events);
        }
        None => {}
    }
}

// ══════════════════════════════════════════════════════════════
// Scare window
// ══════════════════════════════════════════════════════════════

/// Normal → Scared for every ghost. A pending expiry is replaced,
/// so the window always runs its full length from the latest pellet.
pub fn scare_ghosts(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    for g in world.ghosts.iter_mut() {
        g.scared = true;
    }
    world
        .timers
        .schedule_once(TimerId::ScareExpiry, world.timing.scare_ms);
    events.push(GameEvent::GhostsScared);
}

/// Scared → Normal for every ghost.
pub fn unscare_ghosts(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    for g in world.ghosts.iter_mut() {
        g.scared = false;
    }
    world.timers.cancel(TimerId::ScareExpiry);
    events.push(GameEvent::ScareEnded);
}

// ══════════════════════════════════════════════════════════════
// Ghosts
// ══════════════════════════════════════════════════════════════

/// One step of the ghost at roster index `idx`.
pub fn ghost_tick(world: &mut WorldState, idx: usize, events: &mut Vec<GameEvent>) {
    if !world.is_running() || idx >= world.ghosts.len() {
        return;
    }

    if let Some(target) = ai::choose_step(&world.board, &world.ghosts[idx], &mut world.rng) {
        world.ghosts[idx].step_to(target);
        trace!(ghost = world.ghosts[idx].colour.name(), to = target, "ghost step");
        events.push(GameEvent::GhostMoved { ghost: idx, to: target });
    }

    if world.ghosts[idx].position == world.player.position {
        resolve_clash(world, idx, events);
    }
}

// ══════════════════════════════════════════════════════════════
// Collision
// ══════════════════════════════════════════════════════════════

/// Resolve every ghost sharing the player's tile.
/// Returns true if the round ended.
pub fn check_collision(world: &mut WorldState, events: &mut Vec<GameEvent>) -> bool {
    let at = world.player.position;
    let hits: Vec<usize> = world.ghosts_at(at).collect();

    for idx in hits {
        if resolve_clash(world, idx, events) {
            return true;
        }
    }
    false
}

/// Resolve one ghost against the player: a scared ghost is eaten and sent
/// home, a normal one ends the round. Returns true if the round ended.
fn resolve_clash(world: &mut WorldState, idx: usize, events: &mut Vec<GameEvent>) -> bool {
    let ghost = &mut world.ghosts[idx];
    let colour = ghost.colour;
    if ghost.scared {
        ghost.reset();
        world.score += SCARED_GHOST_POINTS;
        debug!(ghost = colour.name(), score = world.score, "scared ghost eaten");
        events.push(GameEvent::GhostEaten { colour });
        false
    } else {
        lifecycle::end_round(world, colour, events);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimingConfig;
    use crate::domain::maze;
    use crate::sim::world::Phase;

    fn running_world() -> WorldState {
        let mut w = WorldState::new(TimingConfig::default(), Some(11));
        w.phase = Phase::Running;
        w
    }

    fn index_of(w: &WorldState, x: usize, y: usize) -> usize {
        w.board.index(x, y).unwrap()
    }

    #[test]
    fn input_ignored_unless_running() {
        let mut w = WorldState::new(TimingConfig::default(), Some(1));
        let events = move_player(&mut w, Direction::Left);
        assert!(events.is_empty());
        assert_eq!(w.player.position, maze::PLAYER_START);
    }

    #[test]
    fn pac_dot_scores_one_and_clears() {
        let mut w = running_world();
        // Start (13,17) → left is a dot at (12,17).
        let target = index_of(&w, 12, 17);
        assert!(w.board.is_pac_dot(target));
        let events = move_player(&mut w, Direction::Left);
        assert_eq!(w.player.position, target);
        assert_eq!(w.score, 1);
        assert!(!w.board.is_pac_dot(target));
        assert!(events.contains(&GameEvent::PacDotEaten { at: target }));

        // Walking back over empty floor scores nothing.
        move_player(&mut w, Direction::Right);
        move_player(&mut w, Direction::Left);
        assert_eq!(w.score, 1);
    }

    #[test]
    fn wall_rejects_move_but_turns_player() {
        let mut w = running_world();
        // Above the start is a wall.
        let events = move_player(&mut w, Direction::Up);
        assert_eq!(w.player.position, maze::PLAYER_START);
        assert_eq!(w.player.facing, Direction::Up);
        assert_eq!(events, vec![GameEvent::PlayerBlocked]);
    }

    #[test]
    fn lair_rejects_player() {
        let mut w = running_world();
        // Just above the lair door.
        w.player.position = index_of(&w, 13, 10);
        move_player(&mut w, Direction::Down);
        assert_eq!(w.player.position, index_of(&w, 13, 10));
    }

    #[test]
    fn power_pellet_scores_five_and_scares_all() {
        let mut w = running_world();
        let pellet = index_of(&w, 1, 17);
        w.player.position = index_of(&w, 2, 17);
        let events = move_player(&mut w, Direction::Left);
        assert_eq!(w.player.position, pellet);
        assert_eq!(w.score, 5);
        assert!(!w.board.is_power_pellet(pellet));
        assert!(w.ghosts.iter().all(|g| g.scared));
        assert_eq!(w.scare_remaining_ms(), Some(10_000));
        assert!(events.contains(&GameEvent::GhostsScared));
    }

    #[test]
    fn scared_ghost_is_eaten() {
        let mut w = running_world();
        let mut events = vec![];
        scare_ghosts(&mut w, &mut events);
        let here = w.player.position;
        w.ghosts[2].position = here;

        events.clear();
        let ended = check_collision(&mut w, &mut events);
        assert!(!ended);
        assert_eq!(w.score, 25);
        assert_eq!(w.ghosts[2].position, w.ghosts[2].start);
        assert!(!w.ghosts[2].scared);
        assert!(w.ghosts[0].scared);
        assert_eq!(w.phase, Phase::Running);
    }

    #[test]
    fn normal_ghost_ends_round() {
        let mut w = running_world();
        w.timers.schedule_every(TimerId::Ghost(0), 500);
        w.timers.schedule_every(TimerId::Ghost(1), 600);
        w.score = 12;
        let here = w.player.position;
        w.ghosts[1].position = here;

        let mut events = vec![];
        assert!(check_collision(&mut w, &mut events));
        assert_eq!(w.phase, Phase::GameOver);
        assert!(!w.timers.is_scheduled(TimerId::Ghost(0)));
        assert!(!w.timers.is_scheduled(TimerId::Ghost(1)));
        assert_eq!(w.high_score, 12);
        assert!(events.iter().any(|e| matches!(e, GameEvent::PlayerKilled { .. })));
    }

    #[test]
    fn player_walking_into_ghost_collides() {
        let mut w = running_world();
        let left = index_of(&w, 12, 17);
        w.ghosts[0].position = left;
        move_player(&mut w, Direction::Left);
        assert_eq!(w.phase, Phase::GameOver);
        assert_eq!(w.player.position, maze::PLAYER_START);
    }

    #[test]
    fn ghost_stepping_onto_player_collides() {
        let mut w = running_world();
        // Corridor (9,10)..(18,10); ghost walks right into the player.
        w.ghosts[0].position = index_of(&w, 10, 10);
        w.ghosts[0].last_position = index_of(&w, 9, 10);
        w.player.position = index_of(&w, 11, 10);
        let mut events = vec![];
        ghost_tick(&mut w, 0, &mut events);
        assert_eq!(w.phase, Phase::GameOver);
    }

    #[test]
    fn ghost_reset_onto_player_only_clashes_with_itself() {
        let mut w = running_world();
        let red_home = maze::GHOSTS[0].start;
        w.player.position = red_home;
        w.ghosts[0].position = red_home;
        w.ghosts[0].scared = true;

        let mut events = vec![];
        assert!(!check_collision(&mut w, &mut events));
        assert_eq!(w.score, SCARED_GHOST_POINTS);
        // Red is back home, under the player, and no longer scared.
        assert_eq!(w.ghosts[0].position, red_home);
        assert!(!w.ghosts[0].scared);

        // Another ghost's step elsewhere does not end the round.
        let mut events = vec![];
        ghost_tick(&mut w, 1, &mut events);
        assert_ne!(w.ghosts[1].position, red_home);
        assert_eq!(w.phase, Phase::Running);
        assert_eq!(w.score, SCARED_GHOST_POINTS);
    }

    #[test]
    fn player_takes_left_shortcut() {
        let mut w = running_world();
        let left = index_of(&w, 0, 12);
        let right = index_of(&w, 27, 12);
        w.player.position = left;
        move_player(&mut w, Direction::Left);
        assert_eq!(w.player.position, right);
        move_player(&mut w, Direction::Right);
        assert_eq!(w.player.position, left);
    }

    #[test]
    fn ghost_on_left_shortcut_moving_left_teleports() {
        let mut w = running_world();
        let left = index_of(&w, 0, 12);
        w.ghosts[0].position = left;
        w.ghosts[0].last_position = index_of(&w, 1, 12);
        let mut events = vec![];
        ghost_tick(&mut w, 0, &mut events);
        assert_eq!(w.ghosts[0].position, index_of(&w, 27, 12));
    }

    #[test]
    fn score_never_decreases_while_running() {
        let mut w = running_world();
        let mut last = 0;
        let dirs = [Direction::Left, Direction::Up, Direction::Right, Direction::Down];
        for i in 0..400 {
            move_player(&mut w, dirs[(i * 7 + i / 3) % 4]);
            if !w.is_running() {
                break;
            }
            assert!(w.score >= last);
            assert!(!w.board.is_wall(w.player.position));
            last = w.score;
        }
    }
}
