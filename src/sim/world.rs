/// WorldState: the complete state of one play session.
///
/// One value owns everything that changes while playing: the board,
/// both kinds of agent, the score pair, the phase, and every pending
/// timer. The game loop owns the session and hands it to the
/// lifecycle controller (`sim::lifecycle`); nothing lives in globals.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::TimingConfig;
use crate::domain::board::Board;
use crate::domain::entity::{Ghost, Player};
use crate::domain::maze;

use super::timer::{Scheduler, TimerId};

pub const READY_TEXT: &str = "Ready!";
pub const GAME_OVER_TEXT: &str = "Game Over";

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    /// Waiting for the start control.
    Ready,
    /// Intro playing; start control disabled, input ignored.
    Starting,
    Running,
    /// Showing "Game Over" until the board resets.
    GameOver,
}

pub struct WorldState {
    pub board: Board,
    pub player: Player,
    pub ghosts: Vec<Ghost>,
    pub score: u32,
    pub high_score: u32,
    pub phase: Phase,
    pub timers: Scheduler,
    pub timing: TimingConfig,
    /// Text on the ready-marker tile ("Ready!" or empty).
    pub ready_message: String,
    /// Text in the game-state line ("Game Over" or empty).
    pub state_message: String,
    pub rng: StdRng,
}

impl WorldState {
    pub fn new(timing: TimingConfig, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };

        let ghosts = maze::GHOSTS
            .iter()
            .zip(timing.ghost_periods_ms.iter())
            .map(|(spec, &period)| Ghost::new(spec.colour, spec.start, period))
            .collect();

        WorldState {
            board: Board::build(),
            player: Player::new(maze::PLAYER_START),
            ghosts,
            score: 0,
            high_score: 0,
            phase: Phase::Ready,
            timers: Scheduler::new(),
            timing,
            ready_message: READY_TEXT.to_string(),
            state_message: String::new(),
            rng,
        }
    }

    /// The start control is only live while waiting in Ready.
    pub fn start_enabled(&self) -> bool {
        self.phase == Phase::Ready
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    /// Milliseconds left in the current scare window, if any.
    pub fn scare_remaining_ms(&self) -> Option<u64> {
        self.timers.remaining_ms(TimerId::ScareExpiry)
    }

    /// Roster index of every ghost standing on `index`.
    pub fn ghosts_at(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        self.ghosts
            .iter()
            .enumerate()
            .filter(move |(_, g)| g.position == index)
            .map(|(i, _)| i)
    }
}
