/// Events emitted by simulation operations.
/// The presentation layer consumes these for sound.

use crate::domain::entity::GhostColour;

#[derive(Clone, Debug, PartialEq, Eq)]
#[allow(dead_code)]
pub enum GameEvent {
    IntroStarted,
    RoundStarted,
    PlayerMoved { to: usize },
    PlayerBlocked,
    PacDotEaten { at: usize },
    PowerPelletEaten { at: usize },
    GhostsScared,
    ScareEnded,
    GhostMoved { ghost: usize, to: usize },
    GhostEaten { colour: GhostColour },
    PlayerKilled { by: GhostColour },
    NewHighScore { score: u32 },
    RoundReset,
}
