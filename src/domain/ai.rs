/// Ghost AI: random walk without immediate backtracking.
///
/// Each tick a ghost picks uniformly among the legal neighbouring
/// tiles, excluding the tile it just left. Only when that leaves
/// nothing (a dead end) may it turn back. A ghost with no legal
/// neighbour at all stays where it is.

use rand::seq::SliceRandom;
use rand::Rng;

use super::board::Board;
use super::entity::Ghost;
use super::rules;

/// Pick the ghost's next tile. None means "stay put".
pub fn choose_step<R: Rng + ?Sized>(board: &Board, ghost: &Ghost, rng: &mut R) -> Option<usize> {
    let moves = rules::ghost_moves(board, ghost.position);
    let forward: Vec<usize> = moves
        .iter()
        .copied()
        .filter(|&t| t != ghost.last_position)
        .collect();

    if forward.is_empty() {
        // Boxed in: the only way out is back.
        moves.choose(rng).copied()
    } else {
        forward.choose(rng).copied()
    }
}
