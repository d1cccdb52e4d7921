/// Movement rules: pure functions over the board.
///
/// Every step goes through `step_target`, so the player and the ghosts
/// share one definition of the shortcut wrap.

use super::board::Board;
use super::entity::Direction;

/// Where a step from `from` in `dir` lands, shortcut wrap included.
/// None when the step leaves the grid.
pub fn step_target(board: &Board, from: usize, dir: Direction) -> Option<usize> {
    let w = board.width();
    let wrapped = match dir {
        Direction::Left if board.is_left_entrance(from) => from.checked_add(w - 1),
        Direction::Right if board.is_right_entrance(from) => from.checked_sub(w - 1),
        _ => return board.neighbour(from, dir),
    };
    wrapped.filter(|&t| t < board.len())
}

/// Target of a player move, or None if the move is rejected
/// (wall, lair, or off the grid).
pub fn player_target(board: &Board, from: usize, dir: Direction) -> Option<usize> {
    step_target(board, from, dir).filter(|&t| can_player_enter(board, t))
}

/// The player may stand anywhere on the grid except walls and the lair.
pub fn can_player_enter(board: &Board, index: usize) -> bool {
    index < board.len() && !board.is_wall(index) && !board.is_lair(index)
}

/// Ghosts may stand anywhere except walls and forbidden tiles.
pub fn can_ghost_enter(board: &Board, index: usize) -> bool {
    index < board.len() && !board.is_wall(index) && !board.is_forbidden(index)
}

/// Every tile a ghost at `from` could step onto this tick, in
/// `Direction::ALL` order. Does not apply the backtrack rule.
pub fn ghost_moves(board: &Board, from: usize) -> Vec<usize> {
    Direction::ALL
        .iter()
        .filter_map(|&dir| step_target(board, from, dir))
        .filter(|&t| can_ghost_enter(board, t))
        .collect()
}
