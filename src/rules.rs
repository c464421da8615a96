//! 走法规则
//!
//! 各兵种的几何规则、将帅安全、飞将检测、合法走法枚举和胜负判定。
//! 所有试走都在克隆的棋盘上进行，不会改动传入的局面。

use crate::board::BoardState;
use crate::types::{Color, Move, Piece, PieceRole, Position, COLS, ROWS};

/// 两点之间（不含端点）的棋子数，不在同一直线时返回 None
fn count_between(board: &BoardState, from: Position, to: Position) -> Option<usize> {
    if from.row == to.row {
        let (lo, hi) = (from.col.min(to.col), from.col.max(to.col));
        Some(
            ((lo + 1)..hi)
                .filter(|&col| board.has_piece(Position::new(from.row, col)))
                .count(),
        )
    } else if from.col == to.col {
        let (lo, hi) = (from.row.min(to.row), from.row.max(to.row));
        Some(
            ((lo + 1)..hi)
                .filter(|&row| board.has_piece(Position::new(row, from.col)))
                .count(),
        )
    } else {
        None
    }
}

/// 两点是否在同一个九宫内
fn in_same_palace(from: Position, to: Position) -> bool {
    from.is_in_palace() && to.is_in_palace() && from.is_top_half() == to.is_top_half()
}

/// 几何规则：`piece` 能否从 `from` 走到 `to`
///
/// 调用方保证 `to` 为空或有对方棋子。
pub fn can_move(board: &BoardState, piece: Piece, from: Position, to: Position) -> bool {
    match piece.role {
        PieceRole::Rook => can_rook_move(board, from, to),
        PieceRole::Horse => can_horse_move(board, from, to),
        PieceRole::Bishop => can_bishop_move(board, from, to),
        PieceRole::Guard => can_guard_move(from, to),
        PieceRole::King => can_king_move(from, to),
        PieceRole::Cannon => can_cannon_move(board, from, to),
        PieceRole::Soldier => can_soldier_move(board, piece.color, from, to),
    }
}

/// 车：直线，路径无子
fn can_rook_move(board: &BoardState, from: Position, to: Position) -> bool {
    count_between(board, from, to) == Some(0)
}

/// 马：日字，不能蹩马腿
fn can_horse_move(board: &BoardState, from: Position, to: Position) -> bool {
    let (dr, dc) = (to.row - from.row, to.col - from.col);
    let leg = match (dr.abs(), dc.abs()) {
        (2, 1) => from.offset(dr / 2, 0),
        (1, 2) => from.offset(0, dc / 2),
        _ => return false,
    };
    !board.has_piece(leg)
}

/// 象：田字，象眼无子，不能过河
fn can_bishop_move(board: &BoardState, from: Position, to: Position) -> bool {
    let (dr, dc) = (to.row - from.row, to.col - from.col);
    if dr.abs() != 2 || dc.abs() != 2 {
        return false;
    }
    if board.has_piece(from.offset(dr / 2, dc / 2)) {
        return false;
    }
    from.is_top_half() == to.is_top_half()
}

/// 士：九宫内斜走一步
fn can_guard_move(from: Position, to: Position) -> bool {
    (to.row - from.row).abs() == 1 && (to.col - from.col).abs() == 1 && in_same_palace(from, to)
}

/// 将：九宫内直走一步
fn can_king_move(from: Position, to: Position) -> bool {
    (to.row - from.row).abs() + (to.col - from.col).abs() == 1 && in_same_palace(from, to)
}

/// 炮：不吃子同车，吃子必须隔一个炮架
fn can_cannon_move(board: &BoardState, from: Position, to: Position) -> bool {
    let between = count_between(board, from, to);
    if board.has_piece(to) {
        between == Some(1)
    } else {
        between == Some(0)
    }
}

/// 兵：直走一步，不能后退，过河前不能横走
fn can_soldier_move(board: &BoardState, color: Color, from: Position, to: Position) -> bool {
    let (dr, dc) = (to.row - from.row, to.col - from.col);
    if dr.abs() + dc.abs() != 1 {
        return false;
    }

    let forward = board.forward(color);
    if dc == 0 {
        return dr == forward;
    }

    // 横走：必须已经过河
    if forward < 0 {
        from.row <= 4
    } else {
        from.row >= 5
    }
}

/// 检测某方的将是否被攻击
pub fn is_king_in_danger(board: &BoardState, color: Color) -> bool {
    let king = board.find_king(color);
    board
        .pieces(color.opposite())
        .any(|(pos, piece)| can_move(board, piece, pos, king))
}

/// 飞将检测：两将同列且中间无子
pub fn are_kings_fighting(board: &BoardState) -> bool {
    let red = board.find_king(Color::Red);
    let black = board.find_king(Color::Black);
    red.col == black.col && count_between(board, red, black) == Some(0)
}

/// 完整的合法性校验
///
/// 几何规则通过后，在克隆棋盘上试走：己方将不能被将军，两将不能照面。
pub fn validate_move(board: &BoardState, from: Position, to: Position) -> bool {
    if board.is_over() || !from.is_valid() || !to.is_valid() || from == to {
        return false;
    }
    let piece = match board.piece_at(from) {
        Some(p) if p.color == board.side_to_move() => p,
        _ => return false,
    };
    is_legal(board, piece, from, to)
}

fn is_legal(board: &BoardState, piece: Piece, from: Position, to: Position) -> bool {
    if let Some(target) = board.piece_at(to) {
        if target.color == piece.color {
            return false;
        }
    }
    if !can_move(board, piece, from, to) {
        return false;
    }

    let mut probe = board.clone();
    probe.make_move(from, to, false);
    !is_king_in_danger(&probe, piece.color) && !are_kings_fighting(&probe)
}

/// 行棋方的全部合法走法，按起点、终点的行优先顺序排列
pub fn valid_moves(board: &BoardState) -> Vec<Move> {
    let mut moves = Vec::with_capacity(64);
    if board.is_over() {
        return moves;
    }

    for (from, piece) in board.pieces(board.side_to_move()) {
        for row in 0..ROWS {
            for col in 0..COLS {
                let to = Position::new(row, col);
                if to != from && is_legal(board, piece, from, to) {
                    moves.push(Move::new(piece, from, to));
                }
            }
        }
    }

    moves
}

/// 在 `make_move` 之后、从对方视角调用：对方是否已经输了
///
/// 无子可动（困毙和将死不作区分）即为输；被将军时还要逐一试走
/// 所有应着，只要有一步能解除将军，对局就继续。
pub fn is_winner(board: &BoardState) -> bool {
    let moves = valid_moves(board);
    if moves.is_empty() {
        return true;
    }

    let color = board.side_color();
    if !is_king_in_danger(board, color) {
        return false;
    }

    for mv in &moves {
        let mut probe = board.clone();
        // 不能再检查胜负，否则会无限递归
        probe.make_move(mv.from, mv.to, false);
        if !is_king_in_danger(&probe, color) {
            return false;
        }
    }

    true
}
