//! 象棋棋盘状态
//!
//! 使用 90 格数组存储棋子，克隆即深拷贝，搜索和悔棋都依赖这一点。

use log::{debug, info};
use std::time::{Duration, Instant};

use crate::rules;
use crate::types::{Color, Piece, PieceRole, Position, COLS, ROWS};

const CELL_COUNT: usize = (ROWS as usize) * (COLS as usize);

/// 底线的棋子排列（从左到右）
const BACK_RANK: [PieceRole; 9] = [
    PieceRole::Rook,
    PieceRole::Horse,
    PieceRole::Bishop,
    PieceRole::Guard,
    PieceRole::King,
    PieceRole::Guard,
    PieceRole::Bishop,
    PieceRole::Horse,
    PieceRole::Rook,
];

/// 棋盘状态
#[derive(Debug, Clone)]
pub struct BoardState {
    /// 90 个格子的棋子数组 (10行 x 9列)
    cells: [Option<Piece>; CELL_COUNT],
    /// 本地玩家的颜色，本方棋子在下半场 (row 5-9)
    home: Color,
    side_to_move: Color,
    /// 用户当前选中的起点
    selection: Option<Position>,
    turn_started_at: Instant,
    /// 分出胜负的时刻，设置后棋盘不再变化
    terminal_at: Option<Instant>,
}

impl BoardState {
    /// 标准开局，本方在下半场，红方先行
    pub fn new(home: Color) -> BoardState {
        let mut board = BoardState::empty(home, Color::Red);
        let away = home.opposite();

        for (col, role) in BACK_RANK.iter().enumerate() {
            let col = col as i8;
            board.place(Position::new(0, col), Some(Piece::new(away, *role)));
            board.place(Position::new(9, col), Some(Piece::new(home, *role)));
        }
        for col in [1, 7] {
            board.place(Position::new(2, col), Some(Piece::new(away, PieceRole::Cannon)));
            board.place(Position::new(7, col), Some(Piece::new(home, PieceRole::Cannon)));
        }
        for col in (0..COLS).step_by(2) {
            board.place(Position::new(3, col), Some(Piece::new(away, PieceRole::Soldier)));
            board.place(Position::new(6, col), Some(Piece::new(home, PieceRole::Soldier)));
        }

        board
    }

    /// 空棋盘（用于棋盘图解析）
    pub(crate) fn empty(home: Color, side_to_move: Color) -> BoardState {
        BoardState {
            cells: [None; CELL_COUNT],
            home,
            side_to_move,
            selection: None,
            turn_started_at: Instant::now(),
            terminal_at: None,
        }
    }

    /// 直接放置棋子，不经过走法
    pub(crate) fn place(&mut self, pos: Position, piece: Option<Piece>) {
        self.cells[pos.to_index()] = piece;
    }

    /// 获取某位置的棋子
    #[inline]
    pub fn piece_at(&self, pos: Position) -> Option<Piece> {
        if !pos.is_valid() {
            return None;
        }
        self.cells[pos.to_index()]
    }

    /// 检查位置是否有棋子
    #[inline]
    pub fn has_piece(&self, pos: Position) -> bool {
        self.piece_at(pos).is_some()
    }

    /// 只读的格子数组，按行优先排列
    pub fn cells(&self) -> &[Option<Piece>] {
        &self.cells
    }

    /// 遍历某方全部棋子（行优先）
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = (Position, Piece)> + '_ {
        self.cells.iter().enumerate().filter_map(move |(idx, cell)| match cell {
            Some(p) if p.color == color => Some((Position::from_index(idx), *p)),
            _ => None,
        })
    }

    /// 找到将的位置
    ///
    /// 找不到说明棋盘已损坏（将被吃掉或者初始化错误），直接 panic。
    pub fn find_king(&self, color: Color) -> Position {
        self.pieces(color)
            .find(|(_, p)| p.role == PieceRole::King)
            .map(|(pos, _)| pos)
            .unwrap_or_else(|| panic!("can't find the {} king", color))
    }

    #[inline]
    pub fn home_color(&self) -> Color {
        self.home
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// 当前行棋方
    #[inline]
    pub fn side_color(&self) -> Color {
        self.side_to_move
    }

    /// 某方棋子的前进方向（行增量）
    ///
    /// 本方在下半场，向 row 0 前进；对方反之。
    #[inline]
    pub fn forward(&self, color: Color) -> i8 {
        if color == self.home {
            -1
        } else {
            1
        }
    }

    pub fn selection(&self) -> Option<Position> {
        self.selection
    }

    pub fn set_selection(&mut self, pos: Option<Position>) {
        self.selection = pos;
    }

    /// 是否已分出胜负
    #[inline]
    pub fn is_over(&self) -> bool {
        self.terminal_at.is_some()
    }

    /// 胜方：终局时没有切换回合，行棋方就是最后走棋的一方
    pub fn winner(&self) -> Option<Color> {
        self.terminal_at.map(|_| self.side_to_move)
    }

    /// 重置回合计时
    pub fn reset_timer(&mut self) {
        self.turn_started_at = Instant::now();
    }

    /// 当前回合已用时间，终局后停止计时
    pub fn elapsed(&self) -> Duration {
        let end = self.terminal_at.unwrap_or_else(Instant::now);
        end.saturating_duration_since(self.turn_started_at)
    }

    /// 比较对局相关的部分（格子、行棋方、终局标志），忽略计时和选中状态
    pub fn same_position(&self, other: &BoardState) -> bool {
        self.cells == other.cells
            && self.side_to_move == other.side_to_move
            && self.home == other.home
            && self.is_over() == other.is_over()
    }

    /// 执行走棋，返回被吃的棋子
    ///
    /// 不做合法性检查，调用方负责先用 `rules::validate_move` 校验。
    /// 起点没有棋子时什么也不做。
    /// `check_winner` 为真时，从对方视角判断是否已无路可走；
    /// 若分出胜负则记录终局时刻，并且不再切换回合。
    pub fn make_move(&mut self, from: Position, to: Position, check_winner: bool) -> Option<Piece> {
        if self.is_over() {
            debug!("board is terminal, ignoring {}{}", from, to);
            return None;
        }

        if self.piece_at(from).is_none() || !to.is_valid() {
            debug!("ignoring {}{}: empty origin or off-board target", from, to);
            return None;
        }

        let piece = self.cells[from.to_index()].take();
        let captured = std::mem::replace(&mut self.cells[to.to_index()], piece);

        if check_winner {
            let mut probe = self.clone();
            probe.switch_side();
            if rules::is_winner(&probe) {
                self.terminal_at = Some(Instant::now());
                info!("{} wins after {}{}", self.side_to_move, from, to);
                return captured;
            }
        }

        self.switch_side();
        captured
    }

    fn switch_side(&mut self) {
        self.side_to_move = self.side_to_move.opposite();
        self.turn_started_at = Instant::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::parse_diagram;

    #[test]
    fn test_initial_board() {
        let board = BoardState::new(Color::Red);

        assert_eq!(board.pieces(Color::Red).count(), 16);
        assert_eq!(board.pieces(Color::Black).count(), 16);
        assert_eq!(board.side_to_move(), Color::Red);
        assert_eq!(board.find_king(Color::Red), Position::new(9, 4));
        assert_eq!(board.find_king(Color::Black), Position::new(0, 4));
        assert_eq!(
            board.piece_at(Position::new(7, 1)),
            Some(Piece::new(Color::Red, PieceRole::Cannon))
        );
        assert!(!board.is_over());
    }

    #[test]
    fn test_black_home_mirrors_and_red_still_first() {
        let board = BoardState::new(Color::Black);

        assert_eq!(board.side_to_move(), Color::Red);
        assert_eq!(board.find_king(Color::Black), Position::new(9, 4));
        assert_eq!(board.find_king(Color::Red), Position::new(0, 4));
        assert_eq!(
            board.piece_at(Position::new(3, 0)),
            Some(Piece::new(Color::Red, PieceRole::Soldier))
        );
        assert_eq!(board.forward(Color::Red), 1);
        assert_eq!(board.forward(Color::Black), -1);
    }

    #[test]
    fn test_clone_is_independent() {
        let original = BoardState::new(Color::Red);
        let before = original.cells().to_vec();

        let mut clone = original.clone();
        clone.make_move(Position::new(7, 1), Position::new(7, 6), false);
        clone.set_selection(Some(Position::new(9, 0)));

        assert_eq!(original.cells(), before.as_slice());
        assert_eq!(original.side_to_move(), Color::Red);
        assert_eq!(original.selection(), None);
        assert_eq!(clone.side_to_move(), Color::Black);
    }

    #[test]
    fn test_make_move_returns_capture() {
        let mut board = BoardState::new(Color::Red);
        // 炮打马：b7 -> b0，中间隔着黑炮 b2
        let captured = board.make_move(Position::new(7, 1), Position::new(0, 1), true);

        assert_eq!(captured, Some(Piece::new(Color::Black, PieceRole::Horse)));
        assert_eq!(board.piece_at(Position::new(7, 1)), None);
        assert_eq!(
            board.piece_at(Position::new(0, 1)),
            Some(Piece::new(Color::Red, PieceRole::Cannon))
        );
        assert_eq!(board.side_to_move(), Color::Black);
    }

    #[test]
    fn test_make_move_from_empty_square_is_noop() {
        let mut board = BoardState::new(Color::Red);
        let before = board.cells().to_vec();

        // e5 为空，e6 上有红兵
        let captured = board.make_move(Position::new(5, 4), Position::new(6, 4), true);

        assert_eq!(captured, None);
        assert_eq!(board.cells(), before.as_slice());
        assert_eq!(board.side_to_move(), Color::Red);
    }

    #[test]
    fn test_checkmate_sets_terminal_without_switching() {
        // 黑将 e0 被红车 d1 和红车 a0 组成的杀法困住
        let mut board = parse_diagram("4k4/R8/9/9/9/9/9/9/9/3K5", Color::Red, Color::Red).unwrap();
        board.make_move(Position::new(1, 0), Position::new(1, 3), true);
        assert!(!board.is_over());

        let mut board =
            parse_diagram("4k4/3R5/9/9/9/9/9/9/9/R2K5", Color::Red, Color::Red).unwrap();
        board.make_move(Position::new(9, 0), Position::new(0, 0), true);

        assert!(board.is_over());
        assert_eq!(board.winner(), Some(Color::Red));
        assert_eq!(board.side_to_move(), Color::Red);

        // 终局后不再改变棋盘
        let snapshot = board.cells().to_vec();
        board.make_move(Position::new(1, 3), Position::new(2, 3), true);
        assert_eq!(board.cells(), snapshot.as_slice());
    }

    #[test]
    fn test_elapsed_freezes_after_terminal() {
        let mut board =
            parse_diagram("4k4/3R5/9/9/9/9/9/9/9/R2K5", Color::Red, Color::Red).unwrap();
        board.make_move(Position::new(9, 0), Position::new(0, 0), true);
        let first = board.elapsed();
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(board.elapsed(), first);
    }

    #[test]
    #[should_panic(expected = "can't find the Black king")]
    fn test_missing_king_panics() {
        let board = BoardState::empty(Color::Red, Color::Red);
        board.find_king(Color::Black);
    }
}
