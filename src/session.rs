//! 对局会话
//!
//! 把棋盘、悔棋记录和后台提示串起来，处理"选子 - 落子"两步交互。
//! 提示计算期间和终局后忽略一切输入。

use log::{debug, info};

use crate::ai::{AIConfig, AIStrategy, MinimaxAI};
use crate::board::BoardState;
use crate::hint::{Hint, HintWorker};
use crate::history::History;
use crate::rules::validate_move;
use crate::types::{Color, Move, Position};
use crate::view::BoardView;

/// 会话配置
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// 坐在棋盘下方的一方
    pub home: Color,
    /// 提示搜索深度
    pub hint_depth: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            home: Color::Red,
            hint_depth: 3,
        }
    }
}

/// 一次点选的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    /// 思考中、已终局、点在空处或点了对方的子
    Ignored,
    /// 选中了己方棋子
    Selected(Position),
    /// 再次点到己方棋子，取消选择
    Deselected,
    /// 走子成功
    Moved(Move),
    /// 走法不合法，选择已清除
    Rejected,
}

pub struct GameSession {
    config: GameConfig,
    board: BoardState,
    history: History,
    hint: HintWorker,
}

impl GameSession {
    pub fn new(config: GameConfig) -> Self {
        let board = BoardState::new(config.home);
        let mut history = History::new();
        history.record(&board);
        info!("new game: {} at home, hint depth {}", config.home, config.hint_depth);

        GameSession {
            config,
            board,
            history,
            hint: HintWorker::new(),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &BoardState {
        &self.board
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn is_thinking(&self) -> bool {
        self.hint.is_thinking()
    }

    /// 点选一个交叉点
    pub fn select(&mut self, pos: Position) -> SelectOutcome {
        if self.hint.is_thinking() || self.board.is_over() || !pos.is_valid() {
            return SelectOutcome::Ignored;
        }

        let side = self.board.side_to_move();
        match (self.board.selection(), self.board.piece_at(pos)) {
            (None, Some(piece)) if piece.color == side => {
                self.board.set_selection(Some(pos));
                debug!("selected {} at {}", piece, pos);
                SelectOutcome::Selected(pos)
            }
            (None, _) => SelectOutcome::Ignored,
            (Some(_), Some(piece)) if piece.color == side => {
                self.board.set_selection(None);
                SelectOutcome::Deselected
            }
            (Some(from), _) => {
                self.board.set_selection(None);
                self.commit(from, pos)
            }
        }
    }

    /// 两次点选的便捷写法
    pub fn try_move(&mut self, from: Position, to: Position) -> SelectOutcome {
        match self.select(from) {
            SelectOutcome::Selected(_) => self.select(to),
            SelectOutcome::Deselected => SelectOutcome::Ignored,
            other => other,
        }
    }

    fn commit(&mut self, from: Position, to: Position) -> SelectOutcome {
        if !validate_move(&self.board, from, to) {
            debug!("rejected {}{}", from, to);
            return SelectOutcome::Rejected;
        }
        let piece = match self.board.piece_at(from) {
            Some(piece) => piece,
            None => return SelectOutcome::Rejected,
        };

        let mv = Move::new(piece, from, to);
        self.board.make_move(from, to, true);
        self.history.record(&self.board);
        self.hint.clear();
        info!("{}", mv);
        if let Some(winner) = self.board.winner() {
            info!("{} wins", winner);
        }
        SelectOutcome::Moved(mv)
    }

    /// 悔棋，返回是否生效
    pub fn undo(&mut self) -> bool {
        if self.hint.is_thinking() {
            return false;
        }
        match self.history.undo() {
            Some(board) => self.install(board),
            None => false,
        }
    }

    /// 撤销悔棋，返回是否生效
    pub fn redo(&mut self) -> bool {
        if self.hint.is_thinking() {
            return false;
        }
        match self.history.redo() {
            Some(board) => self.install(board),
            None => false,
        }
    }

    fn install(&mut self, board: BoardState) -> bool {
        self.board = board;
        self.hint.clear();
        true
    }

    /// 用默认 Minimax 策略请求提示
    pub fn request_hint(&mut self) -> bool {
        let strategy = MinimaxAI::new(&AIConfig {
            depth: self.config.hint_depth,
        });
        self.request_hint_with(Box::new(strategy))
    }

    /// 用指定策略请求提示，思考中或已终局时返回 false
    pub fn request_hint_with(&mut self, strategy: Box<dyn AIStrategy>) -> bool {
        if self.board.is_over() {
            return false;
        }
        self.hint.start(&self.board, strategy)
    }

    /// 每帧调用：检查后台提示是否完成
    pub fn tick(&mut self) -> bool {
        self.hint.poll()
    }

    /// 阻塞等待提示结果
    pub fn wait_for_hint(&mut self) -> Option<&Hint> {
        self.hint.wait()
    }

    pub fn hint(&self) -> Option<&Hint> {
        self.hint.last()
    }

    /// 当前画面的只读快照
    pub fn view(&self) -> BoardView {
        let mut view = BoardView::from_board(&self.board);
        view.thinking = self.hint.is_thinking();
        if let Some(elapsed) = self.hint.thinking_for() {
            view.hint_secs = Some(elapsed.as_secs_f64());
        } else if let Some(hint) = self.hint.last() {
            view.hint = Some(hint.text.clone());
            view.hint_secs = Some(hint.took.as_secs_f64());
        }
        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Piece, PieceRole};

    fn pos(s: &str) -> Position {
        Position::from_notation(s).unwrap()
    }

    fn shallow_session() -> GameSession {
        GameSession::new(GameConfig {
            home: Color::Red,
            hint_depth: 1,
        })
    }

    #[test]
    fn test_select_then_move() {
        let mut session = shallow_session();
        assert_eq!(session.select(pos("b7")), SelectOutcome::Selected(pos("b7")));
        assert_eq!(session.board().selection(), Some(pos("b7")));

        match session.select(pos("e7")) {
            SelectOutcome::Moved(mv) => {
                assert_eq!(mv.piece, Piece::new(Color::Red, PieceRole::Cannon));
                assert_eq!(mv.to_notation(), "b7e7");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(session.board().side_to_move(), Color::Black);
        assert_eq!(session.board().selection(), None);
        assert_eq!(session.history().len(), 2);
    }

    #[test]
    fn test_opponent_piece_and_empty_square_ignored_without_selection() {
        let mut session = shallow_session();
        assert_eq!(session.select(pos("b2")), SelectOutcome::Ignored);
        assert_eq!(session.select(pos("e5")), SelectOutcome::Ignored);
        assert_eq!(session.select(Position::new(10, 0)), SelectOutcome::Ignored);
        assert_eq!(session.board().selection(), None);
    }

    #[test]
    fn test_reselecting_own_piece_deselects() {
        let mut session = shallow_session();
        session.select(pos("b7"));
        assert_eq!(session.select(pos("h7")), SelectOutcome::Deselected);
        assert_eq!(session.board().selection(), None);
        assert_eq!(session.board().side_to_move(), Color::Red);
    }

    #[test]
    fn test_illegal_move_is_rejected() {
        let mut session = shallow_session();
        session.select(pos("a9"));
        assert_eq!(session.select(pos("b8")), SelectOutcome::Rejected);
        assert_eq!(session.board().selection(), None);
        assert_eq!(session.board().side_to_move(), Color::Red);
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_capture_through_try_move() {
        let mut session = shallow_session();
        match session.try_move(pos("b7"), pos("b0")) {
            SelectOutcome::Moved(mv) => assert_eq!(mv.piece.role, PieceRole::Cannon),
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(
            session.board().piece_at(pos("b0")),
            Some(Piece::new(Color::Red, PieceRole::Cannon))
        );
    }

    #[test]
    fn test_undo_redo() {
        let mut session = shallow_session();
        assert!(!session.undo());

        session.try_move(pos("b7"), pos("e7"));
        session.try_move(pos("b0"), pos("c2"));
        let latest = session.board().clone();

        assert!(session.undo());
        assert_eq!(session.board().side_to_move(), Color::Black);
        assert!(session.undo());
        assert!(session.board().same_position(&BoardState::new(Color::Red)));
        assert!(!session.undo());

        assert!(session.redo());
        assert!(session.redo());
        assert!(session.board().same_position(&latest));
        assert!(!session.redo());
    }

    #[test]
    fn test_hint_cleared_by_move() {
        let mut session = shallow_session();
        assert!(session.request_hint());
        assert!(session.is_thinking());
        assert_eq!(session.select(pos("b7")), SelectOutcome::Ignored);
        assert!(!session.undo());

        let text = session.wait_for_hint().unwrap().text.clone();
        assert!(text.starts_with("Best move: Red "));
        let view = session.view();
        assert_eq!(view.hint.as_deref(), Some(text.as_str()));
        assert!(!view.thinking);

        session.try_move(pos("b7"), pos("e7"));
        assert!(session.hint().is_none());
        assert!(session.view().hint.is_none());
    }

    #[test]
    fn test_view_while_thinking() {
        let mut session = shallow_session();
        session.request_hint();
        let view = session.view();
        // 搜索可能已经结束，但还没被取回
        assert!(view.thinking);
        assert!(view.hint.is_none());
        assert!(view.hint_secs.is_some());
        session.wait_for_hint();
        assert!(!session.tick());
    }

    #[test]
    fn test_input_ignored_after_game_over() {
        let mut session = shallow_session();
        // 双车杀
        session.board = crate::diagram::parse_diagram(
            "4k4/3R5/9/9/9/9/9/9/9/R2K5",
            Color::Red,
            Color::Red,
        )
        .unwrap();
        match session.try_move(pos("a9"), pos("a0")) {
            SelectOutcome::Moved(_) => {}
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(session.board().is_over());
        assert_eq!(session.board().winner(), Some(Color::Red));
        assert_eq!(session.select(pos("e0")), SelectOutcome::Ignored);
        assert!(!session.request_hint());
    }
}
