//! Xiangqi Rules Engine
//!
//! 象棋规则引擎 + Minimax 提示搜索

pub mod ai;
pub mod board;
pub mod diagram;
pub mod error;
pub mod hint;
pub mod history;
pub mod rules;
pub mod session;
pub mod types;
pub mod view;

pub use ai::{best_move, evaluate, AIConfig, AIStrategy, MinimaxAI, ScoredMove, SearchReport};
pub use board::BoardState;
pub use diagram::{parse_diagram, to_diagram};
pub use error::{Result, XiangqiError};
pub use hint::{Hint, HintWorker};
pub use history::History;
pub use rules::{are_kings_fighting, can_move, is_king_in_danger, is_winner, valid_moves, validate_move};
pub use session::{GameConfig, GameSession, SelectOutcome};
pub use types::{Color, Move, Piece, PieceRole, Position};
pub use view::{BoardGeometry, BoardView, CellView, PieceAssets, PieceAtlas, PieceVariant, TextGlyphs};
