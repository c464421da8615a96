//! AI 策略模块
//!
//! 固定深度的 Minimax + Alpha-Beta 搜索，不使用置换表和走法排序

mod minimax;

pub use minimax::{best_move, evaluate, minimax, MinimaxAI, SCORE_INFINITY};

use std::time::Duration;

use crate::board::BoardState;
use crate::types::Move;

/// AI 配置
#[derive(Debug, Clone)]
pub struct AIConfig {
    /// 搜索深度（半回合数）
    pub depth: u32,
}

impl Default for AIConfig {
    fn default() -> Self {
        AIConfig { depth: 3 }
    }
}

/// 走法评分
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredMove {
    pub mv: Move,
    pub score: i32,
}

/// 一次搜索的结果和统计
#[derive(Debug, Clone)]
pub struct SearchReport {
    /// 最佳走法，None 表示没有可推荐的走法
    pub best: Option<Move>,
    pub score: i32,
    pub depth: u32,
    pub nodes: u64,
    pub elapsed: Duration,
}

/// AI 策略接口
pub trait AIStrategy: Send {
    /// 对根节点的每个走法打分，按分数从高到低返回前 n 个
    ///
    /// 同分时保持走法枚举顺序。
    fn select_moves(&self, board: &BoardState, n: usize) -> Vec<ScoredMove>;

    /// 完整搜索，附带节点数和耗时
    fn search(&self, board: &BoardState) -> SearchReport;

    /// 选择最佳走法
    fn select_best_move(&self, board: &BoardState) -> Option<Move> {
        self.select_moves(board, 1).first().map(|sm| sm.mv)
    }
}

/// 排序辅助函数（稳定排序，同分保持原顺序）
pub(crate) fn sort_and_truncate(scored: &mut Vec<ScoredMove>, n: usize) {
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored.truncate(n);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::parse_diagram;
    use crate::types::Color;

    #[test]
    fn test_capture_preference() {
        let board = parse_diagram(
            "3k5/9/9/9/4r4/4R4/9/9/9/4K4",
            Color::Red,
            Color::Red,
        )
        .unwrap();
        let ai = MinimaxAI::new(&AIConfig { depth: 1 });
        let best = ai.select_best_move(&board).unwrap();
        assert_eq!(best.to_notation(), "e5e4");
    }

    #[test]
    fn test_select_moves_sorted_and_truncated() {
        let board = BoardState::new(Color::Red);
        let ai = MinimaxAI::new(&AIConfig { depth: 1 });
        let moves = ai.select_moves(&board, 5);
        assert_eq!(moves.len(), 5);
        assert!(moves.windows(2).all(|w| w[0].score >= w[1].score));
        // 两门炮都能隔子打马
        assert_eq!(moves[0].score, 5);
        assert_eq!(moves[1].score, 5);
        assert_eq!(moves[2].score, 0);
    }

    #[test]
    fn test_sort_keeps_enumeration_order_on_ties() {
        let board = BoardState::new(Color::Red);
        let all = crate::rules::valid_moves(&board);
        let mut scored: Vec<ScoredMove> = all.iter().map(|&mv| ScoredMove { mv, score: 0 }).collect();
        sort_and_truncate(&mut scored, 3);
        assert_eq!(scored[0].mv, all[0]);
        assert_eq!(scored[2].mv, all[2]);
    }

    #[test]
    fn test_default_config() {
        assert_eq!(AIConfig::default().depth, 3);
    }
}
