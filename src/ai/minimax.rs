//! Minimax AI 策略

use log::debug;
use std::time::Instant;

use super::{sort_and_truncate, AIConfig, AIStrategy, ScoredMove, SearchReport};
use crate::board::BoardState;
use crate::rules::valid_moves;
use crate::types::{Color, Move};

/// 搜索窗口的边界分数
pub const SCORE_INFINITY: i32 = 1_000_000;

/// 局面评估：`color` 一方子力减去对方子力
pub fn evaluate(board: &BoardState, color: Color) -> i32 {
    board
        .cells()
        .iter()
        .flatten()
        .map(|piece| {
            let value = piece.role.value();
            if piece.color == color {
                value
            } else {
                -value
            }
        })
        .sum()
}

/// 单次搜索的上下文：评估视角和节点计数
struct Search {
    perspective: Color,
    nodes: u64,
}

impl Search {
    fn new(perspective: Color) -> Self {
        Search {
            perspective,
            nodes: 0,
        }
    }

    /// Minimax 搜索（带 Alpha-Beta 剪枝）
    ///
    /// - alpha: 极大方目前能保证的最好分数
    /// - beta:  极小方目前能保证的最好分数
    fn minimax(
        &mut self,
        board: &BoardState,
        depth: u32,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
    ) -> i32 {
        self.nodes += 1;

        if depth == 0 || board.is_over() {
            return evaluate(board, self.perspective);
        }

        let moves = valid_moves(board);
        if moves.is_empty() {
            return evaluate(board, self.perspective);
        }

        if maximizing {
            let mut max_eval = -SCORE_INFINITY;
            for mv in moves {
                let mut child = board.clone();
                child.make_move(mv.from, mv.to, true);

                let eval = self.minimax(&child, depth - 1, alpha, beta, false);
                max_eval = max_eval.max(eval);
                alpha = alpha.max(eval);
                if beta <= alpha {
                    break; // Beta 剪枝
                }
            }
            max_eval
        } else {
            let mut min_eval = SCORE_INFINITY;
            for mv in moves {
                let mut child = board.clone();
                child.make_move(mv.from, mv.to, true);

                let eval = self.minimax(&child, depth - 1, alpha, beta, true);
                min_eval = min_eval.min(eval);
                beta = beta.min(eval);
                if beta <= alpha {
                    break; // Alpha 剪枝
                }
            }
            min_eval
        }
    }
}

/// 以 `color` 为视角的 Minimax 搜索
pub fn minimax(
    board: &BoardState,
    color: Color,
    depth: u32,
    alpha: i32,
    beta: i32,
    maximizing: bool,
) -> i32 {
    Search::new(color).minimax(board, depth, alpha, beta, maximizing)
}

/// 固定深度搜索最佳走法，没有合法走法时返回 None
pub fn best_move(board: &BoardState, depth: u32) -> Option<Move> {
    MinimaxAI::new(&AIConfig { depth }).select_best_move(board)
}

/// Minimax AI - 使用 Alpha-Beta 剪枝
pub struct MinimaxAI {
    depth: u32,
}

impl MinimaxAI {
    pub fn new(config: &AIConfig) -> Self {
        MinimaxAI {
            depth: config.depth.max(1),
        }
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// 根节点逐个走法打分，返回按枚举顺序排列的分数和节点数
    fn score_root(&self, board: &BoardState) -> (Vec<ScoredMove>, u64) {
        let color = board.side_color();
        let mut search = Search::new(color);

        let scored = valid_moves(board)
            .into_iter()
            .map(|mv| {
                let mut child = board.clone();
                child.make_move(mv.from, mv.to, true);

                let score = search.minimax(
                    &child,
                    self.depth - 1,
                    -SCORE_INFINITY,
                    SCORE_INFINITY,
                    false,
                );
                ScoredMove { mv, score }
            })
            .collect();

        (scored, search.nodes)
    }
}

impl AIStrategy for MinimaxAI {
    fn select_moves(&self, board: &BoardState, n: usize) -> Vec<ScoredMove> {
        let (mut scored, _) = self.score_root(board);
        sort_and_truncate(&mut scored, n);
        scored
    }

    fn search(&self, board: &BoardState) -> SearchReport {
        let start = Instant::now();
        let (scored, nodes) = self.score_root(board);

        // 严格大于：同分时先枚举到的走法胜出
        let mut best: Option<ScoredMove> = None;
        for sm in scored {
            if best.map_or(true, |b| sm.score > b.score) {
                best = Some(sm);
            }
        }

        let elapsed = start.elapsed();
        debug!(
            "minimax depth={} nodes={} time={:.3}s",
            self.depth,
            nodes,
            elapsed.as_secs_f64()
        );

        SearchReport {
            best: best.map(|sm| sm.mv),
            score: best.map_or(0, |sm| sm.score),
            depth: self.depth,
            nodes,
            elapsed,
        }
    }
}
