//! 悔棋记录
//!
//! 每步落子后保存一份棋盘快照，游标指向当前局面；
//! 悔棋后再落新子会丢弃游标之后的记录。

use log::debug;

use crate::board::BoardState;

/// 快照列表 + 游标
#[derive(Debug, Clone, Default)]
pub struct History {
    snapshots: Vec<BoardState>,
    /// 记录第一份快照之前为 None
    cursor: Option<usize>,
}

impl History {
    pub fn new() -> Self {
        History::default()
    }

    /// 记录一份快照，丢弃游标之后的记录
    pub fn record(&mut self, board: &BoardState) {
        let keep = self.cursor.map_or(0, |c| c + 1);
        self.snapshots.truncate(keep);
        self.snapshots.push(board.clone());
        self.cursor = Some(self.snapshots.len() - 1);
    }

    /// 后退一步，返回新的当前局面（已重置计时）
    pub fn undo(&mut self) -> Option<BoardState> {
        match self.cursor {
            Some(c) if c > 0 => {
                self.cursor = Some(c - 1);
                debug!("undo: cursor {} -> {}", c, c - 1);
                self.current()
            }
            _ => None,
        }
    }

    /// 前进一步，返回新的当前局面（已重置计时）
    pub fn redo(&mut self) -> Option<BoardState> {
        match self.cursor {
            Some(c) if c + 1 < self.snapshots.len() => {
                self.cursor = Some(c + 1);
                debug!("redo: cursor {} -> {}", c, c + 1);
                self.current()
            }
            _ => None,
        }
    }

    /// 游标处快照的克隆，终局快照保留冻结的计时
    pub fn current(&self) -> Option<BoardState> {
        let mut board = self.snapshots.get(self.cursor?)?.clone();
        if !board.is_over() {
            board.reset_timer();
        }
        Some(board)
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        matches!(self.cursor, Some(c) if c > 0)
    }

    pub fn can_redo(&self) -> bool {
        matches!(self.cursor, Some(c) if c + 1 < self.snapshots.len())
    }
}
