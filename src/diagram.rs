//! 棋盘图解析和生成
//!
//! 格式: 10 行用 `/` 分隔，从 row 0 写到 row 9
//!
//! 棋盘符号：
//! - 红方：K(帅) G(仕) B(相) H(马) R(车) C(炮) S(兵)
//! - 黑方：k g b h r c s
//! - 空格：数字 (1-9)
//!
//! 只用于搭建测试局面和命令行输入输出，不是存档格式。

use crate::board::BoardState;
use crate::error::{Result, XiangqiError};
use crate::rules::is_king_in_danger;
use crate::types::{Color, Piece, PieceRole, Position, COLS, ROWS};

/// 解析棋盘图
pub fn parse_diagram(text: &str, home: Color, side_to_move: Color) -> Result<BoardState> {
    let rows: Vec<&str> = text.trim().split('/').collect();
    if rows.len() != ROWS as usize {
        return Err(XiangqiError::InvalidDiagram(format!(
            "expected {} rows, got {}",
            ROWS,
            rows.len()
        )));
    }

    let mut board = BoardState::empty(home, side_to_move);
    let mut kings = [0usize; 2];

    for (row_idx, row_str) in rows.iter().enumerate() {
        let row = row_idx as i8;
        let mut col: i8 = 0;

        for ch in row_str.chars() {
            if col >= COLS {
                return Err(XiangqiError::InvalidDiagram(format!(
                    "row {} has more than {} columns",
                    row, COLS
                )));
            }

            if let Some(run) = ch.to_digit(10) {
                if run == 0 {
                    return Err(XiangqiError::InvalidDiagram(format!(
                        "zero-length run in row {}",
                        row
                    )));
                }
                col += run as i8;
            } else {
                let piece = Piece::from_glyph(ch).ok_or_else(|| {
                    XiangqiError::InvalidDiagram(format!("invalid glyph '{}' in row {}", ch, row))
                })?;
                if piece.role == PieceRole::King {
                    kings[color_slot(piece.color)] += 1;
                }
                board.place(Position::new(row, col), Some(piece));
                col += 1;
            }
        }

        if col != COLS {
            return Err(XiangqiError::InvalidDiagram(format!(
                "row {} has {} columns, expected {}",
                row, col, COLS
            )));
        }
    }

    for color in [Color::Red, Color::Black] {
        let count = kings[color_slot(color)];
        if count != 1 {
            return Err(XiangqiError::InvalidDiagram(format!(
                "expected exactly one {} king, found {}",
                color, count
            )));
        }
    }

    // 不行棋的一方已被将军，行棋方可以直接吃将
    let waiting = side_to_move.opposite();
    if is_king_in_danger(&board, waiting) {
        return Err(XiangqiError::InvalidDiagram(format!(
            "{} king is in check but it is {} to move",
            waiting, side_to_move
        )));
    }

    Ok(board)
}

fn color_slot(color: Color) -> usize {
    match color {
        Color::Red => 0,
        Color::Black => 1,
    }
}

/// 生成棋盘图
pub fn to_diagram(board: &BoardState) -> String {
    let mut rows = Vec::with_capacity(ROWS as usize);

    for row in 0..ROWS {
        let mut row_str = String::new();
        let mut empty_count = 0;

        for col in 0..COLS {
            match board.piece_at(Position::new(row, col)) {
                Some(piece) => {
                    if empty_count > 0 {
                        row_str.push_str(&empty_count.to_string());
                        empty_count = 0;
                    }
                    row_str.push(piece.glyph());
                }
                None => empty_count += 1,
            }
        }

        if empty_count > 0 {
            row_str.push_str(&empty_count.to_string());
        }
        rows.push(row_str);
    }

    rows.join("/")
}
