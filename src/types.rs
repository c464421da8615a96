//! 象棋核心类型定义
//!
//! 定义棋子、阵营、坐标和走法等基础数据类型

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::XiangqiError;

/// 棋盘行数
pub const ROWS: i8 = 10;
/// 棋盘列数
pub const COLS: i8 = 9;

/// 棋子颜色/阵营
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Black,
}

impl Color {
    /// 获取对方阵营
    pub fn opposite(&self) -> Color {
        match self {
            Color::Red => Color::Black,
            Color::Black => Color::Red,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Red => write!(f, "Red"),
            Color::Black => write!(f, "Black"),
        }
    }
}

impl FromStr for Color {
    type Err = XiangqiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "red" | "r" => Ok(Color::Red),
            "black" | "b" => Ok(Color::Black),
            _ => Err(XiangqiError::InvalidColor(s.to_string())),
        }
    }
}

/// 棋子角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceRole {
    /// 将/帅
    King,
    /// 士/仕
    Guard,
    /// 象/相
    Bishop,
    /// 马
    Horse,
    /// 车
    Rook,
    /// 炮
    Cannon,
    /// 卒/兵
    Soldier,
}

impl PieceRole {
    /// 全部七种角色
    pub const ALL: [PieceRole; 7] = [
        PieceRole::King,
        PieceRole::Guard,
        PieceRole::Bishop,
        PieceRole::Horse,
        PieceRole::Rook,
        PieceRole::Cannon,
        PieceRole::Soldier,
    ];

    /// 从棋谱字符解析（大小写不敏感）
    pub fn from_glyph(c: char) -> Option<PieceRole> {
        match c.to_ascii_lowercase() {
            'k' => Some(PieceRole::King),
            'g' => Some(PieceRole::Guard),
            'b' => Some(PieceRole::Bishop),
            'h' => Some(PieceRole::Horse),
            'r' => Some(PieceRole::Rook),
            'c' => Some(PieceRole::Cannon),
            's' => Some(PieceRole::Soldier),
            _ => None,
        }
    }

    /// 转换为棋谱字符（小写）
    pub fn to_glyph(&self) -> char {
        match self {
            PieceRole::King => 'k',
            PieceRole::Guard => 'g',
            PieceRole::Bishop => 'b',
            PieceRole::Horse => 'h',
            PieceRole::Rook => 'r',
            PieceRole::Cannon => 'c',
            PieceRole::Soldier => 's',
        }
    }

    /// 获取棋子的子力价值
    pub fn value(&self) -> i32 {
        match self {
            PieceRole::King => 100,
            PieceRole::Rook => 10,
            PieceRole::Horse => 5,
            PieceRole::Cannon => 5,
            PieceRole::Bishop => 2,
            PieceRole::Guard => 2,
            PieceRole::Soldier => 1,
        }
    }
}

impl fmt::Display for PieceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PieceRole::King => "King",
            PieceRole::Guard => "Guard",
            PieceRole::Bishop => "Bishop",
            PieceRole::Horse => "Horse",
            PieceRole::Rook => "Rook",
            PieceRole::Cannon => "Cannon",
            PieceRole::Soldier => "Soldier",
        };
        write!(f, "{}", name)
    }
}

/// 棋子：阵营 + 角色，按值比较
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Piece {
    pub color: Color,
    pub role: PieceRole,
}

impl Piece {
    pub const fn new(color: Color, role: PieceRole) -> Self {
        Piece { color, role }
    }

    /// 棋谱字符：红方大写，黑方小写
    pub fn glyph(&self) -> char {
        let ch = self.role.to_glyph();
        match self.color {
            Color::Red => ch.to_ascii_uppercase(),
            Color::Black => ch,
        }
    }

    /// 从棋谱字符解析
    pub fn from_glyph(c: char) -> Option<Piece> {
        let role = PieceRole::from_glyph(c)?;
        let color = if c.is_ascii_uppercase() {
            Color::Red
        } else {
            Color::Black
        };
        Some(Piece { color, role })
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.color, self.role)
    }
}

/// 棋盘位置 (row, col)
///
/// row: 0-9（0 是显示时的顶端底线，9 是本方底线）
/// col: 0-8（从左到右）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Position {
    pub row: i8,
    pub col: i8,
}

impl Position {
    pub const fn new(row: i8, col: i8) -> Self {
        Position { row, col }
    }

    /// 检查位置是否在棋盘范围内
    pub fn is_valid(&self) -> bool {
        (0..ROWS).contains(&self.row) && (0..COLS).contains(&self.col)
    }

    /// 检查位置是否在九宫格内（上下两个九宫都算）
    pub fn is_in_palace(&self) -> bool {
        (3..=5).contains(&self.col) && ((0..=2).contains(&self.row) || (7..=9).contains(&self.row))
    }

    /// 是否在上半场（河界以上，row 0-4）
    pub fn is_top_half(&self) -> bool {
        self.row <= 4
    }

    /// 位置加偏移量
    pub fn offset(&self, row_delta: i8, col_delta: i8) -> Position {
        Position {
            row: self.row + row_delta,
            col: self.col + col_delta,
        }
    }

    /// 转换为数组下标
    #[inline]
    pub fn to_index(&self) -> usize {
        (self.row as usize) * (COLS as usize) + self.col as usize
    }

    /// 从数组下标还原
    #[inline]
    pub fn from_index(idx: usize) -> Position {
        Position {
            row: (idx / COLS as usize) as i8,
            col: (idx % COLS as usize) as i8,
        }
    }

    /// 从坐标记号解析（如 "b7"：b 列第 7 行）
    pub fn from_notation(s: &str) -> Option<Position> {
        let s = s.trim();
        if s.len() != 2 {
            return None;
        }
        let bytes = s.as_bytes();
        let col = match bytes[0].to_ascii_lowercase() {
            c @ b'a'..=b'i' => (c - b'a') as i8,
            _ => return None,
        };
        let row = match bytes[1] {
            r @ b'0'..=b'9' => (r - b'0') as i8,
            _ => return None,
        };
        Some(Position { row, col })
    }

    /// 转换为坐标记号
    pub fn to_notation(&self) -> String {
        let col_char = (b'a' + self.col as u8) as char;
        format!("{}{}", col_char, self.row)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_notation())
    }
}

/// 走法：纯描述，落子由 `BoardState::make_move` 完成
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Move {
    pub piece: Piece,
    pub from: Position,
    pub to: Position,
}

impl Move {
    pub fn new(piece: Piece, from: Position, to: Position) -> Self {
        Move { piece, from, to }
    }

    /// 坐标走法记号（如 "b7h7"）
    pub fn to_notation(&self) -> String {
        format!("{}{}", self.from, self.to)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.piece, self.to_notation())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_from_notation() {
        assert_eq!(Position::from_notation("a0"), Some(Position::new(0, 0)));
        assert_eq!(Position::from_notation("e4"), Some(Position::new(4, 4)));
        assert_eq!(Position::from_notation("I9"), Some(Position::new(9, 8)));
        assert_eq!(Position::from_notation("j0"), None);
        assert_eq!(Position::from_notation("a"), None);
    }

    #[test]
    fn test_position_index_roundtrip() {
        for row in 0..ROWS {
            for col in 0..COLS {
                let pos = Position::new(row, col);
                assert_eq!(Position::from_index(pos.to_index()), pos);
            }
        }
    }

    #[test]
    fn test_palace_bounds() {
        assert!(Position::new(0, 3).is_in_palace());
        assert!(Position::new(9, 5).is_in_palace());
        assert!(!Position::new(3, 4).is_in_palace());
        assert!(!Position::new(8, 2).is_in_palace());
    }

    #[test]
    fn test_piece_glyph() {
        let red_rook = Piece::new(Color::Red, PieceRole::Rook);
        assert_eq!(red_rook.glyph(), 'R');
        assert_eq!(Piece::from_glyph('R'), Some(red_rook));
        assert_eq!(
            Piece::from_glyph('s'),
            Some(Piece::new(Color::Black, PieceRole::Soldier))
        );
        assert_eq!(Piece::from_glyph('x'), None);
    }

    #[test]
    fn test_color_from_str() {
        assert_eq!("red".parse::<Color>().unwrap(), Color::Red);
        assert_eq!("Black".parse::<Color>().unwrap(), Color::Black);
        assert!("green".parse::<Color>().is_err());
    }

    #[test]
    fn test_move_display() {
        let mv = Move::new(
            Piece::new(Color::Red, PieceRole::Cannon),
            Position::new(7, 1),
            Position::new(7, 7),
        );
        assert_eq!(mv.to_notation(), "b7h7");
        assert_eq!(mv.to_string(), "Red Cannon b7h7");
    }
}
