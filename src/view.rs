//! 渲染端接口
//!
//! 棋盘只读快照、屏幕坐标到棋盘坐标的换算，以及棋子素材的加载约定。
//! 核心不接触像素，也不关心素材的具体格式。

use serde::Serialize;
use std::collections::HashMap;
use std::fmt::Write as _;

use crate::board::BoardState;
use crate::error::{Result, XiangqiError};
use crate::types::{Color, Piece, PieceRole, Position, COLS, ROWS};

/// 单个格子的渲染信息
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CellView {
    pub piece: Option<Piece>,
    /// 是否为当前选中的起点
    pub selected: bool,
}

/// 棋盘快照
#[derive(Debug, Clone, Serialize)]
pub struct BoardView {
    /// 10 行 x 9 列
    pub cells: Vec<Vec<CellView>>,
    pub home: Color,
    pub side_to_move: Color,
    /// 当前回合用时（秒）
    pub elapsed_secs: f64,
    pub is_over: bool,
    pub winner: Option<Color>,
    /// AI 提示文本
    pub hint: Option<String>,
    /// 提示的计算用时（思考中为已用时间）
    pub hint_secs: Option<f64>,
    pub thinking: bool,
}

impl BoardView {
    /// 从棋盘生成快照（不含提示信息）
    pub fn from_board(board: &BoardState) -> Self {
        let selection = board.selection();
        let cells = (0..ROWS)
            .map(|row| {
                (0..COLS)
                    .map(|col| {
                        let pos = Position::new(row, col);
                        CellView {
                            piece: board.piece_at(pos),
                            selected: selection == Some(pos),
                        }
                    })
                    .collect()
            })
            .collect();

        BoardView {
            cells,
            home: board.home_color(),
            side_to_move: board.side_to_move(),
            elapsed_secs: board.elapsed().as_secs_f64(),
            is_over: board.is_over(),
            winner: board.winner(),
            hint: None,
            hint_secs: None,
            thinking: false,
        }
    }

    pub fn cell(&self, pos: Position) -> Option<&CellView> {
        if !pos.is_valid() {
            return None;
        }
        self.cells
            .get(pos.row as usize)
            .and_then(|row| row.get(pos.col as usize))
    }

    /// 状态行：计时、胜负和提示
    pub fn status_line(&self) -> String {
        let mut line = match self.winner {
            Some(color) => format!("{}s  {} wins!", self.elapsed_secs.round(), color),
            None => format!("{} to move, {}s", self.side_to_move, self.elapsed_secs.round()),
        };
        if self.thinking {
            let _ = write!(
                line,
                "  |  The AI is thinking... {}s",
                self.hint_secs.unwrap_or(0.0).round()
            );
        } else if let Some(hint) = &self.hint {
            let _ = write!(line, "  |  {}, took: {:.1}s", hint, self.hint_secs.unwrap_or(0.0));
        }
        line
    }

    /// 用素材表绘制文本棋盘，左侧标行号，底部标列名
    pub fn render_text<H: AsRef<str>>(&self, atlas: &PieceAtlas<H>) -> String {
        let mut out = String::new();
        for (row, cells) in self.cells.iter().enumerate() {
            let _ = write!(out, "{} ", row);
            for cell in cells {
                let glyph = match cell.piece {
                    Some(piece) => {
                        let variant = if cell.selected {
                            PieceVariant::Selected
                        } else {
                            PieceVariant::Normal
                        };
                        atlas.get(piece, variant).map_or("???", |h| h.as_ref())
                    }
                    None => " . ",
                };
                out.push_str(glyph);
            }
            out.push('\n');
            if row == 4 {
                out.push_str("  ~~~~~~~~~~~~~~~~~~~~~~~~~~~\n");
            }
        }
        out.push_str("   a  b  c  d  e  f  g  h  i\n");
        out
    }
}

/// 屏幕几何：边距、格距和点击判定半径
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardGeometry {
    pub width: i32,
    pub height: i32,
    pub left_margin: i32,
    pub top_margin: i32,
    /// 点击点与交叉点在横纵方向上的最大距离
    pub hit_radius: i32,
}

impl Default for BoardGeometry {
    fn default() -> Self {
        BoardGeometry {
            width: 640,
            height: 840,
            left_margin: 40,
            top_margin: 80,
            hit_radius: 28,
        }
    }
}

impl BoardGeometry {
    /// 列距和行距
    fn steps(&self) -> (i32, i32) {
        (
            (self.width - self.left_margin * 2) / (COLS as i32 - 1),
            (self.height - self.top_margin * 2) / (ROWS as i32 - 1),
        )
    }

    /// 交叉点的屏幕坐标
    pub fn cell_center(&self, pos: Position) -> (i32, i32) {
        let (dx, dy) = self.steps();
        (
            self.left_margin + dx * pos.col as i32,
            self.top_margin + dy * pos.row as i32,
        )
    }

    /// 屏幕坐标换算为最近的交叉点，超出判定半径时返回 None
    pub fn cell_at(&self, x: i32, y: i32) -> Option<Position> {
        let (dx, dy) = self.steps();
        if dx <= 0 || dy <= 0 {
            return None;
        }
        // 先转 f64 再相减，极端坐标不会溢出
        let col = ((x as f64 - self.left_margin as f64) / dx as f64).round();
        let row = ((y as f64 - self.top_margin as f64) / dy as f64).round();
        if !(0.0..COLS as f64).contains(&col) || !(0.0..ROWS as f64).contains(&row) {
            return None;
        }

        let pos = Position::new(row as i8, col as i8);
        let (cx, cy) = self.cell_center(pos);
        if (x - cx).abs() <= self.hit_radius && (y - cy).abs() <= self.hit_radius {
            Some(pos)
        } else {
            None
        }
    }
}

/// 棋子素材的两种形态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PieceVariant {
    Normal,
    /// 被选中时的形态
    Selected,
}

/// 棋子素材来源，由渲染端实现
pub trait PieceAssets {
    /// 不透明的素材句柄（图片、字形等）
    type Handle;

    fn load(&mut self, piece: Piece, variant: PieceVariant) -> std::result::Result<Self::Handle, String>;
}

/// 预加载的全部棋子素材（2 色 x 7 种 x 2 形态）
#[derive(Debug, Clone)]
pub struct PieceAtlas<H> {
    handles: HashMap<(Piece, PieceVariant), H>,
}

impl<H> PieceAtlas<H> {
    /// 加载全部素材，任何一个失败都中止
    pub fn load<A>(assets: &mut A) -> Result<PieceAtlas<H>>
    where
        A: PieceAssets<Handle = H>,
    {
        let mut handles = HashMap::with_capacity(28);
        for color in [Color::Red, Color::Black] {
            for role in PieceRole::ALL {
                let piece = Piece::new(color, role);
                for variant in [PieceVariant::Normal, PieceVariant::Selected] {
                    let handle = assets
                        .load(piece, variant)
                        .map_err(|reason| XiangqiError::AssetLoad {
                            piece,
                            variant,
                            reason,
                        })?;
                    handles.insert((piece, variant), handle);
                }
            }
        }
        Ok(PieceAtlas { handles })
    }

    pub fn get(&self, piece: Piece, variant: PieceVariant) -> Option<&H> {
        self.handles.get(&(piece, variant))
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

/// 终端字形素材：普通 " R "，选中 "[R]"
#[derive(Debug, Default)]
pub struct TextGlyphs;

impl PieceAssets for TextGlyphs {
    type Handle = String;

    fn load(&mut self, piece: Piece, variant: PieceVariant) -> std::result::Result<String, String> {
        let glyph = piece.glyph();
        Ok(match variant {
            PieceVariant::Normal => format!(" {} ", glyph),
            PieceVariant::Selected => format!("[{}]", glyph),
        })
    }
}
