//! 错误类型
//!
//! 非法走法不是错误（只是不改变局面），这里只定义需要向上传播的失败。

use thiserror::Error;

use crate::types::Piece;
use crate::view::PieceVariant;

/// 引擎可能产生的错误
#[derive(Error, Debug)]
pub enum XiangqiError {
    /// 棋子素材加载失败，渲染端无法启动
    #[error("failed to load {variant:?} asset for {piece}: {reason}")]
    AssetLoad {
        piece: Piece,
        variant: PieceVariant,
        reason: String,
    },

    /// 棋盘图解析失败或违反棋盘约束
    #[error("invalid diagram: {0}")]
    InvalidDiagram(String),

    /// 无法解析的坐标
    #[error("invalid square: {0}")]
    InvalidSquare(String),

    /// 未知颜色
    #[error("invalid color: {0} (expected red or black)")]
    InvalidColor(String),
}

/// 引擎操作的 Result 别名
pub type Result<T> = std::result::Result<T, XiangqiError>;
