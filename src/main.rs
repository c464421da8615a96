//! Xiangqi CLI
//!
//! 命令行界面
//!
//! 1. play：终端对局，支持悔棋和后台 AI 提示
//! 2. moves / best：单次命令，分析任意局面

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::{self, BufRead, Write};
use xiangqi_core::{
    parse_diagram, to_diagram, valid_moves, AIConfig, AIStrategy, BoardState, Color, GameConfig,
    GameSession, MinimaxAI, PieceAtlas, Position, Result, SelectOutcome, TextGlyphs,
    XiangqiError,
};

#[derive(Parser)]
#[command(name = "xiangqi")]
#[command(about = "Xiangqi rules engine with alpha-beta hints", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 终端对局
    Play {
        /// 坐在下方的一方 (red, black)
        #[arg(long, default_value = "red")]
        color: String,

        /// 提示搜索深度
        #[arg(long, default_value = "3")]
        depth: u32,
    },

    /// 列出合法走法
    Moves {
        /// 棋盘图，缺省为开局
        #[arg(long)]
        board: Option<String>,

        /// 坐在下方的一方
        #[arg(long, default_value = "red")]
        home: String,

        /// 轮到哪一方
        #[arg(long, default_value = "red")]
        turn: String,

        /// JSON 输出
        #[arg(long)]
        json: bool,
    },

    /// 搜索最佳走法
    Best {
        /// 棋盘图，缺省为开局
        #[arg(long)]
        board: Option<String>,

        /// 坐在下方的一方
        #[arg(long, default_value = "red")]
        home: String,

        /// 轮到哪一方
        #[arg(long, default_value = "red")]
        turn: String,

        /// 搜索深度
        #[arg(long, default_value = "3")]
        depth: u32,

        /// JSON 输出
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct MovesResponse {
    moves: Vec<String>,
    total: usize,
}

#[derive(Serialize)]
struct BestResponse {
    #[serde(rename = "move")]
    mv: Option<String>,
    piece: Option<String>,
    score: i32,
    depth: u32,
    nodes: u64,
    elapsed_ms: f64,
    nps: f64,
}

fn calc_nps(nodes: u64, elapsed_secs: f64) -> f64 {
    if elapsed_secs > 0.0 {
        nodes as f64 / elapsed_secs
    } else {
        0.0
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Play { color, depth } => run_play(&color, depth),
        Commands::Moves {
            board,
            home,
            turn,
            json,
        } => run_moves(board.as_deref(), &home, &turn, json),
        Commands::Best {
            board,
            home,
            turn,
            depth,
            json,
        } => run_best(board.as_deref(), &home, &turn, depth, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// 从命令行参数构造棋盘
fn load_board(diagram: Option<&str>, home: &str, turn: &str) -> Result<BoardState> {
    let home: Color = home.parse()?;
    let turn: Color = turn.parse()?;
    match diagram {
        Some(text) => parse_diagram(text, home, turn),
        None => parse_diagram(&to_diagram(&BoardState::new(home)), home, turn),
    }
}

fn parse_square(s: &str) -> Result<Position> {
    Position::from_notation(s).ok_or_else(|| XiangqiError::InvalidSquare(s.to_string()))
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => eprintln!("Error: {}", e),
    }
}

fn run_moves(diagram: Option<&str>, home: &str, turn: &str, json: bool) -> Result<()> {
    let board = load_board(diagram, home, turn)?;
    let moves = valid_moves(&board);

    if json {
        let response = MovesResponse {
            total: moves.len(),
            moves: moves.iter().map(|mv| mv.to_notation()).collect(),
        };
        print_json(&response);
    } else {
        println!("Legal moves ({}):", moves.len());
        for mv in &moves {
            println!("  {}", mv);
        }
    }
    Ok(())
}

fn run_best(diagram: Option<&str>, home: &str, turn: &str, depth: u32, json: bool) -> Result<()> {
    let board = load_board(diagram, home, turn)?;
    let ai = MinimaxAI::new(&AIConfig { depth });
    let report = ai.search(&board);

    let elapsed = report.elapsed.as_secs_f64();
    let nps = calc_nps(report.nodes, elapsed);

    if json {
        let response = BestResponse {
            mv: report.best.map(|mv| mv.to_notation()),
            piece: report.best.map(|mv| mv.piece.to_string()),
            score: report.score,
            depth: report.depth,
            nodes: report.nodes,
            elapsed_ms: elapsed * 1000.0,
            nps,
        };
        print_json(&response);
    } else {
        match report.best {
            Some(mv) => println!("Best move: {} (score: {})", mv, report.score),
            None => println!("No move to recommend"),
        }
        println!(
            "\nStats: depth={}, nodes={}, time={:.3}s, nps={:.0}",
            report.depth, report.nodes, elapsed, nps
        );
    }
    Ok(())
}

const PLAY_HELP: &str = "Commands: <sq> | <sq> <sq> | undo | redo | hint | show | json | quit  (squares like b7)";

/// 终端对局主循环
///
/// 每读一行先检查后台提示是否完成
fn run_play(color: &str, depth: u32) -> Result<()> {
    let home: Color = color.parse()?;
    let atlas = PieceAtlas::load(&mut TextGlyphs)?;
    let mut session = GameSession::new(GameConfig {
        home,
        hint_depth: depth,
    });

    let show = |session: &GameSession| {
        let view = session.view();
        print!("{}", view.render_text(&atlas));
        println!("{}", view.status_line());
    };

    println!("{}", PLAY_HELP);
    show(&session);

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };

        if session.tick() {
            if let Some(hint) = session.hint() {
                println!("{}", hint.text);
            }
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens.as_slice() {
            [] => {}
            ["quit"] | ["exit"] => break,
            ["undo"] => {
                if session.undo() {
                    show(&session);
                } else {
                    println!("Nothing to undo");
                }
            }
            ["redo"] => {
                if session.redo() {
                    show(&session);
                } else {
                    println!("Nothing to redo");
                }
            }
            ["hint"] => {
                if session.request_hint() {
                    println!("The AI is thinking...");
                } else {
                    println!("Hint unavailable");
                }
            }
            ["show"] => show(&session),
            ["json"] => print_json(&session.view()),
            ["help"] => println!("{}", PLAY_HELP),
            squares if squares.len() <= 2 => {
                let mut moved = false;
                for sq in squares {
                    let pos = match parse_square(sq) {
                        Ok(pos) => pos,
                        Err(e) => {
                            println!("Error: {}", e);
                            break;
                        }
                    };
                    match session.select(pos) {
                        SelectOutcome::Moved(mv) => {
                            println!("{}", mv);
                            moved = true;
                        }
                        SelectOutcome::Selected(pos) => println!("Selected {}", pos),
                        SelectOutcome::Deselected => println!("Selection cleared"),
                        SelectOutcome::Rejected => println!("Illegal move"),
                        SelectOutcome::Ignored => println!("Ignored"),
                    }
                }
                if moved {
                    show(&session);
                }
            }
            _ => println!("{}", PLAY_HELP),
        }

        let _ = stdout.flush();
    }

    Ok(())
}
