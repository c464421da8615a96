//! 后台 AI 提示
//!
//! 搜索在独立线程上对棋盘副本进行，界面线程每帧用 `poll` 非阻塞地取结果。

use crossbeam_channel::{bounded, Receiver, TryRecvError};
use log::{info, warn};
use std::thread;
use std::time::{Duration, Instant};

use crate::ai::{AIStrategy, SearchReport};
use crate::board::BoardState;
use crate::types::Move;

/// 搜索完成后的提示
#[derive(Debug, Clone)]
pub struct Hint {
    pub best: Option<Move>,
    pub text: String,
    /// 从发起到取回结果的用时
    pub took: Duration,
    pub nodes: u64,
}

impl Hint {
    fn from_report(report: SearchReport, took: Duration) -> Self {
        let text = match report.best {
            Some(mv) => format!("Best move: {}", mv),
            None => "No move to recommend".to_string(),
        };
        Hint {
            best: report.best,
            text,
            took,
            nodes: report.nodes,
        }
    }
}

/// 提示线程状态
pub enum HintState {
    Idle,
    Thinking {
        receiver: Receiver<SearchReport>,
        started_at: Instant,
    },
}

/// 提示调度：同一时间最多一个搜索
pub struct HintWorker {
    state: HintState,
    last: Option<Hint>,
}

impl Default for HintWorker {
    fn default() -> Self {
        HintWorker::new()
    }
}

impl HintWorker {
    pub fn new() -> Self {
        HintWorker {
            state: HintState::Idle,
            last: None,
        }
    }

    pub fn is_thinking(&self) -> bool {
        matches!(self.state, HintState::Thinking { .. })
    }

    /// 思考中时返回已用时间
    pub fn thinking_for(&self) -> Option<Duration> {
        match &self.state {
            HintState::Thinking { started_at, .. } => Some(started_at.elapsed()),
            HintState::Idle => None,
        }
    }

    /// 在后台线程上搜索棋盘副本，已有搜索在进行时返回 false
    pub fn start(&mut self, board: &BoardState, strategy: Box<dyn AIStrategy>) -> bool {
        if self.is_thinking() {
            return false;
        }

        let snapshot = board.clone();
        let (tx, rx) = bounded(1);
        let spawned = thread::Builder::new()
            .name("xiangqi-hint".to_string())
            .spawn(move || {
                let report = strategy.search(&snapshot);
                let _ = tx.send(report);
            });

        match spawned {
            Ok(_) => {
                self.last = None;
                self.state = HintState::Thinking {
                    receiver: rx,
                    started_at: Instant::now(),
                };
                info!("hint search started for {}", board.side_to_move());
                true
            }
            Err(e) => {
                warn!("failed to spawn hint thread: {}", e);
                false
            }
        }
    }

    /// 非阻塞地检查搜索是否完成，完成时返回 true
    pub fn poll(&mut self) -> bool {
        let received = match &self.state {
            HintState::Thinking {
                receiver,
                started_at,
            } => match receiver.try_recv() {
                Ok(report) => Some((report, started_at.elapsed())),
                Err(TryRecvError::Empty) => return false,
                Err(TryRecvError::Disconnected) => {
                    warn!("hint thread exited without a result");
                    self.state = HintState::Idle;
                    return false;
                }
            },
            HintState::Idle => return false,
        };

        match received {
            Some((report, took)) => {
                self.finish(report, took);
                true
            }
            None => false,
        }
    }

    /// 阻塞等待搜索结束，空闲时直接返回上一次的提示
    pub fn wait(&mut self) -> Option<&Hint> {
        if let HintState::Thinking {
            receiver,
            started_at,
        } = &self.state
        {
            match receiver.recv() {
                Ok(report) => {
                    let took = started_at.elapsed();
                    self.finish(report, took);
                }
                Err(_) => {
                    warn!("hint thread exited without a result");
                    self.state = HintState::Idle;
                }
            }
        }
        self.last.as_ref()
    }

    fn finish(&mut self, report: SearchReport, took: Duration) {
        let hint = Hint::from_report(report, took);
        info!("{} ({:.2}s, {} nodes)", hint.text, took.as_secs_f64(), hint.nodes);
        self.state = HintState::Idle;
        self.last = Some(hint);
    }

    /// 最近一次完成的提示
    pub fn last(&self) -> Option<&Hint> {
        self.last.as_ref()
    }

    /// 丢弃已完成的提示，不影响进行中的搜索
    pub fn clear(&mut self) {
        self.last = None;
    }
}
