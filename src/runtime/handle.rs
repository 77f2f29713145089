//! Single-writer command loop owning one match, with an optional batching
//! persistence worker for the throw journal.

use std::sync::Arc;

use hashbrown::HashMap;
use thiserror::Error;
use tokio::{
    sync::{Mutex, broadcast, mpsc, oneshot},
    time::{Duration, Instant},
};
use tracing::debug;

use crate::{
    core::game::{DartMatch, MatchError},
    persist::{HistorySink, PersistError},
    record::ThrowRecord,
    rules::{Outcome, Progress, ThrowEvaluation},
    score::PlayerScore,
    throw::Throw,
    types::{PlayerId, ThrowSeq},
};

use super::events::MatchEvent;

/// Failure surfaced through the runtime handle.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Turn-protocol rejection from the match.
    #[error(transparent)]
    Match(#[from] MatchError),
    /// Journal failure, including queue pressure.
    #[error(transparent)]
    Persist(#[from] PersistError),
    /// The runtime task is gone.
    #[error("runtime channel closed")]
    ChannelClosed,
}

/// Tuning knobs for the runtime and its persistence worker.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Flush the journal eagerly after every accepted throw.
    pub flush_on_throw: bool,
    /// Max records per journal batch.
    pub batch_max_records: usize,
    /// Max time a record may sit unflushed, in milliseconds.
    pub batch_max_latency_ms: u64,
    /// Bound of the persistence queue; overflow surfaces as an error.
    pub persist_queue_bound: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            flush_on_throw: true,
            batch_max_records: 32,
            batch_max_latency_ms: 75,
            persist_queue_bound: 64,
        }
    }
}

/// Cloneable handle to a spawned match runtime.
pub struct MatchHandle {
    cmd_tx: mpsc::Sender<Command>,
    events_tx: broadcast::Sender<MatchEvent>,
}

impl Clone for MatchHandle {
    fn clone(&self) -> Self {
        Self {
            cmd_tx: self.cmd_tx.clone(),
            events_tx: self.events_tx.clone(),
        }
    }
}

enum Command {
    RegisterThrow {
        player_id: PlayerId,
        throw: Throw,
        resp: oneshot::Sender<Result<ThrowEvaluation, RuntimeError>>,
    },
    Score {
        player_id: PlayerId,
        resp: oneshot::Sender<Option<PlayerScore>>,
    },
    Scores {
        resp: oneshot::Sender<HashMap<PlayerId, PlayerScore>>,
    },
    History {
        resp: oneshot::Sender<Vec<ThrowRecord>>,
    },
    Flush {
        resp: oneshot::Sender<Result<ThrowSeq, RuntimeError>>,
    },
    Shutdown {
        resp: oneshot::Sender<Result<(), RuntimeError>>,
    },
}

enum PersistMsg {
    Record(ThrowRecord),
    Flush {
        resp: oneshot::Sender<Result<ThrowSeq, PersistError>>,
    },
    Shutdown {
        resp: oneshot::Sender<()>,
    },
}

/// Spawns the single-writer loop that owns `game`. With a sink, accepted
/// throws are journaled through a batching worker; without one the match
/// runs purely in memory.
pub fn spawn_match(
    game: DartMatch,
    sink: Option<Box<dyn HistorySink>>,
    config: RuntimeConfig,
) -> MatchHandle {
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<Command>(256);
    let (events_tx, _) = broadcast::channel::<MatchEvent>(1024);

    let (persist_tx_opt, mut durable_rx) = if let Some(sink) = sink {
        let (persist_tx, persist_rx) = mpsc::channel::<PersistMsg>(config.persist_queue_bound);
        let (durable_tx, durable_rx) = mpsc::unbounded_channel::<Result<ThrowSeq, PersistError>>();
        spawn_persistence_worker(sink, persist_rx, durable_tx, config.clone());
        (Some(persist_tx), Some(durable_rx))
    } else {
        (None, None)
    };

    let events_tx_loop = events_tx.clone();

    tokio::spawn(async move {
        let mut game = game;

        loop {
            if let Some(rx) = durable_rx.as_mut() {
                tokio::select! {
                    cmd = cmd_rx.recv() => {
                        let Some(cmd) = cmd else { break; };
                        if handle_command(cmd, &mut game, &events_tx_loop, persist_tx_opt.as_ref()).await {
                            break;
                        }
                    }
                    durable = rx.recv() => {
                        if let Some(Ok(seq)) = durable {
                            let _ = events_tx_loop.send(MatchEvent::DurableUpTo { seq });
                        }
                    }
                }
            } else {
                let Some(cmd) = cmd_rx.recv().await else { break; };
                if handle_command(cmd, &mut game, &events_tx_loop, persist_tx_opt.as_ref()).await {
                    break;
                }
            }
        }
        debug!("match runtime loop stopped");
    });

    MatchHandle { cmd_tx, events_tx }
}

impl MatchHandle {
    /// Subscribes to the event stream.
    pub fn subscribe(&self) -> broadcast::Receiver<MatchEvent> {
        self.events_tx.subscribe()
    }

    /// Registers one dart for `player_id`.
    pub async fn register_throw(
        &self,
        player_id: PlayerId,
        throw: Throw,
    ) -> Result<ThrowEvaluation, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::RegisterThrow {
                player_id,
                throw,
                resp: tx,
            })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// Latest committed score for one participant.
    pub async fn score(&self, player_id: PlayerId) -> Result<Option<PlayerScore>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Score { player_id, resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    /// Latest committed scores for every participant.
    pub async fn scores(&self) -> Result<HashMap<PlayerId, PlayerScore>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Scores { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    /// Full accepted-throw history so far.
    pub async fn history(&self) -> Result<Vec<ThrowRecord>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::History { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    /// Forces the journal out to disk, returning the durable sequence.
    pub async fn flush(&self) -> Result<ThrowSeq, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Flush { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// Flushes and stops the runtime.
    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Shutdown { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }
}

async fn handle_command(
    cmd: Command,
    game: &mut DartMatch,
    events_tx: &broadcast::Sender<MatchEvent>,
    persist_tx: Option<&mpsc::Sender<PersistMsg>>,
) -> bool {
    match cmd {
        Command::RegisterThrow {
            player_id,
            throw,
            resp,
        } => {
            let res = game
                .register_throw(player_id, throw)
                .map_err(RuntimeError::from)
                .and_then(|eval| {
                    let records = game.drain_pending_records();
                    if let Some(tx) = persist_tx {
                        for record in records {
                            enqueue_persist(tx, record)?;
                        }
                    } else {
                        let _ = events_tx.send(MatchEvent::DurableUpTo {
                            seq: game.latest_seq(),
                        });
                    }
                    emit_throw_events(events_tx, game, player_id, &eval);
                    Ok(eval)
                });
            let _ = resp.send(res);
        }
        Command::Score { player_id, resp } => {
            let _ = resp.send(game.score_state(player_id).copied());
        }
        Command::Scores { resp } => {
            let _ = resp.send(game.all_score_states().clone());
        }
        Command::History { resp } => {
            let _ = resp.send(game.history().to_vec());
        }
        Command::Flush { resp } => {
            let out = if let Some(tx) = persist_tx {
                let (flush_tx, flush_rx) = oneshot::channel();
                if tx.send(PersistMsg::Flush { resp: flush_tx }).await.is_err() {
                    Err(RuntimeError::ChannelClosed)
                } else {
                    flush_rx
                        .await
                        .map_err(|_| RuntimeError::ChannelClosed)
                        .and_then(|r| r.map_err(RuntimeError::from))
                }
            } else {
                Ok(game.latest_seq())
            };
            let _ = resp.send(out);
        }
        Command::Shutdown { resp } => {
            let out = if let Some(tx) = persist_tx {
                let (done_tx, done_rx) = oneshot::channel();
                if tx.send(PersistMsg::Shutdown { resp: done_tx }).await.is_err() {
                    Err(RuntimeError::ChannelClosed)
                } else {
                    done_rx.await.map_err(|_| RuntimeError::ChannelClosed)
                }
            } else {
                Ok(())
            };
            let _ = resp.send(out);
            return true;
        }
    }

    false
}

fn emit_throw_events(
    events_tx: &broadcast::Sender<MatchEvent>,
    game: &DartMatch,
    player_id: PlayerId,
    eval: &ThrowEvaluation,
) {
    let _ = events_tx.send(MatchEvent::ThrowAccepted {
        player_id,
        outcome: eval.outcome,
    });

    match eval.progress {
        Progress::LegWon => {
            let _ = events_tx.send(MatchEvent::LegWon { player_id });
        }
        Progress::SetWon => {
            let _ = events_tx.send(MatchEvent::SetWon { player_id });
        }
        Progress::None => {}
    }

    if matches!(eval.outcome, Outcome::Win | Outcome::Tie) {
        let _ = events_tx.send(MatchEvent::Finished {
            winner: game.winner(),
        });
    }
}

fn spawn_persistence_worker(
    sink: Box<dyn HistorySink>,
    mut rx: mpsc::Receiver<PersistMsg>,
    durable_tx: mpsc::UnboundedSender<Result<ThrowSeq, PersistError>>,
    config: RuntimeConfig,
) {
    let sink = Arc::new(Mutex::new(sink));
    tokio::spawn(async move {
        let mut buf = Vec::<ThrowRecord>::new();
        let mut deadline = Instant::now() + Duration::from_millis(config.batch_max_latency_ms);
        let mut last_durable: ThrowSeq = 0;

        loop {
            tokio::select! {
                msg = rx.recv() => {
                    let Some(msg) = msg else {
                        let _ = flush_buf(&sink, &mut buf, &mut last_durable, &durable_tx, true).await;
                        break;
                    };

                    match msg {
                        PersistMsg::Record(record) => {
                            buf.push(record);
                            if buf.len() >= config.batch_max_records || config.flush_on_throw {
                                let _ = flush_buf(&sink, &mut buf, &mut last_durable, &durable_tx, true).await;
                                deadline = Instant::now() + Duration::from_millis(config.batch_max_latency_ms);
                            }
                        }
                        PersistMsg::Flush { resp } => {
                            let result = flush_buf(&sink, &mut buf, &mut last_durable, &durable_tx, true).await;
                            let _ = resp.send(result.map(|_| last_durable));
                            deadline = Instant::now() + Duration::from_millis(config.batch_max_latency_ms);
                        }
                        PersistMsg::Shutdown { resp } => {
                            let _ = flush_buf(&sink, &mut buf, &mut last_durable, &durable_tx, true).await;
                            let _ = resp.send(());
                            break;
                        }
                    }
                }
                _ = tokio::time::sleep_until(deadline), if !buf.is_empty() => {
                    let _ = flush_buf(&sink, &mut buf, &mut last_durable, &durable_tx, false).await;
                    deadline = Instant::now() + Duration::from_millis(config.batch_max_latency_ms);
                }
            }
        }
    });
}

async fn flush_buf(
    sink: &Arc<Mutex<Box<dyn HistorySink>>>,
    buf: &mut Vec<ThrowRecord>,
    last_durable: &mut ThrowSeq,
    durable_tx: &mpsc::UnboundedSender<Result<ThrowSeq, PersistError>>,
    call_flush: bool,
) -> Result<(), PersistError> {
    if buf.is_empty() {
        if call_flush {
            let sink_ref = Arc::clone(sink);
            tokio::task::spawn_blocking(move || {
                let mut sink = sink_ref.blocking_lock();
                sink.flush()
            })
            .await
            .map_err(|e| PersistError::Message(format!("join error: {e}")))??;
        }
        return Ok(());
    }

    let records = std::mem::take(buf);
    let sink_ref = Arc::clone(sink);
    let append_res: Result<ThrowSeq, PersistError> = tokio::task::spawn_blocking(move || {
        let mut sink = sink_ref.blocking_lock();
        let seq = sink.append_throws(&records)?;
        if call_flush {
            sink.flush()?;
        }
        Ok(seq)
    })
    .await
    .map_err(|e| PersistError::Message(format!("join error: {e}")))?;

    match append_res {
        Ok(seq) => {
            *last_durable = (*last_durable).max(seq);
            let _ = durable_tx.send(Ok(*last_durable));
            Ok(())
        }
        Err(err) => {
            debug!("journal append failed: {err}");
            let _ = durable_tx.send(Err(PersistError::Message(format!("append failed: {err}"))));
            Err(err)
        }
    }
}

fn enqueue_persist(tx: &mpsc::Sender<PersistMsg>, record: ThrowRecord) -> Result<(), RuntimeError> {
    tx.try_send(PersistMsg::Record(record))
        .map_err(|err| RuntimeError::Persist(PersistError::Message(format!("persist queue error: {err}"))))
}
