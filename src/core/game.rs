//! The match aggregate: turn ownership, darts-per-turn counting,
//! bust rollback, and leg/set starter rotation. All scoring semantics are
//! delegated to the active rule variant.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use hashbrown::{HashMap, HashSet};
use thiserror::Error;

use crate::{
    record::ThrowRecord,
    rules::{GameMode, Outcome, Progress, RosterError, ThrowEvaluation},
    score::PlayerScore,
    throw::Throw,
    types::{PlayerId, ThrowSeq},
};

/// Turn-protocol violation. None of these mutate match state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MatchError {
    /// The match already has a result; no further throws are accepted.
    #[error("match is already finished")]
    Finished,
    /// A participant threw out of turn.
    #[error("player {found} threw out of turn, it is player {expected}'s turn")]
    NotCurrentTurn {
        /// Player whose turn it is.
        expected: PlayerId,
        /// Player who tried to throw.
        found: PlayerId,
    },
    /// The id is not on this match's roster.
    #[error("player {0} is not part of this match")]
    UnknownPlayer(PlayerId),
}

/// One match of darts under a single rule variant.
///
/// The score map is owned exclusively by the match; every `register_throw`
/// call either fully commits a consistent new state, leaves state unchanged
/// (on rejection), or rolls back to the pre-turn snapshot (on bust).
pub struct DartMatch {
    mode: Arc<dyn GameMode>,
    players: Vec<PlayerId>,
    scores: HashMap<PlayerId, PlayerScore>,
    history: Vec<ThrowRecord>,
    pending_records: Vec<ThrowRecord>,
    next_seq: ThrowSeq,
    current_idx: usize,
    darts_thrown: u8,
    turn_snapshot: Option<PlayerScore>,
    leg_starter_idx: usize,
    set_starter_idx: usize,
    finished: bool,
    winner: Option<PlayerId>,
    draw: bool,
}

impl DartMatch {
    /// Builds a match from a rule variant and an ordered roster. Turn order
    /// is fixed at creation; the first player on the roster opens.
    pub fn new(mode: Arc<dyn GameMode>, players: Vec<PlayerId>) -> Result<Self, RosterError> {
        mode.validate_players(&players)?;

        let mut seen = HashSet::new();
        for &player in &players {
            if !seen.insert(player) {
                return Err(RosterError::DuplicatePlayer(player));
            }
        }

        let scores = players
            .iter()
            .map(|&player| (player, mode.initial_score(player)))
            .collect();

        Ok(Self {
            mode,
            players,
            scores,
            history: Vec::new(),
            pending_records: Vec::new(),
            next_seq: 1,
            current_idx: 0,
            darts_thrown: 0,
            turn_snapshot: None,
            leg_starter_idx: 0,
            set_starter_idx: 0,
            finished: false,
            winner: None,
            draw: false,
        })
    }

    /// Registers one dart for `player_id`.
    ///
    /// Rejected calls (wrong turn, finished match, unknown player) have no
    /// observable effect. Accepted throws are appended to the history and
    /// queued for the journal.
    pub fn register_throw(
        &mut self,
        player_id: PlayerId,
        throw: Throw,
    ) -> Result<ThrowEvaluation, MatchError> {
        let record = ThrowRecord {
            seq: self.next_seq,
            ts_ms: now_ms(),
            player_id,
            throw,
        };
        self.register_record(record, true)
    }

    /// Re-applies a journaled throw during replay, preserving its sequence
    /// and timestamp and bypassing the journal queue.
    pub fn apply_replayed_throw(&mut self, record: ThrowRecord) -> Result<ThrowEvaluation, MatchError> {
        self.register_record(record, false)
    }

    fn register_record(
        &mut self,
        record: ThrowRecord,
        journal: bool,
    ) -> Result<ThrowEvaluation, MatchError> {
        if self.finished {
            return Err(MatchError::Finished);
        }
        let player_id = record.player_id;
        if !self.scores.contains_key(&player_id) {
            return Err(MatchError::UnknownPlayer(player_id));
        }
        let current = self.players[self.current_idx];
        if player_id != current {
            return Err(MatchError::NotCurrentTurn {
                expected: current,
                found: player_id,
            });
        }

        // Snapshot before the first dart of the turn so a bust can undo
        // everything the turn did to the thrower.
        if self.darts_thrown == 0 {
            self.turn_snapshot = self.scores.get(&player_id).copied();
        }

        self.next_seq = self.next_seq.max(record.seq.saturating_add(1));
        self.history.push(record);
        if journal {
            self.pending_records.push(record);
        }

        let eval = self
            .mode
            .evaluate_throw(player_id, &record.throw, &self.scores);
        self.commit(player_id, &eval);
        Ok(eval)
    }

    fn commit(&mut self, player_id: PlayerId, eval: &ThrowEvaluation) {
        if let Some(others) = &eval.other_updated {
            for (&id, &score) in others {
                self.scores.insert(id, score);
            }
        }

        match eval.outcome {
            Outcome::Bust => {
                let snapshot = self
                    .turn_snapshot
                    .expect("turn snapshot exists while a turn is in progress");
                self.scores.insert(player_id, snapshot);
                self.end_turn();
            }
            Outcome::Win => {
                self.scores.insert(
                    player_id,
                    eval.updated_score
                        .expect("winning evaluation carries the final score"),
                );
                self.finished = true;
                self.winner = Some(player_id);
            }
            Outcome::Tie => {
                self.scores.insert(
                    player_id,
                    eval.updated_score
                        .expect("tie evaluation carries the final score"),
                );
                self.finished = true;
                self.draw = true;
            }
            Outcome::Continue => {
                self.scores.insert(
                    player_id,
                    eval.updated_score
                        .expect("continue evaluation carries the updated score"),
                );
                match eval.progress {
                    Progress::LegWon => self.start_next_leg(),
                    Progress::SetWon => self.start_next_set(),
                    Progress::None => {
                        self.darts_thrown += 1;
                        if self.darts_thrown >= self.mode.darts_per_turn() {
                            self.end_turn();
                        }
                    }
                }
            }
        }
    }

    /// Ordinary end of turn: next participant in roster order.
    fn end_turn(&mut self) {
        self.darts_thrown = 0;
        self.turn_snapshot = None;
        self.current_idx = (self.current_idx + 1) % self.players.len();
    }

    /// A leg just ended: the honor of opening rotates by one.
    fn start_next_leg(&mut self) {
        self.leg_starter_idx = (self.leg_starter_idx + 1) % self.players.len();
        self.current_idx = self.leg_starter_idx;
        self.darts_thrown = 0;
        self.turn_snapshot = None;
    }

    /// A set just ended: both the set and leg starters rotate.
    fn start_next_set(&mut self) {
        self.set_starter_idx = (self.set_starter_idx + 1) % self.players.len();
        self.leg_starter_idx = self.set_starter_idx;
        self.current_idx = self.leg_starter_idx;
        self.darts_thrown = 0;
        self.turn_snapshot = None;
    }

    /// Latest committed score for one participant.
    pub fn score_state(&self, player_id: PlayerId) -> Option<&PlayerScore> {
        self.scores.get(&player_id)
    }

    /// Read-only view of every participant's latest committed score.
    pub fn all_score_states(&self) -> &HashMap<PlayerId, PlayerScore> {
        &self.scores
    }

    /// Roster in fixed turn order.
    pub fn players(&self) -> &[PlayerId] {
        &self.players
    }

    /// Player whose turn it is, `None` once the match is finished.
    pub fn current_player(&self) -> Option<PlayerId> {
        if self.finished {
            None
        } else {
            Some(self.players[self.current_idx])
        }
    }

    /// Append-only history of accepted throws.
    pub fn history(&self) -> &[ThrowRecord] {
        &self.history
    }

    /// True once a win or tie has been recorded.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// The winner, absent while in progress or on a draw.
    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    /// True when the match finished level (cricket-family tie).
    pub fn is_draw(&self) -> bool {
        self.draw
    }

    /// Takes the accepted-but-unjournaled records for the history sink.
    pub fn drain_pending_records(&mut self) -> Vec<ThrowRecord> {
        std::mem::take(&mut self.pending_records)
    }

    /// Sequence number of the most recently accepted throw.
    pub fn latest_seq(&self) -> ThrowSeq {
        self.next_seq.saturating_sub(1)
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
