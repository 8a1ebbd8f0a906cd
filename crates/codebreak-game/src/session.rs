//! One game between two players: the turn state machine.
//!
//! `Session` is plain synchronous state. It is owned by exactly one
//! session task (see [`crate::SessionHandle`]), so every mutation and the
//! fan-out it triggers happen in one serialized step, and each broadcast
//! goes to the player set that produced it.

use codebreak_protocol::{MoveRecord, PlayerId, ServerEvent, SessionCode};
use codebreak_transport::ConnectionId;

use crate::code::{self, Code, Score};
use crate::fanout::{FanoutReport, fan_out};
use crate::player::{Outbox, Player, PlayerRegistry, Seat};
use crate::{GameError, SessionConfig, SessionState};

/// Players needed for a game to start.
pub const PLAYERS_PER_GAME: usize = 2;

/// One scored guess. Appended to the history, never changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Move {
    pub author: PlayerId,
    pub guess: Code,
    pub score: Score,
}

impl Move {
    pub fn to_record(&self) -> MoveRecord {
        MoveRecord {
            from: self.author.clone(),
            guess: self.guess.to_string(),
            correct_digits: self.score.correct_digits,
            correct_positions: self.score.correct_positions,
        }
    }
}

/// The result of a state change plus what its broadcast reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome<T> {
    pub value: T,
    pub fanout: FanoutReport,
}

/// A game session.
#[derive(Debug)]
pub struct Session {
    code: SessionCode,
    players: PlayerRegistry,
    turn: Option<PlayerId>,
    history: Vec<Move>,
    /// Once set, never cleared; `turn` stays `None` from then on.
    winner: Option<PlayerId>,
}

impl Session {
    pub fn new(code: SessionCode, config: &SessionConfig) -> Self {
        Self {
            code,
            players: PlayerRegistry::new(config.max_players),
            turn: None,
            history: Vec::new(),
            winner: None,
        }
    }

    pub fn code(&self) -> &SessionCode {
        &self.code
    }

    pub fn state(&self) -> SessionState {
        if self.winner.is_some() {
            SessionState::Finished
        } else if self.turn.is_some() {
            SessionState::Active
        } else {
            SessionState::Forming
        }
    }

    pub fn turn(&self) -> Option<&PlayerId> {
        self.turn.as_ref()
    }

    pub fn winner(&self) -> Option<&PlayerId> {
        self.winner.as_ref()
    }

    pub fn history(&self) -> &[Move] {
        &self.history
    }

    pub fn players(&self) -> &PlayerRegistry {
        &self.players
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    // -----------------------------------------------------------------
    // Registry operations
    // -----------------------------------------------------------------

    /// Seats a player (or moves their seat to a new connection) and
    /// broadcasts the roster.
    ///
    /// A reclaimed seat also gets a private catch-up of lock states and
    /// whose turn it is.
    ///
    /// # Errors
    /// [`GameError::SessionFull`] if `player` is new and no seat is free.
    pub fn join(
        &mut self,
        player: PlayerId,
        connection: ConnectionId,
        outbox: Outbox,
    ) -> Result<Outcome<Seat>, GameError> {
        let seat = self
            .players
            .join(player.clone(), connection, outbox)
            .ok_or_else(|| GameError::SessionFull(self.code.clone()))?;

        tracing::info!(
            session = %self.code,
            %player,
            %connection,
            ?seat,
            players = self.players.len(),
            "player joined"
        );

        let mut fanout = self.broadcast_roster();
        if seat == Seat::Reclaimed {
            fanout.merge(self.catch_up(&player));
        }
        Ok(Outcome { value: seat, fanout })
    }

    /// Commits (or replaces) a secret and broadcasts that it is unlocked.
    pub fn set_secret(
        &mut self,
        player: &PlayerId,
        raw: &str,
    ) -> Result<Outcome<()>, GameError> {
        self.players.set_secret(player, raw)?;
        tracing::debug!(session = %self.code, %player, "secret set");

        let fanout = self.fan_out(&ServerEvent::PlayerUpdate {
            player: player.clone(),
            locked: false,
        });
        Ok(Outcome { value: (), fanout })
    }

    /// Locks a secret. When this leaves two locked players and no
    /// winner, the game starts: the earliest-joined player gets the turn
    /// unless a turn holder already exists.
    ///
    /// Returns the turn holder if `game_start` was broadcast.
    pub fn lock_secret(
        &mut self,
        player: &PlayerId,
    ) -> Result<Outcome<Option<PlayerId>>, GameError> {
        self.players.lock_secret(player)?;
        tracing::debug!(session = %self.code, %player, "secret locked");

        let mut fanout = self.fan_out(&ServerEvent::PlayerUpdate {
            player: player.clone(),
            locked: true,
        });

        let ready = self.players.len() == PLAYERS_PER_GAME
            && self.players.iter().all(Player::is_locked)
            && self.winner.is_none();
        if !ready {
            return Ok(Outcome { value: None, fanout });
        }

        if self.turn.is_none() {
            self.turn = self.players.earliest_joined().map(|p| p.id().clone());
        }
        let Some(turn) = self.turn.clone() else {
            return Ok(Outcome { value: None, fanout });
        };

        tracing::info!(session = %self.code, %turn, "game started");
        fanout.merge(self.fan_out(&ServerEvent::GameStart { turn: turn.clone() }));
        Ok(Outcome {
            value: Some(turn),
            fanout,
        })
    }

    /// Removes `player` if `connection` still owns the seat, then
    /// broadcasts the roster. Returns whether anyone was removed.
    ///
    /// Leaving an unfinished game clears the turn holder; play resumes
    /// once two locked players are seated again.
    pub fn leave(&mut self, player: &PlayerId, connection: ConnectionId) -> Outcome<bool> {
        if !self.players.leave(player, connection) {
            return Outcome {
                value: false,
                fanout: FanoutReport::default(),
            };
        }

        tracing::info!(
            session = %self.code,
            %player,
            players = self.players.len(),
            "player left"
        );
        if self.state() == SessionState::Active {
            self.turn = None;
            tracing::info!(session = %self.code, "game paused, back to forming");
        }

        Outcome {
            value: true,
            fanout: self.broadcast_roster(),
        }
    }

    // -----------------------------------------------------------------
    // Turn state machine
    // -----------------------------------------------------------------

    /// The single player `player` is playing against.
    ///
    /// # Errors
    /// [`GameError::NoOpponent`] with nobody else seated,
    /// [`GameError::TooManyPlayers`] with more than one candidate.
    pub fn opponent_of(&self, player: &PlayerId) -> Result<&Player, GameError> {
        let mut others = self.players.iter().filter(|p| p.id() != player);
        match (others.next(), others.next()) {
            (Some(opponent), None) => Ok(opponent),
            (None, _) => Err(GameError::NoOpponent),
            (Some(_), Some(_)) => Err(GameError::TooManyPlayers),
        }
    }

    /// Scores a guess against the opponent's secret, records it, and
    /// either passes the turn or ends the game.
    ///
    /// Checks, in order: game not over, caller holds the turn, guess is
    /// valid, exactly one opponent, opponent has a secret. Any failure
    /// leaves the session unchanged.
    pub fn submit_guess(
        &mut self,
        player: &PlayerId,
        raw: &str,
    ) -> Result<Outcome<Move>, GameError> {
        // A finished game has no turn holder, so this must come first
        // for late guesses to see who won.
        if let Some(winner) = &self.winner {
            return Err(GameError::GameOver(winner.clone()));
        }
        if self.turn.as_ref() != Some(player) {
            return Err(GameError::NotYourTurn);
        }
        let guess = Code::parse(raw).map_err(|_| GameError::InvalidGuess)?;
        let opponent = self.opponent_of(player)?;
        let secret = opponent.secret().ok_or(GameError::OpponentNotReady)?;

        let score = code::score(secret, &guess);
        let opponent_id = opponent.id().clone();
        let mv = Move {
            author: player.clone(),
            guess,
            score,
        };
        self.history.push(mv.clone());

        let event = if score.is_win() {
            self.winner = Some(player.clone());
            self.turn = None;
            tracing::info!(
                session = %self.code,
                winner = %player,
                moves = self.history.len(),
                "game won"
            );
            ServerEvent::GameOver {
                winner: player.clone(),
                entry: mv.to_record(),
                history: self.history_records(),
            }
        } else {
            self.turn = Some(opponent_id.clone());
            ServerEvent::GuessResult {
                entry: mv.to_record(),
                turn: opponent_id,
                history: self.history_records(),
            }
        };

        let fanout = self.fan_out(&event);
        Ok(Outcome { value: mv, fanout })
    }

    pub fn history_records(&self) -> Vec<MoveRecord> {
        self.history.iter().map(Move::to_record).collect()
    }

    // -----------------------------------------------------------------
    // Fan-out
    // -----------------------------------------------------------------

    /// Sends `event` to every seated player. Anyone whose outbox was full
    /// is cut off.
    pub fn fan_out(&mut self, event: &ServerEvent) -> FanoutReport {
        let report = fan_out(self.players.iter(), event);
        self.cut_off_stalled(&report);
        report
    }

    fn broadcast_roster(&mut self) -> FanoutReport {
        let players = self.players.ids();
        self.fan_out(&ServerEvent::Players { players })
    }

    /// Brings a player whose connection just replaced an older one up to
    /// date: lock states, whose turn it is, and the moves so far (or the
    /// result, if the game is over).
    fn catch_up(&mut self, player: &PlayerId) -> FanoutReport {
        let mut events: Vec<ServerEvent> = self
            .players
            .iter()
            .filter(|p| p.secret().is_some())
            .map(|p| ServerEvent::PlayerUpdate {
                player: p.id().clone(),
                locked: p.is_locked(),
            })
            .collect();
        if let Some(turn) = &self.turn {
            events.push(ServerEvent::GameStart { turn: turn.clone() });
        }
        if let Some(last) = self.history.last() {
            match (&self.winner, &self.turn) {
                (Some(winner), _) => events.push(ServerEvent::GameOver {
                    winner: winner.clone(),
                    entry: last.to_record(),
                    history: self.history_records(),
                }),
                (None, Some(turn)) => events.push(ServerEvent::GuessResult {
                    entry: last.to_record(),
                    turn: turn.clone(),
                    history: self.history_records(),
                }),
                // Paused: the history is resent with the next guess.
                (None, None) => {}
            }
        }

        let mut report = FanoutReport::default();
        for event in &events {
            report.merge(fan_out(self.players.get(player), event));
        }
        self.cut_off_stalled(&report);
        report
    }

    fn cut_off_stalled(&mut self, report: &FanoutReport) {
        for id in report.stalled() {
            if self.players.cut_off(id) {
                tracing::info!(
                    session = %self.code,
                    player = %id,
                    "connection fell behind, cutting it off"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    //! State machine tests. Each player's outbox receiver is kept so the
    //! tests can see exactly what was broadcast.

    use super::*;
    use tokio::sync::mpsc::{self, Receiver};

    fn pid(raw: &str) -> PlayerId {
        PlayerId::parse(raw).unwrap()
    }

    fn conn(id: u64) -> ConnectionId {
        ConnectionId::new(id)
    }

    fn session() -> Session {
        Session::new(SessionCode::parse("TEST01").unwrap(), &SessionConfig::default())
    }

    fn seat(s: &mut Session, id: &str, c: u64) -> Receiver<ServerEvent> {
        let (tx, rx) = mpsc::channel(64);
        s.join(pid(id), conn(c), tx).unwrap();
        rx
    }

    fn drain(rx: &mut Receiver<ServerEvent>) -> Vec<ServerEvent> {
        let mut out = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            out.push(ev);
        }
        out
    }

    /// alice (secret 1234) and bob (secret 5678), both locked, alice to
    /// move.
    fn active_session() -> (
        Session,
        Receiver<ServerEvent>,
        Receiver<ServerEvent>,
    ) {
        let mut s = session();
        let mut a = seat(&mut s, "alice", 1);
        let mut b = seat(&mut s, "bob", 2);
        s.set_secret(&pid("alice"), "1234").unwrap();
        s.set_secret(&pid("bob"), "5678").unwrap();
        s.lock_secret(&pid("bob")).unwrap();
        s.lock_secret(&pid("alice")).unwrap();
        drain(&mut a);
        drain(&mut b);
        (s, a, b)
    }

    // =====================================================================
    // join / leave
    // =====================================================================

    #[test]
    fn test_join_broadcasts_roster_in_join_order() {
        let mut s = session();
        let mut a = seat(&mut s, "alice", 1);
        let mut b = seat(&mut s, "bob", 2);

        let roster = ServerEvent::Players {
            players: vec![pid("alice"), pid("bob")],
        };
        assert_eq!(drain(&mut a).last(), Some(&roster));
        assert_eq!(drain(&mut b), vec![roster]);
    }

    #[test]
    fn test_join_third_player_is_session_full() {
        let mut s = session();
        let _a = seat(&mut s, "alice", 1);
        let _b = seat(&mut s, "bob", 2);
        let err = s
            .join(pid("carol"), conn(3), mpsc::channel(8).0)
            .unwrap_err();
        assert_eq!(err, GameError::SessionFull(s.code().clone()));
        assert_eq!(s.players().len(), 2);
    }

    #[test]
    fn test_leave_broadcasts_remaining_roster() {
        let mut s = session();
        let mut a = seat(&mut s, "alice", 1);
        let _b = seat(&mut s, "bob", 2);
        drain(&mut a);

        let out = s.leave(&pid("bob"), conn(2));
        assert!(out.value);
        assert_eq!(out.fanout.delivered(), 1);
        assert_eq!(
            drain(&mut a),
            vec![ServerEvent::Players { players: vec![pid("alice")] }]
        );
    }

    #[test]
    fn test_leave_from_superseded_connection_is_noop() {
        let mut s = session();
        let _old = seat(&mut s, "alice", 1);
        let _new = seat(&mut s, "alice", 2);

        let out = s.leave(&pid("alice"), conn(1));
        assert!(!out.value);
        assert_eq!(s.players().len(), 1);
    }

    #[test]
    fn test_leave_last_player_empties_session() {
        let mut s = session();
        let _a = seat(&mut s, "alice", 1);
        s.leave(&pid("alice"), conn(1));
        assert!(s.is_empty());
    }

    #[test]
    fn test_leave_mid_game_returns_to_forming() {
        let (mut s, _a, _b) = active_session();
        s.leave(&pid("bob"), conn(2));
        assert_eq!(s.state(), SessionState::Forming);
        assert_eq!(s.turn(), None);
    }

    #[test]
    fn test_reconnect_preserves_state_and_catches_up() {
        let (mut s, _a, _b) = active_session();
        let mut fresh = seat(&mut s, "alice", 10);

        assert_eq!(s.state(), SessionState::Active);
        assert!(s.players().get(&pid("alice")).unwrap().is_locked());

        let events = drain(&mut fresh);
        assert_eq!(
            events.first(),
            Some(&ServerEvent::Players { players: vec![pid("alice"), pid("bob")] })
        );
        assert!(events.contains(&ServerEvent::PlayerUpdate {
            player: pid("bob"),
            locked: true
        }));
        assert_eq!(
            events.last(),
            Some(&ServerEvent::GameStart { turn: pid("alice") })
        );
    }

    #[test]
    fn test_reconnect_mid_game_receives_history() {
        let (mut s, _a, _b) = active_session();
        s.submit_guess(&pid("alice"), "5687").unwrap();
        let mut fresh = seat(&mut s, "bob", 20);

        match drain(&mut fresh).last() {
            Some(ServerEvent::GuessResult { entry, turn, history }) => {
                assert_eq!(entry.from, pid("alice"));
                assert_eq!(turn, &pid("bob"));
                assert_eq!(history.len(), 1);
            }
            other => panic!("expected guess result, got {other:?}"),
        }
    }

    #[test]
    fn test_reconnect_after_win_receives_game_over() {
        let (mut s, _a, _b) = active_session();
        s.submit_guess(&pid("alice"), "5678").unwrap();
        let mut fresh = seat(&mut s, "bob", 20);

        let events = drain(&mut fresh);
        assert!(!events.iter().any(|e| matches!(e, ServerEvent::GameStart { .. })));
        match events.last() {
            Some(ServerEvent::GameOver { winner, history, .. }) => {
                assert_eq!(winner, &pid("alice"));
                assert_eq!(history.len(), 1);
            }
            other => panic!("expected game over, got {other:?}"),
        }
    }

    #[test]
    fn test_stalled_player_is_cut_off() {
        let mut s = session();
        let (slow_tx, mut slow_rx) = mpsc::channel(1);
        s.join(pid("slow"), conn(1), slow_tx).unwrap();

        // slow's single slot already holds its own roster; the next
        // roster overflows it.
        let (live_tx, mut live) = mpsc::channel(8);
        let out = s.join(pid("live"), conn(2), live_tx).unwrap();
        assert_eq!(out.fanout.stalled().collect::<Vec<_>>(), vec![&pid("slow")]);
        assert!(s.players().get(&pid("slow")).unwrap().outbox().is_none());
        assert_eq!(
            drain(&mut live),
            vec![ServerEvent::Players {
                players: vec![pid("slow"), pid("live")]
            }]
        );

        // Later broadcasts skip it without failing.
        let out = s.set_secret(&pid("live"), "1234").unwrap();
        assert_eq!(out.fanout.dropped(), 1);
        assert_eq!(out.fanout.delivered(), 1);

        // What fit is still readable, then the queue reports closed.
        assert!(matches!(slow_rx.try_recv(), Ok(ServerEvent::Players { .. })));
        assert!(matches!(
            slow_rx.try_recv(),
            Err(mpsc::error::TryRecvError::Disconnected)
        ));

        // Still seated until its gateway leaves.
        assert_eq!(s.players().len(), 2);
        assert!(s.leave(&pid("slow"), conn(1)).value);
    }

    // =====================================================================
    // secrets and game start
    // =====================================================================

    #[test]
    fn test_set_secret_broadcasts_unlocked() {
        let mut s = session();
        let mut a = seat(&mut s, "alice", 1);
        let mut b = seat(&mut s, "bob", 2);
        drain(&mut a);
        drain(&mut b);

        s.set_secret(&pid("alice"), "1234").unwrap();
        let expected = ServerEvent::PlayerUpdate { player: pid("alice"), locked: false };
        assert_eq!(drain(&mut a), vec![expected.clone()]);
        assert_eq!(drain(&mut b), vec![expected]);
    }

    #[test]
    fn test_set_secret_invalid_sends_nothing() {
        let mut s = session();
        let mut a = seat(&mut s, "alice", 1);
        drain(&mut a);
        assert_eq!(s.set_secret(&pid("alice"), "12"), Err(GameError::InvalidSecret));
        assert!(drain(&mut a).is_empty());
    }

    #[test]
    fn test_lock_both_starts_game_with_earliest_joined() {
        let mut s = session();
        let mut a = seat(&mut s, "alice", 1);
        let _b = seat(&mut s, "bob", 2);
        s.set_secret(&pid("alice"), "1234").unwrap();
        s.set_secret(&pid("bob"), "5678").unwrap();

        // bob locks first, alice still gets the turn.
        assert_eq!(s.lock_secret(&pid("bob")).unwrap().value, None);
        assert_eq!(s.state(), SessionState::Forming);
        let started = s.lock_secret(&pid("alice")).unwrap();
        assert_eq!(started.value, Some(pid("alice")));
        assert_eq!(s.state(), SessionState::Active);

        assert_eq!(
            drain(&mut a).last(),
            Some(&ServerEvent::GameStart { turn: pid("alice") })
        );
    }

    #[test]
    fn test_lock_without_opponent_does_not_start() {
        let mut s = session();
        let _a = seat(&mut s, "alice", 1);
        s.set_secret(&pid("alice"), "1234").unwrap();
        assert_eq!(s.lock_secret(&pid("alice")).unwrap().value, None);
        assert_eq!(s.state(), SessionState::Forming);
    }

    #[test]
    fn test_relock_does_not_reassign_turn() {
        let (mut s, _a, _b) = active_session();
        s.submit_guess(&pid("alice"), "1357").unwrap();
        assert_eq!(s.turn(), Some(&pid("bob")));

        s.set_secret(&pid("alice"), "2345").unwrap();
        let relocked = s.lock_secret(&pid("alice")).unwrap();
        assert_eq!(relocked.value, Some(pid("bob")));
        assert_eq!(s.turn(), Some(&pid("bob")));
    }

    // =====================================================================
    // submit_guess
    // =====================================================================

    #[test]
    fn test_guess_while_forming_is_not_your_turn() {
        let mut s = session();
        let _a = seat(&mut s, "alice", 1);
        let _b = seat(&mut s, "bob", 2);
        assert_eq!(s.submit_guess(&pid("alice"), "1234"), Err(GameError::NotYourTurn));
    }

    #[test]
    fn test_guess_out_of_turn() {
        let (mut s, _a, _b) = active_session();
        assert_eq!(s.submit_guess(&pid("bob"), "1234"), Err(GameError::NotYourTurn));
    }

    #[test]
    fn test_guess_invalid_leaves_history() {
        let (mut s, _a, _b) = active_session();
        assert_eq!(s.submit_guess(&pid("alice"), "1123"), Err(GameError::InvalidGuess));
        assert!(s.history().is_empty());
        assert_eq!(s.turn(), Some(&pid("alice")));
    }

    #[test]
    fn test_turn_alternates() {
        let (mut s, mut a, mut b) = active_session();

        let first = s.submit_guess(&pid("alice"), "5687").unwrap();
        assert_eq!(first.value.score, Score { correct_digits: 4, correct_positions: 2 });
        assert_eq!(s.turn(), Some(&pid("bob")));

        s.submit_guess(&pid("bob"), "4321").unwrap();
        assert_eq!(s.turn(), Some(&pid("alice")));
        assert_eq!(s.history().len(), 2);

        let events = drain(&mut b);
        match events.as_slice() {
            [
                ServerEvent::GuessResult { turn: t1, .. },
                ServerEvent::GuessResult { turn: t2, history, .. },
            ] => {
                assert_eq!(t1, &pid("bob"));
                assert_eq!(t2, &pid("alice"));
                assert_eq!(history.len(), 2);
            }
            other => panic!("expected two guess results, got {other:?}"),
        }
        assert_eq!(drain(&mut a).len(), 2);
    }

    #[test]
    fn test_winning_guess_finishes_game() {
        let (mut s, mut a, _b) = active_session();
        let out = s.submit_guess(&pid("alice"), "5678").unwrap();
        assert!(out.value.score.is_win());
        assert_eq!(out.fanout.delivered(), 2);

        assert_eq!(s.state(), SessionState::Finished);
        assert_eq!(s.winner(), Some(&pid("alice")));
        assert_eq!(s.turn(), None);

        match drain(&mut a).as_slice() {
            [ServerEvent::GameOver { winner, entry, history }] => {
                assert_eq!(winner, &pid("alice"));
                assert_eq!(entry.correct_positions, 4);
                assert_eq!(history.len(), 1);
            }
            other => panic!("expected game over, got {other:?}"),
        }
    }

    #[test]
    fn test_guess_after_win_is_game_over_for_both() {
        let (mut s, _a, _b) = active_session();
        s.submit_guess(&pid("alice"), "5678").unwrap();

        for who in ["alice", "bob"] {
            assert_eq!(
                s.submit_guess(&pid(who), "1234"),
                Err(GameError::GameOver(pid("alice")))
            );
        }
        assert_eq!(s.history().len(), 1);
        assert_eq!(s.turn(), None);
    }

    #[test]
    fn test_lock_after_win_does_not_restart() {
        let (mut s, _a, _b) = active_session();
        s.submit_guess(&pid("alice"), "5678").unwrap();
        assert_eq!(s.lock_secret(&pid("bob")).unwrap().value, None);
        assert_eq!(s.state(), SessionState::Finished);
    }

    #[test]
    fn test_guess_opponent_not_ready() {
        // Reach Active, then the opponent leaves and a newcomer without a
        // secret sits down while the turn is (artificially) still held.
        let (mut s, _a, _b) = active_session();
        s.leave(&pid("bob"), conn(2));
        let _c = seat(&mut s, "carol", 3);
        s.turn = Some(pid("alice"));
        assert_eq!(
            s.submit_guess(&pid("alice"), "1234"),
            Err(GameError::OpponentNotReady)
        );
    }

    #[test]
    fn test_guess_no_opponent() {
        let (mut s, _a, _b) = active_session();
        s.leave(&pid("bob"), conn(2));
        s.turn = Some(pid("alice"));
        assert_eq!(s.submit_guess(&pid("alice"), "1234"), Err(GameError::NoOpponent));
    }

    #[test]
    fn test_opponent_of_too_many_players() {
        let config = SessionConfig {
            max_players: 3,
            ..SessionConfig::default()
        };
        let mut s = Session::new(SessionCode::parse("BIG").unwrap(), &config);
        let _a = seat(&mut s, "alice", 1);
        let _b = seat(&mut s, "bob", 2);
        let _c = seat(&mut s, "carol", 3);
        assert!(matches!(
            s.opponent_of(&pid("alice")),
            Err(GameError::TooManyPlayers)
        ));
    }

    #[test]
    fn test_move_record_fields() {
        let (mut s, _a, _b) = active_session();
        let mv = s.submit_guess(&pid("alice"), "8765").unwrap().value;
        let record = mv.to_record();
        assert_eq!(record.from, pid("alice"));
        assert_eq!(record.guess, "8765");
        assert_eq!(record.correct_digits, 4);
        assert_eq!(record.correct_positions, 0);
    }
}
