// Coach session: owns the roster board and writes it through after every change.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::board::RosterBoard;
use crate::drag::{reconcile, DragOutcome, DragSource};
use crate::persist::{self, StateStore};
use crate::player::Player;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session is already initialized")]
    AlreadyInitialized,

    #[error("session is not initialized")]
    NotInitialized,

    #[error("roster storage failed: {0:#}")]
    Storage(anyhow::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Uninitialized,
    Initialized,
}

pub struct Session {
    store: Arc<dyn StateStore + Send + Sync>,
    board: RosterBoard,
    lifecycle: Lifecycle,
}

impl Session {
    pub fn new(store: Arc<dyn StateStore + Send + Sync>) -> Self {
        Session {
            store,
            board: RosterBoard::new(),
            lifecycle: Lifecycle::Uninitialized,
        }
    }

    /// Load the persisted board. Must be called exactly once before any
    /// mutation.
    pub fn initialize(&mut self) -> Result<(), SessionError> {
        if self.lifecycle == Lifecycle::Initialized {
            warn!("ignoring repeated session initialization");
            return Err(SessionError::AlreadyInitialized);
        }
        self.board = persist::load(self.store.as_ref()).map_err(SessionError::Storage)?;
        self.lifecycle = Lifecycle::Initialized;
        info!(
            "session initialized: {} on team, {} potential",
            self.board.team_size(),
            self.board.potential_size()
        );
        Ok(())
    }

    pub fn board(&self) -> &RosterBoard {
        &self.board
    }

    /// Run a board mutation and persist the result.
    pub fn apply<F>(&mut self, mutate: F) -> Result<(), SessionError>
    where
        F: FnOnce(&mut RosterBoard),
    {
        self.ensure_initialized()?;
        mutate(&mut self.board);
        self.persist()
    }

    /// Finish a drag gesture. Persists only when the board changed.
    pub fn drop_player(
        &mut self,
        players: &[Player],
        source: &DragSource,
        target: Option<&str>,
    ) -> Result<DragOutcome, SessionError> {
        self.ensure_initialized()?;
        let outcome = reconcile(&mut self.board, players, source, target);
        if outcome.changed() {
            self.persist()?;
        }
        Ok(outcome)
    }

    /// Empty the team and potential lists.
    pub fn reset(&mut self) -> Result<(), SessionError> {
        self.apply(RosterBoard::clear)?;
        info!("roster reset");
        Ok(())
    }

    fn ensure_initialized(&self) -> Result<(), SessionError> {
        match self.lifecycle {
            Lifecycle::Initialized => Ok(()),
            Lifecycle::Uninitialized => Err(SessionError::NotInitialized),
        }
    }

    fn persist(&self) -> Result<(), SessionError> {
        persist::save(&self.board, self.store.as_ref()).map_err(SessionError::Storage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::{MemoryStore, SELECTED_TEAM_KEY};
    use crate::position::Position;

    struct BrokenStore;

    impl StateStore for BrokenStore {
        fn read(&self, _key: &str) -> anyhow::Result<Option<String>> {
            Ok(None)
        }
        fn write(&self, _key: &str, _value: &str) -> anyhow::Result<()> {
            anyhow::bail!("disk full")
        }
    }

    fn session() -> (Arc<MemoryStore>, Session) {
        let store = Arc::new(MemoryStore::new());
        let session = Session::new(store.clone());
        (store, session)
    }

    #[test]
    fn mutations_rejected_before_initialize() {
        let (_, mut s) = session();
        let err = s
            .apply(|b| b.assign_to_position(&Player::named("A"), Position::Midt))
            .unwrap_err();
        assert!(matches!(err, SessionError::NotInitialized));
        assert!(s.board().is_empty());
    }

    #[test]
    fn second_initialize_is_an_error() {
        let (_, mut s) = session();
        s.initialize().unwrap();
        assert!(matches!(
            s.initialize(),
            Err(SessionError::AlreadyInitialized)
        ));
    }

    #[test]
    fn initialize_restores_saved_board() {
        let store = Arc::new(MemoryStore::new());
        store.write(SELECTED_TEAM_KEY, r#"{"Dia":["Per"]}"#).unwrap();
        let mut s = Session::new(store);
        s.initialize().unwrap();
        assert_eq!(s.board().team(Position::Dia), vec!["Per"]);
    }

    #[test]
    fn apply_writes_through() {
        let (store, mut s) = session();
        s.initialize().unwrap();
        s.apply(|b| b.assign_to_position(&Player::named("A"), Position::Midt))
            .unwrap();
        let raw = store.read(SELECTED_TEAM_KEY).unwrap().unwrap();
        assert!(raw.contains("\"A\""));
    }

    #[test]
    fn drop_player_persists_only_on_change() {
        let (store, mut s) = session();
        s.initialize().unwrap();
        let players = vec![Player::named("A")];

        let ignored = s
            .drop_player(&players, &DragSource::Available("A".into()), None)
            .unwrap();
        assert!(!ignored.changed());
        assert!(store.read(SELECTED_TEAM_KEY).unwrap().is_none());

        let applied = s
            .drop_player(
                &players,
                &DragSource::Available("A".into()),
                Some("position:Kant"),
            )
            .unwrap();
        assert!(applied.changed());
        assert!(store.read(SELECTED_TEAM_KEY).unwrap().is_some());
    }

    #[test]
    fn reset_clears_and_persists() {
        let (store, mut s) = session();
        s.initialize().unwrap();
        s.apply(|b| b.assign_to_position(&Player::named("A"), Position::Midt))
            .unwrap();
        s.reset().unwrap();
        assert!(s.board().is_empty());

        let mut reloaded = Session::new(store);
        reloaded.initialize().unwrap();
        assert!(reloaded.board().is_empty());
    }

    #[test]
    fn storage_failure_surfaces_as_error() {
        let mut s = Session::new(Arc::new(BrokenStore));
        s.initialize().unwrap();
        let err = s
            .apply(|b| b.assign_to_position(&Player::named("A"), Position::Midt))
            .unwrap_err();
        assert!(err.to_string().contains("disk full"));
    }
}
