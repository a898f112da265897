//! Contains the [`Session`], the explicitly owned library state that
//! databases are created from.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use log::{debug, info};

use crate::{
    config::Config,
    database::Database,
    frontend::{Frontend, RonFrontend},
};

/// The number of live session states in the process.
static ACTIVE_SESSIONS: AtomicUsize = AtomicUsize::new(0);

#[derive(Debug)]
struct State {
    config: Config,
}

impl State {
    fn new(config: Config) -> Self {
        if ACTIVE_SESSIONS.fetch_add(1, Ordering::SeqCst) == 0 {
            info!("eolian library initialized");
        }

        Self { config }
    }
}

impl Drop for State {
    fn drop(&mut self) {
        if ACTIVE_SESSIONS.fetch_sub(1, Ordering::SeqCst) == 1 {
            info!("eolian library shut down");
        }
    }
}

/// The library state shared by the databases created from it.
///
/// Cloning a session shares the state; the state is released when the last
/// clone and the last database created from it are dropped. Independent
/// sessions may coexist.
#[derive(Debug, Clone)]
pub struct Session {
    state: Arc<State>,
}

impl Session {
    /// Creates a new session with the given configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        debug!("creating session with {config:?}");

        Self { state: Arc::new(State::new(config)) }
    }

    /// Returns the configuration of the session.
    #[must_use]
    pub fn config(&self) -> &Config { &self.state.config }

    /// Creates an empty database that reads files with the [`RonFrontend`].
    #[must_use]
    pub fn database(&self) -> Database {
        self.database_with_frontend(RonFrontend)
    }

    /// Creates an empty database that reads files with `frontend`.
    #[must_use]
    pub fn database_with_frontend(
        &self,
        frontend: impl Frontend + 'static,
    ) -> Database {
        Database::new(self.clone(), Box::new(frontend))
    }

    /// Returns the number of session states alive in the process.
    #[must_use]
    pub fn active_count() -> usize { ACTIVE_SESSIONS.load(Ordering::SeqCst) }
}

impl Default for Session {
    fn default() -> Self { Self::new(Config::default()) }
}
