//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::{Error, ledger::Ledger, storage::TransactionLog, tracker::Counters};

/// The ledger together with the counter targets last sent to the browser.
///
/// Both live behind one lock so that a mutation and the counter transition
/// it triggers are never interleaved with another request.
#[derive(Debug)]
pub struct TrackerSession {
    /// The transactions and the log they are persisted to.
    pub ledger: Ledger,
    /// Where each counter's next transition starts.
    ///
    /// There is one set of targets per server process, shared by every
    /// browser tab. A full page load in any tab resets them, so the next
    /// update in another tab animates from zero.
    pub counters: Counters,
}

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The ledger and counters, shared by every request.
    pub session: Arc<Mutex<TrackerSession>>,

    /// The symbol shown before every amount, e.g. "₹".
    pub currency_symbol: String,

    /// The local timezone as a canonical timezone name, e.g. "Asia/Kolkata".
    pub local_timezone: String,
}

impl AppState {
    /// Create a new [AppState] by loading every transaction from `log`.
    ///
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Asia/Kolkata".
    ///
    /// # Errors
    /// Returns an error if the transactions cannot be loaded from `log`.
    pub fn new(
        log: Box<dyn TransactionLog>,
        currency_symbol: &str,
        local_timezone: &str,
    ) -> Result<Self, Error> {
        let ledger = Ledger::open(log)?;

        Ok(Self {
            session: Arc::new(Mutex::new(TrackerSession {
                ledger,
                counters: Counters::new(),
            })),
            currency_symbol: currency_symbol.to_owned(),
            local_timezone: local_timezone.to_owned(),
        })
    }
}

/// Acquire the session lock, mapping a poisoned lock to [Error::LedgerLockError].
pub(crate) fn lock_session(
    session: &Mutex<TrackerSession>,
) -> Result<MutexGuard<'_, TrackerSession>, Error> {
    session
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire ledger lock: {error}"))
        .map_err(|_| Error::LedgerLockError)
}
