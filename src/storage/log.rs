//! The persistence contract for the ledger and its key-value implementation.

use serde::Deserialize;

use crate::{
    Error,
    database_id::TransactionId,
    storage::key_value::KeyValueStore,
    transaction::{Category, NewTransaction, Transaction},
};

/// The key the whole transaction sequence is stored under.
pub const TRANSACTIONS_KEY: &str = "transactions";
/// The key the next unused transaction ID is stored under.
pub const NEXT_ID_KEY: &str = "transactions.next_id";

/// Durable storage for the ledger's transactions.
///
/// Implementations keep transactions in append order and assign IDs that are
/// never reused.
pub trait TransactionLog: Send {
    /// Read every stored transaction in append order.
    ///
    /// # Errors
    /// Returns an error if the storage cannot be read or the stored data is corrupt.
    fn load_all(&mut self) -> Result<Vec<Transaction>, Error>;

    /// Persist `new` at the end of the log and return it with its assigned ID.
    ///
    /// # Errors
    /// Returns an error if the storage cannot be written.
    fn append(&mut self, new: NewTransaction) -> Result<Transaction, Error>;

    /// Remove the transaction with `id` from the log.
    ///
    /// # Errors
    /// Returns [Error::DeleteMissingTransaction] if no transaction has `id`,
    /// or another error if the storage cannot be written.
    fn remove(&mut self, id: TransactionId) -> Result<(), Error>;
}

/// A [TransactionLog] that rewrites the whole sequence as one JSON array under
/// [TRANSACTIONS_KEY] on every change.
#[derive(Debug)]
pub struct KeyValueTransactionLog<S> {
    store: S,
}

/// A transaction as it appears in the stored JSON.
///
/// Entries written before IDs existed have no `id` and use `desc` for the
/// description.
#[derive(Debug, Deserialize)]
struct StoredTransaction {
    #[serde(default)]
    id: Option<TransactionId>,
    #[serde(alias = "desc")]
    description: String,
    amount: f64,
    category: Category,
    #[serde(default)]
    date: String,
}

/// The decoded contents of the store.
struct Snapshot {
    transactions: Vec<Transaction>,
    next_id: TransactionId,
    /// Whether any entry needed an ID assigned while decoding.
    migrated: bool,
}

impl<S: KeyValueStore> KeyValueTransactionLog<S> {
    /// Create a log that persists to `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    fn read(&self) -> Result<Snapshot, Error> {
        let stored: Vec<StoredTransaction> = match self.store.get(TRANSACTIONS_KEY)? {
            Some(json) => serde_json::from_str::<Option<Vec<StoredTransaction>>>(&json)
                .map_err(|error| Error::CorruptStore(error.to_string()))?
                .unwrap_or_default(),
            None => Vec::new(),
        };

        let stored_next_id = self
            .store
            .get(NEXT_ID_KEY)?
            .and_then(|value| value.trim().parse::<TransactionId>().ok());

        Ok(assign_missing_ids(stored, stored_next_id))
    }

    fn write(&mut self, transactions: &[Transaction], next_id: TransactionId) -> Result<(), Error> {
        let json = serde_json::to_string(transactions)
            .map_err(|error| Error::JSONSerializationError(error.to_string()))?;

        // The next ID goes first: if the sequence then fails to save, the
        // store only skips an ID instead of holding a transaction the ledger
        // never saw.
        self.store.set(NEXT_ID_KEY, &next_id.to_string())?;
        self.store.set(TRANSACTIONS_KEY, &json)
    }
}

impl<S: KeyValueStore + Send> TransactionLog for KeyValueTransactionLog<S> {
    fn load_all(&mut self) -> Result<Vec<Transaction>, Error> {
        let snapshot = self.read()?;

        if snapshot.migrated {
            tracing::info!(
                "assigned IDs to stored transactions that did not have one, next ID is {}",
                snapshot.next_id
            );
            self.write(&snapshot.transactions, snapshot.next_id)?;
        }

        Ok(snapshot.transactions)
    }

    fn append(&mut self, new: NewTransaction) -> Result<Transaction, Error> {
        let Snapshot {
            mut transactions,
            next_id,
            ..
        } = self.read()?;

        let transaction = new.into_transaction(next_id);
        transactions.push(transaction.clone());
        self.write(&transactions, next_id + 1)?;

        Ok(transaction)
    }

    fn remove(&mut self, id: TransactionId) -> Result<(), Error> {
        let Snapshot {
            mut transactions,
            next_id,
            ..
        } = self.read()?;

        let position = transactions
            .iter()
            .position(|transaction| transaction.id == id)
            .ok_or(Error::DeleteMissingTransaction)?;
        transactions.remove(position);

        self.write(&transactions, next_id)
    }
}

/// Give entries without an ID the next free IDs, in stored order.
///
/// The returned next ID is always greater than every ID in the sequence.
fn assign_missing_ids(
    stored: Vec<StoredTransaction>,
    stored_next_id: Option<TransactionId>,
) -> Snapshot {
    let max_id = stored.iter().filter_map(|entry| entry.id).max().unwrap_or(0);
    let mut next_id = stored_next_id.unwrap_or(1).max(max_id + 1);
    let mut migrated = false;

    let transactions = stored
        .into_iter()
        .map(|entry| {
            let id = entry.id.unwrap_or_else(|| {
                migrated = true;
                next_id += 1;
                next_id - 1
            });

            Transaction {
                id,
                description: entry.description,
                amount: entry.amount,
                category: entry.category,
                date: entry.date,
            }
        })
        .collect();

    Snapshot {
        transactions,
        next_id,
        migrated,
    }
}
