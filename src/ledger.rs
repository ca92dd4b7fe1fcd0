//! The ledger: the ordered transaction sequence and the log it writes through to.

use std::fmt;

use crate::{
    Error,
    database_id::TransactionId,
    storage::TransactionLog,
    transaction::{NewTransaction, Transaction},
};

/// Owns the transactions in append order and keeps the log in sync with them.
///
/// The whole sequence is read from the log once in [Ledger::open]. After that
/// the in-memory copy is the source of truth and every mutation is written to
/// the log before it is applied in memory, so a failed write changes nothing.
pub struct Ledger {
    transactions: Vec<Transaction>,
    log: Box<dyn TransactionLog>,
}

impl Ledger {
    /// Load every transaction from `log`.
    ///
    /// # Errors
    /// Returns an error if the log cannot be read.
    pub fn open(mut log: Box<dyn TransactionLog>) -> Result<Self, Error> {
        let transactions = log
            .load_all()
            .inspect_err(|error| tracing::error!("could not load transactions: {error}"))?;

        tracing::info!("loaded {} transactions", transactions.len());

        Ok(Self { transactions, log })
    }

    /// All transactions in append order.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// The number of transactions.
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    /// Whether the ledger has no transactions.
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// The true position of the transaction with `id`, i.e. its index in the
    /// unfiltered, unsorted sequence.
    pub fn position_of(&self, id: TransactionId) -> Option<usize> {
        self.transactions
            .iter()
            .position(|transaction| transaction.id == id)
    }

    /// Append `new` to the ledger and persist it.
    ///
    /// # Errors
    /// Returns an error if the transaction cannot be persisted, in which case
    /// the ledger is unchanged.
    pub fn add(&mut self, new: NewTransaction) -> Result<&Transaction, Error> {
        let transaction = self
            .log
            .append(new)
            .inspect_err(|error| tracing::error!("could not persist transaction: {error}"))?;

        tracing::debug!("added transaction {}", transaction.id);

        let position = self.transactions.len();
        self.transactions.push(transaction);

        Ok(&self.transactions[position])
    }

    /// Remove the transaction with `id`.
    ///
    /// # Errors
    /// Returns [Error::DeleteMissingTransaction] if no transaction has `id`,
    /// or another error if the removal cannot be persisted.
    pub fn delete(&mut self, id: TransactionId) -> Result<Transaction, Error> {
        let position = self
            .position_of(id)
            .ok_or(Error::DeleteMissingTransaction)?;

        self.remove_at(position)
    }

    /// Remove the transaction at the true `position`.
    ///
    /// # Errors
    /// Returns [Error::DeleteMissingTransaction] if `position` is out of range,
    /// or another error if the removal cannot be persisted.
    pub fn delete_at(&mut self, position: usize) -> Result<Transaction, Error> {
        if position >= self.transactions.len() {
            tracing::warn!(
                "tried to delete position {position} of a ledger with {} transactions",
                self.transactions.len()
            );
            return Err(Error::DeleteMissingTransaction);
        }

        self.remove_at(position)
    }

    fn remove_at(&mut self, position: usize) -> Result<Transaction, Error> {
        let id = self.transactions[position].id;

        self.log
            .remove(id)
            .inspect_err(|error| tracing::error!("could not remove transaction {id}: {error}"))?;

        tracing::debug!("deleted transaction {id}");

        Ok(self.transactions.remove(position))
    }
}

impl fmt::Debug for Ledger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ledger")
            .field("transactions", &self.transactions.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        ledger::Ledger,
        storage::{
            KeyValueStore, KeyValueTransactionLog, MemoryKeyValueStore, NEXT_ID_KEY,
            SqliteTransactionLog, TRANSACTIONS_KEY,
        },
        transaction::{Category, NewTransaction, Transaction},
    };

    fn get_test_ledger() -> (Ledger, MemoryKeyValueStore) {
        let store = MemoryKeyValueStore::new();
        let ledger = Ledger::open(Box::new(KeyValueTransactionLog::new(store.clone()))).unwrap();

        (ledger, store)
    }

    fn add(ledger: &mut Ledger, description: &str, amount: f64, category: Category) -> Transaction {
        let new = NewTransaction::new(description, amount, category, "2024-01-15").unwrap();
        ledger.add(new).unwrap().clone()
    }

    fn stored_descriptions(store: &MemoryKeyValueStore) -> Vec<String> {
        let json = store.get(TRANSACTIONS_KEY).unwrap().unwrap_or_default();
        let stored: Vec<Transaction> = serde_json::from_str(&json).unwrap_or_default();

        stored.into_iter().map(|t| t.description).collect()
    }

    /// A store that refuses every write to one key.
    #[derive(Debug)]
    struct RejectingStore {
        values: MemoryKeyValueStore,
        rejected_key: &'static str,
    }

    impl KeyValueStore for RejectingStore {
        fn get(&self, key: &str) -> Result<Option<String>, Error> {
            self.values.get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), Error> {
            if key == self.rejected_key {
                return Err(Error::SqlError(rusqlite::Error::InvalidQuery));
            }

            self.values.set(key, value)
        }
    }

    fn get_rejecting_ledger(rejected_key: &'static str) -> (Ledger, MemoryKeyValueStore) {
        let values = MemoryKeyValueStore::new();
        let store = RejectingStore {
            values: values.clone(),
            rejected_key,
        };
        let ledger = Ledger::open(Box::new(KeyValueTransactionLog::new(store))).unwrap();

        (ledger, values)
    }

    #[test]
    fn failed_next_id_write_persists_nothing() {
        let (mut ledger, values) = get_rejecting_ledger(NEXT_ID_KEY);
        let new = NewTransaction::new("Rent", 12000.0, Category::Expense, "2024-01-05").unwrap();

        assert!(ledger.add(new).is_err());

        assert_eq!(ledger.len(), 0);
        assert_eq!(values.get(TRANSACTIONS_KEY).unwrap(), None);
    }

    #[test]
    fn failed_sequence_write_leaves_store_matching_ledger() {
        let (mut ledger, values) = get_rejecting_ledger(TRANSACTIONS_KEY);
        let new = NewTransaction::new("Rent", 12000.0, Category::Expense, "2024-01-05").unwrap();

        assert!(ledger.add(new).is_err());

        assert_eq!(ledger.len(), 0);
        assert_eq!(values.get(TRANSACTIONS_KEY).unwrap(), None);
        let mut reopened = Ledger::open(Box::new(KeyValueTransactionLog::new(values))).unwrap();
        let food = add(&mut reopened, "Food", 300.0, Category::Expense);
        assert_eq!(reopened.len(), 1);
        assert_eq!(food.id, 2);
    }

    #[test]
    fn add_appends_one_and_persists() {
        let (mut ledger, store) = get_test_ledger();
        add(&mut ledger, "Salary", 50000.0, Category::Income);

        add(&mut ledger, "Rent", 12000.0, Category::Expense);

        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.transactions()[1].description, "Rent");
        assert_eq!(stored_descriptions(&store), vec!["Salary", "Rent"]);
    }

    #[test]
    fn delete_removes_exactly_that_transaction() {
        let (mut ledger, store) = get_test_ledger();
        let salary = add(&mut ledger, "Salary", 50000.0, Category::Income);
        let rent = add(&mut ledger, "Rent", 12000.0, Category::Expense);
        let food = add(&mut ledger, "Food", 300.0, Category::Expense);

        let deleted = ledger.delete(rent.id).unwrap();

        assert_eq!(deleted, rent);
        assert_eq!(ledger.transactions(), &[salary, food]);
        assert_eq!(stored_descriptions(&store), vec!["Salary", "Food"]);
    }

    #[test]
    fn delete_at_uses_true_position() {
        let (mut ledger, _) = get_test_ledger();
        add(&mut ledger, "Salary", 50000.0, Category::Income);
        let rent = add(&mut ledger, "Rent", 12000.0, Category::Expense);
        add(&mut ledger, "Food", 300.0, Category::Expense);

        let position = ledger.position_of(rent.id).unwrap();
        let deleted = ledger.delete_at(position).unwrap();

        assert_eq!(position, 1);
        assert_eq!(deleted.id, rent.id);
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.position_of(rent.id), None);
    }

    #[test]
    fn delete_out_of_range_is_rejected() {
        let (mut ledger, store) = get_test_ledger();
        add(&mut ledger, "Salary", 50000.0, Category::Income);

        assert_eq!(ledger.delete_at(1), Err(Error::DeleteMissingTransaction));
        assert_eq!(ledger.delete(42), Err(Error::DeleteMissingTransaction));
        assert_eq!(ledger.len(), 1);
        assert_eq!(stored_descriptions(&store), vec!["Salary"]);
    }

    #[test]
    fn positions_shift_but_ids_do_not() {
        let (mut ledger, _) = get_test_ledger();
        let salary = add(&mut ledger, "Salary", 50000.0, Category::Income);
        let rent = add(&mut ledger, "Rent", 12000.0, Category::Expense);

        ledger.delete(salary.id).unwrap();

        assert_eq!(ledger.position_of(rent.id), Some(0));
        assert_eq!(ledger.transactions()[0].id, rent.id);
    }

    #[test]
    fn reopening_key_value_ledger_restores_transactions() {
        let store = MemoryKeyValueStore::new();
        let mut ledger =
            Ledger::open(Box::new(KeyValueTransactionLog::new(store.clone()))).unwrap();
        let salary = add(&mut ledger, "Salary", 50000.0, Category::Income);
        drop(ledger);

        let mut reopened = Ledger::open(Box::new(KeyValueTransactionLog::new(store))).unwrap();
        let rent = add(&mut reopened, "Rent", 12000.0, Category::Expense);

        assert_eq!(reopened.transactions()[0], salary);
        assert!(rent.id > salary.id);
    }

    #[test]
    fn table_ledger_adds_and_deletes() {
        let log = SqliteTransactionLog::new(Connection::open_in_memory().unwrap()).unwrap();
        let mut ledger = Ledger::open(Box::new(log)).unwrap();
        let salary = add(&mut ledger, "Salary", 50000.0, Category::Income);
        let rent = add(&mut ledger, "Rent", 12000.0, Category::Expense);

        ledger.delete(salary.id).unwrap();

        assert_eq!(ledger.transactions(), &[rent]);
    }
}
