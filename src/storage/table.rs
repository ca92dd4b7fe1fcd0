//! A [TransactionLog] that stores one row per transaction.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    database_id::TransactionId,
    storage::log::TransactionLog,
    transaction::{Category, NewTransaction, Transaction},
};

/// Stores transactions in the `"transaction"` table of a SQLite database.
///
/// Appending and removing touch a single row, unlike
/// [KeyValueTransactionLog](crate::storage::KeyValueTransactionLog).
#[derive(Debug)]
pub struct SqliteTransactionLog {
    connection: Connection,
}

impl SqliteTransactionLog {
    /// Create a log on `connection`, adding the transaction table if needed.
    ///
    /// # Errors
    /// Returns an error if the table cannot be created.
    pub fn new(connection: Connection) -> Result<Self, Error> {
        create_transaction_table(&connection)?;

        Ok(Self { connection })
    }
}

impl TransactionLog for SqliteTransactionLog {
    fn load_all(&mut self) -> Result<Vec<Transaction>, Error> {
        let mut statement = self.connection.prepare(
            "SELECT id, description, amount, category, date FROM \"transaction\" ORDER BY id",
        )?;

        let transactions = statement
            .query_map([], map_transaction_row)?
            .map(|row| row.map_err(Error::from))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(transactions)
    }

    fn append(&mut self, new: NewTransaction) -> Result<Transaction, Error> {
        let transaction = self
            .connection
            .prepare(
                "INSERT INTO \"transaction\" (description, amount, category, date)
                 VALUES (?1, ?2, ?3, ?4)
                 RETURNING id, description, amount, category, date",
            )?
            .query_row(
                (
                    new.description(),
                    new.amount(),
                    new.category().as_str(),
                    new.date(),
                ),
                map_transaction_row,
            )?;

        Ok(transaction)
    }

    fn remove(&mut self, id: TransactionId) -> Result<(), Error> {
        let rows_affected = self.connection.execute(
            "DELETE FROM \"transaction\" WHERE id = :id",
            &[(":id", &id)],
        )?;

        match rows_affected {
            0 => Err(Error::DeleteMissingTransaction),
            _ => Ok(()),
        }
    }
}

/// Create the transaction table in the database.
///
/// `AUTOINCREMENT` keeps IDs of deleted transactions from being reused.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                description TEXT NOT NULL,
                amount REAL NOT NULL,
                category TEXT NOT NULL,
                date TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let description = row.get(1)?;
    let amount = row.get(2)?;
    let category: String = row.get(3)?;
    let date = row.get(4)?;

    Ok(Transaction {
        id,
        description,
        amount,
        category: Category::from(category),
        date,
    })
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        storage::{log::TransactionLog, table::SqliteTransactionLog},
        transaction::{Category, NewTransaction},
    };

    fn get_test_log() -> SqliteTransactionLog {
        SqliteTransactionLog::new(Connection::open_in_memory().unwrap()).unwrap()
    }

    fn new_transaction(description: &str, amount: f64, category: Category) -> NewTransaction {
        NewTransaction::new(description, amount, category, "2024-01-15").unwrap()
    }

    #[test]
    fn append_returns_transaction_with_id() {
        let mut log = get_test_log();

        let transaction = log
            .append(new_transaction("Salary", 50000.0, Category::Income))
            .unwrap();

        assert_eq!(transaction.id, 1);
        assert_eq!(transaction.description, "Salary");
        assert_eq!(transaction.category, Category::Income);
        assert_eq!(transaction.date, "2024-01-15");
    }

    #[test]
    fn load_all_returns_append_order() {
        let mut log = get_test_log();
        for (description, amount) in [("Rent", 12000.0), ("Salary", 50000.0), ("Food", 300.0)] {
            log.append(new_transaction(description, amount, Category::Expense))
                .unwrap();
        }

        let descriptions: Vec<String> = log
            .load_all()
            .unwrap()
            .into_iter()
            .map(|transaction| transaction.description)
            .collect();

        assert_eq!(descriptions, vec!["Rent", "Salary", "Food"]);
    }

    #[test]
    fn remove_deletes_only_that_row() {
        let mut log = get_test_log();
        let rent = log
            .append(new_transaction("Rent", 12000.0, Category::Expense))
            .unwrap();
        let food = log
            .append(new_transaction("Food", 300.0, Category::Expense))
            .unwrap();

        log.remove(rent.id).unwrap();

        assert_eq!(log.load_all().unwrap(), vec![food]);
    }

    #[test]
    fn remove_missing_id_fails() {
        let mut log = get_test_log();

        assert_eq!(log.remove(42), Err(Error::DeleteMissingTransaction));
    }

    #[test]
    fn ids_are_not_reused() {
        let mut log = get_test_log();
        log.append(new_transaction("Rent", 12000.0, Category::Expense))
            .unwrap();
        let food = log
            .append(new_transaction("Food", 300.0, Category::Expense))
            .unwrap();
        log.remove(food.id).unwrap();

        let bus = log
            .append(new_transaction("Bus", 2.5, Category::Expense))
            .unwrap();

        assert_eq!(bus.id, 3);
    }

    #[test]
    fn reopened_log_keeps_rows_and_id_sequence() {
        let mut log = get_test_log();
        let rent = log
            .append(new_transaction("Rent", 12000.0, Category::Expense))
            .unwrap();
        let food = log
            .append(new_transaction("Food", 300.0, Category::Expense))
            .unwrap();
        log.remove(food.id).unwrap();

        let mut reopened = SqliteTransactionLog::new(log.connection).unwrap();
        let bus = reopened
            .append(new_transaction("Bus", 2.5, Category::Expense))
            .unwrap();

        assert_eq!(reopened.load_all().unwrap(), vec![rent, bus.clone()]);
        assert_eq!(bus.id, 3);
    }
}
