//! Table service: the public operations of a jadb database
//!
//! [`Database`] composes a [`TableStorage`] backend, a [`TableLockManager`]
//! and the query engine into table-level operations.
//!
//! ## Mutating Operations
//!
//! `truncate`, `insert`, `update`, `delete` and `delete_related` each run one
//! locked cycle on their table:
//!
//! 1. acquire the table lock (poll-and-retry per the lock policy)
//! 2. load the whole document
//! 3. mutate it in memory
//! 4. stamp the document's `modified` time and save the whole document
//! 5. release the lock (guard drop, on every exit path)
//!
//! A failure anywhere in the cycle leaves the stored document as it was. The
//! error is logged with the operation name, table and arguments, then
//! returned wrapped in [`Error::Operation`].
//!
//! ## Reads
//!
//! `all`, `find`, `filter` and `select` never take the lock. They wait until
//! no writer has the table checked out, then read a fresh snapshot.
//!
//! ## Relations
//!
//! `delete_related` releases the owning table before maintaining dependent
//! tables. Each relation is its own locked cycle on its own table; they run
//! concurrently and all finish before the call returns. Failures are reported
//! per relation and nothing is rolled back.

pub mod config;

pub use config::{JadbConfig, CONFIG_FILE_NAME};

use crate::query::{matches, pipeline};
use crate::relations::{self, RelationOutcome, RelationReport};
use jadb_concurrency::{shared_lock_manager, TableLockManager};
use jadb_core::error::{Error, Result};
use jadb_core::query::{Query, WhereClause};
use jadb_core::record::{timestamp, Record, TableDocument};
use jadb_core::relation::{relation_value, Relation};
use jadb_core::traits::TableStorage;
use jadb_storage::{FileStorage, MemoryStorage};
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::thread;
use tracing::{debug, error, info};

/// Arguments of a failed call, rendered for error messages
fn describe<T: Serialize + ?Sized>(args: &T) -> String {
    serde_json::to_string(args).unwrap_or_else(|e| format!("<unprintable: {}>", e))
}

/// Handle to a set of tables
///
/// Cheap to clone; clones share storage and locks. `Database` is
/// `Send + Sync`, so one handle can serve many threads.
///
/// # Example
///
/// ```
/// use jadb_engine::{Database, Record, WhereClause, Condition};
///
/// let db = Database::in_memory();
/// db.create("colors", true)?;
/// let inserted = db.insert("colors", vec![Record::new().with("color", "green")])?;
/// assert_eq!(inserted[0].id(), Some(1));
///
/// let removed = db.delete("colors", &WhereClause::from(Condition::equals("color", "green")))?;
/// assert_eq!(removed, 1);
/// # Ok::<(), jadb_engine::Error>(())
/// ```
#[derive(Clone)]
pub struct Database {
    storage: Arc<dyn TableStorage>,
    locks: Arc<TableLockManager>,
}

impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database")
            .field("locked_tables", &self.locks.locked_tables())
            .field("lock_policy", &self.locks.policy())
            .finish_non_exhaustive()
    }
}

impl Database {
    // ========================================================================
    // Construction
    // ========================================================================

    /// Open the file-backed database described by `config`
    ///
    /// Creates the data directory if needed. Handles opened on the same
    /// directory share one lock manager.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created.
    pub fn open(config: &JadbConfig) -> Result<Self> {
        let storage = FileStorage::open(&config.dir)
            .map_err(|e| Error::storage(config.dir.display().to_string(), e))?;
        let locks = shared_lock_manager(storage.dir(), config.lock_policy());
        info!(target: "jadb::table", dir = %storage.dir().display(), "Opened database");
        Ok(Self::with_storage(Arc::new(storage), locks))
    }

    /// Open a file-backed database on `dir` with default settings
    pub fn open_dir(dir: impl AsRef<Path>) -> Result<Self> {
        Self::open(&JadbConfig::with_dir(dir.as_ref()))
    }

    /// Ephemeral database with its own lock manager
    pub fn in_memory() -> Self {
        Self::with_storage(
            Arc::new(MemoryStorage::new()),
            Arc::new(TableLockManager::new()),
        )
    }

    /// Database over an explicit backend and lock manager
    pub fn with_storage(storage: Arc<dyn TableStorage>, locks: Arc<TableLockManager>) -> Self {
        Database { storage, locks }
    }

    /// Storage backend
    pub fn storage(&self) -> &Arc<dyn TableStorage> {
        &self.storage
    }

    /// Lock manager
    pub fn locks(&self) -> &Arc<TableLockManager> {
        &self.locks
    }

    // ========================================================================
    // Table lifecycle
    // ========================================================================

    /// Check if `table` exists
    pub fn exists(&self, table: &str) -> Result<bool> {
        self.storage
            .exists(table)
            .map_err(|e| Error::storage(table, e))
    }

    /// Create an empty table
    ///
    /// Returns `true` if the table was created, `false` if it already existed
    /// and `must_not_exist` was not set.
    ///
    /// # Errors
    ///
    /// Returns `Error::AlreadyExists` if the table exists and `must_not_exist`
    /// is set.
    pub fn create(&self, table: &str, must_not_exist: bool) -> Result<bool> {
        let result = self.locks.acquire(table).and_then(|_guard| {
            if self.exists(table)? {
                return Ok(false);
            }
            self.storage
                .save(table, &TableDocument::new(&timestamp()))
                .map_err(|e| Error::storage(table, e))?;
            Ok(true)
        });

        match result {
            Ok(true) => {
                debug!(target: "jadb::table", table, "Created table");
                Ok(true)
            }
            Ok(false) if must_not_exist => {
                info!(target: "jadb::table", table, "Table already exists");
                Err(Error::AlreadyExists {
                    table: table.to_string(),
                })
            }
            Ok(false) => Ok(false),
            Err(e) => {
                error!(target: "jadb::table", operation = "Create", table, error = %e, "Operation failed");
                Err(e.in_operation("Create", table, describe(&must_not_exist)))
            }
        }
    }

    /// Remove a table; succeeds if it does not exist
    pub fn drop(&self, table: &str) -> Result<()> {
        let result = self.locks.acquire(table).and_then(|_guard| {
            self.storage
                .remove(table)
                .map_err(|e| Error::storage(table, e))
        });
        match result {
            Ok(()) => {
                debug!(target: "jadb::table", table, "Dropped table");
                Ok(())
            }
            Err(e) => {
                error!(target: "jadb::table", operation = "Drop", table, error = %e, "Operation failed");
                Err(e.in_operation("Drop", table, "<no arguments>"))
            }
        }
    }

    /// Remove every record and reset the identifier counter
    pub fn truncate(&self, table: &str) -> Result<()> {
        self.locked(
            "Truncate",
            table,
            || "<no arguments>".to_string(),
            |doc, _| doc.clear(),
        )
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Insert records, assigning `_id`, `_created` and `_modified`
    ///
    /// Identifiers continue from the table's `maxid`; the whole batch shares
    /// one timestamp. Returns the stored records in input order.
    pub fn insert(&self, table: &str, records: Vec<Record>) -> Result<Vec<Record>> {
        self.locked(
            "Insert",
            table,
            || describe(&records),
            |doc, now| {
                records
                    .iter()
                    .map(|record| {
                        let mut record = record.clone();
                        let id = doc.next_id();
                        record.stamp_inserted(id, now);
                        doc.items.push(record.clone());
                        record
                    })
                    .collect()
            },
        )
    }

    /// Insert one record
    pub fn insert_item(&self, table: &str, record: Record) -> Result<Record> {
        self.insert(table, vec![record])?
            .pop()
            .ok_or_else(|| Error::Internal(format!("insert into {} returned no record", table)))
    }

    /// Overwrite `values` on every record matching `clause`
    ///
    /// Reserved fields in `values` are ignored. Returns the updated records;
    /// the table's `modified` time is stamped even when nothing matched.
    pub fn update(&self, table: &str, clause: &WhereClause, values: &Record) -> Result<Vec<Record>> {
        self.locked(
            "Update",
            table,
            || describe(&(clause, values)),
            |doc, now| {
                doc.items
                    .iter_mut()
                    .filter(|item| matches(item, clause))
                    .map(|item| {
                        item.apply_values(values, now);
                        item.clone()
                    })
                    .collect()
            },
        )
    }

    /// Update the record with identifier `id`
    pub fn update_item(&self, table: &str, id: u64, values: &Record) -> Result<Option<Record>> {
        Ok(self.update(table, &WhereClause::id(id), values)?.pop())
    }

    /// Remove every record matching `clause`, returning how many were removed
    pub fn delete(&self, table: &str, clause: &WhereClause) -> Result<usize> {
        self.locked(
            "Delete",
            table,
            || describe(clause),
            |doc, _| {
                let before = doc.items.len();
                doc.items.retain(|item| !matches(item, clause));
                before - doc.items.len()
            },
        )
    }

    /// Remove the record with identifier `id`, returning whether it existed
    pub fn delete_item(&self, table: &str, id: u64) -> Result<bool> {
        Ok(self.delete(table, &WhereClause::id(id))? > 0)
    }

    /// Delete like [`delete`](Self::delete), then maintain each relation
    ///
    /// # Errors
    ///
    /// Fails only if the owning delete fails; relation failures are reported
    /// in the returned outcomes, one per relation in input order.
    pub fn delete_related(
        &self,
        table: &str,
        clause: &WhereClause,
        relations: &[Relation],
    ) -> Result<Vec<RelationOutcome>> {
        let deleted: Vec<String> = self.locked(
            "DeleteRelated",
            table,
            || describe(&(clause, relations)),
            |doc, _| {
                let (gone, kept): (Vec<Record>, Vec<Record>) = std::mem::take(&mut doc.items)
                    .into_iter()
                    .partition(|item| matches(item, clause));
                doc.items = kept;
                gone.iter()
                    .filter_map(Record::id)
                    .map(|id| relation_value(table, id))
                    .collect()
            },
        )?;
        Ok(self.maintain_relations(relations, &deleted))
    }

    /// Delete the record with identifier `id` and maintain each relation
    pub fn delete_item_related(
        &self,
        table: &str,
        id: u64,
        relations: &[Relation],
    ) -> Result<Vec<RelationOutcome>> {
        self.delete_related(table, &WhereClause::id(id), relations)
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Every record in stored order
    pub fn all(&self, table: &str) -> Result<Vec<Record>> {
        Ok(self.read_table(table)?.items)
    }

    /// The record with identifier `id`
    pub fn find(&self, table: &str, id: u64) -> Result<Option<Record>> {
        Ok(self
            .read_table(table)?
            .items
            .into_iter()
            .find(|item| item.id() == Some(id)))
    }

    /// Records accepted by `predicate`, which also sees the whole table
    pub fn filter<F>(&self, table: &str, predicate: F) -> Result<Vec<Record>>
    where
        F: Fn(&Record, &[Record]) -> bool,
    {
        let doc = self.read_table(table)?;
        Ok(doc
            .items
            .iter()
            .filter(|item| predicate(item, &doc.items))
            .cloned()
            .collect())
    }

    /// Filter, order and limit the records of `table`
    pub fn select(&self, table: &str, query: &Query) -> Result<Vec<Record>> {
        match self.read_table(table) {
            Ok(doc) => Ok(pipeline::run(doc.items, query)),
            Err(e) => {
                let context = describe(query);
                error!(
                    target: "jadb::table",
                    table,
                    filter = %describe(&query.filter),
                    order = %describe(&query.order),
                    limit = %describe(&query.limit),
                    error = %e,
                    "Select failed"
                );
                Err(e.in_operation("Select", table, context))
            }
        }
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn read_table(&self, table: &str) -> Result<TableDocument> {
        self.locks.wait_unlocked(table)?;
        self.storage.load(table).map_err(|e| Error::storage(table, e))
    }

    /// acquire -> load -> mutate -> stamp -> save; the guard drops on return
    fn checkout<T>(
        &self,
        table: &str,
        mutate: impl FnOnce(&mut TableDocument, &str) -> T,
    ) -> Result<T> {
        let _guard = self.locks.acquire(table)?;
        let mut doc = self
            .storage
            .load(table)
            .map_err(|e| Error::storage(table, e))?;

        let now = timestamp();
        let output = mutate(&mut doc, &now);
        doc.modified = now;

        self.storage
            .save(table, &doc)
            .map_err(|e| Error::storage(table, e))?;
        Ok(output)
    }

    /// [`checkout`](Self::checkout) with failure logging and context
    fn locked<T>(
        &self,
        operation: &'static str,
        table: &str,
        context: impl FnOnce() -> String,
        mutate: impl FnOnce(&mut TableDocument, &str) -> T,
    ) -> Result<T> {
        self.checkout(table, mutate).map_err(|e| {
            let context = context();
            error!(
                target: "jadb::table",
                operation,
                table,
                args = %context,
                error = %e,
                "Operation failed"
            );
            e.in_operation(operation, table, context)
        })
    }

    fn maintain_relations(&self, relations: &[Relation], deleted: &[String]) -> Vec<RelationOutcome> {
        thread::scope(|scope| {
            let workers: Vec<_> = relations
                .iter()
                .map(|relation| (relation, scope.spawn(move || self.maintain(relation, deleted))))
                .collect();

            workers
                .into_iter()
                .map(|(relation, worker)| RelationOutcome {
                    relation: relation.clone(),
                    result: worker.join().unwrap_or_else(|_| {
                        Err(Error::Internal(format!(
                            "relation worker for {}.{} panicked",
                            relation.table, relation.field
                        )))
                    }),
                })
                .collect()
        })
    }

    fn maintain(&self, relation: &Relation, deleted: &[String]) -> Result<RelationReport> {
        let report = self.locked(
            "DeleteRelation",
            &relation.table,
            || describe(&(relation, deleted)),
            |doc, _| relations::apply(doc, relation, deleted),
        )?;
        debug!(
            target: "jadb::relation",
            table = %report.table,
            field = %report.field,
            unlinked = report.unlinked,
            removed = report.removed,
            "Maintained relation"
        );
        Ok(report)
    }
}
