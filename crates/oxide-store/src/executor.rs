//! Schema executor.
//!
//! This module applies the statements generated for model classes to a
//! `SQLite` database.

use std::str::FromStr;

use oxide_store_schema::{analyze_queries_for_class, setup_queries_for_class, ModelClass};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::{debug, info, warn};

use crate::error::Result;

/// Executes generated schema statements against a database.
pub struct SchemaExecutor {
    pool: SqlitePool,
    dry_run: bool,
}

impl SchemaExecutor {
    /// Creates a new schema executor.
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            dry_run: false,
        }
    }

    /// Connects to `database` and returns an executor for it.
    ///
    /// A missing database file is created, unless `dry_run` is set: a dry run
    /// opens the database read-only and never creates it.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the database cannot be opened.
    pub async fn connect(database: &str, dry_run: bool) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database)?
            .create_if_missing(!dry_run)
            .read_only(dry_run);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;
        debug!(database, dry_run, "Connected to database");
        Ok(Self::new(pool).dry_run(dry_run))
    }

    /// Enables dry-run mode (SQL is printed but not executed).
    #[must_use]
    pub const fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// Returns the connection pool.
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Creates the tables and indexes of a class.
    ///
    /// Every statement is guarded by `IF NOT EXISTS`, so this can run against
    /// a database that is already set up.
    ///
    /// # Errors
    ///
    /// Returns an error if the class descriptor is malformed or a statement
    /// fails. Statements are only executed once all of them were generated.
    pub async fn setup<C>(&self, class: &C) -> Result<()>
    where
        C: ModelClass + Sync + ?Sized,
    {
        self.warn_if_dry_run();
        self.setup_class(class).await
    }

    /// Sets up several classes in order.
    ///
    /// # Errors
    ///
    /// Stops at the first class that fails.
    pub async fn setup_all<'a, C, I>(&self, classes: I) -> Result<()>
    where
        C: ModelClass + Sync + ?Sized + 'a,
        I: IntoIterator<Item = &'a C> + Send,
        I::IntoIter: Send,
    {
        self.warn_if_dry_run();
        for class in classes {
            self.setup_class(class).await?;
        }
        Ok(())
    }

    /// Refreshes query planner statistics for a class and its join tables.
    ///
    /// # Errors
    ///
    /// Returns an error if a statement fails.
    pub async fn analyze<C>(&self, class: &C) -> Result<()>
    where
        C: ModelClass + Sync + ?Sized,
    {
        self.warn_if_dry_run();
        self.analyze_class(class).await
    }

    /// Analyzes several classes in order.
    ///
    /// # Errors
    ///
    /// Stops at the first class that fails.
    pub async fn analyze_all<'a, C, I>(&self, classes: I) -> Result<()>
    where
        C: ModelClass + Sync + ?Sized + 'a,
        I: IntoIterator<Item = &'a C> + Send,
        I::IntoIter: Send,
    {
        self.warn_if_dry_run();
        for class in classes {
            self.analyze_class(class).await?;
        }
        Ok(())
    }

    fn warn_if_dry_run(&self) {
        if self.dry_run {
            warn!("Dry run mode - SQL will be printed but not executed");
        }
    }

    async fn setup_class<C>(&self, class: &C) -> Result<()>
    where
        C: ModelClass + Sync + ?Sized,
    {
        info!(class = class.name(), "Setting up class");

        let statements = setup_queries_for_class(class)?;
        self.execute(&statements).await?;

        info!(
            class = class.name(),
            statements = statements.len(),
            "Class set up successfully"
        );
        Ok(())
    }

    async fn analyze_class<C>(&self, class: &C) -> Result<()>
    where
        C: ModelClass + Sync + ?Sized,
    {
        info!(class = class.name(), "Analyzing class");
        let statements = analyze_queries_for_class(class);
        self.execute(&statements).await
    }

    async fn execute(&self, statements: &[String]) -> Result<()> {
        for sql in statements {
            debug!(sql = %sql, "Executing SQL");

            if self.dry_run {
                println!("{sql};");
            } else {
                sqlx::query(sql).execute(&self.pool).await?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    use super::*;
    use oxide_store_schema::{Attribute, ClassDescriptor};
    use tracing::Level;
    use tracing_subscriber::FmtSubscriber;

    async fn create_test_pool() -> SqlitePool {
        SqlitePoolOptions::new()
            .max_connections(1)
            .connect(":memory:")
            .await
            .expect("Failed to create in-memory SQLite pool")
    }

    async fn table_names(pool: &SqlitePool) -> Vec<String> {
        sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .fetch_all(pool)
            .await
            .unwrap()
    }

    fn thread() -> ClassDescriptor {
        ClassDescriptor::new("Thread")
            .with_attribute(Attribute::string("id").queryable(true))
            .with_attribute(Attribute::boolean("unread").queryable(true))
            .with_attribute(
                Attribute::collection("folders", "Folder")
                    .queryable(true)
                    .join_queryable_by(["unread"]),
            )
            .with_attribute(Attribute::joined_data("body", "ThreadBody"))
    }

    /// Log output collected by a test-local subscriber.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_setup_creates_tables() {
        let pool = create_test_pool().await;
        let executor = SchemaExecutor::new(pool);

        executor.setup(&thread()).await.unwrap();

        assert_eq!(
            table_names(executor.pool()).await,
            vec!["Thread", "Thread-Folder", "ThreadBody"]
        );
    }

    #[tokio::test]
    async fn test_setup_is_idempotent() {
        let pool = create_test_pool().await;
        let executor = SchemaExecutor::new(pool);

        executor.setup(&thread()).await.unwrap();
        executor.setup(&thread()).await.unwrap();
        executor.analyze(&thread()).await.unwrap();
    }

    #[tokio::test]
    async fn test_dry_run_executes_nothing() {
        let pool = create_test_pool().await;
        let executor = SchemaExecutor::new(pool).dry_run(true);

        executor.setup(&thread()).await.unwrap();

        assert!(table_names(executor.pool()).await.is_empty());
    }

    #[tokio::test]
    async fn test_dry_run_warns_once_for_many_classes() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::WARN)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let executor = SchemaExecutor::new(create_test_pool().await).dry_run(true);
        let classes = [
            thread(),
            ClassDescriptor::new("Folder"),
            ClassDescriptor::new("Label"),
        ];
        executor.setup_all(&classes).await.unwrap();
        executor.analyze_all(&classes).await.unwrap();

        assert_eq!(logs.contents().matches("Dry run mode").count(), 2);
        assert!(table_names(executor.pool()).await.is_empty());
    }

    #[tokio::test]
    async fn test_connect_creates_database_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.sqlite3");
        let database = format!("sqlite:{}", path.display());

        let executor = SchemaExecutor::connect(&database, false).await.unwrap();
        executor.setup(&thread()).await.unwrap();

        assert!(path.exists());
        assert_eq!(
            table_names(executor.pool()).await,
            vec!["Thread", "Thread-Folder", "ThreadBody"]
        );
    }

    #[tokio::test]
    async fn test_dry_run_connect_never_creates_database_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.sqlite3");
        let database = format!("sqlite:{}", path.display());

        assert!(SchemaExecutor::connect(&database, true).await.is_err());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_malformed_class_executes_nothing() {
        let pool = create_test_pool().await;
        let executor = SchemaExecutor::new(pool);
        let class = thread().with_attribute(
            Attribute::collection("labels", "Label")
                .queryable(true)
                .join_queryable_by(["missing"]),
        );

        assert!(executor.setup(&class).await.is_err());
        assert!(table_names(executor.pool()).await.is_empty());
    }
}
