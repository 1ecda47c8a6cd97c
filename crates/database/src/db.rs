//! Scratch-file materialization and connection pool management.

use crate::Options;
use crate::error::{ErrorKind, Result};
use crate::rows::{RowStream, convert};
use apkg_model::{Row, Value};
use exn::{OptionExt, ResultExt};
use sqlx::pool::PoolConnectionMetadata;
use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments, SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::SqliteConnection;
use std::cell::Cell;
use std::future::Future;
use std::io::{Read, Write};
use tempfile::NamedTempFile;
use tokio::runtime::{EnterGuard, Runtime};
use tracing::instrument;

const SCRATCH_PREFIX: &str = "apkg-";
const SCRATCH_SUFFIX: &str = ".sqlite";

struct Open {
    pool: SqlitePool,
    scratch: NamedTempFile,
}

/// The database embedded in a package, copied to a scratch file and opened
/// read-only.
///
/// The API is blocking: the database drives `sqlx` on its own current-thread
/// runtime, so it must not be used from inside another async runtime.
///
/// At most [`Options::max_connections`] row streams can be open at once.
/// Nothing runs the runtime while the caller holds a stream, so a query past
/// that limit could never get a connection; it fails with
/// [`ErrorKind::Busy`] instead of waiting.
pub struct Database {
    runtime: Runtime,
    open: Option<Open>,
    streams: Cell<u32>,
    max_streams: u32,
}

impl Database {
    /// Copy `source` into a scratch file and open a read-only pool on it.
    #[instrument(level = "debug", skip_all)]
    pub fn materialize(mut source: impl Read, options: &Options) -> Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(SCRATCH_PREFIX).suffix(SCRATCH_SUFFIX);
        let mut scratch = match &options.scratch_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .or_raise(|| ErrorKind::Resource)?;

        let written = std::io::copy(&mut source, scratch.as_file_mut()).or_raise(|| ErrorKind::Source)?;
        scratch.as_file_mut().flush().or_raise(|| ErrorKind::Resource)?;
        tracing::debug!(bytes = written, path = %scratch.path().display(), "materialized database");

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .or_raise(|| ErrorKind::Resource)?;
        let connect = Self::base_options().filename(scratch.path());
        let pool = runtime.block_on(Self::connect(connect, options))?;
        Ok(Self { runtime, open: Some(Open { pool, scratch }), streams: Cell::new(0), max_streams: options.max_streams() })
    }

    async fn connect(connect: SqliteConnectOptions, options: &Options) -> Result<SqlitePool> {
        SqlitePoolOptions::new()
            // Applies to every pooled connection, not only the first one.
            .after_connect(|conn, meta| Box::pin(async move { Self::apply_pragmas(conn, meta).await }))
            // The spare connection serves `get` and `all` while every stream is open.
            .max_connections(options.max_streams() + 1)
            .acquire_timeout(options.acquire_timeout())
            .connect_with(connect)
            .await
            .or_raise(|| ErrorKind::Database)
    }

    fn base_options() -> SqliteConnectOptions {
        SqliteConnectOptions::new()
            .read_only(true)
            .create_if_missing(false)
    }

    async fn apply_pragmas(conn: &mut SqliteConnection, _meta: PoolConnectionMetadata) -> sqlx::Result<()> {
        sqlx::query("PRAGMA query_only = ON").execute(conn).await?;
        Ok(())
    }

    fn pool(&self) -> Result<&SqlitePool> {
        self.open.as_ref().map(|open| &open.pool).ok_or_raise(|| ErrorKind::Closed)
    }

    pub(crate) fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    pub(crate) fn enter(&self) -> EnterGuard<'_> {
        self.runtime.enter()
    }

    pub(crate) fn stream_released(&self) {
        self.streams.set(self.streams.get().saturating_sub(1));
    }

    /// Row streams currently holding (or about to hold) a connection.
    #[must_use]
    pub fn open_streams(&self) -> u32 {
        self.streams.get()
    }

    /// Run a fixed query and stream its rows lazily.
    #[instrument(level = "debug", skip_all, fields(params = params.len()))]
    pub fn query<'a>(&'a self, sql: &'static str, params: &[Value]) -> Result<RowStream<'a>> {
        let pool = self.pool()?;
        let open = self.streams.get();
        if open >= self.max_streams {
            exn::bail!(ErrorKind::Busy);
        }
        self.streams.set(open + 1);
        let stream = bind(sqlx::query(sql), params).fetch(pool);
        Ok(RowStream::new(self, stream))
    }

    /// Run a fixed query and return its first row, if any.
    #[instrument(level = "debug", skip_all, fields(params = params.len()))]
    pub fn get(&self, sql: &'static str, params: &[Value]) -> Result<Option<Row>> {
        let pool = self.pool()?;
        let row = self.block_on(bind(sqlx::query(sql), params).fetch_optional(pool)).or_raise(|| ErrorKind::Database)?;
        row.as_ref().map(convert).transpose().or_raise(|| ErrorKind::Database)
    }

    /// Run a fixed query and collect every row. Doesn't count as a stream.
    #[instrument(level = "debug", skip_all, fields(params = params.len()))]
    pub fn all(&self, sql: &'static str, params: &[Value]) -> Result<Vec<Row>> {
        let pool = self.pool()?;
        let rows = self.block_on(bind(sqlx::query(sql), params).fetch_all(pool)).or_raise(|| ErrorKind::Database)?;
        rows.iter().map(convert).collect::<sqlx::Result<_>>().or_raise(|| ErrorKind::Database)
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.open.is_none()
    }

    /// Close the pool, then remove the scratch file.
    ///
    /// Closing twice is a no-op. A scratch file that can't be removed is
    /// reported as [`ErrorKind::Resource`], after the pool has been closed.
    #[instrument(level = "debug", skip_all)]
    pub fn close(&mut self) -> Result<()> {
        let Some(Open { pool, scratch }) = self.open.take() else {
            return Ok(());
        };
        self.runtime.block_on(pool.close());
        {
            let _guard = self.runtime.enter();
            drop(pool);
        }
        scratch.close().or_raise(|| ErrorKind::Resource)?;
        tracing::debug!("database closed");
        Ok(())
    }
}
impl Drop for Database {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            tracing::warn!(error = ?err, "failed to release database");
        }
    }
}

fn bind<'q>(query: Query<'q, Sqlite, SqliteArguments<'q>>, params: &[Value]) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    params.iter().fold(query, |query, param| match param {
        Value::Null => query.bind(None::<i64>),
        Value::Integer(i) => query.bind(*i),
        Value::Real(r) => query.bind(*r),
        Value::Text(s) => query.bind(s.clone()),
        Value::Blob(b) => query.bind(b.clone()),
    })
}
