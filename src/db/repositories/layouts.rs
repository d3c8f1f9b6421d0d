use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel_migrations::MigrationHarness;
use std::sync::Arc;
use tracing::{debug, info};

use super::{DBPool, LayoutStore};
use crate::db::models::layouts::{Layout, NewLayout};
use crate::db::postgres::schema::layouts::dsl::*;
use crate::db::postgres::MIGRATIONS;

/// Postgres-backed layout store.
///
/// Diesel is synchronous, so every query runs on the blocking pool.
#[derive(Clone)]
pub struct PgLayoutStore {
    pool: Arc<DBPool>,
    history_depth: usize,
}

impl PgLayoutStore {
    pub fn new(pool: Arc<DBPool>, history_depth: usize) -> Self {
        PgLayoutStore { pool, history_depth }
    }

    /// Builds the connection pool and applies pending migrations.
    pub async fn connect(database_url: &str, history_depth: usize) -> Result<Self> {
        let manager = ConnectionManager::<PgConnection>::new(database_url);
        let pool = Pool::builder()
            .build(manager)
            .context("Failed to create database connection pool")?;
        let store = PgLayoutStore::new(Arc::new(pool), history_depth);

        let applied = store
            .run(|conn| {
                conn.run_pending_migrations(MIGRATIONS)
                    .map(|versions| versions.len())
                    .map_err(|e| anyhow!("Failed to run migrations: {}", e))
            })
            .await?;
        info!(applied, "Database migrations up to date.");
        Ok(store)
    }

    async fn run<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut PgConnection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get().context("Failed to get DB connection")?;
            f(&mut *conn)
        })
        .await
        .context("Database task execution failed")?
    }
}

fn newest_first() -> (diesel::dsl::Desc<created_at>, diesel::dsl::Desc<id>) {
    (created_at.desc(), id.desc())
}

fn insert(conn: &mut PgConnection, new_layout: &NewLayout) -> QueryResult<Layout> {
    diesel::insert_into(layouts)
        .values(new_layout)
        .returning(Layout::as_returning())
        .get_result(conn)
}

fn prune(conn: &mut PgConnection, keep: i64) -> QueryResult<usize> {
    let stale: Vec<i64> = layouts
        .select(id)
        .order(newest_first())
        .offset(keep)
        .load(conn)?;
    if stale.is_empty() {
        return Ok(0);
    }
    diesel::delete(layouts.filter(id.eq_any(stale))).execute(conn)
}

// Serialises writers so the emptiness check and pruning see every committed row.
fn lock_layouts(conn: &mut PgConnection) -> QueryResult<usize> {
    diesel::sql_query("LOCK TABLE layouts IN EXCLUSIVE MODE").execute(conn)
}

#[async_trait]
impl LayoutStore for PgLayoutStore {
    async fn save(&self, html: String) -> Result<Layout> {
        let keep = i64::try_from(self.history_depth).context("history_depth does not fit in i64")?;
        self.run(move |conn| {
            conn.transaction::<_, diesel::result::Error, _>(|conn| {
                lock_layouts(conn)?;
                let layout = insert(conn, &NewLayout::now(html))?;
                let removed = prune(conn, keep)?;
                debug!(layout_id = layout.id, removed, "Saved layout");
                Ok(layout)
            })
            .context("Failed to save layout")
        })
        .await
    }

    async fn create_first(&self, html: String) -> Result<Option<Layout>> {
        self.run(move |conn| {
            conn.transaction::<_, diesel::result::Error, _>(|conn| {
                lock_layouts(conn)?;
                let existing: i64 = layouts.count().get_result(conn)?;
                if existing > 0 {
                    return Ok(None);
                }
                insert(conn, &NewLayout::now(html)).map(Some)
            })
            .context("Failed to create first layout")
        })
        .await
    }

    async fn nth_newest(&self, index: usize) -> Result<Option<Layout>> {
        let offset = i64::try_from(index)
            .with_context(|| format!("Layout index {} does not fit in i64", index))?;
        self.run(move |conn| {
            layouts
                .select(Layout::as_select())
                .order(newest_first())
                .offset(offset)
                .first(conn)
                .optional()
                .with_context(|| format!("Failed to load layout at index {}", offset))
        })
        .await
    }

    async fn count(&self) -> Result<usize> {
        self.run(|conn| {
            let n = layouts
                .count()
                .get_result::<i64>(conn)
                .context("Failed to count layouts")?;
            usize::try_from(n).context("Layout count is negative")
        })
        .await
    }
}
