use anyhow::Result;
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::r2d2::{self, ConnectionManager};

use crate::db::models::layouts::Layout;

// Define the common DBPool type alias, making it available to submodules
pub type DBPool = r2d2::Pool<ConnectionManager<PgConnection>>;

// Declare the repository implementation modules
pub mod layouts;
pub mod memory;

pub use layouts::PgLayoutStore;
pub use memory::MemoryLayoutStore;

/// Persistence for saved layouts, newest first.
#[async_trait]
pub trait LayoutStore: Send + Sync {
    /// Appends a layout and drops everything beyond the retained history.
    async fn save(&self, inner_html: String) -> Result<Layout>;

    /// Stores the layout only if nothing has been stored yet.
    async fn create_first(&self, inner_html: String) -> Result<Option<Layout>>;

    /// 0 is the newest layout.
    async fn nth_newest(&self, index: usize) -> Result<Option<Layout>>;

    async fn count(&self) -> Result<usize>;
}
