use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;

use crate::db::postgres::schema::layouts;

/// A saved snapshot of the page's `innerHTML`.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Eq, Serialize)]
#[diesel(table_name = layouts)]
#[diesel(primary_key(id))]
pub struct Layout {
    pub id: i64,
    pub inner_html: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = layouts)]
pub struct NewLayout {
    pub inner_html: String,
    pub created_at: DateTime<Utc>,
}

impl NewLayout {
    pub fn now(inner_html: impl Into<String>) -> Self {
        NewLayout {
            inner_html: inner_html.into(),
            created_at: Utc::now(),
        }
    }
}
