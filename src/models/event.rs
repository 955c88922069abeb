use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub name: String,
    pub date: String,
}

/// Rows inserted on first start; `(name, date)` is unique so reseeding is a no-op.
pub const SEED_EVENTS: [(&str, &str); 2] = [("Concert", "2025-04-15"), ("Workshop", "2025-04-20")];
