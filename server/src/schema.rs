//! Table definition for persisted to-do items.
//!
//! The store layer issues plain SQL against these names; nothing is derived
//! from the Rust types at runtime.

/// Table holding every to-do item.
pub const TABLE: &str = "todo";

pub const COL_ID: &str = "id";
pub const COL_DESCRIPTION: &str = "description";
pub const COL_IS_COMPLETED: &str = "is_completed";

/// Unique index backing the one-item-per-description rule.
pub const DESCRIPTION_INDEX: &str = "ix_todo_description";

/// Upper bound on `description`, enforced by the table as well as the API.
pub const DESCRIPTION_MAX_LEN: usize = 50;

/// Lower bound on `description`, enforced by the API only.
pub const DESCRIPTION_MIN_LEN: usize = 3;

/// Columns in select order.
pub const COLUMNS: [&str; 3] = [COL_ID, COL_DESCRIPTION, COL_IS_COMPLETED];

/// Idempotent DDL applied when a store is opened.
pub fn statements() -> [String; 2] {
    [
        format!(
            "CREATE TABLE IF NOT EXISTS {TABLE} (\
             {COL_ID} TEXT NOT NULL PRIMARY KEY COLLATE BINARY, \
             {COL_DESCRIPTION} TEXT NOT NULL CHECK (length({COL_DESCRIPTION}) <= {DESCRIPTION_MAX_LEN}), \
             {COL_IS_COMPLETED} BOOLEAN NOT NULL)"
        ),
        format!(
            "CREATE UNIQUE INDEX IF NOT EXISTS {DESCRIPTION_INDEX} ON {TABLE} ({COL_DESCRIPTION})"
        ),
    ]
}

/// `id, description, is_completed`
pub fn select_list() -> String {
    COLUMNS.join(", ")
}
