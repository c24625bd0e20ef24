//! API request types
//!
//! One JSON object per request, tagged by `op`:
//!
//! ```json
//! {"op": "insert", "table": "users", "row": {"id": 1, "name": "Ann"}}
//! {"op": "select", "table": "users", "filter": {"name": "Ann"}, "sort": "id"}
//! {"op": "update", "table": "users", "filter": {"id": 1}, "set": {"name": "Anne"}, "unset": ["bio"]}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::{ApiError, ApiResult};
use crate::store::{oversized_integer, Row};

/// A single store operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    CreateTable {
        table: String,
    },
    Insert {
        table: String,
        row: Row,
    },
    Select {
        table: String,
        /// Conjunctive equality condition
        #[serde(default)]
        filter: Option<Row>,
        /// Field to sort ascending by
        #[serde(default)]
        sort: Option<String>,
    },
    Update {
        table: String,
        filter: Row,
        #[serde(default)]
        set: Row,
        #[serde(default)]
        unset: Vec<String>,
    },
    /// Without `filter` no rows are removed
    Delete {
        table: String,
        #[serde(default)]
        filter: Option<Row>,
    },
    GetRow {
        table: String,
        #[serde(default)]
        condition: Option<Row>,
    },
    CleanRow {
        table: String,
        id: Value,
    },
    ReplaceTable {
        table: String,
        rows: Vec<Row>,
    },
    Tables,
}

impl Request {
    /// Parse a request from a JSON string.
    ///
    /// Integers beyond 64 bits are rejected rather than rounded to f64.
    pub fn parse(json: &str) -> ApiResult<Self> {
        let request =
            serde_json::from_str(json).map_err(|e| ApiError::invalid_request(e.to_string()))?;

        if let Some(literal) = oversized_integer(json.as_bytes()) {
            return Err(ApiError::invalid_request(format!(
                "integer {} does not fit in 64 bits",
                literal
            )));
        }

        Ok(request)
    }

    /// True for operations that rewrite the snapshot
    pub fn is_mutation(&self) -> bool {
        !matches!(
            self,
            Request::Select { .. } | Request::GetRow { .. } | Request::Tables
        )
    }

    pub fn op_name(&self) -> &'static str {
        match self {
            Request::CreateTable { .. } => "create_table",
            Request::Insert { .. } => "insert",
            Request::Select { .. } => "select",
            Request::Update { .. } => "update",
            Request::Delete { .. } => "delete",
            Request::GetRow { .. } => "get_row",
            Request::CleanRow { .. } => "clean_row",
            Request::ReplaceTable { .. } => "replace_table",
            Request::Tables => "tables",
        }
    }
}
