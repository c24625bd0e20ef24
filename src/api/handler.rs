//! Request dispatch onto a table store

use serde_json::{json, Value};
use tracing::debug;

use super::errors::{ApiError, ApiResult};
use super::request::Request;
use super::response::Response;
use crate::store::{matches_condition, Row, Selection, TableStore};

/// Executes requests against a borrowed store
pub struct RequestHandler<'a> {
    store: &'a mut TableStore,
}

impl<'a> RequestHandler<'a> {
    pub fn new(store: &'a mut TableStore) -> Self {
        Self { store }
    }

    /// Handle a raw JSON request string
    pub fn handle(&mut self, json_request: &str) -> Response {
        let result = Request::parse(json_request).and_then(|request| self.execute(request));

        match result {
            Ok(data) => Response::success(data),
            Err(e) => Response::error(&e),
        }
    }

    /// Execute a parsed request, returning the response payload
    pub fn execute(&mut self, request: Request) -> ApiResult<Value> {
        debug!(
            op = request.op_name(),
            mutation = request.is_mutation(),
            "executing request"
        );

        match request {
            Request::CreateTable { table } => {
                self.store.create_table(&table)?;
                Ok(Value::Null)
            }
            Request::Insert { table, row } => {
                self.store.insert_row(&table, row)?;
                Ok(Value::Null)
            }
            Request::Select {
                table,
                filter,
                sort,
            } => {
                let mut selection = match &filter {
                    Some(condition) => Selection::matching(condition),
                    None => Selection::all(),
                };
                if let Some(field) = sort {
                    selection = selection.sort_by_field(field);
                }
                let rows = self.store.select_rows(&table, &selection)?;
                Ok(rows_value(rows))
            }
            Request::Update {
                table,
                filter,
                set,
                unset,
            } => {
                if set.is_empty() && unset.is_empty() {
                    return Err(ApiError::invalid_request(
                        "update needs at least one field in 'set' or 'unset'",
                    ));
                }
                let updated = self.store.update_rows(
                    &table,
                    |row| matches_condition(row, &filter),
                    |row| {
                        for (field, value) in &set {
                            row.insert(field.clone(), value.clone());
                        }
                        for field in &unset {
                            row.remove(field);
                        }
                    },
                )?;
                Ok(json!({ "updated": updated }))
            }
            Request::Delete { table, filter } => {
                let matches = |row: &Row| {
                    filter
                        .as_ref()
                        .map_or(false, |condition| matches_condition(row, condition))
                };
                let predicate: Option<&dyn Fn(&Row) -> bool> =
                    if filter.is_some() { Some(&matches) } else { None };
                let removed = self.store.delete_rows(&table, predicate)?;
                Ok(json!({ "deleted": removed }))
            }
            Request::GetRow { table, condition } => {
                let rows = self.store.get_row(&table, condition.as_ref())?;
                Ok(rows_value(rows))
            }
            Request::CleanRow { table, id } => {
                self.store.clean_row(&table, &id)?;
                Ok(Value::Null)
            }
            Request::ReplaceTable { table, rows } => {
                let count = rows.len();
                self.store.replace_table(&table, rows)?;
                Ok(json!({ "rows": count }))
            }
            Request::Tables => {
                let sizes: serde_json::Map<String, Value> = self
                    .store
                    .table_sizes()
                    .into_iter()
                    .map(|(name, size)| (name, json!(size)))
                    .collect();
                Ok(Value::Object(sizes))
            }
        }
    }
}

fn rows_value(rows: Vec<Row>) -> Value {
    Value::Array(rows.into_iter().map(Value::Object).collect())
}
