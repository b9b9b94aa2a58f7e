//! Query model shared by every store backend.

use crate::StoreError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// A row as the store returns it: column name to JSON value.
pub type Row = Map<String, Value>;

/// Decode a row into a typed value.
pub fn decode_row<T: DeserializeOwned>(row: Row) -> Result<T, StoreError> {
    serde_json::from_value(Value::Object(row)).map_err(StoreError::from)
}

/// Decode every row, failing on the first row that does not fit.
pub fn decode_rows<T: DeserializeOwned>(rows: Vec<Row>) -> Result<Vec<T>, StoreError> {
    rows.into_iter().map(decode_row).collect()
}

/// Tables the catalog uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Products,
    Categories,
    Variants,
}

impl Collection {
    /// Table name in the store.
    pub fn table(&self) -> &'static str {
        match self {
            Collection::Products => "products",
            Collection::Categories => "categories",
            Collection::Variants => "variants",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table())
    }
}

/// A condition on a column. Filters in a query are ANDed.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Column equals value.
    Eq(String, Value),
    /// Column equals one of the values.
    In(String, Vec<Value>),
}

impl Filter {
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Eq(column.into(), value.into())
    }

    pub fn is_in<V: Into<Value>>(column: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
        Filter::In(column.into(), values.into_iter().map(Into::into).collect())
    }

    /// Shorthand for an `id` equality filter.
    pub fn id(id: impl Into<String>) -> Self {
        Filter::Eq("id".to_string(), Value::String(id.into()))
    }

    pub fn column(&self) -> &str {
        match self {
            Filter::Eq(column, _) | Filter::In(column, _) => column,
        }
    }

    /// Evaluate the filter against a row.
    pub fn matches(&self, row: &Row) -> bool {
        let cell = row.get(self.column()).unwrap_or(&Value::Null);
        match self {
            Filter::Eq(_, value) => loose_eq(cell, value),
            Filter::In(_, values) => values.iter().any(|v| loose_eq(cell, v)),
        }
    }
}

/// Compare two cells the way the REST layer does: by their text form, so an
/// integer id matches the same id passed as a string.
pub(crate) fn loose_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Null, _) | (_, Value::Null) => false,
        _ => text_of(a) == text_of(b),
    }
}

pub(crate) fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

/// A related table returned inline with each row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Embed {
    /// Key the related data appears under in each row.
    pub alias: String,
    /// Related table.
    pub collection: Collection,
    /// Which side holds the foreign key.
    pub relation: Relation,
    /// Columns to project from the related rows; empty means all.
    pub columns: Vec<String>,
}

/// How an embedded table relates to the queried one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Relation {
    /// The queried row holds `foreign_key` pointing at the related row's id.
    Parent { foreign_key: String },
    /// Related rows hold `foreign_key` pointing at the queried row's id.
    Children { foreign_key: String },
}

impl Embed {
    /// A single parent row, e.g. a product's category.
    pub fn parent(
        alias: impl Into<String>,
        collection: Collection,
        foreign_key: impl Into<String>,
        columns: &[&str],
    ) -> Self {
        Self {
            alias: alias.into(),
            collection,
            relation: Relation::Parent {
                foreign_key: foreign_key.into(),
            },
            columns: columns.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Every child row, e.g. a product's variants.
    pub fn children(
        alias: impl Into<String>,
        collection: Collection,
        foreign_key: impl Into<String>,
        columns: &[&str],
    ) -> Self {
        Self {
            alias: alias.into(),
            collection,
            relation: Relation::Children {
                foreign_key: foreign_key.into(),
            },
            columns: columns.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Select clause fragment: `alias:table(cols)`.
    pub fn select_fragment(&self) -> String {
        let columns = if self.columns.is_empty() {
            "*".to_string()
        } else {
            self.columns.join(",")
        };
        if self.alias == self.collection.table() {
            format!("{}({})", self.alias, columns)
        } else {
            format!("{}:{}({})", self.alias, self.collection.table(), columns)
        }
    }
}

/// Sort order for a fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub column: String,
    pub ascending: bool,
}

/// A fetch request: filters, projection, embeds, order and limit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filters: Vec<Filter>,
    /// Projected columns; empty means all.
    pub columns: Vec<String>,
    pub embeds: Vec<Embed>,
    pub order: Option<Order>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn select(mut self, columns: &[&str]) -> Self {
        self.columns = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn embed(mut self, embed: Embed) -> Self {
        self.embeds.push(embed);
        self
    }

    pub fn order_by(mut self, column: impl Into<String>, ascending: bool) -> Self {
        self.order = Some(Order {
            column: column.into(),
            ascending,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Full select clause including embeds.
    pub fn select_clause(&self) -> String {
        let mut parts: Vec<String> = if self.columns.is_empty() {
            vec!["*".to_string()]
        } else {
            self.columns.clone()
        };
        parts.extend(self.embeds.iter().map(Embed::select_fragment));
        parts.join(",")
    }

    /// Check a row against every filter.
    pub fn matches(&self, row: &Row) -> bool {
        self.filters.iter().all(|f| f.matches(row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Row {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_select_clause_with_embeds() {
        let query = Query::new()
            .embed(Embed::parent("category", Collection::Categories, "category_id", &["name"]))
            .embed(Embed::children(
                "variants",
                Collection::Variants,
                "product_id",
                &["id", "name", "image_url"],
            ));
        assert_eq!(
            query.select_clause(),
            "*,category:categories(name),variants(id,name,image_url)"
        );
    }

    #[test]
    fn test_filters_compare_loosely() {
        let r = row(json!({"id": 7, "name": "Red"}));
        assert!(Filter::id("7").matches(&r));
        assert!(Filter::eq("name", "Red").matches(&r));
        assert!(!Filter::eq("name", "red").matches(&r));
        assert!(Filter::is_in("name", ["Blue", "Red"]).matches(&r));
        assert!(!Filter::eq("missing", "x").matches(&r));
    }

    #[test]
    fn test_query_ands_filters() {
        let r = row(json!({"product_id": "p1", "name": "Red"}));
        let query = Query::new()
            .filter(Filter::eq("product_id", "p1"))
            .filter(Filter::eq("name", "Blue"));
        assert!(!query.matches(&r));
    }
}
