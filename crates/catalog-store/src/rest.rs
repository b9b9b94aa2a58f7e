//! REST store speaking the PostgREST dialect.
//!
//! Every call is a single HTTP request; there are no retries. Single-row
//! reads ask for an object response so an empty match comes back as
//! `PGRST116` and surfaces as [`StoreError::NotFound`].

use crate::config::StoreConfig;
use crate::model::{text_of, Collection, Filter, Query, Row};
use crate::store::{CatalogStore, StoreResult};
use crate::StoreError;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

/// PostgREST error code for "no rows" on an object request.
pub(crate) const NO_ROWS_CODE: &str = "PGRST116";

const OBJECT_ACCEPT: &str = "application/vnd.pgrst.object+json";

/// Error body returned by the REST layer.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    details: Option<String>,
}

/// [`CatalogStore`] over HTTP.
pub struct RestStore {
    config: StoreConfig,
    client: reqwest::Client,
    access_token: RwLock<Option<String>>,
}

impl RestStore {
    /// Build a store client. Fails when the URL or key is missing.
    pub fn new(config: StoreConfig) -> Result<Self, StoreError> {
        if !config.is_configured() {
            return Err(StoreError::Config(
                "store url and anon key must both be set".to_string(),
            ));
        }
        reqwest::Url::parse(config.base_url())
            .map_err(|e| StoreError::Config(format!("invalid store url: {e}")))?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| StoreError::Config(format!("http client: {e}")))?;
        Ok(Self {
            config,
            client,
            access_token: RwLock::new(None),
        })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn table_url(&self, collection: Collection) -> String {
        format!("{}/rest/v1/{}", self.config.base_url(), collection.table())
    }

    async fn headers(&self) -> StoreResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        let key = header_value(&self.config.anon_key)?;
        headers.insert("apikey", key);

        let token = self.access_token.read().await.clone();
        let bearer = token.as_deref().unwrap_or(&self.config.anon_key);
        headers.insert(AUTHORIZATION, header_value(&format!("Bearer {bearer}"))?);

        if self.config.schema != "public" {
            let schema = header_value(&self.config.schema)?;
            headers.insert("Accept-Profile", schema.clone());
            headers.insert("Content-Profile", schema);
        }
        Ok(headers)
    }

    async fn request(&self, method: Method, collection: Collection) -> StoreResult<RequestBuilder> {
        Ok(self
            .client
            .request(method, self.table_url(collection))
            .headers(self.headers().await?))
    }
}

fn header_value(value: &str) -> StoreResult<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| StoreError::Config(format!("invalid header: {e}")))
}

/// Render a filter as a query parameter.
pub(crate) fn filter_param(filter: &Filter) -> (String, String) {
    match filter {
        Filter::Eq(column, Value::Null) => (column.clone(), "is.null".to_string()),
        Filter::Eq(column, value) => (column.clone(), format!("eq.{}", text_of(value))),
        Filter::In(column, values) => {
            let items: Vec<String> = values.iter().map(quote_list_item).collect();
            (column.clone(), format!("in.({})", items.join(",")))
        }
    }
}

/// List items containing reserved characters are double-quoted.
fn quote_list_item(value: &Value) -> String {
    let text = text_of(value);
    if text.contains([',', '(', ')', '"', ' ']) {
        format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        text
    }
}

/// Query parameters for a fetch.
pub(crate) fn query_params(query: &Query) -> Vec<(String, String)> {
    let mut params = vec![("select".to_string(), query.select_clause())];
    params.extend(query.filters.iter().map(filter_param));
    if let Some(order) = &query.order {
        let dir = if order.ascending { "asc" } else { "desc" };
        params.push(("order".to_string(), format!("{}.{}", order.column, dir)));
    }
    if let Some(limit) = query.limit {
        params.push(("limit".to_string(), limit.to_string()));
    }
    params
}

/// Map an error response onto a [`StoreError`].
async fn error_from(response: Response, what: &str) -> StoreError {
    let status = response.status();
    let body: ErrorBody = response.json().await.unwrap_or_default();
    if status == StatusCode::NOT_ACCEPTABLE || body.code.as_deref() == Some(NO_ROWS_CODE) {
        return StoreError::NotFound(what.to_string());
    }
    let message = match (body.message, body.details) {
        (Some(m), Some(d)) => format!("{m} ({d})"),
        (Some(m), None) => m,
        (None, _) => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string(),
    };
    StoreError::Http {
        status: status.as_u16(),
        code: body.code,
        message,
    }
}

#[async_trait]
impl CatalogStore for RestStore {
    #[instrument(name = "store_fetch", skip(self, query))]
    async fn fetch(&self, collection: Collection, query: &Query) -> StoreResult<Vec<Row>> {
        let params = query_params(query);
        debug!(?params, "fetch");
        let response = self
            .request(Method::GET, collection)
            .await?
            .query(&params)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(error_from(response, collection.table()).await);
        }
        Ok(response.json::<Vec<Row>>().await?)
    }

    #[instrument(name = "store_fetch_one", skip(self))]
    async fn fetch_one(&self, collection: Collection, id: &str) -> StoreResult<Row> {
        let response = self
            .request(Method::GET, collection)
            .await?
            .header(ACCEPT, OBJECT_ACCEPT)
            .query(&[("select".to_string(), "*".to_string()), filter_param(&Filter::id(id))])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(error_from(response, &format!("{collection}/{id}")).await);
        }
        Ok(response.json::<Row>().await?)
    }

    #[instrument(name = "store_insert", skip(self, rows), fields(count = rows.len()))]
    async fn insert(&self, collection: Collection, rows: Vec<Row>) -> StoreResult<Vec<Row>> {
        let response = self
            .request(Method::POST, collection)
            .await?
            .header("Prefer", "return=representation")
            .json(&rows)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(error_from(response, collection.table()).await);
        }
        Ok(response.json::<Vec<Row>>().await?)
    }

    #[instrument(name = "store_update", skip(self, changes))]
    async fn update(&self, collection: Collection, id: &str, changes: Row) -> StoreResult<()> {
        let response = self
            .request(Method::PATCH, collection)
            .await?
            .header("Prefer", "return=representation")
            .query(&[filter_param(&Filter::id(id)), ("select".to_string(), "id".to_string())])
            .json(&changes)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(error_from(response, &format!("{collection}/{id}")).await);
        }
        let touched: Vec<Row> = response.json().await?;
        if touched.is_empty() {
            return Err(StoreError::NotFound(format!("{collection}/{id}")));
        }
        Ok(())
    }

    #[instrument(name = "store_delete", skip(self, filters))]
    async fn delete(&self, collection: Collection, filters: &[Filter]) -> StoreResult<u64> {
        if filters.is_empty() {
            return Err(StoreError::Rejected(format!(
                "refusing to delete every row of {collection}"
            )));
        }
        let mut params: Vec<(String, String)> = filters.iter().map(filter_param).collect();
        params.push(("select".to_string(), "id".to_string()));
        let response = self
            .request(Method::DELETE, collection)
            .await?
            .header("Prefer", "return=representation")
            .query(&params)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(error_from(response, collection.table()).await);
        }
        let deleted: Vec<Row> = response.json().await?;
        Ok(deleted.len() as u64)
    }

    async fn authorize(&self, access_token: Option<String>) {
        *self.access_token.write().await = access_token;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Embed;

    #[test]
    fn test_filter_params() {
        assert_eq!(
            filter_param(&Filter::eq("name", "Trail Runner")),
            ("name".to_string(), "eq.Trail Runner".to_string())
        );
        assert_eq!(
            filter_param(&Filter::eq("category_id", Value::Null)),
            ("category_id".to_string(), "is.null".to_string())
        );
        assert_eq!(
            filter_param(&Filter::is_in("id", ["1", "a,b"])),
            ("id".to_string(), "in.(1,\"a,b\")".to_string())
        );
    }

    #[test]
    fn test_query_params() {
        let query = Query::new()
            .embed(Embed::parent("category", Collection::Categories, "category_id", &["name"]))
            .filter(Filter::eq("product_id", 3))
            .order_by("position", true)
            .limit(1);
        assert_eq!(
            query_params(&query),
            vec![
                ("select".to_string(), "*,category:categories(name)".to_string()),
                ("product_id".to_string(), "eq.3".to_string()),
                ("order".to_string(), "position.asc".to_string()),
                ("limit".to_string(), "1".to_string()),
            ]
        );
    }

    #[test]
    fn test_requires_configuration() {
        assert!(matches!(
            RestStore::new(StoreConfig::default()),
            Err(StoreError::Config(_))
        ));
        assert!(RestStore::new(StoreConfig::new("https://demo.supabase.co/", "anon")).is_ok());
    }

    #[tokio::test]
    async fn test_headers_switch_to_user_token() {
        let store = RestStore::new(StoreConfig::new("https://demo.supabase.co", "anon")).unwrap();
        let headers = store.headers().await.unwrap();
        assert_eq!(headers["apikey"], "anon");
        assert_eq!(headers[AUTHORIZATION], "Bearer anon");

        store.authorize(Some("user-jwt".to_string())).await;
        let headers = store.headers().await.unwrap();
        assert_eq!(headers[AUTHORIZATION], "Bearer user-jwt");
        assert_eq!(store.table_url(Collection::Variants), "https://demo.supabase.co/rest/v1/variants");
    }
}
