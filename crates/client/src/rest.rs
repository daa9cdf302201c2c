//! REST backend client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tally_core::budget::types::{
    AppliedTax, ApplyTaxRequest, Budget, BudgetCategory, BudgetDraft, BudgetLineItem, BudgetType,
    Merchant, TaxRule, Unit,
};
use tally_core::ports::BudgetBackend;
use tally_shared::config::BackendConfig;
use tally_shared::types::{BudgetId, DataResponse, ListQuery, ListResponse};
use tally_shared::AppResult;
use tracing::{debug, warn};

use crate::error::ClientError;

/// Body of `PATCH /budget/budget-items/:id`.
#[derive(Debug, Serialize)]
struct SaveItemsBody<'a> {
    budget_type: BudgetType,
    items: &'a [BudgetLineItem],
}

#[derive(Debug, Serialize)]
struct TypeQuery {
    #[serde(rename = "type")]
    budget_type: BudgetType,
}

#[derive(Debug, Serialize)]
struct CategoryQuery<'a> {
    category: &'a str,
}

/// [`BudgetBackend`] over HTTP.
#[derive(Debug, Clone)]
pub struct RestBackend {
    client: Client,
    base_url: String,
}

impl RestBackend {
    /// Creates a client for `base_url` (e.g. `http://localhost:5000/api`).
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ClientError::InvalidBaseUrl(base_url));
        }
        let client = Client::builder().timeout(timeout).gzip(true).build()?;
        Ok(Self { client, base_url })
    }

    /// Creates a client from configuration.
    pub fn from_config(config: &BackendConfig) -> Result<Self, ClientError> {
        Self::new(config.api_base_url.clone(), config.timeout())
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, ClientError> {
        let response = builder.send().await?;
        let status = response.status();
        debug!(url = %response.url(), status = status.as_u16(), "Backend responded");
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());
        warn!(status = status.as_u16(), %message, "Backend returned an error");
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn data<T: DeserializeOwned>(&self, builder: RequestBuilder) -> AppResult<T> {
        let response = self.send(builder).await?;
        let bytes = response.bytes().await.map_err(ClientError::from)?;
        let envelope: DataResponse<T> =
            serde_json::from_slice(&bytes).map_err(ClientError::from)?;
        Ok(envelope.data)
    }

    async fn list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &ListQuery,
    ) -> AppResult<ListResponse<T>> {
        let response = self
            .send(self.request(Method::GET, path).query(query))
            .await?;
        let bytes = response.bytes().await.map_err(ClientError::from)?;
        Ok(serde_json::from_slice(&bytes).map_err(ClientError::from)?)
    }

    async fn no_content(&self, builder: RequestBuilder) -> AppResult<()> {
        self.send(builder).await?;
        Ok(())
    }
}

#[async_trait]
impl BudgetBackend for RestBackend {
    async fn list_budgets(&self, query: &ListQuery) -> AppResult<ListResponse<Budget>> {
        self.list("/budget", query).await
    }

    async fn get_budget(&self, id: &BudgetId) -> AppResult<Budget> {
        self.data(self.request(Method::GET, &format!("/budget/{id}")))
            .await
    }

    async fn create_budget(&self, draft: &BudgetDraft) -> AppResult<Budget> {
        self.data(
            self.request(Method::POST, "/budget")
                .json(&draft.to_payload()),
        )
        .await
    }

    async fn update_budget(&self, id: &BudgetId, draft: &BudgetDraft) -> AppResult<Budget> {
        self.data(
            self.request(Method::PATCH, &format!("/budget/{id}"))
                .json(&draft.to_payload()),
        )
        .await
    }

    async fn delete_budget(&self, id: &BudgetId) -> AppResult<()> {
        self.no_content(self.request(Method::DELETE, &format!("/budget/{id}")))
            .await
    }

    async fn fetch_items(
        &self,
        id: &BudgetId,
        budget_type: BudgetType,
    ) -> AppResult<Vec<BudgetLineItem>> {
        self.data(
            self.request(Method::GET, &format!("/budget/budget-items/{id}"))
                .query(&TypeQuery { budget_type }),
        )
        .await
    }

    async fn save_items(
        &self,
        id: &BudgetId,
        budget_type: BudgetType,
        items: &[BudgetLineItem],
    ) -> AppResult<()> {
        self.no_content(
            self.request(Method::PATCH, &format!("/budget/budget-items/{id}"))
                .json(&SaveItemsBody { budget_type, items }),
        )
        .await
    }

    async fn fetch_applied_taxes(&self, id: &BudgetId) -> AppResult<Vec<AppliedTax>> {
        self.data(self.request(Method::GET, &format!("/budget/apply-tax/{id}")))
            .await
    }

    async fn apply_taxes(&self, request: &ApplyTaxRequest) -> AppResult<()> {
        self.no_content(self.request(Method::POST, "/budget/apply-tax").json(request))
            .await
    }

    async fn fetch_subcategories(&self, category: &str) -> AppResult<Vec<String>> {
        self.data(
            self.request(Method::GET, "/budget-category/sub-categories")
                .query(&CategoryQuery { category }),
        )
        .await
    }

    async fn list_categories(&self, query: &ListQuery) -> AppResult<ListResponse<BudgetCategory>> {
        self.list("/budget-category", query).await
    }

    async fn list_taxes(&self, query: &ListQuery) -> AppResult<ListResponse<TaxRule>> {
        self.list("/budget-tax", query).await
    }

    async fn list_merchants(&self, query: &ListQuery) -> AppResult<ListResponse<Merchant>> {
        self.list("/budget-merchant", query).await
    }

    async fn list_units(&self, query: &ListQuery) -> AppResult<ListResponse<Unit>> {
        self.list("/budget-units", query).await
    }
}

