//! Typed HTTP client for the storefront REST API.
//!
//! Reads return the bare JSON bodies the server sends. Any non-2xx response becomes
//! [`ClientError::Status`] carrying the raw body, so callers can surface the server's message.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    catalog::CatalogPage,
    dashboard::{DashboardOverview, DashboardSource},
    dto::{
        categories::{
            CreateCategoryRequest, CreateSubcategoryRequest, DeleteResult, UpdateCategoryRequest,
            UpdateSubcategoryRequest,
        },
        orders::PlaceOrderRequest,
        products::{CreateProductRequest, DeleteProductResult, UpdateProductRequest},
    },
    models::{Category, Order, Product, Subcategory},
    response::ApiResponse,
    routes::{
        health::HealthData,
        params::{CatalogParams, ProductListQuery, SearchQuery},
    },
};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("http transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Clone)]
pub struct StorefrontClient {
    http: reqwest::Client,
    base_url: String,
}

impl StorefrontClient {
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        let http = reqwest::Client::builder().timeout(DEFAULT_TIMEOUT).build()?;
        Ok(Self::with_client(http, base_url))
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            tracing::warn!(%status, "storefront api returned an error status");
            return Err(ClientError::Status { status, body });
        }
        Ok(serde_json::from_str(&body)?)
    }

    pub async fn health(&self) -> ClientResult<ApiResponse<HealthData>> {
        self.send(self.http.get(self.url("/health"))).await
    }

    pub async fn list_products(&self, query: &ProductListQuery) -> ClientResult<Vec<Product>> {
        self.send(self.http.get(self.url("/api/products")).query(query))
            .await
    }

    /// `Ok(None)` when the server answers 404.
    pub async fn get_product(&self, id: Uuid) -> ClientResult<Option<Product>> {
        let request = self.http.get(self.url(&format!("/api/products/{id}")));
        match self.send(request).await {
            Ok(product) => Ok(Some(product)),
            Err(ClientError::Status {
                status: StatusCode::NOT_FOUND,
                ..
            }) => Ok(None),
            Err(err) => Err(err),
        }
    }

    pub async fn create_product(&self, payload: &CreateProductRequest) -> ClientResult<Product> {
        self.send(self.http.post(self.url("/api/products")).json(payload))
            .await
    }

    pub async fn update_product(
        &self,
        id: Uuid,
        payload: &UpdateProductRequest,
    ) -> ClientResult<Product> {
        let request = self
            .http
            .put(self.url(&format!("/api/products/{id}")))
            .json(payload);
        self.send(request).await
    }

    pub async fn delete_product(&self, id: Uuid) -> ClientResult<ApiResponse<DeleteProductResult>> {
        self.send(self.http.delete(self.url(&format!("/api/products/{id}"))))
            .await
    }

    pub async fn list_categories(&self) -> ClientResult<Vec<Category>> {
        self.send(self.http.get(self.url("/api/categories"))).await
    }

    pub async fn create_category(&self, payload: &CreateCategoryRequest) -> ClientResult<Category> {
        self.send(self.http.post(self.url("/api/categories")).json(payload))
            .await
    }

    pub async fn get_category(&self, id: Uuid) -> ClientResult<Category> {
        self.send(self.http.get(self.url(&format!("/api/categories/{id}"))))
            .await
    }

    pub async fn update_category(
        &self,
        id: Uuid,
        payload: &UpdateCategoryRequest,
    ) -> ClientResult<Category> {
        let request = self
            .http
            .put(self.url(&format!("/api/categories/{id}")))
            .json(payload);
        self.send(request).await
    }

    pub async fn delete_category(&self, id: Uuid) -> ClientResult<ApiResponse<DeleteResult>> {
        self.send(self.http.delete(self.url(&format!("/api/categories/{id}"))))
            .await
    }

    pub async fn create_subcategory(
        &self,
        category_id: Uuid,
        payload: &CreateSubcategoryRequest,
    ) -> ClientResult<Subcategory> {
        let request = self
            .http
            .post(self.url(&format!("/api/categories/{category_id}/subcategories")))
            .json(payload);
        self.send(request).await
    }

    pub async fn get_subcategory(&self, id: Uuid) -> ClientResult<Subcategory> {
        self.send(self.http.get(self.url(&format!("/api/subcategories/{id}"))))
            .await
    }

    pub async fn update_subcategory(
        &self,
        id: Uuid,
        payload: &UpdateSubcategoryRequest,
    ) -> ClientResult<Subcategory> {
        let request = self
            .http
            .put(self.url(&format!("/api/subcategories/{id}")))
            .json(payload);
        self.send(request).await
    }

    pub async fn delete_subcategory(&self, id: Uuid) -> ClientResult<ApiResponse<DeleteResult>> {
        self.send(self.http.delete(self.url(&format!("/api/subcategories/{id}"))))
            .await
    }

    pub async fn list_orders(&self) -> ClientResult<Vec<Order>> {
        self.send(self.http.get(self.url("/api/orders"))).await
    }

    pub async fn place_order(
        &self,
        payload: &PlaceOrderRequest,
    ) -> ClientResult<ApiResponse<Order>> {
        self.send(self.http.post(self.url("/api/orders")).json(payload))
            .await
    }

    pub async fn search(&self, q: &str) -> ClientResult<Vec<Product>> {
        let query = SearchQuery {
            q: Some(q.to_string()),
        };
        self.send(self.http.get(self.url("/api/search")).query(&query))
            .await
    }

    pub async fn catalog(&self, params: &CatalogParams) -> ClientResult<CatalogPage> {
        self.send(self.http.get(self.url("/api/catalog")).query(params))
            .await
    }

    pub async fn dashboard(&self) -> ClientResult<DashboardOverview> {
        self.send(self.http.get(self.url("/api/dashboard"))).await
    }
}

#[async_trait]
impl DashboardSource for StorefrontClient {
    async fn fetch_orders(&self) -> anyhow::Result<Vec<Order>> {
        Ok(self.list_orders().await?)
    }

    async fn fetch_products(&self) -> anyhow::Result<Vec<Product>> {
        Ok(self.list_products(&ProductListQuery::every_status()).await?)
    }
}
