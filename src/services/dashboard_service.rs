use async_trait::async_trait;

use crate::{
    dashboard::{Dashboard, DashboardOverview, DashboardSource},
    models::{Order, Product},
    services::{order_service, product_service},
    state::AppState,
};

#[async_trait]
impl DashboardSource for AppState {
    async fn fetch_orders(&self) -> anyhow::Result<Vec<Order>> {
        Ok(order_service::list_orders(self).await?)
    }

    async fn fetch_products(&self) -> anyhow::Result<Vec<Product>> {
        Ok(product_service::list_all_products(self).await?)
    }
}

pub async fn overview(state: &AppState) -> DashboardOverview {
    Dashboard::new(state.clone()).overview().await
}
