use utoipa::{OpenApi, openapi::OpenApi as OpenApiSpec};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    catalog::{CatalogPage, CatalogQuery, SortMode},
    dashboard::{
        CategoryShare, DashboardOverview, DashboardStats, MonthlySales, RecentOrder, TopProduct,
    },
    dto::{
        categories::{
            CreateCategoryRequest, CreateSubcategoryRequest, DeleteResult, UpdateCategoryRequest,
            UpdateSubcategoryRequest,
        },
        orders::{CheckoutCustomer, CheckoutItem, OrderPricing, PlaceOrderRequest},
        products::{CreateProductRequest, DeleteProductResult, UpdateProductRequest},
    },
    models::{
        Category, Customer, Order, OrderItem, OrderStatus, PaymentStatus, Product, ProductCategory,
        ProductStatus, Subcategory,
    },
    response::ApiResponse,
    routes::{categories, dashboard, health, orders, products, search, subcategories},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        products::list_products,
        products::create_product,
        products::get_product,
        products::update_product,
        products::delete_product,
        categories::list_categories,
        categories::create_category,
        categories::get_category,
        categories::update_category,
        categories::delete_category,
        categories::create_subcategory,
        subcategories::get_subcategory,
        subcategories::update_subcategory,
        subcategories::delete_subcategory,
        orders::list_orders,
        orders::place_order,
        search::search_products,
        search::catalog,
        dashboard::overview
    ),
    components(
        schemas(
            Product,
            ProductCategory,
            ProductStatus,
            Category,
            Subcategory,
            Order,
            OrderItem,
            OrderStatus,
            PaymentStatus,
            Customer,
            CreateProductRequest,
            UpdateProductRequest,
            DeleteProductResult,
            CreateCategoryRequest,
            UpdateCategoryRequest,
            CreateSubcategoryRequest,
            UpdateSubcategoryRequest,
            DeleteResult,
            PlaceOrderRequest,
            CheckoutCustomer,
            CheckoutItem,
            OrderPricing,
            CatalogQuery,
            CatalogPage,
            SortMode,
            DashboardOverview,
            DashboardStats,
            MonthlySales,
            CategoryShare,
            TopProduct,
            RecentOrder,
            health::HealthData,
            ApiResponse<health::HealthData>,
            ApiResponse<DeleteProductResult>,
            ApiResponse<DeleteResult>,
            ApiResponse<Order>
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Products", description = "Product endpoints"),
        (name = "Categories", description = "Category endpoints"),
        (name = "Orders", description = "Order endpoints"),
        (name = "Catalog", description = "Search and catalog listing"),
        (name = "Dashboard", description = "Admin dashboard aggregates"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
