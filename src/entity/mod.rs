pub mod categories;
pub mod customers;
pub mod order_items;
pub mod orders;
pub mod products;
pub mod subcategories;

pub use categories::Entity as Categories;
pub use customers::Entity as Customers;
pub use order_items::Entity as OrderItems;
pub use orders::Entity as Orders;
pub use products::Entity as Products;
pub use subcategories::Entity as Subcategories;
