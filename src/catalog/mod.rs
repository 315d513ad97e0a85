//! Catalog domain: products, categories, companies and per-store prices.
//!
//! Each submodule pairs a row model with a Postgres-backed service. Services
//! speak `sqlx::Error`; handlers translate missing rows and conflicts into
//! API errors.

pub mod category;
pub mod company;
pub mod product;
pub mod store;

pub use category::{Category, CategoryService};
pub use company::{Company, CompanyPatch, CompanyService, NewCompany};
pub use product::{NewProduct, Product, ProductPatch, ProductService};
pub use store::{NewStoreEntry, StoreEntry, StoreEntryPatch, StoreService};
