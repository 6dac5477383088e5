//! Shared primitive types used across the entire engine.

/// A stable, unique identifier for a store.
pub type StoreId = String;

/// A stable, unique identifier for a partner brand.
pub type BrandId = String;

/// A stable, unique identifier for a product category.
pub type CategoryId = String;
