pub mod auth;
pub mod catalog;
pub mod product;
pub mod promotion;
pub mod rbac;
pub mod upload;
