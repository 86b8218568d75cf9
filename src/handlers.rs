pub mod auth;
pub mod catalog;
pub mod products;
pub mod promotions;
pub mod uploads;
pub mod users;
