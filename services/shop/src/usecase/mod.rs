pub mod address;
pub mod auth;
pub mod cart;
pub mod order;
pub mod product;
pub mod user;
