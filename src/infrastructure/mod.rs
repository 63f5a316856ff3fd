pub mod cart_repo;
pub mod catalog_repo;
pub mod models;
pub mod order_numbers;
pub mod order_repo;
pub mod payment_gateway;
