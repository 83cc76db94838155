pub mod error;
pub mod order;
pub mod orders_pack;
pub mod user;
