pub use super::orders::Entity as Orders;
pub use super::orders_pack_orders::Entity as OrdersPackOrders;
pub use super::orders_packs::Entity as OrdersPacks;
pub use super::user_orders::Entity as UserOrders;
pub use super::users::Entity as Users;
