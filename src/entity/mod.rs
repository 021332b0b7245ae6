pub mod admin_users;
pub mod orders;
pub mod products;
