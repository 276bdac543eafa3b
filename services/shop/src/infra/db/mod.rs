//! sea-orm adapters for the repository ports.

mod address;
mod cart;
mod order;
mod product;
mod user;

pub use address::DbAddressRepository;
pub use cart::DbCartRepository;
pub use order::DbOrderRepository;
pub use product::DbProductRepository;
pub use user::DbUserRepository;
