//! Domain and wire types for the API.
//!
//! Read types never carry a password field, so no response can leak one.

pub mod cart;
pub mod order;
pub mod product;
pub mod promo_code;
pub mod user;

pub use cart::{CartItem, CartItemRequest, CartLine};
pub use order::{Order, OrderLine, OrderSummary};
pub use product::Product;
pub use promo_code::PromoCode;
pub use user::{CurrentUser, NewUser, UserProfile, UserUpdate};
