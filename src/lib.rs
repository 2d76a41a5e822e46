//! Bodega
//!
//! Bodega is the core of a small e-commerce platform: slug generation,
//! hierarchical menu management, per-session carts, cart-to-order
//! materialization, and best-effort order notifications through external
//! messaging integrations.

pub mod cart;
pub mod catalog;
pub mod integrations;
pub mod menu;
pub mod notify;
pub mod orders;
pub mod prelude;
pub mod slug;
