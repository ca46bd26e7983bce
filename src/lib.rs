//! Campus Cart
//!
//! Rental cart for a campus marketplace: a reducer-driven cart state, local
//! snapshots keyed by identity, best-effort sync with the marketplace's
//! remote cart, and the hydration state machine that ties them together
//! across login and logout.

pub mod cart;
pub mod hydration;
pub mod identity;
pub mod items;
pub mod observer;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod remote;
pub mod snapshot;
pub mod storage;
pub mod store;
pub mod sync;
