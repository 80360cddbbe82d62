//! Record contracts for the order fulfilment network
//!
//! Four record families share one world state and are told apart by their
//! `docType`:
//! - [`order`]: customer orders with a mutable status and feedback
//! - [`payment`]: payments against an order, immutable once made
//! - [`product`]: catalogue entries with logistics parameters
//! - [`route`]: delivery routes with an estimated arrival
//!
//! Each family is a thin parameterization of
//! [`recordcore::RecordContract`]; the contracts only compose records and
//! pick the event names.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod order;
pub mod payment;
pub mod product;
pub mod route;

pub use order::{NewOrder, Order, OrderContract, OrderEvent};
pub use payment::{NewPayment, Payment, PaymentContract, PaymentEvent};
pub use product::{NewProduct, Product, ProductContract, ProductEvent, ProductUpdate};
pub use route::{NewRoute, Route, RouteContract, RouteEvent, RouteUpdate};

/// Placeholder written to `UpdateTimeStamp` until the first update.
pub const NEVER_UPDATED: &str = "none";
