//! Storefront services.
//!
//! Session bookkeeping, checkout orchestration, and the payment gateway
//! handoff. Routes stay thin; anything with rules worth testing lives here.

pub mod checkout;
pub mod esewa;
pub mod session;
