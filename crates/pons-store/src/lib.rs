//! `pons-store` — the capacity-bounded message buffer backing every router.
//!
//! # What lives here
//!
//! | Module           | Contents                              |
//! |------------------|-----------------------------------------|
//! | [`message_store`] | `MessageStore`                        |
//! | [`drop_reason`]   | `DropReason`                          |
//! | [`error`]         | `StoreError`, `StoreResult`            |

pub mod drop_reason;
pub mod error;
pub mod message_store;


pub use drop_reason::DropReason;
pub use error::{StoreError, StoreResult};
pub use message_store::MessageStore;
