//! `pons-node` — node identity, interfaces, neighbour computation and
//! send/recv eligibility glue for PONS.
//!
//! # What lives here
//!
//! | Module           | Contents                                     |
//! |-------------------|-----------------------------------------------|
//! | [`node`]          | `Node`, `SendAttempt`/`SendOutcome`, `calc_neighbors`/`send_plan` |
//! | [`interface`]     | `Interface`, `InterfaceKind`, `NeighborSet`   |
//! | [`table`]         | `NodeTable` — the simulator's node arena       |
//! | [`router_handle`] | `RouterHandle` — index into the router arena   |
//! | [`error`]         | `NodeError`, `NodeResult`                      |
//!
//! `pons-node` depends only on `pons-core` and `pons-topology`: it decides
//! *who* is eligible to receive a message and *how long* the transfer would
//! take, but never touches a `Message`, a `MessageStore`, or the scheduler —
//! those live one layer up, in `pons-router`/`pons-sim`, which resolve a
//! `RouterHandle` against their own arena rather than this crate holding a
//! back-pointer.
//!
//! # Feature flags
//!
//! | Flag            | Effect                                                |
//! |------------------|--------------------------------------------------------|
//! | `parallel`       | `calc_neighbors` may be driven across all nodes via `rayon` by the caller (pons-sim); this crate only requires its inputs be `Sync`. |
//! | `spatial-index`  | (reserved) back large proximity populations with `rstar` instead of an O(n²) scan. |

pub mod error;
pub mod interface;
pub mod node;
pub mod router_handle;
pub mod table;

#[cfg(test)]
mod tests;

pub use error::{NodeError, NodeResult};
pub use interface::{Interface, InterfaceKind, NeighborSet};
pub use node::{Node, SendAttempt, SendOutcome};
pub use router_handle::RouterHandle;
pub use table::NodeTable;
