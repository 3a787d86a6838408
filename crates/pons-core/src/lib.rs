//! `pons-core` — foundational types for the PONS opportunistic-network simulator.
//!
//! This crate is a dependency of every other `pons-*` crate. It intentionally
//! has no `pons-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module       | Contents                                  |
//! |--------------|--------------------------------------------|
//! | [`ids`]      | `NodeId`, `EdgeId`, `BROADCAST_ADDR`       |
//! | [`position`] | `Position`, Euclidean proximity            |
//! | [`time`]     | `SimTime`, `SimClock`, `SimConfig`         |
//! | [`rng`]      | `NodeRng` (per-node), `SimRng` (global)    |
//! | [`error`]    | `CoreError`, `CoreResult`                  |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                              |
//! |---------|------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types. |

pub mod error;
pub mod ids;
pub mod position;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use ids::{EdgeId, NodeId, BROADCAST_ADDR};
pub use position::Position;
pub use rng::{NodeRng, SimRng};
pub use time::{RealtimeConfig, SimClock, SimConfig, SimTime};
