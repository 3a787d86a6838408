//! `pons-topology` — contact plans and network plans for PONS.
//!
//! # What lives here
//!
//! | Module          | Contents                                         |
//! |-----------------|----------------------------------------------------|
//! | [`contact`]      | `Contact` value type                              |
//! | [`contact_plan`] | `ContactPlan` trait, `CoreContactPlan`            |
//! | [`plan_formats`] | Core line / ION / CSV / JSON loaders              |
//! | [`network_plan`] | `NetworkPlan` — static graph + optional contact plan |
//! | [`error`]        | `TopologyError`, `TopologyResult`                 |

pub mod contact;
pub mod contact_plan;
pub mod error;
pub mod network_plan;
pub mod plan_formats;

#[cfg(test)]
mod tests;

pub use contact::{Contact, UNBOUNDED_BW_SECS_PER_BYTE};
pub use contact_plan::{ContactPlan, CoreContactPlan};
pub use error::{TopologyError, TopologyResult};
pub use network_plan::{LinkProps, NetworkPlan};
