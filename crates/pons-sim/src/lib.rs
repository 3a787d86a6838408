//! `pons-sim` — message generators and the `Simulator` facade tying every
//! PONS crate together.
//!
//! # What lives here
//!
//! | Module          | Contents                                          |
//! |-----------------|------------------------------------------------------|
//! | [`world`]        | `World` — the simulator's shared state arena       |
//! | [`tasks`]        | `RouterScanTask`, `AppTickTask`, delivery plumbing  |
//! | [`generators`]   | `GeneratorConfig`, `GeneratorKind`, `GeneratorTask` |
//! | [`stats`]        | `NetStats`, `RoutingStats`, `DerivedStats`          |
//! | [`observer`]     | `SimEvent`, `SimObserver`, `NoopObserver`           |
//! | [`builder`]      | `SimulatorBuilder`                                  |
//! | [`simulator`]    | `Simulator` — the chunked pump loop                 |
//! | [`error`]        | `SimError`, `SimResult`                             |
//!
//! `pons-sim` is the one crate in the workspace allowed to depend on every
//! other `pons-*` crate: it resolves `RouterHandle`s against a router arena,
//! turns `Node::send_plan` outcomes into scheduled deliveries, and drains
//! applications' queued replies back into newly originated messages. Every
//! scheduler task shares simulator state through an `Rc<RefCell<World>>`
//! rather than owning a slice of it directly, since `pons_sched::Task::resume`
//! only ever hands a task `&mut Scheduler`.

pub mod builder;
pub mod error;
pub mod generators;
pub mod observer;
pub mod simulator;
pub mod stats;
pub mod tasks;
pub mod world;

#[cfg(test)]
mod tests;

pub use builder::SimulatorBuilder;
pub use error::{SimError, SimResult};
pub use generators::{GeneratorConfig, GeneratorKind, GeneratorTask};
pub use observer::{NoopObserver, SimEvent, SimObserver};
pub use simulator::Simulator;
pub use stats::{DerivedStats, NetStats, RoutingStats};
pub use tasks::{AppTickTask, RouterScanTask};
pub use world::{PendingDelivery, World};
