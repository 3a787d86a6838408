//! `pons-app` — the application interface and service-port dispatch context
//! for PONS.
//!
//! # What lives here
//!
//! | Module          | Contents                                  |
//! |-----------------|----------------------------------------------|
//! | [`application`] | `Application` trait                        |
//! | [`context`]     | `AppContext`, `OutgoingMessage`            |
//! | [`ping`]        | `PingApp` — example request/response app   |
//! | [`error`]       | `AppError`, `AppResult`                    |
//!
//! `pons-app` depends only on `pons-core` and `pons-message`: applications
//! never touch the scheduler, a `Router`, or another node directly — they
//! queue [`context::OutgoingMessage`]s that the simulator facade turns into
//! real messages via the owning router, the same path a message generator
//! uses.

pub mod application;
pub mod context;
pub mod error;
pub mod ping;


pub use application::Application;
pub use context::{AppContext, OutgoingMessage};
pub use error::{AppError, AppResult};
pub use ping::PingApp;
