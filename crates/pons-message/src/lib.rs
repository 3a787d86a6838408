//! `pons-message` — the message record and the scalar-or-range config type
//! shared by every generator and policy in a PONS simulation.
//!
//! # What lives here
//!
//! | Module           | Contents                                   |
//! |------------------|---------------------------------------------|
//! | [`message`]       | `Message`, `Payload`, `unique_id`, `is_expired` |
//! | [`metadata`]      | `MessageMetadata`                          |
//! | [`value_or_range`]| `ValueOrRange<T>`, `Sample`                |
//! | [`error`]         | `MessageError`, `MessageResult`            |

pub mod error;
pub mod message;
pub mod metadata;
pub mod value_or_range;


pub use error::{MessageError, MessageResult};
pub use message::{Message, Payload};
pub use metadata::MessageMetadata;
pub use value_or_range::{Sample, ValueOrRange};
