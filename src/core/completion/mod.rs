//! Chat completion coordination

mod coordinator;


pub use coordinator::{ChatReply, RequestCoordinator};
