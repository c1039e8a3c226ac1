//! Core data models shared by adapters, the reply flow and storage

pub mod context;
pub mod persona;
pub mod platform;
pub mod request;
pub mod settings;

pub use context::*;
pub use persona::*;
pub use platform::*;
pub use request::*;
pub use settings::*;
