//! Product table definition library
//!
//! Turns declarative table definitions into rendered product tables:
//! normalize raw definitions, resolve the item source against a catalog,
//! run request-time features, render cells and compile the style.

pub mod catalog;
pub mod error;
pub mod export;
pub mod html;
pub mod model;
pub mod normalize;
pub mod orchestrator;
pub mod pipeline;
pub mod render;
pub mod source;
pub mod store;
pub mod style;

pub use error::Error;
pub use orchestrator::Mode;
pub use orchestrator::Orchestrator;
pub use orchestrator::RenderedOutput;
