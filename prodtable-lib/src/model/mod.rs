//! Typed models

mod column;
mod definition;
mod item;
mod money;
mod settings;
mod source;
mod style;
mod value;

pub use column::*;
pub use definition::*;
pub use item::*;
pub use money::*;
pub use settings::*;
pub use source::*;
pub use style::*;
pub use value::*;
