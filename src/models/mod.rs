pub mod crush;

pub use crush::{Crush, CrushInput, DateRecord};
