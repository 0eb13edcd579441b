pub mod item;
mod lenient;

pub use item::*;
