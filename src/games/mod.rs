pub mod number_guess;
pub mod resolver;
pub mod slots;
pub mod types;

pub use types::*;
pub use resolver::{GameResolver, SettledGame};
