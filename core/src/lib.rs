#![no_std]

extern crate alloc;

pub use card::*;
pub use deck::*;
pub use engine::*;
pub use error::*;
pub use event::*;
pub use preset::*;
pub use symbols::*;
pub use types::*;

mod card;
mod deck;
mod engine;
mod error;
mod event;
mod preset;
mod symbols;
mod types;
