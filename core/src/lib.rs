#![no_std]

extern crate alloc;

pub use analysis::*;
pub use board::*;
pub use bonus::*;
pub use cell::*;
pub use config::*;
pub use deck::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use rules::*;
pub use schedule::*;
pub use session::*;
pub use types::*;

mod analysis;
mod board;
mod bonus;
mod cell;
mod config;
mod deck;
mod engine;
mod error;
mod generator;
mod rules;
mod schedule;
mod session;
mod types;
