//! Basic types shared by valink crates.

mod data;

pub use crate::data::Data;
