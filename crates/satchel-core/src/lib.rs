pub mod archive;
pub mod config;
pub mod error;
pub mod platform;
pub mod providers;
pub mod remote;
pub mod retention;
pub mod stage;
pub mod util;

#[cfg(test)]
mod testutil;
