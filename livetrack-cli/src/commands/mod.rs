//! CLI command implementations.
//!
//! - [`serve`] - run the tracking API
//! - [`init_config`] - write a commented default config file

pub mod init_config;
pub mod serve;
