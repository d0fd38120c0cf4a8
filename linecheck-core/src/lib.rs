#![allow(clippy::cargo_common_metadata)]

pub mod config;
pub mod error;
pub mod ledger;
