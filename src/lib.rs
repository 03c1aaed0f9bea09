pub mod catalog;
pub mod config;
pub mod loadout;
pub mod output;
pub mod recommend;
pub mod server;
pub mod store;
