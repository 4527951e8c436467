pub mod config;
pub mod errors;
pub mod hmc;
pub mod provider;
pub mod store;
