// MineGPT backend
// Canned mining knowledge, upload analysis and mock payments over HTTP.

pub mod analysis;
pub mod api;
pub mod backend;
pub mod brain;
pub mod config;
pub mod error;
pub mod history;
pub mod models;
pub mod payment;
pub mod rate_limiter;
pub mod store;
pub mod validators;

#[cfg(test)]
mod tests;
