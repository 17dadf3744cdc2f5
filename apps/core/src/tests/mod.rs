//! Test Module
//!
//! Cross-module test suite for the MineGPT backend.
//!
//! ## Test Categories
//! - `brain_tests`: intent classification and response resolution per domain
//! - `analysis_tests`: upload classification, CSV and JSON sniffing
//! - `store_tests`: SQLite store, chat history and payment orders
//! - `backend_tests`: proxy client against a mock chat backend
//! - `api_tests`: HTTP routes driven through the router

pub mod brain_tests;
pub mod store_tests;
