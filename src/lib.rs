//! Festival backend: bilingual (English/Hindi) festival content served as JSON.

pub mod config;
pub mod error;
pub mod i18n;
pub mod routes;
pub mod security;
pub mod store;
