// Library for tests to access modules

pub mod config;
pub mod counters;
pub mod cursor;
pub mod engine;
pub mod models;
pub mod rate;
pub mod routes;
pub mod version;
