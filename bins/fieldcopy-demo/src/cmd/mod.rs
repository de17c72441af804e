pub mod batch;
pub mod config;
pub mod copy;
pub mod domain;
pub mod error;
pub mod plan;
