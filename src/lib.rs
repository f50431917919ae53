pub mod app;
pub mod arxiv;
pub mod config;
pub mod domain;
pub mod error;
pub mod feed;
pub mod fetcher;
pub mod merge;
pub mod normalize;
pub mod pacing;
pub mod store;
