pub mod common;
pub mod config;
pub mod heatmap;
pub mod meeting;
pub mod participant;
pub mod respond;
pub mod suggest;
