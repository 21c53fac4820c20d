// src/lib.rs

pub mod config;
pub mod logging;
pub mod models;
pub mod hierarchy;
pub mod events;
pub mod directory_service;
pub mod web;
pub mod cli;

pub use hierarchy::{apply_leaf_cap, build_hierarchy, compute_container_stats, filter_hierarchy};
pub use directory_service::{DirectoryError, DirectoryService};
