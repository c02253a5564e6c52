pub mod atlases;
pub mod config;
pub mod search;
pub mod view;
