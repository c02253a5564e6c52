pub mod app;
pub mod columns;
pub mod input;
pub mod layout;
pub mod render;
pub mod rows;
