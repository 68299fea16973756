pub mod metadata;
pub mod mining;
pub mod models;
pub mod pipeline;
pub mod utils;
