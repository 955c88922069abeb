pub mod connections;
pub mod ticker;
