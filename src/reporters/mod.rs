pub mod summary;
pub mod writer;
