pub mod archive;
pub mod migrate;
