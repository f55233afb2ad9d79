pub mod entries;
pub mod host;
