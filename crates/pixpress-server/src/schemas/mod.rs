pub mod common;
pub mod compress;
