pub mod feature;
pub mod label;
pub mod log;
pub mod structural;
pub mod summary;
