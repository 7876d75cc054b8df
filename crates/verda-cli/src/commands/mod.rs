pub mod catalog;
pub mod rate;
