// Path planning algorithms module

pub mod prrt;

pub use prrt::*;
