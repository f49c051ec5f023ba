pub mod keywords;
pub mod posts;
pub mod session;
pub mod stats;
