mod cache;
pub mod value;

pub use cache::MemCache;
