pub mod filter;

pub use filter::BranchFilter;
