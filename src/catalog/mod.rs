pub mod navigator;
pub mod pagination;
pub mod stream;

/// Listing pages show this many anime
pub const PAGE_SIZE: usize = 10;
