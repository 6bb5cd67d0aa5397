//! Resource loaders
//!
//! Game documents go to the embedding surface; covers resolve to an image source.

mod content;
mod cover;

pub use content::{ContentLoader, LoadState};
pub use cover::{CoverImage, ImageLoader};
