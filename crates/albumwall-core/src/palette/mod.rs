//! The frozen image set the wall cycles through

mod demo;
mod loader;

use std::ops::Deref;
use std::sync::Arc;

pub use demo::demo_palette;
pub use loader::{is_supported_image, load_tiles, load_tiles_blocking};

use crate::{Error, Result};

/// Immutable, ordered, non-empty snapshot of images
///
/// Built once when the animation starts; cloning shares the same storage.
#[derive(Debug)]
pub struct Palette<I> {
    images: Arc<[I]>,
}

impl<I> Palette<I> {
    /// Freeze `images` into a palette. Fails on an empty list.
    pub fn freeze(images: Vec<I>) -> Result<Self> {
        if images.is_empty() {
            return Err(Error::EmptyPalette);
        }
        Ok(Self {
            images: images.into(),
        })
    }

    pub fn as_slice(&self) -> &[I] {
        &self.images
    }
}

impl<I> Clone for Palette<I> {
    fn clone(&self) -> Self {
        Self {
            images: Arc::clone(&self.images),
        }
    }
}

impl<I> Deref for Palette<I> {
    type Target = [I];

    fn deref(&self) -> &[I] {
        &self.images
    }
}
