//! Scanned answer-sheet image type

use std::path::{Path, PathBuf};

use anyhow::Context;
use image::{Rgba, RgbaImage};

/// Placeholder dimensions used when a sheet cannot be loaded
pub const PLACEHOLDER_WIDTH: u32 = 800;
pub const PLACEHOLDER_HEIGHT: u32 = 600;

/// A scanned sheet page, or the placeholder standing in for one
#[derive(Clone, Debug)]
pub struct SheetImage {
    pub rgba: RgbaImage,
    /// True when the real image failed to load
    pub placeholder: bool,
}

impl SheetImage {
    /// Decode a sheet image from disk
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let rgba = image::open(path)
            .with_context(|| format!("loading sheet image {}", path.display()))?
            .to_rgba8();
        log::debug!(
            "SheetImage loaded: {}x{} pixels from {}",
            rgba.width(),
            rgba.height(),
            path.display()
        );
        Ok(Self {
            rgba,
            placeholder: false,
        })
    }

    /// Decode a sheet image, substituting the placeholder on failure
    pub fn load_or_placeholder(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|err| {
            log::warn!("{:?}; showing placeholder", err);
            Self::placeholder()
        })
    }

    /// Flat grey page shown in place of an unavailable scan
    pub fn placeholder() -> Self {
        Self {
            rgba: RgbaImage::from_pixel(
                PLACEHOLDER_WIDTH,
                PLACEHOLDER_HEIGHT,
                Rgba([0x6b, 0x72, 0x80, 0xff]),
            ),
            placeholder: true,
        }
    }

    /// Get the width of the image
    pub fn width(&self) -> u32 {
        self.rgba.width()
    }

    /// Get the height of the image
    pub fn height(&self) -> u32 {
        self.rgba.height()
    }
}

/// Supplies scanned sheet images per workbook page
pub trait ImageSource {
    /// Location of the scan for a 1-based page, if the source knows one
    fn page_path(&self, workbook_id: &str, page: u32) -> Option<PathBuf>;

    /// Load a page, falling back to the placeholder when it is missing or unreadable
    fn load_page(&self, workbook_id: &str, page: u32) -> SheetImage {
        match self.page_path(workbook_id, page) {
            Some(path) => SheetImage::load_or_placeholder(&path),
            None => {
                log::warn!("No scan for {workbook_id} page {page}; showing placeholder");
                SheetImage::placeholder()
            }
        }
    }
}

/// Scans laid out as `<root>/<workbook_id>/page-<n>.png`
#[derive(Clone, Debug)]
pub struct DirectoryImageSource {
    root: PathBuf,
}

impl DirectoryImageSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ImageSource for DirectoryImageSource {
    fn page_path(&self, workbook_id: &str, page: u32) -> Option<PathBuf> {
        Some(
            self.root
                .join(workbook_id)
                .join(format!("page-{page}.png")),
        )
    }
}

/// Explicit list of scans, page 1 first
#[derive(Clone, Debug, Default)]
pub struct PageListSource {
    pages: Vec<PathBuf>,
}

impl PageListSource {
    pub fn new(pages: Vec<PathBuf>) -> Self {
        Self { pages }
    }
}

impl ImageSource for PageListSource {
    fn page_path(&self, _workbook_id: &str, page: u32) -> Option<PathBuf> {
        let index = usize::try_from(page).ok()?.checked_sub(1)?;
        self.pages.get(index).cloned()
    }
}
