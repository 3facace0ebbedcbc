pub mod config;
pub mod logging;

pub mod archive;
pub mod downloader;
pub mod error;
pub mod gallery;
pub mod html;
pub mod http;
pub mod index;
pub mod page;
pub mod retry;
pub mod storage;
pub mod traversal;
pub mod url_model;

pub use error::GalleryError;
pub use gallery::{download_galleries, download_gallery, BatchReport, GalleryOptions, GalleryOutcome};
