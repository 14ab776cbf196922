//! Library for turning an SVG image into multi-resolution Windows (.ico) and
//! Apple (.icns) icon files.
//!
//! Each container is built from a fixed table of sizes: the source is
//! rendered once per entry through a shared [`Rasterizer`], the PNG results
//! are laid out in the container's binary format, and the finished file is
//! written atomically.
//!
//! ```no_run
//! use std::path::Path;
//! use svg2icon::Rasterizer;
//!
//! let rasterizer: Rasterizer = Rasterizer::new();
//! let source = Path::new("logo.svg");
//! svg2icon::build_ico(&rasterizer, source, Path::new("logo.ico"))?;
//! svg2icon::build_icns(&rasterizer, source, Path::new("logo.icns"))?;
//! # Ok::<(), svg2icon::Error>(())
//! ```
//!
//! See https://en.wikipedia.org/wiki/ICO_(file_format) and
//! https://en.wikipedia.org/wiki/Apple_Icon_Image_format for more
//! information about the file formats.

#![warn(missing_docs)]

mod build;
mod element;
mod error;
mod family;
mod ico;
mod icontype;
mod image;
mod output;
mod pngio;
mod raster;
mod sizes;
mod writer;

pub use self::build::{build_icns, build_ico, encode_icns, encode_ico};
pub use self::element::IconElement;
pub use self::error::{Error, RenderError};
pub use self::family::IconFamily;
pub use self::ico::{IcoContainer, IcoDirectoryEntry};
pub use self::icontype::{IconType, OSType};
pub use self::image::RasterImage;
pub use self::output::write_atomic;
pub use self::pngio::{read_png_dimensions, write_rgba_png};
pub use self::raster::{Engine, Rasterizer, SvgEngine};
pub use self::sizes::{Format, SizeSpec, ICNS_SIZES, ICO_SIZES};
pub use self::writer::ByteWriter;
