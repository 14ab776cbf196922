use resvg::usvg;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// A failure to rasterize the source image at one size.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The rendering engine could not be initialized.  Every call made
    /// through the same rasterizer reports this once initialization failed.
    #[error("the rendering engine is unavailable: {0}")]
    EngineUnavailable(String),

    /// A size of zero pixels was requested.
    #[error("cannot render an image with a size of zero pixels")]
    ZeroSize,

    /// The source file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// The file that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The source file is not a valid SVG document.
    #[error("failed to parse SVG: {0}")]
    Parse(#[from] usvg::Error),

    /// A pixmap of the requested size could not be allocated.
    #[error("the pixmap dimensions are invalid: {width}x{height}")]
    InvalidPixmap {
        /// Requested width, in pixels.
        width: u32,
        /// Requested height, in pixels.
        height: u32,
    },

    /// The rendered pixels could not be encoded as PNG.
    #[error("failed to encode PNG: {0}")]
    Encode(#[source] io::Error),

    /// Any other engine-specific failure.
    #[error("{0}")]
    Engine(String),
}

/// A failed container build.
#[derive(Error, Debug)]
pub enum Error {
    /// Rasterization failed for one of the required sizes.
    #[error("failed to render {pixel_size}x{pixel_size} image: {source}")]
    Render {
        /// The pixel size that was being rendered.
        pixel_size: u32,
        /// Why rendering failed.
        #[source]
        source: RenderError,
    },

    /// The size table asks for something the container cannot hold.  This
    /// never happens with the built-in tables.
    #[error("invalid container configuration: {0}")]
    Configuration(String),

    /// Writing the finished container failed; the destination is untouched.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        /// The destination that was being written.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl Error {
    pub(crate) fn configuration(msg: impl Into<String>) -> Error {
        Error::Configuration(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_error_names_the_size() {
        let err = Error::Render {
            pixel_size: 48,
            source: RenderError::ZeroSize,
        };
        assert!(err.to_string().contains("48x48"));
    }

    #[test]
    fn write_error_names_the_path() {
        let err = Error::Write {
            path: PathBuf::from("out/app.ico"),
            source: io::Error::other("disk full"),
        };
        let msg = err.to_string();
        assert!(msg.contains("out/app.ico"));
        assert!(msg.contains("disk full"));
    }
}
