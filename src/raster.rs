//! The rasterization port: a shared, lazily initialized rendering engine
//! behind a lock.

use parking_lot::Mutex;
use resvg::{tiny_skia, usvg};
use std::fs;
use std::path::Path;
use std::sync::{Arc, OnceLock};
use tracing::{debug, error, trace};

use super::error::RenderError;
use super::pngio;

/// Held for the duration of every render, across all rasterizers.
static RENDER_LOCK: Mutex<()> = Mutex::new(());

/// A rendering engine that turns a vector document into a square PNG.
///
/// Implementations need not be reentrant: no two renders run at the same
/// time anywhere in the process, whichever [`Rasterizer`] they go through.
pub trait Engine: Send {
    /// Creates the engine.  Called at most once per rasterizer, on first use.
    fn initialize() -> Result<Self, RenderError>
    where
        Self: Sized;

    /// Renders the document at `source` into a PNG of exactly
    /// `pixel_size` x `pixel_size` pixels.  Must be deterministic.
    fn render(&mut self, source: &Path, pixel_size: u32)
              -> Result<Vec<u8>, RenderError>;
}

/// Owns one engine and serializes every render call through a process-wide
/// lock.
///
/// Create one rasterizer per process and share it by reference between all
/// builds, including builds running on different threads.  Separate
/// rasterizers still take turns.
pub struct Rasterizer<E: Engine = SvgEngine> {
    engine: OnceLock<Result<Mutex<E>, String>>,
}

impl<E: Engine> Rasterizer<E> {
    /// Creates a rasterizer whose engine is initialized on the first render.
    pub fn new() -> Rasterizer<E> {
        Rasterizer { engine: OnceLock::new() }
    }

    /// Creates a rasterizer around an already initialized engine.
    pub fn with_engine(engine: E) -> Rasterizer<E> {
        Rasterizer { engine: OnceLock::from(Ok(Mutex::new(engine))) }
    }

    /// Renders `source` at `pixel_size`, waiting for any render in progress
    /// elsewhere in the process to finish first.  If the engine failed to
    /// initialize, this returns `RenderError::EngineUnavailable` forever.
    pub fn render(&self, source: &Path, pixel_size: u32)
                  -> Result<Vec<u8>, RenderError> {
        if pixel_size == 0 {
            return Err(RenderError::ZeroSize);
        }
        let engine = match self.engine.get_or_init(initialize::<E>) {
            Ok(engine) => engine,
            Err(msg) => return Err(RenderError::EngineUnavailable(msg.clone())),
        };
        let _turn = RENDER_LOCK.lock();
        let mut engine = engine.lock();
        trace!(source = %source.display(), pixel_size, "rendering");
        engine.render(source, pixel_size)
    }
}

impl<E: Engine> Default for Rasterizer<E> {
    fn default() -> Rasterizer<E> {
        Rasterizer::new()
    }
}

fn initialize<E: Engine>() -> Result<Mutex<E>, String> {
    debug!("initializing rendering engine");
    E::initialize().map(Mutex::new).map_err(|err| {
        error!("failed to initialize rendering engine: {}", err);
        err.to_string()
    })
}

/// The production engine: parses SVG with `usvg` and draws it with `resvg`.
pub struct SvgEngine {
    fontdb: Arc<usvg::fontdb::Database>,
}

impl Engine for SvgEngine {
    fn initialize() -> Result<SvgEngine, RenderError> {
        let mut fontdb = usvg::fontdb::Database::new();
        fontdb.load_system_fonts();
        debug!(faces = fontdb.len(), "loaded system fonts");
        Ok(SvgEngine { fontdb: Arc::new(fontdb) })
    }

    fn render(&mut self, source: &Path, pixel_size: u32)
              -> Result<Vec<u8>, RenderError> {
        let data = fs::read(source).map_err(|err| {
            RenderError::Read {
                path: source.to_path_buf(),
                source: err,
            }
        })?;
        let options = usvg::Options {
            resources_dir: source.parent().map(Path::to_path_buf),
            fontdb: Arc::clone(&self.fontdb),
            ..usvg::Options::default()
        };
        let tree = usvg::Tree::from_data(&data, &options)?;

        let mut pixmap = tiny_skia::Pixmap::new(pixel_size, pixel_size)
            .ok_or(RenderError::InvalidPixmap {
                width: pixel_size,
                height: pixel_size,
            })?;
        // Stretch the view box over the whole square.
        let size = tree.size();
        let transform = tiny_skia::Transform::from_scale(
            pixel_size as f32 / size.width(),
            pixel_size as f32 / size.height(),
        );
        resvg::render(&tree, transform, &mut pixmap.as_mut());

        let mut png_data = Vec::new();
        pngio::write_pixmap_png(&pixmap, &mut png_data)
            .map_err(RenderError::Encode)?;
        Ok(png_data)
    }
}
