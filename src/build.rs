use std::path::Path;
use tracing::{debug, info};

use super::error::Error;
use super::family::IconFamily;
use super::ico::IcoContainer;
use super::image::RasterImage;
use super::output;
use super::raster::{Engine, Rasterizer};
use super::sizes::{Format, SizeSpec};

/// Renders `source` at every ICO size and writes the icon to `destination`.
/// Nothing is written unless every size renders.
#[tracing::instrument(skip_all, fields(source = %source.display(), destination = %destination.display()))]
pub fn build_ico<E: Engine>(rasterizer: &Rasterizer<E>,
                            source: &Path,
                            destination: &Path)
                            -> Result<(), Error> {
    let bytes = encode_ico(rasterizer, source)?;
    output::write_atomic(&bytes, destination)?;
    info!("wrote {} ({} bytes)", destination.display(), bytes.len());
    Ok(())
}

/// Renders `source` at every ICNS size and density and writes the icon to
/// `destination`.  Nothing is written unless every size renders.
#[tracing::instrument(skip_all, fields(source = %source.display(), destination = %destination.display()))]
pub fn build_icns<E: Engine>(rasterizer: &Rasterizer<E>,
                             source: &Path,
                             destination: &Path)
                             -> Result<(), Error> {
    let bytes = encode_icns(rasterizer, source)?;
    output::write_atomic(&bytes, destination)?;
    info!("wrote {} ({} bytes)", destination.display(), bytes.len());
    Ok(())
}

/// Assembles the ICO file for `source` in memory.
pub fn encode_ico<E: Engine>(rasterizer: &Rasterizer<E>,
                             source: &Path)
                             -> Result<Vec<u8>, Error> {
    let images = render_all(rasterizer, source, Format::Ico)?;
    Ok(IcoContainer::from_images(images)?.to_bytes())
}

/// Assembles the ICNS file for `source` in memory.
pub fn encode_icns<E: Engine>(rasterizer: &Rasterizer<E>,
                              source: &Path)
                              -> Result<Vec<u8>, Error> {
    let images = render_all(rasterizer, source, Format::Icns)?;
    IconFamily::from_images(images)?.to_bytes()
}

fn render_all<E: Engine>(rasterizer: &Rasterizer<E>,
                         source: &Path,
                         format: Format)
                         -> Result<Vec<RasterImage>, Error> {
    format.sizes()
          .iter()
          .map(|&size| render_one(rasterizer, source, size))
          .collect()
}

fn render_one<E: Engine>(rasterizer: &Rasterizer<E>,
                         source: &Path,
                         size: SizeSpec)
                         -> Result<RasterImage, Error> {
    let pixel_size = size.render_size();
    debug!("rendering {}", size);
    let data = rasterizer.render(source, pixel_size)
        .map_err(|source| Error::Render { pixel_size, source })?;
    Ok(RasterImage::new(size, data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RenderError;
    use crate::pngio;

    /// Renders a blank PNG of the requested size, or fails above a limit.
    struct BlankEngine {
        max_size: u32,
    }

    impl Engine for BlankEngine {
        fn initialize() -> Result<BlankEngine, RenderError> {
            Ok(BlankEngine { max_size: u32::MAX })
        }

        fn render(&mut self, _source: &Path, pixel_size: u32)
                  -> Result<Vec<u8>, RenderError> {
            if pixel_size > self.max_size {
                return Err(RenderError::Engine("too big".to_string()));
            }
            let rgba = vec![0u8; 4 * (pixel_size * pixel_size) as usize];
            let mut data = Vec::new();
            pngio::write_rgba_png(pixel_size, pixel_size, &rgba, &mut data)
                .map_err(RenderError::Encode)?;
            Ok(data)
        }
    }

    #[test]
    fn ico_has_one_entry_per_size() {
        let rasterizer = Rasterizer::<BlankEngine>::new();
        let bytes = encode_ico(&rasterizer, Path::new("icon.svg")).unwrap();
        let container = IcoContainer::read(&bytes).unwrap();
        assert_eq!(container.entries().len(), Format::Ico.sizes().len());
        container.check_dimensions().unwrap();
    }

    #[test]
    fn icns_fails_on_the_first_unrenderable_size() {
        let rasterizer =
            Rasterizer::with_engine(BlankEngine { max_size: 256 });
        match encode_icns(&rasterizer, Path::new("icon.svg")) {
            Err(Error::Render { pixel_size, .. }) => assert_eq!(pixel_size, 512),
            other => panic!("expected a render error, got {:?}", other),
        }
    }
}
