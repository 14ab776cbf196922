use resvg::tiny_skia::Pixmap;
use std::io::{self, Cursor, Write};

/// Writes a rendered pixmap as an 8-bit RGBA PNG.  The pixmap stores
/// premultiplied color, so each pixel is demultiplied on the way out.
pub fn write_pixmap_png<W: Write>(pixmap: &Pixmap, output: W) -> io::Result<()> {
    let mut rgba = Vec::with_capacity(pixmap.data().len());
    for pixel in pixmap.pixels() {
        let color = pixel.demultiply();
        rgba.extend_from_slice(&[color.red(),
                                 color.green(),
                                 color.blue(),
                                 color.alpha()]);
    }
    write_rgba_png(pixmap.width(), pixmap.height(), &rgba, output)
}

/// Writes straight (non-premultiplied) RGBA pixel data as an 8-bit PNG.
pub fn write_rgba_png<W: Write>(width: u32,
                                height: u32,
                                rgba: &[u8],
                                output: W)
                                -> io::Result<()> {
    let expected = 4 * (width as usize) * (height as usize);
    if rgba.len() != expected {
        let msg = format!("wrong RGBA data length ({} instead of {})",
                          rgba.len(),
                          expected);
        return Err(io::Error::new(io::ErrorKind::InvalidInput, msg));
    }
    let mut encoder = png::Encoder::new(output, width, height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);

    let mut writer = encoder.write_header()?;
    writer.write_image_data(rgba)?;
    writer.finish()?;
    Ok(())
}

/// Reads the pixel dimensions from the header of a PNG file.
pub fn read_png_dimensions(data: &[u8]) -> io::Result<(u32, u32)> {
    let mut decoder = png::Decoder::new(Cursor::new(data));
    let info = decoder.read_header_info()?;
    Ok((info.width, info.height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use resvg::tiny_skia::Color;

    #[test]
    fn rgba_png_dimensions_round_trip() {
        let rgba = vec![255u8; 4 * 3 * 5];
        let mut png_data = Vec::new();
        write_rgba_png(3, 5, &rgba, &mut png_data).unwrap();
        assert_eq!(&png_data[..4], &[0x89, b'P', b'N', b'G']);
        assert_eq!(read_png_dimensions(&png_data).unwrap(), (3, 5));
    }

    #[test]
    fn rgba_png_rejects_short_data() {
        let mut png_data = Vec::new();
        let err = write_rgba_png(2, 2, &[0u8; 15], &mut png_data).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn pixmap_png_is_demultiplied() {
        let mut pixmap = Pixmap::new(2, 2).unwrap();
        pixmap.fill(Color::from_rgba8(255, 0, 0, 128));
        let mut png_data = Vec::new();
        write_pixmap_png(&pixmap, &mut png_data).unwrap();

        let mut decoder = png::Decoder::new(Cursor::new(&png_data));
        decoder.set_transformations(png::Transformations::IDENTITY);
        let mut reader = decoder.read_info().unwrap();
        let mut pixels = vec![0u8; reader.output_buffer_size().unwrap()];
        reader.next_frame(&mut pixels).unwrap();
        assert_eq!(&pixels[..4], &[255, 0, 0, 128]);
    }

    #[test]
    fn garbage_is_not_a_png() {
        assert!(read_png_dimensions(b"not a png").is_err());
    }
}
