use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{self, Cursor};

use super::error;
use super::image::RasterImage;
use super::pngio;
use super::writer::ByteWriter;

/// The length of the ICONDIR header, in bytes.
const ICO_HEADER_LENGTH: u32 = 6;

/// The length of one ICONDIRENTRY, in bytes.
const ICO_ENTRY_LENGTH: u32 = 16;

/// The resource type number for icons (cursors are 2).
const ICO_RESOURCE_TYPE_ICON: u16 = 1;

const MAX_SIZE: u32 = 256;

macro_rules! invalid_data {
    ($e:expr) => {
        return Err(io::Error::new(io::ErrorKind::InvalidData, $e))
    };
    ($fmt:expr, $($arg:tt)+) => {
        return Err(io::Error::new(io::ErrorKind::InvalidData,
                                  format!($fmt, $($arg)+)))
    };
}

/// One ICONDIRENTRY: where an image lives in the file and how big it is.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct IcoDirectoryEntry {
    /// Width in pixels, with 256 stored as 0.
    pub width: u8,
    /// Height in pixels, with 256 stored as 0.
    pub height: u8,
    /// Number of colors in the palette; always 0 for 32-bit images.
    pub color_count: u8,
    /// Color planes; 0 for PNG payloads.
    pub color_planes: u16,
    /// Bits per pixel; 32 for RGBA payloads.
    pub bits_per_pixel: u16,
    /// Length of the payload, in bytes.
    pub payload_length: u32,
    /// Offset of the payload from the start of the file.
    pub payload_offset: u32,
}

impl IcoDirectoryEntry {
    /// Returns the width of the image, in pixels.
    pub fn pixel_width(&self) -> u32 {
        if self.width == 0 { MAX_SIZE } else { u32::from(self.width) }
    }

    /// Returns the height of the image, in pixels.
    pub fn pixel_height(&self) -> u32 {
        if self.height == 0 { MAX_SIZE } else { u32::from(self.height) }
    }
}

/// A complete Windows icon: a directory of entries and their PNG payloads.
pub struct IcoContainer {
    entries: Vec<IcoDirectoryEntry>,
    payloads: Vec<Vec<u8>>,
}

impl IcoContainer {
    /// Lays out the given images in order, computing each entry's offset so
    /// that payloads follow the directory back to back.  Returns a
    /// configuration error for images larger than 256 pixels, two images of
    /// the same size, or a file too large for 32-bit offsets.
    pub fn from_images(images: Vec<RasterImage>)
                       -> Result<IcoContainer, error::Error> {
        let count = images.len();
        if count > usize::from(u16::MAX) {
            return Err(error::Error::configuration(format!(
                "too many ICO entries ({}, but max is {})", count, u16::MAX)));
        }
        let mut offset = u64::from(ICO_HEADER_LENGTH) +
                         u64::from(ICO_ENTRY_LENGTH) * count as u64;
        let mut entries = Vec::<IcoDirectoryEntry>::with_capacity(count);
        let mut payloads = Vec::with_capacity(count);
        for image in images {
            let size = image.size_spec();
            let pixels = size.render_size();
            if pixels == 0 || pixels > MAX_SIZE {
                return Err(error::Error::configuration(format!(
                    "ICO entries must be 1-{} pixels (was {})",
                    MAX_SIZE,
                    pixels)));
            }
            if entries.iter().any(|e| e.pixel_width() == pixels) {
                return Err(error::Error::configuration(format!(
                    "duplicate {0}x{0} ICO entry", pixels)));
            }
            let payload_length = image.len() as u64;
            if offset + payload_length > u64::from(u32::MAX) {
                return Err(error::Error::configuration(format!(
                    "ICO file is too large (over {} bytes)",
                    offset + payload_length)));
            }
            // 256 does not fit in the 1-byte field and wraps to 0.
            let stored = (pixels % MAX_SIZE) as u8;
            entries.push(IcoDirectoryEntry {
                width: stored,
                height: stored,
                color_count: 0,
                color_planes: 0,
                bits_per_pixel: 32,
                payload_length: payload_length as u32,
                payload_offset: offset as u32,
            });
            payloads.push(image.into_data());
            offset += payload_length;
        }
        Ok(IcoContainer { entries, payloads })
    }

    /// Returns the directory entries, in file order.
    pub fn entries(&self) -> &[IcoDirectoryEntry] {
        &self.entries
    }

    /// Returns the payload of the entry at `index`.
    pub fn payload(&self, index: usize) -> Option<&[u8]> {
        self.payloads.get(index).map(Vec::as_slice)
    }

    /// Returns the encoded length of the file, in bytes.
    pub fn total_length(&self) -> usize {
        ICO_HEADER_LENGTH as usize +
        ICO_ENTRY_LENGTH as usize * self.entries.len() +
        self.payloads.iter().map(Vec::len).sum::<usize>()
    }

    /// Checks that every PNG payload has the dimensions its entry declares.
    pub fn check_dimensions(&self) -> io::Result<()> {
        for (entry, payload) in self.entries.iter().zip(&self.payloads) {
            let (width, height) = pngio::read_png_dimensions(payload)?;
            if width != entry.pixel_width() || height != entry.pixel_height() {
                invalid_data!("encoded PNG has wrong dimensions \
                               ({}x{} instead of {}x{})",
                              width,
                              height,
                              entry.pixel_width(),
                              entry.pixel_height());
            }
        }
        Ok(())
    }

    /// Serializes the container: header, directory, then payloads.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer =
            ByteWriter::<LittleEndian>::with_capacity(self.total_length());
        writer.write_u16(0); // reserved
        writer.write_u16(ICO_RESOURCE_TYPE_ICON);
        writer.write_u16(self.entries.len() as u16);
        for entry in &self.entries {
            writer.write_u8(entry.width);
            writer.write_u8(entry.height);
            writer.write_u8(entry.color_count);
            writer.write_u8(0); // reserved
            writer.write_u16(entry.color_planes);
            writer.write_u16(entry.bits_per_pixel);
            writer.write_u32(entry.payload_length);
            writer.write_u32(entry.payload_offset);
        }
        for payload in &self.payloads {
            writer.write_bytes(payload);
        }
        writer.into_inner()
    }

    /// Parses an ICO file held in memory.
    pub fn read(data: &[u8]) -> io::Result<IcoContainer> {
        let mut reader = Cursor::new(data);
        let reserved = reader.read_u16::<LittleEndian>()?;
        if reserved != 0 {
            invalid_data!("invalid reserved field value in ICONDIR \
                           (was {}, but must be 0)",
                          reserved);
        }
        let restype = reader.read_u16::<LittleEndian>()?;
        if restype != ICO_RESOURCE_TYPE_ICON {
            invalid_data!("not an icon resource (type {})", restype);
        }
        let count = reader.read_u16::<LittleEndian>()? as usize;
        let mut entries = Vec::with_capacity(count);
        for _ in 0..count {
            let width = reader.read_u8()?;
            let height = reader.read_u8()?;
            let color_count = reader.read_u8()?;
            let reserved = reader.read_u8()?;
            if reserved != 0 {
                invalid_data!("invalid reserved field value in ICONDIRENTRY \
                               (was {}, but must be 0)",
                              reserved);
            }
            entries.push(IcoDirectoryEntry {
                width,
                height,
                color_count,
                color_planes: reader.read_u16::<LittleEndian>()?,
                bits_per_pixel: reader.read_u16::<LittleEndian>()?,
                payload_length: reader.read_u32::<LittleEndian>()?,
                payload_offset: reader.read_u32::<LittleEndian>()?,
            });
        }
        let mut payloads = Vec::with_capacity(count);
        for entry in &entries {
            let start = entry.payload_offset as usize;
            let end = start + entry.payload_length as usize;
            match data.get(start..end) {
                Some(payload) => payloads.push(payload.to_vec()),
                None => invalid_data!("entry payload {}..{} is out of bounds",
                                      start,
                                      end),
            }
        }
        Ok(IcoContainer { entries, payloads })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sizes::SizeSpec;

    fn fake_images(sizes: &[u32]) -> Vec<RasterImage> {
        sizes.iter()
             .map(|&size| {
                 RasterImage::new(SizeSpec::new(size), vec![size as u8; 3])
             })
             .collect()
    }

    #[test]
    fn write_empty_container() {
        let container = IcoContainer::from_images(Vec::new()).unwrap();
        assert_eq!(container.to_bytes(), vec![0, 0, 1, 0, 0, 0]);
    }

    #[test]
    fn offsets_are_tightly_packed() {
        let container =
            IcoContainer::from_images(fake_images(&[16, 32, 256])).unwrap();
        let offsets: Vec<u32> =
            container.entries().iter().map(|e| e.payload_offset).collect();
        assert_eq!(offsets, vec![6 + 48, 6 + 48 + 3, 6 + 48 + 6]);
        assert_eq!(container.total_length(), 6 + 48 + 9);
        assert_eq!(container.to_bytes().len(), container.total_length());
    }

    #[test]
    fn size_256_is_stored_as_zero() {
        let container =
            IcoContainer::from_images(fake_images(&[256])).unwrap();
        let bytes = container.to_bytes();
        assert_eq!(&bytes[6..22],
                   &[0, 0, 0, 0, 0, 0, 32, 0, 3, 0, 0, 0, 22, 0, 0, 0]);
        assert_eq!(container.entries()[0].pixel_width(), 256);
    }

    #[test]
    fn read_back_written_container() {
        let container =
            IcoContainer::from_images(fake_images(&[16, 48])).unwrap();
        let decoded = IcoContainer::read(&container.to_bytes()).unwrap();
        assert_eq!(decoded.entries(), container.entries());
        assert_eq!(decoded.payload(1), Some(&[48u8, 48, 48] as &[u8]));
    }

    #[test]
    fn oversized_and_duplicate_images_are_rejected() {
        assert!(matches!(IcoContainer::from_images(fake_images(&[512])),
                         Err(error::Error::Configuration(_))));
        assert!(matches!(IcoContainer::from_images(fake_images(&[32, 32])),
                         Err(error::Error::Configuration(_))));
        let retina = vec![RasterImage::new(SizeSpec::retina(256), vec![0])];
        assert!(matches!(IcoContainer::from_images(retina),
                         Err(error::Error::Configuration(_))));
    }

    #[test]
    fn read_rejects_out_of_bounds_payload() {
        let mut bytes =
            IcoContainer::from_images(fake_images(&[16])).unwrap().to_bytes();
        bytes.truncate(bytes.len() - 1);
        let err = IcoContainer::read(&bytes).err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
