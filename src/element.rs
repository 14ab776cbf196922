use byteorder::{BigEndian, ReadBytesExt};
use std::io::{self, Error, ErrorKind, Read};

use super::error;
use super::icontype::{IconType, OSType};
use super::image::RasterImage;
use super::pngio;
use super::writer::ByteWriter;

/// The length of an icon element header, in bytes:
const ICON_ELEMENT_HEADER_LENGTH: u32 = 8;

/// Returns the on-disk length of an element carrying `data_length` payload
/// bytes, or `None` if it does not fit the 32-bit length field.
fn encoded_length(data_length: usize) -> Option<u32> {
    u32::try_from(data_length).ok()?.checked_add(ICON_ELEMENT_HEADER_LENGTH)
}

/// One entry in an ICNS file: a type tag followed by a PNG payload.
pub struct IconElement {
    ostype: OSType,
    data: Vec<u8>,
}

impl IconElement {
    /// Creates an icon element with the given OSType and data payload.
    pub fn new(ostype: OSType, data: Vec<u8>) -> IconElement {
        IconElement { ostype, data }
    }

    /// Wraps a rendered image in an element tagged for its size and density.
    /// Returns a configuration error if no icon type matches the image's size
    /// spec, or if the payload is too large for the 32-bit length field.
    pub fn from_image(image: RasterImage) -> Result<IconElement, error::Error> {
        let size = image.size_spec();
        let icon_type = IconType::from_size_spec(size).ok_or_else(|| {
            error::Error::configuration(format!("no ICNS icon type is \
                                                 mapped to {}",
                                                size))
        })?;
        let element = IconElement::new(icon_type.ostype(), image.into_data());
        element.total_length()?;
        Ok(element)
    }

    /// Returns the OSType for this element (e.g. `ic07` or `ic14`).
    pub fn ostype(&self) -> OSType {
        self.ostype
    }

    /// Returns the type of icon encoded by this element, or `None` if this
    /// element does not encode a supported icon type.
    pub fn icon_type(&self) -> Option<IconType> {
        IconType::from_ostype(self.ostype)
    }

    /// Returns the encoded data for this element.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the encoded length of the element, in bytes, including the
    /// length of the header.  Returns a configuration error if the payload is
    /// too large for the 32-bit length field.
    pub fn total_length(&self) -> Result<u32, error::Error> {
        encoded_length(self.data.len()).ok_or_else(|| {
            error::Error::configuration(format!("'{}' payload is too large \
                                                 ({} bytes)",
                                                self.ostype,
                                                self.data.len()))
        })
    }

    /// Checks that the PNG payload has the pixel dimensions its icon type
    /// calls for.
    pub fn check_dimensions(&self) -> io::Result<()> {
        let icon_type = self.icon_type().ok_or_else(|| {
            Error::new(ErrorKind::InvalidInput,
                       format!("unsupported OSType: {}", self.ostype))
        })?;
        let expected = icon_type.pixel_width();
        let (width, height) = pngio::read_png_dimensions(&self.data)?;
        if width != expected || height != expected {
            let msg = format!("decoded PNG has wrong dimensions \
                               ({}x{} instead of {}x{})",
                              width,
                              height,
                              expected,
                              expected);
            return Err(Error::new(ErrorKind::InvalidData, msg));
        }
        Ok(())
    }

    /// Reads an icon element from within an ICNS file.
    pub fn read<R: Read>(mut reader: R) -> io::Result<IconElement> {
        let mut raw_ostype = [0u8; 4];
        reader.read_exact(&mut raw_ostype)?;
        let element_length = reader.read_u32::<BigEndian>()?;
        if element_length < ICON_ELEMENT_HEADER_LENGTH {
            return Err(Error::new(ErrorKind::InvalidData,
                                  "invalid element length"));
        }
        let data_length = element_length - ICON_ELEMENT_HEADER_LENGTH;
        let mut data = vec![0u8; data_length as usize];
        reader.read_exact(&mut data)?;
        Ok(IconElement::new(OSType(raw_ostype), data))
    }

    /// Appends the icon element to an ICNS file being assembled.  Nothing is
    /// written if the element is too large to encode.
    pub fn write(&self, writer: &mut ByteWriter<BigEndian>)
                 -> Result<(), error::Error> {
        let total_length = self.total_length()?;
        let OSType(ref raw_ostype) = self.ostype;
        writer.write_bytes(raw_ostype);
        writer.write_u32(total_length);
        writer.write_bytes(&self.data);
        Ok(())
    }
}
