use byteorder::{BigEndian, ReadBytesExt};
use std::io::{self, Error, ErrorKind, Read};

use super::element::IconElement;
use super::error;
use super::icontype::OSType;
use super::image::RasterImage;
use super::writer::ByteWriter;

/// The first four bytes of an ICNS file:
const ICNS_MAGIC_LITERAL: &[u8; 4] = b"icns";

/// The length of an icon family header, in bytes:
const ICON_FAMILY_HEADER_LENGTH: u32 = 8;

/// Adds up element lengths after the file header, or returns `None` if the
/// file would exceed the 32-bit length field.
fn family_length<I>(element_lengths: I) -> Option<u32>
where
    I: IntoIterator<Item = u32>,
{
    element_lengths.into_iter()
        .try_fold(ICON_FAMILY_HEADER_LENGTH, u32::checked_add)
}

/// A set of icons stored in a single ICNS file.
pub struct IconFamily {
    /// The icon elements stored in the ICNS file, in file order.
    pub elements: Vec<IconElement>,
}

impl IconFamily {
    /// Creates a new, empty icon family.
    pub fn new() -> IconFamily {
        IconFamily { elements: Vec::new() }
    }

    /// Builds a family holding one element per image, in the given order.
    /// Returns a configuration error if an image has no matching icon type,
    /// if two images map to the same type, or if the file would exceed the
    /// 32-bit length field.
    pub fn from_images(images: Vec<RasterImage>)
                       -> Result<IconFamily, error::Error> {
        let mut family = IconFamily::new();
        for image in images {
            let element = IconElement::from_image(image)?;
            if family.find_element(element.ostype()).is_some() {
                let msg = format!("duplicate '{}' element", element.ostype());
                return Err(error::Error::configuration(msg));
            }
            family.elements.push(element);
        }
        family.total_length()?;
        Ok(family)
    }

    /// Returns true if the icon family contains no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns the element with the given OSType, if present.
    pub fn find_element(&self, ostype: OSType) -> Option<&IconElement> {
        self.elements.iter().find(|el| el.ostype() == ostype)
    }

    /// Reads an icon family from an ICNS file.
    pub fn read<R: Read>(mut reader: R) -> io::Result<IconFamily> {
        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;
        if magic != *ICNS_MAGIC_LITERAL {
            let msg = "not an icns file (wrong magic literal)";
            return Err(Error::new(ErrorKind::InvalidData, msg));
        }
        let file_length = reader.read_u32::<BigEndian>()?;
        let mut file_position: u32 = ICON_FAMILY_HEADER_LENGTH;
        let mut family = IconFamily::new();
        while file_position < file_length {
            let element = IconElement::read(reader.by_ref())?;
            let element_length = element.total_length()
                .map_err(|err| Error::new(ErrorKind::InvalidData, err))?;
            file_position = file_position.saturating_add(element_length);
            family.elements.push(element);
        }
        if file_position != file_length {
            let msg = "element lengths do not add up to the file length";
            return Err(Error::new(ErrorKind::InvalidData, msg));
        }
        Ok(family)
    }

    /// Serializes the icon family as an ICNS file.  The length field is
    /// written as a placeholder and patched once every element is in place.
    /// Returns a configuration error if the file would be too large for its
    /// length field.
    pub fn to_bytes(&self) -> Result<Vec<u8>, error::Error> {
        let total_length = self.total_length()?;
        let mut writer =
            ByteWriter::<BigEndian>::with_capacity(total_length as usize);
        writer.write_bytes(ICNS_MAGIC_LITERAL);
        writer.write_u32(0);
        for element in &self.elements {
            element.write(&mut writer)?;
        }
        debug_assert_eq!(writer.len(), total_length as usize);
        let patched = writer.patch_total_length(total_length);
        debug_assert!(patched, "ICNS header was not written");
        Ok(writer.into_inner())
    }

    /// Returns the encoded length of the file, in bytes, including the
    /// length of the header.  Returns a configuration error if that does not
    /// fit the 32-bit length field.
    pub fn total_length(&self) -> Result<u32, error::Error> {
        let mut lengths = Vec::with_capacity(self.elements.len());
        for element in &self.elements {
            lengths.push(element.total_length()?);
        }
        family_length(lengths).ok_or_else(|| {
            error::Error::configuration(format!("ICNS file with {} elements \
                                                 is too large",
                                                self.elements.len()))
        })
    }
}

impl Default for IconFamily {
    fn default() -> IconFamily {
        IconFamily::new()
    }
}
