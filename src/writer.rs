use byteorder::ByteOrder;
use std::marker::PhantomData;

/// Byte offset of the total-length field in a container header.
const TOTAL_LENGTH_OFFSET: usize = 4;

/// An append-only buffer that writes integers in the byte order `E`.
///
/// The current length doubles as the offset at which the next byte will
/// land, which is how the encoders compute payload offsets.
pub struct ByteWriter<E: ByteOrder> {
    buffer: Vec<u8>,
    order: PhantomData<E>,
}

impl<E: ByteOrder> ByteWriter<E> {
    /// Creates an empty writer.
    pub fn new() -> ByteWriter<E> {
        ByteWriter::with_capacity(0)
    }

    /// Creates an empty writer with room for `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> ByteWriter<E> {
        ByteWriter {
            buffer: Vec::with_capacity(capacity),
            order: PhantomData,
        }
    }

    /// Appends a single byte.
    pub fn write_u8(&mut self, value: u8) {
        self.buffer.push(value);
    }

    /// Appends a 16-bit integer.
    pub fn write_u16(&mut self, value: u16) {
        let mut raw = [0u8; 2];
        E::write_u16(&mut raw, value);
        self.buffer.extend_from_slice(&raw);
    }

    /// Appends a 32-bit integer.
    pub fn write_u32(&mut self, value: u32) {
        let mut raw = [0u8; 4];
        E::write_u32(&mut raw, value);
        self.buffer.extend_from_slice(&raw);
    }

    /// Appends raw bytes.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Returns the number of bytes written so far.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns true if nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Overwrites the 4-byte total-length field that follows a 4-byte magic
    /// literal.  This is the only operation that touches bytes already
    /// written; it returns false (and writes nothing) if the header has not
    /// been written yet.
    #[must_use]
    pub fn patch_total_length(&mut self, total_length: u32) -> bool {
        match self.buffer
            .get_mut(TOTAL_LENGTH_OFFSET..TOTAL_LENGTH_OFFSET + 4) {
            Some(field) => {
                E::write_u32(field, total_length);
                true
            }
            None => false,
        }
    }

    /// Consumes the writer and returns the bytes written.
    pub fn into_inner(self) -> Vec<u8> {
        self.buffer
    }
}

impl<E: ByteOrder> Default for ByteWriter<E> {
    fn default() -> ByteWriter<E> {
        ByteWriter::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::{BigEndian, LittleEndian};

    #[test]
    fn little_endian_integers() {
        let mut writer = ByteWriter::<LittleEndian>::new();
        writer.write_u8(0xaa);
        writer.write_u16(0x0102);
        writer.write_u32(0x03040506);
        assert_eq!(writer.len(), 7);
        assert_eq!(writer.into_inner(),
                   vec![0xaa, 0x02, 0x01, 0x06, 0x05, 0x04, 0x03]);
    }

    #[test]
    fn big_endian_integers() {
        let mut writer = ByteWriter::<BigEndian>::new();
        writer.write_u16(0x0102);
        writer.write_u32(0x03040506);
        assert_eq!(writer.into_inner(),
                   vec![0x01, 0x02, 0x03, 0x04, 0x05, 0x06]);
    }

    #[test]
    fn patch_total_length_after_header() {
        let mut writer = ByteWriter::<BigEndian>::new();
        writer.write_bytes(b"icns");
        writer.write_u32(0);
        writer.write_bytes(b"payload");
        let total = writer.len() as u32;
        assert!(writer.patch_total_length(total));
        assert_eq!(&writer.into_inner() as &[u8], b"icns\0\0\0\x0fpayload");
    }

    #[test]
    fn patch_total_length_requires_header() {
        let mut writer = ByteWriter::<BigEndian>::new();
        writer.write_bytes(b"icns\0");
        assert!(!writer.patch_total_length(8));
        assert_eq!(&writer.into_inner() as &[u8], b"icns\0");
    }
}
