//! Bit-exact layout checks using an engine whose "PNG" output is a
//! recognizable tag for the requested size.

use std::path::Path;
use svg2icon::{encode_icns, encode_ico, Engine, Rasterizer, RenderError};

struct TagEngine;

impl Engine for TagEngine {
    fn initialize() -> Result<TagEngine, RenderError> {
        Ok(TagEngine)
    }

    fn render(&mut self, _source: &Path, pixel_size: u32)
              -> Result<Vec<u8>, RenderError> {
        Ok(pixel_size.to_be_bytes().to_vec())
    }
}

#[test]
fn ico_layout() {
    let rasterizer = Rasterizer::<TagEngine>::new();
    let bytes = encode_ico(&rasterizer, Path::new("logo.svg")).unwrap();

    let mut expected: Vec<u8> = vec![0, 0, 1, 0, 7, 0];
    let sizes = [16u32, 24, 32, 48, 64, 128, 256];
    let mut offset = 6 + 16 * 7u32;
    for &size in &sizes {
        let stored = if size == 256 { 0 } else { size as u8 };
        expected.extend_from_slice(&[stored, stored, 0, 0, 0, 0, 32, 0]);
        expected.extend_from_slice(&4u32.to_le_bytes());
        expected.extend_from_slice(&offset.to_le_bytes());
        offset += 4;
    }
    for &size in &sizes {
        expected.extend_from_slice(&size.to_be_bytes());
    }
    assert_eq!(bytes, expected);
    assert_eq!(&bytes[6..22],
               b"\x10\x10\0\0\0\0\x20\0\x04\0\0\0\x76\0\0\0");
}

#[test]
fn icns_layout() {
    let rasterizer = Rasterizer::<TagEngine>::new();
    let bytes = encode_icns(&rasterizer, Path::new("logo.svg")).unwrap();

    assert_eq!(&bytes[..20], b"icns\0\0\0\x80icp4\0\0\0\x0c\0\0\0\x10");
    let mut expected = b"icns\0\0\0\x80".to_vec();
    let entries: [(&[u8; 4], u32); 10] = [(b"icp4", 16),
                                          (b"ic11", 32),
                                          (b"icp5", 32),
                                          (b"ic12", 64),
                                          (b"ic07", 128),
                                          (b"ic13", 256),
                                          (b"ic08", 256),
                                          (b"ic14", 512),
                                          (b"ic09", 512),
                                          (b"ic10", 1024)];
    for &(ostype, pixels) in &entries {
        expected.extend_from_slice(ostype);
        expected.extend_from_slice(&12u32.to_be_bytes());
        expected.extend_from_slice(&pixels.to_be_bytes());
    }
    assert_eq!(bytes, expected);
}
