use super::sizes::SizeSpec;

/// A PNG-encoded rendering of the source image at one size.
#[derive(Clone)]
pub struct RasterImage {
    size: SizeSpec,
    data: Box<[u8]>,
}

impl RasterImage {
    /// Wraps PNG data rendered for the given size spec.  The PNG is expected
    /// to be `size.render_size()` pixels square.
    pub fn new(size: SizeSpec, data: Vec<u8>) -> RasterImage {
        RasterImage {
            size,
            data: data.into_boxed_slice(),
        }
    }

    /// Returns the size spec this image was rendered for.
    pub fn size_spec(&self) -> SizeSpec {
        self.size
    }

    /// Returns the length of the encoded PNG, in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the encoded data is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Consumes the image and returns the encoded bytes.
    pub fn into_data(self) -> Vec<u8> {
        self.data.into_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_keeps_its_size_and_bytes() {
        let image = RasterImage::new(SizeSpec::retina(128), vec![1, 2, 3]);
        assert_eq!(image.size_spec(), SizeSpec::retina(128));
        assert_eq!(image.len(), 3);
        assert!(!image.is_empty());
        assert_eq!(image.into_data(), vec![1, 2, 3]);

        let empty = RasterImage::new(SizeSpec::new(16), Vec::new());
        assert!(empty.is_empty());
    }
}
