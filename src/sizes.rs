use std::fmt;

/// A required image within a container: a nominal square size in points and
/// the density it is rendered at.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct SizeSpec {
    /// The nominal width and height of the icon.
    pub pixel_size: u32,
    /// The density multiplier: 1 for standard, 2 for "retina" density.
    pub scale: u32,
}

impl SizeSpec {
    /// Creates a size spec at standard density.
    pub const fn new(pixel_size: u32) -> SizeSpec {
        SizeSpec { pixel_size, scale: 1 }
    }

    /// Creates a size spec at 2x "retina" density.
    pub const fn retina(pixel_size: u32) -> SizeSpec {
        SizeSpec { pixel_size, scale: 2 }
    }

    /// Returns the width and height of the rendered pixel data, i.e.
    /// `pixel_size * scale`.
    ///
    /// # Examples
    /// ```
    /// use svg2icon::SizeSpec;
    /// assert_eq!(SizeSpec::new(128).render_size(), 128);
    /// assert_eq!(SizeSpec::retina(128).render_size(), 256);
    /// ```
    pub fn render_size(self) -> u32 {
        self.pixel_size * self.scale
    }
}

impl fmt::Display for SizeSpec {
    fn fmt(&self, out: &mut fmt::Formatter) -> fmt::Result {
        write!(out, "{0}x{0}", self.pixel_size)?;
        if self.scale != 1 {
            write!(out, "@{}x", self.scale)?;
        }
        Ok(())
    }
}

/// The container formats this crate can assemble.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Format {
    /// Windows icon (`.ico`).
    Ico,
    /// Apple icon image (`.icns`).
    Icns,
}

impl Format {
    /// Returns the images a container of this format must hold, in the order
    /// they are written to disk.
    pub fn sizes(self) -> &'static [SizeSpec] {
        match self {
            Format::Ico => ICO_SIZES,
            Format::Icns => ICNS_SIZES,
        }
    }

    /// Returns the conventional file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Format::Ico => "ico",
            Format::Icns => "icns",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, out: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Format::Ico => out.write_str("ICO"),
            Format::Icns => out.write_str("ICNS"),
        }
    }
}

/// Windows sizes, from title bars up to the Vista+ 256x256 entry.
pub const ICO_SIZES: &[SizeSpec] = &[
    SizeSpec::new(16),
    SizeSpec::new(24),
    SizeSpec::new(32),
    SizeSpec::new(48),
    SizeSpec::new(64),
    SizeSpec::new(128),
    SizeSpec::new(256),
];

/// The macOS iconset: every nominal size at 1x and 2x density.
pub const ICNS_SIZES: &[SizeSpec] = &[
    SizeSpec::new(16),
    SizeSpec::retina(16),
    SizeSpec::new(32),
    SizeSpec::retina(32),
    SizeSpec::new(128),
    SizeSpec::retina(128),
    SizeSpec::new(256),
    SizeSpec::retina(256),
    SizeSpec::new(512),
    SizeSpec::retina(512),
];
