//! Color format and quality presets.
//!
//! Both are closed sets fixed at session creation: the color format
//! determines MCU geometry and component count, the quality preset
//! selects one precomputed pair of quantization tables.

/// Supported raw pixel formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorFormat {
    /// 8-bit grayscale, 1 byte per pixel, 8x8 MCU.
    Grayscale,
    /// Interleaved Cb,Y,Cr,Y, 2 bytes per pixel average, 16x16 MCU.
    Yuv422,
}

impl ColorFormat {
    /// MCU edge length in pixels.
    pub const fn mcu_size(self) -> usize {
        match self {
            Self::Grayscale => 8,
            Self::Yuv422 => 16,
        }
    }

    /// Average bytes per pixel of the raw input.
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Grayscale => 1,
            Self::Yuv422 => 2,
        }
    }

    /// Number of image components (1 = Y, 3 = Y/Cb/Cr).
    pub const fn components(self) -> usize {
        match self {
            Self::Grayscale => 1,
            Self::Yuv422 => 3,
        }
    }

    /// Raw bytes in one full MCU of input.
    pub const fn mcu_bytes(self) -> usize {
        self.mcu_size() * self.mcu_size() * self.bytes_per_pixel()
    }
}

/// Quality presets, lowest to highest. Each fixes one pair of
/// quantization tables; there is no continuous quality scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Quality {
    /// ~0%: maximum compression, severe loss.
    Lowest,
    /// ~10%
    Lower,
    /// ~50%
    Low,
    /// ~90%
    Normal,
    /// ~95%
    Higher,
    /// ~100%: quantizers all 1, still lossy via rounding.
    Highest,
}

impl Quality {
    /// Index into the per-preset quantization table arrays.
    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mcu_geometry() {
        assert_eq!(ColorFormat::Grayscale.mcu_bytes(), 64);
        assert_eq!(ColorFormat::Yuv422.mcu_bytes(), 512);
        assert_eq!(ColorFormat::Grayscale.components(), 1);
        assert_eq!(ColorFormat::Yuv422.components(), 3);
    }

    #[test]
    fn quality_ordering() {
        assert!(Quality::Lowest < Quality::Highest);
        assert_eq!(Quality::Lowest.index(), 0);
        assert_eq!(Quality::Highest.index(), 5);
    }
}
