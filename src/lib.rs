// smol-jpeg: minimal no_std streaming baseline JPEG encoder.
// config:  color format and quality presets
// tables:  quantization/Huffman constants, zigzag order
// dct:     forward DCT + quantization (integer, IJG islow)
// bitio:   fixed staging buffer, bit packing with 0xFF stuffing
// entropy: DC/AC Huffman coding of quantized blocks
// marker:  JFIF header/footer segment emission
// encode:  encoder session, per-MCU path, streaming driver
// error:   error type shared across the encoder

//! Streaming baseline JPEG (JFIF) encoder for memory-constrained devices.
//!
//! Encodes 8-bit grayscale or interleaved YUV 4:2:2 (Cb,Y,Cr,Y) pixel data
//! one MCU at a time through caller-supplied pull/push callbacks. All
//! buffers are fixed-capacity; nothing is heap-allocated and the full
//! image is never held in memory. Peak buffering is the 627-byte
//! staging buffer plus one raw MCU (512 bytes).
//!
//! Output is baseline sequential (SOF0) with the fixed ITU-T T.81
//! Annex K Huffman tables and quality-preset quantization tables.

#![no_std]

mod bitio;
mod config;
mod dct;
mod encode;
mod entropy;
mod error;
mod marker;
mod tables;

pub use bitio::STAGE_CAPACITY;
pub use config::{ColorFormat, Quality};
pub use encode::{ByteSink, Encoder, PixelSource};
pub use error::{EncodeError, Result};
