//! Encoder session and streaming drive loop.
//!
//! An [`Encoder`] owns every buffer the whole pipeline needs, so one
//! instance can live in static or stack memory and encode any number of
//! images without allocating. Output is produced in bounded pieces
//! through the staging buffer: header, one MCU's worth of entropy data
//! at a time, footer.

use crate::bitio::{BitPacker, Stage};
use crate::config::{ColorFormat, Quality};
use crate::dct::{fdct, quantize};
use crate::entropy;
use crate::error::{EncodeError, Result};
use crate::marker;
use crate::tables::{
    CHROMA_AC_HUFF, CHROMA_DC_HUFF, CHROMA_QUANT, LUMA_AC_HUFF, LUMA_DC_HUFF, LUMA_QUANT,
};

/// Pull source for raw pixel data. `pos` is the byte offset into the
/// MCU-ordered input stream; short reads near the image edge are
/// completed by replication.
pub trait PixelSource {
    fn pull(&mut self, pos: u32, buf: &mut [u8]) -> core::result::Result<usize, &'static str>;
}

impl<F> PixelSource for F
where
    F: FnMut(u32, &mut [u8]) -> core::result::Result<usize, &'static str>,
{
    fn pull(&mut self, pos: u32, buf: &mut [u8]) -> core::result::Result<usize, &'static str> {
        self(pos, buf)
    }
}

/// Push sink for encoded output. Each call receives one staged piece
/// (at most [`crate::STAGE_CAPACITY`] bytes).
pub trait ByteSink {
    fn push(&mut self, data: &[u8]) -> core::result::Result<(), &'static str>;
}

impl<F> ByteSink for F
where
    F: FnMut(&[u8]) -> core::result::Result<(), &'static str>,
{
    fn push(&mut self, data: &[u8]) -> core::result::Result<(), &'static str> {
        self(data)
    }
}

/// Largest raw MCU: 16x16 pixels at 2 bytes per pixel.
const MCU_BUF_BYTES: usize = 512;
/// COM segment payload limit, counted into the staging capacity.
const MAX_COMMENT: usize = 16;

/// Scratch buffers reused for every block.
struct Work {
    mcu: [u8; MCU_BUF_BYTES],
    pix: [u8; 64],
    coef: [i32; 64],
    zz: [i16; 64],
}

/// Streaming baseline JPEG encoder with fixed storage.
pub struct Encoder {
    width: u16,
    height: u16,
    mcus_wide: u16,
    mcus_tall: u16,
    color: ColorFormat,
    quality: Quality,
    comment: [u8; MAX_COMMENT],
    comment_len: u8,
    stage: Stage,
    bits: BitPacker,
    dc_pred: [i16; 3],
    started: bool,
    work: Work,
}

impl Encoder {
    /// Create a session for the given dimensions. Dimensions that are
    /// not multiples of the MCU size are padded by edge replication.
    pub fn new(width: u16, height: u16, color: ColorFormat, quality: Quality) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(EncodeError::Config("image dimensions must be nonzero"));
        }
        let mcu = color.mcu_size() as u16;
        let mcus_wide = width.div_ceil(mcu);
        let mcus_tall = height.div_ceil(mcu);
        let total = mcus_wide as u64 * mcus_tall as u64 * color.mcu_bytes() as u64;
        if total > u32::MAX as u64 {
            return Err(EncodeError::Config("image too large for 32-bit stream offsets"));
        }
        Ok(Self {
            width,
            height,
            mcus_wide,
            mcus_tall,
            color,
            quality,
            comment: [0; MAX_COMMENT],
            comment_len: 0,
            stage: Stage::new(),
            bits: BitPacker::new(),
            dc_pred: [0; 3],
            started: false,
            work: Work {
                mcu: [0; MCU_BUF_BYTES],
                pix: [0; 64],
                coef: [0; 64],
                zz: [0; 64],
            },
        })
    }

    /// Set the COM segment text (at most 16 bytes). An empty comment
    /// omits the segment entirely.
    pub fn set_comment(&mut self, text: &[u8]) -> Result<()> {
        if text.len() > MAX_COMMENT {
            return Err(EncodeError::Config("comment longer than 16 bytes"));
        }
        self.comment[..text.len()].copy_from_slice(text);
        self.comment_len = text.len() as u8;
        Ok(())
    }

    /// Number of MCUs in the padded image grid.
    pub fn mcu_count(&self) -> u32 {
        self.mcus_wide as u32 * self.mcus_tall as u32
    }

    /// Bytes staged by the most recent call, ready to be copied out.
    pub fn staged(&self) -> &[u8] {
        self.stage.as_slice()
    }

    /// Stage the header marker sequence and reset the entropy state.
    /// Returns the number of staged bytes.
    pub fn write_header(&mut self) -> Result<usize> {
        self.stage.clear();
        marker::write_header(
            &mut self.stage,
            self.width,
            self.height,
            self.color,
            self.quality,
            &self.comment[..self.comment_len as usize],
        )?;
        self.bits.reset();
        self.dc_pred = [0; 3];
        self.started = true;
        Ok(self.stage.len())
    }

    /// Encode one raw MCU. The slice must be exactly one MCU of input
    /// (64 bytes grayscale, 512 bytes YUV). Returns the number of
    /// staged bytes, which may be zero while bits remain pending.
    pub fn encode_mcu(&mut self, mcu: &[u8]) -> Result<usize> {
        if !self.started {
            return Err(EncodeError::State("header not written"));
        }
        let need = self.color.mcu_bytes();
        if mcu.len() != need {
            return Err(EncodeError::Config("MCU slice has the wrong length"));
        }
        self.work.mcu[..need].copy_from_slice(mcu);
        self.encode_staged_mcu()
    }

    /// Stage the footer: flush pending bits (1-padded) and emit EOI.
    pub fn write_footer(&mut self) -> Result<usize> {
        if !self.started {
            return Err(EncodeError::State("header not written"));
        }
        self.stage.clear();
        marker::write_footer(&mut self.stage, &mut self.bits)?;
        self.started = false;
        Ok(self.stage.len())
    }

    /// Encode a whole image, pulling raw MCUs from `src` and pushing
    /// each staged piece to `sink`. Returns the total output size.
    pub fn encode_image<R: PixelSource, W: ByteSink>(
        &mut self,
        src: &mut R,
        sink: &mut W,
    ) -> Result<usize> {
        let mcu_bytes = self.color.mcu_bytes();
        let row_bytes = self.color.mcu_size() * self.color.bytes_per_pixel();
        let group = match self.color {
            ColorFormat::Grayscale => 1,
            ColorFormat::Yuv422 => 4,
        };

        let mut total = self.write_header()?;
        log::debug!(
            "encoding {}x{} {:?} image, {} MCUs",
            self.width,
            self.height,
            self.color,
            self.mcu_count()
        );
        sink.push(self.stage.as_slice()).map_err(EncodeError::Io)?;

        for idx in 0..self.mcu_count() {
            let pos = idx * mcu_bytes as u32;
            let buf = &mut self.work.mcu[..mcu_bytes];
            let got = src.pull(pos, buf).map_err(EncodeError::Io)?;
            if got > mcu_bytes {
                return Err(EncodeError::Io("pull reported more bytes than requested"));
            }
            if got < mcu_bytes {
                fill_edge(buf, got, row_bytes, group)?;
            }
            total += self.encode_staged_mcu()?;
            sink.push(self.stage.as_slice()).map_err(EncodeError::Io)?;
        }

        total += self.write_footer()?;
        sink.push(self.stage.as_slice()).map_err(EncodeError::Io)?;
        Ok(total)
    }

    /// Encode the MCU already sitting in the work buffer.
    fn encode_staged_mcu(&mut self) -> Result<usize> {
        self.stage.clear();
        match self.color {
            ColorFormat::Grayscale => {
                self.work.pix.copy_from_slice(&self.work.mcu[..64]);
                self.encode_component_block(0)?;
            }
            ColorFormat::Yuv422 => {
                for by in 0..2 {
                    for bx in 0..2 {
                        extract_luma(&self.work.mcu, bx, by, &mut self.work.pix);
                        self.encode_component_block(0)?;
                    }
                }
                extract_chroma(&self.work.mcu, 0, &mut self.work.pix);
                self.encode_component_block(1)?;
                extract_chroma(&self.work.mcu, 2, &mut self.work.pix);
                self.encode_component_block(2)?;
            }
        }
        Ok(self.stage.len())
    }

    /// Transform and entropy-code the 8x8 block in `work.pix` for
    /// component `comp` (0 = Y, 1 = Cb, 2 = Cr).
    fn encode_component_block(&mut self, comp: usize) -> Result<()> {
        for i in 0..64 {
            self.work.coef[i] = self.work.pix[i] as i32 - 128;
        }
        fdct(&mut self.work.coef);
        let qi = self.quality.index();
        let (qt, dc_table, ac_table) = if comp == 0 {
            (&LUMA_QUANT[qi], &LUMA_DC_HUFF, &LUMA_AC_HUFF)
        } else {
            (&CHROMA_QUANT[qi], &CHROMA_DC_HUFF, &CHROMA_AC_HUFF)
        };
        quantize(&self.work.coef, qt, &mut self.work.zz);
        entropy::encode_block(
            &self.work.zz,
            &mut self.dc_pred[comp],
            dc_table,
            ac_table,
            &mut self.bits,
            &mut self.stage,
        )
    }
}

/// Copy one 8x8 luma block out of an interleaved Cb,Y,Cr,Y MCU.
/// `bx`/`by` select the block within the 16x16 MCU.
fn extract_luma(mcu: &[u8], bx: usize, by: usize, pix: &mut [u8; 64]) {
    for r in 0..8 {
        let row = (by * 8 + r) * 32 + bx * 16;
        for c in 0..8 {
            pix[r * 8 + c] = mcu[row + c * 2 + 1];
        }
    }
}

/// Copy one 8x8 chroma block, taking even source rows to reduce 16
/// chroma rows to 8. `phase` is the byte offset within each 4-byte
/// pixel pair (0 = Cb, 2 = Cr).
fn extract_chroma(mcu: &[u8], phase: usize, pix: &mut [u8; 64]) {
    for r in 0..8 {
        let row = (r * 2) * 32;
        for c in 0..8 {
            pix[r * 8 + c] = mcu[row + c * 4 + phase];
        }
    }
}

/// Complete a short read by edge replication. `group` is the smallest
/// unit that keeps component phase intact (1 byte grayscale, 4 bytes
/// interleaved YUV). The partial row is finished by repeating its last
/// group, then missing rows repeat the last complete row.
fn fill_edge(buf: &mut [u8], got: usize, row_bytes: usize, group: usize) -> Result<()> {
    let usable = got - got % group;
    if usable == 0 {
        return Err(EncodeError::Io("pull returned no pixel data for in-range MCU"));
    }
    let mut filled = usable;
    if usable % row_bytes != 0 {
        let row_end = usable - usable % row_bytes + row_bytes;
        while filled < row_end {
            buf.copy_within(usable - group..usable, filled);
            filled += group;
        }
    }
    while filled < buf.len() {
        buf.copy_within(filled - row_bytes..filled, filled);
        filled += row_bytes;
    }
    Ok(())
}
