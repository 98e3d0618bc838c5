// Copyright (c) the jpegdec authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::io::{Read, Seek, SeekFrom};

use byteorder::{BigEndian, ReadBytesExt};

use crate::error::{Error, Result};
#[allow(unused_imports)]
use crate::util::tracing_wrappers::*;

/// Extent of a length-prefixed marker segment. `start` is the offset of the
/// length field, which counts itself.
#[derive(Debug, Clone, Copy)]
pub struct Segment {
    pub marker: u16,
    pub start: u64,
    pub length: u16,
}

impl Segment {
    pub fn end(&self) -> u64 {
        self.start + self.length as u64
    }
}

/// Byte-level access to a JPEG stream: big-endian fields, marker scanning and
/// segment bookkeeping. Entropy-coded data is read through [`crate::bit_reader::BitReader`].
pub struct ByteStream<R> {
    inner: R,
}

impl<R: Read + Seek> ByteStream<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn read_byte(&mut self) -> Result<u8> {
        Ok(self.inner.read_u8()?)
    }

    pub fn read_word(&mut self) -> Result<u16> {
        Ok(self.inner.read_u16::<BigEndian>()?)
    }

    /// Reads one byte and splits it into its (high, low) 4-bit halves.
    pub fn read_nibbles(&mut self) -> Result<(u8, u8)> {
        let byte = self.read_byte()?;
        Ok((byte >> 4, byte & 0x0F))
    }

    pub fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        self.inner.read_exact(buf)?;
        Ok(())
    }

    pub fn position(&mut self) -> Result<u64> {
        Ok(self.inner.stream_position()?)
    }

    pub fn seek_to(&mut self, position: u64) -> Result<()> {
        self.inner.seek(SeekFrom::Start(position))?;
        Ok(())
    }

    /// Moves the read position back by `count` bytes.
    pub fn unread(&mut self, count: i64) -> Result<()> {
        self.inner.seek(SeekFrom::Current(-count))?;
        Ok(())
    }

    /// Scans forward to the next marker and returns its two-byte code.
    ///
    /// Bytes before the 0xFF prefix are skipped with a warning. Repeated 0xFF
    /// bytes are fill bytes. An 0xFF followed by 0x00 is stuffed data rather
    /// than a marker, so the scan carries on past it.
    pub fn read_marker(&mut self) -> Result<u16> {
        let mut skipped = 0usize;
        loop {
            while self.read_byte()? != 0xFF {
                skipped += 1;
            }
            match self.read_marker_code()? {
                Some(code) => {
                    if skipped > 0 {
                        warn!(skipped, "skipped bytes before marker {:04x}", 0xFF00 | code as u16);
                    }
                    return Ok(0xFF00 | code as u16);
                }
                None => skipped += 2,
            }
        }
    }

    /// Reads the byte after an 0xFF prefix. Returns `None` for a stuffed zero.
    fn read_marker_code(&mut self) -> Result<Option<u8>> {
        loop {
            match self.read_byte()? {
                0xFF => continue,
                0x00 => return Ok(None),
                code => return Ok(Some(code)),
            }
        }
    }

    /// Reads the length field of the segment introduced by `marker`.
    pub fn begin_segment(&mut self, marker: u16) -> Result<Segment> {
        let start = self.position()?;
        let length = self.read_word()?;
        if length < 2 {
            return Err(Error::InvalidSegmentLength(marker, length));
        }
        Ok(Segment {
            marker,
            start,
            length,
        })
    }

    /// Whether the segment still has unread payload.
    pub fn has_remaining(&mut self, segment: &Segment) -> Result<bool> {
        Ok(self.position()? < segment.end())
    }

    /// Checks that parsing consumed exactly the declared length.
    pub fn finish_segment(&mut self, segment: &Segment) -> Result<()> {
        let position = self.position()?;
        if position != segment.end() {
            return Err(Error::SegmentLengthMismatch {
                marker: segment.marker,
                expected: segment.length as u64,
                actual: position - segment.start,
            });
        }
        Ok(())
    }

    /// Skips the payload of a segment whose length field has been read.
    pub fn skip_segment(&mut self, segment: &Segment) -> Result<()> {
        self.inner.seek(SeekFrom::Start(segment.end()))?;
        Ok(())
    }

    /// Skips entropy-coded data up to (not including) the next marker that is
    /// neither stuffing nor a restart marker. Returns the number of bytes
    /// skipped.
    pub fn skip_entropy_coded_data(&mut self) -> Result<u64> {
        let start = self.position()?;
        loop {
            if self.read_byte()? != 0xFF {
                continue;
            }
            match self.read_byte()? {
                0x00 | 0xD0..=0xD7 => continue,
                0xFF => self.unread(1)?,
                _ => {
                    self.unread(2)?;
                    return Ok(self.position()? - start);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use test_log::test;

    use super::*;
    use crate::markers;

    fn stream(data: &[u8]) -> ByteStream<Cursor<&[u8]>> {
        ByteStream::new(Cursor::new(data))
    }

    #[test]
    fn big_endian_fields() -> Result<()> {
        let mut s = stream(&[0x12, 0x34, 0xA5]);
        assert_eq!(s.read_word()?, 0x1234);
        assert_eq!(s.read_nibbles()?, (0xA, 0x5));
        assert!(matches!(s.read_byte(), Err(Error::Io(_))));
        Ok(())
    }

    #[test]
    fn stuffed_zero_is_not_a_marker() -> Result<()> {
        let mut s = stream(&[0xFF, 0x00, 0xFF, 0xD9]);
        assert_eq!(s.read_marker()?, markers::EOI);
        Ok(())
    }

    #[test]
    fn fill_bytes_before_marker() -> Result<()> {
        let mut s = stream(&[0xFF, 0xFF, 0xD8]);
        assert_eq!(s.read_marker()?, markers::SOI);
        Ok(())
    }

    #[test]
    fn garbage_before_marker_is_skipped() -> Result<()> {
        let mut s = stream(&[0x12, 0x00, 0x34, 0xFF, 0xDB]);
        assert_eq!(s.read_marker()?, markers::DQT);
        assert_eq!(s.position()?, 5);
        Ok(())
    }

    #[test]
    fn segment_bounds() -> Result<()> {
        let mut s = stream(&[0x00, 0x04, 0xAA, 0xBB, 0xCC]);
        let segment = s.begin_segment(markers::COM)?;
        assert_eq!(segment.end(), 4);
        s.read_byte()?;
        assert!(s.has_remaining(&segment)?);
        assert!(matches!(
            s.finish_segment(&segment),
            Err(Error::SegmentLengthMismatch {
                expected: 4,
                actual: 3,
                ..
            })
        ));
        s.read_byte()?;
        s.finish_segment(&segment)?;
        assert_eq!(s.read_byte()?, 0xCC);
        Ok(())
    }

    #[test]
    fn segment_length_too_small() {
        let mut s = stream(&[0x00, 0x01]);
        assert!(matches!(
            s.begin_segment(markers::DQT),
            Err(Error::InvalidSegmentLength(markers::DQT, 1))
        ));
    }

    #[test]
    fn skip_entropy_data_stops_at_real_marker() -> Result<()> {
        let mut s = stream(&[0x12, 0xFF, 0x00, 0x34, 0xFF, 0xD3, 0x56, 0xFF, 0xFF, 0xD9]);
        assert_eq!(s.skip_entropy_coded_data()?, 8);
        assert_eq!(s.read_marker()?, markers::EOI);
        Ok(())
    }
}
