// Copyright (c) the jpegdec authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::io::{Read, Seek};

use crate::error::{Error, Result};
use crate::markers;
use crate::stream::ByteStream;

/// Reads entropy-coded data MSB-first, removing byte stuffing.
///
/// When an 0xFF byte is followed by anything other than 0x00, the stream is
/// rewound to the 0xFF and every further read fails with
/// [`Error::NoMoreData`] until [`BitReader::read_marker`] consumes the marker.
pub struct BitReader<'a, R> {
    stream: &'a mut ByteStream<R>,
    current: u8,
    bits_left: u8,
    at_marker: bool,
}

impl<'a, R: Read + Seek> BitReader<'a, R> {
    pub fn new(stream: &'a mut ByteStream<R>) -> Self {
        Self {
            stream,
            current: 0,
            bits_left: 0,
            at_marker: false,
        }
    }

    fn refill(&mut self) -> Result<()> {
        if self.at_marker {
            return Err(Error::NoMoreData);
        }
        let byte = self.stream.read_byte()?;
        if byte == 0xFF && self.stream.read_byte()? != 0x00 {
            self.stream.unread(2)?;
            self.at_marker = true;
            return Err(Error::NoMoreData);
        }
        self.current = byte;
        self.bits_left = 8;
        Ok(())
    }

    pub fn next_bit(&mut self) -> Result<u8> {
        if self.bits_left == 0 {
            self.refill()?;
        }
        self.bits_left -= 1;
        Ok((self.current >> self.bits_left) & 1)
    }

    /// Reads `count` bits, most significant first. `count` must not exceed 16.
    pub fn read_bits(&mut self, count: u8) -> Result<u16> {
        debug_assert!(count <= 16);
        let mut value = 0u16;
        for _ in 0..count {
            value = (value << 1) | self.next_bit()? as u16;
        }
        Ok(value)
    }

    /// Discards the unread bits of the current byte.
    pub fn align(&mut self) {
        self.bits_left = 0;
    }

    pub fn at_marker(&self) -> bool {
        self.at_marker
    }

    /// Aligns to a byte boundary and reads the next marker. Bit reads may
    /// resume afterwards.
    pub fn read_marker(&mut self) -> Result<u16> {
        self.align();
        self.at_marker = false;
        self.stream.read_marker()
    }

    /// Consumes an RSTm marker if one follows the current byte, returning its
    /// code. Otherwise the reader is left where it was.
    pub fn read_restart_marker(&mut self) -> Result<Option<u16>> {
        let bits_left = self.bits_left;
        self.align();
        let position = self.stream.position()?;
        if self.stream.read_byte()? == 0xFF {
            let mut code = self.stream.read_byte()?;
            while code == 0xFF {
                code = self.stream.read_byte()?;
            }
            let marker = 0xFF00 | code as u16;
            if markers::is_restart(marker) {
                self.at_marker = false;
                return Ok(Some(marker));
            }
        }
        self.stream.seek_to(position)?;
        self.bits_left = bits_left;
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use test_log::test;

    use super::*;

    #[test]
    fn msb_first() -> Result<()> {
        let mut stream = ByteStream::new(Cursor::new(&[0b1011_0010u8, 0b0111_1111][..]));
        let mut br = BitReader::new(&mut stream);
        assert_eq!(br.next_bit()?, 1);
        assert_eq!(br.read_bits(3)?, 0b011);
        assert_eq!(br.read_bits(0)?, 0);
        assert_eq!(br.read_bits(8)?, 0b0010_0111);
        assert_eq!(br.read_bits(4)?, 0b1111);
        Ok(())
    }

    #[test]
    fn stuffed_byte_is_literal() -> Result<()> {
        let mut stream = ByteStream::new(Cursor::new(&[0xFFu8, 0x00, 0x80][..]));
        let mut br = BitReader::new(&mut stream);
        assert_eq!(br.read_bits(8)?, 0xFF);
        assert_eq!(br.next_bit()?, 1);
        Ok(())
    }

    #[test]
    fn stuffed_byte_then_end_of_image() -> Result<()> {
        let mut stream = ByteStream::new(Cursor::new(&[0xFFu8, 0x00, 0xFF, 0xD9][..]));
        let mut br = BitReader::new(&mut stream);
        assert_eq!(br.read_bits(8)?, 0xFF);
        assert!(matches!(br.next_bit(), Err(Error::NoMoreData)));
        assert_eq!(br.read_marker()?, markers::EOI);
        Ok(())
    }

    #[test]
    fn stops_at_marker() -> Result<()> {
        let mut stream = ByteStream::new(Cursor::new(&[0xA5u8, 0xFF, 0xD9][..]));
        let mut br = BitReader::new(&mut stream);
        assert_eq!(br.read_bits(8)?, 0xA5);
        assert!(matches!(br.next_bit(), Err(Error::NoMoreData)));
        assert!(br.at_marker());
        assert!(matches!(br.next_bit(), Err(Error::NoMoreData)));
        assert_eq!(br.read_marker()?, markers::EOI);
        assert!(!br.at_marker());
        Ok(())
    }

    #[test]
    fn align_then_restart_marker() -> Result<()> {
        let mut stream = ByteStream::new(Cursor::new(&[0b1100_0000u8, 0xFF, 0xD0, 0x80][..]));
        let mut br = BitReader::new(&mut stream);
        assert_eq!(br.read_bits(2)?, 0b11);
        assert_eq!(br.read_marker()?, markers::RST0);
        assert_eq!(br.next_bit()?, 1);
        Ok(())
    }

    #[test]
    fn optional_restart_marker() -> Result<()> {
        let data = [0b1000_0000u8, 0xFF, 0xFF, 0xD3, 0b0100_0000, 0x12];
        let mut stream = ByteStream::new(Cursor::new(&data[..]));
        let mut br = BitReader::new(&mut stream);
        assert_eq!(br.next_bit()?, 1);
        assert_eq!(br.read_restart_marker()?, Some(0xFFD3));
        assert_eq!(br.read_bits(2)?, 0b01);
        assert_eq!(br.read_restart_marker()?, None);
        assert_eq!(br.read_bits(6)?, 0);
        assert_eq!(br.read_bits(8)?, 0x12);
        Ok(())
    }

    #[test]
    fn end_of_input_is_io_error() {
        let mut stream = ByteStream::new(Cursor::new(&[0x00u8][..]));
        let mut br = BitReader::new(&mut stream);
        assert!(br.read_bits(8).is_ok());
        assert!(matches!(br.next_bit(), Err(Error::Io(_))));
    }
}
