// Copyright (c) the jpegdec authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::io::{Read, Seek};

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use crate::BLOCK_SIZE;
use crate::error::{Error, Result};
use crate::headers::frame_header::NUM_TABLE_SLOTS;
use crate::stream::ByteStream;
#[allow(unused_imports)]
use crate::util::tracing_wrappers::*;
use crate::zigzag;

#[repr(u8)]
#[derive(Debug, FromPrimitive, Clone, Copy, PartialEq, Eq)]
pub enum QuantPrecision {
    Bits8 = 0,
    Bits16 = 1,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantizationTable {
    pub id: u8,
    pub precision: QuantPrecision,
    /// Quantizer step sizes in natural order.
    pub values: [u16; BLOCK_SIZE],
}

impl QuantizationTable {
    /// Parses every table of a DQT segment. The marker has already been
    /// consumed.
    pub fn read_segment<R: Read + Seek>(
        stream: &mut ByteStream<R>,
        marker: u16,
    ) -> Result<Vec<QuantizationTable>> {
        let segment = stream.begin_segment(marker)?;
        let mut tables = Vec::new();
        while stream.has_remaining(&segment)? {
            tables.push(Self::read(stream)?);
        }
        stream.finish_segment(&segment)?;
        Ok(tables)
    }

    fn read<R: Read + Seek>(stream: &mut ByteStream<R>) -> Result<QuantizationTable> {
        let (pq, id) = stream.read_nibbles()?;
        let precision = QuantPrecision::from_u8(pq).ok_or(Error::InvalidQuantTable(pq, id))?;
        if id >= NUM_TABLE_SLOTS {
            return Err(Error::InvalidQuantTable(pq, id));
        }
        let mut zigzag_order = [0u16; BLOCK_SIZE];
        for value in zigzag_order.iter_mut() {
            *value = match precision {
                QuantPrecision::Bits8 => stream.read_byte()? as u16,
                QuantPrecision::Bits16 => stream.read_word()?,
            };
        }
        let table = QuantizationTable {
            id,
            precision,
            values: zigzag::to_natural_order(&zigzag_order),
        };
        debug!(id, ?precision, "quantization table");
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use test_log::test;

    use super::*;
    use crate::markers;

    fn segment(payload: &[u8]) -> Vec<u8> {
        let mut data = ((payload.len() + 2) as u16).to_be_bytes().to_vec();
        data.extend_from_slice(payload);
        data
    }

    #[test]
    fn two_tables_in_one_segment() -> Result<()> {
        let mut payload = vec![0x00];
        payload.extend((1..=64).map(|v| v as u8));
        payload.push(0x13);
        for i in 0..64u16 {
            payload.extend_from_slice(&(i * 256).to_be_bytes());
        }
        let data = segment(&payload);
        let mut stream = ByteStream::new(Cursor::new(&data[..]));
        let tables = QuantizationTable::read_segment(&mut stream, markers::DQT)?;
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].id, 0);
        assert_eq!(tables[0].precision, QuantPrecision::Bits8);
        assert_eq!(&tables[0].values[..4], &[1, 2, 6, 7]);
        assert_eq!(tables[0].values[8], 3);
        assert_eq!(tables[1].id, 3);
        assert_eq!(tables[1].precision, QuantPrecision::Bits16);
        assert_eq!(tables[1].values[63], 63 * 256);
        Ok(())
    }

    #[test]
    fn rejects_bad_destination_and_precision() {
        let mut payload = vec![0x04];
        payload.extend([1u8; 64]);
        let data = segment(&payload);
        let mut stream = ByteStream::new(Cursor::new(&data[..]));
        assert!(matches!(
            QuantizationTable::read_segment(&mut stream, markers::DQT),
            Err(Error::InvalidQuantTable(0, 4))
        ));

        let mut payload = vec![0x20];
        payload.extend([1u8; 64]);
        let data = segment(&payload);
        let mut stream = ByteStream::new(Cursor::new(&data[..]));
        assert!(matches!(
            QuantizationTable::read_segment(&mut stream, markers::DQT),
            Err(Error::InvalidQuantTable(2, 0))
        ));
    }

    #[test]
    fn table_overruns_segment() {
        let mut data = 66u16.to_be_bytes().to_vec();
        data.push(0x00);
        data.extend([1u8; 64]);
        data.extend([0xFF, 0xD9]);
        let mut stream = ByteStream::new(Cursor::new(&data[..]));
        assert!(matches!(
            QuantizationTable::read_segment(&mut stream, markers::DQT),
            Err(Error::SegmentLengthMismatch {
                expected: 66,
                actual: 67,
                ..
            })
        ));
    }
}
