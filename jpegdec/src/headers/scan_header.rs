// Copyright (c) the jpegdec authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::io::{Read, Seek};

use crate::error::{Error, Result};
use crate::headers::frame_header::{FrameHeader, NUM_TABLE_SLOTS};
use crate::stream::ByteStream;
#[allow(unused_imports)]
use crate::util::tracing_wrappers::*;

pub const MAX_SCAN_COMPONENTS: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanComponent {
    pub id: u8,
    /// Index of the component in [`FrameHeader::components`].
    pub index: usize,
    pub dc_table: u8,
    pub ac_table: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanHeader {
    pub components: Vec<ScanComponent>,
    pub spectral_start: u8,
    pub spectral_end: u8,
    pub approx_high: u8,
    pub approx_low: u8,
}

impl ScanHeader {
    /// Parses a SOS payload against the current frame and points the table
    /// selectors of the referenced frame components at this scan's tables.
    pub fn read<R: Read + Seek>(
        stream: &mut ByteStream<R>,
        marker: u16,
        frame: &mut FrameHeader,
    ) -> Result<ScanHeader> {
        let segment = stream.begin_segment(marker)?;
        let num_components = stream.read_byte()?;
        if num_components == 0 || num_components > MAX_SCAN_COMPONENTS {
            return Err(Error::InvalidComponentCount(num_components));
        }
        let mut components: Vec<ScanComponent> = Vec::with_capacity(num_components as usize);
        for _ in 0..num_components {
            let id = stream.read_byte()?;
            let (dc_table, ac_table) = stream.read_nibbles()?;
            let index = frame
                .component_index(id)
                .ok_or(Error::UnknownComponent(id))?;
            if components.iter().any(|c| c.id == id) {
                return Err(Error::DuplicateScanComponent(id));
            }
            if dc_table >= NUM_TABLE_SLOTS {
                return Err(Error::InvalidHuffmanTableId(0, dc_table));
            }
            if ac_table >= NUM_TABLE_SLOTS {
                return Err(Error::InvalidHuffmanTableId(1, ac_table));
            }
            let component = &mut frame.components[index];
            component.dc_table = dc_table;
            component.ac_table = ac_table;
            components.push(ScanComponent {
                id,
                index,
                dc_table,
                ac_table,
            });
        }
        let spectral_start = stream.read_byte()?;
        let spectral_end = stream.read_byte()?;
        let (approx_high, approx_low) = stream.read_nibbles()?;
        stream.finish_segment(&segment)?;

        let scan = ScanHeader {
            components,
            spectral_start,
            spectral_end,
            approx_high,
            approx_low,
        };
        debug!(?scan, "scan header");
        Ok(scan)
    }

    pub fn is_interleaved(&self) -> bool {
        self.components.len() > 1
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use test_log::test;

    use super::*;
    use crate::headers::frame_header::Component;
    use crate::markers;

    fn frame() -> FrameHeader {
        let component = |id| Component {
            id,
            h_sampling: 1,
            v_sampling: 1,
            quant_table: 0,
            dc_table: 0,
            ac_table: 0,
        };
        FrameHeader {
            progressive: false,
            precision: 8,
            height: 8,
            width: 8,
            components: vec![component(1), component(2), component(3)],
        }
    }

    fn parse(payload: &[u8], frame: &mut FrameHeader) -> Result<ScanHeader> {
        let mut data = ((payload.len() + 2) as u16).to_be_bytes().to_vec();
        data.extend_from_slice(payload);
        let mut stream = ByteStream::new(Cursor::new(&data[..]));
        ScanHeader::read(&mut stream, markers::SOS, frame)
    }

    #[test]
    fn updates_component_selectors() -> Result<()> {
        let mut frame = frame();
        let scan = parse(&[2, 3, 0x11, 2, 0x01, 0, 63, 0], &mut frame)?;
        assert!(scan.is_interleaved());
        assert_eq!(scan.components[0].index, 2);
        assert_eq!(scan.components[1].index, 1);
        assert_eq!((scan.spectral_start, scan.spectral_end), (0, 63));
        assert_eq!(frame.components[2].dc_table, 1);
        assert_eq!(frame.components[2].ac_table, 1);
        assert_eq!(frame.components[1].dc_table, 0);
        assert_eq!(frame.components[1].ac_table, 1);
        assert_eq!(frame.components[0].ac_table, 0);
        Ok(())
    }

    #[test]
    fn rejects_bad_scans() {
        let mut frame = frame();
        assert!(matches!(
            parse(&[0, 0, 63, 0], &mut frame),
            Err(Error::InvalidComponentCount(0))
        ));
        assert!(matches!(
            parse(&[1, 9, 0x00, 0, 63, 0], &mut frame),
            Err(Error::UnknownComponent(9))
        ));
        assert!(matches!(
            parse(&[2, 1, 0x00, 1, 0x00, 0, 63, 0], &mut frame),
            Err(Error::DuplicateScanComponent(1))
        ));
        assert!(matches!(
            parse(&[1, 1, 0x40, 0, 63, 0], &mut frame),
            Err(Error::InvalidHuffmanTableId(0, 4))
        ));
    }
}
