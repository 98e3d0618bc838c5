// Copyright (c) the jpegdec authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::io::{Read, Seek};

use crate::BLOCK_DIM;
use crate::error::{Error, Result};
use crate::markers;
use crate::stream::ByteStream;
#[allow(unused_imports)]
use crate::util::tracing_wrappers::*;

pub const MAX_SAMPLING_FACTOR: u8 = 4;
pub const NUM_TABLE_SLOTS: u8 = 4;

/// One image component as declared by the frame header. The Huffman table
/// selectors are filled in by the most recent scan header that includes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    pub id: u8,
    pub h_sampling: u8,
    pub v_sampling: u8,
    pub quant_table: u8,
    pub dc_table: u8,
    pub ac_table: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameHeader {
    pub progressive: bool,
    pub precision: u8,
    pub height: u16,
    pub width: u16,
    pub components: Vec<Component>,
}

impl FrameHeader {
    /// Parses a SOF0 or SOF2 payload. The marker has already been consumed.
    pub fn read<R: Read + Seek>(stream: &mut ByteStream<R>, marker: u16) -> Result<FrameHeader> {
        let segment = stream.begin_segment(marker)?;
        let precision = stream.read_byte()?;
        if precision != 8 {
            return Err(Error::UnsupportedPrecision(precision));
        }
        let height = stream.read_word()?;
        let width = stream.read_word()?;
        if height == 0 || width == 0 {
            return Err(Error::InvalidDimensions(width, height));
        }
        let num_components = stream.read_byte()?;
        if num_components == 0 {
            return Err(Error::InvalidComponentCount(num_components));
        }

        let mut components: Vec<Component> = Vec::with_capacity(num_components as usize);
        for _ in 0..num_components {
            let id = stream.read_byte()?;
            let (h_sampling, v_sampling) = stream.read_nibbles()?;
            let quant_table = stream.read_byte()?;
            if components.iter().any(|c| c.id == id) {
                return Err(Error::DuplicateComponent(id));
            }
            let valid_factor = |f: u8| (1..=MAX_SAMPLING_FACTOR).contains(&f);
            if !valid_factor(h_sampling) || !valid_factor(v_sampling) {
                return Err(Error::InvalidSamplingFactors(h_sampling, v_sampling));
            }
            if quant_table >= NUM_TABLE_SLOTS {
                return Err(Error::InvalidQuantSelector(quant_table));
            }
            components.push(Component {
                id,
                h_sampling,
                v_sampling,
                quant_table,
                dc_table: 0,
                ac_table: 0,
            });
        }
        stream.finish_segment(&segment)?;

        let frame = FrameHeader {
            progressive: marker == markers::SOF2,
            precision,
            height,
            width,
            components,
        };
        debug!(?frame, "frame header");
        Ok(frame)
    }

    pub fn component(&self, id: u8) -> Option<&Component> {
        self.components.iter().find(|c| c.id == id)
    }

    pub fn component_index(&self, id: u8) -> Option<usize> {
        self.components.iter().position(|c| c.id == id)
    }

    pub fn max_h_sampling(&self) -> u8 {
        self.components.iter().map(|c| c.h_sampling).max().unwrap_or(1)
    }

    pub fn max_v_sampling(&self) -> u8 {
        self.components.iter().map(|c| c.v_sampling).max().unwrap_or(1)
    }

    pub fn mcus_wide(&self) -> usize {
        (self.width as usize).div_ceil(BLOCK_DIM * self.max_h_sampling() as usize)
    }

    pub fn mcus_tall(&self) -> usize {
        (self.height as usize).div_ceil(BLOCK_DIM * self.max_v_sampling() as usize)
    }

    /// Block grid of a component's coefficient plane, padded to whole MCUs.
    pub fn padded_blocks(&self, component: &Component) -> (usize, usize) {
        (
            self.mcus_wide() * component.h_sampling as usize,
            self.mcus_tall() * component.v_sampling as usize,
        )
    }

    /// Blocks that cover the component's own samples. This is the grid a
    /// non-interleaved scan walks.
    pub fn component_blocks(&self, component: &Component) -> (usize, usize) {
        let samples = |size: u16, factor: u8, max: u8| {
            (size as usize * factor as usize).div_ceil(max as usize)
        };
        let width = samples(self.width, component.h_sampling, self.max_h_sampling());
        let height = samples(self.height, component.v_sampling, self.max_v_sampling());
        (width.div_ceil(BLOCK_DIM), height.div_ceil(BLOCK_DIM))
    }

    pub fn num_pixels(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}
