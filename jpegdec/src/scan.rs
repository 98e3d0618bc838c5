// Copyright (c) the jpegdec authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::io::{Read, Seek};

use crate::BLOCK_SIZE;
use crate::bit_reader::BitReader;
use crate::entropy_coding::coefficients::{Block, decode_block};
use crate::entropy_coding::huffman::{HuffmanCodeTable, TableClass};
use crate::error::{Error, Result};
use crate::headers::{FrameHeader, ScanHeader};
use crate::markers;
use crate::options::DecodeOptions;
use crate::session::Session;
use crate::stream::ByteStream;
#[allow(unused_imports)]
use crate::util::tracing_wrappers::*;

/// Quantized coefficients of one component, as a raster of 8x8 blocks padded
/// to whole MCUs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoefficientPlane {
    pub component_id: u8,
    pub blocks_wide: usize,
    pub blocks_high: usize,
    pub blocks: Vec<Block>,
}

impl CoefficientPlane {
    pub fn new(component_id: u8, blocks_wide: usize, blocks_high: usize) -> Result<Self> {
        let num_blocks = blocks_wide * blocks_high;
        let mut blocks = Vec::new();
        blocks.try_reserve_exact(num_blocks)?;
        blocks.resize(num_blocks, [0; BLOCK_SIZE]);
        Ok(Self {
            component_id,
            blocks_wide,
            blocks_high,
            blocks,
        })
    }

    /// Allocates zeroed planes for every component of `frame`.
    pub fn for_frame(frame: &FrameHeader, options: &DecodeOptions) -> Result<Vec<Self>> {
        let total: usize = frame
            .components
            .iter()
            .map(|c| {
                let (w, h) = frame.padded_blocks(c);
                w * h
            })
            .sum();
        options.limits.check_blocks(total)?;
        let mut planes = Vec::new();
        planes.try_reserve_exact(frame.components.len())?;
        for component in &frame.components {
            let (w, h) = frame.padded_blocks(component);
            planes.push(Self::new(component.id, w, h)?);
        }
        Ok(planes)
    }

    pub fn block(&self, row: usize, col: usize) -> &Block {
        &self.blocks[row * self.blocks_wide + col]
    }

    pub fn block_mut(&mut self, row: usize, col: usize) -> &mut Block {
        &mut self.blocks[row * self.blocks_wide + col]
    }
}

struct ScanTarget<'a> {
    plane: usize,
    h_sampling: usize,
    v_sampling: usize,
    dc_table: &'a HuffmanCodeTable,
    ac_table: &'a HuffmanCodeTable,
    dc_predictor: i32,
}

/// Decodes the entropy-coded data of a baseline scan into `planes`, which
/// are indexed like the frame's components. Returns once every MCU of the
/// scan has been decoded; the following marker is left for the caller.
#[cfg_attr(feature = "tracing", instrument(level = "debug", skip_all, err))]
pub fn decode_scan<R: Read + Seek>(
    stream: &mut ByteStream<R>,
    session: &Session,
    scan: &ScanHeader,
    options: &DecodeOptions,
    planes: &mut [CoefficientPlane],
) -> Result<()> {
    let frame = session.frame()?;
    let mut targets = Vec::with_capacity(scan.components.len());
    for sc in &scan.components {
        let component = &frame.components[sc.index];
        targets.push(ScanTarget {
            plane: sc.index,
            h_sampling: component.h_sampling as usize,
            v_sampling: component.v_sampling as usize,
            dc_table: session.huffman_table(TableClass::Dc, sc.dc_table)?,
            ac_table: session.huffman_table(TableClass::Ac, sc.ac_table)?,
            dc_predictor: 0,
        });
    }

    let (mcus_wide, num_mcus) = if scan.is_interleaved() {
        (frame.mcus_wide(), frame.mcus_wide() * frame.mcus_tall())
    } else {
        let (w, h) = frame.component_blocks(&frame.components[scan.components[0].index]);
        (w, w * h)
    };
    let restart_interval = session.restart_interval as usize;
    let mut expected_restart = 0u8;
    let mut br = BitReader::new(stream);

    for mcu in 0..num_mcus {
        if restart_interval > 0 && mcu > 0 && mcu % restart_interval == 0 {
            handle_restart(&mut br, options, &mut expected_restart)?;
            for target in targets.iter_mut() {
                target.dc_predictor = 0;
            }
        }
        let mcu_row = mcu / mcus_wide;
        let mcu_col = mcu % mcus_wide;
        for target in targets.iter_mut() {
            let plane = &mut planes[target.plane];
            if scan.is_interleaved() {
                for v in 0..target.v_sampling {
                    for h in 0..target.h_sampling {
                        let block = plane.block_mut(
                            mcu_row * target.v_sampling + v,
                            mcu_col * target.h_sampling + h,
                        );
                        decode_block(
                            &mut br,
                            target.dc_table,
                            target.ac_table,
                            &mut target.dc_predictor,
                            block,
                        )?;
                    }
                }
            } else {
                let block = plane.block_mut(mcu_row, mcu_col);
                decode_block(
                    &mut br,
                    target.dc_table,
                    target.ac_table,
                    &mut target.dc_predictor,
                    block,
                )?;
            }
        }
        trace!(mcu, "decoded MCU");
    }
    Ok(())
}

fn handle_restart<R: Read + Seek>(
    br: &mut BitReader<R>,
    options: &DecodeOptions,
    expected: &mut u8,
) -> Result<()> {
    let marker = if options.strict_restart_markers {
        let marker = br.read_marker()?;
        if !markers::is_restart(marker) {
            return Err(Error::MissingRestartMarker(marker));
        }
        Some(marker)
    } else {
        br.read_restart_marker()?
    };
    match marker.and_then(markers::restart_index) {
        Some(index) => {
            if index != *expected {
                warn!(index, expected = *expected, "restart marker out of sequence");
            }
            trace!(index, "restart marker");
            *expected = (index + 1) % 8;
        }
        None => {
            warn!("restart marker missing at interval boundary");
            *expected = (*expected + 1) % 8;
        }
    }
    Ok(())
}

/// Skips the entropy-coded data of a scan this decoder does not decode.
/// Returns the number of bytes skipped.
pub fn skip_scan<R: Read + Seek>(stream: &mut ByteStream<R>) -> Result<u64> {
    let skipped = stream.skip_entropy_coded_data()?;
    warn!(skipped, "progressive scan data skipped");
    Ok(skipped)
}
