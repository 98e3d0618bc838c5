// Copyright (c) the jpegdec authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::io::{Result, Write};

use jpegdec::BLOCK_DIM;
use jpegdec::decode::DecodedImage;
use jpegdec::scan::CoefficientPlane;

pub fn describe(out: &mut impl Write, image: &DecodedImage, verbose: bool) -> Result<()> {
    let session = &image.session;
    match &session.frame {
        Some(frame) => {
            writeln!(
                out,
                "{}x{}, {}, {} component(s), {}x{} MCUs",
                frame.width,
                frame.height,
                if frame.progressive {
                    "progressive (coefficients not decoded)"
                } else {
                    "baseline"
                },
                frame.components.len(),
                frame.mcus_wide(),
                frame.mcus_tall(),
            )?;
            for component in &frame.components {
                let (blocks_wide, blocks_high) = frame.padded_blocks(component);
                writeln!(
                    out,
                    "  component {}: sampling {}x{}, quantization table {}, Huffman tables DC {} AC {}, {}x{} blocks",
                    component.id,
                    component.h_sampling,
                    component.v_sampling,
                    component.quant_table,
                    component.dc_table,
                    component.ac_table,
                    blocks_wide,
                    blocks_high,
                )?;
            }
        }
        None => writeln!(out, "No frame header")?,
    }
    if session.restart_interval > 0 {
        writeln!(out, "Restart interval: {} MCUs", session.restart_interval)?;
    }

    for table in session.quant_tables.iter().flatten() {
        writeln!(out, "Quantization table {}: {:?}", table.id, table.precision)?;
        if verbose {
            for row in table.values.chunks(BLOCK_DIM) {
                writeln!(out, "  {}", format_row(row))?;
            }
        }
    }
    let huffman_tables = session.dc_tables.iter().chain(&session.ac_tables).flatten();
    for table in huffman_tables {
        writeln!(
            out,
            "{:?} Huffman table {}: {} symbols",
            table.spec.class,
            table.spec.id,
            table.spec.num_symbols()
        )?;
        if verbose {
            writeln!(out, "  code lengths: {:?}", table.spec.counts)?;
        }
    }

    writeln!(out, "Scans: {}", session.scans.len())?;
    if verbose {
        for scan in &session.scans {
            let ids: Vec<u8> = scan.components.iter().map(|c| c.id).collect();
            writeln!(
                out,
                "  components {:?}, spectral selection {}..={}, approximation {}/{}",
                ids, scan.spectral_start, scan.spectral_end, scan.approx_high, scan.approx_low
            )?;
        }
    }
    for comment in &session.comments {
        writeln!(out, "Comment: {comment}")?;
    }
    Ok(())
}

/// Prints the first `count` blocks of `plane` in raster order.
pub fn describe_blocks(out: &mut impl Write, plane: &CoefficientPlane, count: usize) -> Result<()> {
    for (i, block) in plane.blocks.iter().take(count).enumerate() {
        let (row, col) = (i / plane.blocks_wide, i % plane.blocks_wide);
        writeln!(
            out,
            "Component {} block ({row}, {col}):",
            plane.component_id
        )?;
        for coefficients in block.chunks(BLOCK_DIM) {
            writeln!(out, "  {}", format_row(coefficients))?;
        }
    }
    Ok(())
}

fn format_row<T: std::fmt::Display>(row: &[T]) -> String {
    row.iter()
        .map(|v| format!("{v:>6}"))
        .collect::<Vec<_>>()
        .join("")
}
