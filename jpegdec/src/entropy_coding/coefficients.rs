// Copyright (c) the jpegdec authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::io::{Read, Seek};

use crate::BLOCK_SIZE;
use crate::bit_reader::BitReader;
use crate::entropy_coding::huffman::HuffmanCodeTable;
use crate::error::{Error, Result};
use crate::zigzag::ZIGZAG;

/// Quantized DCT coefficients of one 8x8 block, in natural (row-major) order.
pub type Block = [i32; BLOCK_SIZE];

pub const MAX_CATEGORY: u8 = 15;

const END_OF_BLOCK: u8 = 0x00;
const ZERO_RUN_16: u8 = 0xF0;

/// Reconstructs a coefficient from its magnitude category and the `category`
/// extra bits that follow it. Extra bits with a clear leading bit encode
/// negative values.
pub fn decode_coefficient(category: u8, extra: u16) -> i32 {
    if category == 0 {
        return 0;
    }
    let extra = extra as i32;
    if extra >> (category - 1) & 1 == 0 {
        extra - ((1 << category) - 1)
    } else {
        extra
    }
}

/// Number of bits needed to represent `|value|`.
pub fn encode_category(value: i32) -> u8 {
    let mut magnitude = value.unsigned_abs();
    let mut category = 0;
    while magnitude != 0 {
        magnitude >>= 1;
        category += 1;
    }
    category
}

/// Extra bits that, with `category`, decode back to `value`.
pub fn encode_extra(value: i32, category: u8) -> u16 {
    let bits = if value < 0 { value - 1 } else { value };
    (bits & ((1 << category) - 1)) as u16
}

fn read_category_value<R: Read + Seek>(br: &mut BitReader<R>, category: u8) -> Result<i32> {
    let extra = br.read_bits(category)?;
    Ok(decode_coefficient(category, extra))
}

/// Decodes one block into `block`, which is cleared first. `dc_predictor`
/// holds the previous DC value of the same component and is updated.
pub fn decode_block<R: Read + Seek>(
    br: &mut BitReader<R>,
    dc_table: &HuffmanCodeTable,
    ac_table: &HuffmanCodeTable,
    dc_predictor: &mut i32,
    block: &mut Block,
) -> Result<()> {
    block.fill(0);

    let category = dc_table.read_code(br)?;
    if category > MAX_CATEGORY {
        return Err(Error::InvalidCategory(category));
    }
    *dc_predictor = dc_predictor.wrapping_add(read_category_value(br, category)?);
    block[0] = *dc_predictor;

    let mut index = 1;
    while index < BLOCK_SIZE {
        let symbol = ac_table.read_code(br)?;
        match symbol {
            END_OF_BLOCK => break,
            ZERO_RUN_16 => {
                if index + 16 > BLOCK_SIZE {
                    return Err(Error::CoefficientOverflow { index, run: 16 });
                }
                index += 16;
            }
            _ => {
                let run = (symbol >> 4) as usize;
                let category = symbol & 0x0F;
                if index + run >= BLOCK_SIZE {
                    return Err(Error::CoefficientOverflow { index, run });
                }
                index += run;
                block[ZIGZAG[index]] = read_category_value(br, category)?;
                index += 1;
            }
        }
    }
    Ok(())
}
