// Copyright (c) the jpegdec authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::io::{Read, Seek};

use num_traits::FromPrimitive;

use crate::entropy_coding::huffman::{HuffmanTableSpec, MAX_CODE_LENGTH, MAX_SYMBOLS, TableClass};
use crate::error::{Error, Result};
use crate::headers::frame_header::NUM_TABLE_SLOTS;
use crate::stream::ByteStream;
#[allow(unused_imports)]
use crate::util::tracing_wrappers::*;

/// Parses every table of a DHT segment. The marker has already been consumed.
pub fn read_huffman_tables<R: Read + Seek>(
    stream: &mut ByteStream<R>,
    marker: u16,
) -> Result<Vec<HuffmanTableSpec>> {
    let segment = stream.begin_segment(marker)?;
    let mut tables = Vec::new();
    while stream.has_remaining(&segment)? {
        tables.push(read_huffman_table(stream)?);
    }
    stream.finish_segment(&segment)?;
    Ok(tables)
}

fn read_huffman_table<R: Read + Seek>(stream: &mut ByteStream<R>) -> Result<HuffmanTableSpec> {
    let (tc, id) = stream.read_nibbles()?;
    let class = TableClass::from_u8(tc).ok_or(Error::InvalidHuffmanTableId(tc, id))?;
    if id >= NUM_TABLE_SLOTS {
        return Err(Error::InvalidHuffmanTableId(tc, id));
    }
    let mut counts = [0u8; MAX_CODE_LENGTH];
    stream.read_exact(&mut counts)?;
    let num_symbols = HuffmanTableSpec::count_symbols(&counts);
    if num_symbols > MAX_SYMBOLS {
        return Err(Error::TooManyHuffmanSymbols(num_symbols));
    }
    let mut symbols = vec![0u8; num_symbols];
    stream.read_exact(&mut symbols)?;
    debug!(?class, id, num_symbols, "Huffman table");
    HuffmanTableSpec::new(class, id, counts, symbols)
}
