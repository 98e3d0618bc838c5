// Copyright (c) the jpegdec authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::io::{Read, Seek};

use num_derive::FromPrimitive;

use crate::bit_reader::BitReader;
use crate::error::{Error, Result};

pub const MAX_CODE_LENGTH: usize = 16;
pub const MAX_SYMBOLS: usize = 255;

#[repr(u8)]
#[derive(Debug, FromPrimitive, Clone, Copy, PartialEq, Eq)]
pub enum TableClass {
    Dc = 0,
    Ac = 1,
}

/// A Huffman table as transmitted in a DHT segment: the number of codes of
/// each length 1..=16 and the symbols in order of increasing code length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTableSpec {
    pub class: TableClass,
    pub id: u8,
    pub counts: [u8; MAX_CODE_LENGTH],
    pub symbols: Vec<u8>,
}

impl HuffmanTableSpec {
    pub fn new(
        class: TableClass,
        id: u8,
        counts: [u8; MAX_CODE_LENGTH],
        symbols: Vec<u8>,
    ) -> Result<Self> {
        let spec = Self {
            class,
            id,
            counts,
            symbols,
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Checks that the counts and the symbol list agree. Also run by
    /// [`HuffmanCodeTable::build`].
    pub fn validate(&self) -> Result<()> {
        let declared = Self::count_symbols(&self.counts);
        if declared > MAX_SYMBOLS {
            return Err(Error::TooManyHuffmanSymbols(declared));
        }
        if declared != self.symbols.len() {
            return Err(Error::HuffmanSymbolCountMismatch(
                declared,
                self.symbols.len(),
            ));
        }
        Ok(())
    }

    pub fn count_symbols(counts: &[u8; MAX_CODE_LENGTH]) -> usize {
        counts.iter().map(|&c| c as usize).sum()
    }

    pub fn num_symbols(&self) -> usize {
        self.symbols.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HuffmanCode {
    pub code: u16,
    pub length: u8,
}

/// Canonical code assignment for a [`HuffmanTableSpec`] (T.81 Annex C),
/// with the per-length lookup tables of Annex F.2.2.3 for decoding.
#[derive(Debug, Clone)]
pub struct HuffmanCodeTable {
    by_symbol: [Option<HuffmanCode>; 256],
    symbols: Vec<u8>,
    // Indexed by code length; index 0 is unused.
    min_code: [u16; MAX_CODE_LENGTH + 1],
    max_code: [i32; MAX_CODE_LENGTH + 1],
    first_index: [usize; MAX_CODE_LENGTH + 1],
}

impl HuffmanCodeTable {
    pub fn build(spec: &HuffmanTableSpec) -> Result<Self> {
        spec.validate()?;
        let sizes = Self::code_sizes(&spec.counts);
        let codes = Self::assign_codes(&sizes)?;

        let mut by_symbol = [None; 256];
        for ((&symbol, &code), &length) in spec.symbols.iter().zip(&codes).zip(&sizes) {
            let slot = &mut by_symbol[symbol as usize];
            if slot.is_some() {
                return Err(Error::DuplicateHuffmanSymbol(symbol));
            }
            *slot = Some(HuffmanCode { code, length });
        }

        let mut min_code = [0u16; MAX_CODE_LENGTH + 1];
        let mut max_code = [-1i32; MAX_CODE_LENGTH + 1];
        let mut first_index = [0usize; MAX_CODE_LENGTH + 1];
        let mut next = 0;
        for length in 1..=MAX_CODE_LENGTH {
            let count = spec.counts[length - 1] as usize;
            if count == 0 {
                continue;
            }
            first_index[length] = next;
            min_code[length] = codes[next];
            next += count;
            max_code[length] = codes[next - 1] as i32;
        }

        Ok(Self {
            by_symbol,
            symbols: spec.symbols.clone(),
            min_code,
            max_code,
            first_index,
        })
    }

    /// Code length of every symbol in table order (Figure C.1).
    fn code_sizes(counts: &[u8; MAX_CODE_LENGTH]) -> Vec<u8> {
        counts
            .iter()
            .enumerate()
            .flat_map(|(i, &count)| std::iter::repeat_n(i as u8 + 1, count as usize))
            .collect()
    }

    /// Canonical code of every symbol in table order (Figure C.2): codes of
    /// equal length are consecutive, and moving to a longer length shifts the
    /// next code left once per added bit.
    fn assign_codes(sizes: &[u8]) -> Result<Vec<u16>> {
        let mut codes = Vec::with_capacity(sizes.len());
        let mut code = 0u32;
        let mut current_size = sizes.first().copied().unwrap_or(0);
        for &size in sizes {
            if size > current_size {
                code <<= size - current_size;
                current_size = size;
            }
            if code >= 1 << size {
                return Err(Error::HuffmanCodeOverflow(size as usize));
            }
            codes.push(code as u16);
            code += 1;
        }
        Ok(codes)
    }

    /// The (code, length) pair assigned to `symbol`, if the table contains it.
    pub fn code_for(&self, symbol: u8) -> Option<HuffmanCode> {
        self.by_symbol[symbol as usize]
    }

    /// The symbol whose code is exactly `code` on `length` bits.
    pub fn lookup(&self, code: u16, length: usize) -> Option<u8> {
        let max = self.max_code[length];
        if max < 0 || code as i32 > max || code < self.min_code[length] {
            return None;
        }
        let index = self.first_index[length] + (code - self.min_code[length]) as usize;
        Some(self.symbols[index])
    }

    /// Reads bits one at a time until they spell a code of this table.
    pub fn read_code<R: Read + Seek>(&self, br: &mut BitReader<R>) -> Result<u8> {
        let mut code = 0u16;
        for length in 1..=MAX_CODE_LENGTH {
            code = (code << 1) | br.next_bit()? as u16;
            if let Some(symbol) = self.lookup(code, length) {
                return Ok(symbol);
            }
        }
        Err(Error::InvalidHuffmanCode)
    }
}
