// Copyright (c) the jpegdec authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::entropy_coding::huffman::{HuffmanCodeTable, HuffmanTableSpec, TableClass};
use crate::error::{Error, Result};
use crate::headers::{Component, FrameHeader, QuantizationTable, ScanHeader};

/// A Huffman table definition together with its canonical codes.
#[derive(Debug, Clone)]
pub struct HuffmanTable {
    pub spec: HuffmanTableSpec,
    pub codes: HuffmanCodeTable,
}

impl HuffmanTable {
    pub fn new(spec: HuffmanTableSpec) -> Result<Self> {
        let codes = HuffmanCodeTable::build(&spec)?;
        Ok(Self { spec, codes })
    }
}

/// Everything the headers of one image establish. Table slots are replaced
/// in place when a later segment redefines them.
#[derive(Debug, Clone)]
pub struct Session {
    pub frame: Option<FrameHeader>,
    pub quant_tables: [Option<QuantizationTable>; 4],
    pub dc_tables: [Option<HuffmanTable>; 4],
    pub ac_tables: [Option<HuffmanTable>; 4],
    /// MCUs between restart markers; 0 disables restarts.
    pub restart_interval: u16,
    pub comments: Vec<String>,
    pub scans: Vec<ScanHeader>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            frame: None,
            quant_tables: array_init::array_init(|_| None),
            dc_tables: array_init::array_init(|_| None),
            ac_tables: array_init::array_init(|_| None),
            restart_interval: 0,
            comments: Vec::new(),
            scans: Vec::new(),
        }
    }
}

impl Session {
    pub fn frame(&self) -> Result<&FrameHeader> {
        self.frame.as_ref().ok_or(Error::MissingFrame)
    }

    pub fn component(&self, id: u8) -> Option<&Component> {
        self.frame.as_ref()?.component(id)
    }

    pub fn install_quant_table(&mut self, table: QuantizationTable) {
        let slot = table.id as usize;
        self.quant_tables[slot] = Some(table);
    }

    pub fn install_huffman_table(&mut self, spec: HuffmanTableSpec) -> Result<()> {
        let slot = spec.id as usize;
        let table = HuffmanTable::new(spec)?;
        match table.spec.class {
            TableClass::Dc => self.dc_tables[slot] = Some(table),
            TableClass::Ac => self.ac_tables[slot] = Some(table),
        }
        Ok(())
    }

    pub fn huffman_table(&self, class: TableClass, id: u8) -> Result<&HuffmanCodeTable> {
        let slots = match class {
            TableClass::Dc => &self.dc_tables,
            TableClass::Ac => &self.ac_tables,
        };
        slots
            .get(id as usize)
            .and_then(|t| t.as_ref())
            .map(|t| &t.codes)
            .ok_or(Error::MissingHuffmanTable(class, id))
    }
}
