// Copyright (c) the jpegdec authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::collections::TryReserveError;

use thiserror::Error;

use crate::entropy_coding::huffman::{MAX_CODE_LENGTH, TableClass};

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Out of memory: {0}")]
    OutOfMemory(#[from] TryReserveError),
    #[error("No more entropy-coded data before the next marker")]
    NoMoreData,
    // Unsupported streams.
    #[error("Stream does not start with SOI, found marker {0:04x}")]
    NotAJpeg(u16),
    #[error("Unsupported marker {0:04x}")]
    UnsupportedMarker(u16),
    #[error("Unsupported sample precision: {0}-bit")]
    UnsupportedPrecision(u8),
    #[error("Invalid number of components: {0}")]
    InvalidComponentCount(u8),
    #[error("Invalid image dimensions: {0}x{1}")]
    InvalidDimensions(u16, u16),
    #[error("Decode limit exceeded: {0}")]
    LimitExceeded(&'static str),
    // Malformed streams.
    #[error("Segment {marker:04x} declares {expected} bytes but {actual} were consumed")]
    SegmentLengthMismatch {
        marker: u16,
        expected: u64,
        actual: u64,
    },
    #[error("Invalid segment length {1} for marker {0:04x}")]
    InvalidSegmentLength(u16, u16),
    #[error("Invalid quantization table: precision {0}, destination {1}")]
    InvalidQuantTable(u8, u8),
    #[error("Invalid Huffman table: class {0}, destination {1}")]
    InvalidHuffmanTableId(u8, u8),
    #[error("Huffman table declares {0} symbols, at most 255 are allowed")]
    TooManyHuffmanSymbols(usize),
    #[error("Huffman table declares {0} symbols but lists {1}")]
    HuffmanSymbolCountMismatch(usize, usize),
    #[error("Huffman code of length {0} does not fit: table is over-subscribed")]
    HuffmanCodeOverflow(usize),
    #[error("Huffman symbol {0:#04x} is listed more than once")]
    DuplicateHuffmanSymbol(u8),
    #[error("No Huffman code matched within {} bits", MAX_CODE_LENGTH)]
    InvalidHuffmanCode,
    #[error("{0:?} Huffman table {1} used by a scan was never defined")]
    MissingHuffmanTable(TableClass, u8),
    #[error("Invalid coefficient category {0}")]
    InvalidCategory(u8),
    #[error("Run of {run} zeros at coefficient {index} overflows the block")]
    CoefficientOverflow { index: usize, run: usize },
    #[error("Invalid sampling factors {0}x{1}")]
    InvalidSamplingFactors(u8, u8),
    #[error("Component {0} is defined more than once")]
    DuplicateComponent(u8),
    #[error("Component {0} is not defined by the frame header")]
    UnknownComponent(u8),
    #[error("Scan references a component more than once: {0}")]
    DuplicateScanComponent(u8),
    #[error("Quantization table destination {0} is out of range")]
    InvalidQuantSelector(u8),
    #[error("Multiple frame headers")]
    MultipleFrames,
    #[error("Scan header before frame header")]
    MissingFrame,
    #[error("Unexpected marker {0:04x}")]
    UnexpectedMarker(u16),
    #[error("Expected a restart marker, found {0:04x}")]
    MissingRestartMarker(u16),
}

impl Error {
    /// The stream uses a feature or a parameter this decoder does not handle.
    pub fn is_unsupported(&self) -> bool {
        matches!(
            self,
            Error::NotAJpeg(_)
                | Error::UnsupportedMarker(_)
                | Error::UnsupportedPrecision(_)
                | Error::InvalidComponentCount(_)
                | Error::InvalidDimensions(..)
                | Error::LimitExceeded(_)
        )
    }

    /// The stream is internally inconsistent.
    pub fn is_malformed(&self) -> bool {
        !self.is_unsupported()
            && !matches!(
                self,
                Error::Io(_) | Error::OutOfMemory(_) | Error::NoMoreData
            )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
