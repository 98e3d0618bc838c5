// Copyright (c) the jpegdec authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Baseline JPEG (ITU-T T.81) parsing and Huffman decoding down to quantized
//! DCT coefficient blocks.

#![deny(unsafe_code)]
pub mod bit_reader;
pub mod decode;
pub mod entropy_coding;
pub mod error;
pub mod headers;
pub mod markers;
pub mod options;
pub mod scan;
pub mod session;
pub mod stream;
pub mod util;
pub mod zigzag;

pub const BLOCK_DIM: usize = 8;
pub const BLOCK_SIZE: usize = BLOCK_DIM * BLOCK_DIM;

pub use decode::{DecodedImage, Decoder, decode_bytes, decode_bytes_with_options};
pub use error::{Error, Result};
pub use options::{DecodeLimits, DecodeOptions};
