// Copyright (c) the jpegdec authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

pub mod frame_header;
pub mod huffman_tables;
pub mod quantization;
pub mod scan_header;

use std::io::{Read, Seek};

use crate::error::{Error, Result};
use crate::options::DecodeLimits;
use crate::stream::ByteStream;
#[allow(unused_imports)]
use crate::util::tracing_wrappers::*;

pub use frame_header::{Component, FrameHeader};
pub use huffman_tables::read_huffman_tables;
pub use quantization::{QuantPrecision, QuantizationTable};
pub use scan_header::{ScanComponent, ScanHeader};

/// Parses a DRI payload and returns the restart interval in MCUs.
pub fn read_restart_interval<R: Read + Seek>(stream: &mut ByteStream<R>, marker: u16) -> Result<u16> {
    let segment = stream.begin_segment(marker)?;
    if segment.length != 4 {
        return Err(Error::InvalidSegmentLength(marker, segment.length));
    }
    let interval = stream.read_word()?;
    stream.finish_segment(&segment)?;
    debug!(interval, "restart interval");
    Ok(interval)
}

/// Reads a COM payload as text. `captured` is the number of comment bytes
/// already stored, checked together with this one against the limits.
pub fn read_comment<R: Read + Seek>(
    stream: &mut ByteStream<R>,
    marker: u16,
    captured: usize,
    limits: &DecodeLimits,
) -> Result<String> {
    let segment = stream.begin_segment(marker)?;
    let size = segment.length as usize - 2;
    limits.check_comment_bytes(captured + size)?;
    let mut payload = Vec::new();
    payload.try_reserve_exact(size)?;
    payload.resize(size, 0);
    stream.read_exact(&mut payload)?;
    stream.finish_segment(&segment)?;
    let text = String::from_utf8_lossy(&payload).into_owned();
    info!(comment = %text);
    Ok(text)
}
