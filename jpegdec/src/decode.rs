// Copyright (c) the jpegdec authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::io::{Cursor, Read, Seek};

use crate::error::{Error, Result};
use crate::headers::{FrameHeader, QuantizationTable, ScanHeader, read_huffman_tables};
use crate::headers::{read_comment, read_restart_interval};
use crate::markers;
use crate::options::DecodeOptions;
use crate::scan::{CoefficientPlane, decode_scan, skip_scan};
use crate::session::Session;
use crate::stream::ByteStream;
#[allow(unused_imports)]
use crate::util::tracing_wrappers::*;

/// Session state and quantized coefficients of a decoded image.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub session: Session,
    /// One plane per frame component, in frame header order. Empty for
    /// progressive frames, whose scans are not decoded.
    pub planes: Vec<CoefficientPlane>,
}

impl DecodedImage {
    pub fn frame(&self) -> Option<&FrameHeader> {
        self.session.frame.as_ref()
    }

    pub fn plane(&self, component_id: u8) -> Option<&CoefficientPlane> {
        self.planes.iter().find(|p| p.component_id == component_id)
    }
}

#[derive(Debug)]
enum ParserState {
    BeforeSoi,
    FrameLevel,
    ScanData(ScanHeader),
    Done,
}

/// Marker-driven JPEG parser. Owns the stream for the duration of the
/// decode.
pub struct Decoder<R> {
    stream: ByteStream<R>,
    options: DecodeOptions,
    session: Session,
    planes: Vec<CoefficientPlane>,
    state: ParserState,
}

impl<R: Read + Seek> Decoder<R> {
    pub fn new(reader: R) -> Self {
        Self::with_options(reader, DecodeOptions::default())
    }

    pub fn with_options(reader: R, options: DecodeOptions) -> Self {
        Self {
            stream: ByteStream::new(reader),
            options,
            session: Session::default(),
            planes: Vec::new(),
            state: ParserState::BeforeSoi,
        }
    }

    /// Runs the parser up to EOI. Any failure aborts the whole decode.
    pub fn decode(mut self) -> Result<DecodedImage> {
        loop {
            let state = std::mem::replace(&mut self.state, ParserState::Done);
            self.state = match state {
                ParserState::BeforeSoi => self.process_soi()?,
                ParserState::FrameLevel => {
                    let marker = self.stream.read_marker()?;
                    self.process_marker(marker)?
                }
                ParserState::ScanData(scan) => self.process_scan_data(scan)?,
                ParserState::Done => break,
            };
        }
        Ok(DecodedImage {
            session: self.session,
            planes: self.planes,
        })
    }

    fn process_soi(&mut self) -> Result<ParserState> {
        let marker = self.stream.read_marker()?;
        if marker != markers::SOI {
            return Err(Error::NotAJpeg(marker));
        }
        Ok(ParserState::FrameLevel)
    }

    fn process_marker(&mut self, marker: u16) -> Result<ParserState> {
        debug!("marker {marker:04x} ({})", markers::name(marker));
        match marker {
            markers::SOF0 | markers::SOF2 => self.process_frame_header(marker)?,
            markers::DHT => {
                for spec in read_huffman_tables(&mut self.stream, marker)? {
                    self.session.install_huffman_table(spec)?;
                }
            }
            markers::DQT => {
                for table in QuantizationTable::read_segment(&mut self.stream, marker)? {
                    self.session.install_quant_table(table);
                }
            }
            markers::DRI => {
                self.session.restart_interval = read_restart_interval(&mut self.stream, marker)?;
            }
            markers::SOS => {
                let frame = self.session.frame.as_mut().ok_or(Error::MissingFrame)?;
                let scan = ScanHeader::read(&mut self.stream, marker, frame)?;
                self.session.scans.push(scan.clone());
                return Ok(ParserState::ScanData(scan));
            }
            markers::COM => self.process_comment(marker)?,
            markers::EOI => return Ok(ParserState::Done),
            markers::SOI => return Err(Error::UnexpectedMarker(marker)),
            m if markers::is_restart(m) => trace!("stray restart marker {m:04x}"),
            m if markers::is_known_app(m) => {
                let segment = self.stream.begin_segment(m)?;
                self.stream.skip_segment(&segment)?;
            }
            m => return Err(Error::UnsupportedMarker(m)),
        }
        Ok(ParserState::FrameLevel)
    }

    fn process_frame_header(&mut self, marker: u16) -> Result<()> {
        if self.session.frame.is_some() {
            return Err(Error::MultipleFrames);
        }
        let frame = FrameHeader::read(&mut self.stream, marker)?;
        self.options.limits.check_pixels(frame.num_pixels())?;
        if frame.progressive {
            warn!("progressive frame: scan data will be skipped");
        } else {
            self.planes = CoefficientPlane::for_frame(&frame, &self.options)?;
        }
        self.session.frame = Some(frame);
        Ok(())
    }

    fn process_comment(&mut self, marker: u16) -> Result<()> {
        if !self.options.capture_comments {
            let segment = self.stream.begin_segment(marker)?;
            return self.stream.skip_segment(&segment);
        }
        let captured = self.session.comments.iter().map(String::len).sum();
        let text = read_comment(&mut self.stream, marker, captured, &self.options.limits)?;
        self.session.comments.try_reserve(1)?;
        self.session.comments.push(text);
        Ok(())
    }

    fn process_scan_data(&mut self, scan: ScanHeader) -> Result<ParserState> {
        if self.session.frame()?.progressive {
            skip_scan(&mut self.stream)?;
        } else {
            decode_scan(
                &mut self.stream,
                &self.session,
                &scan,
                &self.options,
                &mut self.planes,
            )?;
        }
        Ok(ParserState::FrameLevel)
    }
}

pub fn decode_bytes(data: &[u8]) -> Result<DecodedImage> {
    Decoder::new(Cursor::new(data)).decode()
}

pub fn decode_bytes_with_options(data: &[u8], options: DecodeOptions) -> Result<DecodedImage> {
    Decoder::with_options(Cursor::new(data), options).decode()
}
