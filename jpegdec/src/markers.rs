// Copyright (c) the jpegdec authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Two-byte marker codes (T.81 Table B.1).

pub const SOF0: u16 = 0xFFC0;
pub const SOF2: u16 = 0xFFC2;
pub const DHT: u16 = 0xFFC4;
pub const RST0: u16 = 0xFFD0;
pub const RST7: u16 = 0xFFD7;
pub const SOI: u16 = 0xFFD8;
pub const EOI: u16 = 0xFFD9;
pub const SOS: u16 = 0xFFDA;
pub const DQT: u16 = 0xFFDB;
pub const DRI: u16 = 0xFFDD;
pub const APP0: u16 = 0xFFE0;
pub const APP1: u16 = 0xFFE1;
pub const APP2: u16 = 0xFFE2;
pub const APP13: u16 = 0xFFED;
pub const APP15: u16 = 0xFFEF;
pub const COM: u16 = 0xFFFE;

pub fn is_restart(marker: u16) -> bool {
    (RST0..=RST7).contains(&marker)
}

/// Restart sequence number (0-7) of an RSTm marker.
pub fn restart_index(marker: u16) -> Option<u8> {
    is_restart(marker).then(|| (marker - RST0) as u8)
}

pub fn is_app(marker: u16) -> bool {
    (APP0..=APP15).contains(&marker)
}

/// APPn segments that the decoder skips. Any other APPn marker is reported
/// as unsupported.
pub fn is_known_app(marker: u16) -> bool {
    matches!(marker, APP0 | APP1 | APP2 | APP13)
}

pub fn name(marker: u16) -> &'static str {
    match marker {
        SOF0 => "SOF0",
        SOF2 => "SOF2",
        DHT => "DHT",
        SOI => "SOI",
        EOI => "EOI",
        SOS => "SOS",
        DQT => "DQT",
        DRI => "DRI",
        COM => "COM",
        m if is_restart(m) => "RST",
        m if is_app(m) => "APP",
        0xFFC1 | 0xFFC3 | 0xFFC5..=0xFFC7 | 0xFFC9..=0xFFCB | 0xFFCD..=0xFFCF => "SOF",
        _ => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn restart_markers() {
        assert_eq!(restart_index(0xFFD0), Some(0));
        assert_eq!(restart_index(0xFFD7), Some(7));
        assert_eq!(restart_index(EOI), None);
        assert!(!is_restart(SOI));
    }

    #[test]
    fn app_markers() {
        assert!(is_known_app(APP0));
        assert!(is_known_app(APP13));
        assert!(is_app(0xFFEE));
        assert!(!is_known_app(0xFFEE));
        assert!(!is_app(COM));
    }
}
