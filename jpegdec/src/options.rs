// Copyright (c) the jpegdec authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::error::{Error, Result};

/// Resource limits for decoding untrusted streams.
///
/// All limits default to `None` (unlimited). Use [`DecodeLimits::default_safe()`]
/// for general use or [`DecodeLimits::restrictive()`] for untrusted content.
///
/// ```
/// use jpegdec::options::DecodeLimits;
///
/// let limits = DecodeLimits::restrictive();
/// assert!(limits.max_pixels.is_some());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DecodeLimits {
    /// Maximum width * height of the frame.
    pub max_pixels: Option<u64>,
    /// Maximum total size of all captured COM payloads, in bytes.
    pub max_comment_bytes: Option<usize>,
    /// Maximum number of coefficient blocks allocated across all components.
    pub max_blocks: Option<usize>,
}

impl DecodeLimits {
    pub fn default_safe() -> Self {
        Self {
            max_pixels: Some(1 << 30),
            max_comment_bytes: Some(1 << 24),
            max_blocks: Some(1 << 26),
        }
    }

    pub fn restrictive() -> Self {
        Self {
            max_pixels: Some(100_000_000),
            max_comment_bytes: Some(1 << 16),
            max_blocks: Some(1 << 22),
        }
    }

    pub(crate) fn check_pixels(&self, pixels: u64) -> Result<()> {
        check(self.max_pixels, pixels, "max_pixels")
    }

    pub(crate) fn check_comment_bytes(&self, total: usize) -> Result<()> {
        check(self.max_comment_bytes, total, "max_comment_bytes")
    }

    pub(crate) fn check_blocks(&self, total: usize) -> Result<()> {
        check(self.max_blocks, total, "max_blocks")
    }
}

fn check<T: PartialOrd>(limit: Option<T>, value: T, name: &'static str) -> Result<()> {
    match limit {
        Some(limit) if value > limit => Err(Error::LimitExceeded(name)),
        _ => Ok(()),
    }
}

#[derive(Clone, Debug)]
#[non_exhaustive]
pub struct DecodeOptions {
    pub limits: DecodeLimits,
    /// Buffer COM payloads into the session. When false they are skipped.
    pub capture_comments: bool,
    /// Fail when a restart interval boundary is not followed by an RSTm
    /// marker. When false, decoding carries on from the boundary.
    pub strict_restart_markers: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            limits: DecodeLimits::default(),
            capture_comments: true,
            strict_restart_markers: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn unlimited_by_default() {
        let limits = DecodeLimits::default();
        assert!(limits.check_pixels(u64::MAX).is_ok());
        assert!(limits.check_blocks(usize::MAX).is_ok());
    }

    #[test]
    fn limits_are_inclusive() {
        let limits = DecodeLimits {
            max_blocks: Some(10),
            ..DecodeLimits::default()
        };
        assert!(limits.check_blocks(10).is_ok());
        assert!(matches!(
            limits.check_blocks(11),
            Err(Error::LimitExceeded("max_blocks"))
        ));
    }
}
