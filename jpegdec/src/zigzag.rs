// Copyright (c) the jpegdec authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::BLOCK_SIZE;

/// `ZIGZAG[i]` is the natural (row-major) index of the `i`-th coefficient in
/// zigzag scan order.
pub const ZIGZAG: [usize; BLOCK_SIZE] = [
    0, 1, 8, 16, 9, 2, 3, 10, //
    17, 24, 32, 25, 18, 11, 4, 5, //
    12, 19, 26, 33, 40, 48, 41, 34, //
    27, 20, 13, 6, 7, 14, 21, 28, //
    35, 42, 49, 56, 57, 50, 43, 36, //
    29, 22, 15, 23, 30, 37, 44, 51, //
    58, 59, 52, 45, 38, 31, 39, 46, //
    53, 60, 61, 54, 47, 55, 62, 63, //
];

/// Reorders 64 values given in zigzag order into natural order.
pub fn to_natural_order<T: Copy + Default>(zigzag_order: &[T; BLOCK_SIZE]) -> [T; BLOCK_SIZE] {
    let mut natural = [T::default(); BLOCK_SIZE];
    for (i, &value) in zigzag_order.iter().enumerate() {
        natural[ZIGZAG[i]] = value;
    }
    natural
}
