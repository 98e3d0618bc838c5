// Copyright (c) the jpegdec authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Logging macros that forward to `tracing` when the `tracing` feature is
//! enabled and compile to nothing otherwise.

#[cfg(feature = "tracing")]
#[allow(unused_imports)]
pub use tracing::{debug, error, info, instrument, trace, warn};

// The no-op macros carry distinct names so that re-exporting them does not
// collide with the built-in `warn` attribute. Each expands to `()` so a call
// can stand in expression position.
#[cfg(not(feature = "tracing"))]
mod noop {
    macro_rules! noop_debug {
        ($($arg:tt)*) => {
            ()
        };
    }
    macro_rules! noop_error {
        ($($arg:tt)*) => {
            ()
        };
    }
    macro_rules! noop_info {
        ($($arg:tt)*) => {
            ()
        };
    }
    macro_rules! noop_trace {
        ($($arg:tt)*) => {
            ()
        };
    }
    macro_rules! noop_warn {
        ($($arg:tt)*) => {
            ()
        };
    }

    #[allow(unused_imports)]
    pub(crate) use {
        noop_debug as debug, noop_error as error, noop_info as info, noop_trace as trace,
        noop_warn as warn,
    };
}

#[cfg(not(feature = "tracing"))]
#[allow(unused_imports)]
pub(crate) use noop::*;
