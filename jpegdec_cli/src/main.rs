// Copyright (c) the jpegdec authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use jpegdec::{DecodeLimits, DecodeOptions, Decoder};

mod summary;

#[derive(Parser)]
#[command(about = "Decodes a baseline JPEG down to quantized DCT coefficients")]
struct Opt {
    /// Input JPEG file
    input: PathBuf,

    /// Number of coefficient blocks to print
    #[clap(long, default_value_t = 0)]
    blocks: usize,

    /// Component whose blocks are printed; defaults to the first one
    #[clap(long)]
    component: Option<u8>,

    /// Prints every table and scan header
    #[clap(short, long)]
    verbose: bool,

    /// Lifts the resource limits applied to untrusted input
    #[clap(long)]
    no_limits: bool,

    /// Tolerates missing restart markers
    #[clap(long)]
    lenient_restarts: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    #[cfg(feature = "tracing-subscriber")]
    {
        use tracing_subscriber::{EnvFilter, fmt, prelude::*};
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(EnvFilter::from_default_env())
            .init();
    }

    let opt = Opt::parse();
    let file = File::open(&opt.input)
        .wrap_err_with(|| format!("Cannot open {}", opt.input.display()))?;

    let mut options = DecodeOptions::default();
    if !opt.no_limits {
        options.limits = DecodeLimits::default_safe();
    }
    options.strict_restart_markers = !opt.lenient_restarts;

    let image = Decoder::with_options(BufReader::new(file), options)
        .decode()
        .map_err(|err| {
            let kind = if err.is_unsupported() {
                "Unsupported JPEG"
            } else if err.is_malformed() {
                "Malformed JPEG"
            } else {
                "Cannot decode JPEG"
            };
            eyre!("{kind}: {err}")
        })?;

    let mut out = std::io::stdout().lock();
    summary::describe(&mut out, &image, opt.verbose)?;

    if opt.blocks > 0 {
        let frame = image.frame().ok_or_else(|| eyre!("Image has no frame"))?;
        let id = match opt.component {
            Some(id) => {
                image
                    .session
                    .component(id)
                    .ok_or_else(|| eyre!("No component with id {id}"))?;
                id
            }
            None => frame
                .components
                .first()
                .map(|c| c.id)
                .ok_or_else(|| eyre!("Frame has no components"))?,
        };
        let plane = image
            .plane(id)
            .ok_or_else(|| eyre!("Coefficients of component {id} were not decoded"))?;
        summary::describe_blocks(&mut out, plane, opt.blocks)?;
    }
    Ok(())
}
