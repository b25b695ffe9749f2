mod cli;

use anyhow::Context;
use clap::Parser;
use cli::Cli;
use laserpreview::{init_logging, run_preview, LogFormat};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use tracing::{debug, Level};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let format = if cli.log_json {
        LogFormat::Json
    } else {
        LogFormat::Text
    };
    let level = if cli.quiet { Level::WARN } else { Level::INFO };
    init_logging(format, level)?;

    let config = cli.resolve_config()?;
    debug!("Running with {:?}", config);
    let output_path = cli.output_path()?;

    let preview = match &cli.input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            run_preview(&config, BufReader::new(file))?
        }
        None => run_preview(&config, io::stdin().lock())?,
    };

    let image = match cli.crop {
        Some(c) => preview
            .image
            .crop(c.x0, c.y0, c.x1, c.y1)
            .context("Failed to crop image")?,
        None => preview.image,
    };

    match output_path {
        Some(path) => image
            .save_png(path)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => {
            let mut out = BufWriter::new(io::stdout().lock());
            image.write_png(&mut out).context("Failed to write PNG")?;
            out.flush().context("Failed to write PNG")?;
        }
    }

    if cli.report {
        let report = serde_json::to_string_pretty(&preview.report)?;
        eprintln!("{}", report);
    }

    Ok(())
}
