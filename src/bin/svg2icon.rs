use std::ffi::{OsStr, OsString};
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context as _};
use clap::Parser;
use svg2icon::{build_icns, build_ico, Format, Rasterizer};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const BEHAVIOR: &str = "\
Behavior:
  - If <OUTPUT> is an existing directory, <input>.ico and <input>.icns will be created inside it.
  - If <OUTPUT> ends with \".ico\", only the ICO file will be generated.
  - If <OUTPUT> ends with \".icns\", only the ICNS file will be generated.
  - If <OUTPUT> ends with \".icon\", both files will be created using <OUTPUT> as the base name.";

#[derive(Parser, Debug)]
#[command(name = "svg2icon", version, about, after_help = BEHAVIOR)]
struct Cli {
    /// Input SVG file.
    input: PathBuf,

    /// Output directory, or output file ending in .ico, .icns or .icon.
    output: PathBuf,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    let targets = match validate_svg(&cli.input)
        .and_then(|()| plan_outputs(&cli.input, &cli.output)) {
        Ok(targets) => targets,
        Err(err) => {
            eprintln!("[svg2icon] {:#}", err);
            return ExitCode::FAILURE;
        }
    };

    // One rasterizer for the whole process; every build renders through it.
    let rasterizer: Rasterizer = Rasterizer::new();
    let mut failed = false;
    for (format, destination) in &targets {
        let result = match format {
            Format::Ico => build_ico(&rasterizer, &cli.input, destination),
            Format::Icns => build_icns(&rasterizer, &cli.input, destination),
        };
        if let Err(err) = result {
            eprintln!("[svg2icon] {} build failed: {}", format, err);
            failed = true;
        }
    }
    if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS }
}

/// Checks that `path` names a readable file with an `.svg` extension.
fn validate_svg(path: &Path) -> anyhow::Result<()> {
    let is_svg = path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));
    if !is_svg {
        bail!("Input file must be an .svg");
    }
    let metadata = path.metadata()
        .with_context(|| format!("Invalid input filepath '{}'", path.display()))?;
    if metadata.is_dir() {
        bail!("Input filepath can't be a directory.");
    }
    let mut file = File::open(path)
        .with_context(|| format!("Can't open input file '{}'", path.display()))?;
    let mut byte = [0u8; 1];
    match file.read_exact(&mut byte) {
        Err(err) if err.kind() != io::ErrorKind::UnexpectedEof => {
            Err(err).with_context(|| {
                format!("Can't read from input file '{}'", path.display())
            })
        }
        _ => Ok(()),
    }
}

/// Decides which containers to build and where, based on the output path.
fn plan_outputs(input: &Path, output: &Path)
                -> anyhow::Result<Vec<(Format, PathBuf)>> {
    if output.is_dir() {
        let stem = input.file_stem().context("Input file has no name")?;
        return Ok(vec![(Format::Ico, output.join(named(stem, Format::Ico))),
                       (Format::Icns, output.join(named(stem, Format::Icns)))]);
    }

    let directory = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let has_stem = output.file_stem().is_some_and(|stem| !stem.is_empty());
    let extension = output.extension().and_then(|ext| ext.to_str());
    let extension = match extension {
        Some(ext) if directory.is_dir() && has_stem && !ext.is_empty() => ext,
        _ => bail!("Invalid output filepath."),
    };

    match extension {
        "ico" => Ok(vec![(Format::Ico, output.to_path_buf())]),
        "icns" => Ok(vec![(Format::Icns, output.to_path_buf())]),
        "icon" => {
            Ok(vec![(Format::Ico, output.with_extension(Format::Ico.extension())),
                    (Format::Icns, output.with_extension(Format::Icns.extension()))])
        }
        other => bail!("Unsupported output extension '.{}'", other),
    }
}

/// Appends the container extension to `stem`, keeping any dots already in it.
fn named(stem: &OsStr, format: Format) -> OsString {
    let mut name = stem.to_os_string();
    name.push(".");
    name.push(format.extension());
    name
}
