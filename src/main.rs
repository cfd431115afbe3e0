//! Command-line entry point for the cloud-interpreter point-cloud viewer.

use std::path::{Path, PathBuf};

use cloud_interpreter::{io, options::Options, PointFormat, Viewer};

struct Args {
    format: PointFormat,
    files: Vec<PathBuf>,
    options: Option<PathBuf>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, String> {
    let format = args
        .next()
        .ok_or("missing structure")?
        .parse::<PointFormat>()
        .map_err(|e| e.to_string())?;

    let mut files = Vec::new();
    let mut options = None;
    while let Some(arg) = args.next() {
        if arg == "--options" {
            options = Some(PathBuf::from(
                args.next().ok_or("--options needs a path")?,
            ));
        } else {
            files.push(PathBuf::from(arg));
        }
    }
    if files.is_empty() {
        return Err("no point files given".into());
    }
    Ok(Args {
        format,
        files,
        options,
    })
}

fn load_options(path: Option<&Path>) -> Options {
    let Some(path) = path else {
        return Options::default();
    };
    match Options::load(path) {
        Ok(options) => options,
        Err(e) => {
            log::warn!("{e}; using default options");
            Options::default()
        }
    }
}

fn main() {
    env_logger::init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            log::error!("{e}");
            log::error!(
                "Usage: cloud-interpreter <xyz|xyzrgb|xyzirgb|xyzc|xyzrgbc|xyzirgbc> <file>... [--options <toml>]"
            );
            std::process::exit(1);
        }
    };

    let options = load_options(args.options.as_deref());
    let mut builder = Viewer::builder().with_options(options);
    for file in &args.files {
        match io::load_points(file, args.format) {
            Ok(cloud) => builder = builder.with_cloud(cloud),
            Err(e) => log::error!("{}: {e}", file.display()),
        }
    }

    let viewer = builder
        .on_pick(|event| {
            if let Some(code) = event.callback_code() {
                log::info!("pick callback: {code}");
            }
        })
        .build();

    if let Err(e) = viewer.run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}
