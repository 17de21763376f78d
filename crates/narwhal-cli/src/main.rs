use narwhal::render::{HeadlessError, LayoutSnapshot, Options, layout_markdown, render_svg};
use narwhal::{extract_headings, size};
use serde::Serialize;
use std::io::Read;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Render(HeadlessError),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Render(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<HeadlessError> for CliError {
    fn from(value: HeadlessError) -> Self {
        Self::Render(value)
    }
}

impl From<narwhal::render::Error> for CliError {
    fn from(value: narwhal::render::Error) -> Self {
        Self::Render(value.into())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Render,
    Outline,
    Layout,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    preset: Option<String>,
    collapse_depth: Option<usize>,
    options_json: Option<String>,
    viewport_width: f64,
    viewport_height: f64,
    out: Option<String>,
}

fn usage() -> &'static str {
    "narwhal-cli\n\
\n\
USAGE:\n\
  narwhal-cli outline [--pretty] [<path>|-]\n\
  narwhal-cli layout [--pretty] [--preset default|colorful] [--collapse-depth <n>]\n\
      [--viewport-width <w>] [--viewport-height <h>] [--options <json>] [<path>|-]\n\
  narwhal-cli [render] [--preset default|colorful] [--collapse-depth <n>]\n\
      [--viewport-width <w>] [--viewport-height <h>] [--options <json>] [--out <path>]\n\
      [<path>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', Markdown is read from stdin.\n\
  - outline prints the heading records as JSON.\n\
  - layout prints visible nodes, links and the fitted viewport as JSON.\n\
  - render settles all transitions and prints SVG to stdout, or to the file given by --out.\n\
  - --options takes a JSON object with camelCase keys.\n\
  - --preset and --collapse-depth override --options.\n\
  - Set RUST_LOG (e.g. RUST_LOG=narwhal_render=debug) for diagnostics on stderr.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args {
        command: Command::Render,
        viewport_width: 800.0,
        viewport_height: 600.0,
        ..Default::default()
    };

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "outline" => args.command = Command::Outline,
            "layout" => args.command = Command::Layout,
            "render" => args.command = Command::Render,
            "--pretty" => args.pretty = true,
            "--preset" => {
                let Some(name) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.preset = Some(name.clone());
            }
            "--collapse-depth" => {
                let Some(depth) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.collapse_depth =
                    Some(depth.parse::<usize>().map_err(|_| CliError::Usage(usage()))?);
            }
            "--options" => {
                let Some(json) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.options_json = Some(json.clone());
            }
            "--viewport-width" => {
                let Some(w) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.viewport_width = parse_extent(w)?;
            }
            "--viewport-height" => {
                let Some(h) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.viewport_height = parse_extent(h)?;
            }
            "--out" => {
                let Some(out) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(out.clone());
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            "-" => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some("-".to_string());
            }
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn parse_extent(text: &str) -> Result<f64, CliError> {
    let v = text.parse::<f64>().map_err(|_| CliError::Usage(usage()))?;
    if !(v.is_finite() && v > 0.0) {
        return Err(CliError::Usage(usage()));
    }
    Ok(v)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    println!();
    Ok(())
}

fn write_text(text: &str, out: Option<&str>) -> Result<(), CliError> {
    match out {
        None => {
            print!("{text}");
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, text)?;
            Ok(())
        }
    }
}

fn build_options(args: &Args) -> Result<Options, CliError> {
    let mut options = match args.options_json.as_deref() {
        Some(json) => Options::from_json(json)?,
        None => Options::default(),
    };
    if let Some(preset) = &args.preset {
        options.preset = Some(preset.clone());
    }
    if let Some(depth) = args.collapse_depth {
        options.collapse_depth = Some(depth);
    }
    Ok(options)
}

fn run(args: Args) -> Result<(), CliError> {
    let text = read_input(args.input.as_deref())?;
    tracing::debug!(bytes = text.len(), command = ?args.command, "read input");

    match args.command {
        Command::Outline => write_json(&extract_headings(&text), args.pretty),
        Command::Layout => {
            let container = size(args.viewport_width, args.viewport_height);
            let map = layout_markdown(&text, build_options(&args)?, container)?;
            write_json(&LayoutSnapshot::capture(&map), args.pretty)
        }
        Command::Render => {
            let container = size(args.viewport_width, args.viewport_height);
            let mut map = layout_markdown(&text, build_options(&args)?, container)?;
            map.scene_mut().settle();
            write_text(&render_svg(map.scene()), args.out.as_deref())
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
