use clap::{Parser, Subcommand, ValueEnum};
use matboard::batch::{self, BatchError, BatchOptions};
use matboard::fonts::FontConfig;
use matboard::output::{self, ProcessEvent};
use matboard::scan;
use matboard::settings::{BorderMode, ClassicSettings, EditorialSettings, RenderSettings};
use std::path::PathBuf;
use std::process::ExitCode;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup — trivial, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "matboard")]
#[command(about = "Batch photo framing: white borders, captions, metadata-preserving re-encode")]
#[command(long_about = "\
Batch photo framing: white borders, captions, metadata-preserving re-encode

Every supported image (.jpg .jpeg .tif .tiff .png) directly inside the input
folder is composited onto a white canvas with a border and a caption band,
then re-encoded in its source format with EXIF and ICC data carried over.

Captions come from the image itself — EXIF DateTimeOriginal for the date,
XMP dc:title (sidecar .xmp preferred) for the title — or from an overrides
JSON file mapping filename to replacement values:

  {
    \"dawn.jpg\": {\"title\": \"Dawn\", \"capture_date\": \"2024-01-02\"},
    \"ridge.jpg\": {\"author\": \"R. Adams\", \"location\": \"Yosemite\"}
  }

Output is newline-delimited JSON events (progress, log, done) so a GUI shell
can drive a progress bar off stdout. Exit code 0 when every file succeeded,
1 when some files failed, 2 on a fatal error before or during the batch.

Fonts: bundled JetBrainsMono/CormorantGaramond files are searched next to
the executable, in ./fonts, and in ~/.fonts, with system faces as fallback.")]
#[command(version = version_string())]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List a folder's images with their capture date and title
    Scan {
        /// Folder to scan
        #[arg(long)]
        input: PathBuf,
    },
    /// Frame every supported image in a folder
    Run(RunArgs),
}

#[derive(clap::Args)]
struct RunArgs {
    /// Folder of source images
    #[arg(long)]
    input: PathBuf,

    /// Folder for framed output (created if missing)
    #[arg(long)]
    output: PathBuf,

    /// Frame layout
    #[arg(long, value_enum, default_value_t = Layout::Stacked)]
    layout: Layout,

    /// Treat --border and --bottom as percentages of the photo width
    #[arg(long)]
    percent: bool,

    /// Border width on top and both sides (stacked/row)
    #[arg(long, default_value_t = 80)]
    border: u32,

    /// Caption band height below the photo (stacked/row)
    #[arg(long, default_value_t = 240)]
    bottom: u32,

    /// Horizontal text inset inside the caption band, always pixels
    #[arg(long, default_value_t = 40)]
    pad: u32,

    /// Date font size in pixels (stacked/row)
    #[arg(long, default_value_t = 60)]
    date_font: u32,

    /// Title font size in pixels (stacked/row)
    #[arg(long, default_value_t = 80)]
    title_font: u32,

    /// Editorial side margin, percent of photo width (clamped 2-4)
    #[arg(long, default_value_t = 3.0)]
    side_percent: f64,

    /// Editorial top margin, percent of photo height (clamped 0-2)
    #[arg(long, default_value_t = 1.0)]
    top_percent: f64,

    /// Editorial caption band, percent of photo height (clamped 12-16)
    #[arg(long, default_value_t = 14.0)]
    bottom_percent: f64,

    /// Variable-font weight for the title face (wght axis)
    #[arg(long)]
    weight: Option<f32>,

    /// JSON file mapping filename to caption overrides
    #[arg(long)]
    overrides_json: Option<PathBuf>,

    /// Only process these filenames (repeatable)
    #[arg(long)]
    only: Vec<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Layout {
    Stacked,
    Row,
    Editorial,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            println!("{}", output::format_event(&ProcessEvent::error(e.to_string())));
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    match cli.command {
        Command::Scan { input } => {
            let rows = scan::scan_folder(&input)?;
            println!("{}", output::format_event(&ProcessEvent::scan_result(rows)));
            Ok(ExitCode::SUCCESS)
        }
        Command::Run(args) => run_batch(args),
    }
}

fn run_batch(args: RunArgs) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let settings = render_settings(&args);
    let overrides = match &args.overrides_json {
        Some(path) => batch::load_overrides(path)?,
        None => Default::default(),
    };
    let include = if args.only.is_empty() {
        None
    } else {
        Some(args.only.iter().cloned().collect())
    };
    let options = BatchOptions {
        settings,
        fonts: FontConfig {
            weight: args.weight,
            ..FontConfig::default()
        },
        overrides,
        include,
    };

    let (tx, rx) = std::sync::mpsc::channel();
    let input = args.input.clone();
    let output_dir = args.output.clone();
    let worker = std::thread::spawn(move || {
        match batch::process_folder(&input, &output_dir, &options, Some(&tx)) {
            Ok(summary) => {
                let _ = tx.send(ProcessEvent::done(&summary));
            }
            Err(e) => {
                let _ = tx.send(ProcessEvent::error(e.to_string()));
            }
        }
    });

    let mut terminal = None;
    for event in rx {
        let is_terminal = event.is_terminal();
        println!("{}", output::format_event(&event));
        if is_terminal {
            terminal = Some(event);
        }
    }
    let _ = worker.join();

    match terminal {
        Some(ProcessEvent::Done { failed, .. }) => Ok(if failed == 0 {
            ExitCode::SUCCESS
        } else {
            ExitCode::from(1)
        }),
        Some(ProcessEvent::Error { .. }) => Ok(ExitCode::from(2)),
        _ => Err(BatchError::StreamEnded.into()),
    }
}

fn render_settings(args: &RunArgs) -> RenderSettings {
    let classic = ClassicSettings {
        mode: if args.percent {
            BorderMode::Percent
        } else {
            BorderMode::Pixels
        },
        border: args.border,
        bottom: args.bottom,
        pad: args.pad,
        date_size: args.date_font,
        title_size: args.title_font,
    };
    match args.layout {
        Layout::Stacked => RenderSettings::Stacked(classic),
        Layout::Row => RenderSettings::Row(classic),
        Layout::Editorial => RenderSettings::Editorial(EditorialSettings {
            side_percent: args.side_percent,
            top_percent: args.top_percent,
            bottom_percent: args.bottom_percent,
        }),
    }
}
