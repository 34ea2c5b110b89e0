use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use grid_packer_core::config::{
    AnimSpec, AtlasSpec, DEFAULT_ATLAS_SIZE, DEFAULT_ELEMENT_SIZE, ModulePackConfig, SortOrder,
};
use grid_packer_core::model::{Channel, PackSummary};
use grid_packer_core::{assemble_sheet, pack_folder, run_module_pack};
use serde::Deserialize;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(
    name = "grid-packer",
    about = "Pack texture tiles into grid atlases and animation sheets",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action=ArgAction::Count, global=true, help_heading = "Logging")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(
        short,
        long,
        default_value_t = false,
        global = true,
        help_heading = "Logging"
    )]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Classify `*_texture/Material_material` folders and pack the four channel atlases
    Module(ModuleArgs),
    /// Pack every file of a flat folder into one grid atlas
    Grid(GridArgs),
    /// Assemble UV animation frames into an n x n sheet
    Anim(AnimArgs),
}

#[derive(Parser, Debug, Clone)]
struct ModuleArgs {
    /// Root folder holding `<name>_texture` subfolders
    #[arg(help_heading = "Input/Output")]
    root: PathBuf,
    /// Output directory (defaults to the root folder)
    #[arg(short, long, help_heading = "Input/Output")]
    out_dir: Option<PathBuf>,
    /// YAML config file path (present keys override CLI options)
    #[arg(long, help_heading = "Input/Output")]
    config: Option<PathBuf>,

    /// Tile size in pixels
    #[arg(long, default_value_t = DEFAULT_ELEMENT_SIZE, help_heading = "Layout")]
    element_size: u32,
    /// Atlas side in pixels (multiple of element size)
    #[arg(long, default_value_t = DEFAULT_ATLAS_SIZE, help_heading = "Layout")]
    atlas_size: u32,
    /// Slot order: none (filesystem order) | name_asc
    #[arg(long, default_value = "none", help_heading = "Layout")]
    sort_order: String,

    /// Write a per-channel status report (JSON) to this file
    #[arg(long, help_heading = "Export")]
    report: Option<PathBuf>,
    /// Print the merged configuration (after CLI/YAML) and exit
    #[arg(long, default_value_t = false, help_heading = "Export")]
    print_config: bool,
    /// Output format for --print-config: json|yaml
    #[arg(long, default_value = "json", value_parser = ["json", "yaml"], help_heading = "Export")]
    print_config_format: String,
}

#[derive(Parser, Debug, Clone)]
struct GridArgs {
    /// Folder of equal-sized square tiles
    #[arg(help_heading = "Input/Output")]
    input: PathBuf,
    /// Output atlas path
    #[arg(short, long, default_value = "atlas.png", help_heading = "Input/Output")]
    output: PathBuf,
    /// Tile size in pixels
    #[arg(long, default_value_t = DEFAULT_ELEMENT_SIZE, help_heading = "Layout")]
    element_size: u32,
    /// Atlas side in pixels (multiple of element size)
    #[arg(long, default_value_t = DEFAULT_ATLAS_SIZE, help_heading = "Layout")]
    atlas_size: u32,
    /// Slot order: none (filesystem order) | name_asc
    #[arg(long, default_value = "none", help_heading = "Layout")]
    sort_order: String,
    /// Also write `<output>.json` describing the slots
    #[arg(long, default_value_t = false, help_heading = "Export")]
    manifest: bool,
}

#[derive(Parser, Debug, Clone)]
struct AnimArgs {
    /// Folder holding the animation frames
    #[arg(help_heading = "Input/Output")]
    source: PathBuf,
    /// Sheet file name, written inside the source folder
    #[arg(short, long, default_value = "uvanim.png", help_heading = "Input/Output")]
    name: String,
    /// Number of frames (multiple of 4, perfect square)
    #[arg(short, long, help_heading = "Layout")]
    frames: u32,
    /// Frame order: none (filesystem order) | name_asc
    #[arg(long, default_value = "none", help_heading = "Layout")]
    sort_order: String,
    /// Also write `<name>.json` describing the frame slots
    #[arg(long, default_value_t = false, help_heading = "Export")]
    manifest: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);
    let res = match &cli.command {
        Commands::Module(args) => run_module(args),
        Commands::Grid(args) => run_grid(args),
        Commands::Anim(args) => run_anim(args),
    };
    match res {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run_module(args: &ModuleArgs) -> anyhow::Result<ExitCode> {
    let mut cfg = ModulePackConfig {
        element_size: args.element_size,
        atlas_size: args.atlas_size,
        sort_order: parse_sort_order(&args.sort_order)?,
        out_dir: args.out_dir.clone(),
        ..Default::default()
    };
    if let Some(path) = &args.config {
        let file = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let y: YamlConfig = serde_yaml::from_str(&file)
            .with_context(|| format!("parse config {}", path.display()))?;
        cfg = y.into_module_config(cfg)?;
    }

    if args.print_config {
        match args.print_config_format.as_str() {
            "yaml" => println!("{}", serde_yaml::to_string(&cfg)?),
            _ => println!("{}", serde_json::to_string_pretty(&cfg)?),
        }
        return Ok(ExitCode::SUCCESS);
    }

    if let Some(dir) = &cfg.out_dir {
        fs::create_dir_all(dir).with_context(|| format!("create out_dir {}", dir.display()))?;
    }

    let report = run_module_pack(&args.root, &cfg)
        .with_context(|| format!("classify {}", args.root.display()))?;

    for o in &report.outcomes {
        match &o.result {
            Ok(summary) => info!(
                channel = %o.channel,
                out = %o.output_path.display(),
                tiles = summary.layout.slots.len(),
                ms = format!("{:.1}", o.elapsed().as_secs_f64() * 1000.0),
                "ok"
            ),
            Err(e) => error!(channel = %o.channel, out = %o.output_path.display(), "{e}"),
        }
    }
    info!("{}", report.summary());

    if let Some(path) = &args.report {
        let value = grid_packer_core::to_json_report(&report);
        fs::write(path, serde_json::to_string_pretty(&value)?)
            .with_context(|| format!("write {}", path.display()))?;
        info!(?path, "report written");
    }

    Ok(if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn run_grid(args: &GridArgs) -> anyhow::Result<ExitCode> {
    let spec = AtlasSpec::new(args.element_size, args.atlas_size, &args.output);
    let sort = parse_sort_order(&args.sort_order)?;
    let summary = pack_folder(&args.input, &spec, sort)
        .with_context(|| format!("pack {}", args.input.display()))?;
    info!(
        out = %summary.output_path.display(),
        tiles = summary.layout.slots.len(),
        capacity = summary.layout.capacity(),
        "atlas written"
    );
    if args.manifest {
        write_manifest(&summary)?;
    }
    Ok(ExitCode::SUCCESS)
}

fn run_anim(args: &AnimArgs) -> anyhow::Result<ExitCode> {
    let spec = AnimSpec::new(args.frames, &args.source, args.name.clone())
        .with_sort_order(parse_sort_order(&args.sort_order)?);
    let summary = assemble_sheet(&spec)
        .with_context(|| format!("assemble {}", args.source.display()))?;
    info!(
        out = %summary.output_path.display(),
        w = summary.layout.width,
        h = summary.layout.height,
        "sheet written"
    );
    if args.manifest {
        write_manifest(&summary)?;
    }
    Ok(ExitCode::SUCCESS)
}

fn write_manifest(summary: &PackSummary) -> anyhow::Result<()> {
    let image = summary
        .output_path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("");
    let value = grid_packer_core::to_json_layout(&summary.layout, image);
    let json_path = manifest_path(&summary.output_path);
    fs::write(&json_path, serde_json::to_string_pretty(&value)?)
        .with_context(|| format!("write {}", json_path.display()))?;
    info!(?json_path, "manifest written");
    Ok(())
}

fn manifest_path(image: &Path) -> PathBuf {
    image.with_extension("json")
}

fn init_tracing_with_level(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error".to_string()
    } else {
        match verbose {
            0 => "info".into(),
            1 => "debug".into(),
            _ => "trace".into(),
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .try_init();
}

#[derive(Debug, Deserialize, Default)]
struct YamlConfig {
    element_size: Option<u32>,
    atlas_size: Option<u32>,
    sort_order: Option<String>,
    out_dir: Option<PathBuf>,
    /// Channel name -> output file name
    outputs: Option<std::collections::BTreeMap<String, String>>,
}

impl YamlConfig {
    fn into_module_config(self, mut cfg: ModulePackConfig) -> anyhow::Result<ModulePackConfig> {
        if let Some(v) = self.element_size {
            cfg.element_size = v;
        }
        if let Some(v) = self.atlas_size {
            cfg.atlas_size = v;
        }
        if let Some(v) = self.sort_order {
            cfg.sort_order = parse_sort_order(&v)?;
        }
        if let Some(v) = self.out_dir {
            cfg.out_dir = Some(v);
        }
        for (name, file) in self.outputs.unwrap_or_default() {
            let channel: Channel = name
                .parse()
                .map_err(|_| anyhow::anyhow!("unknown channel in outputs: {}", name))?;
            cfg.set_output_name(channel, file);
        }
        Ok(cfg)
    }
}

fn parse_sort_order(s: &str) -> anyhow::Result<SortOrder> {
    s.parse()
        .map_err(|_| anyhow::anyhow!("unknown sort order: {}", s))
}
