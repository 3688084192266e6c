use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "posterkit", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a poster spec to a PNG.
    Render(RenderArgs),
    /// Parse and validate a poster spec without rendering it.
    Validate(ValidateArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input poster spec JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Extra directory scanned for fallback fonts. May be repeated.
    #[arg(long = "font-dir")]
    font_dirs: Vec<PathBuf>,

    /// Skip installed system fonts; only `--font-dir` and custom fonts are used.
    #[arg(long)]
    no_system_fonts: bool,
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Input poster spec JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Validate(args) => cmd_validate(args),
    }
}

fn read_spec(path: &Path) -> anyhow::Result<posterkit::PosterSpec> {
    let spec = posterkit::PosterSpec::from_path(path)
        .with_context(|| format!("read poster spec '{}'", path.display()))?;
    Ok(spec)
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<()> {
    let spec = read_spec(&args.in_path)?;
    spec.validate()?;
    println!("ok");
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let spec = read_spec(&args.in_path)?;

    let assets_root = args.in_path.parent().unwrap_or_else(|| Path::new("."));
    let mut config = posterkit::EngineConfig::from_env().with_asset_root(assets_root);
    config.font_dirs.extend(args.font_dirs);
    if args.no_system_fonts {
        config.system_fonts = false;
    }

    let engine = posterkit::Engine::new(config);
    match engine.render(&spec)? {
        posterkit::RenderOutcome::Complete(_) => {}
        posterkit::RenderOutcome::Superseded { generation } => {
            anyhow::bail!("render pass {generation} was superseded");
        }
    }

    let mut exporter = posterkit::PngFileExporter::new(&args.out);
    engine.export(&mut exporter)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}
