use anyhow::{Context, Result};
use clap::Parser;
use media_layout::scan::{FileNameReader, MetadataReader, Scanner, TagReader};
use media_layout::{Layout, LayoutConfig, MemoryStore};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "media-layout")]
#[command(about = "Build the virtual folder layout of a media directory", long_about = None)]
struct Args {
    /// Directory to import
    dir: String,

    /// Layout configuration (TOML); the built-in layout is used without it
    #[arg(short, long)]
    config: Option<String>,

    /// Read audio tags instead of using file names only
    #[arg(short, long)]
    tags: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn load_config(path: Option<&str>) -> Result<LayoutConfig> {
    match path {
        Some(path) => {
            let path = PathBuf::from(shellexpand::tilde(path).as_ref());
            LayoutConfig::load(&path)
                .with_context(|| format!("Failed to load layout configuration: {}", path.display()))
        }
        None => LayoutConfig::builtin().context("Built-in layout configuration is invalid"),
    }
}

fn run<R: MetadataReader>(root: &Path, reader: R, config: &LayoutConfig) -> Result<MemoryStore> {
    let scanner = Scanner::new(root, reader);
    let files = scanner
        .scan()
        .with_context(|| format!("Failed to scan {}", root.display()))?;
    log::info!("Found {} media files", files.len());

    let mut store = MemoryStore::new();
    let summary = scanner.import(files, &Layout::new(config), &mut store)?;
    log::info!(
        "Imported {} files: {} placements, {} metafiles, {} containers",
        summary.files,
        summary.placements,
        summary.metafiles,
        store.container_count()
    );
    Ok(store)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = load_config(args.config.as_deref())?;
    let root = PathBuf::from(shellexpand::tilde(&args.dir).as_ref());

    let store = if args.tags {
        run(&root, TagReader::new(), &config)?
    } else {
        run(&root, FileNameReader::new(), &config)?
    };

    print!("{}", store.render_tree());
    Ok(())
}
