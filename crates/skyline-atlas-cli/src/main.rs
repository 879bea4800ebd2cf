use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{ArgAction, Args, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use skyline_atlas_core::{AtlasConfig, AtlasManager, AtlasSet};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod inputs;
mod preview;

use inputs::InputFilter;

#[derive(Parser, Debug)]
#[command(
    name = "skyline-atlas",
    about = "Pack rectangles into power-of-two texture atlases",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[command(flatten)]
    ux: UxArgs,
}

/// Terminal feedback shared by every subcommand.
#[derive(Args, Debug)]
struct UxArgs {
    /// Show progress bars while reading inputs (disabled by --quiet)
    #[arg(long, default_value_t = true, action = ArgAction::Set, global = true, help_heading = "Logging/UX")]
    progress: bool,
    /// Log packing decisions (-v atlas lifecycle, -vv every placement)
    #[arg(short, long, action = ArgAction::Count, global = true, help_heading = "Logging/UX")]
    verbose: u8,
    /// Only log errors
    #[arg(short, long, global = true, help_heading = "Logging/UX")]
    quiet: bool,
}

impl UxArgs {
    fn level(&self) -> &'static str {
        match (self.quiet, self.verbose) {
            (true, _) => "error",
            (false, 0) => "info",
            (false, 1) => "debug",
            (false, _) => "trace",
        }
    }

    fn show_progress(&self) -> bool {
        self.progress && !self.quiet
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Pack the images found in a file or directory (only their sizes are read)
    Pack(PackArgs),
    /// Pack a random rectangle set and print every placement
    Demo(DemoArgs),
}

/// Options shared by every command that runs the packer.
#[derive(Args, Debug, Clone)]
struct LayoutArgs {
    /// Output directory
    #[arg(short, long, default_value = "out", help_heading = "Input/Output")]
    out_dir: PathBuf,
    /// Atlas base name (files will be name.json / name_<n>.png)
    #[arg(short, long, default_value = "atlas", help_heading = "Input/Output")]
    name: String,
    /// YAML or JSON config file path (overrides layout options)
    #[arg(long, help_heading = "Input/Output")]
    config: Option<PathBuf>,

    /// Smallest atlas side; atlases double from here until the largest image fits
    #[arg(long, default_value_t = 512, help_heading = "Layout")]
    min_dimension: u32,
    /// Allow rotation (90deg)
    #[arg(long, default_value_t = true, action=ArgAction::Set, help_heading = "Layout")]
    allow_rotation: bool,

    /// Render one outline preview PNG per atlas
    #[arg(long, default_value_t = false, help_heading = "Export")]
    preview: bool,
    /// Print the merged configuration (after CLI/config file) and exit
    #[arg(long, default_value_t = false, help_heading = "Export")]
    print_config: bool,
    /// Output format for --print-config: json|yaml
    #[arg(long, default_value = "json", value_parser = ["json", "yaml"], help_heading = "Export")]
    print_config_format: String,
    /// Dry run: pack and report but do not write files
    #[arg(long, default_value_t = false, help_heading = "Export")]
    dry_run: bool,
}

#[derive(Parser, Debug, Clone)]
struct PackArgs {
    /// Input file or directory
    #[arg(help_heading = "Input/Output")]
    input: PathBuf,
    /// Include patterns (glob). If set, only files matching any pattern are considered
    #[arg(long, help_heading = "Input/Output")]
    include: Vec<String>,
    /// Exclude patterns (glob). Files matching any pattern will be ignored
    #[arg(long, help_heading = "Input/Output")]
    exclude: Vec<String>,
    #[command(flatten)]
    layout: LayoutArgs,
}

#[derive(Parser, Debug, Clone)]
struct DemoArgs {
    /// Rectangles generated per size base (bases 10, 20, 40, 80, 160)
    #[arg(long, default_value_t = 100)]
    count: usize,
    /// RNG seed; random when omitted
    #[arg(long)]
    seed: Option<u64>,
    /// Also write the JSON manifest
    #[arg(long, default_value_t = false)]
    json: bool,
    #[command(flatten)]
    layout: LayoutArgs,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.ux.level());
    match &cli.command {
        Commands::Pack(args) => run_pack(args, cli.ux.show_progress()),
        Commands::Demo(args) => run_demo(args),
    }
}

fn run_pack(cli: &PackArgs, show_progress: bool) -> anyhow::Result<()> {
    let cfg = load_config(&cli.layout)?;
    if cli.layout.print_config {
        return print_config(&cfg, &cli.layout.print_config_format);
    }

    let paths = InputFilter::new(&cli.include, &cli.exclude)?.gather(&cli.input);
    let sizes = read_sizes_with_progress(&paths, show_progress)?;
    info!(count = sizes.len(), "read input sizes");
    if sizes.is_empty() {
        anyhow::bail!("no images found under {}", cli.input.display());
    }

    let mut manager = AtlasManager::new(cfg)?;
    for (key, w, h) in sizes {
        manager
            .enqueue(key.as_str(), w, h)
            .with_context(|| format!("enqueue {}", key))?;
    }

    let start = Instant::now();
    manager.pack_all()?;
    let elapsed = start.elapsed();

    let stats = manager.stats();
    info!(
        atlases = stats.num_atlases,
        images = stats.num_images,
        occupancy = format!("{:.2}%", stats.occupancy * 100.0),
        elapsed_ms = elapsed.as_secs_f64() * 1000.0,
        "packed"
    );

    write_outputs(&manager, &cli.layout, true)
}

fn run_demo(args: &DemoArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.layout)?;
    if args.layout.print_config {
        return print_config(&cfg, &args.layout.print_config_format);
    }

    let seed = args.seed.unwrap_or_else(|| rand::thread_rng().r#gen());
    let mut rng = StdRng::seed_from_u64(seed);
    let mut manager = AtlasManager::new(cfg)?;

    let mut base = 10u32;
    while base <= 300 {
        for i in 0..args.count {
            let w = base + rng.gen_range(0..base);
            let h = base + rng.gen_range(0..base);
            manager.enqueue(format!("r{}_{}", base, i), w, h)?;
        }
        base += base;
    }
    info!(seed, images = manager.image_count(), "generated demo set");

    let start = Instant::now();
    manager.pack_all()?;
    let elapsed = start.elapsed();

    let snapshot = manager.snapshot();
    for page in &snapshot.pages {
        println!("------------------------");
        println!("Atlas: {}x{}", page.width, page.height);
        for f in &page.frames {
            println!(
                "{} {} {} {}",
                f.frame.x, f.frame.y, f.source_size.0, f.source_size.1
            );
        }
    }
    println!(
        "{} time={:.2}ms",
        manager.stats().summary(),
        elapsed.as_secs_f64() * 1000.0
    );

    write_outputs(&manager, &args.layout, args.json)
}

fn write_outputs(manager: &AtlasManager, layout: &LayoutArgs, json: bool) -> anyhow::Result<()> {
    if layout.dry_run || !(json || layout.preview) {
        return Ok(());
    }
    fs::create_dir_all(&layout.out_dir)
        .with_context(|| format!("create out_dir {}", layout.out_dir.display()))?;

    let snapshot = manager.snapshot();
    let page_names = page_file_names(&snapshot, &layout.name);

    if json {
        let json_path = layout.out_dir.join(format!("{}.json", layout.name));
        let value = manifest_json(&snapshot, &page_names, layout.preview, manager);
        fs::write(&json_path, serde_json::to_string_pretty(&value)?)
            .with_context(|| format!("write {}", json_path.display()))?;
        info!(?json_path, atlases = snapshot.pages.len(), "manifest written");
    }

    if layout.preview {
        for (page, file) in snapshot.pages.iter().zip(&page_names) {
            let png_path = layout.out_dir.join(file);
            preview::render_outlines(page)
                .save(&png_path)
                .with_context(|| format!("write {}", png_path.display()))?;
            info!(?png_path, atlas = page.id.index(), "wrote preview");
        }
    }
    Ok(())
}

fn page_file_names(snapshot: &AtlasSet, name: &str) -> Vec<String> {
    (0..snapshot.pages.len())
        .map(|i| format!("{}_{}.png", name, i))
        .collect()
}

fn manifest_json(
    snapshot: &AtlasSet,
    page_names: &[String],
    with_previews: bool,
    manager: &AtlasManager,
) -> serde_json::Value {
    let atlases: Vec<serde_json::Value> = snapshot
        .pages
        .iter()
        .zip(page_names)
        .map(|(page, file)| {
            let mut v = serde_json::json!({
                "width": page.width,
                "height": page.height,
                "tight": page.tight,
                "frames": page.frames,
            });
            if with_previews {
                v["preview"] = serde_json::Value::String(file.clone());
            }
            v
        })
        .collect();
    serde_json::json!({
        "app": "skyline-atlas",
        "version": env!("CARGO_PKG_VERSION"),
        "config": manager.config(),
        "atlases": atlases,
        "stats": manager.stats(),
    })
}

fn print_config(cfg: &AtlasConfig, format: &str) -> anyhow::Result<()> {
    match format {
        "yaml" => println!("{}", serde_yaml::to_string(cfg)?),
        _ => println!("{}", serde_json::to_string_pretty(cfg)?),
    }
    Ok(())
}

fn read_sizes_with_progress(
    paths: &[PathBuf],
    progress: bool,
) -> anyhow::Result<Vec<(String, u32, u32)>> {
    use indicatif::{ProgressBar, ProgressStyle};
    let bar = if progress {
        let b = ProgressBar::new(paths.len() as u64);
        b.set_style(ProgressStyle::with_template(
            "{spinner:.green} reading {pos}/{len} [{elapsed_precise}] {wide_msg}",
        )?);
        Some(b)
    } else {
        None
    };
    let mut list = Vec::with_capacity(paths.len());
    for p in paths {
        let msg = p.file_name().and_then(|s| s.to_str()).unwrap_or("");
        if let Some(b) = &bar {
            b.set_message(msg.to_string());
        }
        match image::image_dimensions(p) {
            Ok((w, h)) if w > 0 && h > 0 => {
                let key = p.to_string_lossy().replace('\\', "/");
                list.push((key, w, h));
            }
            Ok(_) => {
                error!(?p, "skip zero-sized image");
            }
            Err(e) => {
                error!(?p, error = %e, "skip image");
            }
        }
        if let Some(b) = &bar {
            b.inc(1);
        }
    }
    if let Some(b) = &bar {
        b.finish_and_clear();
    }
    Ok(list)
}

/// `RUST_LOG` wins when set; otherwise `level` comes from `-q`/`-v`.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Layout options read from `--config`; any field left out keeps the CLI value.
#[derive(Debug, Deserialize, Default)]
struct FileConfig {
    min_dimension: Option<u32>,
    allow_rotation: Option<bool>,
}

impl FileConfig {
    fn into_atlas_config(self, mut cfg: AtlasConfig) -> AtlasConfig {
        if let Some(v) = self.min_dimension {
            cfg.min_dimension = v;
        }
        if let Some(v) = self.allow_rotation {
            cfg.allow_rotation = v;
        }
        cfg
    }
}

fn load_config(layout: &LayoutArgs) -> anyhow::Result<AtlasConfig> {
    let cfg = AtlasConfig::builder()
        .min_dimension(layout.min_dimension)
        .allow_rotation(layout.allow_rotation)
        .build();
    let cfg = match &layout.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("read config {}", path.display()))?;
            let is_json = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("json"));
            let file: FileConfig = if is_json {
                serde_json::from_str(&text)?
            } else {
                serde_yaml::from_str(&text)?
            };
            file.into_atlas_config(cfg)
        }
        None => cfg,
    };
    cfg.validate()?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_flags_pick_the_log_level() {
        let level = |args: &[&str]| {
            let cli = Cli::try_parse_from(args).unwrap();
            (cli.ux.level(), cli.ux.show_progress())
        };
        assert_eq!(level(&["skyline-atlas", "demo"]), ("info", true));
        assert_eq!(level(&["skyline-atlas", "demo", "-vv"]), ("trace", true));
        assert_eq!(level(&["skyline-atlas", "pack", "in", "-v", "-q"]), ("error", false));
        assert_eq!(
            level(&["skyline-atlas", "pack", "in", "--progress", "false"]),
            ("info", false)
        );
    }
}
