//! stlcost CLI - filament cost estimates for binary STL files

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use stlcost::units::mm3_to_cm3;
use stlcost::{
    estimate, read_header, read_triangles, Bounds, Config, Material, PrintProfile, ProfileModel,
    Triangle, UsageBreakdown,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "stlcost")]
#[command(about = "Estimate filament usage and print cost of binary STL files", long_about = None)]
struct Cli {
    /// TOML configuration file with pricing and profile defaults
    #[arg(short, long, global = true, env = "STLCOST_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the enclosed volume of an STL file in cm³
    Volume {
        /// Binary STL file
        file: PathBuf,
    },
    /// Estimate filament usage and price
    Estimate {
        /// Binary STL file
        file: PathBuf,
        #[command(flatten)]
        profile: ProfileArgs,
        /// Print the breakdown as JSON
        #[arg(long)]
        json: bool,
    },
    /// Display header, triangle count, bounds and volume of an STL file
    Info {
        /// Binary STL file
        file: PathBuf,
    },
}

/// Overrides for the configured print profile.
#[derive(Args, Debug, Default)]
struct ProfileArgs {
    /// Infill density in percent
    #[arg(long)]
    infill: Option<f64>,
    /// Material preset (pla, abs, petg) or density in g/cm³
    #[arg(long)]
    material: Option<Material>,
    /// Estimation model (simple or shell-aware)
    #[arg(long)]
    model: Option<ProfileModel>,
    /// Layer height in mm
    #[arg(long)]
    layer_height: Option<f64>,
    /// Number of wall loops
    #[arg(long)]
    wall_loops: Option<u32>,
    /// Nozzle diameter in mm
    #[arg(long)]
    nozzle: Option<f64>,
    /// Top/bottom shell thickness in mm
    #[arg(long)]
    top_bottom: Option<f64>,
    /// Price per gram in cents
    #[arg(long)]
    price_per_gram: Option<f64>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "stlcost=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Volume { file } => {
            let volume = stlcost::decode_volume(&read_file(&file)?)
                .with_context(|| format!("Failed to decode {}", file.display()))?;
            println!("{volume:.4} cm³");
        }
        Commands::Estimate {
            file,
            profile,
            json,
        } => {
            let profile = build_profile(&config, &profile);
            let volume = stlcost::decode_volume(&read_file(&file)?)
                .with_context(|| format!("Failed to decode {}", file.display()))?;
            let usage = estimate(volume, &profile).context("Invalid print profile")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&usage)?);
            } else {
                print!("{}", render_breakdown(&usage, &config));
            }
        }
        Commands::Info { file } => {
            show_info(&file)?;
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            Config::load(path).with_context(|| format!("Failed to load {}", path.display()))
        }
        None => Ok(Config::default()),
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Apply command-line overrides on top of the configured defaults.
fn build_profile(config: &Config, args: &ProfileArgs) -> PrintProfile {
    let mut config = config.clone();
    let p = &mut config.profile;
    if let Some(infill) = args.infill {
        p.infill_density = infill;
    }
    if let Some(material) = args.material {
        p.material = material;
    }
    if let Some(model) = args.model {
        p.model = model;
    }
    if let Some(layer_height) = args.layer_height {
        p.layer_height = layer_height;
    }
    if let Some(loops) = args.wall_loops {
        p.wall_loops = loops;
    }
    if let Some(nozzle) = args.nozzle {
        p.nozzle_diameter = nozzle;
    }
    if let Some(top_bottom) = args.top_bottom {
        p.top_bottom_thickness = top_bottom;
    }
    if let Some(price) = args.price_per_gram {
        config.pricing.price_per_gram = price;
    }
    config.print_profile()
}

fn render_breakdown(usage: &UsageBreakdown, config: &Config) -> String {
    let row = |name: &str, volume: f64, weight: f64| {
        format!("{name:<12} {volume:>12.4} {weight:>12.4}\n")
    };

    let mut out = format!(
        "Model:       {}\nMesh volume: {:.4} cm³\n\n",
        usage.model, usage.mesh_volume
    );
    out.push_str(&format!(
        "{:<12} {:>12} {:>12}\n",
        "Component", "Volume cm³", "Weight g"
    ));
    out.push_str(&row("Walls", usage.wall_volume, usage.wall_weight));
    if usage.model == ProfileModel::ShellAware {
        out.push_str(&row(
            "Top/bottom",
            usage.top_bottom_volume,
            usage.top_bottom_weight,
        ));
    }
    out.push_str(&row("Infill", usage.infill_volume, usage.infill_weight));
    out.push_str(&row("Total", usage.total_volume, usage.total_weight));
    out.push_str(&format!(
        "\nPrice:       {}\n",
        config.pricing.format(usage.price)
    ));
    out
}

/// Enclosed volume in cm³ of triangles that were already decoded.
fn mesh_volume(triangles: &[Triangle]) -> f64 {
    mm3_to_cm3(
        triangles
            .iter()
            .map(Triangle::signed_volume)
            .sum::<f64>()
            .abs(),
    )
}

fn show_info(file: &Path) -> Result<()> {
    let bytes = read_file(file)?;
    let header = read_header(&bytes).with_context(|| format!("Failed to decode {}", file.display()))?;
    let triangles = read_triangles(&bytes)?;
    let volume = mesh_volume(&triangles);

    println!("File: {}", file.display());
    println!("Header: {}", header.text());
    println!("Triangles: {}", header.triangle_count);
    if let Some(bounds) = Bounds::of(&triangles) {
        let [x, y, z] = bounds.size();
        println!("Size: {x:.2} x {y:.2} x {z:.2} mm");
    }
    println!("Volume: {volume:.4} cm³");

    Ok(())
}
