//! popprior CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pp_priors::{BoundedPdf, Distribution, JointPdf2d, PriorSpecV0, Samples, read_prior_spec};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "popprior")]
#[command(about = "popprior - Boundary-aware population priors")]
#[command(version)]
struct Cli {
    /// Log verbosity level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: tracing::Level,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse and build a prior spec, print its type and support
    Validate {
        /// Prior spec (JSON, schema_version = popprior_spec_v0)
        #[arg(short, long)]
        spec: PathBuf,
    },

    /// Evaluate log_pdf / pdf / log_cdf / cdf at given points
    Eval {
        /// Prior spec (JSON, schema_version = popprior_spec_v0)
        #[arg(short, long)]
        spec: PathBuf,

        /// Evaluation points (comma separated). For 2D priors these are the x1 values.
        #[arg(long, value_delimiter = ',', allow_negative_numbers = true, conflicts_with = "grid")]
        x: Vec<f64>,

        /// Second coordinate for 2D priors (comma separated, same length as `--x`).
        #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
        x2: Vec<f64>,

        /// Evaluate on N equally spaced points across the support (1D only).
        #[arg(long)]
        grid: Option<usize>,

        /// Output file for results (pretty JSON). Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Draw samples by inverse-transform sampling
    Sample {
        /// Prior spec (JSON, schema_version = popprior_spec_v0)
        #[arg(short, long)]
        spec: PathBuf,

        /// Number of samples
        #[arg(short = 'n', long, default_value = "1000")]
        n_samples: usize,

        /// RNG seed
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Output file for results (pretty JSON). Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the JSON result.
    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Validate { spec } => cmd_validate(&spec),
        Commands::Eval { spec, x, x2, grid, output } => {
            cmd_eval(&spec, x, x2, grid, output.as_ref())
        }
        Commands::Sample { spec, n_samples, seed, output } => {
            cmd_sample(&spec, n_samples, seed, output.as_ref())
        }
    }
}

fn write_json(output: Option<&PathBuf>, value: serde_json::Value) -> Result<()> {
    if let Some(path) = output {
        std::fs::write(path, serde_json::to_string_pretty(&value)?)
            .with_context(|| format!("failed to write {}", path.display()))?;
    } else {
        println!("{}", serde_json::to_string_pretty(&value)?);
    }
    Ok(())
}

fn load(path: &PathBuf) -> Result<(PriorSpecV0, Distribution)> {
    let spec = read_prior_spec(path)
        .with_context(|| format!("failed to load prior spec {}", path.display()))?;
    let dist = spec
        .compile()
        .with_context(|| format!("failed to build prior from {}", path.display()))?;
    tracing::info!(
        kind = spec.distribution.type_name(),
        dimension = dist.dimension(),
        "prior compiled"
    );
    Ok((spec, dist))
}

fn header(spec: &PriorSpecV0, dist: &Distribution) -> serde_json::Value {
    let mut v = serde_json::json!({
        "name": spec.name,
        "type": spec.distribution.type_name(),
        "dimension": dist.dimension(),
    });
    if let Distribution::OneD(p) = dist {
        let s = p.support();
        v["support"] = serde_json::json!([s.min, s.max]);
    }
    v
}

fn cmd_validate(spec_path: &PathBuf) -> Result<()> {
    let (spec, dist) = load(spec_path)?;
    let mut out = header(&spec, &dist);
    out["valid"] = serde_json::Value::Bool(true);
    write_json(None, out)
}

fn cmd_eval(
    spec_path: &PathBuf,
    x: Vec<f64>,
    x2: Vec<f64>,
    grid: Option<usize>,
    output: Option<&PathBuf>,
) -> Result<()> {
    let (spec, dist) = load(spec_path)?;
    let mut out = header(&spec, &dist);

    match &dist {
        Distribution::OneD(prior) => {
            if !x2.is_empty() {
                anyhow::bail!("--x2 is only valid for 2D priors");
            }
            let xs = match grid {
                Some(n) => {
                    if n < 2 {
                        anyhow::bail!("--grid must be >= 2, got {n}");
                    }
                    let s = prior.support();
                    (0..n).map(|i| s.min + s.width() * i as f64 / (n - 1) as f64).collect()
                }
                None => x,
            };
            if xs.is_empty() {
                anyhow::bail!("nothing to evaluate: pass --x or --grid");
            }
            let n = xs.len();
            let (mut log_pdf, mut pdf) = (vec![0.0; n], vec![0.0; n]);
            let (mut log_cdf, mut cdf) = (vec![0.0; n], vec![0.0; n]);
            prior.log_pdf_batch(&xs, &mut log_pdf)?;
            prior.pdf_batch(&xs, &mut pdf)?;
            prior.log_cdf_batch(&xs, &mut log_cdf)?;
            prior.cdf_batch(&xs, &mut cdf)?;
            tracing::info!(n_points = n, "evaluated 1D prior");

            out["x"] = serde_json::json!(xs);
            out["log_pdf"] = serde_json::json!(log_pdf);
            out["pdf"] = serde_json::json!(pdf);
            out["log_cdf"] = serde_json::json!(log_cdf);
            out["cdf"] = serde_json::json!(cdf);
        }
        Distribution::TwoD(joint) => {
            if grid.is_some() {
                anyhow::bail!("--grid is only supported for 1D priors");
            }
            if x.is_empty() || x.len() != x2.len() {
                anyhow::bail!(
                    "2D priors need --x and --x2 of equal, non-zero length (got {} and {})",
                    x.len(),
                    x2.len()
                );
            }
            let n = x.len();
            let (mut log_pdf, mut pdf) = (vec![0.0; n], vec![0.0; n]);
            joint.log_pdf_batch(&x, &x2, &mut log_pdf)?;
            joint.pdf_batch(&x, &x2, &mut pdf)?;
            tracing::info!(n_points = n, "evaluated 2D prior");

            out["x1"] = serde_json::json!(x);
            out["x2"] = serde_json::json!(x2);
            out["log_pdf"] = serde_json::json!(log_pdf);
            out["pdf"] = serde_json::json!(pdf);
        }
    }

    write_json(output, out)
}

fn cmd_sample(
    spec_path: &PathBuf,
    n_samples: usize,
    seed: u64,
    output: Option<&PathBuf>,
) -> Result<()> {
    let (spec, dist) = load(spec_path)?;
    let mut rng = StdRng::seed_from_u64(seed);
    let samples = dist.sample(n_samples, &mut rng)?;
    tracing::info!(n_samples, seed, "sampling complete");

    let mut out = header(&spec, &dist);
    out["n_samples"] = serde_json::json!(n_samples);
    out["seed"] = serde_json::json!(seed);
    match samples {
        Samples::OneD(xs) => out["samples"] = serde_json::json!(xs),
        Samples::TwoD(pairs) => {
            out["x1"] = serde_json::json!(pairs.x1);
            out["x2"] = serde_json::json!(pairs.x2);
        }
    }
    write_json(output, out)
}
