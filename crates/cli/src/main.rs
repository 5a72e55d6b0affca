// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use upow_cli::commands::{bench, hash, inspect, provenance, solve, submit};
use upow_cli::telemetry;
use upow_client::SubmitConfig;
use upow_kernel::backend::BackendKind;
use upow_kernel::config::{K_DIM, M_DIM, N_DIM};
use upow_kernel::Shape;

#[derive(Parser)]
#[command(name = "upow")]
#[command(about = "Deterministic seeded matmul workloads with verifiable results", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct EndpointArgs {
    /// Endpoint to POST to
    #[arg(long)]
    endpoint: Option<String>,

    #[arg(long, env = "UPOW_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Header carrying the key
    #[arg(long, default_value = "Authorization")]
    auth_header: String,

    /// Prefix prepended to the key; pass "" for a bare key
    #[arg(long, default_value = "Bearer ")]
    auth_prefix: String,
}

impl EndpointArgs {
    fn into_config(self) -> Option<SubmitConfig> {
        let endpoint = self.endpoint?;
        Some(SubmitConfig {
            endpoint,
            api_key: self.api_key,
            auth_header: self.auth_header,
            auth_prefix: self.auth_prefix,
        })
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Expand a seed, run the matmul on a backend and print the solution.
    /// Seed lookup order: --seed-hex, --seed-bin, $SEED_HEX, $SEED_BIN.
    Solve {
        #[arg(long)]
        seed_hex: Option<String>,

        #[arg(long)]
        seed_bin: Option<PathBuf>,

        #[arg(long, default_value_t = M_DIM)]
        m: usize,

        #[arg(long, default_value_t = N_DIM)]
        n: usize,

        #[arg(long, default_value_t = K_DIM)]
        k: usize,

        /// cpu-signed or cpu-mixed
        #[arg(long, env = "UPOW_BACKEND", default_value = "cpu-signed")]
        backend: BackendKind,

        #[arg(long, env = "TT_DEVICE_ID", default_value_t = 0)]
        device: u32,

        /// Write the raw solution bytes here
        #[arg(long, short)]
        out: Option<PathBuf>,
    },
    /// Sweep block sizes over a native matmul executable.
    Bench {
        #[arg(long, default_value = "./matmul")]
        binary: PathBuf,

        #[arg(long, default_value_t = 256)]
        m: u32,

        #[arg(long, default_value_t = 256)]
        n: u32,

        #[arg(long, default_value_t = 256)]
        k: u32,

        #[arg(long, default_value = "blocked")]
        algo: String,

        /// Comma separated block sizes
        #[arg(long, default_value = "32,64,128")]
        blocks: String,

        #[arg(long, default_value_t = 1)]
        runs: u32,

        #[arg(long, default_value = "results.json")]
        output: PathBuf,
    },
    /// SHA-256 of a file.
    Hash {
        path: PathBuf,

        /// Validate the 12-byte artifact header before hashing
        #[arg(long)]
        artifact: bool,
    },
    /// Build a provenance record for a results file and its artifact.
    Provenance {
        #[arg(long, default_value = "results.json")]
        results: PathBuf,

        #[arg(long)]
        artifact: PathBuf,

        #[arg(long, default_value = "provenance.json")]
        out: PathBuf,

        #[command(flatten)]
        endpoint: EndpointArgs,
    },
    /// POST a JSON file to an endpoint.
    Submit {
        payload: PathBuf,

        #[command(flatten)]
        endpoint: EndpointArgs,
    },
    /// Show artifact header and provenance details.
    Inspect {
        #[arg(long)]
        artifact: Option<PathBuf>,

        #[arg(long)]
        provenance: Option<PathBuf>,

        /// Results file to re-hash against the provenance record
        #[arg(long)]
        results: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    telemetry::init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Solve {
            seed_hex,
            seed_bin,
            m,
            n,
            k,
            backend,
            device,
            out,
        } => solve::run(&solve::SolveOptions {
            seed_hex,
            seed_bin,
            shape: Shape::new(m, n, k)?,
            backend,
            device_id: device,
            out,
        }),
        Commands::Bench {
            binary,
            m,
            n,
            k,
            algo,
            blocks,
            runs,
            output,
        } => bench::run(&bench::BenchOptions {
            binary,
            m,
            n,
            k,
            algo,
            blocks,
            runs,
            output,
        }),
        Commands::Hash { path, artifact } => hash::run(&path, artifact),
        Commands::Provenance {
            results,
            artifact,
            out,
            endpoint,
        } => provenance::run(&results, &artifact, &out, endpoint.into_config()).map(|_| ()),
        Commands::Submit { payload, endpoint } => {
            let config = endpoint
                .into_config()
                .ok_or_else(|| anyhow::anyhow!("--endpoint is required"))?;
            submit::run(&payload, config)
        }
        Commands::Inspect {
            artifact,
            provenance,
            results,
        } => inspect::run(artifact.as_deref(), provenance.as_deref(), results.as_deref()),
    }
}
