use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use log::error;
use owo_colors::{colors::Green, OwoColorize};

use caravan::plan::{self, PlanRequest};
use caravan::provider::ShardStore;

#[derive(Parser)]
#[command(name = "caravan", version, about = "Galaxy trade-route planner")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan a multi-stop trade route between two locations.
    Plan {
        /// Origin, as "System" or "System/Station".
        #[arg(long)]
        from: String,
        /// Destination, as "System" or "System/Station".
        #[arg(long)]
        to: String,
        /// Maximum single-jump range, in light-years.
        #[arg(long = "jump-range")]
        jump_range: f64,
        /// Minimum distance a jump must cover, in light-years.
        #[arg(long = "min-range", default_value_t = 0.0)]
        min_range: f64,
        /// Number of sections to split the route into.
        #[arg(long = "min-hop", default_value_t = 1)]
        min_hop: usize,
        /// Deviation radius as a multiple of jump range (0 disables deviations).
        #[arg(long, default_value_t = 0.0)]
        deviation: f64,
        /// Cargo hold capacity, in units.
        #[arg(long, default_value_t = 0)]
        cargo: i64,
        /// Directory containing the local bulk-dump shards.
        #[arg(long = "data-dir")]
        data_dir: String,
    },
    /// Print the build version.
    Version,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Version => {
            println!(
                "{} {}",
                "caravan".bold().fg::<Green>(),
                env!("CARGO_PKG_VERSION")
            );
            Ok(())
        }
        Commands::Plan {
            from,
            to,
            jump_range,
            min_range,
            min_hop,
            deviation,
            cargo,
            data_dir,
        } => {
            let provider = ShardStore::open(&data_dir)?;
            let request = PlanRequest {
                from: &from,
                to: &to,
                jump_range,
                min_range,
                min_hop,
                deviation,
                cargo,
            };
            match plan::plan(&provider, &request) {
                Ok(report) => {
                    print!("{report}");
                    Ok(())
                }
                Err(err) => {
                    error!("planning failed: {err}");
                    Err(err.into())
                }
            }
        }
    }
}
