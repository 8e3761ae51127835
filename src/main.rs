//! EPS Molding Calculator
//!
//! Estimates weight and dimensions of an EPS molded piece from steam and
//! mold settings.

mod calculator;
mod error;
mod export;
mod models;
mod render;
mod sweep;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::export::ExportFormat;
use crate::models::{
    InputParameters, BEAD_DENSITY, FIXED_SIDE_TEMP, MOBILE_SIDE_TEMP, PARAMETER_LIMITS,
    STEAM_PRESSURE, STEAM_TIME,
};

const SCHEMATIC_COLS: usize = 40;
const SCHEMATIC_ROWS: usize = 20;
const CHART_COLS: usize = 60;
const CHART_ROWS: usize = 12;

#[derive(Parser)]
#[command(name = "eps-molding")]
#[command(about = "Weight and dimension calculator for EPS molded pieces")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Process settings shared by every evaluating command
#[derive(Args, Debug, Clone, Copy)]
struct ProcessArgs {
    /// Steam pressure in bar [0.5, 2.0]
    #[arg(short = 'p', long, default_value_t = STEAM_PRESSURE.default)]
    steam_pressure: f64,

    /// Steam time in seconds [1, 10]
    #[arg(short = 't', long, default_value_t = STEAM_TIME.default)]
    steam_time: f64,

    /// Fixed side mold temperature in °C [30, 100]
    #[arg(short = 'f', long, default_value_t = FIXED_SIDE_TEMP.default)]
    fixed_side_temp: f64,

    /// Mobile side mold temperature in °C [30, 100]
    #[arg(short = 'm', long, default_value_t = MOBILE_SIDE_TEMP.default)]
    mobile_side_temp: f64,

    /// Bead density in g/L [15, 35]
    #[arg(short = 'd', long, default_value_t = BEAD_DENSITY.default)]
    bead_density: f64,
}

impl ProcessArgs {
    fn to_params(self) -> Result<InputParameters> {
        let params = InputParameters::new(
            self.steam_pressure,
            self.steam_time,
            self.fixed_side_temp,
            self.mobile_side_temp,
            self.bead_density,
        )?;
        Ok(params)
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SweepKind {
    /// Piece weight over the steam pressure range
    Pressure,
    /// Contraction over mold-side temperature difference
    Thermal,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate piece weight, length and width
    Calc {
        #[command(flatten)]
        process: ProcessArgs,

        /// Show derived factors and the top-view schematic
        #[arg(short, long)]
        verbose: bool,
    },

    /// Draw the top-view schematic and both diagnostic charts
    Chart {
        #[command(flatten)]
        process: ProcessArgs,
    },

    /// Print diagnostic sweep samples as a table
    Sweep {
        /// Which sweep to print
        #[arg(value_enum)]
        kind: SweepKind,

        #[command(flatten)]
        process: ProcessArgs,
    },

    /// Export inputs and results as a tabular record
    Export {
        #[command(flatten)]
        process: ProcessArgs,

        /// Output file format
        #[arg(long, value_enum, default_value = "sqlite")]
        format: ExportFormat,

        /// Directory the record file is written to
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// List the allowed range of every process parameter
    Limits,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Calc { process, verbose } => {
            let eval = calculator::evaluate(&process.to_params()?);

            println!("{}", render::format_report(&eval));

            if verbose {
                println!("{}", eval);
                println!(
                    "{}",
                    render::schematic(&eval.output, SCHEMATIC_COLS, SCHEMATIC_ROWS)
                );
            }
        }

        Commands::Chart { process } => {
            let eval = calculator::evaluate(&process.to_params()?);

            println!(
                "{}",
                render::schematic(&eval.output, SCHEMATIC_COLS, SCHEMATIC_ROWS)
            );
            println!(
                "{}",
                render::line_chart(
                    "Piece weight vs steam pressure",
                    "Steam pressure (bar)",
                    "Weight (g)",
                    sweep::pressure_sweep(&eval),
                    CHART_COLS,
                    CHART_ROWS,
                )
            );
            println!(
                "{}",
                render::line_chart(
                    "Contraction vs mold-side temperature difference",
                    "Temperature difference (°C)",
                    "Contraction",
                    sweep::thermal_sweep(),
                    CHART_COLS,
                    CHART_ROWS,
                )
            );
        }

        Commands::Sweep { kind, process } => {
            let eval = calculator::evaluate(&process.to_params()?);

            match kind {
                SweepKind::Pressure => {
                    println!("{:>12} {:>12}", "Pressure", "Weight (g)");
                    println!("{}", "-".repeat(25));
                    for (p, w) in sweep::pressure_sweep(&eval) {
                        println!("{:>12.4} {:>12.2}", p, w);
                    }
                }
                SweepKind::Thermal => {
                    println!("{:>12} {:>12}", "Delta (°C)", "Contraction");
                    println!("{}", "-".repeat(25));
                    for (d, c) in sweep::thermal_sweep() {
                        println!("{:>12.4} {:>12.2}", d, c);
                    }
                }
            }
        }

        Commands::Export {
            process,
            format,
            out_dir,
        } => {
            let eval = calculator::evaluate(&process.to_params()?);

            let path = export::write_record(&eval, format, &out_dir)
                .with_context(|| format!("Failed to export to {}", out_dir.display()))?;
            println!("Exported record to {}", path.display());

            if format == ExportFormat::Sqlite {
                for record in export::read_records(&path)? {
                    for (column, value) in export::COLUMNS.iter().zip(record.values) {
                        println!("  {:<18} {}", column, value);
                    }
                }
            } else {
                print!("{}", export::to_csv(&export::ExportRecord::from_evaluation(&eval)));
            }
        }

        Commands::Limits => {
            println!(
                "{:<20} {:<26} {:>6} {:>6} {:>8} {:>6}",
                "Parameter", "Description", "Min", "Max", "Default", "Step"
            );
            println!("{}", "-".repeat(77));
            for limit in PARAMETER_LIMITS {
                println!(
                    "{:<20} {:<26} {:>6} {:>6} {:>8} {:>6}",
                    limit.name,
                    format!("{} ({})", limit.label, limit.unit),
                    limit.min,
                    limit.max,
                    limit.default,
                    limit.step
                );
            }
        }
    }

    Ok(())
}
