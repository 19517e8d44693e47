use chrono::NaiveTime;
use clap::{Args, Parser, Subcommand};
use dendra::clock;
use dendra::config::{checked_time_step, ClockOverrides, RunConfig};
use dendra::settings::Settings;
use std::io;

#[derive(Parser)]
#[command(name = "dendra")]
#[command(version)]
#[command(
    about = "Fractal clock for the terminal: every hand grows a smaller clock",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Tree shape options shared by every command
#[derive(Args)]
struct TreeArgs {
    /// Recursion depth (0-14, each level doubles the work)
    #[arg(short, long)]
    depth: Option<usize>,

    /// Length of the root minute/second hands
    #[arg(long)]
    arm_length: Option<f64>,

    /// Stroke width of the root clock
    #[arg(long)]
    line_width: Option<f64>,

    /// Arm length multiplier per level
    #[arg(long)]
    length_factor: Option<f64>,

    /// Stroke width multiplier per level
    #[arg(long)]
    width_factor: Option<f64>,

    /// Opacity multiplier per level
    #[arg(long)]
    luminance_factor: Option<f64>,

    /// Scale from clock units to braille dots
    #[arg(short, long)]
    zoom: Option<f64>,

    /// Color scheme (0-9, 7 = white)
    #[arg(short, long)]
    palette: Option<u8>,
}

impl TreeArgs {
    fn overrides(&self) -> ClockOverrides {
        ClockOverrides {
            zoom: self.zoom,
            start_line_width: self.line_width,
            max_depth: self.depth,
            length_factor: self.length_factor,
            luminance_factor: self.luminance_factor,
            width_factor: self.width_factor,
            start_arm_length: self.arm_length,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run the animated fractal clock
    Clock {
        #[command(flatten)]
        tree: TreeArgs,

        /// Animation speed (seconds per frame)
        #[arg(short, long)]
        time: Option<f32>,

        /// Show frame statistics
        #[arg(long)]
        fps: bool,
    },

    /// Print a single frame to stdout
    Print {
        #[command(flatten)]
        tree: TreeArgs,

        /// Draw this time instead of now (HH:MM[:SS[.fff]])
        #[arg(short, long, value_parser = parse_time)]
        at: Option<NaiveTime>,

        /// Output width in columns
        #[arg(long)]
        width: Option<u16>,

        /// Output height in rows
        #[arg(long)]
        height: Option<u16>,
    },
}

fn parse_time(s: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(s, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .map_err(|e| format!("expected HH:MM[:SS[.fff]]: {}", e))
}

fn run_config(settings: &Settings, tree: &TreeArgs, time: Option<f32>) -> RunConfig {
    RunConfig {
        clock: tree.overrides().apply(&settings.clock),
        time_step: checked_time_step(time.unwrap_or(settings.display.time_step)),
        palette: tree.palette.unwrap_or(settings.display.palette),
        show_fps: settings.display.show_fps,
        at: None,
        size: None,
    }
}

fn main() -> io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let settings = Settings::load();

    match cli.command {
        Commands::Clock { tree, time, fps } => {
            let mut config = run_config(&settings, &tree, time);
            config.show_fps |= fps;
            clock::run(config)?;
        }
        Commands::Print { tree, at, width, height } => {
            let mut config = run_config(&settings, &tree, None);
            config.at = at;
            config.size = match (width, height) {
                (None, None) => None,
                (w, h) => Some((w.unwrap_or(80), h.unwrap_or(24))),
            };
            clock::print(config)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use dendra::config::DEFAULT_TIME_STEP;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_times_with_and_without_fraction() {
        assert_eq!(parse_time("03:15:30").unwrap(), NaiveTime::from_hms_opt(3, 15, 30).unwrap());
        assert_eq!(
            parse_time("03:15:30.250").unwrap(),
            NaiveTime::from_hms_milli_opt(3, 15, 30, 250).unwrap()
        );
        assert_eq!(parse_time("23:05").unwrap(), NaiveTime::from_hms_opt(23, 5, 0).unwrap());
        assert!(parse_time("noon").is_err());
    }

    #[test]
    fn flags_override_settings() {
        let cli = Cli::try_parse_from([
            "dendra", "print", "--depth", "3", "--palette", "2", "--at", "12:00",
        ])
        .unwrap();
        let Commands::Print { tree, at, .. } = cli.command else {
            panic!("expected print command");
        };
        let config = run_config(&Settings::default(), &tree, None);
        assert_eq!(config.clock.max_depth, 3);
        assert_eq!(config.clock.length_factor, 0.9);
        assert_eq!(config.palette, 2);
        assert_eq!(at, NaiveTime::from_hms_opt(12, 0, 0));
    }

    #[test]
    fn out_of_range_frame_delays_use_the_default() {
        let cli = Cli::try_parse_from(["dendra", "clock", "--time", "inf"]).unwrap();
        let Commands::Clock { tree, time, .. } = cli.command else {
            panic!("expected clock command");
        };
        assert_eq!(time, Some(f32::INFINITY));
        let config = run_config(&Settings::default(), &tree, time);
        assert_eq!(config.time_step, DEFAULT_TIME_STEP);

        let mut settings = Settings::default();
        settings.display.time_step = 1e30;
        assert_eq!(run_config(&settings, &tree, None).time_step, DEFAULT_TIME_STEP);
        assert_eq!(run_config(&settings, &tree, Some(0.1)).time_step, 0.1);
    }
}
