use anyhow::Result;
use clap::Parser;
use field_animator::{live, Config, PlotWindow};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "field-animator")]
#[command(about = "Animate each row of a field matrix as a live line plot")]
#[command(version)]
struct Cli {
    /// Field matrix file (whitespace-delimited, one time step per line)
    input: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// First column of the region of interest
    #[arg(long)]
    crop_start: Option<usize>,

    /// End of the region of interest (exclusive)
    #[arg(long)]
    crop_end: Option<usize>,

    /// Pause after each frame, in seconds
    #[arg(long)]
    delay: Option<f64>,

    /// Lower y-axis limit
    #[arg(long, allow_negative_numbers = true)]
    y_min: Option<f64>,

    /// Upper y-axis limit
    #[arg(long, allow_negative_numbers = true)]
    y_max: Option<f64>,

    /// Window title
    #[arg(long)]
    title: Option<String>,

    /// Window width in pixels
    #[arg(long)]
    width: Option<usize>,

    /// Window height in pixels
    #[arg(long)]
    height: Option<usize>,

    /// Load and crop only; print a summary instead of opening a window
    #[arg(long)]
    check: bool,
}

impl Cli {
    fn into_config(self) -> Result<(Config, bool)> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };

        if let Some(path) = self.input {
            config.input.path = path;
        }
        if let Some(start) = self.crop_start {
            config.crop.start = start;
        }
        if let Some(end) = self.crop_end {
            config.crop.end = end;
        }
        if let Some(delay) = self.delay {
            config.display.frame_delay = delay;
        }
        if let Some(y_min) = self.y_min {
            config.display.y_min = y_min;
        }
        if let Some(y_max) = self.y_max {
            config.display.y_max = y_max;
        }
        if let Some(title) = self.title {
            config.display.title = title;
        }
        if let Some(width) = self.width {
            config.display.width = width;
        }
        if let Some(height) = self.height {
            config.display.height = height;
        }

        config.validate()?;
        Ok((config, self.check))
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let (config, check) = Cli::parse().into_config()?;
    config.log_summary();

    if check {
        println!("{}", live::load_region(&config)?.summary());
        return Ok(());
    }

    live::run(&config, PlotWindow::open, &mut std::io::stdout())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn config_from(args: &[&str]) -> Result<(Config, bool)> {
        let mut argv = vec!["field-animator"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv)?.into_config()
    }

    #[test]
    fn no_arguments_keep_the_defaults() {
        let (config, check) = config_from(&[]).unwrap();
        assert_eq!(config, Config::default());
        assert!(!check);
    }

    #[test]
    fn flags_override_individual_values() {
        let (config, check) = config_from(&[
            "Ey.txt",
            "--crop-start",
            "100",
            "--crop-end",
            "300",
            "--y-min",
            "-2.5",
            "--y-max",
            "2.5",
            "--delay",
            "0.01",
            "--title",
            "Ey field",
            "--check",
        ])
        .unwrap();
        assert_eq!(config.input.path, PathBuf::from("Ey.txt"));
        assert_eq!(config.crop_range(), 100..300);
        assert_eq!((config.display.y_min, config.display.y_max), (-2.5, 2.5));
        assert_eq!(config.display.frame_delay, 0.01);
        assert_eq!(config.display.title, "Ey field");
        assert!(check);
    }

    #[test]
    fn merged_values_are_validated_again() {
        assert!(config_from(&["--crop-start", "3000", "--crop-end", "2500"]).is_err());
        assert!(config_from(&["--y-min", "1", "--y-max", "-1"]).is_err());
        assert!(config_from(&["--delay", "1e30"]).is_err());
        assert!(config_from(&["--width", "0"]).is_err());
    }

    #[test]
    fn flags_win_over_the_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[crop]\nstart = 10\nend = 50\n\n[display]\nwidth = 800").unwrap();
        let path = file.path().to_str().unwrap();

        let (config, _) = config_from(&["--config", path, "--crop-end", "40"]).unwrap();
        assert_eq!(config.crop_range(), 10..40);
        assert_eq!(config.display.width, 800);
    }
}
