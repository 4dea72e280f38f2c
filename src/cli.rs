use crate::app;
use bevy::window::WindowResolution;
use clap::ArgAction;
use solar_system::Catalog;
use std::str::FromStr;

#[derive(clap::Parser)]
#[clap(about = "Interactive 3D solar system")]
pub(crate) struct Cli {
    #[clap(subcommand)]
    command: Option<CliCommand>,
}

impl Cli {
    pub(crate) fn run(self) -> Result<(), app::AppError> {
        self.command.unwrap_or_default().run()
    }
}

#[derive(clap::Subcommand)]
enum CliCommand {
    /// Print the embedded body catalog as YAML
    Catalog,
    /// Open the explorer window (default)
    Run {
        #[clap(short, long)]
        resolution: Option<Resolution>,
        #[clap(long, action = ArgAction::SetTrue)]
        inspector: bool,
        /// Seed for the initial planet positions and the star field
        #[clap(long)]
        seed: Option<u64>,
        /// Log filter, e.g. `info,orbit_camera=debug`
        #[clap(long)]
        log: Option<String>,
    },
}

impl Default for CliCommand {
    fn default() -> Self {
        Self::Run {
            resolution: None,
            inspector: false,
            seed: None,
            log: None,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
struct Resolution {
    width: f32,
    height: f32,
}

impl FromStr for Resolution {
    type Err = ResolutionInvalidFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s.split_once('x').ok_or(ResolutionInvalidFormat)?;
        let width = w.parse::<f32>().map_err(|_| ResolutionInvalidFormat)?;
        let height = h.parse::<f32>().map_err(|_| ResolutionInvalidFormat)?;
        if width <= 0.0 || height <= 0.0 {
            return Err(ResolutionInvalidFormat);
        }
        Ok(Self { width, height })
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Invalid format for resolution; expected <width>x<height>")]
struct ResolutionInvalidFormat;

impl CliCommand {
    fn run(self) -> Result<(), app::AppError> {
        match self {
            Self::Catalog => {
                print!("{}", Catalog::builtin()?.to_yaml()?);
            }
            Self::Run {
                resolution,
                inspector,
                seed,
                log,
            } => {
                let mut settings = app::AppSettings {
                    resolution: resolution
                        .map(|r| WindowResolution::new(r.width, r.height))
                        .unwrap_or_default(),
                    with_inspector: inspector,
                    seed: seed.unwrap_or_else(rand::random),
                    ..Default::default()
                };
                if let Some(log) = log {
                    settings.log_filter = log;
                }
                app::get_app(settings)?.run();
            }
        }
        Ok(())
    }
}
