//! Command line interface for spacewarp

use clap::Parser;
use std::fmt;

use crate::config::{ConfigError, VisualizerConfig};
use crate::physics::integrators::registry::IntegratorRegistry;
use crate::profiles::{
    DEFAULT_PROFILE_SAMPLES, DEFAULT_TIME_FRAMES, ProfileReport, radial_profile, time_comparison,
};

/// CLI-specific errors
#[derive(Debug)]
pub enum CliError {
    /// Configuration file could not be loaded
    ConfigLoad(String),
    /// Invalid integrator name provided
    InvalidIntegrator(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::ConfigLoad(msg) => write!(f, "Failed to load configuration: {msg}"),
            CliError::InvalidIntegrator(msg) => write!(f, "Invalid integrator: {msg}"),
        }
    }
}

impl std::error::Error for CliError {}

impl From<ConfigError> for CliError {
    fn from(error: ConfigError) -> Self {
        CliError::ConfigLoad(error.to_string())
    }
}

const LONG_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("BUILD_DATE"), ")");

/// Spacewarp - spacetime warping and geodesics around a Schwarzschild black hole
#[derive(Parser, Debug, Default)]
#[command(version, long_version = LONG_VERSION, about, long_about = None)]
pub struct Args {
    /// Path to configuration file (TOML format)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<String>,

    /// Mass in solar masses (overrides config file)
    #[arg(short, long, value_name = "SOLAR_MASSES")]
    pub mass: Option<f64>,

    /// Display name of the mass
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,

    /// Half-width of the sampled region in meters
    #[arg(short = 'r', long, value_name = "METERS")]
    pub view_radius: Option<f64>,

    /// Grid lines per axis
    #[arg(long, value_name = "COUNT")]
    pub grid_count: Option<usize>,

    /// Skip geodesic integration and show only the warp field
    #[arg(long)]
    pub no_geodesic: bool,

    /// Initial x position of the test particle
    #[arg(long, value_name = "METERS", allow_negative_numbers = true)]
    pub x0: Option<f64>,

    /// Initial y position of the test particle
    #[arg(long, value_name = "METERS", allow_negative_numbers = true)]
    pub y0: Option<f64>,

    /// Initial x velocity of the test particle
    #[arg(long, value_name = "VELOCITY", allow_negative_numbers = true)]
    pub vx0: Option<f64>,

    /// Initial y velocity of the test particle
    #[arg(long, value_name = "VELOCITY", allow_negative_numbers = true)]
    pub vy0: Option<f64>,

    /// Weight of the inverse-square term in the geodesic equation
    #[arg(short, long, value_name = "VALUE", allow_negative_numbers = true)]
    pub kappa: Option<f64>,

    /// Number of geodesic integration steps
    #[arg(short = 'n', long, value_name = "COUNT")]
    pub samples: Option<usize>,

    /// Time between geodesic samples
    #[arg(short = 'd', long, value_name = "SECONDS")]
    pub delta: Option<f64>,

    /// Integrator type (e.g., rk45, rk4)
    #[arg(short = 'i', long, value_name = "TYPE")]
    pub integrator: Option<String>,

    /// List available integrators and exit
    #[arg(long)]
    pub list_integrators: bool,

    /// Print time dilation, redshift, and time comparison tables and exit
    #[arg(long)]
    pub profiles: bool,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

/// Handles the --list-integrators flag by printing available integrators and exiting
pub fn handle_list_integrators() {
    let registry = IntegratorRegistry::new().with_standard_integrators();
    println!("Available integrators:");
    for name in registry.list_available() {
        println!("  - {name}");
    }

    let aliases = registry.list_aliases();
    if !aliases.is_empty() {
        println!("\nAliases:");
        for (alias, target) in aliases {
            println!("  - {alias} -> {target}");
        }
    }
}

/// Handles the --profiles flag by printing the radial profile and the time comparison
pub fn handle_print_profiles(config: &VisualizerConfig) {
    let spacetime = &config.spacetime;
    let radial = radial_profile(
        spacetime.mass,
        0.0,
        spacetime.view_radius,
        DEFAULT_PROFILE_SAMPLES,
    );
    let times = time_comparison(spacetime.mass, DEFAULT_TIME_FRAMES);
    print!(
        "{}",
        ProfileReport {
            name: &spacetime.name,
            mass_solar: spacetime.mass,
            radial: &radial,
            times: &times,
        }
    );
}

/// Loads configuration from file or defaults, then applies command-line overrides
pub fn load_and_apply_config(args: &Args) -> Result<VisualizerConfig, CliError> {
    let config = if let Some(config_path) = &args.config {
        println!("Loading configuration from: {config_path}");
        VisualizerConfig::load(config_path)?
    } else {
        VisualizerConfig::load_from_user_config()
    };

    apply_overrides(config, args)
}

/// Applies command-line overrides on top of a loaded configuration
pub fn apply_overrides(
    mut config: VisualizerConfig,
    args: &Args,
) -> Result<VisualizerConfig, CliError> {
    let spacetime = &mut config.spacetime;

    if let Some(mass) = args.mass {
        println!("Overriding mass to: {mass} solar masses");
        spacetime.mass = mass;
    }
    if let Some(name) = &args.name {
        spacetime.name = name.clone();
    }
    if let Some(view_radius) = args.view_radius {
        println!("Overriding view radius to: {view_radius} m");
        spacetime.view_radius = view_radius;
    }
    if let Some(grid_count) = args.grid_count {
        spacetime.grid_count = grid_count;
    }
    if args.no_geodesic {
        println!("Geodesic integration disabled");
        spacetime.plot_geodesic = false;
    }
    if let Some(x0) = args.x0 {
        spacetime.x0 = x0;
    }
    if let Some(y0) = args.y0 {
        spacetime.y0 = y0;
    }
    if let Some(vx0) = args.vx0 {
        spacetime.v_x0 = vx0;
    }
    if let Some(vy0) = args.vy0 {
        spacetime.v_y0 = vy0;
    }
    if let Some(kappa) = args.kappa {
        spacetime.kappa = kappa;
    }
    if let Some(samples) = args.samples {
        spacetime.geo_samples = samples;
    }
    if let Some(delta) = args.delta {
        spacetime.geo_delta = delta;
    }

    if let Some(integrator_type) = &args.integrator {
        // Validate integrator name against registry
        let registry = IntegratorRegistry::new().with_standard_integrators();
        registry
            .create(integrator_type)
            .map_err(CliError::InvalidIntegrator)?;

        println!("Using integrator: {integrator_type}");
        config.solver.integrator = integrator_type.clone();
    }

    Ok(config)
}
