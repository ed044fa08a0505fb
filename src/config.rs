use crate::physics::integrators::Tolerances;
use crate::physics::math::{Scalar, Vector};
use crate::physics::state::{GeodesicState, PhysicalState};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Prefix for environment overrides, e.g. `SPACEWARP__SPACETIME__MASS=12`
pub const ENV_PREFIX: &str = "SPACEWARP";

/// Configuration errors
#[derive(Debug)]
pub enum ConfigError {
    /// File could not be read or parsed
    Load(String),
    /// Configuration could not be serialized or written
    Save(String),
    /// No per-user configuration directory on this platform
    NoUserDirectory,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Load(msg) => write!(f, "Failed to load configuration: {msg}"),
            ConfigError::Save(msg) => write!(f, "Failed to save configuration: {msg}"),
            ConfigError::NoUserDirectory => {
                write!(f, "No configuration directory available for this user")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct VisualizerConfig {
    pub spacetime: SpacetimeConfig,
    pub solver: SolverConfig,
    pub rendering: RenderingConfig,
}

/// Parameters of one spacetime recomputation.
///
/// Replaced wholesale whenever a control changes; systems watching this
/// resource recompute the snapshot from scratch.
#[derive(Resource, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct SpacetimeConfig {
    /// Mass in solar masses
    pub mass: Scalar,
    /// Half-width of the sampled square, in meters
    pub view_radius: Scalar,
    /// Grid lines per axis
    pub grid_count: usize,
    pub plot_geodesic: bool,
    pub x0: Scalar,
    pub y0: Scalar,
    pub v_x0: Scalar,
    pub v_y0: Scalar,
    pub kappa: Scalar,
    /// Integration steps; the trajectory has one more sample than this
    pub geo_samples: usize,
    /// Time between trajectory samples
    pub geo_delta: Scalar,
    pub name: String,
}

impl Default for SpacetimeConfig {
    fn default() -> Self {
        Self {
            mass: 7.230_111_248_716_6,
            view_radius: 50_000.0,
            grid_count: 15,
            plot_geodesic: true,
            x0: 50_000.0,
            y0: 50_000.0,
            v_x0: -0.1,
            v_y0: 0.0,
            kappa: 0.0,
            geo_samples: 2000,
            geo_delta: 2000.0,
            name: "Unknown Mass".to_string(),
        }
    }
}

impl SpacetimeConfig {
    pub fn physical_state(&self) -> PhysicalState {
        PhysicalState::from_solar_masses(self.mass)
    }

    pub fn initial_state(&self) -> GeodesicState {
        GeodesicState::new(
            Vector::new(self.x0, self.y0),
            Vector::new(self.v_x0, self.v_y0),
        )
    }

    pub fn with_view_radius(&self, view_radius: Scalar) -> Self {
        Self {
            view_radius,
            ..self.clone()
        }
    }

    pub fn with_initial_position(&self, x0: Scalar, y0: Scalar) -> Self {
        Self {
            x0,
            y0,
            ..self.clone()
        }
    }

    pub fn with_initial_velocity(&self, v_x0: Scalar, v_y0: Scalar) -> Self {
        Self {
            v_x0,
            v_y0,
            ..self.clone()
        }
    }

    pub fn with_plot_geodesic(&self, plot_geodesic: bool) -> Self {
        Self {
            plot_geodesic,
            ..self.clone()
        }
    }
}

#[derive(Resource, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct SolverConfig {
    /// Integrator name or alias, resolved through the registry
    pub integrator: String,
    pub relative_tolerance: Scalar,
    pub absolute_tolerance: Scalar,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_step: Option<Scalar>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_step: Option<Scalar>,
    /// Upper bound on `geo_samples`; unbounded when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_geodesic_samples: Option<usize>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        let tolerances = Tolerances::default();
        Self {
            integrator: "rk45".to_string(),
            relative_tolerance: tolerances.relative,
            absolute_tolerance: tolerances.absolute,
            max_step: tolerances.max_step,
            first_step: tolerances.first_step,
            max_geodesic_samples: None,
        }
    }
}

impl SolverConfig {
    pub fn tolerances(&self) -> Tolerances {
        Tolerances {
            relative: self.relative_tolerance,
            absolute: self.absolute_tolerance,
            max_step: self.max_step,
            first_step: self.first_step,
        }
    }
}

#[derive(Resource, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct RenderingConfig {
    /// Half-width of the rendered surface in world units
    pub scene_extent: f32,
    /// World units per unit of warp factor
    pub height_scale: f32,
    /// Lift applied to the geodesic path above the surface, in warp units
    pub geodesic_height_offset: f32,
    /// Height of the event-horizon circle, in warp units
    pub horizon_height: f32,
    pub horizon_segments: usize,
    /// Trajectory samples advanced per second by the playback marker
    pub playback_rate: f32,
}

impl Default for RenderingConfig {
    fn default() -> Self {
        Self {
            scene_extent: 10.0,
            height_scale: 4.0,
            geodesic_height_offset: 0.1,
            horizon_height: 1.0,
            horizon_segments: 20,
            playback_rate: 200.0,
        }
    }
}

impl VisualizerConfig {
    /// Load a TOML file layered under `SPACEWARP__*` environment overrides.
    ///
    /// A missing file is not an error; the defaults fill every absent field.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let settings = ::config::Config::builder()
            .add_source(
                ::config::File::from(path)
                    .format(::config::FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| ConfigError::Load(format!("{}: {e}", path.display())))?;

        settings
            .try_deserialize()
            .map_err(|e| ConfigError::Load(format!("{}: {e}", path.display())))
    }

    /// Load configuration from a file, falling back to defaults if it can't be used
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            info!("Config file {} not found. Using defaults.", path.display());
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("{e}. Using defaults.");
                Self::default()
            }
        }
    }

    /// Path of the per-user configuration file, if the platform has one
    pub fn user_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "spacewarp")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    pub fn load_from_user_config() -> Self {
        match Self::user_config_path() {
            Some(path) => Self::load_or_default(path),
            None => {
                warn!("{}. Using defaults.", ConfigError::NoUserDirectory);
                Self::default()
            }
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::Save(e.to_string()))?;
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| ConfigError::Save(format!("{}: {e}", parent.display())))?;
        }
        std::fs::write(path, content)
            .map_err(|e| ConfigError::Save(format!("{}: {e}", path.display())))
    }

    pub fn save_to_user_config(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::user_config_path().ok_or(ConfigError::NoUserDirectory)?;
        self.save(&path)?;
        Ok(path)
    }
}
