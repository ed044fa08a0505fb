use crate::config::SpacetimeConfig;
use crate::field::SpacetimeSnapshot;
use bevy::prelude::*;

/// Parameters the app was launched with, restored on reset
#[derive(Resource, Deref, Clone, Debug, PartialEq)]
pub struct InitialSpacetime(pub SpacetimeConfig);

/// Most recent recomputation, absent until the first one finishes
#[derive(Resource, Deref, DerefMut, Default, Debug)]
pub struct CurrentSnapshot(pub Option<SpacetimeSnapshot>);

/// Which rendering of the field is on screen
#[derive(Resource, Copy, Clone, Default, PartialEq, Eq, Debug)]
pub enum ViewMode {
    /// Warp factor as height over the flat mesh
    #[default]
    Surface,
    /// Mesh nodes pulled toward the mass, drawn flat
    SunkenGrid,
    /// Flat mesh shaded by warp factor with iso-warp rings
    Radial,
}

impl ViewMode {
    pub fn next(self) -> Self {
        match self {
            ViewMode::Surface => ViewMode::SunkenGrid,
            ViewMode::SunkenGrid => ViewMode::Radial,
            ViewMode::Radial => ViewMode::Surface,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ViewMode::Surface => "surface",
            ViewMode::SunkenGrid => "sunken grid",
            ViewMode::Radial => "radial",
        }
    }

    /// Whether the view lies in the plane rather than showing height
    pub fn is_flat(self) -> bool {
        !matches!(self, ViewMode::Surface)
    }
}

/// Fractional trajectory index of the playback marker
#[derive(Resource, Deref, DerefMut, Copy, Clone, Default, PartialEq, Debug)]
pub struct PlaybackCursor(pub f32);

impl PlaybackCursor {
    /// Advance by `samples`, wrapping around a trajectory of `len` samples
    pub fn advance(&mut self, samples: f32, len: usize) {
        if len == 0 {
            self.0 = 0.0;
            return;
        }
        self.0 = (self.0 + samples).rem_euclid(len as f32);
    }

    pub fn index(&self, len: usize) -> Option<usize> {
        (len > 0).then(|| (self.0 as usize).min(len - 1))
    }
}
