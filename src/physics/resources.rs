//! Physics resources shared with the Bevy app

use super::integrators::{DormandPrince45, Integrator};
use bevy::prelude::*;

/// Resource holding the currently active integrator
#[derive(Resource)]
pub struct CurrentIntegrator(pub Box<dyn Integrator>);

impl Default for CurrentIntegrator {
    fn default() -> Self {
        Self(Box::new(DormandPrince45))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_integrator_is_dormand_prince() {
        assert_eq!(CurrentIntegrator::default().0.name(), "rk45");
    }
}
