use particle_id::ParticleID;
use serde::{Deserialize, Serialize};

use crate::tagger::{Tagger, TAG_SCALE};

/// B hadrons with dedicated semileptonic branching ratio bins
pub const DEFAULT_HADRONS: [ParticleID; 4] = [
    ParticleID::new(511),
    ParticleID::new(521),
    ParticleID::new(531),
    ParticleID::new(5122),
];

/// Default bin edges for momentum fraction histograms
pub const XB_BINNING: [f64; 124] = [
    0.0, 0.02, 0.04, 0.06, 0.08, 0.1, 0.12, 0.14, 0.16, 0.18, 0.2, 0.22, 0.24,
    0.26, 0.28, 0.3, 0.32, 0.34, 0.36, 0.38, 0.4, 0.41, 0.42, 0.43, 0.44, 0.45,
    0.46, 0.47, 0.48, 0.49, 0.5, 0.51, 0.52, 0.53, 0.54, 0.55, 0.56, 0.57, 0.58,
    0.59, 0.6, 0.605, 0.61, 0.615, 0.62, 0.625, 0.63, 0.635, 0.64, 0.645, 0.65,
    0.655, 0.66, 0.665, 0.67, 0.675, 0.68, 0.685, 0.69, 0.695, 0.7, 0.705, 0.71,
    0.715, 0.72, 0.725, 0.73, 0.735, 0.74, 0.745, 0.75, 0.755, 0.76, 0.765,
    0.77, 0.775, 0.78, 0.785, 0.79, 0.795, 0.8, 0.805, 0.81, 0.815, 0.82, 0.825,
    0.83, 0.835, 0.84, 0.845, 0.85, 0.855, 0.86, 0.865, 0.87, 0.875, 0.88,
    0.885, 0.89, 0.895, 0.9, 0.905, 0.91, 0.915, 0.92, 0.925, 0.93, 0.935, 0.94,
    0.945, 0.95, 0.955, 0.96, 0.965, 0.97, 0.975, 0.98, 0.985, 0.99, 0.995, 1.0,
    1.05, 1.1, 1.5,
];

/// Default bin edges for jet transverse momenta in GeV
pub const PT_BINNING: [f64; 9] =
    [20., 40., 60., 100., 150., 200., 350., 500., 5000.];

/// Analysis settings
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Factor multiplying constituent transverse momenta in momentum fractions
    pub tag_scale: f64,
    /// B hadrons considered for semileptonic branching ratios
    pub hadron_list: Vec<ParticleID>,
    /// Bin edges for momentum fraction histograms
    pub xb_binning: Vec<f64>,
    /// Bin edges for jet transverse momenta
    pub pt_binning: Vec<f64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tag_scale: TAG_SCALE,
            hadron_list: DEFAULT_HADRONS.to_vec(),
            xb_binning: XB_BINNING.to_vec(),
            pt_binning: PT_BINNING.to_vec(),
        }
    }
}

impl Config {
    pub fn tagger(&self) -> Tagger {
        Tagger::new(self.tag_scale)
    }
}
