//! Heavy-flavour tagging of simulated jets and b-fragmentation
//! observables
//!
//! The [Tagger] looks at the decayed constituents of a jet to find the
//! leading heavy-flavour hadrons, their momentum fractions and whether
//! the leading B hadron decayed semileptonically. The results feed into
//! [analysis::FragmentationHistograms] and into the reweighting of
//! fragmentation models and semileptonic branching ratios in
//! [reweight].
//!
//! ```
//! use bfrag::{event::EventBuilder, Jet, Particle, Status};
//! use particle_id::ParticleID;
//!
//! let mut event = EventBuilder::new();
//! let b = event.add_particle(Particle::new(
//!     ParticleID::new(511),
//!     [40., 40., 0., 0.],
//!     Status::Decayed,
//! ));
//! let mu = Particle::new(
//!     ParticleID::new(-13),
//!     [10., 0., 10., 0.],
//!     Status::FinalState,
//! );
//! let mu = event.add_daughter(mu, b);
//! let event = event.build();
//! let jet = Jet::new([100., 100., 0., 0.], vec![b, mu]);
//!
//! let info = bfrag::Tagger::new(1.).classify(&event, &jet);
//! assert_eq!(info.lead_tag_id_b, ParticleID::new(511));
//! assert_eq!(info.xb_lead_b, 0.4);
//! assert!(info.has_semilep_decay);
//! ```
pub mod analysis;
pub mod config;
#[cfg(feature = "hepmc2")]
pub mod convert_hepmc2;
pub mod error;
pub mod event;
pub mod hist;
pub mod pid;
pub mod reweight;
pub mod tagger;

pub use crate::config::Config;
pub use crate::error::{Error, Result};
pub use crate::event::{Event, Jet, Particle, Status};
pub use crate::tagger::{JetFragInfo, Tagger};

/// Classify a jet with the default [Tagger]
pub fn classify(event: &Event, jet: &Jet) -> JetFragInfo {
    Tagger::default().classify(event, jet)
}
