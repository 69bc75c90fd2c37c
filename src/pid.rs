//! Classification of particle ids by their PDG numbering bands
use particle_id::{
    sm_elementary_particles::{
        electron, electron_neutrino, muon, muon_neutrino, tau, tau_neutrino,
    },
    ParticleID,
};

/// Whether the particle is a hadron containing a bottom quark
pub fn is_b_hadron(id: ParticleID) -> bool {
    has_heavy_quark(id, 5)
}

/// Whether the particle is a hadron containing a charm quark
pub fn is_c_hadron(id: ParticleID) -> bool {
    has_heavy_quark(id, 4)
}

pub fn is_neutrino(id: ParticleID) -> bool {
    is_any_of(id, &[electron_neutrino, muon_neutrino, tau_neutrino])
}

pub fn is_charged_lepton(id: ParticleID) -> bool {
    is_any_of(id, &[electron, muon, tau])
}

/// Whether the particle is a tau lepton or tau neutrino
pub fn is_tau_channel(id: ParticleID) -> bool {
    is_any_of(id, &[tau, tau_neutrino])
}

fn is_any_of(id: ParticleID, particles: &[ParticleID]) -> bool {
    let id = id.id().unsigned_abs();
    particles.iter().any(|p| p.id().unsigned_abs() == id)
}

// either the hundreds digit (mesons) or the thousands band (baryons)
fn has_heavy_quark(id: ParticleID, quark: u32) -> bool {
    let id = id.id().unsigned_abs();
    let baryons = quark * 1000..=quark * 1000 + 999;
    (id / 100) % 10 == quark || baryons.contains(&id)
}
