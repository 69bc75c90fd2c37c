//! Flavour tagging of jets and b-fragmentation observables
use std::cmp::Ordering;

use log::trace;
use particle_id::ParticleID;

use crate::{
    event::{Event, Jet, Particle, Status},
    pid::{
        is_b_hadron, is_c_hadron, is_charged_lepton, is_neutrino,
        is_tau_channel,
    },
};

/// Default factor multiplying constituent transverse momenta
///
/// Compensates for the different momentum units of tagging
/// constituents and jets in the upstream jet definition.
pub const TAG_SCALE: f64 = 1e20;

const NO_XB: f64 = -1.;
const NO_TAG: ParticleID = ParticleID::new(0);

/// Fragmentation observables of a single jet
///
/// Momentum fractions of missing tags are -1 and their ids are 0.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct JetFragInfo {
    /// Momentum fraction of the leading tag of any flavour
    pub xb_lead: f64,
    /// Momentum fraction of the subleading tag of any flavour
    pub xb_sublead: f64,
    pub lead_tag_id: ParticleID,
    pub sublead_tag_id: ParticleID,
    /// Momentum fraction of the leading B hadron
    pub xb_lead_b: f64,
    /// Momentum fraction of the subleading B hadron
    pub xb_sublead_b: f64,
    pub lead_tag_id_b: ParticleID,
    pub sublead_tag_id_b: ParticleID,
    /// Whether the leading B hadron decayed semileptonically
    pub has_semilep_decay: bool,
    /// Whether the semileptonic decay of the leading B hadron involved a tau
    pub has_tau_semilep_decay: bool,
    /// Number of decayed B hadrons in the jet
    pub n_b_tags: u32,
    /// Number of decayed C hadrons in the jet
    pub n_c_tags: u32,
    /// Number of decayed tau leptons in the jet
    pub n_tau_tags: u32,
}

impl Default for JetFragInfo {
    fn default() -> Self {
        Self {
            xb_lead: NO_XB,
            xb_sublead: NO_XB,
            lead_tag_id: NO_TAG,
            sublead_tag_id: NO_TAG,
            xb_lead_b: NO_XB,
            xb_sublead_b: NO_XB,
            lead_tag_id_b: NO_TAG,
            sublead_tag_id_b: NO_TAG,
            has_semilep_decay: false,
            has_tau_semilep_decay: false,
            n_b_tags: 0,
            n_c_tags: 0,
            n_tau_tags: 0,
        }
    }
}

impl JetFragInfo {
    /// Whether there is a leading B hadron
    pub fn has_b_tag(&self) -> bool {
        self.lead_tag_id_b != NO_TAG
    }
}

/// Jet flavour tagger
///
/// Only decayed constituents are considered as flavour tags. Tags with
/// identical transverse momenta keep their order in the list of
/// constituents.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Tagger {
    tag_scale: f64,
}

impl Default for Tagger {
    fn default() -> Self {
        Self::new(TAG_SCALE)
    }
}

impl Tagger {
    pub fn new(tag_scale: f64) -> Self {
        Self { tag_scale }
    }

    pub fn tag_scale(&self) -> f64 {
        self.tag_scale
    }

    /// Classify the constituents of `jet`
    ///
    /// Constituents and their parents are looked up in `event`.
    pub fn classify(&self, event: &Event, jet: &Jet) -> JetFragInfo {
        let mut info = JetFragInfo::default();
        let mut tags = Vec::new();
        let mut b_tags = Vec::new();
        let mut semilep = Vec::new();
        let mut tau_semilep = Vec::new();

        for (idx, particle) in event.constituents(jet) {
            let id = particle.id;
            let is_lepton = is_neutrino(id) || is_charged_lepton(id);
            let status = particle.status;
            if is_lepton
                && matches!(status, Status::FinalState | Status::Decayed)
            {
                if let Some(b) = decayed_b_parent(event, idx) {
                    semilep.push(b);
                    if is_tau_channel(id) {
                        tau_semilep.push(b);
                    }
                }
            }

            if status != Status::Decayed {
                continue;
            }
            if id.id().unsigned_abs() == 15 {
                info.n_tau_tags += 1;
            }
            if is_c_hadron(id) {
                info.n_c_tags += 1;
            }
            tags.push((idx, particle));
            if is_b_hadron(id) {
                info.n_b_tags += 1;
                b_tags.push((idx, particle));
            }
        }

        // stable, so ties are resolved by constituent order
        tags.sort_by(by_descending_pt);
        b_tags.sort_by(by_descending_pt);

        let jet_pt = jet.pt();
        let xb = |p: &Particle| (p.pt() * self.tag_scale) / jet_pt;
        if let Some(&(_, lead)) = tags.first() {
            info.xb_lead = xb(lead);
            info.lead_tag_id = lead.id;
        }
        if let Some(&(_, sublead)) = tags.get(1) {
            info.xb_sublead = xb(sublead);
            info.sublead_tag_id = sublead.id;
        }
        if let Some(&(lead_idx, lead)) = b_tags.first() {
            info.xb_lead_b = xb(lead);
            info.lead_tag_id_b = lead.id;
            info.has_semilep_decay = semilep.contains(&lead_idx);
            info.has_tau_semilep_decay =
                info.has_semilep_decay && tau_semilep.contains(&lead_idx);
        }
        if let Some(&(_, sublead)) = b_tags.get(1) {
            info.xb_sublead_b = xb(sublead);
            info.sublead_tag_id_b = sublead.id;
        }
        trace!("Jet with pT = {jet_pt}: {info:?}");
        info
    }

    /// Classify all jets in an event
    pub fn classify_all(&self, event: &Event) -> Vec<JetFragInfo> {
        event.jets.iter().map(|jet| self.classify(event, jet)).collect()
    }
}

fn decayed_b_parent(event: &Event, particle: usize) -> Option<usize> {
    let parent = event.parent(particle)?;
    let p = event.particles.get(parent)?;
    (p.status == Status::Decayed && is_b_hadron(p.id)).then_some(parent)
}

fn by_descending_pt(
    a: &(usize, &Particle),
    b: &(usize, &Particle),
) -> Ordering {
    b.1.pt().total_cmp(&a.1.pt())
}
