//! Histograms of b-fragmentation observables and semileptonic decays
use log::debug;
use particle_id::ParticleID;

use crate::{
    config::Config,
    error::Result,
    event::Event,
    hist::{Hist1D, Hist2D},
    pid::is_b_hadron,
    tagger::{JetFragInfo, Tagger},
};

const MAX_TAGS: usize = 5;

/// Momentum fraction distributions of the leading and subleading tag
#[derive(Clone, Debug, PartialEq)]
pub struct XbHistograms {
    pub lead: Hist1D,
    pub sublead: Hist1D,
    /// Leading tag momentum fraction vs jet transverse momentum
    pub lead_vs_pt: Hist2D,
    /// Subleading tag momentum fraction vs jet transverse momentum
    pub sublead_vs_pt: Hist2D,
}

impl XbHistograms {
    fn new(config: &Config) -> Result<Self> {
        let xb = &config.xb_binning;
        let pt = &config.pt_binning;
        Ok(Self {
            lead: Hist1D::new(xb.clone())?,
            sublead: Hist1D::new(xb.clone())?,
            lead_vs_pt: Hist2D::new(xb.clone(), pt.clone())?,
            sublead_vs_pt: Hist2D::new(xb.clone(), pt.clone())?,
        })
    }
}

/// Histograms filled from the flavour tags of jets
///
/// Only jets with at least one B hadron enter the momentum fraction and
/// branching ratio histograms. The branching ratio histograms have one
/// bin for all B hadrons followed by one bin per configured hadron.
#[derive(Clone, Debug, PartialEq)]
pub struct FragmentationHistograms {
    tagger: Tagger,
    hadron_list: Vec<ParticleID>,
    /// Semileptonic decays to electrons or muons
    pub semilepbr: Hist1D,
    /// Semileptonic decays including taus
    pub semilepbrinc: Hist1D,
    /// Normalisation for the branching ratios
    pub semilepbr_norm: Hist1D,
    /// Leading tags of any flavour, filled only when they are B hadrons
    pub inclusive: XbHistograms,
    /// B hadron tags
    pub b_hadrons: XbHistograms,
    pub nbtags: Hist1D,
    pub nctags: Hist1D,
}

impl FragmentationHistograms {
    pub fn new(config: &Config) -> Result<Self> {
        let nhadrons = config.hadron_list.len();
        debug!(
            "Booking histograms: {nhadrons} B hadrons, {} xb and {} pT bins",
            config.xb_binning.len().saturating_sub(1),
            config.pt_binning.len().saturating_sub(1),
        );
        let br_hist = || -> Result<Hist1D> {
            let mut hist =
                Hist1D::uniform(nhadrons + 1, 0., (nhadrons + 1) as f64)?;
            hist.set_label(1, "all");
            for (n, id) in config.hadron_list.iter().enumerate() {
                hist.set_label(n + 2, id.id().to_string());
            }
            Ok(hist)
        };
        Ok(Self {
            tagger: config.tagger(),
            hadron_list: config.hadron_list.clone(),
            semilepbr: br_hist()?,
            semilepbrinc: br_hist()?,
            semilepbr_norm: br_hist()?,
            inclusive: XbHistograms::new(config)?,
            b_hadrons: XbHistograms::new(config)?,
            nbtags: Hist1D::uniform(MAX_TAGS, 0., MAX_TAGS as f64)?,
            nctags: Hist1D::uniform(MAX_TAGS, 0., MAX_TAGS as f64)?,
        })
    }

    /// Classify all jets in the event and fill the histograms
    pub fn analyze_event(&mut self, event: &Event) {
        for jet in &event.jets {
            let info = self.tagger.classify(event, jet);
            self.fill(&info, jet.pt());
        }
    }

    /// Fill the histograms for a single jet
    pub fn fill(&mut self, info: &JetFragInfo, jet_pt: f64) {
        self.nbtags.fill(info.n_b_tags as f64);
        self.nctags.fill(info.n_c_tags as f64);

        if info.n_b_tags == 0 {
            return;
        }

        let inc = &mut self.inclusive;
        if is_b_hadron(info.lead_tag_id) {
            inc.lead.fill(info.xb_lead);
            inc.lead_vs_pt.fill(info.xb_lead, jet_pt);
        }
        if is_b_hadron(info.sublead_tag_id) {
            inc.sublead.fill(info.xb_sublead);
            inc.sublead_vs_pt.fill(info.xb_sublead, jet_pt);
        }
        let b = &mut self.b_hadrons;
        b.lead.fill(info.xb_lead_b);
        b.lead_vs_pt.fill(info.xb_lead_b, jet_pt);
        b.sublead.fill(info.xb_sublead_b);
        b.sublead_vs_pt.fill(info.xb_sublead_b, jet_pt);

        let lead_b = info.lead_tag_id_b.id().unsigned_abs();
        let hadron_pos = self
            .hadron_list
            .iter()
            .position(|id| id.id().unsigned_abs() == lead_b)
            .map(|n| (n + 1) as f64);

        self.semilepbr_norm.fill(0.);
        if let Some(pos) = hadron_pos {
            self.semilepbr_norm.fill(pos);
        }
        if info.has_semilep_decay {
            let light_lepton = !info.has_tau_semilep_decay;
            if light_lepton {
                self.semilepbr.fill(0.);
            }
            self.semilepbrinc.fill(0.);
            if let Some(pos) = hadron_pos {
                if light_lepton {
                    self.semilepbr.fill(pos);
                }
                self.semilepbrinc.fill(pos);
            }
        }
    }

    /// All one-dimensional histograms by name
    pub fn hists_1d(&self) -> Vec<(&'static str, &Hist1D)> {
        vec![
            ("semilepbr", &self.semilepbr),
            ("semilepbrinc", &self.semilepbrinc),
            ("semilepbr_norm", &self.semilepbr_norm),
            ("xb_lead_inc", &self.inclusive.lead),
            ("xb_subLead_inc", &self.inclusive.sublead),
            ("xb_lead_B", &self.b_hadrons.lead),
            ("xb_subLead_B", &self.b_hadrons.sublead),
            ("nbtags", &self.nbtags),
            ("nctags", &self.nctags),
        ]
    }

    /// All two-dimensional histograms by name
    pub fn hists_2d(&self) -> Vec<(&'static str, &Hist2D)> {
        vec![
            ("xb_pt_lead_inc", &self.inclusive.lead_vs_pt),
            ("xb_pt_subLead_inc", &self.inclusive.sublead_vs_pt),
            ("xb_pt_lead_B", &self.b_hadrons.lead_vs_pt),
            ("xb_pt_subLead_B", &self.b_hadrons.sublead_vs_pt),
        ]
    }
}
