use itertools::Itertools;
use log::warn;
use particle_id::ParticleID;
use petgraph::{graph::EdgeIndex, prelude::DiGraph, Direction::Incoming};

/// Simulated collider event
#[derive(Clone, Debug, Default)]
pub struct Event {
    /// Event id
    pub id: Option<i32>,
    /// All particles in the event record
    pub particles: Vec<Particle>,
    /// Decay topology
    ///
    /// Each particle is an edge from its production to its decay
    /// vertex. Edge weights correspond to the index in the `particles`
    /// vector, and the edge with index `n` is always particle `n`.
    pub topology: DiGraph<Vertex, usize>,
    /// Jets, with constituents referring to `particles`
    pub jets: Vec<Jet>,
}

impl Event {
    /// Index of the direct parent of a particle
    ///
    /// This is the first particle entering the production vertex.
    /// Particles without known ancestry have no parent.
    pub fn parent(&self, particle: usize) -> Option<usize> {
        let g = &self.topology;
        let (start, _) = g.edge_endpoints(EdgeIndex::new(particle))?;
        g.edges_directed(start, Incoming).map(|e| *e.weight()).min()
    }

    /// Constituents of a jet together with their indices
    ///
    /// Indices that don't refer to a particle in this event are skipped
    /// and repeated indices are only visited once.
    pub fn constituents<'a>(
        &'a self,
        jet: &'a Jet,
    ) -> impl Iterator<Item = (usize, &'a Particle)> + 'a {
        jet.constituents
            .iter()
            .unique()
            .filter_map(|&idx| self.particles.get(idx).map(|p| (idx, p)))
    }
}

/// A particle
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
pub struct Particle {
    /// Particle type
    pub id: ParticleID,
    /// Four-momentum (E, px, py, pz)
    pub p: [f64; 4],
    /// Status
    pub status: Status,
}

impl Particle {
    pub fn new(id: ParticleID, p: [f64; 4], status: Status) -> Self {
        Self { id, p, status }
    }

    /// Transverse momentum
    pub fn pt(&self) -> f64 {
        pt(&self.p)
    }
}

/// A jet
///
/// The momentum is that of the jet as delivered by the clustering,
/// which need not be the sum of the constituent momenta.
#[derive(Clone, Debug, Default, PartialEq, PartialOrd)]
pub struct Jet {
    /// Four-momentum (E, px, py, pz)
    pub p: [f64; 4],
    /// Indices of the constituents in the event's particle list
    pub constituents: Vec<usize>,
}

impl Jet {
    pub fn new(p: [f64; 4], constituents: Vec<usize>) -> Self {
        Self { p, constituents }
    }

    /// Transverse momentum
    pub fn pt(&self) -> f64 {
        pt(&self.p)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord, Hash)]
pub enum Status {
    /// Incoming particle
    Incoming,
    /// Stable final-state particle
    FinalState,
    /// Intermediate particle that decayed further
    Decayed,
    /// Documentation line
    Documentation,
    /// Unknown
    Unknown(i32),
}

#[derive(Clone, Debug, Default, PartialEq, PartialOrd)]
pub struct Vertex {
    pub barcode: Option<i32>,
    pub status: Option<i32>,
}

/// Incrementally build an [Event] with consistent decay topology
#[derive(Clone, Debug, Default)]
pub struct EventBuilder {
    event: Event,
}

impl EventBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(&mut self, id: i32) -> &mut Self {
        self.event.id = Some(id);
        self
    }

    /// Add a particle without known ancestry, returning its index
    pub fn add_particle(&mut self, particle: Particle) -> usize {
        self.add(particle, None)
    }

    /// Add a particle produced in the decay of `parent`, returning its index
    pub fn add_daughter(&mut self, particle: Particle, parent: usize) -> usize {
        self.add(particle, Some(parent))
    }

    pub fn add_jet(&mut self, jet: Jet) -> &mut Self {
        self.event.jets.push(jet);
        self
    }

    pub fn build(self) -> Event {
        self.event
    }

    fn add(&mut self, particle: Particle, parent: Option<usize>) -> usize {
        let g = &mut self.event.topology;
        let idx = self.event.particles.len();
        let decay_vx = parent.and_then(|parent| {
            let endpoints = g.edge_endpoints(EdgeIndex::new(parent));
            if endpoints.is_none() {
                warn!("Ignoring unknown parent {parent} of particle {idx}");
            }
            endpoints.map(|(_, end)| end)
        });
        let start = decay_vx.unwrap_or_else(|| g.add_node(Vertex::default()));
        let end = g.add_node(Vertex::default());
        let edge = g.add_edge(start, end, idx);
        debug_assert_eq!(edge.index(), idx);
        self.event.particles.push(particle);
        idx
    }
}

pub(crate) fn pt2(p: &[f64; 4]) -> f64 {
    p[1] * p[1] + p[2] * p[2]
}

pub(crate) fn pt(p: &[f64; 4]) -> f64 {
    pt2(p).sqrt()
}
