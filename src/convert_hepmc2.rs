use ahash::AHashMap;
use log::warn;
use particle_id::ParticleID;
use petgraph::{prelude::DiGraph, visit::NodeIndexable};

use crate::event::{Event, Particle, Status, Vertex};

const HEPMC_OUTGOING: i32 = 1;
const HEPMC_DECAYED: i32 = 2;
const HEPMC_DOC: i32 = 3;
const HEPMC_INCOMING: i32 = 4;

/// Import the particle record and decay topology of a HepMC event
///
/// Jets are not part of the HepMC record and have to be added by the
/// caller.
impl From<hepmc2::Event> for Event {
    fn from(source: hepmc2::Event) -> Self {
        let efact = if source.energy_unit == hepmc2::event::EnergyUnit::MEV {
            1e-3
        } else {
            1.
        };
        let (particles, topology) = convert_vertices(source.vertices, efact);
        Self {
            id: Some(source.number),
            particles,
            topology,
            ..Default::default()
        }
    }
}

fn convert_vertices(
    vertices: Vec<hepmc2::event::Vertex>,
    efact: f64,
) -> (Vec<Particle>, DiGraph<Vertex, usize>) {
    let mut barcode_to_idx = AHashMap::new();
    for (idx, vx) in vertices.iter().enumerate() {
        if barcode_to_idx.insert(vx.barcode, idx).is_some() {
            warn!("Duplicate vertex barcode {}", vx.barcode);
        }
    }
    let mut topology = DiGraph::new();
    for vx in &vertices {
        topology.add_node(Vertex {
            barcode: Some(vx.barcode),
            status: Some(vx.status),
        });
    }

    // particle n is always edge n
    let mut particles = Vec::new();
    for (idx, vx) in vertices.into_iter().enumerate() {
        let vx_node = topology.from_index(idx);
        // only orphans are listed as incoming, all other particles
        // appear at their production vertex
        for incoming in vx.particles_in {
            let start = topology.add_node(Vertex::default());
            topology.add_edge(start, vx_node, particles.len());
            particles.push(convert_particle(&incoming, efact));
        }
        for out in vx.particles_out {
            let end = match barcode_to_idx.get(&out.end_vtx) {
                Some(&end) => topology.from_index(end),
                None => {
                    if out.status == HEPMC_DECAYED {
                        warn!(
                            "Decayed particle {} without decay vertex {}",
                            out.id, out.end_vtx
                        );
                    }
                    topology.add_node(Vertex::default())
                }
            };
            topology.add_edge(vx_node, end, particles.len());
            particles.push(convert_particle(&out, efact));
        }
    }
    (particles, topology)
}

fn convert_particle(
    particle: &hepmc2::event::Particle,
    efact: f64,
) -> Particle {
    Particle {
        id: ParticleID::new(particle.id),
        p: particle.p.0.map(|p| efact * p),
        status: from_i32(particle.status),
    }
}

fn from_i32(status: i32) -> Status {
    use Status::*;
    match status {
        HEPMC_INCOMING => Incoming,
        HEPMC_OUTGOING => FinalState,
        HEPMC_DECAYED => Decayed,
        HEPMC_DOC => Documentation,
        s => Unknown(s),
    }
}
