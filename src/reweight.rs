//! Per-jet weights for alternative fragmentation models and
//! semileptonic branching ratios
//!
//! The response curves are read from [LookupTables], which callers can
//! deserialise from whatever format they store them in. Evaluators check
//! that all tables they need are present when they are constructed.
use std::collections::{BTreeMap, HashMap};

use log::debug;
use particle_id::ParticleID;
use serde::{Deserialize, Serialize};

use crate::{
    config::Config,
    error::{Error, Result},
    event::Event,
    hist::check_increasing,
    tagger::{JetFragInfo, Tagger},
};

/// Weight for jets where the response is not applicable
pub const NEUTRAL_WEIGHT: f64 = 1.;

const SMOOTH_SUFFIX: &str = "_smooth";

/// Piecewise linear curve through a set of points
///
/// Outside the range of the points the curve is extrapolated linearly
/// from the two outermost points.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(try_from = "Vec<(f64, f64)>", into = "Vec<(f64, f64)>")]
pub struct Curve {
    points: Vec<(f64, f64)>,
}

impl Curve {
    pub fn new(mut points: Vec<(f64, f64)>) -> Result<Self> {
        if points.is_empty() {
            return Err(Error::EmptyCurve);
        }
        if points.iter().any(|(x, _)| !x.is_finite()) {
            return Err(Error::NotIncreasing);
        }
        points.sort_by(|a, b| a.0.total_cmp(&b.0));
        if let Some(w) = points.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(Error::DuplicatePoint(w[0].0));
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn eval(&self, x: f64) -> f64 {
        let pts = &self.points;
        if pts.len() == 1 {
            return pts[0].1;
        }
        let hi = pts
            .partition_point(|&(px, _)| px <= x)
            .clamp(1, pts.len() - 1);
        let (x0, y0) = pts[hi - 1];
        let (x1, y1) = pts[hi];
        lerp(y0, y1, (x - x0) / (x1 - x0))
    }
}

impl TryFrom<Vec<(f64, f64)>> for Curve {
    type Error = Error;

    fn try_from(points: Vec<(f64, f64)>) -> Result<Self> {
        Self::new(points)
    }
}

impl From<Curve> for Vec<(f64, f64)> {
    fn from(curve: Curve) -> Self {
        curve.points
    }
}

/// Bilinear interpolation on a rectangular grid
///
/// `values` are stored row by row, i.e. the value at node `(x[i], y[j])`
/// is `values[i * y.len() + j]`. Outside the grid the nearest edge
/// value is used.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(try_from = "SurfaceData", into = "SurfaceData")]
pub struct Surface {
    x: Vec<f64>,
    y: Vec<f64>,
    values: Vec<f64>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
struct SurfaceData {
    x: Vec<f64>,
    y: Vec<f64>,
    values: Vec<f64>,
}

impl Surface {
    pub fn new(x: Vec<f64>, y: Vec<f64>, values: Vec<f64>) -> Result<Self> {
        check_increasing(&x, 1)?;
        check_increasing(&y, 1)?;
        let expected = x.len() * y.len();
        if values.len() != expected {
            return Err(Error::SurfaceShape {
                found: values.len(),
                expected,
            });
        }
        Ok(Self { x, y, values })
    }

    pub fn eval(&self, x: f64, y: f64) -> f64 {
        let (x0, x1, tx) = locate(&self.x, x);
        let (y0, y1, ty) = locate(&self.y, y);
        let at = |i: usize, j: usize| self.values[i * self.y.len() + j];
        lerp(
            lerp(at(x0, y0), at(x0, y1), ty),
            lerp(at(x1, y0), at(x1, y1), ty),
            tx,
        )
    }
}

impl TryFrom<SurfaceData> for Surface {
    type Error = Error;

    fn try_from(data: SurfaceData) -> Result<Self> {
        Self::new(data.x, data.y, data.values)
    }
}

impl From<Surface> for SurfaceData {
    fn from(s: Surface) -> Self {
        Self {
            x: s.x,
            y: s.y,
            values: s.values,
        }
    }
}

// enclosing nodes and relative position between them, clamped to the grid
fn locate(nodes: &[f64], x: f64) -> (usize, usize, f64) {
    let last = nodes.len() - 1;
    if last == 0 {
        return (0, 0, 0.);
    }
    let x = x.clamp(nodes[0], nodes[last]);
    let hi = nodes.partition_point(|&n| n <= x).clamp(1, last);
    let lo = hi - 1;
    (lo, hi, (x - nodes[lo]) / (nodes[hi] - nodes[lo]))
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a * (1. - t) + b * t
}

/// Named response curves and surfaces
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LookupTables {
    pub curves: HashMap<String, Curve>,
    pub surfaces: HashMap<String, Surface>,
}

impl LookupTables {
    pub fn curve(&self, name: &str) -> Result<&Curve> {
        self.curves
            .get(name)
            .ok_or_else(|| Error::MissingCurve(name.to_owned()))
    }

    pub fn surface(&self, name: &str) -> Result<&Surface> {
        self.surfaces
            .get(name)
            .ok_or_else(|| Error::MissingSurface(name.to_owned()))
    }
}

#[derive(Clone, Debug, PartialEq)]
enum Response {
    /// Curve in the momentum fraction of the leading B hadron
    Fragmentation(Curve),
    /// Curve in the signed id of the leading B hadron, positive for
    /// semileptonic decays
    SemilepBr(Curve),
}

/// Per-jet weights from one-dimensional response curves
///
/// Weights with "frag" in their name use the curve `<name>_smooth` and
/// are evaluated at the momentum fraction of the leading B hadron. All
/// other weights are branching ratio variations using the curve of the
/// same name.
#[derive(Clone, Debug, PartialEq)]
pub struct CurveReweighter {
    tagger: Tagger,
    hadrons: Vec<ParticleID>,
    responses: Vec<(String, Response)>,
}

impl CurveReweighter {
    pub fn new<S: AsRef<str>>(
        config: &Config,
        tables: &LookupTables,
        weights: &[S],
    ) -> Result<Self> {
        let mut responses = Vec::with_capacity(weights.len());
        for name in weights {
            let name = name.as_ref();
            let response = if is_fragmentation(name) {
                let curve = tables.curve(&table_name(name))?;
                Response::Fragmentation(curve.clone())
            } else {
                Response::SemilepBr(tables.curve(name)?.clone())
            };
            debug!("Weight {name}: {response:?}");
            responses.push((name.to_owned(), response));
        }
        Ok(Self {
            tagger: config.tagger(),
            hadrons: config.hadron_list.clone(),
            responses,
        })
    }

    /// Weight names in the order of [Self::jet_weights]
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.responses.iter().map(|(name, _)| name.as_str())
    }

    /// Weights for a single classified jet
    pub fn jet_weights(&self, info: &JetFragInfo) -> Vec<f64> {
        self.responses
            .iter()
            .map(|(_, response)| self.weight(response, info))
            .collect()
    }

    /// Weights for all jets in an event, one vector per weight name
    pub fn weights(&self, event: &Event) -> BTreeMap<String, Vec<f64>> {
        let infos = self.tagger.classify_all(event);
        self.responses
            .iter()
            .map(|(name, response)| {
                let weights =
                    infos.iter().map(|info| self.weight(response, info));
                (name.clone(), weights.collect())
            })
            .collect()
    }

    fn weight(&self, response: &Response, info: &JetFragInfo) -> f64 {
        match response {
            Response::Fragmentation(curve) => {
                if info.has_b_tag() && info.xb_lead_b >= 0. {
                    curve.eval(info.xb_lead_b)
                } else {
                    NEUTRAL_WEIGHT
                }
            }
            Response::SemilepBr(curve) => {
                let id = info.lead_tag_id_b.abs();
                if info.has_b_tag() && self.hadrons.contains(&id) {
                    let id = id.id() as f64;
                    curve.eval(if info.has_semilep_decay { id } else { -id })
                } else {
                    NEUTRAL_WEIGHT
                }
            }
        }
    }
}

/// Per-jet weights from surfaces in the momentum fraction of the
/// leading B hadron and the jet transverse momentum
///
/// As for [CurveReweighter], weights with "frag" in their name use the
/// surface `<name>_smooth`.
#[derive(Clone, Debug, PartialEq)]
pub struct SurfaceReweighter {
    tagger: Tagger,
    responses: Vec<(String, Surface)>,
}

impl SurfaceReweighter {
    pub fn new<S: AsRef<str>>(
        config: &Config,
        tables: &LookupTables,
        weights: &[S],
    ) -> Result<Self> {
        let responses = weights
            .iter()
            .map(|name| {
                let name = name.as_ref();
                let surface = tables.surface(&table_name(name))?;
                debug!("Weight {name}: {surface:?}");
                Ok((name.to_owned(), surface.clone()))
            })
            .collect::<Result<_>>()?;
        Ok(Self {
            tagger: config.tagger(),
            responses,
        })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.responses.iter().map(|(name, _)| name.as_str())
    }

    pub fn jet_weights(&self, info: &JetFragInfo, jet_pt: f64) -> Vec<f64> {
        self.responses
            .iter()
            .map(|(_, surface)| weight_2d(surface, info, jet_pt))
            .collect()
    }

    pub fn weights(&self, event: &Event) -> BTreeMap<String, Vec<f64>> {
        let infos = self.tagger.classify_all(event);
        self.responses
            .iter()
            .map(|(name, surface)| {
                let weights = infos
                    .iter()
                    .zip(&event.jets)
                    .map(|(info, jet)| weight_2d(surface, info, jet.pt()));
                (name.clone(), weights.collect())
            })
            .collect()
    }
}

fn is_fragmentation(weight: &str) -> bool {
    weight.contains("frag")
}

// fragmentation weights use smoothed tables
fn table_name(weight: &str) -> String {
    if is_fragmentation(weight) {
        format!("{weight}{SMOOTH_SUFFIX}")
    } else {
        weight.to_owned()
    }
}

fn weight_2d(surface: &Surface, info: &JetFragInfo, jet_pt: f64) -> f64 {
    if info.has_b_tag() && info.xb_lead_b >= 0. {
        surface.eval(info.xb_lead_b, jet_pt)
    } else {
        NEUTRAL_WEIGHT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{EventBuilder, Jet, Particle, Status};

    fn curve(points: &[(f64, f64)]) -> Curve {
        Curve::new(points.to_vec()).unwrap()
    }

    fn b_jet(id: i32, xb: f64, semilep: bool) -> JetFragInfo {
        JetFragInfo {
            xb_lead: xb,
            lead_tag_id: ParticleID::new(id),
            xb_lead_b: xb,
            lead_tag_id_b: ParticleID::new(id),
            has_semilep_decay: semilep,
            n_b_tags: 1,
            ..Default::default()
        }
    }

    fn tables() -> LookupTables {
        let mut tables = LookupTables::default();
        tables.curves.insert(
            "fragUp_smooth".to_owned(),
            curve(&[(0., 1.), (1., 2.)]),
        );
        tables.curves.insert(
            "semilepbrup".to_owned(),
            curve(&[(-521., 0.5), (-511., 0.75), (511., 1.25), (521., 1.5)]),
        );
        tables.surfaces.insert(
            "fragUp_smooth".to_owned(),
            Surface::new(vec![0., 1.], vec![0., 100.], vec![1., 2., 3., 4.])
                .unwrap(),
        );
        tables
    }

    #[test]
    fn curve_interpolation() {
        let c = curve(&[(1., 3.), (0., 1.), (2., 2.)]);
        assert_eq!(c.points(), [(0., 1.), (1., 3.), (2., 2.)]);
        assert_eq!(c.eval(0.), 1.);
        assert_eq!(c.eval(0.5), 2.);
        assert_eq!(c.eval(1.), 3.);
        assert_eq!(c.eval(2.), 2.);
        assert_eq!(c.eval(1.5), 2.5);
        // linear extrapolation
        assert_eq!(c.eval(-1.), -1.);
        assert_eq!(c.eval(3.), 1.);
    }

    #[test]
    fn constant_curve() {
        let c = curve(&[(0.3, 0.9)]);
        assert_eq!(c.eval(-100.), 0.9);
        assert_eq!(c.eval(0.3), 0.9);
    }

    #[test]
    fn invalid_curves() {
        assert_eq!(Curve::new(vec![]), Err(Error::EmptyCurve));
        assert_eq!(
            Curve::new(vec![(1., 0.), (0., 2.), (1., 3.)]),
            Err(Error::DuplicatePoint(1.))
        );
        assert_eq!(
            Curve::new(vec![(f64::NAN, 0.)]),
            Err(Error::NotIncreasing)
        );
    }

    #[test]
    fn surface_interpolation() {
        let s = Surface::new(
            vec![0., 1., 2.],
            vec![0., 10.],
            vec![0., 10., 1., 11., 2., 12.],
        )
        .unwrap();
        assert_eq!(s.eval(0., 0.), 0.);
        assert_eq!(s.eval(1., 10.), 11.);
        assert_eq!(s.eval(0.5, 0.), 0.5);
        assert_eq!(s.eval(2., 5.), 7.);
        assert_eq!(s.eval(1.5, 5.), 6.5);
        // clamped outside the grid
        assert_eq!(s.eval(-3., -5.), 0.);
        assert_eq!(s.eval(5., 50.), 12.);
    }

    #[test]
    fn invalid_surfaces() {
        assert_eq!(
            Surface::new(vec![0., 1.], vec![0.], vec![1.]),
            Err(Error::SurfaceShape {
                found: 1,
                expected: 2
            })
        );
        assert_eq!(
            Surface::new(vec![], vec![0.], vec![]),
            Err(Error::TooFewNodes { min: 1, found: 0 })
        );
        assert_eq!(
            Surface::new(vec![1., 0.], vec![0.], vec![1., 2.]),
            Err(Error::NotIncreasing)
        );
        let single = Surface::new(vec![0.5], vec![30.], vec![1.1]).unwrap();
        assert_eq!(single.eval(0.1, 1000.), 1.1);
    }

    #[test]
    fn tables_from_json() {
        let json = r#"{
            "curves": {"fragUp_smooth": [[1.0, 2.0], [0.0, 1.0]]},
            "surfaces": {
                "frag2d": {"x": [0.0, 1.0], "y": [0.0], "values": [1.0, 3.0]}
            }
        }"#;
        let tables: LookupTables = serde_json::from_str(json).unwrap();
        assert_eq!(tables.curve("fragUp_smooth").unwrap().eval(0.25), 1.25);
        assert_eq!(tables.surface("frag2d").unwrap().eval(0.5, 7.), 2.);

        let invalid = r#"{"curves": {"empty": []}}"#;
        assert!(serde_json::from_str::<LookupTables>(invalid).is_err());
    }

    #[test]
    fn missing_tables() {
        let config = Config::default();
        let tables = tables();
        assert_eq!(
            CurveReweighter::new(&config, &tables, &["fragDown"]),
            Err(Error::MissingCurve("fragDown_smooth".to_owned()))
        );
        assert_eq!(
            CurveReweighter::new(&config, &tables, &["semilepbrdown"]),
            Err(Error::MissingCurve("semilepbrdown".to_owned()))
        );
        assert_eq!(
            SurfaceReweighter::new(&config, &tables, &["fragDown"]),
            Err(Error::MissingSurface("fragDown_smooth".to_owned()))
        );
    }

    #[test]
    fn curve_weights() {
        let rw = CurveReweighter::new(
            &Config::default(),
            &tables(),
            &["fragUp", "semilepbrup"],
        )
        .unwrap();
        assert_eq!(rw.names().collect::<Vec<_>>(), ["fragUp", "semilepbrup"]);

        assert_eq!(rw.jet_weights(&b_jet(511, 0.5, true)), [1.5, 1.25]);
        assert_eq!(rw.jet_weights(&b_jet(-521, 0.25, false)), [1.25, 0.5]);
        // B hadron without branching ratio variation
        assert_eq!(rw.jet_weights(&b_jet(541, 1., true)), [2., 1.]);
        assert_eq!(rw.jet_weights(&JetFragInfo::default()), [1., 1.]);
    }

    #[test]
    fn surface_weights() {
        let rw =
            SurfaceReweighter::new(&Config::default(), &tables(), &["fragUp"])
                .unwrap();
        assert_eq!(rw.jet_weights(&b_jet(511, 1., false), 50.), [3.5]);
        assert_eq!(rw.jet_weights(&JetFragInfo::default(), 50.), [1.]);
    }

    #[test]
    fn event_weights() {
        let config = Config {
            tag_scale: 1.,
            ..Default::default()
        };
        let mut ev = EventBuilder::new();
        let b = ev.add_particle(Particle::new(
            ParticleID::new(-511),
            [50., 50., 0., 0.],
            Status::Decayed,
        ));
        let e = Particle::new(
            ParticleID::new(11),
            [5., 5., 0., 0.],
            Status::FinalState,
        );
        let e = ev.add_daughter(e, b);
        ev.add_jet(Jet::new([100., 100., 0., 0.], vec![e, b]));
        ev.add_jet(Jet::new([100., 0., 100., 0.], vec![e]));
        let ev = ev.build();

        let tables = tables();
        let rw =
            CurveReweighter::new(&config, &tables, &["fragUp", "semilepbrup"])
                .unwrap();
        let weights = rw.weights(&ev);
        assert_eq!(weights.len(), 2);
        assert_eq!(weights["fragUp"], [1.5, 1.]);
        assert_eq!(weights["semilepbrup"], [1.25, 1.]);

        let rw = SurfaceReweighter::new(&config, &tables, &["fragUp"]).unwrap();
        let weights = rw.weights(&ev);
        assert_eq!(weights["fragUp"], [3., 1.]);
    }
}
