//! Weighted histograms with variable bin widths
//!
//! Bin 0 is the underflow and bin `nbins + 1` the overflow, so that the
//! bins proper are numbered from 1.
use itertools::Itertools;

use crate::error::{Error, Result};

/// One-dimensional histogram
#[derive(Clone, Debug, PartialEq)]
pub struct Hist1D {
    axis: Axis,
    sumw: Vec<f64>,
    sumw2: Vec<f64>,
    labels: Vec<Option<String>>,
}

impl Hist1D {
    pub fn new(edges: Vec<f64>) -> Result<Self> {
        let axis = Axis::new(edges)?;
        let nbins = axis.nbins() + 2;
        Ok(Self {
            axis,
            sumw: vec![0.; nbins],
            sumw2: vec![0.; nbins],
            labels: vec![None; nbins],
        })
    }

    /// Histogram with `nbins` bins of equal width
    pub fn uniform(nbins: usize, min: f64, max: f64) -> Result<Self> {
        Self::new(uniform_edges(nbins, min, max))
    }

    pub fn set_label(&mut self, bin: usize, label: impl Into<String>) {
        if let Some(l) = self.labels.get_mut(bin) {
            *l = Some(label.into());
        }
    }

    pub fn label(&self, bin: usize) -> Option<&str> {
        self.labels.get(bin)?.as_deref()
    }

    pub fn fill(&mut self, x: f64) {
        self.fill_weighted(x, 1.)
    }

    pub fn fill_weighted(&mut self, x: f64, w: f64) {
        let bin = self.axis.find_bin(x);
        self.sumw[bin] += w;
        self.sumw2[bin] += w * w;
    }

    pub fn find_bin(&self, x: f64) -> usize {
        self.axis.find_bin(x)
    }

    pub fn nbins(&self) -> usize {
        self.axis.nbins()
    }

    pub fn edges(&self) -> &[f64] {
        &self.axis.edges
    }

    /// Sum of weights in a bin
    pub fn bin_content(&self, bin: usize) -> f64 {
        self.sumw.get(bin).copied().unwrap_or_default()
    }

    /// Statistical uncertainty of a bin
    pub fn bin_error(&self, bin: usize) -> f64 {
        self.sumw2.get(bin).copied().unwrap_or_default().sqrt()
    }

    /// Sum of weights in all bins excluding under- and overflow
    pub fn integral(&self) -> f64 {
        self.sumw[1..=self.nbins()].iter().sum()
    }
}

/// Two-dimensional histogram
#[derive(Clone, Debug, PartialEq)]
pub struct Hist2D {
    x_axis: Axis,
    y_axis: Axis,
    sumw: Vec<f64>,
    sumw2: Vec<f64>,
}

impl Hist2D {
    pub fn new(x_edges: Vec<f64>, y_edges: Vec<f64>) -> Result<Self> {
        let x_axis = Axis::new(x_edges)?;
        let y_axis = Axis::new(y_edges)?;
        let nbins = (x_axis.nbins() + 2) * (y_axis.nbins() + 2);
        Ok(Self {
            x_axis,
            y_axis,
            sumw: vec![0.; nbins],
            sumw2: vec![0.; nbins],
        })
    }

    pub fn fill(&mut self, x: f64, y: f64) {
        self.fill_weighted(x, y, 1.)
    }

    pub fn fill_weighted(&mut self, x: f64, y: f64, w: f64) {
        let idx = self.idx(self.x_axis.find_bin(x), self.y_axis.find_bin(y));
        self.sumw[idx] += w;
        self.sumw2[idx] += w * w;
    }

    pub fn find_bin(&self, x: f64, y: f64) -> (usize, usize) {
        (self.x_axis.find_bin(x), self.y_axis.find_bin(y))
    }

    pub fn nbins_x(&self) -> usize {
        self.x_axis.nbins()
    }

    pub fn nbins_y(&self) -> usize {
        self.y_axis.nbins()
    }

    pub fn x_edges(&self) -> &[f64] {
        &self.x_axis.edges
    }

    pub fn y_edges(&self) -> &[f64] {
        &self.y_axis.edges
    }

    pub fn bin_content(&self, x_bin: usize, y_bin: usize) -> f64 {
        if x_bin > self.nbins_x() + 1 || y_bin > self.nbins_y() + 1 {
            return 0.;
        }
        self.sumw[self.idx(x_bin, y_bin)]
    }

    pub fn bin_error(&self, x_bin: usize, y_bin: usize) -> f64 {
        if x_bin > self.nbins_x() + 1 || y_bin > self.nbins_y() + 1 {
            return 0.;
        }
        self.sumw2[self.idx(x_bin, y_bin)].sqrt()
    }

    fn idx(&self, x_bin: usize, y_bin: usize) -> usize {
        x_bin * (self.y_axis.nbins() + 2) + y_bin
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Axis {
    edges: Vec<f64>,
}

impl Axis {
    fn new(edges: Vec<f64>) -> Result<Self> {
        check_increasing(&edges, 2)?;
        Ok(Self { edges })
    }

    fn nbins(&self) -> usize {
        self.edges.len() - 1
    }

    fn find_bin(&self, x: f64) -> usize {
        let last = self.edges.len() - 1;
        if x >= self.edges[last] {
            last + 1
        } else {
            // NaN ends up in the underflow
            self.edges.partition_point(|&edge| edge <= x)
        }
    }
}

/// Check that `nodes` has at least `min` finite, strictly increasing entries
pub(crate) fn check_increasing(nodes: &[f64], min: usize) -> Result<()> {
    if nodes.len() < min {
        return Err(Error::TooFewNodes {
            min,
            found: nodes.len(),
        });
    }
    let increasing = nodes.iter().all(|x| x.is_finite())
        && nodes.iter().tuple_windows().all(|(a, b)| a < b);
    if increasing {
        Ok(())
    } else {
        Err(Error::NotIncreasing)
    }
}

fn uniform_edges(nbins: usize, min: f64, max: f64) -> Vec<f64> {
    let width = (max - min) / nbins as f64;
    (0..=nbins).map(|n| min + n as f64 * width).collect()
}
