use ndarray::prelude::*;
use num_complex::Complex64;

/// A single optical transition from band `iband` to band `jband`. Energies are in eV,
/// the transition dipole moment is in Debye.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub iband: usize,
    pub jband: usize,
    pub e_i: f64,
    pub e_j: f64,
    pub de: f64,
    pub tdm: [Complex64; 3],
}

impl Transition {
    /// Absolute values of the x, y and z component.
    pub fn magnitudes(&self) -> [f64; 3] {
        [self.tdm[0].norm(), self.tdm[1].norm(), self.tdm[2].norm()]
    }

    /// Sum of the absolute values of the three components.
    pub fn total(&self) -> f64 {
        self.magnitudes().iter().sum()
    }
}

/// All transitions between two band sets at one spin channel and k-point. The
/// transitions are ordered row-major: initial band outer, final band inner, both in
/// the order in which the bands were requested.
#[derive(Debug, Clone)]
pub struct TdmResult {
    pub spin: usize,
    pub kpoint: usize,
    pub transitions: Vec<Transition>,
}

impl TdmResult {
    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Transition> {
        self.transitions.iter()
    }

    pub fn energy_differences(&self) -> Array1<f64> {
        self.iter().map(|t| t.de).collect()
    }

    /// Absolute values of the TDM components, shape [n_transitions, 3].
    pub fn magnitudes(&self) -> Array2<f64> {
        let mut magnitudes: Array2<f64> = Array2::zeros((self.len(), 3));
        for (mut row, transition) in magnitudes.outer_iter_mut().zip(self.iter()) {
            row.assign(&aview1(&transition.magnitudes()));
        }
        magnitudes
    }

    /// Returns the `n` transitions with the largest total TDM, strongest first.
    pub fn strongest(&self, n: usize) -> Vec<&Transition> {
        let mut sorted: Vec<&Transition> = self.iter().collect();
        sorted.sort_by(|a, b| b.total().total_cmp(&a.total()));
        sorted.truncate(n);
        sorted
    }
}
