use crate::tdm::WavefunctionProvider;
use ndarray::prelude::*;
use num_complex::Complex64;

/// Storage layout of the plane-wave coefficients. The layout is fixed for a whole
/// wavefunction file, it is therefore determined once per calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageLayout {
    /// One complex coefficient per plane wave.
    Standard,
    /// Two spinor components per band, stored one after another.
    SpinOrbit,
    /// Gamma-point only: c(-G) = c(G)* is implied and only one half of the G-sphere is stored.
    GammaHalf,
}

impl StorageLayout {
    /// Spin-orbit coupling takes precedence, a noncollinear calculation is never gamma-only.
    pub fn from_flags(spin_orbit: bool, gamma_only: bool) -> Self {
        if spin_orbit {
            StorageLayout::SpinOrbit
        } else if gamma_only {
            StorageLayout::GammaHalf
        } else {
            StorageLayout::Standard
        }
    }

    pub fn of<P: WavefunctionProvider + ?Sized>(provider: &P) -> Self {
        Self::from_flags(provider.is_spin_orbit(), provider.is_gamma_only())
    }

    /// Number of coefficients of a single band for `n_pw` plane waves.
    pub fn n_coeffs(&self, n_pw: usize) -> usize {
        match self {
            StorageLayout::SpinOrbit => 2 * n_pw,
            _ => n_pw,
        }
    }

    /// Computes the matrix elements sum_G C_i(G) g(G) C_j(G)^* between all bands of the
    /// two coefficient matrices (rows are bands, columns are coefficients) for one
    /// Cartesian component `g` of the reciprocal lattice vectors.
    pub fn contract(
        &self,
        cg_i: ArrayView2<Complex64>,
        cg_j: ArrayView2<Complex64>,
        g: ArrayView1<f64>,
    ) -> Array2<Complex64> {
        let g: Array1<Complex64> = g.mapv(|x| Complex64::new(x, 0.0));

        match self {
            StorageLayout::Standard => weighted_overlap(cg_i, cg_j, g.view()),
            StorageLayout::SpinOrbit => {
                // spin up and spin down block share the same plane waves
                let n_pw: usize = g.len();
                weighted_overlap(
                    cg_i.slice(s![.., ..n_pw]),
                    cg_j.slice(s![.., ..n_pw]),
                    g.view(),
                ) + weighted_overlap(
                    cg_i.slice(s![.., n_pw..]),
                    cg_j.slice(s![.., n_pw..]),
                    g.view(),
                )
            }
            StorageLayout::GammaHalf => {
                let direct: Array2<Complex64> = weighted_overlap(cg_i, cg_j, g.view());
                // contribution of the -G half of the sphere
                let mirrored: Array2<Complex64> =
                    (&cg_i.mapv(|c| c.conj()) * &g).dot(&cg_j.t());
                (direct - mirrored).mapv(|v| 0.5 * v)
            }
        }
    }
}

/// (C_i * g) . C_j^H
fn weighted_overlap(
    cg_i: ArrayView2<Complex64>,
    cg_j: ArrayView2<Complex64>,
    g: ArrayView1<Complex64>,
) -> Array2<Complex64> {
    (&cg_i * &g).dot(&cg_j.mapv(|c| c.conj()).t())
}
