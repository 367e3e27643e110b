use crate::error::Result;
use ndarray::prelude::*;
use num_complex::Complex64;

pub use engine::{check_band_ranges, compute_tdm};
pub use layout::StorageLayout;
pub use transition::{TdmResult, Transition};

mod engine;
mod layout;
mod transition;

/// Read access to a plane-wave wavefunction, restricted to what is needed for the
/// transition dipole moments. All spin, k-point and band indices count from 1.
pub trait WavefunctionProvider {
    /// Returns the eigenvalue of a band in eV.
    fn band_energy(&self, spin: usize, kpoint: usize, band: usize) -> Result<f64>;

    /// Returns the Cartesian vectors G + k of all plane waves at a k-point in 1/Angstrom
    /// (including the factor 2π). The shape is [n_plane_waves, 3].
    fn reciprocal_vectors(&self, kpoint: usize) -> Result<Array2<f64>>;

    /// Returns the plane-wave coefficients of a band. For spin-orbit coupled wavefunctions
    /// the two spinor components are concatenated, so that the vector has twice the
    /// number of plane waves as length.
    fn plane_wave_coeffs(&self, spin: usize, kpoint: usize, band: usize)
        -> Result<Array1<Complex64>>;

    /// Noncollinear (spinor) storage.
    fn is_spin_orbit(&self) -> bool;

    /// Only half of the plane waves are stored (gamma-only version of VASP).
    fn is_gamma_only(&self) -> bool;
}
