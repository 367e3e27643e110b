use crate::constants::{AUTDEBYE, AUTOA, RYTOEV};
use crate::defaults::DEGENERACY_THRESHOLD;
use crate::error::{Result, TdmError};
use crate::tdm::{StorageLayout, TdmResult, Transition, WavefunctionProvider};
use itertools::iproduct;
use log::debug;
use ndarray::prelude::*;
use ndarray::Zip;
use num_complex::Complex64;
use rayon::prelude::*;

/// Only transitions from lower to higher bands are computed, so every final band has to
/// lie above all initial bands. Band indices start at 1.
pub fn check_band_ranges(ibands: &[usize], jbands: &[usize]) -> Result<()> {
    let (i_max, j_min): (usize, usize) = match (ibands.iter().max(), jbands.iter().min()) {
        (Some(i_max), Some(j_min)) => (*i_max, *j_min),
        _ => {
            return Err(TdmError::InvalidBandRange(String::from(
                "the initial and the final band set must not be empty",
            )))
        }
    };
    if ibands.contains(&0) {
        return Err(TdmError::InvalidBandRange(String::from(
            "band indices start at 1",
        )));
    }
    if j_min <= i_max {
        return Err(TdmError::InvalidBandRange(format!(
            "the lowest final band ({}) has to be above the highest initial band ({})",
            j_min, i_max
        )));
    }
    Ok(())
}

/// Computes the transition dipole moments between all bands in `ibands` and all bands in
/// `jbands` at spin channel `spin` and k-point `kpoint`.
///
/// The momentum matrix element <i|p|j> in the plane-wave basis is the sum over the
/// coefficients weighted by G + k. It is converted to the dipole matrix element with
/// <i|r|j> = i hbar <i|p|j> / (m (E_j - E_i)), which in atomic units (energies in
/// Rydberg) reads i <i|p|j> / (dE / 2Ry). The result is given in Debye.
pub fn compute_tdm<P: WavefunctionProvider + ?Sized>(
    provider: &P,
    ibands: &[usize],
    jbands: &[usize],
    spin: usize,
    kpoint: usize,
) -> Result<TdmResult> {
    check_band_ranges(ibands, jbands)?;
    let layout: StorageLayout = StorageLayout::of(provider);
    let n_i: usize = ibands.len();
    let n_j: usize = jbands.len();
    debug!(
        "TDM between {} initial and {} final bands, storage layout: {:?}",
        n_i, n_j, layout
    );

    // band energies, broadcast on the (i, j) mesh
    let e_i: Array1<f64> = band_energies(provider, ibands, spin, kpoint)?;
    let e_j: Array1<f64> = band_energies(provider, jbands, spin, kpoint)?;
    let ex: Array2<f64> = Array2::from_shape_fn((n_i, n_j), |(i, _)| e_i[i]);
    let ey: Array2<f64> = Array2::from_shape_fn((n_i, n_j), |(_, j)| e_j[j]);
    let de: Array2<f64> = &ey - &ex;
    for ((i, j), de_ij) in de.indexed_iter() {
        if de_ij.abs() < DEGENERACY_THRESHOLD {
            return Err(TdmError::DegenerateTransition {
                iband: ibands[i],
                jband: jbands[j],
                de: *de_ij,
            });
        }
    }

    let gvectors: Array2<f64> = provider.reciprocal_vectors(kpoint)?;
    let n_pw: usize = gvectors.nrows();
    let n_coeffs: usize = layout.n_coeffs(n_pw);
    let cg_i: Array2<Complex64> =
        stack_coefficients(provider, ibands, spin, kpoint, n_coeffs, n_pw)?;
    let cg_j: Array2<Complex64> =
        stack_coefficients(provider, jbands, spin, kpoint, n_coeffs, n_pw)?;

    // the Cartesian directions are independent of each other
    let raw: Vec<Array2<Complex64>> = (0..3)
        .into_par_iter()
        .map(|d| layout.contract(cg_i.view(), cg_j.view(), gvectors.column(d)))
        .collect();

    let tdm: Vec<Array2<Complex64>> = raw
        .iter()
        .map(|raw_d| {
            let mut tdm_d: Array2<Complex64> = Array2::zeros((n_i, n_j));
            Zip::from(&mut tdm_d)
                .and(raw_d)
                .and(&de)
                .for_each(|t, &r, &de_ij| {
                    *t = Complex64::i() / (de_ij / (2.0 * RYTOEV)) * r * AUTOA * AUTDEBYE;
                });
            tdm_d
        })
        .collect();

    let transitions: Vec<Transition> = iproduct!(0..n_i, 0..n_j)
        .map(|(i, j)| Transition {
            iband: ibands[i],
            jband: jbands[j],
            e_i: ex[[i, j]],
            e_j: ey[[i, j]],
            de: de[[i, j]],
            tdm: [tdm[0][[i, j]], tdm[1][[i, j]], tdm[2][[i, j]]],
        })
        .collect();

    Ok(TdmResult {
        spin,
        kpoint,
        transitions,
    })
}

fn band_energies<P: WavefunctionProvider + ?Sized>(
    provider: &P,
    bands: &[usize],
    spin: usize,
    kpoint: usize,
) -> Result<Array1<f64>> {
    bands
        .iter()
        .map(|&band| provider.band_energy(spin, kpoint, band))
        .collect::<Result<Vec<f64>>>()
        .map(Array1::from)
}

/// Stacks the coefficient vectors of the bands as rows of a matrix.
fn stack_coefficients<P: WavefunctionProvider + ?Sized>(
    provider: &P,
    bands: &[usize],
    spin: usize,
    kpoint: usize,
    n_coeffs: usize,
    n_pw: usize,
) -> Result<Array2<Complex64>> {
    let mut cg: Array2<Complex64> = Array2::zeros((bands.len(), n_coeffs));
    for (mut row, &band) in cg.outer_iter_mut().zip(bands.iter()) {
        let coeffs: Array1<Complex64> = provider.plane_wave_coeffs(spin, kpoint, band)?;
        if coeffs.len() != n_coeffs {
            return Err(TdmError::CoefficientMismatch {
                band,
                n_coeffs: coeffs.len(),
                n_expected: n_coeffs,
                n_pw,
            });
        }
        row.assign(&coeffs);
    }
    Ok(cg)
}
