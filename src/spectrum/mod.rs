use crate::defaults::{DEGENERATE_PADDING_SIGMAS, NEDOS, SIGMA, WINDOW_PADDING};
use anyhow::{anyhow, Context, Result};
use derive_builder::Builder;
use ndarray::prelude::*;
use ndarray_npy::write_npy;
use ndarray_stats::QuantileExt;
use std::f64::consts::PI;
use std::fs::File;
use std::io::Write;
use std::path::Path;

pub use plot::plot_spectrum;

mod plot;

/// Broadening of discrete transitions by normalized Gaussians on an even energy grid.
/// An instance can be created with the associated Builder type:
/// ```
/// GaussianBroadeningBuilder::default()
///       .sigma(0.05)
///       .n_points(5000)
///       .build()
///       .unwrap();
/// ```
#[derive(Builder, Clone, Debug)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct GaussianBroadening {
    /// width of the Gaussians in eV
    #[builder(default = "SIGMA")]
    pub sigma: f64,
    /// number of points of the energy grid
    #[builder(default = "NEDOS")]
    pub n_points: usize,
}

impl GaussianBroadeningBuilder {
    fn validate(&self) -> std::result::Result<(), String> {
        if let Some(sigma) = self.sigma {
            if !(sigma > 0.0) {
                return Err(format!("sigma has to be positive, got {}", sigma));
            }
        }
        if let Some(n_points) = self.n_points {
            if n_points < 2 {
                return Err(format!("at least two grid points are needed, got {}", n_points));
            }
        }
        Ok(())
    }
}

/// Broadened spectrum of the three Cartesian components and their sum on an energy grid.
#[derive(Clone, Debug)]
pub struct BroadenedSpectrum {
    pub energies: Array1<f64>,
    pub x: Array1<f64>,
    pub y: Array1<f64>,
    pub z: Array1<f64>,
    pub total: Array1<f64>,
}

impl GaussianBroadening {
    /// Energy window of the spectrum: the range of transition energies padded by 10 % on
    /// both sides. If all transitions have the same energy the window is padded by a
    /// multiple of sigma instead.
    pub fn energy_grid(&self, de: ArrayView1<f64>) -> Result<Array1<f64>> {
        let e_min: f64 = *de
            .min()
            .map_err(|err| anyhow!("no energy window for the transitions: {}", err))?;
        let e_max: f64 = *de
            .max()
            .map_err(|err| anyhow!("no energy window for the transitions: {}", err))?;
        let range: f64 = e_max - e_min;
        let padding: f64 = if range > 0.0 {
            WINDOW_PADDING * range
        } else {
            DEGENERATE_PADDING_SIGMAS * self.sigma
        };
        Ok(Array1::linspace(
            e_min - padding,
            e_max + padding,
            self.n_points,
        ))
    }

    /// Gaussian of width sigma centered at the transition energy `de`, evaluated at `e0`.
    /// The exponent is scaled by sigma^2 (not 2 sigma^2).
    pub fn kernel(&self, de: f64, e0: f64) -> f64 {
        (-(de - e0).powi(2) / self.sigma.powi(2)).exp() / (self.sigma * (2.0 * PI).sqrt())
    }

    /// Every transition contributes a Gaussian weighted by the absolute value of the
    /// respective TDM component. `magnitudes` has the shape [n_transitions, 3].
    pub fn apply(
        &self,
        de: ArrayView1<f64>,
        magnitudes: ArrayView2<f64>,
    ) -> Result<BroadenedSpectrum> {
        if magnitudes.dim() != (de.len(), 3) {
            return Err(anyhow!(
                "{} transition energies but TDM magnitudes of shape {:?}",
                de.len(),
                magnitudes.dim()
            ));
        }
        let energies: Array1<f64> = self.energy_grid(de)?;
        // [n_transitions, n_points]
        let weights: Array2<f64> =
            Array2::from_shape_fn((de.len(), energies.len()), |(k, g)| {
                self.kernel(de[k], energies[g])
            });
        // [3, n_points]
        let components: Array2<f64> = magnitudes.t().dot(&weights);
        let total: Array1<f64> = components.sum_axis(Axis(0));

        Ok(BroadenedSpectrum {
            energies,
            x: components.row(0).to_owned(),
            y: components.row(1).to_owned(),
            z: components.row(2).to_owned(),
            total,
        })
    }
}

impl BroadenedSpectrum {
    pub fn len(&self) -> usize {
        self.energies.len()
    }

    /// Maximum of the total spectrum.
    pub fn peak(&self) -> f64 {
        self.total.max().map(|v| *v).unwrap_or(0.0)
    }

    /// Columns: energy, x, y, z, total.
    pub fn to_array(&self) -> Array2<f64> {
        let mut data: Array2<f64> = Array2::zeros([self.len(), 0]);
        for column in [&self.energies, &self.x, &self.y, &self.z, &self.total] {
            data.push(Axis(1), column.view()).unwrap();
        }
        data
    }

    /// Write the broadened spectrum to a .npy file.
    pub fn to_npy(&self, filename: &Path) -> Result<()> {
        write_npy(filename, &self.to_array())
            .with_context(|| format!("Unable to write spectrum to {}", filename.display()))
    }

    /// Write the broadened spectrum to a text file.
    pub fn to_txt(&self, filename: &Path) -> Result<()> {
        let mut txt: String = "# Broadened TDM spectrum\n".to_owned();
        txt += &format!(
            "# {:>14} {:>16} {:>16} {:>16} {:>16}\n",
            "energy / eV", "x / Debye", "y / Debye", "z / Debye", "total / Debye"
        );
        for row in self.to_array().outer_iter() {
            txt += &format!(
                "{:16.8} {:16.8e} {:16.8e} {:16.8e} {:16.8e}\n",
                row[0], row[1], row[2], row[3], row[4]
            );
        }
        let mut f = File::create(filename)
            .with_context(|| format!("Unable to create file: {}", filename.display()))?;
        f.write_all(txt.as_bytes())
            .with_context(|| format!("Unable to write data at: {}", filename.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::temporary_path;
    use approx::assert_relative_eq;

    fn trapezoid(x: ArrayView1<f64>, y: ArrayView1<f64>) -> f64 {
        x.windows(2)
            .into_iter()
            .zip(y.windows(2))
            .map(|(xs, ys)| 0.5 * (xs[1] - xs[0]) * (ys[0] + ys[1]))
            .sum()
    }

    fn broadening(sigma: f64, n_points: usize) -> GaussianBroadening {
        GaussianBroadeningBuilder::default()
            .sigma(sigma)
            .n_points(n_points)
            .build()
            .unwrap()
    }

    #[test]
    fn builder_defaults_and_validation() {
        let default = GaussianBroadeningBuilder::default().build().unwrap();
        assert_eq!(default.sigma, SIGMA);
        assert_eq!(default.n_points, NEDOS);
        assert!(GaussianBroadeningBuilder::default().sigma(0.0).build().is_err());
        assert!(GaussianBroadeningBuilder::default().n_points(1).build().is_err());
    }

    #[test]
    fn energy_window_is_padded() {
        let grid = broadening(0.05, 11)
            .energy_grid(array![1.0, 3.0, 2.0].view())
            .unwrap();
        assert_eq!(grid.len(), 11);
        assert_relative_eq!(grid[0], 0.8, epsilon = 1e-12);
        assert_relative_eq!(grid[10], 3.2, epsilon = 1e-12);
        assert_relative_eq!(grid[1] - grid[0], 0.24, epsilon = 1e-12);
    }

    #[test]
    fn single_transition_is_normalized() {
        let gauss = broadening(0.05, 4001);
        let spectrum = gauss
            .apply(array![0.5].view(), array![[1.0, 0.0, 0.0]].view())
            .unwrap();
        // window of 10 sigma on both sides
        assert_relative_eq!(spectrum.energies[0], 0.0, epsilon = 1e-12);
        assert_relative_eq!(spectrum.energies[4000], 1.0, epsilon = 1e-12);
        // exp(-x^2/sigma^2) integrates to sigma sqrt(pi), the kernel therefore to 1/sqrt(2)
        let integral: f64 = trapezoid(spectrum.energies.view(), spectrum.x.view());
        assert_relative_eq!(integral, std::f64::consts::FRAC_1_SQRT_2, epsilon = 1e-8);
        assert!(spectrum.y.iter().all(|v| *v == 0.0));
        assert_eq!(spectrum.x, spectrum.total);
        // maximum at the transition energy
        assert_eq!(spectrum.total.argmax().unwrap(), 2000);
        assert_relative_eq!(spectrum.peak(), gauss.kernel(0.5, 0.5), epsilon = 1e-12);
    }

    #[test]
    fn components_are_weighted_and_summed() {
        let gauss = broadening(0.1, 501);
        let de = array![1.0, 2.0];
        let magnitudes = array![[2.0, 0.5, 0.0], [1.0, 0.0, 3.0]];
        let spectrum = gauss.apply(de.view(), magnitudes.view()).unwrap();
        for (g, e0) in spectrum.energies.iter().enumerate() {
            let k1: f64 = gauss.kernel(1.0, *e0);
            let k2: f64 = gauss.kernel(2.0, *e0);
            assert_relative_eq!(spectrum.x[g], 2.0 * k1 + k2, epsilon = 1e-12);
            assert_relative_eq!(spectrum.y[g], 0.5 * k1, epsilon = 1e-12);
            assert_relative_eq!(spectrum.z[g], 3.0 * k2, epsilon = 1e-12);
            assert_relative_eq!(
                spectrum.total[g],
                spectrum.x[g] + spectrum.y[g] + spectrum.z[g],
                epsilon = 1e-12
            );
        }
        assert!(gauss.apply(de.view(), array![[1.0, 0.0, 0.0]].view()).is_err());
        let empty = gauss.apply(
            Array1::<f64>::zeros(0).view(),
            Array2::<f64>::zeros((0, 3)).view(),
        );
        assert!(empty.is_err());
    }

    #[test]
    fn spectrum_files() {
        let spectrum = broadening(0.1, 50)
            .apply(array![1.0, 2.0].view(), array![[1.0, 1.0, 1.0], [2.0, 0.0, 0.0]].view())
            .unwrap();
        assert_eq!(spectrum.to_array().dim(), (50, 5));

        let txt = temporary_path("spectrum.txt");
        spectrum.to_txt(&txt).unwrap();
        let content = std::fs::read_to_string(&txt).unwrap();
        assert_eq!(content.lines().count(), 52);
        std::fs::remove_file(&txt).unwrap();

        let npy = temporary_path("spectrum.npy");
        spectrum.to_npy(&npy).unwrap();
        let data: Array2<f64> = ndarray_npy::read_npy(&npy).unwrap();
        assert_eq!(data, spectrum.to_array());
        std::fs::remove_file(&npy).unwrap();
    }
}
