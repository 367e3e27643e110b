use crate::defaults::STEM_HEIGHT;
use crate::io::SpectrumConfig;
use crate::spectrum::BroadenedSpectrum;
use anyhow::{anyhow, Result};
use gnuplot::{AxesCommon, Caption, Figure, LineWidth};
use log::info;
use ndarray::prelude::*;
use ndarray_stats::QuantileExt;
use std::path::Path;

/// Heights of the stems that mark the individual transitions. The strongest transition
/// reaches `STEM_HEIGHT` times the maximum of the total spectrum.
pub fn stem_heights(totals: ArrayView1<f64>, peak: f64) -> Array1<f64> {
    let largest: f64 = totals.max().map(|v| *v).unwrap_or(0.0);
    if largest > 0.0 {
        totals.mapv(|t| t / largest * STEM_HEIGHT * peak)
    } else {
        Array1::zeros(totals.len())
    }
}

/// Draws the x, y, z and total spectrum together with a stem at every transition energy
/// and saves the figure as png. `de` and `totals` are the energies and the total TDM of the
/// transitions.
pub fn plot_spectrum(
    spectrum: &BroadenedSpectrum,
    de: ArrayView1<f64>,
    totals: ArrayView1<f64>,
    config: &SpectrumConfig,
) -> Result<()> {
    let heights: Array1<f64> = stem_heights(totals, spectrum.peak());
    let (width, height) = config.figsize;
    let width_px: u32 = (width * config.dpi).round() as u32;
    let height_px: u32 = (height * config.dpi).round() as u32;

    let mut fg = Figure::new();
    {
        let axes = fg.axes2d();
        axes.set_x_label("Energy [eV]", &[])
            .set_y_label("TDM [Debye]", &[])
            .set_x_range(
                gnuplot::Fix(spectrum.energies[0]),
                gnuplot::Fix(spectrum.energies[spectrum.len() - 1]),
            )
            .set_y_range(gnuplot::Fix(0.0), gnuplot::Auto);
        for (component, label) in [(&spectrum.x, "x"), (&spectrum.y, "y"), (&spectrum.z, "z")] {
            axes.lines(
                spectrum.energies.iter(),
                component.iter(),
                &[Caption(label), LineWidth(1.0)],
            );
        }
        axes.lines(
            spectrum.energies.iter(),
            spectrum.total.iter(),
            &[Caption("total"), LineWidth(1.5)],
        );
        for (e, h) in de.iter().zip(heights.iter()) {
            axes.lines(&[*e, *e], &[0.0, *h], &[LineWidth(0.5)]);
        }
    }

    let filename: &Path = Path::new(&config.plot_file);
    fg.save_to_png(filename, width_px, height_px)
        .map_err(|err| anyhow!("Unable to plot the spectrum with gnuplot: {:?}", err))?;
    info!("{: <25} {}", "Spectrum plotted to:", filename.display());
    if config.show {
        fg.show_and_keep_running()
            .map_err(|err| anyhow!("Unable to show the spectrum: {:?}", err))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strongest_stem_is_scaled_to_peak() {
        let heights = stem_heights(array![1.0, 4.0, 2.0].view(), 10.0);
        assert!(heights.abs_diff_eq(&array![0.5, 2.0, 1.0], 1e-12));
    }

    #[test]
    fn dark_transitions_have_no_stems() {
        let heights = stem_heights(array![0.0, 0.0].view(), 3.0);
        assert_eq!(heights, array![0.0, 0.0]);
    }
}
