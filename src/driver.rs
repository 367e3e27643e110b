use crate::defaults::N_STRONGEST;
use crate::io::{
    parse_band_ranges, print_strongest_transitions, write_tdm_table, Configuration, Wavecar,
};
use crate::spectrum::{
    plot_spectrum, BroadenedSpectrum, GaussianBroadening, GaussianBroadeningBuilder,
};
use crate::tdm::{check_band_ranges, compute_tdm, TdmResult};
use crate::utils::Timer;
use anyhow::{anyhow, Context, Result};
use log::info;
use ndarray::prelude::*;
use std::path::Path;

/// Reads the WAVECAR, computes the TDM between the requested bands and writes the table,
/// the broadened spectrum and the plot.
pub fn run(config: &Configuration) -> Result<TdmResult> {
    let ibands: Vec<usize> =
        parse_band_ranges(&config.tdm.ibands).context("Invalid initial bands")?;
    let jbands: Vec<usize> =
        parse_band_ranges(&config.tdm.jbands).context("Invalid final bands")?;
    check_band_ranges(&ibands, &jbands)?;

    let timer: Timer = Timer::start();
    let path: &Path = Path::new(&config.wavecar.path);
    let wavecar: Wavecar = Wavecar::from_file(
        path,
        config.wavecar.lsorbit,
        config.wavecar.gamma_half(),
    )
    .with_context(|| format!("Unable to read WAVECAR {}", path.display()))?;
    wavecar.log_summary();

    info!("{: <25} {:?}", "initial bands:", ibands);
    info!("{: <25} {:?}", "final bands:", jbands);
    let result: TdmResult = compute_tdm(
        &wavecar,
        &ibands,
        &jbands,
        config.tdm.ispin,
        config.tdm.ikpt,
    )?;
    info!("{}", timer);

    print_strongest_transitions(&result, N_STRONGEST);
    write_tdm_table(&result, Path::new(&config.tdm.output))?;

    let broadening: GaussianBroadening = GaussianBroadeningBuilder::default()
        .sigma(config.spectrum.sigma)
        .n_points(config.spectrum.nedos)
        .build()
        .map_err(|err| anyhow!("Invalid broadening: {}", err))?;
    let de: Array1<f64> = result.energy_differences();
    let spectrum: BroadenedSpectrum = broadening.apply(de.view(), result.magnitudes().view())?;
    spectrum.to_txt(Path::new(&config.spectrum.txt_file))?;
    spectrum.to_npy(Path::new(&config.spectrum.npy_file))?;
    info!("{: <25} {}", "Spectrum written to:", config.spectrum.txt_file);

    if config.spectrum.plot {
        let totals: Array1<f64> = result.iter().map(|t| t.total()).collect();
        plot_spectrum(&spectrum, de.view(), totals.view(), &config.spectrum)?;
    }
    Ok(result)
}
