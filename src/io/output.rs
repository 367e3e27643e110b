use crate::tdm::{TdmResult, Transition};
use anyhow::{Context, Result};
use log::info;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Text table of all transitions: band indices, energies in eV and the absolute values of
/// the TDM components in Debye.
pub fn tdm_table(result: &TdmResult) -> String {
    let mut txt: String = format!(
        "# {:>5} {:>6} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12}\n",
        "iband", "jband", "E_i", "E_j", "dE", "Tx", "Ty", "Tz"
    );
    for t in result.iter() {
        let [tx, ty, tz] = t.magnitudes();
        txt += &format!(
            "{:>7} {:>6} {:>12.4} {:>12.4} {:>12.4} {:>12.4} {:>12.4} {:>12.4}\n",
            t.iband, t.jband, t.e_i, t.e_j, t.de, tx, ty, tz
        );
    }
    txt
}

pub fn write_tdm_table(result: &TdmResult, filename: &Path) -> Result<()> {
    let mut f = File::create(filename)
        .with_context(|| format!("Unable to create file: {}", filename.display()))?;
    f.write_all(tdm_table(result).as_bytes())
        .with_context(|| format!("Unable to write data at: {}", filename.display()))?;
    info!("{: <25} {}", "TDM written to:", filename.display());
    Ok(())
}

/// Prints the strongest transitions to the log.
pub fn print_strongest_transitions(result: &TdmResult, n: usize) {
    info!("{:^80}", "");
    info!(
        "{: ^80}",
        format!(
            "Strongest transitions at spin {} and k-point {}",
            result.spin, result.kpoint
        )
    );
    info!("{:-^80}", "");
    info!(
        "{:>6} {:>6} {:>10} {:>12} {:>12} {:>12} {:>12}",
        "i", "j", "dE / eV", "|Tx| / D", "|Ty| / D", "|Tz| / D", "total / D"
    );
    info!("{:-^80}", "");
    let strongest: Vec<&Transition> = result.strongest(n);
    for t in strongest.iter() {
        let [tx, ty, tz] = t.magnitudes();
        info!(
            "{:>6} {:>6} {:>10.4} {:>12.4} {:>12.4} {:>12.4} {:>12.4}",
            t.iband,
            t.jband,
            t.de,
            tx,
            ty,
            tz,
            t.total()
        );
    }
    if result.len() > strongest.len() {
        info!(
            "{: >6} further transitions are written to the output file",
            result.len() - strongest.len()
        );
    }
    info!("{:-^80}", "");
}
