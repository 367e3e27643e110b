use crate::io::wavecar::GammaHalf;
use crate::io::Configuration;
use anyhow::{Context, Result};
use clap::ArgMatches;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Reads the configuration file. If it does not exist in the directory the program
/// initializes the default settings and writes the configuration file, so that the
/// user can see all the used options.
pub fn read_input(config_file: &str) -> Result<Configuration> {
    let config_file_path: &Path = Path::new(config_file);
    let config_string: String = if config_file_path.exists() {
        fs::read_to_string(config_file_path)
            .with_context(|| format!("Unable to read config file {}", config_file))?
    } else {
        String::from("")
    };
    let config: Configuration = toml::from_str(&config_string)
        .with_context(|| format!("Unable to parse config file {}", config_file))?;
    if !config_file_path.exists() {
        let config_string: String =
            toml::to_string(&config).context("Unable to serialize the configuration")?;
        fs::write(config_file_path, config_string)
            .with_context(|| format!("Unable to write config file {}", config_file))?;
    }
    Ok(config)
}

fn parse_value<T>(matches: &ArgMatches, name: &str) -> Result<Option<T>>
where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    match matches.value_of(name) {
        Some(value) => value
            .parse::<T>()
            .map(Some)
            .map_err(|err| anyhow::anyhow!("invalid value '{}' for --{}: {}", value, name, err)),
        None => Ok(None),
    }
}

/// Options given on the command line take precedence over the configuration file.
pub fn apply_arguments(config: &mut Configuration, matches: &ArgMatches) -> Result<()> {
    if let Some(path) = matches.value_of("wavecar") {
        config.wavecar.path = String::from(path);
    }
    if matches.is_present("lsorbit") {
        config.wavecar.lsorbit = true;
    }
    if matches.is_present("lgamma") {
        config.wavecar.lgamma = true;
    }
    if let Some(gamma_half) = parse_value::<GammaHalf>(matches, "gamma-half")? {
        config.wavecar.gamma_half = gamma_half;
    }
    if let Some(ispin) = parse_value::<usize>(matches, "ispin")? {
        config.tdm.ispin = ispin;
    }
    if let Some(ikpt) = parse_value::<usize>(matches, "ikpt")? {
        config.tdm.ikpt = ikpt;
    }
    if let Some(ibands) = matches.values_of("ibands") {
        config.tdm.ibands = ibands.map(String::from).collect();
    }
    if let Some(jbands) = matches.values_of("jbands") {
        config.tdm.jbands = jbands.map(String::from).collect();
    }
    if let Some(output) = matches.value_of("output") {
        config.tdm.output = String::from(output);
    }
    if let Some(sigma) = parse_value::<f64>(matches, "sigma")? {
        config.spectrum.sigma = sigma;
    }
    if let Some(nedos) = parse_value::<usize>(matches, "nedos")? {
        config.spectrum.nedos = nedos;
    }
    if let Some(figsize) = matches.values_of("figsize") {
        let sizes: Vec<f64> = figsize
            .map(|s| s.parse::<f64>())
            .collect::<std::result::Result<Vec<f64>, _>>()
            .context("invalid value for --figsize")?;
        if let [width, height] = sizes.as_slice() {
            config.spectrum.figsize = (*width, *height);
        }
    }
    if matches.is_present("show") {
        config.spectrum.show = true;
    }
    if matches.is_present("no-plot") {
        config.spectrum.plot = false;
    }
    config.verbose += matches.occurrences_of("verbose") as i8;
    config.verbose -= matches.occurrences_of("quiet") as i8;
    check_config(config)
}

/// Checks the values that cannot be checked by the types alone.
pub fn check_config(config: &Configuration) -> Result<()> {
    if config.tdm.ispin < 1 || config.tdm.ikpt < 1 {
        anyhow::bail!("spin and k-point indices start at 1");
    }
    if config.spectrum.sigma <= 0.0 {
        anyhow::bail!("the Gaussian width sigma has to be positive");
    }
    if config.spectrum.nedos < 2 {
        anyhow::bail!("the energy grid needs at least two points");
    }
    if config.wavecar.lsorbit && config.wavecar.lgamma {
        anyhow::bail!("a WAVECAR can not be noncollinear and gamma-only at the same time");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli;
    use crate::utils::temporary_path;

    fn parse(args: &[&str]) -> Result<Configuration> {
        let matches = cli().try_get_matches_from(args)?;
        let mut config = Configuration::default();
        apply_arguments(&mut config, &matches)?;
        Ok(config)
    }

    #[test]
    fn command_line_overrides() {
        let config = parse(&[
            "wavtdm", "-w", "W1", "-s", "2", "-k", "3", "-i", "1:4", "6", "-j", "10:12",
            "--lgamma", "--gamma-half", "z", "--sigma", "0.2", "--nedos", "100", "--figsize",
            "6", "4", "--no-plot", "-vv",
        ])
        .unwrap();
        assert_eq!(config.wavecar.path, "W1");
        assert_eq!(config.tdm.ispin, 2);
        assert_eq!(config.tdm.ikpt, 3);
        assert_eq!(config.tdm.ibands, vec!["1:4", "6"]);
        assert_eq!(config.tdm.jbands, vec!["10:12"]);
        assert_eq!(config.wavecar.gamma_half(), Some(GammaHalf::Z));
        assert_eq!(config.spectrum.sigma, 0.2);
        assert_eq!(config.spectrum.nedos, 100);
        assert_eq!(config.spectrum.figsize, (6.0, 4.0));
        assert!(!config.spectrum.plot);
        assert_eq!(config.verbose, 2);
    }

    #[test]
    fn invalid_arguments() {
        assert!(parse(&["wavtdm", "--sigma", "-1"]).is_err());
        assert!(parse(&["wavtdm", "--ispin", "two"]).is_err());
        assert!(parse(&["wavtdm", "--gamma-half", "y"]).is_err());
        assert!(parse(&["wavtdm", "--lsorbit", "--lgamma"]).is_err());
    }

    #[test]
    fn missing_config_file_is_written() {
        let path = temporary_path("wavtdm.toml");
        let filename: &str = path.to_str().unwrap();
        let config = read_input(filename).unwrap();
        assert!(path.exists());
        let again = read_input(filename).unwrap();
        assert_eq!(config.tdm.ibands, again.tdm.ibands);
        fs::remove_file(&path).unwrap();
    }
}
