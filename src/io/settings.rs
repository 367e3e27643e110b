use crate::defaults::*;
use crate::io::wavecar::GammaHalf;
use serde::{Deserialize, Serialize};

fn default_verbose() -> i8 {
    0
}
fn default_wavecar_path() -> String {
    String::from(WAVECAR_PATH)
}
fn default_lsorbit() -> bool {
    LSORBIT
}
fn default_lgamma() -> bool {
    LGAMMA
}
fn default_gamma_half() -> GammaHalf {
    GAMMA_HALF.parse().unwrap_or(GammaHalf::X)
}
fn default_ispin() -> usize {
    ISPIN
}
fn default_ikpt() -> usize {
    IKPT
}
fn default_ibands() -> Vec<String> {
    vec![String::from(IBANDS)]
}
fn default_jbands() -> Vec<String> {
    vec![String::from(JBANDS)]
}
fn default_tdm_file() -> String {
    String::from(TDM_FILE_NAME)
}
fn default_sigma() -> f64 {
    SIGMA
}
fn default_nedos() -> usize {
    NEDOS
}
fn default_figsize() -> (f64, f64) {
    FIGSIZE
}
fn default_dpi() -> f64 {
    DPI
}
fn default_plot() -> bool {
    true
}
fn default_show() -> bool {
    false
}
fn default_plot_file() -> String {
    String::from(PLOT_FILE_NAME)
}
fn default_spectrum_txt() -> String {
    String::from(SPECTRUM_TXT_NAME)
}
fn default_spectrum_npy() -> String {
    String::from(SPECTRUM_NPY_NAME)
}
fn default_number_of_cores() -> usize {
    1
}
fn default_wavecar_config() -> WavecarConfig {
    let wavecar_config: WavecarConfig = toml::from_str("").unwrap();
    return wavecar_config;
}
fn default_tdm_config() -> TdmConfig {
    let tdm_config: TdmConfig = toml::from_str("").unwrap();
    return tdm_config;
}
fn default_spectrum_config() -> SpectrumConfig {
    let spectrum_config: SpectrumConfig = toml::from_str("").unwrap();
    return spectrum_config;
}
fn default_parallelization_config() -> ParallelizationConfig {
    let parallelization_config: ParallelizationConfig = toml::from_str("").unwrap();
    return parallelization_config;
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Configuration {
    #[serde(default = "default_verbose")]
    pub verbose: i8,
    #[serde(default = "default_wavecar_config")]
    pub wavecar: WavecarConfig,
    #[serde(default = "default_tdm_config")]
    pub tdm: TdmConfig,
    #[serde(default = "default_spectrum_config")]
    pub spectrum: SpectrumConfig,
    #[serde(default = "default_parallelization_config")]
    pub parallelization: ParallelizationConfig,
}

impl Default for Configuration {
    fn default() -> Self {
        toml::from_str("").unwrap()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct WavecarConfig {
    #[serde(default = "default_wavecar_path")]
    pub path: String,
    /// noncollinear WAVECAR (vasp_ncl)
    #[serde(default = "default_lsorbit")]
    pub lsorbit: bool,
    /// gamma-only WAVECAR (vasp_gam)
    #[serde(default = "default_lgamma")]
    pub lgamma: bool,
    #[serde(default = "default_gamma_half")]
    pub gamma_half: GammaHalf,
}

impl WavecarConfig {
    /// The half of the G-sphere that is stored, only meaningful for gamma-only files.
    pub fn gamma_half(&self) -> Option<GammaHalf> {
        if self.lgamma {
            Some(self.gamma_half)
        } else {
            None
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct TdmConfig {
    #[serde(default = "default_ispin")]
    pub ispin: usize,
    #[serde(default = "default_ikpt")]
    pub ikpt: usize,
    /// initial bands in range syntax, e.g. ["1:10", "12"]
    #[serde(default = "default_ibands")]
    pub ibands: Vec<String>,
    /// final bands in range syntax
    #[serde(default = "default_jbands")]
    pub jbands: Vec<String>,
    #[serde(default = "default_tdm_file")]
    pub output: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SpectrumConfig {
    /// width of the Gaussians in eV
    #[serde(default = "default_sigma")]
    pub sigma: f64,
    /// number of points of the energy grid
    #[serde(default = "default_nedos")]
    pub nedos: usize,
    /// width and height of the figure in inch
    #[serde(default = "default_figsize")]
    pub figsize: (f64, f64),
    #[serde(default = "default_dpi")]
    pub dpi: f64,
    #[serde(default = "default_plot")]
    pub plot: bool,
    #[serde(default = "default_show")]
    pub show: bool,
    #[serde(default = "default_plot_file")]
    pub plot_file: String,
    #[serde(default = "default_spectrum_txt")]
    pub txt_file: String,
    #[serde(default = "default_spectrum_npy")]
    pub npy_file: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ParallelizationConfig {
    #[serde(default = "default_number_of_cores")]
    pub number_of_cores: usize,
}
