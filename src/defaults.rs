// config file
pub const CONFIG_FILE_NAME: &str = "wavtdm.toml";

// WAVECAR
pub const WAVECAR_PATH: &str = "WAVECAR";
pub const LSORBIT: bool = false;
pub const LGAMMA: bool = false;
pub const GAMMA_HALF: &str = "x";

// band and k-point selection, all indices start at 1
pub const ISPIN: usize = 1;
pub const IKPT: usize = 1;
pub const IBANDS: &str = "1";
pub const JBANDS: &str = "2";
// upper limit for band indices in range tokens
pub const MAX_BAND_INDEX: usize = 1_000_000;

// Gaussian broadening of the spectrum in eV
pub const SIGMA: f64 = 0.05;
// number of points of the energy grid
pub const NEDOS: usize = 5000;
// padding of the energy window relative to the range of transition energies
pub const WINDOW_PADDING: f64 = 0.10;
// the energy window is padded by this multiple of sigma if all transitions are degenerate
pub const DEGENERATE_PADDING_SIGMAS: f64 = 10.0;
// height of the stems relative to the maximum of the total spectrum
pub const STEM_HEIGHT: f64 = 0.2;
// figure size in inch and resolution of the saved image
pub const FIGSIZE: (f64, f64) = (4.8, 3.0);
pub const DPI: f64 = 300.0;

// output
pub const TDM_FILE_NAME: &str = "TDM.dat";
pub const SPECTRUM_TXT_NAME: &str = "tdm_spectrum.txt";
pub const SPECTRUM_NPY_NAME: &str = "tdm_spectrum.npy";
pub const PLOT_FILE_NAME: &str = "tdm.png";
// number of transitions that are listed in the log
pub const N_STRONGEST: usize = 10;

// energy differences below this threshold (in eV) are treated as degenerate
pub const DEGENERACY_THRESHOLD: f64 = 1.0e-8;
