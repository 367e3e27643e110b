mod band_range;
mod imprint;
mod input;
mod output;
pub(crate) mod settings;
pub(crate) mod wavecar;

pub use band_range::parse_band_ranges;
pub use imprint::{write_footer, write_header};
pub use input::*;
pub use output::{print_strongest_transitions, write_tdm_table};
pub use settings::{Configuration, SpectrumConfig};
pub use wavecar::Wavecar;
