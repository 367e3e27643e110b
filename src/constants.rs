use std::f64::consts::PI;

// Conversion factors as they are defined in the VASP source (constant.inc), so that
// the plane-wave cutoff sphere is reproduced exactly.
/// Bohr radius in Angstrom.
pub const AUTOA: f64 = 0.529177249;
/// Rydberg in eV.
pub const RYTOEV: f64 = 13.605826;
/// Dipole moment: atomic units (e * bohr) to Debye.
pub const AUTDEBYE: f64 = 2.541746;
/// hbar^2 / (2 m_e) in eV * Angstrom^2.
pub const HSQDTM: f64 = RYTOEV * AUTOA * AUTOA;
pub const TPI: f64 = 2.0 * PI;

// Precision tags of the first WAVECAR record.
pub const RTAG_SINGLE: i64 = 45200;
pub const RTAG_DOUBLE: i64 = 45210;
pub const RTAG_VASP5_SINGLE: i64 = 53300;
pub const RTAG_VASP5_DOUBLE: i64 = 53310;
