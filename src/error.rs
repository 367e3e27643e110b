use thiserror::Error;

/// Failures of the TDM calculation and of the data sources it reads from.
#[derive(Debug, Error)]
pub enum TdmError {
    /// The initial and final band sets are empty or overlap.
    #[error("invalid band range: {0}")]
    InvalidBandRange(String),

    /// A malformed token in the band range syntax `N`, `N:M` or `N:M:S`.
    #[error("invalid band range syntax '{token}': {reason}")]
    InvalidRangeSyntax { token: String, reason: String },

    /// A spin, k-point or band index that the wavefunction does not contain.
    #[error("missing band data: {0}")]
    MissingBandData(String),

    /// The length of a coefficient vector does not match the number of plane waves.
    #[error(
        "band {band} has {n_coeffs} plane-wave coefficients, but {n_expected} are expected \
         for {n_pw} reciprocal lattice vectors"
    )]
    CoefficientMismatch {
        band: usize,
        n_coeffs: usize,
        n_expected: usize,
        n_pw: usize,
    },

    /// Two bands with (numerically) identical energies, the TDM is undefined.
    #[error("degenerate transition between band {iband} and band {jband} (dE = {de:e} eV)")]
    DegenerateTransition { iband: usize, jband: usize, de: f64 },

    /// The WAVECAR is corrupt or has a layout that is not supported.
    #[error("invalid WAVECAR: {0}")]
    InvalidWavecar(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TdmError>;
