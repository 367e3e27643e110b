use crate::constants::*;
use crate::error::{Result, TdmError};
use crate::tdm::WavefunctionProvider;
use itertools::iproduct;
use log::{debug, info};
use nalgebra::{Matrix3, Vector3};
use ndarray::prelude::*;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// The axis along which the gamma-only version of VASP halves the G-sphere. This depends
/// on the compile flags of VASP (`-DwNGZhalf` => z, `-DwNGXhalf` => x).
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GammaHalf {
    X,
    Z,
}

impl FromStr for GammaHalf {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "x" => Ok(GammaHalf::X),
            "z" => Ok(GammaHalf::Z),
            other => Err(format!("gamma half axis must be 'x' or 'z', got '{}'", other)),
        }
    }
}

impl fmt::Display for GammaHalf {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GammaHalf::X => write!(f, "x"),
            GammaHalf::Z => write!(f, "z"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Precision {
    Single,
    Double,
}

impl Precision {
    fn from_tag(rtag: i64) -> Result<Self> {
        match rtag {
            RTAG_SINGLE => Ok(Precision::Single),
            RTAG_DOUBLE => Ok(Precision::Double),
            RTAG_VASP5_SINGLE | RTAG_VASP5_DOUBLE => Err(TdmError::InvalidWavecar(format!(
                "the VASP5 WAVECAR format (tag {}) is not supported",
                rtag
            ))),
            _ => Err(TdmError::InvalidWavecar(format!(
                "unknown precision tag {}",
                rtag
            ))),
        }
    }

    fn bytes_per_coefficient(&self) -> usize {
        match self {
            Precision::Single => 8,
            Precision::Double => 16,
        }
    }
}

/// Reader for the binary WAVECAR file of VASP. The header, the band energies and the
/// occupations are read when the file is opened, the plane-wave coefficients are read on
/// demand.
///
/// The file is a sequence of records of fixed length:
/// 0: record length, number of spins, precision tag
/// 1: number of k-points, number of bands, cutoff energy, real space lattice (3x3)
/// and for each spin and k-point a header record with the number of plane waves, the
/// k-vector and the (complex) eigenvalues and occupations, followed by one record
/// of plane-wave coefficients per band.
pub struct Wavecar {
    path: PathBuf,
    file: File,
    record_length: u64,
    precision: Precision,
    pub nspin: usize,
    pub nkpts: usize,
    pub nbands: usize,
    /// plane-wave cutoff in eV
    pub encut: f64,
    /// lattice vectors as rows in Angstrom
    pub real_cell: Matrix3<f64>,
    /// reciprocal lattice vectors as rows (without the factor 2π), a_i . b_j = δ_ij
    pub reciprocal_cell: Matrix3<f64>,
    /// number of plane waves per k-point (both spinor components for noncollinear files)
    pub nplws: Vec<usize>,
    /// k-vectors in fractional coordinates, shape [nkpts, 3]
    pub kvecs: Array2<f64>,
    /// band energies in eV, shape [nspin, nkpts, nbands]
    pub band_energies: Array3<f64>,
    /// occupations, shape [nspin, nkpts, nbands]
    pub occupations: Array3<f64>,
    /// size of the FFT grid that contains the G-sphere
    pub ngrid: [usize; 3],
    spin_orbit: bool,
    gamma_half: Option<GammaHalf>,
}

impl Wavecar {
    /// Opens a WAVECAR and reads its header. Whether the file was written by the
    /// noncollinear or the gamma-only version of VASP cannot be seen from the header, it
    /// has to be provided.
    pub fn from_file(
        path: &Path,
        spin_orbit: bool,
        gamma_half: Option<GammaHalf>,
    ) -> Result<Self> {
        if spin_orbit && gamma_half.is_some() {
            return Err(TdmError::InvalidWavecar(String::from(
                "a noncollinear calculation can not use the gamma-only storage",
            )));
        }
        let file: File = File::open(path)?;

        // record 0
        let header: Vec<f64> = read_f64s(&file, 0, 3)?;
        let record_length: u64 = header[0] as u64;
        let nspin: usize = header[1] as usize;
        let precision: Precision = Precision::from_tag(header[2] as i64)?;
        if record_length < 12 * 8 {
            return Err(TdmError::InvalidWavecar(format!(
                "record length of {} bytes is too short",
                record_length
            )));
        }
        if nspin != 1 && nspin != 2 {
            return Err(TdmError::InvalidWavecar(format!(
                "number of spins has to be 1 or 2, got {}",
                nspin
            )));
        }

        // record 1
        let dump: Vec<f64> = read_f64s(&file, record_length, 12)?;
        let nkpts: usize = dump[0] as usize;
        let nbands: usize = dump[1] as usize;
        let encut: f64 = dump[2];
        let real_cell: Matrix3<f64> = Matrix3::from_row_slice(&dump[3..12]);
        let reciprocal_cell: Matrix3<f64> = real_cell
            .try_inverse()
            .ok_or_else(|| TdmError::InvalidWavecar(String::from("the lattice is singular")))?
            .transpose();
        if nkpts == 0 || nbands == 0 {
            return Err(TdmError::InvalidWavecar(format!(
                "{} k-points and {} bands",
                nkpts, nbands
            )));
        }
        if (4 + 3 * nbands) as u64 * 8 > record_length {
            return Err(TdmError::InvalidWavecar(format!(
                "{} bands do not fit in a record of {} bytes",
                nbands, record_length
            )));
        }

        let mut wavecar = Wavecar {
            path: path.to_path_buf(),
            file,
            record_length,
            precision,
            nspin,
            nkpts,
            nbands,
            encut,
            real_cell,
            reciprocal_cell,
            nplws: vec![0; nkpts],
            kvecs: Array2::zeros((nkpts, 3)),
            band_energies: Array3::zeros((nspin, nkpts, nbands)),
            occupations: Array3::zeros((nspin, nkpts, nbands)),
            ngrid: [0; 3],
            spin_orbit,
            gamma_half,
        };
        wavecar.ngrid = wavecar.fft_grid();
        wavecar.read_band_headers()?;
        Ok(wavecar)
    }

    /// Reads the header record of each spin and k-point.
    fn read_band_headers(&mut self) -> Result<()> {
        for ispin in 0..self.nspin {
            for ikpt in 0..self.nkpts {
                let offset: u64 = self.record(ispin, ikpt, 0) * self.record_length;
                let dump: Vec<f64> = read_f64s(&self.file, offset, 4 + 3 * self.nbands)?;
                if ispin == 0 {
                    self.nplws[ikpt] = dump[0] as usize;
                    self.kvecs
                        .row_mut(ikpt)
                        .assign(&aview1(&dump[1..4]));
                }
                for (iband, values) in dump[4..].chunks_exact(3).enumerate() {
                    // values: real and imaginary part of the eigenvalue, occupation
                    self.band_energies[[ispin, ikpt, iband]] = values[0];
                    self.occupations[[ispin, ikpt, iband]] = values[2];
                }
            }
        }
        let max_nplw: u64 = *self.nplws.iter().max().unwrap_or(&0) as u64;
        let max_coeff_bytes: u64 = max_nplw * self.precision.bytes_per_coefficient() as u64;
        if max_coeff_bytes > self.record_length {
            return Err(TdmError::InvalidWavecar(format!(
                "plane-wave coefficients ({} bytes) do not fit in a record of {} bytes",
                max_coeff_bytes, self.record_length
            )));
        }
        Ok(())
    }

    /// Index of the record, all arguments start at 0. Band 0 is the header record of the
    /// spin and k-point, the coefficients of band n are stored in record n + 1.
    fn record(&self, ispin: usize, ikpt: usize, record_in_block: usize) -> u64 {
        (2 + ispin * self.nkpts * (self.nbands + 1) + ikpt * (self.nbands + 1) + record_in_block)
            as u64
    }

    fn check_index(&self, spin: usize, kpoint: usize, band: usize) -> Result<()> {
        if spin < 1 || spin > self.nspin {
            return Err(TdmError::MissingBandData(format!(
                "spin index {} is out of range 1..={}",
                spin, self.nspin
            )));
        }
        if kpoint < 1 || kpoint > self.nkpts {
            return Err(TdmError::MissingBandData(format!(
                "k-point index {} is out of range 1..={}",
                kpoint, self.nkpts
            )));
        }
        if band < 1 || band > self.nbands {
            return Err(TdmError::MissingBandData(format!(
                "band index {} is out of range 1..={}",
                band, self.nbands
            )));
        }
        Ok(())
    }

    /// Size of the FFT grid that contains all plane waves within the cutoff sphere.
    fn fft_grid(&self) -> [usize; 3] {
        let mut ngrid: [usize; 3] = [0; 3];
        for (n, a) in ngrid.iter_mut().zip(self.real_cell.row_iter()) {
            let g_max: f64 = (self.encut / RYTOEV).sqrt() / (TPI / (a.norm() / AUTOA));
            *n = 2 * g_max.ceil() as usize + 1;
        }
        ngrid
    }

    /// Returns the G-vectors (in units of the reciprocal lattice vectors) of all plane
    /// waves at a k-point (starting at 0), in the order in which VASP stores the
    /// coefficients: x runs fastest and z slowest, except for gamma-only files halved
    /// along x, where z runs fastest.
    pub fn gvectors(&self, ikpt: usize) -> Result<Array2<f64>> {
        let kvec: Vector3<f64> = Vector3::new(
            self.kvecs[[ikpt, 0]],
            self.kvecs[[ikpt, 1]],
            self.kvecs[[ikpt, 2]],
        );
        let frequencies: Vec<Vec<i64>> = self
            .ngrid
            .iter()
            .map(|&n| {
                (0..n as i64)
                    .map(|ii| if ii < n as i64 / 2 + 1 { ii } else { ii - n as i64 })
                    .collect()
            })
            .collect();
        let b_t: Matrix3<f64> = TPI * self.reciprocal_cell.transpose();

        // the x-half gamma-only version stores z fastest, all others x fastest
        let grid_points: Vec<(i64, i64, i64)> = match self.gamma_half {
            Some(GammaHalf::X) => iproduct!(
                frequencies[0].iter(),
                frequencies[1].iter(),
                frequencies[2].iter()
            )
            .map(|(&fx, &fy, &fz)| (fx, fy, fz))
            .collect(),
            _ => iproduct!(
                frequencies[2].iter(),
                frequencies[1].iter(),
                frequencies[0].iter()
            )
            .map(|(&fz, &fy, &fx)| (fx, fy, fz))
            .collect(),
        };

        let mut gvecs: Vec<f64> = Vec::new();
        for (fx, fy, fz) in grid_points {
            if !self.is_stored(fx, fy, fz) {
                continue;
            }
            let g: Vector3<f64> = Vector3::new(fx as f64, fy as f64, fz as f64);
            // kinetic energy (G + k)^2 / 2 in eV
            let energy: f64 = HSQDTM * (b_t * (g + kvec)).norm_squared();
            if energy < self.encut {
                gvecs.extend_from_slice(&[fx as f64, fy as f64, fz as f64]);
            }
        }
        let n_pw: usize = gvecs.len() / 3;

        let expected: usize = if self.spin_orbit {
            self.nplws[ikpt] / 2
        } else {
            self.nplws[ikpt]
        };
        if n_pw != expected {
            return Err(TdmError::InvalidWavecar(format!(
                "{} plane waves were generated for k-point {}, but the WAVECAR contains {}. \
                 Check the spin-orbit and gamma-only settings",
                n_pw,
                ikpt + 1,
                expected
            )));
        }
        Array2::from_shape_vec((n_pw, 3), gvecs)
            .map_err(|err| TdmError::InvalidWavecar(err.to_string()))
    }

    /// The gamma-only version keeps only one half of the G-sphere, the other half
    /// follows from c(-G) = c(G)^*.
    fn is_stored(&self, fx: i64, fy: i64, fz: i64) -> bool {
        match self.gamma_half {
            None => true,
            Some(GammaHalf::Z) => {
                fz > 0 || (fz == 0 && fy > 0) || (fz == 0 && fy == 0 && fx >= 0)
            }
            Some(GammaHalf::X) => {
                fx > 0 || (fx == 0 && fy > 0) || (fx == 0 && fy == 0 && fz >= 0)
            }
        }
    }

    /// Reads the plane-wave coefficients of a band (all indices start at 1) and
    /// normalizes them.
    fn read_coefficients(
        &self,
        spin: usize,
        kpoint: usize,
        band: usize,
    ) -> Result<Array1<Complex64>> {
        self.check_index(spin, kpoint, band)?;
        let nplw: usize = self.nplws[kpoint - 1];
        let offset: u64 = self.record(spin - 1, kpoint - 1, band) * self.record_length;
        let bytes: Vec<u8> =
            read_bytes(&self.file, offset, nplw * self.precision.bytes_per_coefficient())?;

        let mut coeffs: Array1<Complex64> = match self.precision {
            Precision::Single => bytes
                .chunks_exact(8)
                .map(|c| {
                    let re = f32::from_le_bytes([c[0], c[1], c[2], c[3]]);
                    let im = f32::from_le_bytes([c[4], c[5], c[6], c[7]]);
                    Complex64::new(re as f64, im as f64)
                })
                .collect(),
            Precision::Double => bytes
                .chunks_exact(16)
                .map(|c| {
                    let re = f64::from_le_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]);
                    let im =
                        f64::from_le_bytes([c[8], c[9], c[10], c[11], c[12], c[13], c[14], c[15]]);
                    Complex64::new(re, im)
                })
                .collect(),
        };

        let norm: f64 = coeffs.iter().map(|c| c.norm_sqr()).sum::<f64>().sqrt();
        if norm > 0.0 {
            coeffs.mapv_inplace(|c| c / norm);
        }
        Ok(coeffs)
    }

    pub fn log_summary(&self) {
        info!("{: <25} {}", "WAVECAR:", self.path.display());
        info!("{: <25} {:?}", "precision:", self.precision);
        info!("{: <25} {}", "number of spins:", self.nspin);
        info!("{: <25} {}", "number of k-points:", self.nkpts);
        info!("{: <25} {}", "number of bands:", self.nbands);
        info!("{: <25} {:.4} eV", "plane-wave cutoff:", self.encut);
        info!(
            "{: <25} {} x {} x {}",
            "FFT grid:", self.ngrid[0], self.ngrid[1], self.ngrid[2]
        );
        for (i, a) in self.real_cell.row_iter().enumerate() {
            info!(
                "{: <25} {:>12.6} {:>12.6} {:>12.6}",
                format!("a{} / Angstrom:", i + 1),
                a[0],
                a[1],
                a[2]
            );
        }
        debug!("{: <25} {:?}", "plane waves per k-point:", self.nplws);
    }
}

impl WavefunctionProvider for Wavecar {
    fn band_energy(&self, spin: usize, kpoint: usize, band: usize) -> Result<f64> {
        self.check_index(spin, kpoint, band)?;
        Ok(self.band_energies[[spin - 1, kpoint - 1, band - 1]])
    }

    fn reciprocal_vectors(&self, kpoint: usize) -> Result<Array2<f64>> {
        self.check_index(1, kpoint, 1)?;
        let gvecs: Array2<f64> = self.gvectors(kpoint - 1)?;
        let kvec: ArrayView1<f64> = self.kvecs.row(kpoint - 1);
        // (G + k) in Cartesian coordinates, including the factor 2π
        let mut cartesian: Array2<f64> = Array2::zeros(gvecs.raw_dim());
        for (mut cart, g) in cartesian.outer_iter_mut().zip(gvecs.outer_iter()) {
            let v: Vector3<f64> = TPI
                * self.reciprocal_cell.transpose()
                * Vector3::new(g[0] + kvec[0], g[1] + kvec[1], g[2] + kvec[2]);
            cart.assign(&aview1(v.as_slice()));
        }
        Ok(cartesian)
    }

    fn plane_wave_coeffs(
        &self,
        spin: usize,
        kpoint: usize,
        band: usize,
    ) -> Result<Array1<Complex64>> {
        self.read_coefficients(spin, kpoint, band)
    }

    fn is_spin_orbit(&self) -> bool {
        self.spin_orbit
    }

    fn is_gamma_only(&self) -> bool {
        self.gamma_half.is_some()
    }
}

fn read_bytes(mut file: &File, offset: u64, n_bytes: usize) -> Result<Vec<u8>> {
    let mut buffer: Vec<u8> = vec![0; n_bytes];
    file.seek(SeekFrom::Start(offset))?;
    file.read_exact(&mut buffer)?;
    Ok(buffer)
}

fn read_f64s(file: &File, offset: u64, count: usize) -> Result<Vec<f64>> {
    let bytes: Vec<u8> = read_bytes(file, offset, 8 * count)?;
    Ok(bytes
        .chunks_exact(8)
        .map(|c| f64::from_le_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]))
        .collect())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::tdm::compute_tdm;
    use crate::utils::temporary_path;
    use approx::assert_relative_eq;
    use std::fs;

    /// Writes a WAVECAR with one spin and one k-point for a cubic cell.
    pub(crate) fn write_wavecar(
        path: &Path,
        rtag: f64,
        lattice_constant: f64,
        encut: f64,
        energies: &[f64],
        coefficients: &[Vec<Complex64>],
    ) {
        let nbands: usize = energies.len();
        let nplw: usize = coefficients[0].len();
        let coeff_bytes: usize = if rtag as i64 == RTAG_DOUBLE { 16 } else { 8 };
        let record_length: usize = (12 * 8).max((4 + 3 * nbands) * 8).max(nplw * coeff_bytes);
        let mut data: Vec<u8> = vec![0; record_length * (3 + nbands)];

        let mut put = |record: usize, bytes: Vec<u8>| {
            let start: usize = record * record_length;
            data[start..start + bytes.len()].copy_from_slice(&bytes);
        };
        let f64_bytes =
            |values: &[f64]| -> Vec<u8> { values.iter().flat_map(|v| v.to_le_bytes()).collect() };

        put(0, f64_bytes(&[record_length as f64, 1.0, rtag]));
        let a: f64 = lattice_constant;
        put(
            1,
            f64_bytes(&[1.0, nbands as f64, encut, a, 0.0, 0.0, 0.0, a, 0.0, 0.0, 0.0, a]),
        );
        let mut band_header: Vec<f64> = vec![nplw as f64, 0.0, 0.0, 0.0];
        for (iband, e) in energies.iter().enumerate() {
            band_header.extend_from_slice(&[*e, 0.0, if iband == 0 { 1.0 } else { 0.0 }]);
        }
        put(2, f64_bytes(&band_header));
        for (iband, coeffs) in coefficients.iter().enumerate() {
            let bytes: Vec<u8> = if coeff_bytes == 16 {
                coeffs
                    .iter()
                    .flat_map(|c| [c.re.to_le_bytes(), c.im.to_le_bytes()].concat())
                    .collect()
            } else {
                coeffs
                    .iter()
                    .flat_map(|c| {
                        [(c.re as f32).to_le_bytes(), (c.im as f32).to_le_bytes()].concat()
                    })
                    .collect()
            };
            put(3 + iband, bytes);
        }
        fs::write(path, data).unwrap();
    }

    fn unit_vector(n: usize, i: usize, value: f64) -> Vec<Complex64> {
        let mut v: Vec<Complex64> = vec![Complex64::new(0.0, 0.0); n];
        v[i] = Complex64::new(value, 0.0);
        v
    }

    #[test]
    fn header_and_band_energies() {
        let path = temporary_path("header.WAVECAR");
        let coefficients = vec![unit_vector(7, 0, 2.0), unit_vector(7, 1, 1.0)];
        write_wavecar(&path, RTAG_SINGLE as f64, 3.0, 20.0, &[-1.5, 2.25], &coefficients);

        let wav = Wavecar::from_file(&path, false, None).unwrap();
        assert_eq!(wav.nspin, 1);
        assert_eq!(wav.nkpts, 1);
        assert_eq!(wav.nbands, 2);
        assert_eq!(wav.nplws, vec![7]);
        assert_eq!(wav.ngrid, [5, 5, 5]);
        assert_eq!(wav.band_energy(1, 1, 1).unwrap(), -1.5);
        assert_eq!(wav.band_energy(1, 1, 2).unwrap(), 2.25);
        assert_eq!(wav.occupations[[0, 0, 0]], 1.0);
        assert!(!wav.is_spin_orbit());
        assert!(!wav.is_gamma_only());
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn full_sphere_gvectors() {
        let path = temporary_path("full.WAVECAR");
        let coefficients = vec![unit_vector(7, 0, 1.0), unit_vector(7, 1, 1.0)];
        write_wavecar(&path, RTAG_SINGLE as f64, 3.0, 20.0, &[0.0, 1.0], &coefficients);
        let wav = Wavecar::from_file(&path, false, None).unwrap();

        let gvecs = wav.gvectors(0).unwrap();
        let expected = array![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [-1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, -1.0, 0.0],
            [0.0, 0.0, 1.0],
            [0.0, 0.0, -1.0]
        ];
        assert_eq!(gvecs, expected);

        let cartesian = wav.reciprocal_vectors(1).unwrap();
        assert!(cartesian.abs_diff_eq(&(expected * (TPI / 3.0)), 1e-12));
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn gamma_half_gvectors() {
        let path = temporary_path("gamma.WAVECAR");
        let coefficients = vec![unit_vector(4, 0, 1.0), unit_vector(4, 1, 1.0)];
        write_wavecar(&path, RTAG_SINGLE as f64, 3.0, 20.0, &[0.0, 1.0], &coefficients);

        let wav = Wavecar::from_file(&path, false, Some(GammaHalf::Z)).unwrap();
        assert!(wav.is_gamma_only());
        let expected = array![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0]
        ];
        assert_eq!(wav.gvectors(0).unwrap(), expected);

        // halved along x, z runs fastest
        let wav = Wavecar::from_file(&path, false, Some(GammaHalf::X)).unwrap();
        let expected = array![
            [0.0, 0.0, 0.0],
            [0.0, 0.0, 1.0],
            [0.0, 1.0, 0.0],
            [1.0, 0.0, 0.0]
        ];
        assert_eq!(wav.gvectors(0).unwrap(), expected);

        // the full sphere does not match the number of stored coefficients
        let wav = Wavecar::from_file(&path, false, None).unwrap();
        assert!(matches!(wav.gvectors(0), Err(TdmError::InvalidWavecar(_))));
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn wrong_storage_mode_is_detected() {
        let path = temporary_path("soc.WAVECAR");
        let coefficients = vec![unit_vector(7, 0, 1.0), unit_vector(7, 1, 1.0)];
        write_wavecar(&path, RTAG_SINGLE as f64, 3.0, 20.0, &[0.0, 1.0], &coefficients);
        let wav = Wavecar::from_file(&path, true, None).unwrap();
        assert!(matches!(
            wav.reciprocal_vectors(1),
            Err(TdmError::InvalidWavecar(_))
        ));
        assert!(Wavecar::from_file(&path, true, Some(GammaHalf::Z)).is_err());
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn coefficients_are_normalized() {
        let path = temporary_path("double.WAVECAR");
        let mut band = unit_vector(7, 0, 3.0);
        band[3] = Complex64::new(0.0, 4.0);
        let coefficients = vec![band, unit_vector(7, 1, 1.0)];
        write_wavecar(&path, RTAG_DOUBLE as f64, 3.0, 20.0, &[0.0, 1.0], &coefficients);

        let wav = Wavecar::from_file(&path, false, None).unwrap();
        let cg = wav.plane_wave_coeffs(1, 1, 1).unwrap();
        assert_eq!(cg.len(), 7);
        assert_relative_eq!(cg[0].re, 0.6, epsilon = 1e-14);
        assert_relative_eq!(cg[3].im, 0.8, epsilon = 1e-14);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn out_of_range_indices() {
        let path = temporary_path("index.WAVECAR");
        let coefficients = vec![unit_vector(7, 0, 1.0), unit_vector(7, 1, 1.0)];
        write_wavecar(&path, RTAG_SINGLE as f64, 3.0, 20.0, &[0.0, 1.0], &coefficients);
        let wav = Wavecar::from_file(&path, false, None).unwrap();
        assert!(matches!(wav.band_energy(1, 1, 3), Err(TdmError::MissingBandData(_))));
        assert!(matches!(wav.band_energy(2, 1, 1), Err(TdmError::MissingBandData(_))));
        assert!(matches!(
            wav.plane_wave_coeffs(1, 2, 1),
            Err(TdmError::MissingBandData(_))
        ));
        assert!(matches!(
            wav.plane_wave_coeffs(1, 1, 0),
            Err(TdmError::MissingBandData(_))
        ));
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn unsupported_precision_tag() {
        let path = temporary_path("vasp5.WAVECAR");
        let coefficients = vec![unit_vector(7, 0, 1.0), unit_vector(7, 1, 1.0)];
        write_wavecar(&path, RTAG_VASP5_SINGLE as f64, 3.0, 20.0, &[0.0, 1.0], &coefficients);
        assert!(matches!(
            Wavecar::from_file(&path, false, None),
            Err(TdmError::InvalidWavecar(_))
        ));
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn tdm_from_wavecar() {
        let path = temporary_path("tdm.WAVECAR");
        // band 1: s-like plus a plane wave along +x, band 2: plane wave along +x
        let mut band_1 = unit_vector(7, 0, 1.0);
        band_1[1] = Complex64::new(1.0, 0.0);
        let coefficients = vec![band_1, unit_vector(7, 1, 1.0)];
        write_wavecar(&path, RTAG_SINGLE as f64, 3.0, 20.0, &[-1.0, 1.0], &coefficients);
        let wav = Wavecar::from_file(&path, false, None).unwrap();

        let result = compute_tdm(&wav, &[1], &[2], 1, 1).unwrap();
        let t = &result.transitions[0];
        assert_eq!(t.de, 2.0);
        // <1|G_x|2> = 1/sqrt(2) * 2π/3
        let raw: f64 = std::f64::consts::FRAC_1_SQRT_2 * TPI / 3.0;
        let expected: f64 = raw * 2.0 * RYTOEV / 2.0 * AUTOA * AUTDEBYE;
        assert_relative_eq!(t.tdm[0].re, 0.0, epsilon = 1e-10);
        assert_relative_eq!(t.tdm[0].im, expected, epsilon = 1e-6);
        assert!(t.tdm[1].norm() < 1e-10);
        assert!(t.tdm[2].norm() < 1e-10);
        fs::remove_file(&path).unwrap();
    }
}
