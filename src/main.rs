#![allow(dead_code)]

use crate::defaults::CONFIG_FILE_NAME;
use crate::io::{apply_arguments, read_input, write_footer, write_header, Configuration};
use crate::utils::Timer;
use clap::{crate_name, crate_version, Arg, Command};
use env_logger::Builder;
use log::{error, LevelFilter};
use std::io::Write;
use std::process;

mod constants;
mod defaults;
mod driver;
mod error;
mod io;
mod spectrum;
mod tdm;
mod utils;

pub(crate) fn cli() -> Command<'static> {
    Command::new(crate_name!())
        .version(crate_version!())
        .about("optical transition dipole moments from VASP WAVECAR files")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .takes_value(true)
                .default_value(CONFIG_FILE_NAME)
                .help("Configuration file, written with the defaults if it does not exist"),
        )
        .arg(
            Arg::new("wavecar")
                .short('w')
                .long("wavecar")
                .takes_value(true)
                .help("Location of the WAVECAR"),
        )
        .arg(
            Arg::new("ispin")
                .short('s')
                .long("ispin")
                .takes_value(true)
                .help("Spin channel, starting at 1"),
        )
        .arg(
            Arg::new("ikpt")
                .short('k')
                .long("ikpt")
                .takes_value(true)
                .help("K-point, starting at 1"),
        )
        .arg(
            Arg::new("ibands")
                .short('i')
                .long("ibands")
                .takes_value(true)
                .multiple_values(true)
                .help("Initial bands, e.g. 1:10 12 or 1:10:2"),
        )
        .arg(
            Arg::new("jbands")
                .short('j')
                .long("jbands")
                .takes_value(true)
                .multiple_values(true)
                .help("Final bands, all above the initial bands"),
        )
        .arg(
            Arg::new("lsorbit")
                .long("lsorbit")
                .help("The WAVECAR was written by the noncollinear version of VASP"),
        )
        .arg(
            Arg::new("lgamma")
                .long("lgamma")
                .help("The WAVECAR was written by the gamma-only version of VASP"),
        )
        .arg(
            Arg::new("gamma-half")
                .long("gamma-half")
                .takes_value(true)
                .possible_values(["x", "z"])
                .help("Reduced axis of a gamma-only WAVECAR"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .takes_value(true)
                .help("File for the table of transitions"),
        )
        .arg(
            Arg::new("sigma")
                .long("sigma")
                .takes_value(true)
                .help("Width of the Gaussian broadening in eV"),
        )
        .arg(
            Arg::new("nedos")
                .long("nedos")
                .takes_value(true)
                .help("Number of points of the energy grid"),
        )
        .arg(
            Arg::new("figsize")
                .long("figsize")
                .takes_value(true)
                .number_of_values(2)
                .value_names(&["WIDTH", "HEIGHT"])
                .help("Size of the figure in inch"),
        )
        .arg(
            Arg::new("show")
                .long("show")
                .help("Show the spectrum in a window"),
        )
        .arg(
            Arg::new("no-plot")
                .long("no-plot")
                .help("Do not plot the spectrum"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .multiple_occurrences(true)
                .help("More output, can be given twice"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .multiple_occurrences(true)
                .conflicts_with("verbose")
                .help("Less output, can be given twice"),
        )
}

fn main() {
    // Input.
    let matches = cli().get_matches();
    let config_file: &str = matches.value_of("config").unwrap_or(CONFIG_FILE_NAME);
    let config: Configuration = match read_input(config_file).and_then(|mut config| {
        apply_arguments(&mut config, &matches)?;
        Ok(config)
    }) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {:?}", err);
            process::exit(1);
        }
    };

    // Multithreading.
    if let Err(err) = rayon::ThreadPoolBuilder::new()
        .num_threads(config.parallelization.number_of_cores)
        .build_global()
    {
        eprintln!("Error: unable to build the thread pool: {}", err);
        process::exit(1);
    }

    // Logging.
    // The log level is set.
    let log_level: LevelFilter = match config.verbose {
        2 => LevelFilter::Trace,
        1 => LevelFilter::Debug,
        0 => LevelFilter::Info,
        -1 => LevelFilter::Warn,
        -2 => LevelFilter::Error,
        _ => LevelFilter::Info,
    };
    // and the logger is build.
    Builder::new()
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .filter(None, log_level)
        .init();

    // The program header is written to the command line.
    write_header();
    // and the total wall-time timer is started.
    let timer: Timer = Timer::start();

    // Computations.
    // ................................................................
    if let Err(err) = driver::run(&config) {
        error!("Error: {:?}", err);
        process::exit(1);
    }

    // Finished.
    // ................................................................
    write_footer(timer);
}
