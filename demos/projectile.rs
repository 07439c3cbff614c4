//! Track a projectile from noisy position measurements.
//!
//! State is [position, velocity, acceleration] under a constant acceleration
//! model; only position is measured.
//!
//! Run with: cargo run --example projectile [-- --verbose]

use nalgebra::{DMatrix, DVector};
use tracing::info;

use kalman_rs::{KalmanFilter, Result};

/// Noisy position measurements sampled at 30 Hz.
const MEASUREMENTS: [f64; 45] = [
    1.04202710058, 1.10726790452, 1.2913511148, 1.48485250951, 1.72825901034,
    1.74216489744, 2.11672039768, 2.14529225112, 2.16029641405, 2.21269371128,
    2.57709350237, 2.6682215744, 2.51641839428, 2.76034056782, 2.88131780617,
    2.88373786518, 2.9448468727, 2.82866600131, 3.0006601946, 3.12920591669,
    2.858361783, 2.83808170354, 2.68975330958, 2.66533185589, 2.81613499531,
    2.81003612051, 2.88321849354, 2.69789264832, 2.4342229249, 2.23464791825,
    2.30278776224, 2.02069770395, 1.94393985809, 1.82498398739, 1.52526230354,
    1.86967808173, 1.18073207847, 1.10729605087, 0.916168349913, 0.678547664519,
    0.562381751596, 0.355468474885, -0.155607486619, -0.287198661013, -0.602973173813,
];

fn main() -> Result<()> {
    let verbose = std::env::args().any(|a| a == "-v" || a == "--verbose");
    init_logging(verbose);

    let dt = 1.0 / 30.0;

    let f = DMatrix::from_row_slice(3, 3, &[
        1.0, dt,  0.0,
        0.0, 1.0, dt,
        0.0, 0.0, 1.0,
    ]);
    let h = DMatrix::from_row_slice(1, 3, &[1.0, 0.0, 0.0]);

    // Reasonable covariance matrices
    let q = DMatrix::from_row_slice(3, 3, &[
        0.05, 0.05, 0.0,
        0.05, 0.05, 0.0,
        0.0,  0.0,  0.0,
    ]);
    let r = DMatrix::from_element(1, 1, 5.0);
    let p = DMatrix::from_row_slice(3, 3, &[
        0.1, 0.1,     0.1,
        0.1, 10000.0, 10.0,
        0.1, 10.0,    100.0,
    ]);

    info!("F: {}", f);
    info!("H: {}", h);
    info!("Q: {}", q);
    info!("R: {}", r);
    info!("P: {}", p);

    let mut kf = KalmanFilter::new(dt, f, h, q, r, p);

    let x0 = DVector::from_vec(vec![MEASUREMENTS[0], 0.0, -9.81]);
    kf.init_with(0.0, x0)?;

    println!(
        "t = {:.4}, x_hat[0] = {}",
        kf.time(),
        kf.state().transpose()
    );

    for (i, &y) in MEASUREMENTS.iter().enumerate() {
        kf.predict()?;
        kf.update(&DVector::from_element(1, y))?;
        println!(
            "t = {:.4}, y[{}] = {:.6}, x_hat[{}] = {}",
            kf.time(),
            i,
            y,
            i,
            kf.state().transpose()
        );
    }

    info!(
        position = kf.state()[0],
        velocity = kf.state()[1],
        acceleration = kf.state()[2],
        "Final estimate"
    );
    Ok(())
}

/// Initialize logging subsystem
fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::TRACE
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_target(false)
        .with_thread_ids(false)
        .with_level(true)
        .with_max_level(level)
        .init();
}
