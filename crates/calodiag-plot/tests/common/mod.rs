//! Deterministic cluster samples for integration tests

/// Clusters spread over the full reference range with a response that
/// narrows towards high energy
pub fn calibrated_clusters(n: usize) -> (Vec<f64>, Vec<f64>) {
    let mut x = Vec::with_capacity(n);
    let mut y = Vec::with_capacity(n);
    for i in 0..n {
        // Reference energy log-uniform over [0.1, 1000)
        let exponent = -1.0 + 4.0 * (i as f64 + 0.5) / n as f64;
        let energy = 10f64.powf(exponent);
        // Response scatter shrinks like 1/sqrt(E), bounded to stay inside the grid
        let phase = ((i * 7919) % 1000) as f64 / 1000.0 - 0.5;
        let width = (0.5 / energy.sqrt()).min(0.8);
        x.push(energy);
        y.push(1.0 + width * phase);
    }
    (x, y)
}

/// Every cluster at the same energy with responses spread over [0.8, 1.2]
#[allow(dead_code)]
pub fn concentrated_clusters(n: usize) -> (Vec<f64>, Vec<f64>) {
    let x = vec![0.5; n];
    let y = (0..n)
        .map(|i| 0.8 + 0.4 * i as f64 / (n - 1) as f64)
        .collect();
    (x, y)
}
