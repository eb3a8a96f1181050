//! VM-to-VM bandwidth model.

/// Pairwise bandwidths between VMs.
///
/// Same-VM communication is free, which is modeled by an infinite bandwidth on
/// the diagonal regardless of the stored matrix values.
#[derive(Clone, Debug)]
pub struct Network {
    bandwidth: Vec<Vec<f64>>,
}

impl Network {
    pub fn new(bandwidth: Vec<Vec<f64>>) -> Self {
        Self { bandwidth }
    }

    /// Creates a full mesh of `vm_count` VMs with identical link bandwidth.
    pub fn constant(vm_count: usize, bandwidth: f64) -> Self {
        Self {
            bandwidth: vec![vec![bandwidth; vm_count]; vm_count],
        }
    }

    pub fn vm_count(&self) -> usize {
        self.bandwidth.len()
    }

    /// Returns the bandwidth between two VMs (infinite for a VM to itself).
    pub fn bandwidth(&self, from: usize, to: usize) -> f64 {
        if from == to {
            return f64::INFINITY;
        }
        self.bandwidth
            .get(from)
            .and_then(|row| row.get(to))
            .copied()
            .unwrap_or(0.)
    }

    /// Returns the mean of `1 / bandwidth` over all ordered pairs of distinct VMs.
    ///
    /// Non-positive entries are skipped so that a single dead link does not turn
    /// every averaged communication cost infinite.
    pub fn avg_inv_bandwidth(&self) -> f64 {
        let n = self.bandwidth.len();
        let mut sum = 0.;
        let mut pairs = 0;
        for from in 0..n {
            for to in 0..n {
                if from == to {
                    continue;
                }
                let bw = self.bandwidth(from, to);
                if bw > 0. && bw.is_finite() {
                    sum += 1. / bw;
                }
                pairs += 1;
            }
        }
        if pairs == 0 {
            return 0.;
        }
        sum / pairs as f64
    }
}
