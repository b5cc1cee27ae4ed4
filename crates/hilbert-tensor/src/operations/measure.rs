//! Computational-basis measurement sampling.

use rand::Rng;
use rand::distr::StandardUniform;
use tracing::trace;

use crate::array::HilbertArray;
use crate::error::{HilbertError, Result};
use crate::scalar::Scalar;
use crate::strides::linear_to_cartesian;

impl<T: Scalar> HilbertArray<T> {
    /// Outcome probabilities over the ket (or bra) basis.
    ///
    /// A pure state (only kets or only bras) gives `|x_i|^2 / |x|^2`; a
    /// square array is read as a density operator and gives its normalized
    /// diagonal.
    ///
    /// # Errors
    ///
    /// * `NonSquare` for mixed arrays that are not square.
    /// * `Decomposition` when the total probability is zero.
    pub fn probabilities(&self) -> Result<Vec<f64>> {
        let space = self.space();
        let weights: Vec<f64> = if space.is_ket() || space.is_bra() {
            self.data().iter().map(|x| x.modulus_sqr()).collect()
        } else {
            space.require_square()?;
            let n = space.ket_dim();
            (0..n)
                .map(|i| self.data()[i * n + i].re_part().max(0.0))
                .collect()
        };
        let total: f64 = weights.iter().sum();
        if total <= 0.0 || !total.is_finite() {
            return Err(HilbertError::Decomposition {
                routine: "measure".into(),
                message: "total probability is zero".into(),
            });
        }
        Ok(weights.into_iter().map(|w| w / total).collect())
    }

    /// Sample a basis outcome using the thread-local RNG.
    pub fn measure(&self) -> Result<Vec<usize>> {
        self.measure_with_rng(&mut rand::rng())
    }

    /// Sample a basis outcome.
    ///
    /// Returns coordinates over the measured axes in canonical order: the
    /// kets of a density operator, or every axis of a pure state.
    ///
    /// ```
    /// use hilbert_tensor::{c64, qubit};
    /// use rand::SeedableRng;
    /// use rand::rngs::StdRng;
    ///
    /// let a = qubit("a").unwrap();
    /// let one = a.space().basis_vec::<c64>(&[1]).unwrap();
    /// let mut rng = StdRng::seed_from_u64(7);
    /// assert_eq!(one.measure_with_rng(&mut rng).unwrap(), vec![1]);
    /// ```
    pub fn measure_with_rng<R: Rng>(&self, rng: &mut R) -> Result<Vec<usize>> {
        let probs = self.probabilities()?;
        let u: f64 = rng.sample(StandardUniform);
        let mut acc = 0.0;
        let mut outcome = probs.len() - 1;
        for (i, p) in probs.iter().enumerate() {
            acc += p;
            if u < acc {
                outcome = i;
                break;
            }
        }
        let space = self.space();
        let shape = if space.is_ket() || space.is_bra() {
            space.shape().to_vec()
        } else {
            space.kets().iter().map(|a| a.dim()).collect()
        };
        trace!(space = %space, outcome, "sampled measurement");
        Ok(linear_to_cartesian(outcome, &shape))
    }
}

#[cfg(test)]
mod tests {
    use crate::atom::qubit;
    use crate::error::HilbertError;
    use crate::scalar::c64;
    use crate::space::HilbertSpace;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_probabilities_pure_state() {
        let a = qubit("mp").unwrap();
        let psi = a
            .space()
            .array(vec![c64::new(1.0, 0.0), c64::new(0.0, 1.0)])
            .unwrap();
        let p = psi.probabilities().unwrap();
        assert_relative_eq!(p[0], 0.5, epsilon = 1e-12);
        assert_relative_eq!(p[1], 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_probabilities_density() {
        let a = qubit("md").unwrap();
        let rho = a
            .o()
            .array(vec![
                c64::new(0.25, 0.0),
                c64::new(0.1, 0.0),
                c64::new(0.1, 0.0),
                c64::new(0.75, 0.0),
            ])
            .unwrap();
        let p = rho.probabilities().unwrap();
        assert_relative_eq!(p[1], 0.75, epsilon = 1e-12);
    }

    #[test]
    fn test_measure_frequencies() {
        let a = qubit("mf").unwrap();
        let b = qubit("mg").unwrap();
        let s = HilbertSpace::combine(&[a, b]).unwrap();
        // |01> with weight 1/4, |10> with weight 3/4
        let psi = s
            .array(vec![
                c64::new(0.0, 0.0),
                c64::new(0.5, 0.0),
                c64::new(0.75f64.sqrt(), 0.0),
                c64::new(0.0, 0.0),
            ])
            .unwrap();
        let mut rng = StdRng::seed_from_u64(1234);
        let mut ones_first = 0;
        for _ in 0..2000 {
            let outcome = psi.measure_with_rng(&mut rng).unwrap();
            assert!(outcome == vec![0, 1] || outcome == vec![1, 0]);
            if outcome == vec![1, 0] {
                ones_first += 1;
            }
        }
        let freq = ones_first as f64 / 2000.0;
        assert!((freq - 0.75).abs() < 0.05, "frequency {freq}");
    }

    #[test]
    fn test_measure_zero_state_fails() {
        let a = qubit("mz").unwrap();
        let zero = a.space().zeros::<c64>().unwrap();
        assert!(matches!(
            zero.measure(),
            Err(HilbertError::Decomposition { .. })
        ));
    }
}
