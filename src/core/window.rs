/// Fixed-size trailing window over a numeric sequence.
///
/// All windowed statistics in the indicator engine go through this type so the
/// window length and the minimum input length are stated in one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrailingWindow {
    size: usize,
}

impl TrailingWindow {
    /// `None` for a zero-sized window.
    pub fn new(size: usize) -> Option<Self> {
        (size > 0).then_some(Self { size })
    }

    /// For compile-time constants only; `size` must be non-zero.
    pub(crate) const fn fixed(size: usize) -> Self {
        Self { size }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// The last `size` values, or `None` if there are fewer.
    pub fn trailing<'a>(&self, values: &'a [f64]) -> Option<&'a [f64]> {
        values
            .len()
            .checked_sub(self.size)
            .map(|start| &values[start..])
    }

    pub fn mean(&self, values: &[f64]) -> Option<f64> {
        self.trailing(values)
            .map(|w| w.iter().sum::<f64>() / self.size as f64)
    }

    /// Mean of `f(x)` over the trailing window.
    pub fn mean_by(&self, values: &[f64], f: impl Fn(f64) -> f64) -> Option<f64> {
        self.trailing(values)
            .map(|w| w.iter().map(|&v| f(v)).sum::<f64>() / self.size as f64)
    }
}

/// Consecutive differences: `out[i] = values[i + 1] - values[i]`.
pub fn deltas(values: &[f64]) -> Vec<f64> {
    values.windows(2).map(|w| w[1] - w[0]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_size_rejected() {
        assert!(TrailingWindow::new(0).is_none());
    }

    #[test]
    fn trailing_needs_full_window() {
        let w = TrailingWindow::new(3).unwrap();
        assert_eq!(w.trailing(&[1.0, 2.0]), None);
        assert_eq!(w.trailing(&[1.0, 2.0, 3.0, 4.0]), Some(&[2.0, 3.0, 4.0][..]));
    }

    #[test]
    fn mean_of_trailing_values() {
        let w = TrailingWindow::new(2).unwrap();
        assert_eq!(w.mean(&[10.0, 20.0, 40.0]), Some(30.0));
        assert_eq!(w.mean(&[10.0]), None);
    }

    #[test]
    fn mean_by_applies_transform() {
        let w = TrailingWindow::new(4).unwrap();
        let gains = w.mean_by(&[2.0, -1.0, 3.0, -4.0], |d| d.max(0.0));
        assert_eq!(gains, Some(1.25));
    }

    #[test]
    fn deltas_are_consecutive() {
        assert_eq!(deltas(&[1.0, 3.0, 2.0]), vec![2.0, -1.0]);
        assert!(deltas(&[5.0]).is_empty());
    }
}
