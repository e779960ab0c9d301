/// Representative of a group of values and the amount of values it stands in
/// for.
///
/// `N` is the dimension of a value, e.g. `1` for plain difficulties or `2`
/// for joint difficulty and time binning.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bin<const N: usize> {
    pub values: [f64; N],
    pub count: f64,
}

impl<const N: usize> Bin<N> {
    /// Quantizes `values` into at most `bin_count` equal-population bins.
    ///
    /// Values are sorted ascending by their first component and split into
    /// contiguous groups of `len / bin_count` values where the last group
    /// absorbs the remainder. Each bin is represented by the component-wise
    /// mean of its group.
    pub fn create_bins(values: &[[f64; N]], bin_count: usize) -> Vec<Self> {
        if values.is_empty() || bin_count == 0 {
            return Vec::new();
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a[0].total_cmp(&b[0]));

        let bin_count = bin_count.min(sorted.len());
        let group_len = sorted.len() / bin_count;

        let mut bins = Vec::with_capacity(bin_count);

        for i in 0..bin_count {
            let start = i * group_len;

            let end = if i + 1 == bin_count {
                sorted.len()
            } else {
                start + group_len
            };

            let group = &sorted[start..end];
            let count = group.len() as f64;
            let mut sum = [0.0; N];

            for value in group {
                for (acc, component) in sum.iter_mut().zip(value) {
                    *acc += component;
                }
            }

            bins.push(Self {
                values: sum.map(|total| total / count),
                count,
            });
        }

        bins
    }
}

impl Bin<1> {
    pub const fn value(&self) -> f64 {
        self.values[0]
    }

    /// [`Bin::create_bins`] for plain values.
    pub fn create_bins_1d(values: &[f64], bin_count: usize) -> Vec<Self> {
        let values: Vec<_> = values.iter().map(|&value| [value]).collect();

        Self::create_bins(&values, bin_count)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::util::float_ext::FloatExt;

    use super::*;

    #[test]
    fn last_bin_absorbs_remainder() {
        let values = [5.0, 1.0, 4.0, 2.0, 3.0, 6.0, 7.0];
        let bins = Bin::create_bins_1d(&values, 3);

        assert_eq!(bins.len(), 3);
        assert!(bins[0].value().almost_eq(1.5, 1e-12));
        assert!(bins[1].value().almost_eq(3.5, 1e-12));
        assert!(bins[2].value().almost_eq(6.0, 1e-12));
        assert!(bins[2].count.almost_eq(3.0, 1e-12));
    }

    #[test]
    fn fewer_values_than_bins() {
        let bins = Bin::create_bins_1d(&[2.0, 1.0], 32);

        assert_eq!(bins.len(), 2);
        assert!(bins.iter().all(|bin| bin.count.almost_eq(1.0, 1e-12)));
    }

    #[test]
    fn two_dimensional_bins_sort_by_first_component() {
        let values = [[3.0, 300.0], [1.0, 100.0], [4.0, 400.0], [2.0, 200.0]];
        let bins = Bin::create_bins(&values, 2);

        assert_eq!(bins[0].values, [1.5, 150.0]);
        assert_eq!(bins[1].values, [3.5, 350.0]);
    }

    #[test]
    fn empty_input() {
        assert!(Bin::create_bins_1d(&[], 16).is_empty());
    }

    proptest! {
        #[test]
        fn bins_preserve_count_and_sum(
            values in prop::collection::vec(0.0..100.0_f64, 1..400),
            bin_count in 1_usize..70,
        ) {
            let bins = Bin::create_bins_1d(&values, bin_count);

            let count: f64 = bins.iter().map(|bin| bin.count).sum();
            let sum: f64 = bins.iter().map(|bin| bin.value() * bin.count).sum();
            let expected: f64 = values.iter().sum();

            prop_assert!(count.almost_eq(values.len() as f64, 1e-9));
            prop_assert!(sum.almost_eq(expected, 1e-6 * expected.max(1.0)));
        }
    }
}
