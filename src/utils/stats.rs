#[derive(Debug, PartialEq)]
pub struct Stats {
    pub min: usize,
    pub max: usize,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
}

/// Summary statistics of `data`; all zeros when `data` is empty.
pub fn calculate_stats(data: &[usize]) -> Stats {
    if data.is_empty() {
        return Stats {
            min: 0,
            max: 0,
            mean: 0.0,
            median: 0.0,
            std_dev: 0.0,
        };
    }
    let mut sorted = data.to_vec();
    sorted.sort_unstable();
    let len = sorted.len();
    let median = if len % 2 == 0 {
        (sorted[len / 2 - 1] + sorted[len / 2]) as f64 / 2.0
    } else {
        sorted[len / 2] as f64
    };
    let sum: usize = sorted.iter().sum();
    let mean = sum as f64 / len as f64;
    let std_dev = (sorted
        .iter()
        .map(|&x| (x as f64 - mean).powi(2))
        .sum::<f64>()
        / len as f64)
        .sqrt();
    Stats {
        min: sorted[0],
        max: sorted[len - 1],
        mean,
        median,
        std_dev,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_of_odd_sized_data() {
        let stats = calculate_stats(&[4, 1, 7]);
        assert_eq!(stats.min, 1);
        assert_eq!(stats.max, 7);
        assert_eq!(stats.median, 4.0);
        assert_eq!(stats.mean, 4.0);
        assert!((stats.std_dev - 6.0f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn stats_of_even_sized_data() {
        let stats = calculate_stats(&[2, 8, 4, 6]);
        assert_eq!(stats.median, 5.0);
        assert_eq!(stats.mean, 5.0);
    }

    #[test]
    fn stats_of_empty_data() {
        let stats = calculate_stats(&[]);
        assert_eq!(stats.min, 0);
        assert_eq!(stats.mean, 0.0);
    }
}
