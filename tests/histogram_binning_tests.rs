use approx::assert_relative_eq;
use chart_bridge::ChartError;
use chart_bridge::api::{ChartConfig, hist};
use chart_bridge::core::{BinSpec, ChartData, HistogramBin, build_histogram, histogram_edges};

fn bins_of(chart: &chart_bridge::Chart) -> &[HistogramBin] {
    match chart.data() {
        Some(ChartData::Histogram(bins)) => bins.as_slice(),
        other => panic!("expected histogram data, got {other:?}"),
    }
}

#[test]
fn equal_width_bins_span_min_to_max() {
    let chart = hist(&[0.0, 1.0, 2.0, 3.0, 4.0], 4_usize, ChartConfig::default()).expect("histogram");
    let bins = bins_of(&chart);

    assert_eq!(bins.len(), 4);
    assert_relative_eq!(bins[0].bin_start, 0.0);
    assert_relative_eq!(bins[3].bin_end, 4.0);
    for bin in bins {
        assert_relative_eq!(bin.width(), 1.0, epsilon = 1e-12);
    }
    let counts: Vec<u64> = bins.iter().map(|bin| bin.count).collect();
    // the maximum lands in the closed last bin
    assert_eq!(counts, vec![1, 1, 1, 2]);
}

#[test]
fn default_bin_count_is_twenty() {
    let values: Vec<f64> = (0..100).map(f64::from).collect();
    let chart = hist(&values, BinSpec::default(), ChartConfig::default()).expect("histogram");
    assert_eq!(bins_of(&chart).len(), 20);
    assert_eq!(bins_of(&chart).iter().map(|bin| bin.count).sum::<u64>(), 100);
}

#[test]
fn identical_values_yield_one_unit_bin() {
    let bins = build_histogram(&[5.0, 5.0, 5.0], &BinSpec::Count(10)).expect("bins");
    assert_eq!(
        bins,
        vec![HistogramBin {
            bin_start: 4.5,
            bin_end: 5.5,
            count: 3,
        }]
    );
}

#[test]
fn explicit_edges_define_bins_and_drop_outside_values() {
    let edges = vec![0.0, 10.0, 20.0];
    let chart = hist(&[-1.0, 0.0, 5.0, 10.0, 20.0, 25.0], edges, ChartConfig::default())
        .expect("histogram");
    let bins = bins_of(&chart);

    assert_eq!(bins.len(), 2);
    assert_eq!(bins[0].count, 2);
    assert_eq!(bins[1].count, 2);
    assert_eq!(bins.iter().map(|bin| bin.count).sum::<u64>(), 4);
}

#[test]
fn invalid_bin_specs_are_rejected() {
    let err = hist(&[1.0, 2.0], 0_usize, ChartConfig::default()).expect_err("zero bins must fail");
    assert!(matches!(err, ChartError::Validation(_)));

    let err = histogram_edges(&[1.0], &BinSpec::Edges(vec![1.0])).expect_err("single edge");
    assert!(err.to_string().contains("at least 2"), "{err}");

    let err = histogram_edges(&[1.0], &BinSpec::Edges(vec![0.0, 2.0, 2.0]))
        .expect_err("repeated edge must fail");
    assert!(err.to_string().contains("strictly increasing"), "{err}");

    let err = histogram_edges(&[1.0], &BinSpec::Edges(vec![0.0, f64::INFINITY]))
        .expect_err("infinite edge must fail");
    assert!(matches!(err, ChartError::Validation(_)));
}

#[test]
fn empty_or_non_finite_values_are_rejected() {
    let empty: [f64; 0] = [];
    assert!(matches!(
        hist(&empty, 5_usize, ChartConfig::default()),
        Err(ChartError::Validation(_))
    ));
    assert!(matches!(
        hist(&[1.0, f64::NAN], 5_usize, ChartConfig::default()),
        Err(ChartError::Validation(_))
    ));
}

#[test]
fn integer_samples_bin_like_floats() {
    let chart = hist(&[1_i64, 2, 2, 3], 2_usize, ChartConfig::default()).expect("histogram");
    let bins = bins_of(&chart);
    assert_relative_eq!(bins[0].bin_end, 2.0);
    assert_eq!(bins[0].count, 1);
    assert_eq!(bins[1].count, 3);
}

#[test]
fn narrow_range_at_large_magnitude_uses_fewer_bins() {
    let values = [1e16, 1e16 + 2.0];
    let edges = histogram_edges(&values, &BinSpec::Count(4)).expect("edges");
    assert_eq!(edges.first().copied(), Some(1e16));
    assert_eq!(edges.last().copied(), Some(1e16 + 2.0));
    assert!(edges.windows(2).all(|pair| pair[0] < pair[1]), "{edges:?}");
    assert!(edges.len() <= 5);

    let bins = build_histogram(&values, &BinSpec::Count(4)).expect("bins");
    assert_eq!(bins.iter().map(|bin| bin.count).sum::<u64>(), 2);
}
