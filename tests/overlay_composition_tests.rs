use chart_bridge::api::{
    ChartConfig, DEFAULT_PALETTE, bar, graph, heatmap, hist, line, merge_colors, merge_titles,
    overlay, scatter,
};
use chart_bridge::core::{ChartData, ChartKind, Dimensions, Edge, Node, UnifiedData};
use chart_bridge::{Chart, ChartError};
use serde_json::json;

fn line_chart(ys: Vec<f64>, label: &str, config: ChartConfig) -> Chart {
    line(ys, None, &[label], config).expect("line chart")
}

#[test]
fn line_on_line_concatenates_series_and_keeps_kind() {
    let first = line_chart(vec![1.0, 2.0], "a", ChartConfig::default());
    let second = line_chart(vec![3.0, 4.0, 5.0], "b", ChartConfig::default());

    let combined = (&first * &second).expect("overlay operator");
    assert_eq!(combined.kind(), Some(ChartKind::Line));
    let Some(ChartData::Line(series)) = combined.data() else {
        panic!("expected line data");
    };
    let names: Vec<&str> = series.iter().map(|series| series.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b"]);
    assert_eq!(series[1].len(), 3);
}

#[test]
fn overlay_result_is_independent_of_its_operands() {
    let first = line_chart(vec![1.0, 2.0], "a", ChartConfig::default());
    let second = line_chart(vec![3.0, 4.0], "b", ChartConfig::default());
    let first_before = first.data().cloned();

    let combined = overlay(&first, &second).expect("overlay");
    assert_eq!(first.data().cloned(), first_before);
    drop(first);
    drop(second);

    let Some(ChartData::Line(series)) = combined.data() else {
        panic!("expected line data");
    };
    assert_eq!(series[0].data[1].y, 2.0);
    assert_eq!(series[1].data[0].y, 3.0);
}

#[test]
fn mixed_kinds_become_composite_with_tagged_series() {
    let bars = bar(&["q1", "q2"], &[10.0, 20.0], ChartConfig::default()).expect("bar chart");
    let trend = line_chart(vec![12.0, 18.0], "trend", ChartConfig::default());

    let combined = overlay(&bars, &trend).expect("overlay");
    assert_eq!(combined.kind(), Some(ChartKind::Composite));
    let Some(ChartData::Composite(series)) = combined.data() else {
        panic!("expected composite data");
    };
    assert_eq!(series.len(), 2);
    assert_eq!(series[0].render_type, ChartKind::Bar);
    assert_eq!(series[1].render_type, ChartKind::Line);
    assert_eq!(series[1].name, "trend");

    let bar_points = series[0].points().expect("bar points");
    assert_eq!(bar_points[1].x, 1.0);
    assert_eq!(bar_points[1].y, 20.0);
    assert_eq!(bar_points[1].label.as_deref(), Some("q2"));

    let payload = serde_json::to_value(combined.data().expect("data")).expect("serialize");
    assert_eq!(payload[0]["renderType"], json!("bar"));
    assert_eq!(payload[1]["data"][0], json!({"x": 0.0, "y": 12.0}));
}

#[test]
fn histogram_overlay_carries_bin_midpoints_and_edges() {
    let histogram = hist(&[0.0, 1.0, 2.0, 3.0], 2_usize, ChartConfig::default()).expect("hist");
    let points = scatter([1.0], [2.0], &["p"], ChartConfig::default()).expect("scatter");

    let combined = overlay(&histogram, &points).expect("overlay");
    let Some(ChartData::Composite(series)) = combined.data() else {
        panic!("expected composite data");
    };
    let bins = series[0].points().expect("histogram points");
    assert_eq!(bins[0].x, 0.75);
    assert_eq!(bins[0].y, 2.0);
    assert_eq!(bins[0].bin_start, Some(0.0));
    assert_eq!(bins[0].bin_end, Some(1.5));
}

#[test]
fn composite_overlay_keeps_heatmap_and_graph_payloads() {
    let cells = heatmap(&[vec![1.0, 2.0]], None, ChartConfig::default()).expect("heatmap");
    let network = graph(
        vec![Node::rect("a", "A"), Node::rect("b", "B")],
        vec![Edge::new("a", "b")],
        None,
        ChartConfig::default(),
    )
    .expect("graph");

    let combined = overlay(&cells, &network).expect("overlay");
    let Some(ChartData::Composite(series)) = combined.data() else {
        panic!("expected composite data");
    };
    assert_eq!(series[0].render_type, ChartKind::Heatmap);
    assert_eq!(series[0].points().expect("cells")[1].value, Some(2.0));
    assert!(matches!(series[1].data, UnifiedData::Graph(_)));

    // a composite on the left extends, it does not nest
    let again = overlay(&combined, &line_chart(vec![1.0], "l", ChartConfig::default()))
        .expect("overlay composite");
    assert_eq!(again.data().map(ChartData::series_count), Some(3));
}

#[test]
fn bar_on_bar_and_histogram_on_histogram_are_rejected() {
    let first = bar(&["a"], &[1.0], ChartConfig::default()).expect("bar");
    let second = bar(&["b"], &[2.0], ChartConfig::default()).expect("bar");
    let err = overlay(&first, &second).expect_err("bar overlay must fail");
    assert!(matches!(err, ChartError::Composition(_)));

    let first = hist(&[1.0, 2.0], 2_usize, ChartConfig::default()).expect("hist");
    let second = hist(&[3.0, 4.0], 2_usize, ChartConfig::default()).expect("hist");
    let err = (&first * &second).expect_err("histogram overlay must fail");
    assert!(matches!(err, ChartError::Composition(_)));
}

#[test]
fn rendered_only_charts_cannot_be_overlaid() {
    let opaque = Chart::from_svg(
        "<svg width=\"10\" height=\"10\"></svg>",
        Dimensions::new(10, 10).expect("dims"),
    )
    .expect("opaque chart");
    let specified = line_chart(vec![1.0], "a", ChartConfig::default());

    let err = overlay(&opaque, &specified).expect_err("opaque overlay must fail");
    match err {
        ChartError::Composition(message) => {
            assert!(message.contains("structured data"), "{message}");
            assert!(message.contains("stack"), "{message}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(overlay(&specified, &opaque).is_err());
}

#[test]
fn titles_and_sizes_merge() {
    let first = line_chart(
        vec![1.0],
        "a",
        ChartConfig::new().with_title("Revenue").with_size(400, 200),
    );
    let second = line_chart(
        vec![2.0],
        "b",
        ChartConfig::new().with_title("Cost").with_size(300, 500),
    );
    let combined = overlay(&first, &second).expect("overlay");
    assert_eq!(combined.title(), Some("Revenue & Cost"));
    assert_eq!(combined.width(), Some(400));
    assert_eq!(combined.height(), Some(500));

    let untitled = line_chart(vec![3.0], "c", ChartConfig::new().with_title(""));
    let combined = overlay(&untitled, &second).expect("overlay");
    assert_eq!(combined.title(), Some("Cost"));

    let auto = line_chart(vec![3.0], "c", ChartConfig::new().auto_size());
    let combined = overlay(&auto, &auto).expect("overlay");
    assert_eq!(combined.dimensions(), None);
    assert_eq!(combined.title(), None);
}

#[test]
fn merge_titles_joins_with_ampersand() {
    assert_eq!(merge_titles(Some("A"), Some("B")).as_deref(), Some("A & B"));
    assert_eq!(merge_titles(None, Some("B")).as_deref(), Some("B"));
    assert_eq!(merge_titles(None, None), None);
}

#[test]
fn colors_continue_the_palette_across_operands() {
    let first = line(
        chart_bridge::api::ArrayInput::nested(vec![vec![1.0], vec![2.0]]),
        None,
        &["a", "b"],
        ChartConfig::default(),
    )
    .expect("two-series line");
    let second = line_chart(vec![3.0], "c", ChartConfig::new().with_colors(["#000000"]));

    let combined = overlay(&first, &second).expect("overlay");
    assert_eq!(
        combined.options().colors.as_deref(),
        Some(
            &[
                DEFAULT_PALETTE[0].to_owned(),
                DEFAULT_PALETTE[1].to_owned(),
                "#000000".to_owned()
            ][..]
        )
    );
}

#[test]
fn merge_colors_fills_defaults_at_running_index() {
    let explicit = vec!["red".to_owned()];
    let merged = merge_colors(Some(explicit.as_slice()), 1, None, 2);
    assert_eq!(merged, vec!["red", DEFAULT_PALETTE[1], DEFAULT_PALETTE[2]]);

    let merged = merge_colors(None, 8, None, 1);
    assert_eq!(merged[8], DEFAULT_PALETTE[0]);
}

#[test]
fn first_operand_wins_option_conflicts() {
    let first = line_chart(
        vec![1.0],
        "a",
        ChartConfig::new()
            .with_x_label("time")
            .with_option("curve", "step"),
    );
    let second = line_chart(
        vec![2.0],
        "b",
        ChartConfig::new()
            .with_x_label("ignored")
            .with_y_label("value")
            .with_option("curve", "linear")
            .with_option("grid", true),
    );
    let combined = overlay(&first, &second).expect("overlay");
    let options = combined.options();
    assert_eq!(options.x_label.as_deref(), Some("time"));
    assert_eq!(options.y_label.as_deref(), Some("value"));
    assert_eq!(options.extra.get("curve"), Some(&json!("step")));
    assert_eq!(options.extra.get("grid"), Some(&json!(true)));
}
