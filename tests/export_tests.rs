use std::fs;
use std::sync::Arc;

use approx::assert_relative_eq;
use chart_bridge::ChartError;
use chart_bridge::api::{
    ChartConfig, ChartContext, MAX_CANVAS_PX, RasterOptions, RasterRequest, bar, line,
};
use chart_bridge::render::{NullGateway, PNG_SIGNATURE};

fn context() -> (Arc<NullGateway>, ChartContext) {
    let gateway = Arc::new(NullGateway::new());
    (gateway.clone(), ChartContext::with_shared_gateway(gateway))
}

#[test]
fn save_svg_writes_the_rendered_markup() {
    let (_, context) = context();
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("chart.svg");
    let chart = bar(&["a"], &[1.0], ChartConfig::default()).expect("bar");

    context.save(&chart, &path).expect("save svg");
    let written = fs::read_to_string(&path).expect("read svg");
    assert_eq!(written, context.svg(&chart).expect("svg"));
}

#[test]
fn save_png_rasterizes_through_the_gateway() {
    let (gateway, context) = context();
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("chart.PNG");
    let chart = line(vec![1.0, 2.0], None, &[], ChartConfig::default()).expect("line");

    context
        .save_with(&chart, &path, RasterOptions::Scale(2.0))
        .expect("save png");
    assert_eq!(fs::read(&path).expect("read png"), PNG_SIGNATURE.to_vec());
    assert_eq!(gateway.rasterize_calls(), 1);
    assert_eq!(gateway.render_calls(), 1);
}

#[test]
fn unsupported_extensions_are_rejected_without_rendering() {
    let (gateway, context) = context();
    let dir = tempfile::tempdir().expect("tempdir");
    let chart = bar(&["a"], &[1.0], ChartConfig::default()).expect("bar");

    let err = context
        .save(&chart, dir.path().join("chart.jpg"))
        .expect_err("jpg must fail");
    match err {
        ChartError::Export(message) => assert!(message.contains("'.jpg'"), "{message}"),
        other => panic!("unexpected error: {other:?}"),
    }

    let err = context
        .save(&chart, dir.path().join("chart"))
        .expect_err("missing extension must fail");
    assert!(matches!(err, ChartError::Export(_)));
    assert_eq!(gateway.render_calls(), 0);
}

#[test]
fn write_failures_surface_as_io_errors_with_the_path() {
    let (_, context) = context();
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("missing").join("chart.svg");
    let chart = bar(&["a"], &[1.0], ChartConfig::default()).expect("bar");

    let err = context.save(&chart, &path).expect_err("missing dir must fail");
    match err {
        ChartError::Io { path: failed, .. } => assert_eq!(failed, path),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn png_canvas_limit_suggests_svg() {
    let (gateway, context) = context();
    let chart = bar(&["a"], &[1.0], ChartConfig::new().with_size(320, 240)).expect("bar");
    let too_big = f64::from(MAX_CANVAS_PX) / 320.0 + 1.0;

    let err = context
        .png(&chart, RasterOptions::Scale(too_big))
        .expect_err("oversized canvas must fail");
    match err {
        ChartError::Export(message) => assert!(message.contains(".svg"), "{message}"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(gateway.rasterize_calls(), 0);

    let bytes = context
        .png(&chart, RasterOptions::Dpi(192.0))
        .expect("png at 2x");
    assert!(bytes.starts_with(&PNG_SIGNATURE));
}

#[test]
fn raster_options_are_exclusive_and_positive() {
    let err = RasterOptions::from_parts(Some(2.0), Some(300.0)).expect_err("both set must fail");
    assert!(matches!(err, ChartError::Validation(_)));

    assert_eq!(
        RasterOptions::from_parts(None, None).expect("default"),
        RasterOptions::Scale(1.0)
    );
    assert_relative_eq!(
        RasterOptions::from_parts(None, Some(288.0))
            .expect("dpi")
            .effective_scale(),
        3.0
    );
    assert!(RasterOptions::from_parts(Some(0.0), None).is_err());
    assert!(RasterOptions::Scale(f64::NAN).validate().is_err());
}

#[test]
fn raster_request_flattens_the_resolution_knob() {
    let request = RasterRequest {
        svg: "<svg/>",
        options: RasterOptions::Dpi(150.0),
    };
    let payload: serde_json::Value =
        serde_json::from_str(&request.to_json().expect("json")).expect("parse");
    assert_eq!(payload, serde_json::json!({"svg": "<svg/>", "dpi": 150.0}));
}
