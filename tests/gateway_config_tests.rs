use std::fs;
use std::path::Path;
use std::time::Duration;

use chart_bridge::ChartError;
use chart_bridge::core::ChartKind;
use chart_bridge::render::{
    GatewayConfig, LAYOUT_SCRIPT, RASTERIZE_SCRIPT, REQUIRED_SCRIPTS, discover_scripts_dir,
    script_for_kind,
};

fn install_scripts(dir: &Path) {
    fs::create_dir_all(dir).expect("create scripts dir");
    for script in REQUIRED_SCRIPTS {
        fs::write(dir.join(script), "// chart script\n").expect("write script");
    }
}

#[test]
fn defaults_target_deno_with_a_thirty_second_timeout() {
    let config = GatewayConfig::default();
    assert_eq!(config.runtime, Path::new("deno"));
    assert_eq!(config.runtime_args, vec!["run", "--allow-all"]);
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert_eq!(config.scripts_dir, None);
    assert_eq!(config.max_argv_payload, 64 * 1024);
    config.validate().expect("defaults are valid");
}

#[test]
fn zero_timeouts_and_empty_runtime_are_invalid() {
    let err = GatewayConfig::default()
        .with_timeout(Duration::ZERO)
        .validate()
        .expect_err("zero timeout must fail");
    assert!(matches!(err, ChartError::Validation(_)));

    assert!(GatewayConfig::default().with_runtime("").validate().is_err());
}

#[test]
fn every_kind_maps_to_its_own_script() {
    let mut scripts: Vec<&str> = ChartKind::ALL.iter().map(|kind| script_for_kind(*kind)).collect();
    scripts.push(LAYOUT_SCRIPT);
    scripts.push(RASTERIZE_SCRIPT);
    let total = scripts.len();
    scripts.sort_unstable();
    scripts.dedup();
    assert_eq!(scripts.len(), total);
    assert_eq!(script_for_kind(ChartKind::Bar), "BarChart.ts");
}

#[test]
fn discovery_accepts_the_start_dir_or_its_charts_subdir() {
    let root = tempfile::tempdir().expect("tempdir");
    install_scripts(root.path());
    assert_eq!(discover_scripts_dir(root.path()), Some(root.path().to_path_buf()));

    let nested = tempfile::tempdir().expect("tempdir");
    let charts = nested.path().join("charts");
    install_scripts(&charts);
    assert_eq!(discover_scripts_dir(nested.path()), Some(charts));
}

#[test]
fn discovery_walks_up_to_the_project_marker() {
    let project = tempfile::tempdir().expect("tempdir");
    fs::write(project.path().join("environment.yml"), "name: charts\n").expect("marker");
    let scripts = project.path().join("src").join("viz").join("charts");
    install_scripts(&scripts);
    let notebooks = project.path().join("notebooks").join("deep");
    fs::create_dir_all(&notebooks).expect("notebooks dir");

    assert_eq!(discover_scripts_dir(&notebooks), Some(scripts));
}

#[test]
fn discovery_falls_back_to_a_sibling_source_tree() {
    let project = tempfile::tempdir().expect("tempdir");
    let scripts = project.path().join("src").join("viz");
    install_scripts(&scripts);
    let start = project.path().join("notebooks");
    fs::create_dir_all(&start).expect("start dir");

    assert_eq!(discover_scripts_dir(&start), Some(scripts));
}

#[test]
fn incomplete_script_sets_are_not_discovered() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("BarChart.ts"), "").expect("write script");
    assert_eq!(discover_scripts_dir(dir.path()), None);
}

#[test]
fn configured_scripts_dir_must_exist() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = GatewayConfig::default().with_scripts_dir(dir.path().join("absent"));
    let err = config.resolve_scripts_dir().expect_err("absent dir must fail");
    assert!(matches!(err, ChartError::GatewayUnavailable(_)));

    let config = GatewayConfig::default().with_scripts_dir(dir.path());
    let err = config.resolve_scripts_dir().expect_err("empty dir must fail");
    assert!(err.to_string().contains("BarChart.ts"), "{err}");

    install_scripts(dir.path());
    assert_eq!(
        config.resolve_scripts_dir().expect("existing dir"),
        dir.path().to_path_buf()
    );
}
