//! Configuration loading, saving and registry construction tests

use ar_face_filters::{
    config::{AnchorConfig, Config, FilterEntry, FilterKindConfig, EXAMPLE_CONFIG},
    filters::FilterKind,
    Error,
};
use image::{Rgba, RgbaImage};
use std::path::PathBuf;

#[test]
fn test_round_trip_through_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");

    let mut config = Config::example().unwrap();
    config.display.show_mesh = true;
    config.source.input_dir = Some(PathBuf::from("frames"));
    config.to_file(&path).unwrap();

    let loaded = Config::from_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_empty_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.yaml");
    std::fs::write(&path, "{}\n").unwrap();

    let config = Config::from_file(&path).unwrap();
    assert_eq!(config, Config::default());
    assert!(config.filters.is_empty());
    assert!(config.build_registry().unwrap().is_empty());
}

#[test]
fn test_missing_file_is_io_error() {
    assert!(matches!(Config::from_file("no/such/config.yaml"), Err(Error::Io(_))));
}

#[test]
fn test_example_text_is_bundled() {
    assert!(EXAMPLE_CONFIG.contains("type: pose_axes"));
    assert!(EXAMPLE_CONFIG.contains("anchor: mustache"));
}

#[test]
fn test_registry_loads_assets_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.png");
    let second = dir.path().join("second.png");
    RgbaImage::from_pixel(20, 10, Rgba([255, 0, 0, 128])).save(&first).unwrap();
    RgbaImage::from_pixel(30, 10, Rgba([0, 0, 255, 255])).save(&second).unwrap();

    let config = Config {
        filters: vec![FilterEntry {
            name: "mustache".to_string(),
            enabled: true,
            z_order: 0,
            kind: FilterKindConfig::Overlay {
                assets: vec![first.clone(), dir.path().join("missing.png"), second],
                scale: 1.0,
                offset_x: 0,
                offset_y: 0,
                anchor: AnchorConfig::Mustache,
            },
        }],
        ..Config::default()
    };

    let mut registry = config.build_registry().unwrap();
    let FilterKind::Overlay(filter) = registry.get("mustache").unwrap().kind() else {
        panic!("expected an overlay unit");
    };
    assert_eq!(filter.asset().variant_count(), 2);
    assert_eq!(filter.asset().active_path(), Some(first.as_path()));
    assert!(filter.asset().active().unwrap().has_alpha());

    assert_eq!(registry.next_asset("mustache"), Some(1));
    assert_eq!(registry.next_asset("mustache"), Some(0));
}

#[test]
fn test_invalid_scale_fails_registry_build() {
    let yaml = r#"
filters:
  - name: tiny
    type: overlay
    assets: ["a.png"]
    scale: 0.05
"#;
    let config = Config::from_yaml(yaml).unwrap();
    assert!(matches!(config.build_registry(), Err(Error::InvalidScale { .. })));
}
