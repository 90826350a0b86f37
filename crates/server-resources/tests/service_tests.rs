//! End-to-end tests for the resource service over real files.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use server_resources::prelude::*;
use server_resources::{Error, SvgError};

const BASE_ICON: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 32 32"><g><path fill="#212121" d="M2 2h28v28H2z"/></g></svg>"##;
const BADGE_ICON: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="16px" height="16px"><g><circle fill="#e8f3fc" cx="8" cy="8" r="6"/></g></svg>"##;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("server_resources=debug")
        .with_test_writer()
        .try_init();
}

fn fast() -> RetryPolicy {
    RetryPolicy::new(3, 0)
}

fn write_archive(path: &Path, entries: &[(&str, &[u8])]) {
    let mut writer = ContainerWriter::new();
    for (name, data) in entries {
        writer.add(*name, data.to_vec());
    }
    writer.write_to_file(path).unwrap();
}

#[test]
fn test_archive_and_directory_sources() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("ServerResources.bin");
    write_archive(
        &archive,
        &[
            ("Icons/Save-16x16.png", b"archive small"),
            ("Icons/Save-32x32.png", b"archive large"),
        ],
    );

    let loose = dir.path().join("loose");
    fs::create_dir_all(loose.join("icons")).unwrap();
    fs::write(loose.join("icons/save-16x16.png"), b"loose small").unwrap();
    fs::write(loose.join("icons/save-24x24.png"), b"loose medium").unwrap();

    let config = ResourceConfig::default()
        .with_archive(&archive)
        .with_directory(&loose)
        .with_retry(fast());
    let service = ResourceService::open(config).unwrap();
    assert!(service.is_loaded());

    // Archive entries are consulted first.
    assert_eq!(
        &service.bytes("icons/save", None, Some(SizeType::Small)).unwrap()[..],
        b"archive small"
    );
    assert_eq!(
        &service.bytes("icons/save", None, Some(SizeType::Medium)).unwrap()[..],
        b"loose medium"
    );
    assert_eq!(
        service.resource_names(Some("PNG")),
        vec![
            "icons/save-16x16.png",
            "icons/save-24x24.png",
            "icons/save-32x32.png"
        ]
    );
    assert!(service.resource_names(Some(".svg")).is_empty());

    let pack = service.try_get_resource("ICONS\\SAVE.png", false).into_pack().unwrap();
    assert_eq!(pack.key(), "icons/save");
    assert_eq!(pack.len(), 3);
}

#[test]
fn test_repeated_resolution_reads_once() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("docs")).unwrap();
    let file = dir.path().join("docs/readme.xml");
    fs::write(&file, b"<readme/>").unwrap();

    let config = ResourceConfig::default().with_directory(dir.path()).with_retry(fast());
    let service = ResourceService::open(config).unwrap();

    let first = service.try_get_item("Docs\\ReadMe.xml", true, None, None).unwrap();
    let second = service.try_get_item("docs/readme.xml", false, None, None).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert!(!first.content().is_loaded());

    assert_eq!(&first.load().unwrap()[..], b"<readme/>");
    fs::remove_file(&file).unwrap();
    assert_eq!(&second.load().unwrap()[..], b"<readme/>");
    assert!(second.exists());
}

#[test]
fn test_reload_swaps_generation() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("ServerResources.bin");
    write_archive(&archive, &[("icons/old.png", b"old")]);

    let service =
        ResourceService::open(ResourceConfig::default().with_archive(&archive).with_retry(fast()))
            .unwrap();
    let before = service.index();
    assert!(service.contains_resource("icons/old.png", true));

    write_archive(&archive, &[("icons/new.png", b"new")]);
    service.reload();

    assert!(service.contains_resource("icons/new.png", true));
    assert!(!service.contains_resource("icons/old.png", true));
    // Readers holding the previous generation keep a consistent view.
    assert!(before.contains("icons/old.png", true));
    assert!(!before.contains("icons/new.png", true));
}

#[test]
fn test_malformed_archive_leaves_service_unloaded() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("ServerResources.bin");
    fs::write(&archive, b"definitely not a resource container").unwrap();

    let service =
        ResourceService::open(ResourceConfig::default().with_archive(&archive).with_retry(fast()))
            .unwrap();
    assert!(!service.is_loaded());
    assert!(service.resource_names(None).is_empty());
    assert!(matches!(service.try_get_resource("anything", false), Resolved::NotFound));
}

#[test]
fn test_missing_archive_is_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = ResourceConfig::default()
        .with_archive(dir.path().join("ServerResources.bin"))
        .with_retry(fast());
    let service = ResourceService::open(config).unwrap();
    assert!(!service.is_loaded());
}

#[test]
fn test_theme_switch_invalidates_images() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("ServerResources.bin");
    write_archive(&archive, &[("overlay/base-32x32.svg", BASE_ICON.as_bytes())]);

    let service =
        ResourceService::open(ResourceConfig::default().with_archive(&archive).with_retry(fast()))
            .unwrap();

    let light = service.vector_image("overlay/base", Some(32)).unwrap().unwrap();
    let light_again = service.vector_image("overlay/base", Some(32)).unwrap().unwrap();
    assert!(Arc::ptr_eq(&light, &light_again));
    assert_eq!(light.text(), BASE_ICON);

    service.set_color_scheme(ColorScheme::Dark);
    assert_eq!(service.color_scheme(), ColorScheme::Dark);
    let dark = service.vector_image("overlay/base", Some(32)).unwrap().unwrap();
    assert!(!Arc::ptr_eq(&light, &dark));
    assert!(dark.text().contains(r##"fill="#d6d6d6""##));

    service.set_color_scheme(ColorScheme::Light);
    let light_later = service.vector_image("overlay/base", Some(32)).unwrap().unwrap();
    assert_eq!(light_later.text(), BASE_ICON);
}

#[test]
fn test_compose_through_service() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("ServerResources.bin");
    write_archive(
        &archive,
        &[
            ("overlay/base-32x32.svg", BASE_ICON.as_bytes()),
            ("overlay/badge-16x16.svg", BADGE_ICON.as_bytes()),
        ],
    );

    let service =
        ResourceService::open(ResourceConfig::default().with_archive(&archive).with_retry(fast()))
            .unwrap();
    let descriptor = service
        .new_composition()
        .place("overlay/base", Rect::new(0.0, 0.0, 120.0, 120.0))
        .place("overlay/badge", Rect::new(60.0, 60.0, 60.0, 60.0));

    let image = service.compose(&descriptor).unwrap();
    let text = image.text();
    assert!(text.contains(r#"width="120""#));
    assert!(text.contains(r#"<g transform="translate(0,0) scale(3.75)">"#));
    assert!(text.contains(r#"<g transform="translate(60,60) scale(3.75)">"#));
    assert!(text.contains("#212121"));

    service.set_color_scheme(ColorScheme::Dark);
    let dark = service.compose(&descriptor).unwrap();
    assert!(dark.text().contains("#d6d6d6"));
    assert!(!dark.text().contains("#212121"));
}

#[test]
fn test_compose_missing_child() {
    let service = ResourceService::with_sources(ResourceConfig::default(), Vec::new()).unwrap();
    let descriptor = service
        .new_composition()
        .place("overlay/absent", Rect::new(0.0, 0.0, 60.0, 60.0));
    assert!(matches!(
        service.compose(&descriptor),
        Err(Error::Svg(SvgError::MissingImage { .. }))
    ));
}

#[test]
fn test_palette_file_from_config() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("palette.toml"),
        "near_black = \"#212121\"\nnear_black_replacement = \"#eeeeee\"\n",
    )
    .unwrap();
    let archive = dir.path().join("ServerResources.bin");
    write_archive(&archive, &[("overlay/base-32x32.svg", BASE_ICON.as_bytes())]);
    fs::write(
        dir.path().join("resources.toml"),
        "archives = [\"ServerResources.bin\"]\npalette = \"palette.toml\"\ncolor_scheme = \"dark\"\n\n[retry]\ndelay_ms = 0\n",
    )
    .unwrap();

    let config = ResourceConfig::from_toml_file(dir.path().join("resources.toml")).unwrap();
    let service = ResourceService::open(config).unwrap();
    assert_eq!(service.palette().near_black_replacement, "#eeeeee");

    let dark = service.vector_image("overlay/base", None).unwrap().unwrap();
    assert!(dark.text().contains(r##"fill="#eeeeee""##));
}
