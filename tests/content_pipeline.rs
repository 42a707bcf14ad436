//! End-to-end exercise of the content toolkit against one site repository:
//! mirror the tree, bulk-edit a collection, then audit the result.

use content_ops::config::ToolConfig;
use content_ops::{audit, collections, sync, translations};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_file(root: &Path, relative: &str, contents: &str) -> PathBuf {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, contents).unwrap();
    path
}

fn seed_site(root: &Path) {
    for locale in ["en", "pt", "es"] {
        write_file(
            root,
            &format!("content/pages/{locale}/about.md"),
            "---\nmetaTitle: About\nmetaDescription: The story\nstatus: published\n---\n# About\n",
        );
    }
    write_file(
        root,
        "content/products/index.json",
        r#"{
  "items": [
    {"id": "argan-oil", "status": "draft"},
    {"id": "hand-balm", "status": "draft"}
  ]
}
"#,
    );
    write_file(root, "content/articles/index.json", "{\"items\": []}\n");
    write_file(root, "content/courses.json", "{\"courses\": []}\n");
    write_file(root, "content/videos.json", "{\"videos\": []}\n");
    write_file(root, "content/training.json", "{\"trainings\": []}\n");
    write_file(root, "content/uploads/hero.jpg", "jpeg bytes");
}

#[test]
fn sync_then_edit_then_audit() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    let config = ToolConfig::default();
    seed_site(root);

    // Mirror content into both targets.
    let report = sync::sync_all(root, &config).unwrap();
    assert_eq!(report.targets.len(), 2);
    assert!(root.join("public/content/uploads/hero.jpg").is_file());
    assert!(root.join("site/content/uploads/README.txt").is_file());

    // Publish one product.
    let spec = collections::resolve(&config, "products").unwrap();
    let path = collections::file_path(root, spec);
    let outcome = collections::apply_update(
        &path,
        &spec.key,
        &collections::StatusUpdate {
            status: "published".to_string(),
            publish_at: Some("2026-09-01T00:00:00Z".to_string()),
            unpublish_at: None,
            ids: Some(vec!["argan-oil".to_string()]),
        },
    )
    .unwrap();
    assert_eq!(outcome, collections::UpdateOutcome::Updated(1));

    // The audit sees the edit; the synced mirror still holds the old state
    // until the next sync, which is exactly why sync runs per build.
    let run = audit::run(root, &config).unwrap();
    assert!(run.warnings.is_empty());
    assert_eq!(run.report.totals.pages, 3);

    let argan = run
        .report
        .collections
        .iter()
        .find(|c| c.id.as_deref() == Some("argan-oil"))
        .unwrap();
    assert_eq!(argan.status, "published");
    assert_eq!(argan.scheduling["publishAt"], "2026-09-01T00:00:00Z");

    let written = audit::write_report(root, &config, &run.report).unwrap();
    assert!(written.is_file());

    // Translations are complete in the seeded site.
    assert!(translations::check(root, &config).unwrap().is_empty());
}
