/*!
 * End-to-end tests for the catalog translation workflow
 */

use anyhow::Result;
use polib::message::MessageView;
use polib::po_file;
use std::path::Path;

use crate::common::{create_temp_dir, create_test_file, po_content, service_with, test_config};
use transcorpus::app_controller::Controller;
use transcorpus::providers::mock::MockEngine;

fn msgstr_of(path: &Path, msgid: &str) -> String {
    let catalog = po_file::parse(path).unwrap();
    catalog
        .messages()
        .find(|m| m.msgid() == msgid)
        .map(|m| m.msgstr().unwrap().to_string())
        .unwrap()
}

/// Multi-language mode discovers every declared target and processes each
#[tokio::test]
async fn test_runCatalogs_withoutTarget_shouldProcessAllDiscoveredLanguages() -> Result<()> {
    let root = create_temp_dir()?;
    let fr_path = create_test_file(
        &root.path().join("locale/fr"),
        "messages.po",
        &po_content(Some("fr"), None, &[("hello", "")]),
    )?;
    let es_path = create_test_file(
        &root.path().join("locale/es"),
        "messages.po",
        &po_content(Some("es"), None, &[("hello", "")]),
    )?;

    let mut config = test_config();
    config.source_language = "eng".to_string();
    let controller = Controller::with_service(
        config.clone(),
        service_with(MockEngine::prefixing(), &config),
    );

    let stats = controller.run_catalogs(root.path(), None, false).await?;

    assert_eq!(stats.languages.len(), 2);
    assert_eq!(stats.entries_translated(), 2);
    assert_eq!(stats.catalogs_processed(), 2);
    assert_eq!(stats.catalogs_skipped(), 0);

    // Each catalog was translated towards its own language
    assert_eq!(msgstr_of(&fr_path, "hello"), "[fr] hello");
    assert_eq!(msgstr_of(&es_path, "hello"), "[es] hello");
    Ok(())
}

/// Requesting fr over a tree whose fr-named catalog declares es skips it
#[tokio::test]
async fn test_runCatalogs_withMismatchedMetadata_shouldSkipAndCountIt() -> Result<()> {
    let root = create_temp_dir()?;
    create_test_file(
        &root.path().join("locale/fr"),
        "messages.po",
        &po_content(Some("es"), None, &[("hello", "")]),
    )?;

    let config = test_config();
    let controller = Controller::with_service(
        config.clone(),
        service_with(MockEngine::prefixing(), &config),
    );

    let stats = controller
        .run_catalogs(root.path(), Some("fr"), false)
        .await?;

    assert_eq!(stats.entries_translated(), 0);
    assert_eq!(stats.catalogs_processed(), 0);
    assert_eq!(stats.catalogs_skipped(), 1);
    Ok(())
}

/// Catalogs already fully translated are counted as skips, not failures
#[tokio::test]
async fn test_runCatalogs_withFullyTranslatedCatalog_shouldCountAsSkip() -> Result<()> {
    let root = create_temp_dir()?;
    create_test_file(
        &root.path().join("fr"),
        "messages.po",
        &po_content(Some("fr"), None, &[("hello", "bonjour")]),
    )?;

    let config = test_config();
    let controller = Controller::with_service(
        config.clone(),
        service_with(MockEngine::prefixing(), &config),
    );

    let stats = controller
        .run_catalogs(root.path(), Some("fr"), false)
        .await?;

    assert_eq!(stats.catalogs_processed(), 0);
    assert_eq!(stats.catalogs_skipped(), 1);
    Ok(())
}

/// The Language-Team fallback is enough to match a catalog to its target
#[tokio::test]
async fn test_runCatalogs_withTeamHeaderOnly_shouldMatchViaFallback() -> Result<()> {
    let root = create_temp_dir()?;
    let path = create_test_file(
        &root.path().join("fr"),
        "messages.po",
        &po_content(None, Some("French <traduc@traduc.org>"), &[("hello", "")]),
    )?;

    let config = test_config();
    let controller = Controller::with_service(
        config.clone(),
        service_with(MockEngine::prefixing(), &config),
    );

    let stats = controller
        .run_catalogs(root.path(), Some("fr"), false)
        .await?;

    assert_eq!(stats.catalogs_processed(), 1);
    assert_eq!(msgstr_of(&path, "hello"), "[fr] hello");
    Ok(())
}
