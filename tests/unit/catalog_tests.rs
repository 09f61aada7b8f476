/*!
 * Tests for catalog translation management
 */

use anyhow::Result;
use polib::message::MessageView;
use polib::po_file;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use crate::common::{create_temp_dir, create_test_file, po_content, service_with, test_config};
use transcorpus::catalog::{
    CatalogOutcome, CatalogTranslator, SkipReason, catalog_files_for_target, declared_language,
    discover_target_languages,
};
use transcorpus::providers::mock::MockEngine;

fn msgstr_by_msgid(path: &Path) -> HashMap<String, String> {
    let catalog = po_file::parse(path).unwrap();
    catalog
        .messages()
        .map(|m| (m.msgid().to_string(), m.msgstr().unwrap().to_string()))
        .collect()
}

/// The Language header is authoritative for the declared language
#[test]
fn test_declaredLanguage_withLanguageHeader_shouldUseIt() -> Result<()> {
    let dir = create_temp_dir()?;
    let path = create_test_file(
        dir.path(),
        "messages.po",
        &po_content(Some("fr"), Some("Spanish <es@example.org>"), &[("hello", "")]),
    )?;

    let catalog = po_file::parse(&path).unwrap();
    assert_eq!(declared_language(&catalog).as_deref(), Some("fr"));
    Ok(())
}

/// Without a Language header the Language-Team name is the fallback
#[test]
fn test_declaredLanguage_withOnlyTeamHeader_shouldParseTeamName() -> Result<()> {
    let dir = create_temp_dir()?;
    let path = create_test_file(
        dir.path(),
        "messages.po",
        &po_content(None, Some("French <traduc@traduc.org>"), &[("hello", "")]),
    )?;

    let catalog = po_file::parse(&path).unwrap();
    assert_eq!(declared_language(&catalog).as_deref(), Some("French"));
    Ok(())
}

/// Neither header present means no declared language
#[test]
fn test_declaredLanguage_withNoHeaders_shouldReturnNone() -> Result<()> {
    let dir = create_temp_dir()?;
    let path = create_test_file(
        dir.path(),
        "messages.po",
        &po_content(None, None, &[("hello", "")]),
    )?;

    let catalog = po_file::parse(&path).unwrap();
    assert_eq!(declared_language(&catalog), None);
    Ok(())
}

/// Catalogs are located by the literal short-code path component
#[test]
fn test_catalogFilesForTarget_withLocaleTree_shouldMatchShortCodeDirs() -> Result<()> {
    let dir = create_temp_dir()?;
    let content = po_content(Some("fr"), None, &[("hello", "")]);
    create_test_file(&dir.path().join("locale/fr"), "messages.po", &content)?;
    create_test_file(&dir.path().join("locale/es"), "messages.po", &content)?;
    create_test_file(&dir.path().join("fr"), "extra.po", &content)?;
    create_test_file(&dir.path().join("docs"), "notes.po", &content)?;

    let files = catalog_files_for_target(dir.path(), "fra")?;

    assert_eq!(files.len(), 2);
    assert!(files.iter().all(|f| {
        f.components()
            .any(|c| c.as_os_str().to_string_lossy() == "fr")
    }));
    Ok(())
}

/// Default mode fills only untranslated entries
#[tokio::test]
async fn test_translateCatalog_withUntranslatedEntries_shouldFillOnlyThose() -> Result<()> {
    let dir = create_temp_dir()?;
    let path = create_test_file(
        dir.path(),
        "messages.po",
        &po_content(Some("fr"), None, &[("hello", ""), ("world", "monde")]),
    )?;

    let config = test_config();
    let service = service_with(MockEngine::mapping([("hello", "bonjour")]), &config);
    let translator =
        CatalogTranslator::new(&service, "eng", false, Arc::new(AtomicBool::new(false)));

    let outcome = translator.translate_catalog(&path, "fr").await?;

    assert_eq!(outcome, CatalogOutcome::Translated(1));
    let entries = msgstr_by_msgid(&path);
    assert_eq!(entries["hello"], "bonjour");
    assert_eq!(entries["world"], "monde");
    Ok(())
}

/// A second non-force run over the same catalog selects nothing
#[tokio::test]
async fn test_translateCatalog_runTwice_shouldBeNoOpSecondTime() -> Result<()> {
    let dir = create_temp_dir()?;
    let path = create_test_file(
        dir.path(),
        "messages.po",
        &po_content(Some("fr"), None, &[("hello", "")]),
    )?;

    let config = test_config();
    let service = service_with(MockEngine::mapping([("hello", "bonjour")]), &config);
    let translator =
        CatalogTranslator::new(&service, "eng", false, Arc::new(AtomicBool::new(false)));

    let first = translator.translate_catalog(&path, "fr").await?;
    let second = translator.translate_catalog(&path, "fr").await?;

    assert_eq!(first, CatalogOutcome::Translated(1));
    assert_eq!(
        second,
        CatalogOutcome::Skipped(SkipReason::NothingToTranslate)
    );
    assert_eq!(msgstr_by_msgid(&path)["hello"], "bonjour");
    Ok(())
}

/// A declared language that does not match the target skips the catalog
#[tokio::test]
async fn test_translateCatalog_withLanguageMismatch_shouldSkipUntouched() -> Result<()> {
    let dir = create_temp_dir()?;
    let content = po_content(Some("es"), None, &[("hello", "")]);
    let path = create_test_file(dir.path(), "messages.po", &content)?;
    let before = std::fs::read_to_string(&path)?;

    let config = test_config();
    let service = service_with(MockEngine::mapping([("hello", "bonjour")]), &config);
    let translator =
        CatalogTranslator::new(&service, "eng", false, Arc::new(AtomicBool::new(false)));

    let outcome = translator.translate_catalog(&path, "fr").await?;

    assert_eq!(outcome, CatalogOutcome::Skipped(SkipReason::LanguageMismatch));
    assert_eq!(std::fs::read_to_string(&path)?, before);
    Ok(())
}

/// An absent language declaration means "do not translate"
#[tokio::test]
async fn test_translateCatalog_withNoLanguageMetadata_shouldSkip() -> Result<()> {
    let dir = create_temp_dir()?;
    let path = create_test_file(
        dir.path(),
        "messages.po",
        &po_content(None, None, &[("hello", "")]),
    )?;

    let config = test_config();
    let service = service_with(MockEngine::identity(), &config);
    let translator =
        CatalogTranslator::new(&service, "eng", false, Arc::new(AtomicBool::new(false)));

    let outcome = translator.translate_catalog(&path, "fr").await?;

    assert_eq!(outcome, CatalogOutcome::Skipped(SkipReason::NoLanguage));
    Ok(())
}

/// Force mode overwrites an existing msgstr
#[tokio::test]
async fn test_translateCatalog_withForce_shouldOverwriteExisting() -> Result<()> {
    let dir = create_temp_dir()?;
    let path = create_test_file(
        dir.path(),
        "messages.po",
        &po_content(Some("fr"), None, &[("hello", "old")]),
    )?;

    let config = test_config();
    let service = service_with(MockEngine::mapping([("hello", "new")]), &config);
    let translator =
        CatalogTranslator::new(&service, "eng", true, Arc::new(AtomicBool::new(false)));

    let outcome = translator.translate_catalog(&path, "fr").await?;

    assert_eq!(outcome, CatalogOutcome::Translated(1));
    assert_eq!(msgstr_by_msgid(&path)["hello"], "new");
    Ok(())
}

/// A short engine reply leaves trailing msgids untouched, non-fatally
#[tokio::test]
async fn test_translateCatalog_withShortEngineReply_shouldLeaveTrailingUntouched() -> Result<()> {
    let dir = create_temp_dir()?;
    let path = create_test_file(
        dir.path(),
        "messages.po",
        &po_content(Some("fr"), None, &[("alpha", ""), ("beta", "")]),
    )?;

    let config = test_config();
    let service = service_with(MockEngine::truncating(1), &config);
    let translator =
        CatalogTranslator::new(&service, "eng", false, Arc::new(AtomicBool::new(false)));

    let outcome = translator.translate_catalog(&path, "fr").await?;

    assert_eq!(outcome, CatalogOutcome::Translated(1));
    let entries = msgstr_by_msgid(&path);
    assert_eq!(entries["alpha"], "alpha");
    assert_eq!(entries["beta"], "");
    Ok(())
}

/// Discovery returns every declared language except the source, as short codes
#[test]
fn test_discoverTargetLanguages_withMixedTree_shouldExcludeSource() -> Result<()> {
    let dir = create_temp_dir()?;
    create_test_file(
        &dir.path().join("locale/fr"),
        "messages.po",
        &po_content(Some("fr"), None, &[("hello", "")]),
    )?;
    create_test_file(
        &dir.path().join("locale/es"),
        "messages.po",
        &po_content(Some("es"), None, &[("hello", "")]),
    )?;
    create_test_file(
        &dir.path().join("locale/en"),
        "messages.po",
        &po_content(Some("en"), None, &[("hello", "")]),
    )?;

    let targets = discover_target_languages(dir.path(), "eng")?;

    assert_eq!(targets, vec!["es".to_string(), "fr".to_string()]);
    Ok(())
}
