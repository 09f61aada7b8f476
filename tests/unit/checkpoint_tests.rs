/*!
 * Tests for checkpoint persistence and resume tracking
 */

use anyhow::Result;
use std::fs;

use crate::common::create_temp_dir;
use transcorpus::checkpoint::{Checkpoint, ResumeState};
use transcorpus::corpus::Corpus;
use transcorpus::errors::CheckpointError;

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Checkpoint location derives from the output path and language pair
#[test]
fn test_forOutput_withTxtOutput_shouldDeriveCacheSibling() {
    let checkpoint = Checkpoint::for_output("/data/out.txt".as_ref(), "eng", "fra");
    assert_eq!(checkpoint.dir(), std::path::Path::new("/data/out.cache"));
}

/// No checkpoint on disk means no prior progress
#[test]
fn test_load_withMissingCheckpoint_shouldReturnEmptyState() -> Result<()> {
    let dir = create_temp_dir()?;
    let checkpoint = Checkpoint::for_output(&dir.path().join("out.txt"), "eng", "fra");

    let state = checkpoint.load();

    assert!(state.is_empty());
    assert_eq!(state.len(), 0);
    Ok(())
}

/// Save then load round-trips the aligned pairs
#[test]
fn test_saveAndLoad_withAlignedState_shouldRoundTrip() -> Result<()> {
    let dir = create_temp_dir()?;
    let checkpoint = Checkpoint::for_output(&dir.path().join("out.txt"), "eng", "fra");

    checkpoint.save(&owned(&["Hello", "World"]), &owned(&["Bonjour", "Monde"]))?;
    let state = checkpoint.load();

    assert_eq!(state.translated_source, owned(&["Hello", "World"]));
    assert_eq!(state.translation_output, owned(&["Bonjour", "Monde"]));
    Ok(())
}

/// Saving overwrites the whole state rather than appending to it
#[test]
fn test_save_withExistingCheckpoint_shouldOverwriteNotAppend() -> Result<()> {
    let dir = create_temp_dir()?;
    let checkpoint = Checkpoint::for_output(&dir.path().join("out.txt"), "eng", "fra");

    checkpoint.save(&owned(&["a", "b", "c"]), &owned(&["1", "2", "3"]))?;
    checkpoint.save(&owned(&["a"]), &owned(&["1"]))?;
    let state = checkpoint.load();

    assert_eq!(state.translated_source, owned(&["a"]));
    assert_eq!(state.translation_output, owned(&["1"]));
    Ok(())
}

/// A half-present checkpoint counts as no prior progress
#[test]
fn test_load_withOnlyOneFile_shouldReturnEmptyState() -> Result<()> {
    let dir = create_temp_dir()?;
    let checkpoint = Checkpoint::for_output(&dir.path().join("out.txt"), "eng", "fra");

    checkpoint.save(&owned(&["a"]), &owned(&["1"]))?;
    fs::remove_file(checkpoint.dir().join("translations.eng-fra.txt"))?;

    assert!(checkpoint.load().is_empty());
    Ok(())
}

/// Misaligned checkpoint files count as no prior progress
#[test]
fn test_load_withMisalignedFiles_shouldReturnEmptyState() -> Result<()> {
    let dir = create_temp_dir()?;
    let checkpoint = Checkpoint::for_output(&dir.path().join("out.txt"), "eng", "fra");

    checkpoint.save(&owned(&["a", "b"]), &owned(&["1", "2"]))?;
    fs::write(checkpoint.dir().join("translations.eng-fra.txt"), "1")?;

    assert!(checkpoint.load().is_empty());
    Ok(())
}

/// Misaligned accumulators are refused outright
#[test]
fn test_save_withMisalignedAccumulators_shouldFail() -> Result<()> {
    let dir = create_temp_dir()?;
    let checkpoint = Checkpoint::for_output(&dir.path().join("out.txt"), "eng", "fra");

    let result = checkpoint.save(&owned(&["a", "b"]), &owned(&["1"]));

    assert!(result.is_err());
    Ok(())
}

/// The set-difference length law: |pending| == |corpus| - |translated|
#[test]
fn test_pending_withSubsetTranslated_shouldSatisfyLengthLaw() -> Result<()> {
    let corpus = Corpus::from_sentences(["a", "b", "c", "d", "e"]);
    let state = ResumeState {
        translated_source: owned(&["b", "d"]),
        translation_output: owned(&["2", "4"]),
    };

    let pending = state.pending(&corpus)?;

    assert_eq!(pending, owned(&["a", "c", "e"]));
    assert_eq!(pending.len(), corpus.len() - state.len());
    Ok(())
}

/// A checkpoint holding sentences the corpus does not contain is corrupt
#[test]
fn test_pending_withForeignSentences_shouldFailAsInconsistent() {
    let corpus = Corpus::from_sentences(["a", "b"]);
    let state = ResumeState {
        translated_source: owned(&["a", "zzz"]),
        translation_output: owned(&["1", "999"]),
    };

    let result = state.pending(&corpus);

    assert!(matches!(result, Err(CheckpointError::Inconsistent { .. })));
}

/// An empty resume state leaves the whole corpus pending
#[test]
fn test_pending_withEmptyState_shouldReturnWholeCorpus() -> Result<()> {
    let corpus = Corpus::from_sentences(["x", "y"]);
    let pending = ResumeState::default().pending(&corpus)?;
    assert_eq!(pending, owned(&["x", "y"]));
    Ok(())
}
