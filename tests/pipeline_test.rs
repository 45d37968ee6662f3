use std::fs;
use std::path::Path;

use anyhow::Result;
use serde_json::json;
use tempfile::tempdir;

use cmor_fixes::config::PipelineConfig;
use cmor_fixes::fixes::cmip5::inmcm4::{self, NBP_STANDARD_NAME};
use cmor_fixes::fixes::cmip5::gfdl_cm2p1;
use cmor_fixes::{
    Cube, Fix, FixError, FixIdentity, FixPipeline, FixResolver, FixStage, JsonCubeStore, Loader,
};

/// Always fails in its metadata stage.
struct BrokenMetadata;

impl Fix for BrokenMetadata {
    fn fix_metadata(&self, _cube: Cube) -> cmor_fixes::Result<Cube> {
        Err(FixError::MissingAttribute {
            attribute: "source".to_string(),
        })
    }
}

fn write_document(path: &Path, document: serde_json::Value) -> Result<()> {
    fs::write(path, serde_json::to_string_pretty(&document)?)?;
    Ok(())
}

fn nbp_document() -> serde_json::Value {
    json!({
        "metadata": {
            "var_name": "nbp",
            "standard_name": "net_biospheric_production",
            "units": "kg m-2 s-1"
        },
        "coords": [{"name": "time", "units": "days since 1850-01-01", "points": [0.0, 31.0]}],
        "data": [1.0e-9, null]
    })
}

fn file_count(dir: &Path) -> Result<usize> {
    Ok(fs::read_dir(dir)?.count())
}

#[test]
fn test_file_fix_feeds_the_loader() -> Result<()> {
    let dir = tempdir()?;
    let source = dir.path().join("nbp_Lmon_inmcm4.json");
    write_document(&source, nbp_document())?;

    let identity = FixIdentity::new("CMIP5", "inmcm4", "nbp");
    let outcome = FixPipeline::default().apply(&identity, &source, &JsonCubeStore)?;

    assert_ne!(outcome.path, source);
    assert!(outcome.path.to_string_lossy().starts_with(&*source.to_string_lossy()));
    assert_eq!(outcome.cube.metadata.standard_name.as_deref(), Some(NBP_STANDARD_NAME));
    assert_eq!(outcome.cube.masked_count(), 1);
    assert_eq!(outcome.report.fixes.len(), 1);
    assert_eq!(outcome.report.fixed_path, outcome.path);

    // The source file is never modified
    let original: serde_json::Value = serde_json::from_str(&fs::read_to_string(&source)?)?;
    assert_eq!(original, nbp_document());
    Ok(())
}

#[test]
fn test_derived_model_chain_fixes_data_and_metadata() -> Result<()> {
    let dir = tempdir()?;
    let source = dir.path().join("sftof_fx_GFDL-CM2p1.json");
    write_document(
        &source,
        json!({
            "metadata": {
                "var_name": "sftof",
                "standard_name": "sea_area_fraction",
                "units": "%",
                "attributes": {
                    "model_id": "GFDL-CM2p1",
                    "Length of average period": 1.0
                }
            },
            "coords": [{"name": "latitude", "units": "degrees_north", "points": [-10.0, 10.0]}],
            "data": [0.5, 1.0]
        }),
    )?;

    let identity = FixIdentity::new("CMIP5", "GFDL-CM2p1", "sftof");
    let outcome = FixPipeline::default().apply(&identity, &source, &JsonCubeStore)?;

    assert_eq!(outcome.path, source);
    assert_eq!(outcome.cube.values(), vec![50.0, 100.0]);
    assert_eq!(outcome.cube.units(), "%");
    assert_eq!(outcome.cube.metadata.attributes.len(), 1);
    assert_eq!(outcome.cube.metadata.attributes["model_id"], json!("GFDL-CM2p1"));
    assert_eq!(
        outcome.report.fixes.last().map(String::as_str),
        Some(gfdl_cm2p1::Sftof.fix_name())
    );
    Ok(())
}

#[test]
fn test_loader_errors_are_not_wrapped() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("tas.json");
    let identity = FixIdentity::new("CMIP5", "CESM1-BGC", "tas");

    let err = FixPipeline::default()
        .apply(&identity, &missing, &JsonCubeStore)
        .unwrap_err();
    assert!(matches!(err, FixError::MissingFile(ref path) if path == &missing));
    assert_eq!(err.stage(), None);
}

#[test]
fn test_file_stage_error_names_stage_and_identity() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nbp.json");
    let identity = FixIdentity::new("CMIP5", "inmcm4", "nbp");

    let err = FixPipeline::default()
        .apply(&identity, &missing, &JsonCubeStore)
        .unwrap_err();
    assert_eq!(err.stage(), Some(FixStage::File));
    let message = err.to_string();
    assert!(message.contains("CMIP5/inmcm4/nbp"), "{message}");
    assert!(message.contains("file"), "{message}");
}

#[test]
fn test_failed_run_removes_partial_files() -> Result<()> {
    let dir = tempdir()?;
    let source = dir.path().join("nbp.json");
    write_document(&source, nbp_document())?;

    let chain: Vec<Box<dyn Fix>> = vec![Box::new(inmcm4::Nbp), Box::new(BrokenMetadata)];
    let identity = FixIdentity::new("CMIP5", "inmcm4", "nbp");

    let err = FixPipeline::default()
        .apply_chain(&identity, &chain, &source, &JsonCubeStore)
        .unwrap_err();
    assert_eq!(err.stage(), Some(FixStage::Metadata));
    assert_eq!(file_count(dir.path())?, 1);
    assert!(source.exists());
    Ok(())
}

#[test]
fn test_partial_files_kept_when_configured() -> Result<()> {
    let dir = tempdir()?;
    let source = dir.path().join("nbp.json");
    write_document(&source, nbp_document())?;

    let chain: Vec<Box<dyn Fix>> = vec![Box::new(inmcm4::Nbp), Box::new(BrokenMetadata)];
    let identity = FixIdentity::new("CMIP5", "inmcm4", "nbp");
    let pipeline = FixPipeline::new(
        FixResolver::default(),
        PipelineConfig {
            remove_partial_files: false,
            ..PipelineConfig::default()
        },
    );

    assert!(pipeline
        .apply_chain(&identity, &chain, &source, &JsonCubeStore)
        .is_err());
    assert_eq!(file_count(dir.path())?, 2);
    Ok(())
}

#[test]
fn test_successful_run_keeps_only_the_final_fixed_file() -> Result<()> {
    let dir = tempdir()?;
    let source = dir.path().join("nbp.json");
    write_document(&source, nbp_document())?;

    let chain: Vec<Box<dyn Fix>> = vec![Box::new(inmcm4::Nbp), Box::new(inmcm4::Nbp)];
    let identity = FixIdentity::new("CMIP5", "inmcm4", "nbp");

    let outcome = FixPipeline::default().apply_chain(&identity, &chain, &source, &JsonCubeStore)?;
    assert_eq!(file_count(dir.path())?, 2);
    assert!(source.exists());
    assert!(outcome.path.exists());
    assert_eq!(outcome.cube.metadata.standard_name.as_deref(), Some(NBP_STANDARD_NAME));
    Ok(())
}

#[test]
fn test_intermediate_files_kept_when_configured() -> Result<()> {
    let dir = tempdir()?;
    let source = dir.path().join("nbp.json");
    write_document(&source, nbp_document())?;

    let chain: Vec<Box<dyn Fix>> = vec![Box::new(inmcm4::Nbp), Box::new(inmcm4::Nbp)];
    let identity = FixIdentity::new("CMIP5", "inmcm4", "nbp");
    let pipeline = FixPipeline::new(
        FixResolver::default(),
        PipelineConfig {
            remove_partial_files: false,
            ..PipelineConfig::default()
        },
    );

    pipeline.apply_chain(&identity, &chain, &source, &JsonCubeStore)?;
    assert_eq!(file_count(dir.path())?, 3);
    Ok(())
}

#[test]
fn test_apply_and_save_writes_output() -> Result<()> {
    let dir = tempdir()?;
    let source = dir.path().join("co2.json");
    let output = dir.path().join("out").join("co2_fixed.json");
    write_document(
        &source,
        json!({
            "metadata": {"var_name": "co2", "units": "1"},
            "coords": [{"name": "time", "units": "days since 1850-01-01", "points": [0.0]}],
            "data": [4.0e-4]
        }),
    )?;

    let identity = FixIdentity::new("CMIP5", "GFDL-ESM2G", "co2");
    let outcome = FixPipeline::default().apply_and_save(
        &identity,
        &source,
        &JsonCubeStore,
        &JsonCubeStore,
        &output,
    )?;

    assert_eq!(outcome.report.saved_to.as_deref(), Some(output.as_path()));
    let saved = JsonCubeStore.load(&output)?;
    assert!((saved.values()[0] - 400.0).abs() < 1e-9);
    Ok(())
}

#[test]
fn test_report_serializes() -> Result<()> {
    let dir = tempdir()?;
    let source = dir.path().join("lai.json");
    write_document(
        &source,
        json!({
            "metadata": {"var_name": "lai", "units": "1"},
            "coords": [{"name": "time", "points": [0.0]}],
            "data": [250.0]
        }),
    )?;

    let identity = FixIdentity::new("CMIP5", "inmcm4", "lai");
    let outcome = FixPipeline::default().apply(&identity, &source, &JsonCubeStore)?;
    assert!((outcome.cube.values()[0] - 2.5).abs() < 1e-12);

    let report = serde_json::to_value(&outcome.report)?;
    assert_eq!(report["identity"]["model"], json!("inmcm4"));
    assert!(report.get("saved_to").is_none());
    assert!(report["fixed_at"].is_string());
    Ok(())
}
