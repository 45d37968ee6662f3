//! Applies a resolved fix chain to a file and the cube loaded from it.
//!
//! A run is strictly ordered: every `fix_file` in chain order, then the load,
//! then every `fix_metadata`, then every `fix_data`. The first failure stops
//! the run. Fix failures come back wrapped with the identity and stage;
//! loader failures come back as the loader reported them.

pub mod ports;
pub mod stage;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::PipelineConfig;
use crate::cube::Cube;
use crate::error::{FixError, Result};
use crate::fix::Fix;
use crate::identity::FixIdentity;
use crate::metrics::PipelineMetrics;
use crate::resolver::FixResolver;

pub use ports::{JsonCubeStore, Loader, Saver};
pub use stage::FixStage;

/// What a successful run did
#[derive(Debug, Clone, Serialize)]
pub struct FixReport {
    pub identity: FixIdentity,
    pub source: PathBuf,
    /// Path the cube was loaded from after the file stages
    pub fixed_path: PathBuf,
    /// Fix type names in the order they were applied
    pub fixes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_to: Option<PathBuf>,
    pub fixed_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct FixOutcome {
    pub path: PathBuf,
    pub cube: Cube,
    pub report: FixReport,
}

#[derive(Debug, Clone, Default)]
pub struct FixPipeline {
    resolver: FixResolver,
    config: PipelineConfig,
}

impl FixPipeline {
    pub fn new(resolver: FixResolver, config: PipelineConfig) -> Self {
        Self { resolver, config }
    }

    pub fn resolver(&self) -> &FixResolver {
        &self.resolver
    }

    /// Resolve the chain for `identity` and run it against `path`.
    pub fn apply(
        &self,
        identity: &FixIdentity,
        path: &Path,
        loader: &dyn Loader,
    ) -> Result<FixOutcome> {
        let chain = self.resolver.resolve(identity);
        self.apply_chain(identity, &chain, path, loader)
    }

    /// [`FixPipeline::apply`], then hand the fixed cube to `saver`. Nothing is
    /// saved unless every stage succeeded.
    pub fn apply_and_save(
        &self,
        identity: &FixIdentity,
        path: &Path,
        loader: &dyn Loader,
        saver: &dyn Saver,
        output: &Path,
    ) -> Result<FixOutcome> {
        let mut outcome = self.apply(identity, path, loader)?;
        saver.save(&outcome.cube, output)?;
        outcome.report.saved_to = Some(output.to_path_buf());
        info!("Saved fixed {} to {}", identity, output.display());
        Ok(outcome)
    }

    /// Run an explicit chain. `apply` is this with the resolver's chain.
    ///
    /// With `remove_partial_files` set, fixed files written by file stages are
    /// deleted unless they are the path the run returns: all of them when the
    /// run fails, the intermediate ones when it succeeds.
    pub fn apply_chain(
        &self,
        identity: &FixIdentity,
        chain: &[Box<dyn Fix>],
        path: &Path,
        loader: &dyn Loader,
    ) -> Result<FixOutcome> {
        let started = Instant::now();
        info!("Applying {} fix(es) to {} for {}", chain.len(), path.display(), identity);

        let mut written = Vec::new();
        match self.run(identity, chain, path, loader, &mut written) {
            Ok((fixed_path, cube)) => {
                if self.config.remove_partial_files {
                    written.retain(|p| *p != fixed_path);
                    remove_fixed_files(&written, "intermediate");
                }
                PipelineMetrics::record_run_success(started.elapsed().as_secs_f64());
                info!("Fixed {} in {:?}", identity, started.elapsed());
                let report = FixReport {
                    identity: identity.clone(),
                    source: path.to_path_buf(),
                    fixed_path: fixed_path.clone(),
                    fixes: chain.iter().map(|f| f.fix_name().to_string()).collect(),
                    saved_to: None,
                    fixed_at: Utc::now(),
                };
                Ok(FixOutcome {
                    path: fixed_path,
                    cube,
                    report,
                })
            }
            Err(e) => {
                PipelineMetrics::record_run_error(e.stage().unwrap_or(FixStage::Load));
                if self.config.remove_partial_files {
                    remove_fixed_files(&written, "partial");
                }
                Err(e)
            }
        }
    }

    fn run(
        &self,
        identity: &FixIdentity,
        chain: &[Box<dyn Fix>],
        source: &Path,
        loader: &dyn Loader,
        written: &mut Vec<PathBuf>,
    ) -> Result<(PathBuf, Cube)> {
        let mut current = source.to_path_buf();
        for fix in chain {
            let next = fix
                .fix_file(&current)
                .map_err(|e| e.in_stage(identity, FixStage::File, fix.fix_name()))?;
            if next != current && next != source {
                written.push(next.clone());
            }
            debug!(
                "{} file stage: {} -> {}",
                fix.fix_name(),
                current.display(),
                next.display()
            );
            current = next;
            PipelineMetrics::record_stage_applied(FixStage::File);
        }

        let mut cube = loader.load(&current)?;
        PipelineMetrics::record_stage_applied(FixStage::Load);
        let shape = cube.shape();
        let var_name = cube.var_name().to_string();

        for fix in chain {
            cube = fix
                .fix_metadata(cube)
                .map_err(|e| e.in_stage(identity, FixStage::Metadata, fix.fix_name()))?;
            self.verify(identity, FixStage::Metadata, fix.as_ref(), &cube, &shape, &var_name)?;
            debug!("{} metadata stage applied", fix.fix_name());
            PipelineMetrics::record_stage_applied(FixStage::Metadata);
        }

        for fix in chain {
            cube = fix
                .fix_data(cube)
                .map_err(|e| e.in_stage(identity, FixStage::Data, fix.fix_name()))?;
            self.verify(identity, FixStage::Data, fix.as_ref(), &cube, &shape, &var_name)?;
            debug!("{} data stage applied", fix.fix_name());
            PipelineMetrics::record_stage_applied(FixStage::Data);
        }

        Ok((current, cube))
    }

    /// Metadata and data stages must leave shape and var_name alone.
    fn verify(
        &self,
        identity: &FixIdentity,
        stage: FixStage,
        fix: &dyn Fix,
        cube: &Cube,
        shape: &[usize],
        var_name: &str,
    ) -> Result<()> {
        if !self.config.verify_invariants {
            return Ok(());
        }
        let violation = if cube.shape() != shape {
            Some(format!("shape changed from {:?} to {:?}", shape, cube.shape()))
        } else if cube.var_name() != var_name {
            Some(format!("var_name changed from {} to {}", var_name, cube.var_name()))
        } else {
            None
        };
        match violation {
            Some(message) => {
                let err = FixError::ContractViolation(message);
                Err(err.in_stage(identity, stage, fix.fix_name()))
            }
            None => Ok(()),
        }
    }
}

fn remove_fixed_files(paths: &[PathBuf], kind: &str) {
    for path in paths {
        match fs::remove_file(path) {
            Ok(()) => {
                warn!("Removed {} fixed file {}", kind, path.display());
                PipelineMetrics::record_partial_file_removed();
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Could not remove {} fixed file {}: {}", kind, path.display(), e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cube::{Coord, CubeMetadata};
    use std::sync::{Arc, Mutex};

    type Log = Arc<Mutex<Vec<String>>>;

    /// Records every stage it sees into a shared log.
    struct Recording {
        label: &'static str,
        log: Log,
    }

    impl Fix for Recording {
        fn fix_file(&self, path: &Path) -> Result<PathBuf> {
            self.log.lock().unwrap().push(format!("{}:file", self.label));
            Ok(path.to_path_buf())
        }

        fn fix_metadata(&self, cube: Cube) -> Result<Cube> {
            self.log.lock().unwrap().push(format!("{}:metadata", self.label));
            Ok(cube)
        }

        fn fix_data(&self, cube: Cube) -> Result<Cube> {
            self.log.lock().unwrap().push(format!("{}:data", self.label));
            Ok(cube)
        }
    }

    struct Reshaping;

    impl Fix for Reshaping {
        fn fix_metadata(&self, cube: Cube) -> Result<Cube> {
            Cube::new(
                cube.metadata.clone(),
                vec![Coord::new("index", "1", vec![0.0])],
                vec![cube.values()[0]],
            )
        }
    }

    struct BrokenMetadata;

    impl Fix for BrokenMetadata {
        fn fix_metadata(&self, _cube: Cube) -> Result<Cube> {
            Err(FixError::MissingAttribute {
                attribute: "source".to_string(),
            })
        }
    }

    /// Shifts every time point by one day.
    struct ShiftTime;

    impl Fix for ShiftTime {
        fn fix_metadata(&self, mut cube: Cube) -> Result<Cube> {
            let mut time = cube.require_coord_mut("time")?;
            for point in time.points_mut() {
                *point += 1.0;
            }
            Ok(cube)
        }
    }

    fn loader(path: &Path) -> Result<Cube> {
        let _ = path;
        Cube::new(
            CubeMetadata::new("tas", "K"),
            vec![Coord::new("time", "days", vec![0.0, 1.0])],
            vec![280.0, 281.0],
        )
    }

    #[test]
    fn test_stages_run_in_order() {
        let log: Log = Arc::default();
        let chain: Vec<Box<dyn Fix>> = vec![
            Box::new(Recording { label: "generic", log: log.clone() }),
            Box::new(Recording { label: "specific", log: log.clone() }),
        ];
        let identity = FixIdentity::new("CMIP5", "TEST-MODEL", "tas");

        FixPipeline::default()
            .apply_chain(&identity, &chain, Path::new("tas.json"), &loader)
            .unwrap();

        assert_eq!(
            *log.lock().unwrap(),
            vec![
                "generic:file",
                "specific:file",
                "generic:metadata",
                "specific:metadata",
                "generic:data",
                "specific:data",
            ]
        );
    }

    #[test]
    fn test_failing_stage_stops_later_stages() {
        let log: Log = Arc::default();
        let chain: Vec<Box<dyn Fix>> = vec![
            Box::new(BrokenMetadata),
            Box::new(Recording { label: "after", log: log.clone() }),
        ];
        let identity = FixIdentity::new("CMIP5", "TEST-MODEL", "tas");

        let err = FixPipeline::default()
            .apply_chain(&identity, &chain, Path::new("tas.json"), &loader)
            .unwrap_err();
        assert_eq!(err.stage(), Some(FixStage::Metadata));

        let log = log.lock().unwrap();
        assert_eq!(*log, vec!["after:file"]);
        assert!(!log.iter().any(|entry| entry == "after:metadata"));
        assert!(!log.iter().any(|entry| entry.ends_with(":data")));
    }

    #[test]
    fn test_unverified_coordinate_edits_keep_cube_usable() {
        let chain: Vec<Box<dyn Fix>> = vec![Box::new(ShiftTime)];
        let identity = FixIdentity::new("CMIP5", "TEST-MODEL", "tas");
        let pipeline = FixPipeline::new(
            FixResolver::default(),
            PipelineConfig {
                verify_invariants: false,
                ..PipelineConfig::default()
            },
        );

        let outcome = pipeline
            .apply_chain(&identity, &chain, Path::new("tas.json"), &loader)
            .unwrap();
        let cube = outcome.cube;
        assert_eq!(cube.shape(), vec![2]);
        assert_eq!(cube.coord("time").unwrap().points(), &[1.0, 2.0]);

        let mean = cube.collapsed("time", crate::cube::Aggregator::Mean).unwrap();
        assert_eq!(mean.values(), vec![280.5]);

        let reloaded: Cube = serde_json::from_value(serde_json::to_value(&cube).unwrap()).unwrap();
        assert_eq!(reloaded, cube);
    }

    #[test]
    fn test_shape_change_is_a_contract_violation() {
        let chain: Vec<Box<dyn Fix>> = vec![Box::new(Reshaping)];
        let identity = FixIdentity::new("CMIP5", "TEST-MODEL", "tas");

        let err = FixPipeline::default()
            .apply_chain(&identity, &chain, Path::new("tas.json"), &loader)
            .unwrap_err();
        assert_eq!(err.stage(), Some(FixStage::Metadata));
        match err {
            FixError::Stage { source, .. } => {
                assert!(matches!(*source, FixError::ContractViolation(_)))
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_verification_can_be_disabled() {
        let chain: Vec<Box<dyn Fix>> = vec![Box::new(Reshaping)];
        let identity = FixIdentity::new("CMIP5", "TEST-MODEL", "tas");
        let pipeline = FixPipeline::new(
            FixResolver::default(),
            PipelineConfig {
                verify_invariants: false,
                ..PipelineConfig::default()
            },
        );

        let outcome = pipeline
            .apply_chain(&identity, &chain, Path::new("tas.json"), &loader)
            .unwrap();
        assert_eq!(outcome.cube.shape(), vec![1]);
    }

    #[test]
    fn test_empty_chain_loads_source_unchanged() {
        let identity = FixIdentity::new("CMIP5", "NO-SUCH-MODEL", "tas");
        let outcome = FixPipeline::default()
            .apply(&identity, Path::new("tas.json"), &loader)
            .unwrap();
        assert_eq!(outcome.path, PathBuf::from("tas.json"));
        assert!(outcome.report.fixes.is_empty());
        assert_eq!(outcome.cube, loader(Path::new("tas.json")).unwrap());
    }
}
