//! Boundaries between the engine and whatever reads and writes cubes.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::cube::Cube;
use crate::error::{FixError, Result};

/// Reads a cube from a file. Implementations must fail on malformed input
/// rather than return a partial cube.
pub trait Loader: Send + Sync {
    fn load(&self, path: &Path) -> Result<Cube>;
}

/// Persists a cube. The pipeline never calls this on its own.
pub trait Saver: Send + Sync {
    fn save(&self, cube: &Cube, path: &Path) -> Result<()>;
}

impl<F> Loader for F
where
    F: Fn(&Path) -> Result<Cube> + Send + Sync,
{
    fn load(&self, path: &Path) -> Result<Cube> {
        self(path)
    }
}

/// Loader and saver for the JSON document form of a cube
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonCubeStore;

impl Loader for JsonCubeStore {
    fn load(&self, path: &Path) -> Result<Cube> {
        if !path.exists() {
            return Err(FixError::MissingFile(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        let cube: Cube = serde_json::from_str(&content)?;
        debug!("Loaded {} {:?} from {}", cube.var_name(), cube.shape(), path.display());
        Ok(cube)
    }
}

impl Saver for JsonCubeStore {
    fn save(&self, cube: &Cube, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(cube)?)?;
        debug!("Saved {} to {}", cube.var_name(), path.display());
        Ok(())
    }
}
