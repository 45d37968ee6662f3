use std::any::{type_name, TypeId};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::cube::Cube;
use crate::error::Result;
use crate::paths;

/// A correction for one (project, model[, variable]) combination.
///
/// Every stage defaults to returning its input unchanged, so a fix only
/// overrides the stages it needs. Stages take the cube by value and return
/// the cube the next stage should see; callers must not assume the input was
/// left alone.
pub trait Fix: Send + Sync + 'static {
    /// Operate on the file before it is loaded. Fixes that rewrite the file
    /// write the result to a new file from [`paths::create_fixed_file`] and
    /// return its path.
    fn fix_file(&self, path: &Path) -> Result<PathBuf> {
        Ok(path.to_path_buf())
    }

    /// Correct names, units, attributes and coordinate metadata.
    fn fix_metadata(&self, cube: Cube) -> Result<Cube> {
        Ok(cube)
    }

    /// Correct the values.
    fn fix_data(&self, cube: Cube) -> Result<Cube> {
        Ok(cube)
    }

    /// Fresh path for a fixed copy of `path`; see [`paths::fixed_filepath`].
    fn fixed_filepath(&self, path: &Path) -> PathBuf {
        paths::fixed_filepath(path)
    }

    /// Concrete type of the fix. Fixes compare equal when this matches.
    fn fix_type(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    fn fix_name(&self) -> &'static str {
        type_name::<Self>()
    }
}

impl PartialEq for dyn Fix {
    fn eq(&self, other: &Self) -> bool {
        self.fix_type() == other.fix_type()
    }
}

impl fmt::Debug for dyn Fix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.fix_name())
    }
}

/// The identity fix: every stage is a no-op.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultFix;

impl Fix for DefaultFix {}
