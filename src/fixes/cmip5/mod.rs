//! Fixes for CMIP5 models.
//!
//! One module per model. Each exposes `register`, which adds the model's
//! fixes (and any derivation) to a [`CatalogBuilder`].

pub mod access1_0;
pub mod bnu_esm;
pub mod canesm2;
pub mod ccsm4;
pub mod cesm1_bgc;
pub mod ec_earth;
pub mod gfdl_cm2p1;
pub mod gfdl_cm3;
pub mod gfdl_esm2g;
pub mod inmcm4;
pub mod miroc_esm;
pub mod mpi_esm_lr;

use crate::catalog::CatalogBuilder;

/// Register every built-in CMIP5 fix.
pub fn register(builder: &mut CatalogBuilder) {
    access1_0::register(builder);
    bnu_esm::register(builder);
    canesm2::register(builder);
    ccsm4::register(builder);
    cesm1_bgc::register(builder);
    ec_earth::register(builder);
    gfdl_esm2g::register(builder);
    gfdl_cm2p1::register(builder);
    gfdl_cm3::register(builder);
    inmcm4::register(builder);
    miroc_esm::register(builder);
    mpi_esm_lr::register(builder);
}
