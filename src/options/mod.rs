//! Geometry detail options with TOML preset support.
//!
//! All tweakable settings consolidate here and serialize to/from TOML so
//! detail presets can be stored on disk. Every struct uses
//! `#[serde(default)]` so partial files (e.g. only overriding `[density]`)
//! work correctly.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::density::GaussianDensityParams;
use crate::error::MolGeoError;
use crate::link::{LinkColorMode, LinkCylinderParams, LinkLineParams};

/// Overall detail level, scaling tessellation and grid resolution.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    /// Half the radial segments, double the grid spacing.
    Low,
    /// Use configured values as-is.
    #[default]
    Medium,
    /// Double the radial segments, half the grid spacing.
    High,
}

/// Link cylinder and line options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct LinkOptions {
    /// Radius scale of multiple-bond cylinders relative to the link.
    pub link_scale: f32,
    /// Spacing between multiple-bond cylinders.
    pub link_spacing: f32,
    /// Cap the outer ends of each half-link.
    pub link_cap: bool,
    /// Radius scale of aromatic indicator cylinders.
    pub aromatic_scale: f32,
    /// Spacing of the aromatic indicator from the main cylinder.
    pub aromatic_spacing: f32,
    /// Dash count of the aromatic indicator per half-link.
    pub aromatic_dash_count: u32,
    /// Dash count of dashed links per half-link.
    pub dash_count: u32,
    /// Radius scale of dashes relative to the link.
    pub dash_scale: f32,
    /// Cap both ends of every dash.
    pub dash_cap: bool,
    /// Cap half-links that end in a stub.
    pub stub_cap: bool,
    /// Radial tessellation of mesh cylinders at medium quality.
    pub radial_segments: u32,
    /// Interpolate impostor colors between bond ends.
    pub interpolate_colors: bool,
}

impl Default for LinkOptions {
    fn default() -> Self {
        let params = LinkCylinderParams::default();
        Self {
            link_scale: params.link_scale,
            link_spacing: params.link_spacing,
            link_cap: params.link_cap,
            aromatic_scale: params.aromatic_scale,
            aromatic_spacing: params.aromatic_spacing,
            aromatic_dash_count: params.aromatic_dash_count,
            dash_count: params.dash_count,
            dash_scale: params.dash_scale,
            dash_cap: params.dash_cap,
            stub_cap: params.stub_cap,
            radial_segments: params.radial_segments,
            interpolate_colors: false,
        }
    }
}

/// Gaussian density options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DensityOptions {
    /// Grid spacing in world units at medium quality.
    pub resolution: f32,
    /// Added to every atom radius.
    pub radius_offset: f32,
    /// Gaussian falloff exponent.
    pub smoothness: f32,
}

impl Default for DensityOptions {
    fn default() -> Self {
        let params = GaussianDensityParams::default();
        Self {
            resolution: params.resolution,
            radius_offset: params.radius_offset,
            smoothness: params.smoothness,
        }
    }
}

/// Top-level options container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Options {
    /// Overall detail level.
    pub quality: Quality,
    /// Link geometry options.
    pub link: LinkOptions,
    /// Gaussian density options.
    pub density: DensityOptions,
}

impl Options {
    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, MolGeoError> {
        let content = std::fs::read_to_string(path).map_err(MolGeoError::Io)?;
        let options = toml::from_str(&content)
            .map_err(|e| MolGeoError::OptionsParse(e.to_string()))?;
        log::info!("loaded options from {}", path.display());
        Ok(options)
    }

    /// Save options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), MolGeoError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| MolGeoError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(MolGeoError::Io)?;
        }
        std::fs::write(path, content).map_err(MolGeoError::Io)
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }

    /// Link cylinder parameters with quality scaling applied.
    #[must_use]
    pub fn link_cylinder_params(&self) -> LinkCylinderParams {
        let radial_segments = match self.quality {
            Quality::Low => (self.link.radial_segments / 2).max(4),
            Quality::Medium => self.link.radial_segments,
            Quality::High => self.link.radial_segments * 2,
        };
        LinkCylinderParams {
            link_scale: self.link.link_scale,
            link_spacing: self.link.link_spacing,
            link_cap: self.link.link_cap,
            aromatic_scale: self.link.aromatic_scale,
            aromatic_spacing: self.link.aromatic_spacing,
            aromatic_dash_count: self.link.aromatic_dash_count,
            dash_count: self.link.dash_count,
            dash_scale: self.link.dash_scale,
            dash_cap: self.link.dash_cap,
            stub_cap: self.link.stub_cap,
            radial_segments,
            color_mode: if self.link.interpolate_colors {
                LinkColorMode::Interpolate
            } else {
                LinkColorMode::Default
            },
        }
    }

    /// Link line parameters.
    #[must_use]
    pub const fn link_line_params(&self) -> LinkLineParams {
        LinkLineParams {
            link_scale: self.link.link_scale,
            link_spacing: self.link.link_spacing,
            aromatic_dash_count: self.link.aromatic_dash_count,
            dash_count: self.link.dash_count,
        }
    }

    /// Density parameters with quality scaling applied.
    #[must_use]
    pub fn density_params(&self) -> GaussianDensityParams {
        let resolution = match self.quality {
            Quality::Low => self.density.resolution * 2.0,
            Quality::Medium => self.density.resolution,
            Quality::High => self.density.resolution * 0.5,
        };
        GaussianDensityParams {
            resolution,
            radius_offset: self.density.radius_offset,
            smoothness: self.density.smoothness,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed: Options = toml::from_str(
            "quality = \"high\"\n\n[density]\nresolution = 0.25\n",
        )
        .unwrap();
        assert_eq!(parsed.quality, Quality::High);
        assert_eq!(parsed.density.resolution, 0.25);
        assert_eq!(parsed.link, LinkOptions::default());
    }

    #[test]
    fn test_quality_scales_parameters() {
        let low = Options {
            quality: Quality::Low,
            ..Options::default()
        };
        assert_eq!(low.link_cylinder_params().radial_segments, 8);
        assert_eq!(low.density_params().resolution, 2.0);
        let high = Options {
            quality: Quality::High,
            ..Options::default()
        };
        assert_eq!(high.link_cylinder_params().radial_segments, 32);
        assert_eq!(high.density_params().resolution, 0.5);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err =
            Options::load(Path::new("/nonexistent/options.toml")).unwrap_err();
        assert!(matches!(err, MolGeoError::Io(_)));
    }

    #[test]
    fn test_defaults_match_link_params() {
        let opts = Options::default();
        assert_eq!(opts.link_cylinder_params(), LinkCylinderParams::default());
    }
}
