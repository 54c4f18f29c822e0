use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::assets::source::{ImageSource, normalize_rel_path};
use crate::foundation::error::{BadgeError, BadgeResult};
use crate::template::model::{PRESET_NAMES, Template, TemplateLayout, TextLayerStyle};

/// JSON-facing template description.
///
/// `asset` (and any font `file`) is relative to the JSON file. `layout` wins over `preset`; with
/// neither the `her-dao` layout is used.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemplateFile {
    /// Relative path of the template image (raster or SVG).
    pub asset: String,
    /// Built-in layout name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,
    /// Inline layout; missing fields fall back to `her-dao`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<TemplateLayout>,
}

impl TemplateFile {
    /// Parse from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> BadgeResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| BadgeError::validation(format!("parse template JSON: {e}")))
    }

    /// Resolve into a [`Template`], with relative paths anchored at `base_dir`.
    pub fn resolve(self, base_dir: &Path) -> BadgeResult<Template> {
        let mut layout = match (self.layout, self.preset.as_deref()) {
            (Some(layout), _) => layout,
            (None, Some(name)) => TemplateLayout::preset(name).ok_or_else(|| {
                BadgeError::validation(format!(
                    "unknown template preset '{name}' (expected one of: {})",
                    PRESET_NAMES.join(", ")
                ))
            })?,
            (None, None) => TemplateLayout::her_dao(),
        };
        layout.validate()?;

        anchor_font_file(&mut layout.name, base_dir)?;
        anchor_font_file(&mut layout.role, base_dir)?;

        let rel = normalize_rel_path(&self.asset)?;
        let asset = ImageSource::File(base_dir.join(rel));
        Ok(Template::new(asset, layout))
    }
}

fn anchor_font_file(style: &mut TextLayerStyle, base_dir: &Path) -> BadgeResult<()> {
    if let Some(file) = style.font.file.take() {
        let rel = normalize_rel_path(&file.to_string_lossy())?;
        style.font.file = Some(base_dir.join(rel));
    }
    Ok(())
}

impl Template {
    /// Load a template from a JSON file on disk.
    pub fn from_json_path(path: impl AsRef<Path>) -> BadgeResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            BadgeError::asset_load(format!("open template JSON '{}': {e}", path.display()))
        })?;
        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let template = TemplateFile::from_reader(BufReader::new(f))?.resolve(&base_dir)?;
        tracing::debug!(
            path = %path.display(),
            asset = %template.asset.describe(),
            "loaded template"
        );
        Ok(template)
    }

    /// Resolve either a built-in preset name or a path to a template JSON file.
    ///
    /// Presets need `asset`; JSON files carry their own.
    pub fn from_arg(arg: &str, asset: Option<ImageSource>) -> BadgeResult<Self> {
        if TemplateLayout::preset(arg).is_some() {
            let asset = asset.ok_or_else(|| {
                BadgeError::validation(format!("preset '{arg}' needs a template image"))
            })?;
            return Template::preset(arg, asset);
        }
        let mut template = Self::from_json_path(arg)?;
        if let Some(asset) = asset {
            template.asset = asset;
        }
        Ok(template)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/template/load.rs"]
mod tests;
