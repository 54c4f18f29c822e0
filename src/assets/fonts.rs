use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, OnceLock},
};

use anyhow::Context;

use crate::foundation::error::{BadgeError, BadgeResult};

/// Families tried after the requested one, in order.
const SANS_FALLBACKS: &[&str] = &[
    "Arial",
    "Helvetica",
    "Liberation Sans",
    "DejaVu Sans",
    "Noto Sans",
];

/// Which font face a text layer wants.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct FontSpec {
    /// Preferred family name.
    #[serde(default = "default_family")]
    pub family: String,
    /// CSS-style weight (400 regular, 700 bold).
    #[serde(default = "default_weight")]
    pub weight: u16,
    /// Italic style.
    #[serde(default)]
    pub italic: bool,
    /// Explicit font file. Wins over the system lookup when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

fn default_family() -> String {
    "Arial".to_string()
}

fn default_weight() -> u16 {
    400
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            family: default_family(),
            weight: default_weight(),
            italic: false,
            file: None,
        }
    }
}

impl FontSpec {
    /// Bold face of `family`.
    pub fn bold(family: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            weight: 700,
            ..Self::default()
        }
    }

    /// Italic face of `family`.
    pub fn italic(family: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            italic: true,
            ..Self::default()
        }
    }
}

/// Font bytes chosen for a [`FontSpec`].
#[derive(Clone)]
pub struct ResolvedFont {
    /// Raw font file bytes (may be a collection).
    pub bytes: Arc<Vec<u8>>,
    /// Face index within `bytes`.
    pub index: u32,
    /// Family name reported by the font database, if known up front.
    pub family: Option<String>,
}

impl std::fmt::Debug for ResolvedFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedFont")
            .field("bytes_len", &self.bytes.len())
            .field("index", &self.index)
            .field("family", &self.family)
            .finish()
    }
}

/// Resolves [`FontSpec`]s to font bytes.
///
/// The system font database is loaded lazily on first use and cached together with every
/// resolved face, so one book can serve many renders.
#[derive(Default)]
pub struct FontBook {
    db: OnceLock<usvg::fontdb::Database>,
    extra_dirs: Vec<PathBuf>,
    resolved: Mutex<HashMap<FontSpec, ResolvedFont>>,
}

impl FontBook {
    /// Book backed by the system fonts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Book backed by the system fonts plus every `.ttf`/`.otf`/`.ttc` file in `dirs`.
    pub fn with_font_dirs(dirs: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            extra_dirs: dirs.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Book backed by an explicit database (no system scan).
    pub fn with_database(db: usvg::fontdb::Database) -> Self {
        let book = Self::default();
        let _ = book.db.set(db);
        book
    }

    /// Number of faces visible to this book.
    pub fn face_count(&self) -> usize {
        self.database().len()
    }

    /// Resolve `spec` to font bytes.
    ///
    /// An unreadable explicit file is [`BadgeError::AssetLoad`]; no matching face anywhere is
    /// [`BadgeError::Environment`].
    pub fn resolve(&self, spec: &FontSpec) -> BadgeResult<ResolvedFont> {
        if let Ok(cache) = self.resolved.lock()
            && let Some(hit) = cache.get(spec)
        {
            return Ok(hit.clone());
        }

        let font = match &spec.file {
            Some(path) => load_font_file(path)?,
            None => self.query_system(spec)?,
        };

        if let Ok(mut cache) = self.resolved.lock() {
            cache.insert(spec.clone(), font.clone());
        }
        Ok(font)
    }

    fn database(&self) -> &usvg::fontdb::Database {
        self.db.get_or_init(|| {
            let mut db = usvg::fontdb::Database::new();
            db.load_system_fonts();
            for dir in &self.extra_dirs {
                load_fonts_from_dir(&mut db, dir);
            }
            tracing::debug!(faces = db.len(), "loaded font database");
            db
        })
    }

    fn query_system(&self, spec: &FontSpec) -> BadgeResult<ResolvedFont> {
        use usvg::fontdb::{Family, Query, Stretch, Style, Weight};

        let db = self.database();
        let style = if spec.italic {
            Style::Italic
        } else {
            Style::Normal
        };

        let mut families = vec![Family::Name(spec.family.as_str())];
        families.extend(SANS_FALLBACKS.iter().map(|f| Family::Name(*f)));
        families.push(Family::SansSerif);

        let query = Query {
            families: &families,
            weight: Weight(spec.weight),
            stretch: Stretch::Normal,
            style,
        };

        let id = db
            .query(&query)
            .or_else(|| {
                db.faces()
                    .find(|f| f.style == style && f.weight.0 >= spec.weight)
                    .map(|f| f.id)
            })
            .or_else(|| db.faces().next().map(|f| f.id))
            .ok_or_else(|| {
                BadgeError::environment(format!(
                    "no font face available for family '{}' (weight {}, italic {})",
                    spec.family, spec.weight, spec.italic
                ))
            })?;

        let family = db
            .face(id)
            .and_then(|f| f.families.first().map(|(name, _)| name.clone()));
        let (bytes, index) = db
            .with_face_data(id, |data, index| (data.to_vec(), index))
            .ok_or_else(|| BadgeError::environment("font face data is not readable"))?;

        tracing::debug!(?family, index, requested = %spec.family, "resolved system font");
        Ok(ResolvedFont {
            bytes: Arc::new(bytes),
            index,
            family,
        })
    }
}

fn load_font_file(path: &Path) -> BadgeResult<ResolvedFont> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("read font file '{}'", path.display()))
        .map_err(BadgeError::asset_load_from)?;
    Ok(ResolvedFont {
        bytes: Arc::new(bytes),
        index: 0,
        family: None,
    })
}

fn load_fonts_from_dir(db: &mut usvg::fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        return;
    };

    for entry in rd.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if ext != "ttf" && ext != "otf" && ext != "ttc" {
            continue;
        }
        let _ = db.load_font_file(&path);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
