//! Font bundle provisioning: download (with an on-disk cache), archive
//! extraction, and stable asset naming.
//!
//! This is a collaborator of the patching core, not part of it: the
//! core only ever sees the already-materialized list of font files and
//! their relative asset paths.

use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use std::io::{Cursor, Read};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};
use zip::ZipArchive;

/// Family name injected into patched documents. Doubles as the
/// idempotence marker for the source-declaration patch.
pub const FONT_FAMILY: &str = "HarmonyOS Sans";

pub const BUNDLE_URL: &str =
    "https://developer.huawei.com/images/download/general/HarmonyOS-Sans.zip";

/// Relative directory (inside a tool project) that extracted fonts and
/// pubspec asset paths use.
pub const FONT_ASSET_DIR: &str = "assets/fonts/harmonyos-sans";

const BUNDLE_FILE: &str = "HarmonyOS-Sans.zip";

#[derive(Debug, Error)]
pub enum FontError {
    #[error("download failed: {0}")]
    Download(String),

    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// One extracted font file, named by its archive entry basename.
#[derive(Debug, Clone)]
pub struct FontFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

fn is_font_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.ends_with(".ttf") || lower.ends_with(".otf")
}

/// Download the font bundle into `cache_dir`, reusing a previously
/// cached non-empty copy. Returns the path to the zip.
pub fn fetch_bundle(cache_dir: &Utf8Path) -> Result<Utf8PathBuf, FontError> {
    fs::create_dir_all(cache_dir)?;
    let zip_path = cache_dir.join(BUNDLE_FILE);
    if let Ok(meta) = zip_path.metadata()
        && meta.len() > 0
    {
        debug!(%zip_path, "using cached font bundle");
        return Ok(zip_path);
    }

    info!(url = BUNDLE_URL, "downloading font bundle");
    let agent = ureq::AgentBuilder::new()
        .timeout_connect(Duration::from_secs(15))
        .timeout_read(Duration::from_secs(300))
        .build();
    let resp = agent
        .get(BUNDLE_URL)
        .call()
        .map_err(|e| FontError::Download(e.to_string()))?;

    let mut reader = resp.into_reader();
    let mut file = fs::File::create(&zip_path)?;
    std::io::copy(&mut reader, &mut file)?;
    Ok(zip_path)
}

/// Pull every `.ttf`/`.otf` entry out of the bundle bytes. Entry paths
/// are flattened to their basename; entries without one are skipped.
pub fn extract_fonts(zip_bytes: &[u8]) -> Result<Vec<FontFile>, FontError> {
    let mut archive = ZipArchive::new(Cursor::new(zip_bytes))?;
    let mut fonts = Vec::new();
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        if !entry.is_file() || !is_font_name(entry.name()) {
            continue;
        }
        let Some(file_name) = entry.name().rsplit('/').next().map(str::to_string) else {
            continue;
        };
        if file_name.is_empty() {
            continue;
        }
        let mut bytes = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut bytes)?;
        fonts.push(FontFile { file_name, bytes });
    }
    Ok(fonts)
}

/// Write extracted fonts under `tool_dir/assets/fonts/harmonyos-sans`.
pub fn install_fonts(tool_dir: &Utf8Path, fonts: &[FontFile]) -> Result<(), FontError> {
    let dest = tool_dir.join(FONT_ASSET_DIR);
    fs::create_dir_all(&dest)?;
    for font in fonts {
        fs::write(dest.join(&font.file_name), &font.bytes)?;
    }
    Ok(())
}

/// Sorted relative asset paths for the fonts present in a tool
/// directory (what the pubspec fragment lists).
pub fn font_assets(tool_dir: &Utf8Path) -> Result<Vec<String>, FontError> {
    let dir = tool_dir.join(FONT_ASSET_DIR);
    if !dir.is_dir() {
        return Ok(vec![]);
    }
    let mut assets = Vec::new();
    for entry in fs::read_dir(&dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();
        if is_font_name(&name) {
            assets.push(format!("{FONT_ASSET_DIR}/{name}"));
        }
    }
    assets.sort();
    Ok(assets)
}
