use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use fs_err as fs;
use toolcrib_edit::{
    DEFAULT_LOOKAHEAD, DeclarationSpec, TextDocument, ensure_declaration, ensure_nested_block,
};
use toolcrib_fonts::{FONT_FAMILY, extract_fonts, fetch_bundle, font_assets, install_fonts};
use toolcrib_types::status::{Advisory, PatchStatus};
use tracing::info;

#[derive(Debug, Parser)]
pub struct ApplyFontArgs {
    /// Tool directory to patch.
    #[arg(long)]
    tool: Option<Utf8PathBuf>,

    /// Patch every tool found under the tenants root.
    #[arg(long, default_value_t = false)]
    all: bool,

    /// Tenants root scanned by --all.
    #[arg(long, default_value = "tenants")]
    root: Utf8PathBuf,

    /// Where the downloaded font bundle is cached.
    #[arg(long, default_value = ".toolcrib-cache")]
    cache_dir: Utf8PathBuf,

    /// Only patch the pubspec; leave the source declaration alone.
    #[arg(long, default_value_t = false)]
    skip_main_patch: bool,
}

pub fn run(args: ApplyFontArgs) -> anyhow::Result<()> {
    let mut targets: Vec<Utf8PathBuf> = Vec::new();
    let single_target = args.tool.is_some();
    if let Some(tool) = &args.tool {
        targets.push(tool.clone());
    }
    if args.all {
        targets.extend(find_tools(&args.root)?);
    }
    if targets.is_empty() {
        anyhow::bail!("provide --tool <dir> or --all");
    }

    let mut changed = 0usize;
    let mut skipped = 0usize;
    let mut advisories: Vec<Advisory> = Vec::new();
    for tool_dir in &targets {
        let status = apply_to_tool(tool_dir, &args.cache_dir, args.skip_main_patch, &mut advisories)?;
        match status {
            PatchStatus::Applied => {
                changed += 1;
                println!("Applied {FONT_FAMILY} to: {tool_dir}");
            }
            PatchStatus::SkippedMissingFiles if single_target => {
                anyhow::bail!("{tool_dir}: pubspec.yaml or lib/main.dart is missing");
            }
            status => {
                skipped += 1;
                println!("{status}: {tool_dir}");
            }
        }
    }
    for advisory in &advisories {
        eprintln!("Warning: {advisory}");
    }
    if changed == 0 && skipped > 0 {
        println!("No Flutter tools updated.");
    }
    Ok(())
}

/// Patch one tool directory. Wrong kind of project and missing files
/// are statuses, not errors; only I/O failures propagate.
fn apply_to_tool(
    tool_dir: &Utf8Path,
    cache_dir: &Utf8Path,
    skip_main_patch: bool,
    advisories: &mut Vec<Advisory>,
) -> anyhow::Result<PatchStatus> {
    let pubspec_path = tool_dir.join("pubspec.yaml");
    if !pubspec_path.is_file() {
        return Ok(PatchStatus::SkippedNotFlutter);
    }
    let main_path = tool_dir.join("lib").join("main.dart");
    if !main_path.is_file() {
        return Ok(PatchStatus::SkippedMissingFiles);
    }

    let zip_path = fetch_bundle(cache_dir).context("fetch font bundle")?;
    let zip_bytes = fs::read(&zip_path).with_context(|| format!("read {zip_path}"))?;
    let fonts = extract_fonts(&zip_bytes).context("extract font bundle")?;
    install_fonts(tool_dir, &fonts).context("install fonts")?;

    let assets = font_assets(tool_dir)?;
    if assets.is_empty() {
        return Ok(PatchStatus::SkippedNoFonts);
    }

    patch_pubspec(&pubspec_path, &assets)?;
    if !skip_main_patch
        && let Some(advisory) = patch_main(&main_path)?
    {
        advisories.push(advisory);
    }
    Ok(PatchStatus::Applied)
}

/// Ensure the fonts fragment inside the `flutter:` block. The document
/// is buffered in full and written back only when it changed.
fn patch_pubspec(pubspec_path: &Utf8Path, assets: &[String]) -> anyhow::Result<()> {
    let contents =
        fs::read_to_string(pubspec_path).with_context(|| format!("read {pubspec_path}"))?;
    let mut doc = TextDocument::parse(&contents);
    let marker = format!("family: {FONT_FAMILY}");

    ensure_nested_block(&mut doc, "flutter", &marker, |indent| {
        let mut fragment = vec![
            format!("{}fonts:", indent.child(1)),
            format!("{}- family: {FONT_FAMILY}", indent.child(2)),
            format!("{}fonts:", indent.child(3)),
        ];
        for asset in assets {
            fragment.push(format!("{}  - asset: {asset}", indent.child(3)));
        }
        fragment
    });

    let rendered = doc.render();
    if rendered != contents {
        fs::write(pubspec_path, rendered).with_context(|| format!("write {pubspec_path}"))?;
    }
    Ok(())
}

/// Ensure the platform-conditional `fontFamily:` declaration in the
/// theme construction, plus its `dart:io` import. A missing anchor is
/// advisory: the import still lands, the declaration is skipped.
fn patch_main(main_path: &Utf8Path) -> anyhow::Result<Option<Advisory>> {
    let contents = fs::read_to_string(main_path).with_context(|| format!("read {main_path}"))?;
    let mut doc = TextDocument::parse(&contents);
    let declaration = format!("fontFamily: Platform.isWindows ? '{FONT_FAMILY}' : null,");

    let outcome = ensure_declaration(
        &mut doc,
        &DeclarationSpec {
            unique_marker: FONT_FAMILY,
            prerequisite: "import 'dart:io';",
            prerequisite_family: "import ",
            anchor: "ThemeData(",
            declaration_key: "fontFamily:",
            declaration: &declaration,
            lookahead: DEFAULT_LOOKAHEAD,
        },
    );
    if outcome.changed() {
        fs::write(main_path, doc.render()).with_context(|| format!("write {main_path}"))?;
    }
    if outcome.is_missing_anchor() {
        info!(%main_path, "no ThemeData anchor; fontFamily declaration skipped");
        return Ok(Some(Advisory::MissingAnchor {
            path: main_path.to_string(),
        }));
    }
    Ok(None)
}

/// Directories under `root` holding both a descriptor and a pubspec.
fn find_tools(root: &Utf8Path) -> anyhow::Result<Vec<Utf8PathBuf>> {
    let mut out = Vec::new();
    if !root.is_dir() {
        return Ok(out);
    }
    walk(root, &mut out)?;
    out.sort();
    Ok(out)
}

fn walk(dir: &Utf8Path, out: &mut Vec<Utf8PathBuf>) -> anyhow::Result<()> {
    if dir.join("tool.yaml").is_file() && dir.join("pubspec.yaml").is_file() {
        out.push(dir.to_path_buf());
    }
    for entry in fs::read_dir(dir).with_context(|| format!("read dir {dir}"))? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            let path = Utf8PathBuf::from_path_buf(entry.path())
                .map_err(|p| anyhow::anyhow!("non-utf8 path: {}", p.display()))?;
            walk(&path, out)?;
        }
    }
    Ok(())
}
