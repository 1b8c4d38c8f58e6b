use anyhow::Context;
use camino::Utf8PathBuf;
use clap::Parser;
use fs_err as fs;
use toolcrib_registry::{RepoIdentity, infer_repo_identity, load_registry, persist_with_mirrors, reconcile};
use toolcrib_types::spec::{ToolDescriptor, defaults, title_from_id};
use toolcrib_types::status::Advisory;
use tracing::warn;

#[derive(Debug, Parser)]
pub struct CreateToolArgs {
    #[arg(long)]
    enterprise_id: String,

    /// Display name; derived from the id when omitted.
    #[arg(long)]
    enterprise_name: Option<String>,

    #[arg(long)]
    tool_id: String,

    /// Display name; derived from the id when omitted.
    #[arg(long)]
    tool_name: Option<String>,

    #[arg(long, default_value = "0.1.0")]
    version: String,

    #[arg(long, default_value = "")]
    description: String,

    /// Overwrite an existing registry entry instead of failing.
    #[arg(long, default_value_t = false)]
    update: bool,

    /// GitHub repo in owner/name form; inferred from the origin remote
    /// when omitted.
    #[arg(long)]
    repo: Option<String>,

    /// Tenants root the tool directory is created under.
    #[arg(long, default_value = "tenants")]
    root: Utf8PathBuf,

    /// Primary registry document.
    #[arg(long, default_value = "registry.json")]
    registry: Utf8PathBuf,

    /// Mirror copies of the registry (only written when they already
    /// exist).
    #[arg(long = "mirror", default_value = "app/assets/registry.json")]
    mirrors: Vec<Utf8PathBuf>,
}

pub fn run(args: CreateToolArgs) -> anyhow::Result<()> {
    let enterprise_id = args.enterprise_id.trim().to_string();
    let tool_id = args.tool_id.trim().to_string();
    if enterprise_id.is_empty() || tool_id.is_empty() {
        anyhow::bail!("enterprise id and tool id are required");
    }

    let enterprise_name = args
        .enterprise_name
        .unwrap_or_else(|| title_from_id(&enterprise_id));
    let tool_name = args.tool_name.unwrap_or_else(|| title_from_id(&tool_id));
    let description = if args.description.is_empty() {
        format!("Tool for {enterprise_name}.")
    } else {
        args.description
    };

    let tool_dir = args.root.join(&enterprise_id).join("tools").join(&tool_id);
    fs::create_dir_all(&tool_dir).with_context(|| format!("create {tool_dir}"))?;

    let spec_path = tool_dir.join("tool.yaml");
    if spec_path.exists() && !args.update {
        anyhow::bail!("{spec_path} already exists; use --update to overwrite the registry entry");
    }
    if !spec_path.exists() {
        fs::write(&spec_path, default_tool_yaml(&tool_id, &args.version))
            .with_context(|| format!("write {spec_path}"))?;
    }

    let identity = match &args.repo {
        Some(slug) if slug.contains('/') => Some(RepoIdentity::new(slug.clone())),
        Some(slug) => anyhow::bail!("--repo must be owner/name, got '{slug}'"),
        None => infer_repo_identity(camino::Utf8Path::new(".")),
    };
    if identity.is_none() {
        let advisory = Advisory::UnresolvableIdentity;
        warn!(%advisory, "proceeding without repository identity");
        eprintln!("Warning: could not infer GitHub repo; URLs are empty.");
    }

    let descriptor = ToolDescriptor {
        enterprise_id,
        enterprise_name,
        tool_id,
        tool_name,
        version: args.version.clone(),
        description,
    };

    let mut registry = load_registry(&args.registry)?;
    reconcile(&mut registry, &descriptor, identity.as_ref(), args.update)?;
    let written = persist_with_mirrors(&registry, &args.registry, &args.mirrors)?;

    println!("Created tool at {tool_dir}");
    for path in written {
        println!("Updated {path}");
    }
    Ok(())
}

fn default_tool_yaml(tool_id: &str, version: &str) -> String {
    format!(
        "name: {tool_id}\nversion: {version}\nbuild:\n  windows: {}\n  macos: {}\npackage:\n  windows: {}\n  macos: {}\n",
        defaults::BUILD_WINDOWS,
        defaults::BUILD_MACOS,
        defaults::PACKAGE_WINDOWS,
        defaults::PACKAGE_MACOS,
    )
}
