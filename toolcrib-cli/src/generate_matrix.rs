use camino::Utf8PathBuf;
use clap::Parser;
use toolcrib_matrix::{GitRevisions, build_matrix, resolve, write_github_output};
use tracing::debug;

#[derive(Debug, Parser)]
pub struct GenerateMatrixArgs {
    /// Repository root.
    #[arg(long, default_value = ".")]
    repo_root: Utf8PathBuf,

    /// Build every tool instead of diffing a revision range.
    #[arg(long, env = "BUILD_ALL", default_value_t = false)]
    all: bool,

    /// Base revision ("before") of the push range.
    #[arg(long, env = "BEFORE", default_value = "")]
    before: String,

    /// Head revision ("after") of the push range.
    #[arg(long, env = "AFTER", default_value = "")]
    after: String,

    /// GitHub Actions output file; the matrix goes to stdout when
    /// unset.
    #[arg(long, env = "GITHUB_OUTPUT")]
    github_output: Option<Utf8PathBuf>,
}

pub fn run(args: GenerateMatrixArgs) -> anyhow::Result<()> {
    let revisions = GitRevisions::new(args.repo_root.clone());
    let change_set = resolve(&args.repo_root, &revisions, args.all, &args.before, &args.after)?;
    debug!(reason = ?change_set.reason, tools = change_set.specs.len(), "change set resolved");

    let matrix = build_matrix(&args.repo_root, &change_set.specs)?;

    match &args.github_output {
        Some(path) => write_github_output(path, &matrix)?,
        None => println!("{}", serde_json::to_string(&matrix)?),
    }
    Ok(())
}
