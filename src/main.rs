use anyhow::Result;
use clap::Parser;
use unite::domain::areas::repository::Repository;
use unite::domain::options::OptionFlags;

#[derive(Parser)]
#[command(
    name = "unite",
    version = "0.1.0",
    about = "Unite git index path casing with the host filesystem",
    long_about = "Reconciles the casing of paths recorded in the git index with the casing \
    actually reported by the host filesystem. On case-insensitive filesystems the two \
    silently drift apart when entries are created, renamed or moved with different casing.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[arg(help = "Paths to git repositories (defaults to the current directory)")]
    paths: Vec<String>,
    #[arg(long, help = "Report proposed changes without applying them")]
    dry_run: bool,
    #[arg(short = 'd', long, help = "Only reconcile directory name casing")]
    directories_only: bool,
    #[arg(short = 'f', long, help = "Only reconcile file name casing")]
    files_only: bool,
    #[arg(
        long,
        help = "Rename host filesystem entries instead of rewriting the index"
    )]
    host: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let options = OptionFlags::from_cli(cli.dry_run, cli.directories_only, cli.files_only, cli.host);

    let paths = if cli.paths.is_empty() {
        vec![std::env::current_dir()?.to_string_lossy().into_owned()]
    } else {
        cli.paths
    };

    for path in &paths {
        let mut repository = Repository::new(path, Box::new(std::io::stdout()))?;
        repository.reconcile(options)?;
    }

    Ok(())
}
