use acid_storage::{derive_store_key, CliConfig, ManifestSecretStore, Project, Storage};
use anyhow::Context as _;
use clap::{Arg, ArgAction, ArgMatches, Command};
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("acid-storage")
        .version(acid_storage::VERSION)
        .about("Look up acid project configuration")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("key")
                .about("Print the store key for a project name")
                .arg(
                    Arg::new("name")
                        .required(true)
                        .help("Project name, e.g. deis/acid"),
                ),
        )
        .subcommand(
            Command::new("get")
                .about("Load a project from secret manifests")
                .arg(
                    Arg::new("id")
                        .required(true)
                        .help("Project name or acid- store key"),
                )
                .arg(
                    Arg::new("namespace")
                        .long("namespace")
                        .short('n')
                        .help("Namespace to look in [env: ACID_NAMESPACE, default: default]"),
                )
                .arg(
                    Arg::new("manifests")
                        .long("manifests")
                        .help("Manifest root directory [env: ACID_MANIFEST_DIR, default: secrets]"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                )
                .arg(
                    Arg::new("reveal")
                        .long("reveal")
                        .action(ArgAction::SetTrue)
                        .help("Show credentials instead of masking them"),
                ),
        )
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = cli().get_matches();
    if let Err(err) = run(&matches).await {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

async fn run(matches: &ArgMatches) -> anyhow::Result<()> {
    match matches.subcommand() {
        Some(("key", args)) => {
            let name = args
                .get_one::<String>("name")
                .context("missing project name")?;
            println!("{}", derive_store_key(name));
        }
        Some(("get", args)) => {
            let config = get_config(args, |key| std::env::var(key).ok());
            print!("{}", get(args, &config).await?);
        }
        _ => {}
    }
    Ok(())
}

/// Merge `get` flags over the environment and built-in defaults
fn get_config(args: &ArgMatches, env: impl Fn(&str) -> Option<String>) -> CliConfig {
    let mut config = CliConfig::from_lookup(env);
    if let Some(ns) = args.get_one::<String>("namespace") {
        config = config.with_namespace(ns.as_str());
    }
    if let Some(dir) = args.get_one::<String>("manifests") {
        config = config.with_manifest_dir(dir.as_str());
    }
    config
}

async fn get(args: &ArgMatches, config: &CliConfig) -> anyhow::Result<String> {
    let id = args.get_one::<String>("id").context("missing project id")?;

    let storage = Storage::new(ManifestSecretStore::new(config.manifest_dir.clone()));
    let project = storage
        .get(id, &config.namespace)
        .await
        .with_context(|| format!("loading project {id}"))?;

    render(&project, args.get_flag("reveal"), args.get_flag("json"))
}

fn render(project: &Project, reveal: bool, json: bool) -> anyhow::Result<String> {
    let project = if reveal {
        project.clone()
    } else {
        project.redacted()
    };

    if json {
        Ok(serde_json::to_string_pretty(&project)? + "\n")
    } else {
        Ok(summary(&project))
    }
}

fn summary(project: &Project) -> String {
    let mut out = format!(
        "Project: {}\n  Repository: {}\n  Clone URL: {}\n  SSH key: {}\n  Namespace: {}\n  \
         VCS sidecar: {}\n  Shared secret: {}\n  GitHub token: {}\n  Secrets: {}\n",
        project.name,
        project.repo.name,
        or_unset(&project.repo.clone_url),
        or_unset(&project.repo.ssh_key),
        project.kubernetes.namespace,
        project.kubernetes.vcs_sidecar,
        or_unset(&project.shared_secret),
        or_unset(&project.github_token),
        project.secrets.len(),
    );
    for (key, value) in &project.secrets {
        out.push_str(&format!("    {key}={value}\n"));
    }
    out
}

fn or_unset(value: &str) -> &str {
    if value.is_empty() {
        "(unset)"
    } else {
        value
    }
}
