use std::path::Path;

use anyhow::{bail, Context};
use colored::Colorize;
use flatcms_auth::CredentialStore;
use flatcms_render::ContentRenderer;
use flatcms_server::{CmsConfig, CmsServer};
use flatcms_store::{DocumentStore, FsDocumentStore};
use tracing::{debug, info};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref(), cli.root.clone())?;
    match cli.command {
        Command::Serve(args) => cmd_serve(config, args),
        Command::List => cmd_list(&config, cli.format),
        Command::Show(args) => cmd_show(&config, args, cli.format),
        Command::User(args) => cmd_user(&config, args.action, cli.format),
    }
}

/// Defaults, then the TOML file if given, then command-line overrides.
fn load_config(path: Option<&Path>, root: Option<std::path::PathBuf>) -> anyhow::Result<CmsConfig> {
    let mut config = match path {
        Some(path) => CmsConfig::from_toml_file(path)?,
        None => CmsConfig::default(),
    };
    if let Some(root) = root {
        config.storage_root = root;
    }
    debug!(
        file = ?path,
        root = %config.storage_root.display(),
        bind = %config.bind_addr,
        "configuration loaded"
    );
    Ok(config)
}

fn cmd_serve(mut config: CmsConfig, args: ServeArgs) -> anyhow::Result<()> {
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    let server = CmsServer::new(config)?;
    let runtime = tokio::runtime::Runtime::new().context("failed to start the async runtime")?;
    runtime.block_on(server.serve())?;
    Ok(())
}

fn open_documents(config: &CmsConfig) -> anyhow::Result<FsDocumentStore> {
    FsDocumentStore::open(config.data_dir())
        .with_context(|| format!("cannot open document store at {}", config.data_dir().display()))
}

fn open_credentials(config: &CmsConfig) -> anyhow::Result<CredentialStore> {
    CredentialStore::open(config.credentials_path()).with_context(|| {
        format!("cannot open credential file at {}", config.credentials_path().display())
    })
}

fn sorted_names(store: &dyn DocumentStore) -> anyhow::Result<Vec<String>> {
    let mut names = store.list()?;
    names.sort();
    Ok(names)
}

fn cmd_list(config: &CmsConfig, format: OutputFormat) -> anyhow::Result<()> {
    let names = sorted_names(&open_documents(config)?)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&names)?),
        OutputFormat::Text if names.is_empty() => println!("No documents."),
        OutputFormat::Text => {
            for name in &names {
                println!("  {}", name.bold());
            }
        }
    }
    Ok(())
}

fn cmd_show(config: &CmsConfig, args: ShowArgs, format: OutputFormat) -> anyhow::Result<()> {
    let store = open_documents(config)?;
    let content = store.read(&args.name)?;
    let (body, content_type) = if args.raw {
        (content, "text/plain".to_string())
    } else {
        let rendered = ContentRenderer::default().render(&args.name, &content)?;
        (rendered.body, rendered.content_type.to_string())
    };

    match format {
        OutputFormat::Json => {
            let value = serde_json::json!({
                "name": args.name,
                "content_type": content_type,
                "body": body,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Text => print!("{body}"),
    }
    Ok(())
}

fn cmd_user(config: &CmsConfig, action: UserAction, format: OutputFormat) -> anyhow::Result<()> {
    let credentials = open_credentials(config)?;
    match action {
        UserAction::Add { username, password } => {
            credentials.add(&username, &password)?;
            info!(username = %username, path = %credentials.path().display(), "user added from the command line");
            match format {
                OutputFormat::Json => println!("{}", serde_json::json!({ "added": username })),
                OutputFormat::Text => println!("{} Added user {}", "✓".green().bold(), username.bold()),
            }
            Ok(())
        }
        UserAction::Verify { username, password } => {
            let valid = credentials.verify(&username, &password)?;
            match format {
                OutputFormat::Json => {
                    println!("{}", serde_json::json!({ "username": username, "valid": valid }))
                }
                OutputFormat::Text if valid => {
                    println!("{} Credentials valid for {}", "✓".green().bold(), username.bold())
                }
                OutputFormat::Text => println!("{} Invalid credentials", "✗".red().bold()),
            }
            if !valid {
                bail!("invalid credentials for {username}");
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_flag_overrides_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flatcms.toml");
        std::fs::write(&path, "storage_root = \"/srv/cms\"\nsession_cookie = \"sid\"\n").unwrap();

        let config = load_config(Some(&path), Some(dir.path().to_path_buf())).unwrap();
        assert_eq!(config.storage_root, dir.path());
        assert_eq!(config.session_cookie, "sid");

        let config = load_config(Some(&path), None).unwrap();
        assert_eq!(config.storage_root, Path::new("/srv/cms"));
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(Some(&dir.path().join("nope.toml")), None).is_err());
    }

    #[test]
    fn listing_is_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let config = CmsConfig::with_root(dir.path());
        let store = open_documents(&config).unwrap();
        store.overwrite("zebra.txt", "").unwrap();
        store.overwrite("about.md", "").unwrap();
        assert_eq!(sorted_names(&store).unwrap(), vec!["about.md", "zebra.txt"]);
    }

    #[test]
    fn user_commands_share_the_credential_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = CmsConfig::with_root(dir.path());
        let add = UserAction::Add {
            username: "admin".into(),
            password: "secret".into(),
        };
        cmd_user(&config, add, OutputFormat::Json).unwrap();

        let good = UserAction::Verify {
            username: "admin".into(),
            password: "secret".into(),
        };
        cmd_user(&config, good, OutputFormat::Json).unwrap();

        let bad = UserAction::Verify {
            username: "admin".into(),
            password: "wrong".into(),
        };
        assert!(cmd_user(&config, bad, OutputFormat::Json).is_err());
    }

    #[test]
    fn show_missing_document_fails() {
        let dir = tempfile::tempdir().unwrap();
        let config = CmsConfig::with_root(dir.path());
        let args = ShowArgs {
            name: "ghost.md".into(),
            raw: false,
        };
        assert!(cmd_show(&config, args, OutputFormat::Text).is_err());
    }
}
