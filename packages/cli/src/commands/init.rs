use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;
use pagecraft_editor::{DocumentStore, FileStore};
use pagecraft_model::{IdGenerator, Node, NodeKind, Tree};
use serde_json::json;
use std::path::PathBuf;
use std::rc::Rc;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Directory to initialize (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: String,
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let root = PathBuf::from(cwd).join(&args.path);
    std::fs::create_dir_all(&root)?;

    let config_path = root.join(DEFAULT_CONFIG_NAME);
    if config_path.exists() {
        bail!("{} already exists", DEFAULT_CONFIG_NAME);
    }

    let config = Config::default();
    std::fs::write(&config_path, serde_json::to_string_pretty(&config)?)?;
    println!("  {} {}", "✓".green(), DEFAULT_CONFIG_NAME);

    let store = FileStore::new(root.join(&config.documents_dir));
    store.save("home", &sample_tree())?;
    println!("  {} {}/home.json", "✓".green(), config.documents_dir);

    println!();
    println!("{}", "Project ready.".green().bold());
    println!("Try: pagecraft generate home --stdout");

    Ok(())
}

fn sample_tree() -> Tree {
    let mut ids = IdGenerator::new("home");

    let mut heading = Node::new(ids.new_id(), NodeKind::Heading);
    heading.properties.insert("level".to_string(), json!(1));
    heading
        .properties
        .insert("text".to_string(), json!("Welcome"));

    let mut intro = Node::new(ids.new_id(), NodeKind::Text);
    intro.properties.insert(
        "text".to_string(),
        json!("Assemble this page, then generate it."),
    );

    let mut page = Node::new(ids.new_id(), NodeKind::Container);
    page.properties.insert("autoFill".to_string(), json!(true));
    page.properties
        .insert("direction".to_string(), json!("column"));
    page.undeletable = true;
    page.children = vec![Rc::new(heading), Rc::new(intro)];

    Tree::from_roots(vec![page])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_writes_config_and_sample_document() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().display().to_string();

        init(
            InitArgs {
                path: ".".to_string(),
            },
            &cwd,
        )
        .unwrap();

        assert!(dir.path().join(DEFAULT_CONFIG_NAME).exists());
        assert!(dir.path().join("documents").join("home.json").exists());
    }

    #[test]
    fn test_init_refuses_to_clobber_existing_config() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().display().to_string();

        let args = || InitArgs {
            path: ".".to_string(),
        };
        init(args(), &cwd).unwrap();

        assert!(init(args(), &cwd).is_err());
    }
}
