use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use pagecraft_compiler_vue::generate as compile_document;
use pagecraft_editor::{DocumentStore, FileStore};
use pagecraft_model::Tree;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Document name (looked up in the documents directory) or a .json path
    pub document: String,

    /// Component name embedded in the output (defaults to the document name)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Output directory (overrides config)
    #[arg(short, long)]
    pub out_dir: Option<String>,

    /// Print to stdout instead of writing a file
    #[arg(long)]
    pub stdout: bool,
}

pub fn generate(args: GenerateArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;

    let (tree, document_name) = load_document(&args.document, &config, cwd)?;
    let component_name = args
        .name
        .clone()
        .unwrap_or_else(|| pascal_case(&document_name));

    let output = compile_document(&tree, &component_name);

    if args.stdout {
        println!("{}", output);
        return Ok(());
    }

    let out_dir = args
        .out_dir
        .clone()
        .map(|dir| PathBuf::from(cwd).join(dir))
        .unwrap_or_else(|| config.out_path(cwd));
    std::fs::create_dir_all(&out_dir)?;

    let out_file = out_dir.join(format!("{}.vue", document_name));
    std::fs::write(&out_file, format!("{}\n", output))?;

    println!(
        "  {} {} → {}",
        "✓".green(),
        document_name,
        out_file.display()
    );
    Ok(())
}

fn load_document(document: &str, config: &Config, cwd: &str) -> Result<(Tree, String)> {
    let as_path = Path::new(document);

    if as_path.extension().map(|ext| ext == "json").unwrap_or(false) {
        let path = if as_path.is_absolute() {
            as_path.to_path_buf()
        } else {
            PathBuf::from(cwd).join(as_path)
        };
        let content = std::fs::read_to_string(&path)
            .map_err(|err| anyhow!("Cannot read {}: {}", path.display(), err))?;
        let tree: Tree = serde_json::from_str(&content)?;
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .ok_or_else(|| anyhow!("Cannot derive a document name from {}", path.display()))?;
        Ok((tree, name))
    } else {
        let store = FileStore::new(config.documents_path(cwd));
        let tree = store.load(document)?;
        Ok((tree, document.to_string()))
    }
}

/// `product-detail` → `ProductDetail`
fn pascal_case(name: &str) -> String {
    name.split(|ch: char| !ch.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}
