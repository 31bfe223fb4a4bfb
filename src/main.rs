use clap::{Parser, Subcommand};
use folio_gal::dom::Document;
use folio_gal::listing::StorageClient;
use folio_gal::page::{Page, PageContext};
use folio_gal::scaffold::{self, LoadControls};
use folio_gal::{config, output, projects};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "folio-gal")]
#[command(about = "Gallery and project-grid tooling for static portfolio sites")]
#[command(long_about = "\
Gallery and project-grid tooling for static portfolio sites

Galleries live in an object-storage bucket as <project>/<folder>/<file>.
Storage settings come from folio.toml in the config directory:

  [storage]
  url = \"https://your-project.supabase.co\"
  bucket = \"photos\"
  anon_key = \"public-anon-key\"

Run 'folio-gal gen-config' to print a documented folio.toml.
Set RUST_LOG=debug to trace page requests.")]
#[command(version)]
struct Cli {
    /// Directory containing folio.toml
    #[arg(long, default_value = ".", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Page through a gallery folder and list its photos
    Gallery {
        /// Project name (first path segment in the bucket)
        #[arg(long)]
        project: String,
        /// Folder inside the project
        #[arg(long)]
        folder: Option<String>,
        /// Entries requested per page
        #[arg(long)]
        page_size: Option<u32>,
        /// Stop after this many pages (default: until the listing ends)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        pages: Option<u32>,
        /// Write the rendered gallery page to this file
        #[arg(long)]
        html: Option<PathBuf>,
    },
    /// Render the project card grid from a JSON array of records
    Projects {
        /// JSON file holding the project records
        records: PathBuf,
        /// Path of the page hosting the grid; links are relative to it
        #[arg(long, default_value = "/index.html")]
        path: String,
        /// Write the rendered grid page to this file
        #[arg(long)]
        html: Option<PathBuf>,
    },
    /// Print a stock folio.toml with all options documented
    GenConfig,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Gallery {
            project,
            folder,
            page_size,
            pages,
            html,
        } => {
            let site_config = config::load_config(&cli.config)?;
            let client = site_config
                .storage
                .clone()
                .map(StorageClient::new)
                .transpose()?;

            let mut doc = Document::new(&format!("/projects/{project}/"));
            let page_size = page_size.map(|n| n.to_string());
            let mut data = vec![("project", project.as_str())];
            if let Some(folder) = &folder {
                data.push(("folder", folder.as_str()));
            }
            if let Some(page_size) = &page_size {
                data.push(("page-size", page_size.as_str()));
            }
            scaffold::gallery_page(&mut doc, &data, LoadControls::Bottom);

            let mut page = Page::new(
                doc,
                client,
                PageContext {
                    storage: site_config.storage,
                    projects: None,
                },
            );
            let requested = page.load_pages(pages).await;
            tracing::debug!(requested, "gallery pages requested");

            output::print_gallery_output(page.gallery(), page.document());
            if let Some(path) = html {
                std::fs::write(&path, page.document().render())?;
                println!("Wrote {}", path.display());
            }
        }
        Command::Projects {
            records,
            path,
            html,
        } => {
            let content = std::fs::read_to_string(&records)?;
            let records = projects::load_records(&content)?;

            let mut doc = Document::new(&path);
            scaffold::projects_grid(&mut doc);
            let page: Page<StorageClient> = Page::new(
                doc,
                None,
                PageContext {
                    storage: None,
                    projects: records.clone(),
                },
            );

            output::print_projects_output(
                records.as_deref().unwrap_or_default(),
                projects::is_projects_page(&path),
            );
            if let Some(out) = html {
                std::fs::write(&out, page.document().render())?;
                println!("Wrote {}", out.display());
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gallery_pages_must_be_positive() {
        let parse = |pages: &str| {
            Cli::try_parse_from(["folio-gal", "gallery", "--project", "camaro", "--pages", pages])
        };
        assert!(parse("0").is_err());
        match parse("2").unwrap().command {
            Command::Gallery { pages, .. } => assert_eq!(pages, Some(2)),
            _ => panic!("expected gallery command"),
        }
    }
}
