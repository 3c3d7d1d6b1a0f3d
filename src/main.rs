use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};

use scankit::init_logging;
use scankit_export::{export_chapter_zip, ExportQuality};
use scankit_model::{DocumentStore, Project};
use scankit_services::images::probe_dimensions;
use scankit_services::{
    process_chapter, HttpInpaintClient, HttpOcrClient, HttpTranslationClient, PipelineClients,
};
use scankit_settings::ScanKitConfig;

const USAGE: &str = "\
scankit - comic/manga localization studio (headless driver)

USAGE:
    scankit import <project.json> <project-name> <chapter-title> <image>...
    scankit process <project.json> <chapter-index>
    scankit export <project.json> <chapter-index> <out.zip>

Project files are JSON snapshots of a single project. RUST_LOG controls
log verbosity; service endpoints and export quality come from the
config file (see `scankit-settings`).";

fn main() -> anyhow::Result<()> {
    init_logging()?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("import") if args.len() >= 5 => cmd_import(&args[1], &args[2], &args[3], &args[4..]),
        Some("process") if args.len() == 3 => cmd_process(&args[1], &args[2]),
        Some("export") if args.len() == 4 => cmd_export(&args[1], &args[2], &args[3]),
        _ => {
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    }
}

/// Creates a project with one chapter from a list of page images. Page
/// logical sizes come from the decoded images (with a default fallback
/// for undecodable files).
fn cmd_import(
    project_file: &str,
    project_name: &str,
    chapter_title: &str,
    images: &[String],
) -> anyhow::Result<()> {
    let config = ScanKitConfig::load_default().unwrap_or_default();
    let mut store = DocumentStore::new();

    let project_id = store.create_project(
        project_name,
        config.languages.source_lang.clone(),
        config.languages.target_lang.clone(),
    );
    let chapter_id = store
        .create_chapter(project_id, chapter_title)
        .context("chapter creation failed")?;

    for image in images {
        let (width, height) = probe_dimensions(Path::new(image));
        store
            .add_page(chapter_id, image.clone(), width, height)
            .context("page creation failed")?;
    }

    let project = store
        .project(project_id)
        .context("project vanished after creation")?;
    save_project(Path::new(project_file), project)?;
    tracing::info!(
        project = project_name,
        pages = images.len(),
        "imported chapter"
    );
    println!("Imported {} pages into {project_file}", images.len());
    Ok(())
}

/// Runs the OCR → translate → inpaint pipeline over one chapter and
/// writes the updated project snapshot back.
fn cmd_process(project_file: &str, chapter_index: &str) -> anyhow::Result<()> {
    let config = ScanKitConfig::load_default().unwrap_or_default();
    let project = load_project(Path::new(project_file))?;
    let chapter_index: usize = chapter_index.parse().context("bad chapter index")?;

    let mut store = DocumentStore::new();
    let project_id = store.insert_project(project);
    let chapter_id = chapter_at(&store, project_id, chapter_index)?;

    let services = &config.services;
    let ocr = HttpOcrClient::new(
        services.ocr_endpoint.clone(),
        services.api_key.clone(),
        services.timeout_secs,
    )?;
    let translator = HttpTranslationClient::new(
        services.translate_endpoint.clone(),
        services.api_key.clone(),
        services.timeout_secs,
    )?;
    let inpainter = HttpInpaintClient::new(
        services.inpaint_endpoint.clone(),
        services.api_key.clone(),
        services.timeout_secs,
    )?;

    let runtime = tokio::runtime::Runtime::new()?;
    let summary = runtime.block_on(process_chapter(
        &mut store,
        chapter_id,
        PipelineClients {
            ocr: &ocr,
            translator: &translator,
            inpainter: &inpainter,
        },
        Some(Arc::new(|i, n, msg| {
            println!("[{i}/{n}] {msg}");
        })),
    ));

    let project = store
        .project(project_id)
        .context("project vanished during processing")?;
    save_project(Path::new(project_file), project)?;
    println!(
        "Processed {} pages ({} failed)",
        summary.processed, summary.failed
    );
    Ok(())
}

/// Renders one chapter to a ZIP of flattened PNG pages.
fn cmd_export(project_file: &str, chapter_index: &str, out: &str) -> anyhow::Result<()> {
    let config = ScanKitConfig::load_default().unwrap_or_default();
    let project = load_project(Path::new(project_file))?;
    let chapter_index: usize = chapter_index.parse().context("bad chapter index")?;
    let chapter = project
        .chapters
        .get(chapter_index)
        .with_context(|| format!("no chapter at index {chapter_index}"))?;

    // Image urls resolve relative to the project file's directory.
    let base: PathBuf = Path::new(project_file)
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    let loader = move |url: &str| {
        let path = if Path::new(url).is_absolute() {
            PathBuf::from(url)
        } else {
            base.join(url)
        };
        match image::open(&path) {
            Ok(img) => Some(img),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "background decode failed");
                None
            }
        }
    };

    let quality: ExportQuality = config.export.quality;
    let file = std::fs::File::create(out).with_context(|| format!("cannot create {out}"))?;
    let count = export_chapter_zip(file, chapter, &loader, quality)?;
    println!("Exported {count} pages to {out}");
    Ok(())
}

fn chapter_at(
    store: &DocumentStore,
    project_id: uuid::Uuid,
    index: usize,
) -> anyhow::Result<uuid::Uuid> {
    let project = store.project(project_id).context("unknown project")?;
    match project.chapters.get(index) {
        Some(chapter) => Ok(chapter.id),
        None => bail!("no chapter at index {index}"),
    }
}

fn load_project(path: &Path) -> anyhow::Result<Project> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("bad project file {}", path.display()))
}

fn save_project(path: &Path, project: &Project) -> anyhow::Result<()> {
    let raw = serde_json::to_string_pretty(project)?;
    std::fs::write(path, raw).with_context(|| format!("cannot write {}", path.display()))?;
    Ok(())
}
