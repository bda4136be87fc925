//! Format listings, previews and mutation reports as text.

use crate::listing::{classify_file, extension_badge, supports_3d_preview};
use crate::session::{FolderPreview, PurgeReport};
use crate::types::{Item, ListingContext};
use crate::upload::UploadReport;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;

/// Format a section heading with bold/underline.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

fn context_title(context: &ListingContext) -> String {
    match context {
        ListingContext::Root => "Folders".to_string(),
        ListingContext::Folder(id) => format!("Folder {}", id),
    }
}

/// Format a listing as a table. Folders show their id, files their kind,
/// extension badge and storage path. Files the 3D viewer can open are
/// marked in the kind column.
pub fn format_listing_text(context: &ListingContext, items: &[Item]) -> String {
    let mut out = format!("{}\n\n", format_section_heading(&context_title(context)));
    if items.is_empty() {
        out.push_str("  (empty)\n");
        return out;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Name", "Kind", "Ext", "Id / Path"]);
    for item in items {
        match item {
            Item::Folder(folder) => {
                table.add_row(vec![
                    folder.name.clone(),
                    "folder".to_string(),
                    String::new(),
                    folder.id.clone(),
                ]);
            }
            Item::File(file) => {
                let mut kind = classify_file(file).as_str().to_string();
                if supports_3d_preview(item) {
                    kind.push_str(" (3D)");
                }
                table.add_row(vec![
                    file.name.clone(),
                    kind,
                    extension_badge(&file.name),
                    file.file_path.clone(),
                ]);
            }
        }
    }
    out.push_str(&format!("{}\n", table));
    out.push_str(&format!("\n{} item(s)", items.len()));
    out
}

pub fn format_purge_report(id: &str, report: &PurgeReport) -> String {
    let mut out = format!(
        "{}\n\n",
        format_section_heading(&format!("Deleted folder {}", id))
    );
    out.push_str(&format!("  Objects deleted: {}\n", report.deleted.len()));
    if let Some(ref err) = report.listing_error {
        out.push_str(&format!("  Listing failed: {}\n", err));
    }
    if !report.failed.is_empty() {
        out.push_str(&format!("  Objects left behind: {}\n\n", report.failed.len()));
        let mut table = Table::new();
        table.load_preset(UTF8_BORDERS_ONLY);
        table.set_header(vec!["Path", "Error"]);
        for (path, reason) in &report.failed {
            table.add_row(vec![path.clone(), reason.clone()]);
        }
        out.push_str(&format!("{}\n", table));
    }
    out
}

pub fn format_upload_report(report: &UploadReport) -> String {
    let mut out = format!(
        "Uploaded {} file(s), {} bytes\n",
        report.paths.len(),
        report.total_bytes
    );
    for path in &report.paths {
        out.push_str(&format!("  {}\n", path));
    }
    out
}

pub fn format_preview_text(id: &str, preview: &FolderPreview) -> String {
    match preview {
        FolderPreview::Cover { path, url } => format!("{}: cover {}\n  {}", id, path, url),
        FolderPreview::Image { path, url } => format!("{}: image {}\n  {}", id, path, url),
        FolderPreview::Pdf { path, url } => format!("{}: pdf {}\n  {}", id, path, url),
        FolderPreview::None => format!("{}: no preview", id),
    }
}
