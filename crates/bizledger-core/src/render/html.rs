//! Self-contained HTML output for print and iframe preview.

use askama::Template;
use tracing::debug;

use super::assets::AssetRef;
use super::document::{InvoiceDocument, PartyBlock, COLUMNS};
use super::{DocumentRenderer, RenderOptions, Result};
use crate::models::invoice::Invoice;

struct ImageView {
    src: String,
    /// Loaded by the browser; falls back to the placeholder on error.
    linked: bool,
}

impl ImageView {
    fn new(asset: &AssetRef, placeholder: &str) -> Self {
        Self {
            src: asset.html_src(placeholder),
            linked: matches!(asset, AssetRef::Linked(_)),
        }
    }
}

#[derive(Template)]
#[template(path = "invoice.html")]
struct InvoiceTemplate<'a> {
    doc: &'a InvoiceDocument,
    parties: [&'a PartyBlock; 2],
    columns: &'a [&'a str],
    has_notes: bool,
    signature: Vec<ImageView>,
    has_gallery: bool,
    gallery: Vec<ImageView>,
    placeholder: &'a str,
}

/// Renders invoices to a single HTML string with inline CSS and images.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl HtmlRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Render an already shaped document.
    pub fn render_document(
        &self,
        doc: &InvoiceDocument,
        options: &RenderOptions,
    ) -> Result<String> {
        let placeholder = options.config.placeholder_image_url.as_str();
        let gallery: Vec<ImageView> = doc
            .attachments
            .iter()
            .map(|a| ImageView::new(a, placeholder))
            .collect();

        let template = InvoiceTemplate {
            doc,
            parties: [&doc.from, &doc.to],
            columns: &COLUMNS,
            has_notes: !doc.notes.is_empty(),
            signature: doc
                .signature
                .iter()
                .map(|a| ImageView::new(a, placeholder))
                .collect(),
            has_gallery: !gallery.is_empty(),
            gallery,
            placeholder,
        };

        let html = template.render()?;
        debug!("Rendered HTML for {} ({} bytes)", doc.document_number, html.len());
        Ok(html)
    }
}

impl DocumentRenderer for HtmlRenderer {
    type Output = String;

    fn render(&self, invoice: &Invoice, options: &RenderOptions) -> Result<String> {
        let doc = InvoiceDocument::build(invoice, options);
        self.render_document(&doc, options)
    }

    fn extension(&self) -> &'static str {
        "html"
    }
}
