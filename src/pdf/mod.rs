//! PDF rendering of issued invoices.
//!
//! Produces a single A4 page with the standard Helvetica fonts in
//! WinAnsi encoding, so `€` and Latin-1 text print without embedding a font.

mod encoding;

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId, Stream, StringFormat, dictionary};

use crate::core::{InvoiceError, IssuedInvoice, fields, footer_lines, format_eur, vat_label};

pub use encoding::encode_win_ansi;

const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN_LEFT: i64 = 57;
const AMOUNT_COLUMN: i64 = 400;
const FOOTER_TOP: i64 = 90;

/// Render the invoice as PDF bytes.
pub fn render_pdf(invoice: &IssuedInvoice) -> Result<Vec<u8>, InvoiceError> {
    let mut doc = Document::with_version("1.7");

    let pages_id = doc.new_object_id();
    let regular = add_font(&mut doc, "Helvetica");
    let bold = add_font(&mut doc, "Helvetica-Bold");
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => Object::Reference(regular),
            "F2" => Object::Reference(bold),
        },
    });

    let content = layout(invoice)
        .encode()
        .map_err(|e| InvoiceError::Render(format!("failed to encode page content: {e}")))?;
    let content_id = doc.add_object(Stream::new(dictionary! {}, content));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => Object::Reference(pages_id),
        "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        "Contents" => Object::Reference(content_id),
        "Resources" => Object::Reference(resources_id),
    });
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![Object::Reference(page_id)],
        "Count" => 1,
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::String(
            encode_win_ansi(&format!("Factuur {}", invoice.number)),
            StringFormat::Literal,
        ),
        "Producer" => Object::string_literal("factuur"),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));
    doc.trailer.set("Info", Object::Reference(info_id));

    let mut output = Vec::new();
    doc.save_to(&mut output)
        .map_err(|e| InvoiceError::Render(format!("failed to save PDF: {e}")))?;

    tracing::debug!(number = %invoice.number, bytes = output.len(), "PDF rendered");
    Ok(output)
}

/// Attachment name: `{number}_{first word of the customer name}.pdf`.
pub fn download_filename(invoice: &IssuedInvoice) -> String {
    let first_word: String = invoice
        .customer
        .name()
        .split_whitespace()
        .next()
        .unwrap_or("")
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    if first_word.is_empty() {
        format!("{}.pdf", invoice.number)
    } else {
        format!("{}_{first_word}.pdf", invoice.number)
    }
}

fn add_font(doc: &mut Document, base_font: &str) -> ObjectId {
    doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => Object::Name(base_font.as_bytes().to_vec()),
        "Encoding" => "WinAnsiEncoding",
    })
}

#[derive(Clone, Copy)]
enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource(self) -> &'static str {
        match self {
            Self::Regular => "F1",
            Self::Bold => "F2",
        }
    }
}

/// Top-down text layout on one page.
struct Page {
    ops: Vec<Operation>,
    y: i64,
}

impl Page {
    fn new() -> Self {
        Self {
            ops: Vec::new(),
            y: PAGE_HEIGHT - 70,
        }
    }

    fn text_at(&mut self, font: Font, size: i64, x: i64, y: i64, text: &str) {
        self.ops.push(Operation::new("BT", vec![]));
        self.ops.push(Operation::new(
            "Tf",
            vec![font.resource().into(), Object::Integer(size)],
        ));
        self.ops.push(Operation::new(
            "Td",
            vec![Object::Integer(x), Object::Integer(y)],
        ));
        self.ops.push(Operation::new(
            "Tj",
            vec![Object::String(encode_win_ansi(text), StringFormat::Literal)],
        ));
        self.ops.push(Operation::new("ET", vec![]));
    }

    /// Write a line at the cursor and move down.
    fn line(&mut self, font: Font, size: i64, text: &str) {
        if !text.is_empty() {
            self.text_at(font, size, MARGIN_LEFT, self.y, text);
        }
        self.y -= size + 5;
    }

    /// Label on the left, value in the amount column.
    fn pair(&mut self, font: Font, label: &str, value: &str) {
        self.text_at(font, 11, MARGIN_LEFT, self.y, label);
        self.text_at(font, 11, AMOUNT_COLUMN, self.y, value);
        self.y -= 16;
    }

    fn gap(&mut self, points: i64) {
        self.y -= points;
    }

    fn rule(&mut self) {
        let y = self.y + 4;
        self.ops.push(Operation::new(
            "m",
            vec![Object::Integer(MARGIN_LEFT), Object::Integer(y)],
        ));
        self.ops.push(Operation::new(
            "l",
            vec![Object::Integer(PAGE_WIDTH - MARGIN_LEFT), Object::Integer(y)],
        ));
        self.ops.push(Operation::new("S", vec![]));
        self.y -= 8;
    }

    fn into_content(self) -> Content {
        Content {
            operations: self.ops,
        }
    }
}

fn layout(invoice: &IssuedInvoice) -> Content {
    let mut page = Page::new();
    let company = &invoice.company;
    let customer = &invoice.customer;
    let amounts = &invoice.amounts;

    page.line(Font::Bold, 16, company.name());
    page.line(Font::Regular, 10, company.get(fields::ADDRESS_LINE1));
    page.line(Font::Regular, 10, company.get(fields::ADDRESS_LINE2));
    page.gap(30);

    page.line(Font::Regular, 11, customer.name());
    page.line(Font::Regular, 11, customer.get(fields::ADDRESS_LINE1));
    page.line(Font::Regular, 11, customer.get(fields::ADDRESS_LINE2));
    page.gap(30);

    page.line(Font::Bold, 14, "Factuur");
    page.pair(Font::Regular, "Factuurnummer", &invoice.number);
    page.pair(Font::Regular, "Factuurdatum", &invoice.display_date());
    page.gap(20);

    page.pair(Font::Bold, "Omschrijving", "Bedrag excl. BTW");
    page.rule();
    page.pair(Font::Regular, &invoice.description, &format_eur(amounts.excl));
    page.gap(10);
    page.rule();
    page.pair(Font::Regular, "Subtotaal", &format_eur(amounts.excl));
    page.pair(Font::Regular, &vat_label(invoice), &format_eur(amounts.vat));
    page.pair(Font::Bold, "Totaal", &format_eur(amounts.incl));

    page.y = FOOTER_TOP;
    page.rule();
    for line in footer_lines(invoice) {
        page.line(Font::Regular, 8, &line);
    }

    page.into_content()
}
