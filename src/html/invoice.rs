use crate::core::{InvoiceError, IssuedInvoice, fields, footer_lines, format_eur, vat_label};

use super::writer::HtmlWriter;

const STYLE: &str = "body { font-family: Helvetica, Arial, sans-serif; font-size: 11pt; }
header.company { text-align: right; }
section.customer { margin: 2em 0; }
table { width: 100%; border-collapse: collapse; }
table.lines td, table.lines th { padding: 4px; text-align: left; }
table.lines td.amount, table.lines tfoot td { text-align: right; }
footer { margin-top: 3em; font-size: 9pt; color: #555; }";

/// Render the invoice as a complete HTML document.
pub fn render_invoice(invoice: &IssuedInvoice) -> Result<String, InvoiceError> {
    let mut w = HtmlWriter::new()?;
    let title = format!("Factuur {}", invoice.number);

    w.start_with_attrs("html", &[("lang", "nl")])?;
    w.start("head")?;
    w.void("meta", &[("charset", "utf-8")])?;
    w.text("title", &title)?;
    w.text("style", STYLE)?;
    w.end("head")?;

    w.start("body")?;

    let company = &invoice.company;
    w.start_with_attrs("header", &[("class", "company")])?;
    w.text("h1", company.name())?;
    write_lines(&mut w, &[company.get(fields::ADDRESS_LINE1), company.get(fields::ADDRESS_LINE2)])?;
    w.end("header")?;

    let customer = &invoice.customer;
    w.start_with_attrs("section", &[("class", "customer")])?;
    write_lines(
        &mut w,
        &[
            customer.name(),
            customer.get(fields::ADDRESS_LINE1),
            customer.get(fields::ADDRESS_LINE2),
        ],
    )?;
    w.end("section")?;

    w.text("h2", "Factuur")?;
    w.start_with_attrs("table", &[("class", "meta")])?;
    w.row("Factuurnummer", &invoice.number)?;
    w.row("Factuurdatum", &invoice.display_date())?;
    w.end("table")?;

    write_line_table(&mut w, invoice)?;
    write_footer(&mut w, invoice)?;

    w.end("body")?;
    w.end("html")?;
    w.into_string()
}

/// Render the company footer as a standalone HTML document, for PDF
/// engines that take the footer separately.
pub fn render_footer(invoice: &IssuedInvoice) -> Result<String, InvoiceError> {
    let mut w = HtmlWriter::new()?;
    w.start_with_attrs("html", &[("lang", "nl")])?;
    w.start("head")?;
    w.void("meta", &[("charset", "utf-8")])?;
    w.end("head")?;
    w.start("body")?;
    write_footer(&mut w, invoice)?;
    w.end("body")?;
    w.end("html")?;
    w.into_string()
}

fn write_lines(w: &mut HtmlWriter, lines: &[&str]) -> Result<(), InvoiceError> {
    for line in lines.iter().filter(|l| !l.is_empty()) {
        w.text("p", line)?;
    }
    Ok(())
}

fn write_line_table(w: &mut HtmlWriter, invoice: &IssuedInvoice) -> Result<(), InvoiceError> {
    let amounts = &invoice.amounts;

    w.start_with_attrs("table", &[("class", "lines")])?;
    w.start("thead")?;
    w.start("tr")?;
    w.text("th", "Omschrijving")?;
    w.text("th", "Bedrag excl. BTW")?;
    w.end("tr")?;
    w.end("thead")?;

    w.start("tbody")?;
    w.start("tr")?;
    w.text("td", &invoice.description)?;
    w.text_with_attrs("td", &format_eur(amounts.excl), &[("class", "amount")])?;
    w.end("tr")?;
    w.end("tbody")?;

    w.start("tfoot")?;
    w.row("Subtotaal", &format_eur(amounts.excl))?;
    w.row(&vat_label(invoice), &format_eur(amounts.vat))?;
    w.row("Totaal", &format_eur(amounts.incl))?;
    w.end("tfoot")?;
    w.end("table")?;
    Ok(())
}

fn write_footer(w: &mut HtmlWriter, invoice: &IssuedInvoice) -> Result<(), InvoiceError> {
    w.start("footer")?;
    for line in footer_lines(invoice) {
        w.text("p", &line)?;
    }
    w.end("footer")?;
    Ok(())
}
