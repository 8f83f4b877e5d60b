use std::io::Cursor;

use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

use crate::core::InvoiceError;

fn html_io(e: std::io::Error) -> InvoiceError {
    InvoiceError::Render(format!("HTML write error: {e}"))
}

/// Indenting HTML writer. Text and attribute values are escaped.
pub struct HtmlWriter {
    writer: Writer<Cursor<Vec<u8>>>,
}

impl HtmlWriter {
    pub fn new() -> Result<Self, InvoiceError> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
        writer
            .write_event(Event::DocType(BytesText::from_escaped("html")))
            .map_err(html_io)?;
        Ok(Self { writer })
    }

    pub fn into_string(self) -> Result<String, InvoiceError> {
        let buf = self.writer.into_inner().into_inner();
        String::from_utf8(buf).map_err(|e| InvoiceError::Render(format!("HTML UTF-8 error: {e}")))
    }

    pub fn start(&mut self, name: &str) -> Result<&mut Self, InvoiceError> {
        self.start_with_attrs(name, &[])
    }

    pub fn start_with_attrs(
        &mut self,
        name: &str,
        attrs: &[(&str, &str)],
    ) -> Result<&mut Self, InvoiceError> {
        let mut elem = BytesStart::new(name);
        for (k, v) in attrs {
            elem.push_attribute((*k, *v));
        }
        self.writer
            .write_event(Event::Start(elem))
            .map_err(html_io)?;
        Ok(self)
    }

    pub fn end(&mut self, name: &str) -> Result<&mut Self, InvoiceError> {
        self.writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(html_io)?;
        Ok(self)
    }

    /// Void element such as `<meta>`.
    pub fn void(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<&mut Self, InvoiceError> {
        let mut elem = BytesStart::new(name);
        for (k, v) in attrs {
            elem.push_attribute((*k, *v));
        }
        self.writer
            .write_event(Event::Empty(elem))
            .map_err(html_io)?;
        Ok(self)
    }

    pub fn text(&mut self, name: &str, text: &str) -> Result<&mut Self, InvoiceError> {
        self.text_with_attrs(name, text, &[])
    }

    pub fn text_with_attrs(
        &mut self,
        name: &str,
        text: &str,
        attrs: &[(&str, &str)],
    ) -> Result<&mut Self, InvoiceError> {
        self.start_with_attrs(name, attrs)?;
        self.writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(html_io)?;
        self.end(name)
    }

    /// A `<tr>` with one header cell and one data cell.
    pub fn row(&mut self, label: &str, value: &str) -> Result<&mut Self, InvoiceError> {
        self.start("tr")?;
        self.text("th", label)?;
        self.text("td", value)?;
        self.end("tr")
    }
}
