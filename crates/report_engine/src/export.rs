use std::path::{Path, PathBuf};

use ego_tree::NodeRef;
use report_logging::report_info;
use scraper::node::Node;
use scraper::{ElementRef, Html};

use crate::persist::{PersistError, ReportWriter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub html_path: PathBuf,
    pub text_path: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("there is no report to export")]
    EmptyReport,
    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// Saves the report as `report{stamp}.html` and a plain-text `report{stamp}.txt`.
pub fn export_report(dir: &Path, stamp: &str, html: &str) -> Result<ExportSummary, ExportError> {
    let text = report_plain_text(html);
    if html.trim().is_empty() || text.is_empty() {
        return Err(ExportError::EmptyReport);
    }

    let writer = ReportWriter::open(dir)?;
    let html_path = writer.write(&format!("report{stamp}.html"), html)?;
    let text_path = writer.write(&format!("report{stamp}.txt"), &text)?;
    report_info!(
        "report exported to {} and {}",
        html_path.display(),
        text_path.display()
    );
    Ok(ExportSummary {
        html_path,
        text_path,
    })
}

/// Flattens report markup into readable text: block elements start on their
/// own line, list items get a `- ` bullet, runs of whitespace collapse.
pub fn report_plain_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let mut out = TextBuilder::default();
    for child in fragment.root_element().children() {
        visit_node(child, &mut out);
    }
    out.finish()
}

fn visit_node(node: NodeRef<'_, Node>, out: &mut TextBuilder) {
    match node.value() {
        Node::Text(text) => out.push_text(text),
        Node::Element(_) => {
            if let Some(element) = ElementRef::wrap(node) {
                visit_element(element, out);
            }
        }
        _ => {
            for child in node.children() {
                visit_node(child, out);
            }
        }
    }
}

fn visit_element(element: ElementRef<'_>, out: &mut TextBuilder) {
    let tag = element.value().name().to_ascii_lowercase();
    match tag.as_str() {
        "script" | "style" | "template" => {}
        "br" => out.newline(),
        "li" => {
            out.newline();
            out.push_raw("- ");
            visit_children(element, out);
            out.newline();
        }
        "td" | "th" => {
            visit_children(element, out);
            out.push_raw(" ");
        }
        "p" | "div" | "section" | "article" | "header" | "footer" | "table" | "tr" | "ul"
        | "ol" | "blockquote" | "pre" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
            out.newline();
            visit_children(element, out);
            out.newline();
        }
        _ => visit_children(element, out),
    }
}

fn visit_children(element: ElementRef<'_>, out: &mut TextBuilder) {
    for child in element.children() {
        visit_node(child, out);
    }
}

#[derive(Default)]
struct TextBuilder {
    lines: Vec<String>,
    current: String,
}

impl TextBuilder {
    fn push_text(&mut self, text: &str) {
        if text.starts_with(char::is_whitespace) {
            self.space();
        }
        let mut words = text.split_whitespace().peekable();
        while let Some(word) = words.next() {
            self.current.push_str(word);
            if words.peek().is_some() {
                self.current.push(' ');
            }
        }
        if text.ends_with(char::is_whitespace) && !text.trim().is_empty() {
            self.space();
        }
    }

    fn push_raw(&mut self, text: &str) {
        self.current.push_str(text);
    }

    fn space(&mut self) {
        if !self.current.is_empty() && !self.current.ends_with(' ') {
            self.current.push(' ');
        }
    }

    fn newline(&mut self) {
        let line = self.current.trim_end().to_string();
        self.current.clear();
        if !line.trim().is_empty() {
            self.lines.push(line);
        }
    }

    fn finish(mut self) -> String {
        self.newline();
        self.lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::report_plain_text;
    use pretty_assertions::assert_eq;

    #[test]
    fn block_elements_become_lines() {
        let html = "<h2>Summary</h2><p>Refunds are   issued\n within <b>30</b> days.</p>\
                    <ul><li>policy.pdf</li><li>tickets.csv</li></ul>";
        assert_eq!(
            report_plain_text(html),
            "Summary\nRefunds are issued within 30 days.\n- policy.pdf\n- tickets.csv"
        );
    }

    #[test]
    fn scripts_and_blank_markup_produce_nothing() {
        assert_eq!(report_plain_text("<div> <script>alert(1)</script> </div>"), "");
        assert_eq!(report_plain_text("plain words"), "plain words");
    }
}
