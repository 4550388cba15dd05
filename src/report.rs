//! PDF Report Generation
//!
//! Renders one PDF covering a sequence of projects: scalar fields,
//! expenses and the four document lists as free-flowing text lines with
//! automatic page breaks. The exact layout is not a compatibility
//! surface; the field order and literal labels are.

use std::fs;
use std::io::Write as _;
use std::path::Path;

use log::info;

use crate::error::{ProjetosError, Result};
use crate::store::Project;

/// Title line of every report.
pub const REPORT_TITLE: &str = "Relatório de Projetos de Iniciação Científica";

// A4 portrait, in points.
const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 50.0;
const FONT_SIZE: f32 = 12.0;
const LINE_HEIGHT: f32 = 16.0;

/// Render a report for the given projects and write it to `output_path`.
pub fn generate_report(projects: &[Project], output_path: &Path) -> Result<()> {
    let lines = report_lines(projects);
    let bytes = render_pdf(&lines);
    fs::write(output_path, bytes).map_err(|e| ProjetosError::FileWrite {
        path: output_path.to_path_buf(),
        source: e,
    })?;
    info!(
        "Report with {} projects written to {}",
        projects.len(),
        output_path.display()
    );
    Ok(())
}

/// The report as plain text lines, in the documented field order.
fn report_lines(projects: &[Project]) -> Vec<String> {
    let mut lines = vec![REPORT_TITLE.to_string()];

    for project in projects {
        lines.push(format!("Nome: {}", project.nome));
        lines.push(format!("Responsável: {}", project.responsavel));
        lines.push(format!(
            "Valor Financiamento: R$ {:.2}",
            project.valor_financiamento
        ));
        lines.push(format!("Data de Cadastro: {}", project.data_cadastro));

        lines.push("Despesas:".to_string());
        for despesa in &project.despesas {
            lines.push(format!(
                "  Nome: {}, Descrição: {}, Valor: R$ {:.2}, NF-e: {}",
                despesa.nome, despesa.descricao, despesa.valor, despesa.nfe
            ));
        }

        let sections: [(&str, &Vec<String>); 4] = [
            ("Orçamentos:", &project.orcamentos),
            ("Notas Fiscais (NF-e):", &project.nfe),
            ("Comprovantes de Pagamento:", &project.comprovantes),
            ("Arquivos Adicionais:", &project.arquivos_adicionais),
        ];
        for (label, names) in sections {
            lines.push(label.to_string());
            for name in names {
                lines.push(format!("  {}", name));
            }
        }

        lines.push(String::new());
    }

    lines
}

fn render_pdf(lines: &[String]) -> Vec<u8> {
    let lines_per_page = ((PAGE_HEIGHT - 2.0 * MARGIN) / LINE_HEIGHT) as usize;
    let pages: Vec<&[String]> = if lines.is_empty() {
        vec![&[]]
    } else {
        lines.chunks(lines_per_page).collect()
    };

    let mut builder = PdfBuilder::new();
    let font_object = builder.add_object(
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>",
    );
    // One content + one page object per page, then the page tree, so the
    // parent reference can be computed up front.
    let pages_parent = font_object + 2 * pages.len() + 1;

    let mut page_objects = Vec::new();
    for page_lines in &pages {
        let content_object = builder.add_stream(&render_page_stream(page_lines));
        let page_object = builder.add_object(format!(
            "<< /Type /Page /Parent {parent} 0 R /MediaBox [0 0 {width} {height}] \
             /Resources << /Font << /F1 {font} 0 R >> >> /Contents {content} 0 R >>",
            parent = pages_parent,
            width = fmt_float(PAGE_WIDTH),
            height = fmt_float(PAGE_HEIGHT),
            font = font_object,
            content = content_object
        ));
        page_objects.push(page_object);
    }

    let kids = page_objects
        .iter()
        .map(|obj| format!("{obj} 0 R"))
        .collect::<Vec<_>>()
        .join(" ");
    let pages_object = builder.add_object(format!(
        "<< /Type /Pages /Count {count} /Kids [{kids}] >>",
        count = page_objects.len()
    ));
    debug_assert_eq!(pages_object, pages_parent);
    builder.set_catalog(format!(
        "<< /Type /Catalog /Pages {pages_object} 0 R >>"
    ));

    builder.finish()
}

fn render_page_stream(lines: &[String]) -> Vec<u8> {
    let mut stream = Vec::new();
    let mut y = PAGE_HEIGHT - MARGIN - FONT_SIZE;

    for line in lines {
        if !line.is_empty() {
            write!(
                &mut stream,
                "BT\n/F1 {size} Tf\n1 0 0 1 {x} {y} Tm\n(",
                size = fmt_float(FONT_SIZE),
                x = fmt_float(MARGIN),
                y = fmt_float(y)
            )
            .expect("write text operator");
            stream.extend_from_slice(&encode_text(line));
            stream.extend_from_slice(b") Tj\nET\n");
        }
        y -= LINE_HEIGHT;
    }

    stream
}

/// Encode a line as a WinAnsi PDF string, escaping delimiters. Characters
/// outside Latin-1 are replaced with '?'.
fn encode_text(input: &str) -> Vec<u8> {
    let mut output = Vec::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '(' | ')' | '\\' => {
                output.push(b'\\');
                output.push(ch as u8);
            }
            _ => {
                let code = ch as u32;
                output.push(if code <= 0xFF { code as u8 } else { b'?' });
            }
        }
    }
    output
}

fn fmt_float(value: f32) -> String {
    format!("{:.3}", value)
}

struct PdfObject {
    number: usize,
    body: Vec<u8>,
}

/// Minimal PDF writer: numbered objects, streams, xref table, trailer.
struct PdfBuilder {
    objects: Vec<PdfObject>,
    catalog: Option<String>,
}

impl PdfBuilder {
    fn new() -> Self {
        Self {
            objects: Vec::new(),
            catalog: None,
        }
    }

    fn add_object(&mut self, body: impl Into<Vec<u8>>) -> usize {
        let number = self.objects.len() + 1;
        self.objects.push(PdfObject {
            number,
            body: body.into(),
        });
        number
    }

    fn add_stream(&mut self, stream: &[u8]) -> usize {
        let mut body = format!("<< /Length {} >>\nstream\n", stream.len()).into_bytes();
        body.extend_from_slice(stream);
        body.extend_from_slice(b"\nendstream");
        self.add_object(body)
    }

    fn set_catalog(&mut self, catalog: String) {
        self.catalog = Some(catalog);
    }

    fn finish(mut self) -> Vec<u8> {
        if let Some(catalog) = self.catalog.take() {
            self.add_object(catalog.into_bytes());
        }

        let mut output = Vec::new();
        output.extend_from_slice(b"%PDF-1.4\n%\xFF\xFF\xFF\xFF\n");
        let mut offsets = Vec::with_capacity(self.objects.len() + 1);
        offsets.push(0);

        for object in &self.objects {
            offsets.push(output.len());
            write!(&mut output, "{} 0 obj\n", object.number).expect("write pdf object");
            output.extend_from_slice(&object.body);
            output.extend_from_slice(b"\nendobj\n");
        }

        let xref_start = output.len();
        writeln!(
            &mut output,
            "xref\n0 {}\n0000000000 65535 f ",
            self.objects.len() + 1
        )
        .expect("write xref header");
        for offset in offsets.iter().skip(1) {
            writeln!(&mut output, "{:010} 00000 n ", offset).expect("write xref entry");
        }

        writeln!(
            &mut output,
            "trailer\n<< /Size {} /Root {} 0 R >>",
            self.objects.len() + 1,
            self.objects.len()
        )
        .expect("write trailer");
        writeln!(&mut output, "startxref\n{}\n%%EOF", xref_start).expect("write footer");

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Expense;

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    fn sample_project() -> Project {
        let mut project = Project::new("Projeto A", "Maria", 1000.0).unwrap();
        project.despesas.push(Expense {
            nome: "E".to_string(),
            descricao: "D".to_string(),
            valor: 50.0,
            nfe: "123".to_string(),
        });
        project.orcamentos.push("orcamento.pdf".to_string());
        project
    }

    #[test]
    fn test_report_lines_field_order() {
        let lines = report_lines(&[sample_project()]);
        let positions: Vec<usize> = [
            "Nome:",
            "Responsável:",
            "Valor Financiamento: R$",
            "Data de Cadastro:",
            "Despesas:",
            "Orçamentos:",
            "Notas Fiscais (NF-e):",
            "Comprovantes de Pagamento:",
            "Arquivos Adicionais:",
        ]
        .iter()
        .map(|label| {
            lines
                .iter()
                .position(|l| l.starts_with(label))
                .unwrap_or_else(|| panic!("missing label {}", label))
        })
        .collect();

        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted, "labels out of order");
        assert_eq!(lines[0], REPORT_TITLE);
    }

    #[test]
    fn test_report_lines_formats_amounts() {
        let lines = report_lines(&[sample_project()]);
        assert!(lines.contains(&"Valor Financiamento: R$ 1000.00".to_string()));
        assert!(lines
            .iter()
            .any(|l| l.contains("Valor: R$ 50.00") && l.contains("NF-e: 123")));
    }

    #[test]
    fn test_generate_report_writes_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("relatorio.pdf");

        generate_report(&[sample_project()], &output).unwrap();

        let bytes = fs::read(&output).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.4"));
        assert!(contains(&bytes, b"%%EOF"));
        // Streams are uncompressed, so ASCII labels appear literally and
        // accented ones as their WinAnsi bytes.
        assert!(contains(&bytes, b"Nome: Projeto A"));
        assert!(contains(&bytes, b"Relat\xf3rio de Projetos"));
        assert!(contains(&bytes, b"Respons\xe1vel: Maria"));
    }

    #[test]
    fn test_empty_report_still_renders() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("relatorio.pdf");

        generate_report(&[], &output).unwrap();

        let bytes = fs::read(&output).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.4"));
        assert!(contains(&bytes, b"/Count 1"));
    }

    #[test]
    fn test_long_report_paginates() {
        let mut project = sample_project();
        for i in 0..200 {
            project.arquivos_adicionais.push(format!("arquivo_{}.pdf", i));
        }

        let lines = report_lines(&[project]);
        let bytes = render_pdf(&lines);
        assert!(contains(&bytes, b"/Count 5"));
    }
}
