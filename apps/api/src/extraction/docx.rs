use docx_rs::{read_docx, DocumentChild, ParagraphChild, RunChild};

use super::DecodeError;

/// Concatenates run text per paragraph, one paragraph per line. Empty paragraphs are skipped.
pub(super) fn extract(bytes: &[u8]) -> Result<String, DecodeError> {
    let docx = read_docx(bytes).map_err(|e| DecodeError::Docx(e.to_string()))?;

    let lines: Vec<String> = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(para) => Some(
                para.children
                    .iter()
                    .filter_map(|pc| match pc {
                        ParagraphChild::Run(run) => Some(run_text(&run.children)),
                        _ => None,
                    })
                    .collect::<String>(),
            ),
            _ => None,
        })
        .filter(|line| !line.trim().is_empty())
        .collect();

    Ok(lines.join("\n"))
}

fn run_text(children: &[RunChild]) -> String {
    children
        .iter()
        .filter_map(|rc| match rc {
            RunChild::Text(t) => Some(t.text.as_str()),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use docx_rs::{Docx, Paragraph, Run};

    use super::*;

    #[test]
    fn test_extracts_paragraphs_in_order() {
        let mut buf = Cursor::new(Vec::new());
        Docx::new()
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Camila Rojas")))
            .add_paragraph(Paragraph::new())
            .add_paragraph(
                Paragraph::new()
                    .add_run(Run::new().add_text("Ingeniera civil "))
                    .add_run(Run::new().add_text("industrial")),
            )
            .build()
            .pack(&mut buf)
            .unwrap();

        let text = extract(buf.get_ref()).unwrap();
        assert_eq!(text, "Camila Rojas\nIngeniera civil industrial");
    }

    #[test]
    fn test_non_zip_input_is_an_error() {
        assert!(matches!(extract(b"plain text"), Err(DecodeError::Docx(_))));
    }
}
