use bytes::Bytes;
use tracing::{debug, warn};

/// Extracts plain text from a PDF held in memory.
///
/// Corrupt, encrypted or image-only documents yield `""` rather than an
/// error; callers decide whether empty text is acceptable. The parser runs on
/// the blocking pool and a panic inside it is treated as a failed extraction.
pub async fn extract_text_from_pdf(bytes: Bytes) -> String {
    let size = bytes.len();

    match tokio::task::spawn_blocking(move || {
        pdf_extract::extract_text_from_mem(&bytes).map_err(|e| e.to_string())
    })
    .await
    {
        Ok(Ok(text)) => {
            let text = text.trim().to_string();
            debug!(size, chars = text.len(), "Extracted text from PDF");
            text
        }
        Ok(Err(e)) => {
            warn!(size, "PDF text extraction failed: {e}");
            String::new()
        }
        Err(e) => {
            warn!(size, "PDF text extraction aborted: {e}");
            String::new()
        }
    }
}

/// Builds a one-page PDF that draws `lines` top to bottom in Helvetica.
#[cfg(test)]
pub(crate) fn test_pdf(lines: &[&str]) -> Vec<u8> {
    let mut content = String::from("BT\n/F1 12 Tf\n72 720 Td\n");
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            content.push_str("0 -24 Td\n");
        }
        content.push_str(&format!("({line}) Tj\n"));
    }
    content.push_str("ET\n");

    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
         /Resources << /Font << /F1 5 0 R >> >> /Contents 4 0 R >>"
            .to_string(),
        format!("<< /Length {} >>\nstream\n{content}endstream", content.len()),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_string(),
    ];

    let mut pdf = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, object) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.extend_from_slice(format!("{} 0 obj\n{object}\nendobj\n", i + 1).as_bytes());
    }

    let xref_offset = pdf.len();
    let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in offsets {
        xref.push_str(&format!("{offset:010} 00000 n \n"));
    }
    xref.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
        objects.len() + 1
    ));
    pdf.extend_from_slice(xref.as_bytes());
    pdf
}
