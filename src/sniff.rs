use std::fs::File;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

use crate::error::Error;

const CT_NS: &str = "http://schemas.openxmlformats.org/package/2006/content-types";
const ODT_MIMETYPE: &str = "application/vnd.oasis.opendocument.text";

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];
const RTF_MAGIC: &[u8] = b"{\\rtf";

/// Container type of an input document, as far as it can be told without
/// handing the file to the office application.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentKind {
    WordOpenXml { macro_enabled: bool, template: bool },
    OpenDocumentText,
    LegacyWord,
    Rtf,
    Unrecognized,
}

pub fn sniff(path: &Path) -> Result<DocumentKind, Error> {
    let mut file = File::open(path)?;
    let mut header = [0u8; 8];
    let n = read_header(&mut file, &mut header)?;
    if header[..n].starts_with(ZIP_MAGIC) {
        file.rewind()?;
        return sniff_zip(file);
    }
    Ok(classify_header(&header[..n]))
}

pub fn sniff_bytes(data: &[u8]) -> Result<DocumentKind, Error> {
    if data.starts_with(ZIP_MAGIC) {
        return sniff_zip(Cursor::new(data));
    }
    Ok(classify_header(data))
}

fn read_header(file: &mut File, buf: &mut [u8]) -> Result<usize, Error> {
    let mut filled = 0;
    while filled < buf.len() {
        match file.read(&mut buf[filled..])? {
            0 => break,
            n => filled += n,
        }
    }
    Ok(filled)
}

fn classify_header(header: &[u8]) -> DocumentKind {
    if header.starts_with(OLE_MAGIC) {
        DocumentKind::LegacyWord
    } else if header.starts_with(RTF_MAGIC) {
        DocumentKind::Rtf
    } else {
        DocumentKind::Unrecognized
    }
}

fn sniff_zip<R: Read + Seek>(reader: R) -> Result<DocumentKind, Error> {
    let mut zip = zip::ZipArchive::new(reader)?;

    // OpenDocument stores its mimetype uncompressed as the first entry.
    if let Ok(mut file) = zip.by_name("mimetype") {
        let mut mimetype = String::new();
        file.read_to_string(&mut mimetype)?;
        if mimetype.trim() == ODT_MIMETYPE {
            return Ok(DocumentKind::OpenDocumentText);
        }
        return Ok(DocumentKind::Unrecognized);
    }

    let mut raw = Vec::new();
    match zip.by_name("[Content_Types].xml") {
        Ok(mut file) => {
            file.read_to_end(&mut raw)?;
        }
        Err(zip::result::ZipError::FileNotFound) => return Ok(DocumentKind::Unrecognized),
        Err(e) => return Err(e.into()),
    }
    let xml_content = decode_xml(&raw)?;
    let options = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..roxmltree::ParsingOptions::default()
    };
    let xml = roxmltree::Document::parse_with_options(&xml_content, options)?;

    let main_type = xml
        .root_element()
        .children()
        .filter(|n| n.tag_name().name() == "Override" && n.tag_name().namespace() == Some(CT_NS))
        .filter(|n| n.attribute("PartName").is_some_and(|p| p.starts_with("/word/")))
        .find_map(|n| n.attribute("ContentType").filter(|ct| ct.ends_with(".main+xml")));

    let kind = match main_type {
        Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml") => {
            DocumentKind::WordOpenXml { macro_enabled: false, template: false }
        }
        Some("application/vnd.openxmlformats-officedocument.wordprocessingml.template.main+xml") => {
            DocumentKind::WordOpenXml { macro_enabled: false, template: true }
        }
        Some("application/vnd.ms-word.document.macroEnabled.main+xml") => {
            DocumentKind::WordOpenXml { macro_enabled: true, template: false }
        }
        Some("application/vnd.ms-word.template.macroEnabledTemplate.main+xml") => {
            DocumentKind::WordOpenXml { macro_enabled: true, template: true }
        }
        _ => DocumentKind::Unrecognized,
    };
    Ok(kind)
}

/// Package parts may be UTF-8 or UTF-16, told apart by the byte order mark.
fn decode_xml(raw: &[u8]) -> Result<String, Error> {
    let utf16 = |bytes: &[u8], from: fn([u8; 2]) -> u16| {
        let units: Vec<u16> = bytes.chunks_exact(2).map(|c| from([c[0], c[1]])).collect();
        String::from_utf16(&units)
            .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
    };
    match raw {
        [0xFF, 0xFE, rest @ ..] => utf16(rest, u16::from_le_bytes),
        [0xFE, 0xFF, rest @ ..] => utf16(rest, u16::from_be_bytes),
        [0xEF, 0xBB, 0xBF, rest @ ..] => String::from_utf8(rest.to_vec())
            .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))),
        _ => String::from_utf8(raw.to_vec())
            .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn zip_with(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, body) in entries {
            zip.start_file(*name, SimpleFileOptions::default()).unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }

    fn content_types(main: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<Types xmlns="{CT_NS}">
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="{main}"/>
</Types>"#
        )
    }

    #[test]
    fn detects_docx() {
        let ct = content_types(
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml",
        );
        let data = zip_with(&[("[Content_Types].xml", &ct), ("word/document.xml", "<w/>")]);
        assert_eq!(
            sniff_bytes(&data).unwrap(),
            DocumentKind::WordOpenXml { macro_enabled: false, template: false }
        );
    }

    #[test]
    fn detects_utf16_content_types() {
        let ct = content_types(
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml",
        )
        .replace("UTF-8", "UTF-16");
        let mut encoded = vec![0xFF, 0xFE];
        encoded.extend(ct.encode_utf16().flat_map(u16::to_le_bytes));

        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file("[Content_Types].xml", SimpleFileOptions::default()).unwrap();
        zip.write_all(&encoded).unwrap();
        let data = zip.finish().unwrap().into_inner();

        assert_eq!(
            sniff_bytes(&data).unwrap(),
            DocumentKind::WordOpenXml { macro_enabled: false, template: false }
        );
    }

    #[test]
    fn doctype_in_content_types_is_accepted() {
        let ct = content_types(
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml",
        )
        .replacen("\n<Types", "\n<!DOCTYPE Types>\n<Types", 1);
        let data = zip_with(&[("[Content_Types].xml", &ct)]);
        assert_eq!(
            sniff_bytes(&data).unwrap(),
            DocumentKind::WordOpenXml { macro_enabled: false, template: false }
        );
    }

    #[test]
    fn detects_macro_template() {
        let ct = content_types("application/vnd.ms-word.template.macroEnabledTemplate.main+xml");
        let data = zip_with(&[("[Content_Types].xml", &ct)]);
        assert_eq!(
            sniff_bytes(&data).unwrap(),
            DocumentKind::WordOpenXml { macro_enabled: true, template: true }
        );
    }

    #[test]
    fn detects_odt() {
        let data = zip_with(&[("mimetype", ODT_MIMETYPE), ("content.xml", "<x/>")]);
        assert_eq!(sniff_bytes(&data).unwrap(), DocumentKind::OpenDocumentText);
    }

    #[test]
    fn spreadsheet_package_is_unrecognized() {
        let ct = r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
</Types>"#;
        let data = zip_with(&[("[Content_Types].xml", ct)]);
        assert_eq!(sniff_bytes(&data).unwrap(), DocumentKind::Unrecognized);
    }

    #[test]
    fn malformed_content_types_is_an_error() {
        let data = zip_with(&[("[Content_Types].xml", "<Types>")]);
        assert!(matches!(sniff_bytes(&data), Err(Error::Xml(_))));
    }

    #[test]
    fn truncated_zip_is_an_error() {
        let mut data = b"PK\x03\x04".to_vec();
        data.extend_from_slice(&[0u8; 16]);
        assert!(matches!(sniff_bytes(&data), Err(Error::Zip(_))));
    }

    #[test]
    fn magic_headers() {
        assert_eq!(sniff_bytes(b"{\\rtf1\\ansi hello}").unwrap(), DocumentKind::Rtf);
        let mut ole = OLE_MAGIC.to_vec();
        ole.extend_from_slice(&[0u8; 32]);
        assert_eq!(sniff_bytes(&ole).unwrap(), DocumentKind::LegacyWord);
        assert_eq!(sniff_bytes(b"plain text").unwrap(), DocumentKind::Unrecognized);
        assert_eq!(sniff_bytes(b"").unwrap(), DocumentKind::Unrecognized);
    }
}
