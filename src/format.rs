use std::fmt;
use std::str::FromStr;

/// Save-format codes understood by the word processor's `SaveAs` call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SaveFormat {
    Document,
    Text,
    Rtf,
    FilteredHtml,
    Docx,
    Pdf,
    OpenDocumentText,
}

const ALL: [SaveFormat; 7] = [
    SaveFormat::Document,
    SaveFormat::Text,
    SaveFormat::Rtf,
    SaveFormat::FilteredHtml,
    SaveFormat::Docx,
    SaveFormat::Pdf,
    SaveFormat::OpenDocumentText,
];

impl SaveFormat {
    pub fn code(self) -> i32 {
        match self {
            SaveFormat::Document => 0,
            SaveFormat::Text => 2,
            SaveFormat::Rtf => 6,
            SaveFormat::FilteredHtml => 10,
            SaveFormat::Docx => 12,
            SaveFormat::Pdf => 17,
            SaveFormat::OpenDocumentText => 23,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        ALL.into_iter().find(|f| f.code() == code)
    }

    pub fn extension(self) -> &'static str {
        match self {
            SaveFormat::Document => "doc",
            SaveFormat::Text => "txt",
            SaveFormat::Rtf => "rtf",
            SaveFormat::FilteredHtml => "html",
            SaveFormat::Docx => "docx",
            SaveFormat::Pdf => "pdf",
            SaveFormat::OpenDocumentText => "odt",
        }
    }

    /// Argument for `soffice --convert-to`.
    pub(crate) fn export_filter(self) -> &'static str {
        match self {
            SaveFormat::Document => "doc:MS Word 97",
            SaveFormat::Text => "txt:Text",
            SaveFormat::Rtf => "rtf:Rich Text Format",
            SaveFormat::FilteredHtml => "html:HTML (StarWriter)",
            SaveFormat::Docx => "docx:MS Word 2007 XML",
            SaveFormat::Pdf => "pdf:writer_pdf_Export",
            SaveFormat::OpenDocumentText => "odt:writer8",
        }
    }
}

impl fmt::Display for SaveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for SaveFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().trim_start_matches('.').to_ascii_lowercase();
        if let Ok(code) = wanted.parse::<i32>() {
            return SaveFormat::from_code(code).ok_or_else(|| format!("unknown format code {code}"));
        }
        match wanted.as_str() {
            "htm" => return Ok(SaveFormat::FilteredHtml),
            "text" => return Ok(SaveFormat::Text),
            _ => {}
        }
        ALL.into_iter()
            .find(|f| f.extension() == wanted)
            .ok_or_else(|| format!("unknown format '{s}'"))
    }
}
