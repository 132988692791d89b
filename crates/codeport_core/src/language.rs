use std::fmt;
use std::str::FromStr;

/// Programming language the backend transcribes the analyzed sources into.
///
/// Absence of a target language (`None` wherever an `Option<TargetLanguage>`
/// is accepted) means summarize only, no transcription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetLanguage {
    Java,
    Python,
    CSharp,
    JavaScript,
    Cpp,
    Ruby,
    Php,
    Go,
    Swift,
    Kotlin,
}

impl TargetLanguage {
    pub const ALL: [TargetLanguage; 10] = [
        TargetLanguage::Java,
        TargetLanguage::Python,
        TargetLanguage::CSharp,
        TargetLanguage::JavaScript,
        TargetLanguage::Cpp,
        TargetLanguage::Ruby,
        TargetLanguage::Php,
        TargetLanguage::Go,
        TargetLanguage::Swift,
        TargetLanguage::Kotlin,
    ];

    /// Value sent in the `target_language` form field.
    pub fn as_form_value(self) -> &'static str {
        match self {
            TargetLanguage::Java => "Java",
            TargetLanguage::Python => "Python",
            TargetLanguage::CSharp => "CSharp",
            TargetLanguage::JavaScript => "JavaScript",
            TargetLanguage::Cpp => "C++",
            TargetLanguage::Ruby => "Ruby",
            TargetLanguage::Php => "PHP",
            TargetLanguage::Go => "Go",
            TargetLanguage::Swift => "Swift",
            TargetLanguage::Kotlin => "Kotlin",
        }
    }
}

impl fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_form_value())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown target language: {0}")]
pub struct UnknownLanguage(pub String);

impl FromStr for TargetLanguage {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let language = match s.trim().to_ascii_lowercase().as_str() {
            "java" => TargetLanguage::Java,
            "python" => TargetLanguage::Python,
            "csharp" | "c#" => TargetLanguage::CSharp,
            "javascript" | "js" => TargetLanguage::JavaScript,
            "c++" | "cpp" => TargetLanguage::Cpp,
            "ruby" => TargetLanguage::Ruby,
            "php" => TargetLanguage::Php,
            "go" => TargetLanguage::Go,
            "swift" => TargetLanguage::Swift,
            "kotlin" => TargetLanguage::Kotlin,
            _ => return Err(UnknownLanguage(s.to_string())),
        };
        Ok(language)
    }
}
