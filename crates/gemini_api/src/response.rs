use serde::Deserialize;

/// Successful `generateContent` response body. Every field tolerates absence;
/// a response with no extractable text is an empty string, not an error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidatePart {
    #[serde(default)]
    pub text: String,
}

/// Concatenate the text fragments of the first candidate, in order, dropping
/// empty fragments. Later candidates are ignored.
#[must_use]
pub fn extract_text(response: &GenerateContentResponse) -> String {
    let Some(candidate) = response.candidates.first() else {
        return String::new();
    };
    let Some(content) = &candidate.content else {
        return String::new();
    };
    content
        .parts
        .iter()
        .map(|part| part.text.as_str())
        .filter(|text| !text.is_empty())
        .collect()
}
