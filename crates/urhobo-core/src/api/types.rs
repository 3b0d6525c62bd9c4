//! Wire types for the dictionary backend.
//!
//! Request bodies borrow from the caller; response types own their data and
//! tolerate missing optional fields.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ============================================================================
// Users and auth
// ============================================================================

/// Account profile as returned by the backend.
///
/// Fields the client does not interpret are kept in `extra` so a persisted
/// user round-trips without loss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_verified: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    /// First and last name joined, without stray whitespace.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }
}

/// Account summary returned by the verify-user lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub profile_picture_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: User,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// Generic `{ "message": ... }` acknowledgement.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OtpRequest<'a> {
    pub otp: &'a str,
    pub email: &'a str,
}

#[derive(Debug, Serialize)]
pub struct EmailRequest<'a> {
    pub email: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyUserResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub user_info: UserSummary,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetRequest<'a> {
    pub user_id: &'a str,
    pub email: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResetOtpResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub reset_token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest<'a> {
    pub email: &'a str,
    pub reset_token: &'a str,
    pub password: &'a str,
    pub confirm_password: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNameRequest<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
}

#[derive(Debug, Serialize)]
pub struct UpdateUsernameRequest<'a> {
    pub username: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePictureRequest<'a> {
    pub image_data: &'a str,
}

// ============================================================================
// Words
// ============================================================================

/// Picture attached to the word of the day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    #[serde(default)]
    pub url: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl Photo {
    pub const DEFAULT_URL: &str = "/images/dish.svg";
    pub const DEFAULT_KIND: &str = "photo";
}

impl Default for Photo {
    fn default() -> Self {
        Self {
            url: Self::DEFAULT_URL.to_string(),
            kind: Self::DEFAULT_KIND.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordOfDay {
    pub word: String,
    #[serde(default)]
    pub meaning: String,
    #[serde(default)]
    pub photo: Option<Photo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WordOfDayResponse {
    pub word_of_day: WordOfDay,
}

/// Example pair shown under an autocomplete suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ExamplePair {
    #[serde(default)]
    pub english: String,
    #[serde(default)]
    pub native: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionDefinition {
    #[serde(default)]
    pub part_of_speech: String,
    #[serde(default)]
    pub definition: String,
    #[serde(default)]
    pub example_in_native: String,
    #[serde(default)]
    pub example_english: String,
    #[serde(default)]
    pub example_native: String,
}

/// Lightweight projection used by the live suggestion dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    #[serde(default)]
    pub id: i64,
    pub word: String,
    #[serde(default)]
    pub eyuo: Option<String>,
    #[serde(default)]
    pub definitions: Vec<SuggestionDefinition>,
    #[serde(default)]
    pub suggested_words: Vec<String>,
    #[serde(default)]
    pub more_examples: Vec<ExamplePair>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AutocompleteResponse {
    #[serde(default)]
    pub suggestions: Vec<SearchResult>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Media {
    #[serde(default)]
    pub url: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

/// Synonym entries are loosely typed upstream: either `{ "word": .. }` or a bare string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Synonym {
    Entry { word: String },
    Plain(String),
}

impl Synonym {
    pub fn word(&self) -> &str {
        match self {
            Synonym::Entry { word } | Synonym::Plain(word) => word,
        }
    }
}

/// One sense of a word in its own language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Meaning {
    #[serde(default)]
    pub word: String,
    #[serde(default)]
    pub definitions: Vec<String>,
    #[serde(default)]
    pub part_of_speech: Vec<String>,
    #[serde(default)]
    pub examples: Vec<String>,
    #[serde(default)]
    pub synonyms: Vec<Synonym>,
    #[serde(default)]
    pub related_words: Vec<String>,
    #[serde(default)]
    pub media: Vec<Media>,
    #[serde(default)]
    pub dialect: Option<String>,
}

/// Counterpart of a meaning in the other language. Same shape as `Meaning`.
pub type Translation = Meaning;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Translations {
    #[serde(default)]
    pub en: Vec<Translation>,
    #[serde(default)]
    pub urh: Vec<Translation>,
}

/// Full word entry returned by `/search`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct WordRecord {
    #[serde(default)]
    pub id: i64,
    pub word: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub match_type: String,
    #[serde(default)]
    pub similarity_score: f64,
    #[serde(default)]
    pub meanings: Vec<Meaning>,
    #[serde(default)]
    pub translations: Translations,
    #[serde(default)]
    pub paired_examples: Vec<Value>,
    #[serde(default)]
    pub is_favorite: bool,
}

impl WordRecord {
    /// Translation paired with the meaning at `index`.
    ///
    /// English records pair with the Urhobo translations, everything else
    /// with the English ones.
    pub fn counterpart(&self, index: usize) -> Option<&Translation> {
        if self.language == "english" {
            self.translations.urh.get(index)
        } else {
            self.translations.en.get(index)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SearchOptions {
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub fuzzy: String,
    #[serde(default)]
    pub search_mode: String,
    #[serde(default)]
    pub reverse_search: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SearchMetadata {
    #[serde(default)]
    pub total_records: u64,
    #[serde(default)]
    pub language_map: Map<String, Value>,
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub page: u64,
    #[serde(default)]
    pub generated_at: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub search_options: SearchOptions,
}

/// Response of the full-detail search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SearchResponse {
    #[serde(default)]
    pub metadata: SearchMetadata,
    #[serde(default)]
    pub records: Vec<WordRecord>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_user_round_trips_unknown_fields() {
        let raw = json!({
            "id": "u1",
            "email": "a@b.com",
            "firstName": "Ada",
            "lastName": "Oghene",
            "username": "ada",
            "totalActiveDays": 12
        });
        let user: User = serde_json::from_value(raw).unwrap();
        assert_eq!(user.first_name, "Ada");
        assert_eq!(user.extra.get("totalActiveDays"), Some(&json!(12)));

        let back = serde_json::to_value(&user).unwrap();
        assert_eq!(back["totalActiveDays"], json!(12));
        assert_eq!(back["firstName"], json!("Ada"));
    }

    #[test]
    fn test_display_name_trims() {
        let user = User {
            first_name: "Ada".to_string(),
            last_name: String::new(),
            ..Default::default()
        };
        assert_eq!(user.display_name(), "Ada");
    }

    #[test]
    fn test_counterpart_translation_by_language() {
        let record: WordRecord = serde_json::from_value(json!({
            "id": 1,
            "word": "water",
            "language": "english",
            "meanings": [{ "word": "water", "definitions": ["liquid"] }],
            "translations": {
                "en": [{ "word": "water" }],
                "urh": [{ "word": "ame" }]
            }
        }))
        .unwrap();
        assert_eq!(record.counterpart(0).map(|t| t.word.as_str()), Some("ame"));
        assert!(record.counterpart(1).is_none());

        let urhobo = WordRecord {
            language: "urhobo".to_string(),
            ..record
        };
        assert_eq!(urhobo.counterpart(0).map(|t| t.word.as_str()), Some("water"));
    }

    #[test]
    fn test_synonyms_accept_both_shapes() {
        let meaning: Meaning =
            serde_json::from_value(json!({ "synonyms": [{ "word": "ame" }, "omi"] })).unwrap();
        let words: Vec<&str> = meaning.synonyms.iter().map(Synonym::word).collect();
        assert_eq!(words, vec!["ame", "omi"]);
    }

    #[test]
    fn test_search_response_tolerates_sparse_payload() {
        let parsed: SearchResponse =
            serde_json::from_value(json!({ "records": [{ "word": "ame" }] })).unwrap();
        assert_eq!(parsed.records.len(), 1);
        assert!(parsed.records[0].meanings.is_empty());
    }
}
