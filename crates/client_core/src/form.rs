//! Profile form: field rules, the editable draft and submit gating.

use std::{collections::BTreeMap, fmt, sync::LazyLock};

use regex::Regex;
use shared::{
    domain::{Organisation, UrlKey},
    protocol::{UpdateOrganisationRequest, UrlsPatch},
};
use url::Url;

pub const ABOUT_MAX_LENGTH: usize = 160;

pub const APPSTORE_URL: &str = "https://apps.apple.com/";
pub const PLAYSTORE_URL: &str = "https://play.google.com/store/apps/";
pub const TWITTER_URL: &str = "https://twitter.com/";
pub const LINKEDIN_URL: &str = "https://www.linkedin.com/";

pub const TWITTER_PATTERN_MESSAGE: &str =
    "Invalid entry: only alphanumeric characters and _ are allowed";
pub const LINKEDIN_PATTERN_MESSAGE: &str =
    "Invalid entry: only alphanumeric characters and special characters: _ - /  are allowed";
pub const INVALID_URL_MESSAGE: &str = "Invalid URL";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldKey {
    About,
    Language,
    Url(UrlKey),
}

impl FieldKey {
    pub const ALL: [FieldKey; 7] = [
        FieldKey::About,
        FieldKey::Language,
        FieldKey::Url(UrlKey::AppStore),
        FieldKey::Url(UrlKey::PlayStore),
        FieldKey::Url(UrlKey::Twitter),
        FieldKey::Url(UrlKey::Linkedin),
        FieldKey::Url(UrlKey::Website),
    ];

    /// Dotted input name, e.g. `urls.twitter`.
    pub fn name(self) -> String {
        match self {
            FieldKey::About => "about".to_string(),
            FieldKey::Language => "language".to_string(),
            FieldKey::Url(key) => format!("urls.{}", key.as_str()),
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "about" => Some(FieldKey::About),
            "language" => Some(FieldKey::Language),
            other => other
                .strip_prefix("urls.")
                .and_then(UrlKey::parse)
                .map(FieldKey::Url),
        }
    }

    pub fn translation_key(self) -> String {
        match self {
            FieldKey::About => "profile.org.desc".to_string(),
            FieldKey::Language => "profile.org.lang".to_string(),
            FieldKey::Url(key) => format!("profile.org.urls.{}", key.as_str()),
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Validator {
    None,
    MaxLength(usize),
    Pattern {
        regex: &'static LazyLock<Regex>,
        message: &'static str,
    },
    OptionalUrl,
}

impl Validator {
    pub fn check(&self, value: &str) -> Result<(), String> {
        match self {
            Validator::None => Ok(()),
            // Length in UTF-16 code units, as browsers count `maxLength`.
            Validator::MaxLength(max) => {
                if value.encode_utf16().count() > *max {
                    Err(format!("Max. {max} characters"))
                } else {
                    Ok(())
                }
            }
            Validator::Pattern { regex, message } => {
                if regex.is_match(value) {
                    Ok(())
                } else {
                    Err((*message).to_string())
                }
            }
            Validator::OptionalUrl => {
                if value.is_empty() || is_valid_url(value) {
                    Ok(())
                } else {
                    Err(INVALID_URL_MESSAGE.to_string())
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub key: FieldKey,
    pub label: &'static str,
    pub validator: Validator,
    pub prefix: Option<&'static str>,
}

impl FieldRule {
    /// Prefixed fields take a handle or path, not a full URL.
    pub fn input_type(&self) -> &'static str {
        match (self.key, self.prefix) {
            (FieldKey::Url(_), None) => "url",
            _ => "text",
        }
    }
}

static TWITTER_HANDLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_]*$").expect("twitter handle pattern"));

static LINKEDIN_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_\-/]*$").expect("linkedin path pattern"));

pub static FIELD_RULES: [FieldRule; 7] = [
    FieldRule {
        key: FieldKey::About,
        label: "Description",
        validator: Validator::MaxLength(ABOUT_MAX_LENGTH),
        prefix: None,
    },
    FieldRule {
        key: FieldKey::Language,
        label: "Language",
        validator: Validator::None,
        prefix: None,
    },
    FieldRule {
        key: FieldKey::Url(UrlKey::AppStore),
        label: "Link to Apple Store",
        validator: Validator::None,
        prefix: Some(APPSTORE_URL),
    },
    FieldRule {
        key: FieldKey::Url(UrlKey::PlayStore),
        label: "Link to Google Play",
        validator: Validator::None,
        prefix: Some(PLAYSTORE_URL),
    },
    FieldRule {
        key: FieldKey::Url(UrlKey::Twitter),
        label: "Twitter URL",
        validator: Validator::Pattern {
            regex: &TWITTER_HANDLE,
            message: TWITTER_PATTERN_MESSAGE,
        },
        prefix: Some(TWITTER_URL),
    },
    FieldRule {
        key: FieldKey::Url(UrlKey::Linkedin),
        label: "LinkedIn URL",
        validator: Validator::Pattern {
            regex: &LINKEDIN_PATH,
            message: LINKEDIN_PATTERN_MESSAGE,
        },
        prefix: Some(LINKEDIN_URL),
    },
    FieldRule {
        key: FieldKey::Url(UrlKey::Website),
        label: "Website",
        validator: Validator::OptionalUrl,
        prefix: None,
    },
];

pub fn rule_for(key: FieldKey) -> &'static FieldRule {
    match key {
        FieldKey::About => &FIELD_RULES[0],
        FieldKey::Language => &FIELD_RULES[1],
        FieldKey::Url(UrlKey::AppStore) => &FIELD_RULES[2],
        FieldKey::Url(UrlKey::PlayStore) => &FIELD_RULES[3],
        FieldKey::Url(UrlKey::Twitter) => &FIELD_RULES[4],
        FieldKey::Url(UrlKey::Linkedin) => &FIELD_RULES[5],
        FieldKey::Url(UrlKey::Website) => &FIELD_RULES[6],
    }
}

/// Accepts absolute http(s) URLs with a host, and bare hosts such as
/// `example.org` which are read as `https://example.org`.
pub fn is_valid_url(raw: &str) -> bool {
    if raw.chars().any(char::is_whitespace) {
        return false;
    }

    let parsed = match Url::parse(raw) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => match Url::parse(&format!("https://{raw}")) {
            Ok(url) if url.host_str().is_some_and(|host| host.contains('.')) => url,
            _ => return false,
        },
        Err(_) => return false,
    };

    matches!(parsed.scheme(), "http" | "https") && parsed.host_str().is_some_and(|h| !h.is_empty())
}

/// In-progress form values for one editing session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileDraft {
    pub about: String,
    pub language: String,
    pub urls: UrlsPatch,
}

impl ProfileDraft {
    pub fn from_organisation(organisation: Option<&Organisation>) -> Self {
        let Some(organisation) = organisation else {
            return Self::default();
        };
        Self {
            about: organisation.about.clone().unwrap_or_default(),
            language: organisation.language.clone().unwrap_or_default(),
            urls: UrlsPatch::from(&organisation.urls),
        }
    }

    pub fn get(&self, key: FieldKey) -> &str {
        match key {
            FieldKey::About => &self.about,
            FieldKey::Language => &self.language,
            FieldKey::Url(url_key) => self.urls.get(url_key),
        }
    }

    pub fn set(&mut self, key: FieldKey, value: impl Into<String>) {
        let value = value.into();
        match key {
            FieldKey::About => self.about = value,
            FieldKey::Language => self.language = value,
            FieldKey::Url(url_key) => *self.urls.get_mut(url_key) = value,
        }
    }

    pub fn to_request(&self) -> UpdateOrganisationRequest {
        UpdateOrganisationRequest {
            about: Some(self.about.clone()),
            language: Some(self.language.clone()),
            urls: Some(self.urls.clone()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<FieldKey, String>);

impl FieldErrors {
    pub fn get(&self, key: FieldKey) -> Option<&str> {
        self.0.get(&key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldKey, &str)> {
        self.0.iter().map(|(key, message)| (*key, message.as_str()))
    }

    fn set(&mut self, key: FieldKey, outcome: Result<(), String>) {
        match outcome {
            Ok(()) => {
                self.0.remove(&key);
            }
            Err(message) => {
                self.0.insert(key, message);
            }
        }
    }
}

pub fn validate_field(key: FieldKey, value: &str) -> Result<(), String> {
    rule_for(key).validator.check(value)
}

pub fn validate_draft(draft: &ProfileDraft) -> FieldErrors {
    let mut errors = FieldErrors::default();
    for key in FieldKey::ALL {
        errors.set(key, validate_field(key, draft.get(key)));
    }
    errors
}

/// Draft plus the errors from the last validation pass.
///
/// Fields are validated on submit; once a field has failed it is
/// re-validated on every change so the message clears as soon as the input
/// is fixed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileForm {
    draft: ProfileDraft,
    errors: FieldErrors,
}

impl ProfileForm {
    pub fn new(organisation: Option<&Organisation>) -> Self {
        Self {
            draft: ProfileDraft::from_organisation(organisation),
            errors: FieldErrors::default(),
        }
    }

    pub fn draft(&self) -> &ProfileDraft {
        &self.draft
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn value(&self, key: FieldKey) -> &str {
        self.draft.get(key)
    }

    pub fn set(&mut self, key: FieldKey, value: impl Into<String>) {
        self.draft.set(key, value);
        if self.errors.get(key).is_some() {
            let outcome = validate_field(key, self.draft.get(key));
            self.errors.set(key, outcome);
        }
    }

    /// Validates every field. Returns the draft to submit, or the errors that
    /// block submission.
    pub fn handle_submit(&mut self) -> Result<ProfileDraft, FieldErrors> {
        self.errors = validate_draft(&self.draft);
        if self.errors.is_empty() {
            Ok(self.draft.clone())
        } else {
            Err(self.errors.clone())
        }
    }
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
