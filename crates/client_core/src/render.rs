//! Page rendering: a view model built from store + form state, and its HTML
//! markup.

use std::fmt::Write as _;

use shared::domain::OrganisationId;

use crate::{
    form::{rule_for, FieldKey, ProfileForm},
    routes::Route,
    store::OrganisationState,
};

/// Translation-string provider.
pub trait Translate: Send + Sync {
    fn t(&self, key: &str) -> String;
}

/// Built-in English strings. Unknown keys come back unchanged.
pub struct EnglishCatalog;

impl Translate for EnglishCatalog {
    fn t(&self, key: &str) -> String {
        let text = match key {
            "profile.common.loading" => "Loading...",
            "profile.common.accountInfo" => "Account Information",
            "profile.common.profileInfo" => "Profile Information",
            "profile.common.saveChanges" => "Save Changes",
            "profile.org.editOrgProfile" => "Edit Profile",
            "profile.org.completeOrgProfile" => "Complete Profile",
            "profile.org.desc" => "Description",
            "profile.org.lang" => "Language",
            "profile.org.urls.appStore" => "Link to Apple Store",
            "profile.org.urls.playStore" => "Link to Google Play",
            "profile.org.urls.twitter" => "Twitter URL",
            "profile.org.urls.linkedin" => "LinkedIn URL",
            "profile.org.urls.website" => "Website",
            other => other,
        };
        text.to_string()
    }
}

pub fn initials_from_full_name(name: &str) -> String {
    let words: Vec<&str> = name.split_whitespace().collect();
    let first_letter = |word: &str| word.chars().next().into_iter().flat_map(char::to_uppercase);
    match words.as_slice() {
        [] => String::new(),
        [only] => first_letter(*only).collect(),
        [first, .., last] => first_letter(*first).chain(first_letter(*last)).collect(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabLink {
    pub label: String,
    pub href: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldView {
    pub name: String,
    pub label: String,
    pub input_type: &'static str,
    pub prefix: Option<&'static str>,
    pub value: String,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    pub heading: String,
    /// Avatar initials; absent until an organisation is loaded.
    pub initials: Option<String>,
    pub tabs: Vec<TabLink>,
    pub fields: Vec<FieldView>,
    pub submit_label: String,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageView {
    Loading { text: String },
    Loaded(FormView),
}

pub fn render_page(
    state: &OrganisationState,
    form: &ProfileForm,
    organisation_id: &OrganisationId,
    translator: &dyn Translate,
) -> PageView {
    if state.loading {
        return PageView::Loading {
            text: translator.t("profile.common.loading"),
        };
    }

    let initials = state
        .organisation
        .as_ref()
        .map(|org| initials_from_full_name(org.name.as_deref().unwrap_or_default()));

    let tabs = vec![
        TabLink {
            label: translator.t("profile.common.accountInfo"),
            href: Route::EditOrganisationAccount {
                id: organisation_id.clone(),
            }
            .path(),
            selected: false,
        },
        TabLink {
            label: translator.t("profile.common.profileInfo"),
            href: Route::EditOrganisationProfile {
                id: organisation_id.clone(),
            }
            .path(),
            selected: true,
        },
    ];

    let fields = FieldKey::ALL
        .into_iter()
        .map(|key| {
            let rule = rule_for(key);
            FieldView {
                name: key.name(),
                label: translator.t(&key.translation_key()),
                input_type: rule.input_type(),
                prefix: rule.prefix,
                value: form.value(key).to_string(),
                error: form.errors().get(key).map(str::to_string),
            }
        })
        .collect();

    let mut submit_label = translator.t("profile.common.saveChanges");
    if state.updating {
        submit_label.push_str("...");
    }

    PageView::Loaded(FormView {
        heading: translator.t("profile.org.editOrgProfile"),
        initials,
        tabs,
        fields,
        submit_label,
        error: state.error.clone(),
    })
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

impl PageView {
    pub fn to_html(&self) -> String {
        match self {
            PageView::Loading { text } => format!("<div>{}</div>", escape(text)),
            PageView::Loaded(view) => view.to_html(),
        }
    }
}

impl FormView {
    pub fn to_html(&self) -> String {
        // Writing into a String cannot fail.
        let mut html = String::new();
        html.push_str("<section class=\"edit-profile\">");
        let _ = write!(html, "<h4>{}</h4>", escape(&self.heading));
        if let Some(initials) = &self.initials {
            let _ = write!(html, "<div class=\"profile-pic\">{}</div>", escape(initials));
        }
        if let Some(error) = &self.error {
            let _ = write!(html, "<p class=\"error\" role=\"alert\">{}</p>", escape(error));
        }

        html.push_str("<nav>");
        for tab in &self.tabs {
            let class = if tab.selected { " class=\"selected\"" } else { "" };
            let _ = write!(
                html,
                "<a href=\"{}\"{class}>{}</a>",
                escape(&tab.href),
                escape(&tab.label)
            );
        }
        html.push_str("</nav><form>");

        for field in &self.fields {
            html.push_str("<label>");
            let _ = write!(html, "<span>{}</span>", escape(&field.label));
            if let Some(prefix) = field.prefix {
                let _ = write!(html, "<span class=\"prefix\">{}</span>", escape(prefix));
            }
            let _ = write!(
                html,
                "<input type=\"{}\" name=\"{}\" value=\"{}\">",
                field.input_type,
                escape(&field.name),
                escape(&field.value)
            );
            if let Some(error) = &field.error {
                let _ = write!(html, "<small class=\"error\">{}</small>", escape(error));
            }
            html.push_str("</label>");
        }

        let _ = write!(
            html,
            "<button type=\"submit\">{}</button></form></section>",
            escape(&self.submit_label)
        );
        html
    }
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
