use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use url::Url;

use crate::form::{AppForm, Field};

fn app_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z]+$").expect("Invalid app name regex"))
}

fn company_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9]+$").expect("Invalid company regex"))
}

/// Letters only, no spaces or digits
pub fn app_name(v: &str) -> bool {
    app_name_re().is_match(v)
}

/// Letters and digits, no spaces
pub fn company(v: &str) -> bool {
    company_re().is_match(v)
}

/// Absolute URL
pub fn url(v: &str) -> bool {
    Url::parse(v).is_ok()
}

pub fn required(v: &str) -> bool {
    !v.trim().is_empty()
}

/// Per-field error messages; an absent field has no error
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: BTreeMap<Field, String>,
}

impl FieldErrors {
    pub fn set(&mut self, field: Field, message: &str) {
        if message.is_empty() {
            self.errors.remove(&field);
        } else {
            self.errors.insert(field, message.to_string());
        }
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.errors.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }
}

/// Full check run on submit. Returns true when the form may be saved.
pub fn validate_form(form: &AppForm, errors: &mut FieldErrors) -> bool {
    errors.clear();
    let mut ok = true;

    if !app_name(form.app_name.trim()) {
        errors.set(Field::AppName, "English letters only, no spaces.");
        ok = false;
    }
    if !company(form.company.trim()) {
        errors.set(Field::Company, "Letters + digits only, no spaces.");
        ok = false;
    }
    if !url(form.website.trim()) {
        errors.set(Field::Website, "Please enter a valid URL.");
        ok = false;
    }
    if !required(&form.domain) {
        errors.set(Field::Domain, "Please select a domain.");
        ok = false;
    }
    if form.is_free.is_none() {
        errors.set(Field::IsFree, "Please choose Free or Paid.");
        ok = false;
    }
    if !required(&form.summary) {
        errors.set(Field::Summary, "Please add a short summary.");
        ok = false;
    }

    ok
}

/// Short message shown while a field is being edited; empty when valid.
/// Fields without a live check return None and keep their current message.
pub fn live_message(field: Field, value: &str) -> Option<&'static str> {
    let value = value.trim();
    let msg = match field {
        Field::AppName if app_name(value) => "",
        Field::AppName => "Letters only",
        Field::Company if company(value) => "",
        Field::Company => "Letters + digits",
        Field::Website if url(value) => "",
        Field::Website => "Invalid URL",
        Field::Summary if !value.is_empty() => "",
        Field::Summary => "Required",
        _ => return None,
    };
    Some(msg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Pricing;

    fn valid_form() -> AppForm {
        AppForm {
            app_name: "Notely".into(),
            company: "Acme42".into(),
            website: "https://notely.example.com".into(),
            domain: "Productivity".into(),
            is_free: Some(Pricing::Free),
            summary: "Takes notes".into(),
            ..AppForm::default()
        }
    }

    #[test]
    fn app_name_allows_letters_only() {
        assert!(app_name("Notely"));
        assert!(!app_name("Note ly"));
        assert!(!app_name("Notely2"));
        assert!(!app_name(""));
    }

    #[test]
    fn company_allows_letters_and_digits() {
        assert!(company("Acme42"));
        assert!(!company("Acme 42"));
        assert!(!company("Acme-42"));
    }

    #[test]
    fn url_requires_absolute_url() {
        assert!(url("https://example.com/path?q=1"));
        assert!(url("mailto:someone@example.com"));
        assert!(!url("example.com"));
        assert!(!url(""));
    }

    #[test]
    fn required_trims() {
        assert!(required(" x "));
        assert!(!required("   "));
    }

    #[test]
    fn valid_form_has_no_errors() {
        let mut errors = FieldErrors::default();
        assert!(validate_form(&valid_form(), &mut errors));
        assert!(errors.is_empty());
    }

    #[test]
    fn empty_form_reports_every_required_field() {
        let mut errors = FieldErrors::default();
        assert!(!validate_form(&AppForm::default(), &mut errors));
        assert_eq!(errors.len(), 6);
        assert_eq!(errors.get(Field::AppName), Some("English letters only, no spaces."));
        assert_eq!(errors.get(Field::IsFree), Some("Please choose Free or Paid."));
        assert_eq!(errors.get(Field::LogoUrl), None);
    }

    #[test]
    fn validation_clears_stale_errors() {
        let mut errors = FieldErrors::default();
        errors.set(Field::Summary, "old");
        validate_form(&valid_form(), &mut errors);
        assert_eq!(errors.get(Field::Summary), None);
    }

    #[test]
    fn live_messages_per_field() {
        assert_eq!(live_message(Field::AppName, "a b"), Some("Letters only"));
        assert_eq!(live_message(Field::AppName, " ab "), Some(""));
        assert_eq!(live_message(Field::Company, "a-b"), Some("Letters + digits"));
        assert_eq!(live_message(Field::Website, "nope"), Some("Invalid URL"));
        assert_eq!(live_message(Field::Summary, " "), Some("Required"));
        assert_eq!(live_message(Field::VideoUrl, "anything"), None);
    }
}
