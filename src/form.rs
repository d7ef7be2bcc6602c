use crate::record::{new_id, now_timestamp, AppRecord, Pricing, DOMAINS};
use crate::validate::{self, FieldErrors};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, strum_macros::Display)]
pub enum Field {
    #[strum(serialize = "App name")]
    AppName,
    Company,
    Website,
    Domain,
    #[strum(serialize = "Pricing")]
    IsFree,
    Summary,
    #[strum(serialize = "Logo URL")]
    LogoUrl,
    #[strum(serialize = "Audio URL")]
    AudioUrl,
    #[strum(serialize = "Video URL")]
    VideoUrl,
}

impl Field {
    pub const ORDER: [Field; 9] = [
        Field::AppName,
        Field::Company,
        Field::Website,
        Field::Domain,
        Field::IsFree,
        Field::Summary,
        Field::LogoUrl,
        Field::AudioUrl,
        Field::VideoUrl,
    ];

    /// Choice fields cycle through options instead of taking text
    pub fn is_choice(&self) -> bool {
        matches!(self, Field::Domain | Field::IsFree)
    }
}

/// Raw values of the add form, as typed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppForm {
    pub app_name: String,
    pub company: String,
    pub website: String,
    pub domain: String,
    pub is_free: Option<Pricing>,
    pub summary: String,
    pub logo_url: String,
    pub audio_url: String,
    pub video_url: String,
}

impl AppForm {
    pub fn text(&self, field: Field) -> &str {
        match field {
            Field::AppName => &self.app_name,
            Field::Company => &self.company,
            Field::Website => &self.website,
            Field::Domain => &self.domain,
            Field::IsFree => match self.is_free {
                Some(Pricing::Free) => "Free",
                Some(Pricing::Paid) => "Paid",
                None => "",
            },
            Field::Summary => &self.summary,
            Field::LogoUrl => &self.logo_url,
            Field::AudioUrl => &self.audio_url,
            Field::VideoUrl => &self.video_url,
        }
    }

    fn text_mut(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::AppName => Some(&mut self.app_name),
            Field::Company => Some(&mut self.company),
            Field::Website => Some(&mut self.website),
            Field::Summary => Some(&mut self.summary),
            Field::LogoUrl => Some(&mut self.logo_url),
            Field::AudioUrl => Some(&mut self.audio_url),
            Field::VideoUrl => Some(&mut self.video_url),
            Field::Domain | Field::IsFree => None,
        }
    }

    /// Builds the record to store; values are trimmed
    pub fn to_record(&self) -> Option<AppRecord> {
        Some(AppRecord {
            id: new_id(),
            app_name: self.app_name.trim().to_string(),
            company: self.company.trim().to_string(),
            website: self.website.trim().to_string(),
            domain: self.domain.clone(),
            is_free: self.is_free?,
            summary: self.summary.trim().to_string(),
            logo_url: self.logo_url.trim().to_string(),
            audio_url: self.audio_url.trim().to_string(),
            video_url: self.video_url.trim().to_string(),
            created_at: now_timestamp(),
        })
    }
}

/// Interactive form: values, focus and field errors
#[derive(Debug, Clone, Default)]
pub struct FormState {
    pub form: AppForm,
    pub focus: usize,
    pub errors: FieldErrors,
}

impl FormState {
    pub fn focused(&self) -> Field {
        Field::ORDER[self.focus % Field::ORDER.len()]
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % Field::ORDER.len();
    }

    pub fn focus_prev(&mut self) {
        self.focus = (self.focus + Field::ORDER.len() - 1) % Field::ORDER.len();
    }

    pub fn push_char(&mut self, c: char) {
        let field = self.focused();
        if let Some(text) = self.form.text_mut(field) {
            text.push(c);
            self.revalidate(field);
        }
    }

    pub fn backspace(&mut self) {
        let field = self.focused();
        if let Some(text) = self.form.text_mut(field) {
            text.pop();
            self.revalidate(field);
        }
    }

    /// Steps a choice field forward (or back) through its options
    pub fn cycle_choice(&mut self, forward: bool) {
        match self.focused() {
            Field::Domain => {
                let current = DOMAINS.iter().position(|d| *d == self.form.domain);
                let len = DOMAINS.len();
                let idx = match (current, forward) {
                    (None, true) => 0,
                    (None, false) => len - 1,
                    (Some(i), true) => (i + 1) % len,
                    (Some(i), false) => (i + len - 1) % len,
                };
                self.form.domain = DOMAINS[idx].to_string();
                self.errors.set(Field::Domain, "");
            }
            Field::IsFree => {
                self.form.is_free = Some(match self.form.is_free {
                    Some(Pricing::Free) => Pricing::Paid,
                    _ => Pricing::Free,
                });
                self.errors.set(Field::IsFree, "");
            }
            _ => {}
        }
    }

    fn revalidate(&mut self, field: Field) {
        if let Some(msg) = validate::live_message(field, self.form.text(field)) {
            self.errors.set(field, msg);
        }
    }

    /// Runs the full check and, when it passes, returns the new record
    pub fn submit(&mut self) -> Option<AppRecord> {
        if !validate::validate_form(&self.form, &mut self.errors) {
            return None;
        }
        self.form.to_record()
    }

    /// Clears values and every field error
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
