use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex"));

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("Malformed email address")]
    MalformedEmail,
    #[error("Message exceeds {max} characters")]
    MessageTooLong { max: usize },
}

impl ValidationError {
    /// Message shown to the person filling in the form.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingField(_) => "必須項目が入力されていません。".to_string(),
            Self::MalformedEmail => "有効なメールアドレスを入力してください。".to_string(),
            Self::MessageTooLong { max } => format!("お問い合わせ内容は{max}文字以内で入力してください。"),
        }
    }
}

/// Industry options offered by the form. Anything else is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Industry {
    RealEstate,
    Construction,
    Renovation,
    HousingMaker,
    Other,
    Unlisted(String),
}

impl Industry {
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        let industry = match value {
            "" => return None,
            "real-estate" => Self::RealEstate,
            "construction" => Self::Construction,
            "renovation" => Self::Renovation,
            "housing-maker" => Self::HousingMaker,
            "other" => Self::Other,
            unlisted => Self::Unlisted(unlisted.to_string()),
        };
        Some(industry)
    }

    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::RealEstate => "不動産業",
            Self::Construction => "建設業",
            Self::Renovation => "リフォーム業",
            Self::HousingMaker => "住宅メーカー",
            Self::Other => "その他",
            Self::Unlisted(value) => value,
        }
    }
}

impl fmt::Display for Industry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A contact-form submission that has passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRequest {
    pub company: String,
    pub name: String,
    pub email: String,
    pub industry: Option<Industry>,
    pub message: String,
}

/// Raw field values as received, before any checks.
#[derive(Debug, Clone, Default)]
pub struct SubmissionFields {
    pub company: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub industry: Option<String>,
    pub message: Option<String>,
}

fn required(value: Option<&str>, field: &'static str) -> Result<String, ValidationError> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string).ok_or(ValidationError::MissingField(field))
}

#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_SHAPE.is_match(email)
}

impl SubmissionFields {
    /// Checks required fields, email shape, and message length.
    ///
    /// # Errors
    /// Returns the first rule the submission violates.
    pub fn validate(&self, max_message_chars: usize) -> Result<SubmissionRequest, ValidationError> {
        let company = required(self.company.as_deref(), "company")?;
        let name = required(self.name.as_deref(), "name")?;
        let email = required(self.email.as_deref(), "email")?;
        let message = required(self.message.as_deref(), "message")?;

        if !is_valid_email(&email) {
            return Err(ValidationError::MalformedEmail);
        }

        if message.chars().count() > max_message_chars {
            return Err(ValidationError::MessageTooLong { max: max_message_chars });
        }

        Ok(SubmissionRequest { company, name, email, industry: self.industry.as_deref().and_then(Industry::parse), message })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> SubmissionFields {
        SubmissionFields {
            company: Some("Acme Co".to_string()),
            name: Some("Taro".to_string()),
            email: Some("taro@acme.co".to_string()),
            industry: None,
            message: Some("need a quote".to_string()),
        }
    }

    #[test]
    fn test_valid_submission_is_trimmed() {
        let mut input = fields();
        input.company = Some("  Acme Co \n".to_string());
        input.industry = Some(" construction ".to_string());

        let request = input.validate(500).unwrap();
        assert_eq!(request.company, "Acme Co");
        assert_eq!(request.industry, Some(Industry::Construction));
    }

    #[test]
    fn test_missing_fields() {
        let cases: [(&str, fn(&mut SubmissionFields)); 4] = [
            ("company", |f| f.company = None),
            ("name", |f| f.name = Some("   ".to_string())),
            ("email", |f| f.email = Some(String::new())),
            ("message", |f| f.message = None),
        ];

        for (field, clear) in cases {
            let mut input = fields();
            clear(&mut input);
            assert_eq!(input.validate(500), Err(ValidationError::MissingField(field)));
        }
    }

    #[test]
    fn test_missing_field_wins_over_malformed_email() {
        let mut input = fields();
        input.email = Some("not-an-email".to_string());
        input.message = None;
        assert_eq!(input.validate(500), Err(ValidationError::MissingField("message")));
    }

    #[test]
    fn test_email_shape() {
        for bad in ["not-an-email", "taro@acme", "@acme.co", "taro@.", "ta ro@acme.co", "taro@@acme.co", "taro@acme."] {
            let mut input = fields();
            input.email = Some(bad.to_string());
            assert_eq!(input.validate(500), Err(ValidationError::MalformedEmail), "{bad}");
        }

        for good in ["taro@acme.co", "t.yamada+inquiry@mail.example.jp", "a@b.c"] {
            assert!(is_valid_email(good), "{good}");
        }
    }

    #[test]
    fn test_message_length_counts_characters() {
        let mut input = fields();
        input.message = Some("あ".repeat(500));
        assert!(input.validate(500).is_ok());

        input.message = Some("あ".repeat(501));
        assert_eq!(input.validate(500), Err(ValidationError::MessageTooLong { max: 500 }));
    }

    #[test]
    fn test_industry_is_permissive() {
        assert_eq!(Industry::parse(""), None);
        assert_eq!(Industry::parse("real-estate"), Some(Industry::RealEstate));
        assert_eq!(Industry::parse("logistics").map(|i| i.label().to_string()), Some("logistics".to_string()));
        assert_eq!(Industry::HousingMaker.to_string(), "住宅メーカー");
    }

    #[test]
    fn test_user_messages_are_distinct() {
        let missing = ValidationError::MissingField("name").user_message();
        let email = ValidationError::MalformedEmail.user_message();
        assert_ne!(missing, email);
        assert!(ValidationError::MessageTooLong { max: 500 }.user_message().contains("500"));
    }
}
