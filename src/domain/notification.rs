use crate::domain::submission::SubmissionRequest;
use std::fmt;

/// Shown in the body when the submitter left the industry unselected.
const INDUSTRY_UNSELECTED: &str = "未選択";

/// The email sent to the business owner for one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    pub to: String,
    pub reply_to: String,
    pub subject: String,
    pub body: String,
}

impl NotificationMessage {
    #[must_use]
    pub fn from_submission(submission: &SubmissionRequest, recipient: &str, brand: &str) -> Self {
        let company: String =
            submission.company.chars().map(|c| if c.is_control() { ' ' } else { c }).collect();

        let industry = submission.industry.as_ref().map_or(INDUSTRY_UNSELECTED, |i| i.label());

        let body = format!(
            "新しいお問い合わせが届きました。\n\
             \n\
             会社名: {company}\n\
             お名前: {name}\n\
             メールアドレス: {email}\n\
             業種: {industry}\n\
             \n\
             お問い合わせ内容:\n\
             {message}\n\
             \n\
             ---\n\
             このメールは{brand}のお問い合わせフォームから送信されました。",
            company = submission.company,
            name = submission.name,
            email = submission.email,
            message = submission.message,
        );

        Self {
            to: recipient.to_string(),
            reply_to: submission.email.clone(),
            subject: format!("【{brand}】新しいお問い合わせ - {company}様"),
            body,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Primary,
    Fallback,
}

impl Transport {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Fallback => "fallback",
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
