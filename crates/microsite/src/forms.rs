pub const JOIN_THANKS: &str = "Thank you for joining! We will contact you soon.";
pub const NEWSLETTER_THANKS: &str = "Thank you for subscribing to our newsletter!";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),
}

fn require(field: &'static str, value: &str) -> Result<(), FormError> {
    if value.trim().is_empty() {
        return Err(FormError::Missing(field));
    }
    Ok(())
}

fn check_email(value: &str) -> Result<(), FormError> {
    require("email", value)?;
    let value = value.trim();
    let valid = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@')
        }
        None => false,
    };
    if !valid || value.contains(char::is_whitespace) {
        return Err(FormError::InvalidEmail(value.to_string()));
    }
    Ok(())
}

/// "Join us" form. Nothing is sent anywhere; a valid submission is
/// acknowledged and the fields are cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JoinForm {
    pub name: String,
    pub email: String,
}

impl JoinForm {
    pub fn submit(&mut self) -> Result<&'static str, FormError> {
        require("name", &self.name)?;
        check_email(&self.email)?;
        tracing::debug!("join form submitted");
        *self = Self::default();
        Ok(JOIN_THANKS)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewsletterForm {
    pub email: String,
}

impl NewsletterForm {
    pub fn submit(&mut self) -> Result<&'static str, FormError> {
        check_email(&self.email)?;
        tracing::debug!("newsletter form submitted");
        *self = Self::default();
        Ok(NEWSLETTER_THANKS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_form_acknowledges_and_resets() {
        let mut form = JoinForm {
            name: "Asha".into(),
            email: "asha@example.com".into(),
        };
        assert_eq!(form.submit(), Ok(JOIN_THANKS));
        assert_eq!(form, JoinForm::default());
    }

    #[test]
    fn empty_fields_are_rejected_and_kept() {
        let mut form = JoinForm {
            name: "  ".into(),
            email: "asha@example.com".into(),
        };
        assert_eq!(form.submit(), Err(FormError::Missing("name")));
        assert_eq!(form.email, "asha@example.com");

        let mut newsletter = NewsletterForm::default();
        assert_eq!(newsletter.submit(), Err(FormError::Missing("email")));
    }

    #[test]
    fn newsletter_checks_email_shape() {
        let mut newsletter = NewsletterForm {
            email: "not-an-email".into(),
        };
        assert!(matches!(
            newsletter.submit(),
            Err(FormError::InvalidEmail(_))
        ));

        newsletter.email = "reader@example.org".into();
        assert_eq!(newsletter.submit(), Ok(NEWSLETTER_THANKS));
        assert!(newsletter.email.is_empty());
    }
}
