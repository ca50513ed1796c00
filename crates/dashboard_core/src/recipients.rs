/// Recipient list as last reported by the service.
///
/// The service lists default recipients first; `default_count` of them are
/// fixed and cannot be removed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecipientsState {
    emails: Vec<String>,
    default_count: usize,
    loaded: bool,
}

impl RecipientsState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&mut self, emails: Vec<String>, default_count: Option<usize>) {
        self.default_count = default_count.unwrap_or(0).min(emails.len());
        self.emails = emails;
        self.loaded = true;
    }

    pub fn emails(&self) -> &[String] {
        &self.emails
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_default(&self, email: &str) -> bool {
        self.emails[..self.default_count]
            .iter()
            .any(|known| known == email)
    }
}

/// Loose shape check: `local@domain.tld`, no whitespace, a single `@`.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(idx, ch)| ch == '.' && idx > 0 && idx + 1 < domain.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shape_check() {
        assert!(is_valid_email("reader@example.com"));
        assert!(is_valid_email("a.b@mail.example.co"));
        assert!(!is_valid_email("reader@example"));
        assert!(!is_valid_email("reader@.com"));
        assert!(!is_valid_email("reader@example."));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("re ader@example.com"));
        assert!(!is_valid_email("a@b@example.com"));
        assert!(!is_valid_email("reader.example.com"));
    }

    #[test]
    fn default_count_is_clamped_to_list_length() {
        let mut state = RecipientsState::new();
        state.replace(vec!["a@example.com".to_string()], Some(5));
        assert!(state.is_default("a@example.com"));
        assert!(!state.is_default("b@example.com"));
    }
}
