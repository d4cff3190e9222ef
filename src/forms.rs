use super::*;
use crate::pattern::{Regex, RegexError};
use std::sync::OnceLock;

pub(crate) const REQUIRED_MESSAGE: &str = "This field is required";
pub(crate) const INVALID_EMAIL_MESSAGE: &str = "Please enter a valid email";
pub(crate) const ERROR_MESSAGE_CLASS: &str = "error-message";
pub(crate) const ERROR_CLASS: &str = "error";

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

fn email_regex() -> &'static std::result::Result<Regex, RegexError> {
    static EMAIL: OnceLock<std::result::Result<Regex, RegexError>> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(EMAIL_PATTERN))
}

/// `local@domain.tld` with no whitespace and exactly one `@` before the dot.
///
/// ```
/// use page_behavior::utils::is_valid_email;
///
/// assert!(is_valid_email("ada@example.com"));
/// assert!(!is_valid_email("ada@example"));
/// assert!(!is_valid_email("ada lovelace@example.com"));
/// ```
pub fn is_valid_email(value: &str) -> bool {
    match email_regex() {
        Ok(regex) => regex.is_match(value).unwrap_or(false),
        Err(err) => {
            log::warn!(target: "page_behavior", "email pattern {EMAIL_PATTERN} failed to compile: {err}");
            false
        }
    }
}

/// Checks every `input` and `textarea` under `form`, showing or clearing
/// the inline error of each. Returns `true` only when all fields pass.
pub(crate) fn validate_form(dom: &mut Dom, form: NodeId) -> Result<bool> {
    let fields = dom.query_selector_all_from(form, "input, textarea")?;
    let mut all_valid = true;

    for field in fields {
        let Some(element) = dom.element(field) else {
            continue;
        };
        // Only the required check trims; the email pattern sees the raw value.
        let failure = if element.required && element.value.trim().is_empty() {
            Some(REQUIRED_MESSAGE)
        } else if element.input_type() == "email" && !is_valid_email(&element.value) {
            Some(INVALID_EMAIL_MESSAGE)
        } else {
            None
        };

        match failure {
            Some(message) => {
                show_error(dom, field, message)?;
                all_valid = false;
            }
            None => clear_error(dom, field)?,
        }
    }
    Ok(all_valid)
}

fn error_message_after(dom: &Dom, field: NodeId) -> Option<NodeId> {
    dom.next_element_sibling(field).filter(|sibling| {
        dom.element(*sibling)
            .is_some_and(|element| has_class(element, ERROR_MESSAGE_CLASS))
    })
}

/// Marks `field` with the `error` class and writes `message` into the
/// error element right after it, creating the element on first use.
pub(crate) fn show_error(dom: &mut Dom, field: NodeId, message: &str) -> Result<()> {
    dom.class_add(field, ERROR_CLASS)?;
    if let Some(existing) = error_message_after(dom, field) {
        return dom.set_text_content(existing, message);
    }
    let span = dom.create_detached_element("span");
    dom.class_add(span, ERROR_MESSAGE_CLASS)?;
    dom.set_text_content(span, message)?;
    dom.insert_after(field, span)
}

pub(crate) fn clear_error(dom: &mut Dom, field: NodeId) -> Result<()> {
    dom.class_remove(field, ERROR_CLASS)?;
    if let Some(existing) = error_message_after(dom, field) {
        dom.remove_node(existing)?;
    }
    Ok(())
}
