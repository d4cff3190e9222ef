//! Helpers exposed to callers outside the page controllers: contact-form
//! validation and the two timing wrappers.

use crate::{Page, Result};

pub use crate::forms::is_valid_email;
pub use crate::timing::{Debounce, Throttle};

/// Validates every `input` and `textarea` inside the first element matching
/// `form_selector`, updating inline error messages. Returns `true` when all
/// fields pass.
///
/// ```
/// use page_behavior::{utils, Page, Result};
///
/// fn main() -> Result<()> {
///     let mut page = Page::from_html(
///         r#"<form id="contact"><input id="name" required><input id="email" type="email" value="ada@example.com"></form>"#,
///     )?;
///     assert!(!utils::validate_form(&mut page, "#contact")?);
///     page.assert_class("#name", "error", true)?;
///     page.type_text("#name", "Ada")?;
///     assert!(utils::validate_form(&mut page, "#contact")?);
///     Ok(())
/// }
/// ```
pub fn validate_form(page: &mut Page, form_selector: &str) -> Result<bool> {
    page.validate_form(form_selector)
}
