//! Small utility helpers used across modules.

/// Mask a contact number for logs: keep the last 4 characters, replace the
/// rest. Short values are masked entirely.
pub fn mask_contact(s: &str) -> String {
  let len = s.chars().count();
  if len <= 4 {
    return "*".repeat(len.max(1));
  }
  let tail: String = s.chars().skip(len - 4).collect();
  format!("{}{}", "*".repeat(len - 4), tail)
}

/// Mask an email for logs: first character of the local part plus the
/// domain. "alice@example.com" -> "a***@example.com".
pub fn mask_email(s: &str) -> String {
  match s.split_once('@') {
    Some((local, domain)) if !local.is_empty() => {
      let first = local.chars().next().map(String::from).unwrap_or_default();
      format!("{}***@{}", first, domain)
    }
    _ => "***".into(),
  }
}

/// Log-safe truncation for large strings.
/// Avoids spamming logs with huge request/response payloads.
#[allow(dead_code)]
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.len() <= max { s.to_string() } else { format!("{}… ({} bytes total)", &s[..max], s.len()) }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn contact_masking_keeps_last_four() {
    assert_eq!(mask_contact("+91 9876543210"), "**********3210");
    assert_eq!(mask_contact("12"), "**");
    assert_eq!(mask_contact(""), "*");
  }

  #[test]
  fn email_masking_keeps_domain() {
    assert_eq!(mask_email("alice@example.com"), "a***@example.com");
    assert_eq!(mask_email("not-an-email"), "***");
  }
}
