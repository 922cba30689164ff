//! Topic name validation.

use kondukt_core::{Error, Result};

/// Maximum topic name length the broker accepts.
pub const MAX_TOPIC_LENGTH: usize = 249;

/// Validates a topic name against broker naming rules.
///
/// Topic names are 1–249 characters of ASCII alphanumerics, `.`, `_`,
/// and `-`; the reserved names `.` and `..` are rejected.
///
/// # Examples
///
/// ```
/// use kondukt_kafka::validate_topic;
///
/// assert!(validate_topic("orders.v1").is_ok());
/// assert!(validate_topic("orders v1").is_err());
/// ```
pub fn validate_topic(topic: &str) -> Result<()> {
    if topic.is_empty() {
        return Err(Error::validation_field("topic", "must not be empty"));
    }
    if topic == "." || topic == ".." {
        return Err(Error::validation_field(
            "topic",
            format!("'{topic}' is a reserved name"),
        ));
    }
    if topic.len() > MAX_TOPIC_LENGTH {
        return Err(Error::validation_field(
            "topic",
            format!(
                "name is {} characters long, the maximum is {MAX_TOPIC_LENGTH}",
                topic.len()
            ),
        ));
    }

    let valid = topic
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    if !valid {
        return Err(Error::validation_field(
            "topic",
            format!("'{topic}' contains characters outside [a-zA-Z0-9._-]"),
        ));
    }

    Ok(())
}
