//! Business justification built from labelled answer fragments.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A labelled follow-up answer.
#[derive(Debug, Clone)]
struct FollowUp {
    label: String,
    text: String,
}

/// Business justification, rendered once on serialization.
///
/// The unlabelled business justification comes first; follow-up answers are
/// appended with their label and rendered as `"{justification} - {label}: {answer}"`.
/// A deserialized justification holds the rendered text as its primary
/// answer, so equality is defined on the rendered text.
#[derive(Debug, Clone, Default)]
pub struct Justification {
    primary: Option<String>,
    follow_ups: Vec<FollowUp>,
}

impl Justification {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the business justification answer, replacing any earlier one.
    pub fn set_primary(&mut self, text: impl Into<String>) {
        self.primary = Some(text.into());
    }

    /// Appends a labelled follow-up answer.
    pub fn push_labelled(&mut self, label: impl Into<String>, text: impl Into<String>) {
        self.follow_ups.push(FollowUp {
            label: label.into(),
            text: text.into(),
        });
    }

    /// Joins the fragments into the submitted text.
    pub fn render(&self) -> String {
        let mut rendered = self.primary.clone().unwrap_or_default();
        for follow_up in &self.follow_ups {
            rendered.push_str(&format!(" - {}: {}", follow_up.label, follow_up.text));
        }
        rendered
    }
}

impl PartialEq for Justification {
    fn eq(&self, other: &Self) -> bool {
        self.render() == other.render()
    }
}

impl Eq for Justification {}

impl Serialize for Justification {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.render())
    }
}

impl<'de> Deserialize<'de> for Justification {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let rendered = String::deserialize(deserializer)?;
        let mut justification = Justification::new();
        if !rendered.is_empty() {
            justification.set_primary(rendered);
        }
        Ok(justification)
    }
}
