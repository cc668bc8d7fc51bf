//! Transient wrong-guess feedback line.

/// Display state of the feedback line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    /// Nothing to show.
    #[default]
    Hidden,
    /// Fully visible.
    Visible,
    /// Fading out; the text is still set until cleared.
    Fading,
}

/// The line under the prompt that names a wrongly clicked region.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Feedback {
    text: Option<String>,
    visibility: Visibility,
}

impl Feedback {
    /// Show new text, replacing whatever was there.
    pub fn show(&mut self, text: String) {
        self.text = Some(text);
        self.visibility = Visibility::Visible;
    }

    /// Start fading; the text stays until [`clear`](Self::clear).
    pub fn fade(&mut self) {
        if self.text.is_some() {
            self.visibility = Visibility::Fading;
        }
    }

    /// Remove the text.
    pub fn clear(&mut self) {
        self.text = None;
        self.visibility = Visibility::Hidden;
    }

    /// Current text.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Current visibility.
    #[must_use]
    pub const fn visibility(&self) -> Visibility {
        self.visibility
    }
}
