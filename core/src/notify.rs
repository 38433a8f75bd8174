/// A transient, user-visible error notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub title: String,
    pub description: String,
}

impl Toast {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }

    /// Shown whenever an assistant request fails, whatever the cause.
    pub fn request_failed() -> Self {
        Self::new("Error", "Failed to get a response. Please try again.")
    }
}

/// The notification surface the widget reports failures to.
pub trait Notifier {
    fn notify(&self, toast: Toast);
}
