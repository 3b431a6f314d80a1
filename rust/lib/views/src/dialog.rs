//! Modal dialog state shared by every page.
//!
//! The confirm callback is a view-specific action value; the view runs it
//! when the dialog is confirmed via [`Dialog::take_confirmed`].

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogKind {
    Success,
    Error,
    #[default]
    Info,
    Warning,
    Confirm,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dialog<A> {
    pub open: bool,
    pub title: String,
    pub message: String,
    pub kind: DialogKind,
    confirm_text: Option<String>,
    cancel_text: Option<String>,
    on_confirm: Option<A>,
}

impl<A> Default for Dialog<A> {
    fn default() -> Self {
        Self {
            open: false,
            title: String::new(),
            message: String::new(),
            kind: DialogKind::Info,
            confirm_text: None,
            cancel_text: None,
            on_confirm: None,
        }
    }
}

impl<A> Dialog<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a dialog with no confirm action.
    pub fn show(&mut self, title: impl Into<String>, message: impl Into<String>, kind: DialogKind) {
        self.open_with(title.into(), message.into(), kind, None);
    }

    /// Open a dialog whose confirm button runs `action`.
    pub fn show_then(
        &mut self,
        title: impl Into<String>,
        message: impl Into<String>,
        kind: DialogKind,
        action: A,
    ) {
        self.open_with(title.into(), message.into(), kind, Some(action));
    }

    pub fn confirm(&mut self, title: impl Into<String>, message: impl Into<String>, action: A) {
        self.show_then(title, message, DialogKind::Confirm, action);
    }

    /// Override button text on the open dialog.
    pub fn with_labels(&mut self, confirm: impl Into<String>, cancel: impl Into<String>) -> &mut Self {
        self.confirm_text = Some(confirm.into());
        self.cancel_text = Some(cancel.into());
        self
    }

    fn open_with(&mut self, title: String, message: String, kind: DialogKind, action: Option<A>) {
        self.open = true;
        self.title = title;
        self.message = message;
        self.kind = kind;
        self.confirm_text = None;
        self.cancel_text = None;
        self.on_confirm = action;
    }

    /// Dismiss without running the pending action.
    pub fn close(&mut self) {
        self.open = false;
        self.on_confirm = None;
    }

    /// Close and hand back the pending action, if any.
    pub fn take_confirmed(&mut self) -> Option<A> {
        self.open = false;
        self.on_confirm.take()
    }

    pub fn pending(&self) -> Option<&A> {
        self.on_confirm.as_ref()
    }

    pub fn confirm_label(&self) -> &str {
        match (&self.confirm_text, self.kind) {
            (Some(text), _) => text,
            (None, DialogKind::Confirm) => "Confirm",
            (None, _) => "OK",
        }
    }

    pub fn cancel_label(&self) -> &str {
        self.cancel_text.as_deref().unwrap_or("Cancel")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_labels_follow_kind() {
        let mut d: Dialog<()> = Dialog::new();
        d.show("Saved", "Done", DialogKind::Success);
        assert_eq!(d.confirm_label(), "OK");
        assert_eq!(d.cancel_label(), "Cancel");

        d.confirm("Delete?", "Sure?", ());
        assert_eq!(d.confirm_label(), "Confirm");

        d.with_labels("Yes, delete", "Keep");
        assert_eq!(d.confirm_label(), "Yes, delete");
        assert_eq!(d.cancel_label(), "Keep");
    }

    #[test]
    fn take_confirmed_returns_action_once() {
        let mut d = Dialog::new();
        d.confirm("Delete User?", "Sure?", 42);
        assert!(d.open);
        assert_eq!(d.take_confirmed(), Some(42));
        assert!(!d.open);
        assert_eq!(d.take_confirmed(), None);
    }

    #[test]
    fn close_discards_action() {
        let mut d = Dialog::new();
        d.confirm("Delete User?", "Sure?", 7);
        d.close();
        assert!(!d.open);
        assert_eq!(d.pending(), None);
        assert_eq!(d.title, "Delete User?");
    }

    #[test]
    fn new_dialog_resets_labels() {
        let mut d: Dialog<()> = Dialog::new();
        d.confirm("a", "b", ());
        d.with_labels("x", "y");
        d.show("c", "d", DialogKind::Error);
        assert_eq!(d.confirm_label(), "OK");
        assert_eq!(d.cancel_label(), "Cancel");
        assert!(d.pending().is_none());
    }
}
