use std::time::Duration;

pub const TOAST_DURATION: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
}

/// Visible toasts, oldest first. Each one is dismissed after
/// [`TOAST_DURATION`] by whoever owns the timer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Toasts {
    next_id: u64,
    items: Vec<Toast>,
}

impl Toasts {
    pub fn push(&mut self, kind: ToastKind, message: impl Into<String>) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.items.push(Toast {
            id,
            kind,
            message: message.into(),
        });
        id
    }

    pub fn dismiss(&mut self, id: u64) {
        self.items.retain(|t| t.id != id);
    }

    pub fn items(&self) -> &[Toast] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_dismiss_is_targeted() {
        let mut toasts = Toasts::default();
        let a = toasts.push(ToastKind::Success, "Answer created successfully");
        let b = toasts.push(ToastKind::Error, "Failed to fetch answers");
        assert_ne!(a, b);

        toasts.dismiss(a);
        assert_eq!(toasts.items().len(), 1);
        assert_eq!(toasts.items()[0].kind, ToastKind::Error);

        toasts.dismiss(a);
        toasts.dismiss(b);
        assert!(toasts.is_empty());

        let c = toasts.push(ToastKind::Info, "x");
        assert!(c > b);
    }
}
