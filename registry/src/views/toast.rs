use serde::Serialize;
use strum::Display;

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
}

/// Transient notification shown above a view
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Toast {
            kind: ToastKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Toast {
            kind: ToastKind::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == ToastKind::Error
    }
}
