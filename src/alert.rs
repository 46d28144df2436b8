//! Alert messages for success and error feedback on HTMX endpoints.
//!
//! Alerts are rendered into the fixed alert container in the base layout via
//! an out-of-band swap.

use maud::{Markup, html};

/// Alert message types for styling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Success,
    Error,
}

/// A dismissible alert message.
#[derive(Debug, Clone)]
pub struct AlertView<'a> {
    pub kind: AlertKind,
    pub message: &'a str,
    pub details: &'a str,
}

impl<'a> AlertView<'a> {
    /// Create a new success alert
    pub fn success(message: &'a str, details: &'a str) -> Markup {
        Self {
            kind: AlertKind::Success,
            message,
            details,
        }
        .into_html()
    }

    /// Create a new error alert
    pub fn error(message: &'a str, details: &'a str) -> Markup {
        Self {
            kind: AlertKind::Error,
            message,
            details,
        }
        .into_html()
    }

    fn into_html(self) -> Markup {
        let container_class = match self.kind {
            AlertKind::Success => {
                "p-4 mb-4 rounded-lg border text-green-800 bg-green-50 border-green-300 \
                dark:bg-gray-800 dark:text-green-400 dark:border-green-800"
            }
            AlertKind::Error => {
                "p-4 mb-4 rounded-lg border text-red-800 bg-red-50 border-red-300 \
                dark:bg-gray-800 dark:text-red-400 dark:border-red-800"
            }
        };

        html! {
            div id="alert-container" hx-swap-oob="true" class="w-full max-w-md px-4"
                style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
            {
                div class=(container_class) role="alert"
                {
                    p class="font-medium" { (self.message) }

                    @if !self.details.is_empty() {
                        p class="text-sm" { (self.details) }
                    }
                }
            }
        }
    }
}
