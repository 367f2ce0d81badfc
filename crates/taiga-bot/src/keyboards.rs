//! Inline keyboards for the anime announcement flow.

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use taiga_core::session::Quality;

use crate::format::AnnouncementKind;

/// Quality picker, one option per row.
pub fn quality_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(
        Quality::ALL
            .iter()
            .map(|quality| {
                vec![InlineKeyboardButton::callback(
                    quality.label(),
                    quality.callback_data(),
                )]
            })
            .collect::<Vec<_>>(),
    )
}

/// Announcement layout picker, one option per row.
pub fn format_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(
        AnnouncementKind::ALL
            .iter()
            .map(|kind| vec![InlineKeyboardButton::callback(kind.label(), kind.callback_data())])
            .collect::<Vec<_>>(),
    )
}
