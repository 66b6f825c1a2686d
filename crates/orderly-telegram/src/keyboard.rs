// SPDX-FileCopyrightText: 2026 Orderly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inline keyboard conversion.

use orderly_core::types::Keyboard;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

pub fn to_markup(keyboard: &Keyboard) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(keyboard.rows.iter().map(|row| {
        row.iter()
            .map(|b| InlineKeyboardButton::callback(b.label.clone(), b.data.clone()))
            .collect::<Vec<_>>()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use orderly_core::types::KeyboardButton;
    use teloxide::types::InlineKeyboardButtonKind;

    #[test]
    fn rows_and_payloads_are_preserved() {
        let keyboard = Keyboard::row([
            KeyboardButton::new("✏️ Modifica", "edit_prompt:3"),
            KeyboardButton::new("🗑️ Elimina", "delete:3"),
        ]);
        let markup = to_markup(&keyboard);
        assert_eq!(markup.inline_keyboard.len(), 1);
        assert_eq!(markup.inline_keyboard[0].len(), 2);
        let button = &markup.inline_keyboard[0][1];
        assert_eq!(button.text, "🗑️ Elimina");
        assert!(matches!(
            &button.kind,
            InlineKeyboardButtonKind::CallbackData(data) if data == "delete:3"
        ));
    }
}
