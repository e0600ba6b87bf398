//! Keyboard edits applied to a single field value

use crate::i18n::Translator;
use crate::wizard::{FieldDef, FieldKind, FieldValue};

const MASK_CHAR: char = '•';

/// One keyboard edit on the focused field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldEdit {
    Char(char),
    Backspace,
    /// Space on a checkbox or choice: toggle / select the next option
    Activate,
    /// Select the previous option of a choice
    ActivateBack,
}

fn cycle(options: &[&'static str], current: Option<&str>, forward: bool) -> Option<String> {
    if options.is_empty() {
        return None;
    }
    let position = current.and_then(|c| options.iter().position(|o| *o == c));
    let next = match (position, forward) {
        (None, true) => 0,
        (None, false) => options.len() - 1,
        (Some(i), true) => (i + 1) % options.len(),
        (Some(0), false) => options.len() - 1,
        (Some(i), false) => i - 1,
    };
    Some(options[next].to_string())
}

/// New value of the field after `edit`, or `None` if the edit does not apply
pub fn apply_edit(field: &FieldDef, current: &FieldValue, edit: FieldEdit) -> Option<FieldValue> {
    match (&field.kind, edit) {
        (FieldKind::Text | FieldKind::Secret, FieldEdit::Char(c)) => {
            let mut text = current.as_text().to_string();
            text.push(c);
            Some(FieldValue::Text(text))
        }
        (FieldKind::Text | FieldKind::Secret, FieldEdit::Backspace) => {
            let mut text = current.as_text().to_string();
            text.pop().map(|_| FieldValue::Text(text))
        }
        (FieldKind::Flag, FieldEdit::Activate | FieldEdit::ActivateBack | FieldEdit::Char(' ')) => {
            Some(FieldValue::Flag(!current.as_flag()))
        }
        (FieldKind::Choice(options), FieldEdit::Activate | FieldEdit::Char(' ')) => {
            Some(FieldValue::Choice(cycle(options, current.as_choice(), true)))
        }
        (FieldKind::Choice(options), FieldEdit::ActivateBack) => {
            Some(FieldValue::Choice(cycle(options, current.as_choice(), false)))
        }
        (FieldKind::Choice(_), FieldEdit::Backspace) if current.as_choice().is_some() => {
            Some(FieldValue::Choice(None))
        }
        _ => None,
    }
}

/// Text shown inside the field's input widget
pub fn input_display(field: &FieldDef, value: &FieldValue, translator: &Translator) -> String {
    match (&field.kind, value) {
        (FieldKind::Secret, _) => MASK_CHAR.to_string().repeat(value.as_text().chars().count()),
        (_, FieldValue::Flag(checked)) => {
            let mark = if *checked { "[x]" } else { "[ ]" };
            format!("{mark} {}", translator.t(field.label_key))
        }
        (_, FieldValue::Choice(Some(option))) => {
            let key = format!("choice.{option}");
            format!("< {} >", translator.t(&key))
        }
        (_, FieldValue::Choice(None)) => translator.t("ui.choose").to_string(),
        (_, FieldValue::Text(text)) => text.clone(),
    }
}
