use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::{FieldKind, FieldSpec, FormValues};
use crate::tui::app::{App, FormState, draft_mut};
use crate::util::text::{clamp_cursor, next_grapheme_boundary, prev_grapheme_boundary};

pub(super) fn handle_form(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('s') if ctrl => app.submit_form(),
        KeyCode::Esc => app.close_form(),
        KeyCode::Tab | KeyCode::Down => move_field(app, true),
        KeyCode::BackTab | KeyCode::Up => move_field(app, false),
        _ => edit_field(app, key),
    }
}

/// Select the next or previous field, wrapping, with the cursor at the end
/// of its text.
fn move_field(app: &mut App, forward: bool) {
    let App { form, shell, .. } = app;
    let Some(form) = form.as_mut() else {
        return;
    };
    let count = form.fields.len();
    if count == 0 {
        return;
    }
    form.field = if forward {
        (form.field + 1) % count
    } else {
        (form.field + count - 1) % count
    };
    let name = form.fields[form.field].name;
    form.cursor = draft_mut(shell, form.target)
        .and_then(|draft| draft.get(name).map(str::len))
        .unwrap_or(0);
}

fn edit_field(app: &mut App, key: KeyEvent) {
    let Some(spec) = app.form.as_ref().and_then(|f| f.selected()).copied() else {
        return;
    };
    if key.code == KeyCode::Enter
        && matches!(spec.kind, FieldKind::Text | FieldKind::Date | FieldKind::DateTime)
    {
        move_field(app, true);
        return;
    }
    let App { form, shell, .. } = app;
    let Some(form) = form.as_mut() else {
        return;
    };
    let Some(draft) = draft_mut(shell, form.target) else {
        return;
    };
    match spec.kind {
        FieldKind::Checkbox => {
            if matches!(key.code, KeyCode::Char(' ') | KeyCode::Enter) {
                let checked = draft.is_checked(spec.name);
                draft.set_checked(spec.name, !checked);
            }
        }
        FieldKind::Scale => edit_scale(draft, &spec, key),
        FieldKind::Multiline if key.code == KeyCode::Enter => {
            insert(draft, form, &spec, "\n");
        }
        _ => edit_text(draft, form, &spec, key),
    }
}

/// `←/→` step through 1-5 with wraparound; a digit picks directly.
fn edit_scale(draft: &mut FormValues, spec: &FieldSpec, key: KeyEvent) {
    let current: u8 = draft
        .get(spec.name)
        .and_then(|v| v.trim().parse().ok())
        .filter(|v| (1..=5).contains(v))
        .unwrap_or(1);
    let next = match key.code {
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(' ') => current % 5 + 1,
        KeyCode::Left | KeyCode::Char('h') => (current + 3) % 5 + 1,
        KeyCode::Char(c @ '1'..='5') => c as u8 - b'0',
        _ => return,
    };
    draft.set(spec.name, next.to_string());
}

fn edit_text(draft: &mut FormValues, form: &mut FormState, spec: &FieldSpec, key: KeyEvent) {
    if draft.get(spec.name).is_none() {
        draft.set(spec.name, "");
    }
    let Some(value) = draft.get_mut(spec.name) else {
        return;
    };
    let cursor = clamp_cursor(value, form.cursor);
    match key.code {
        KeyCode::Char(c)
            if !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            value.insert(cursor, c);
            form.cursor = cursor + c.len_utf8();
        }
        KeyCode::Backspace => {
            if let Some(prev) = prev_grapheme_boundary(value, cursor) {
                value.replace_range(prev..cursor, "");
                form.cursor = prev;
            }
        }
        KeyCode::Delete => {
            if let Some(next) = next_grapheme_boundary(value, cursor) {
                value.replace_range(cursor..next, "");
            }
        }
        KeyCode::Left => form.cursor = prev_grapheme_boundary(value, cursor).unwrap_or(cursor),
        KeyCode::Right => form.cursor = next_grapheme_boundary(value, cursor).unwrap_or(cursor),
        KeyCode::Home => form.cursor = 0,
        KeyCode::End => form.cursor = value.len(),
        _ => {}
    }
}

fn insert(draft: &mut FormValues, form: &mut FormState, spec: &FieldSpec, text: &str) {
    if draft.get(spec.name).is_none() {
        draft.set(spec.name, "");
    }
    if let Some(value) = draft.get_mut(spec.name) {
        let cursor = clamp_cursor(value, form.cursor);
        value.insert_str(cursor, text);
        form.cursor = cursor + text.len();
    }
}
