use maud::{html, Markup};
use service::inline_edit::{EditSession, FieldBinding, FieldKind, FieldView};

/// Renders bound text fields according to edit mode and per-field state.
pub struct EditCtx<'a> {
    pub session: &'a EditSession,
    pub on: bool,
    pub return_to: &'a str,
}

impl<'a> EditCtx<'a> {
    pub fn new(session: &'a EditSession, return_to: &'a str) -> Self {
        Self { session, on: session.mode().is_on(), return_to }
    }

    /// `persisted` is the value just read from the store.
    pub fn text(&self, binding: &FieldBinding, persisted: &str) -> Markup {
        let field = self.session.snapshot(binding, persisted);
        let key = binding.to_string();
        let kind = field.kind();
        match field.view(self.on) {
            FieldView::Locked(text) => plain(kind, text),
            FieldView::Display(text) => html! {
                span.editable data-binding=(key) {
                    (plain(kind, text))
                    form.inline-activate method="post" action="/inline/activate" {
                        input type="hidden" name="binding" value=(key);
                        input type="hidden" name="return_to" value=(self.return_to);
                        button type="submit" title="Редактировать" { "✎" }
                    }
                }
            },
            FieldView::Editing(draft) => html! {
                form.inline-editor method="post" action="/inline/commit" data-binding=(key) {
                    input type="hidden" name="binding" value=(key);
                    input type="hidden" name="return_to" value=(self.return_to);
                    @match kind {
                        FieldKind::SingleLine => {
                            input type="text" name="value" value=(draft) autofocus;
                        }
                        FieldKind::MultiLine => {
                            textarea name="value" rows="4" autofocus { (draft) }
                        }
                    }
                    button type="submit" title="Сохранить" { "✓" }
                    button type="submit" formaction="/inline/cancel" title="Отмена" { "✕" }
                }
            },
        }
    }
}

/// Multi-line text keeps its line breaks.
fn plain(kind: FieldKind, text: &str) -> Markup {
    match kind {
        FieldKind::SingleLine => html! { (text) },
        FieldKind::MultiLine => html! {
            @for (i, line) in text.lines().enumerate() {
                @if i > 0 { br; }
                (line)
            }
        },
    }
}
