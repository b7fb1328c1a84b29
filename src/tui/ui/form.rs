//! Health data entry form.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use zeroize::Zeroize;

use crate::domain::{FieldSpec, HealthField, HealthRecord, ValidationError, FEATURE_COUNT, FIELD_SPECS};
use crate::tui::styles::CheckupTheme;

/// One editable field.
#[derive(Debug, Clone)]
pub struct FormField {
    pub spec: &'static FieldSpec,
    pub value: String,
    /// Set when the last submission rejected this field
    pub invalid: bool,
}

impl FormField {
    fn hint(&self) -> String {
        if self.spec.integer {
            format!("{}-{}", self.spec.min, self.spec.max)
        } else {
            format!("{:.1}-{:.1}", self.spec.min, self.spec.max)
        }
    }
}

fn default_text(spec: &FieldSpec) -> String {
    if spec.integer {
        format!("{}", spec.default as i64)
    } else {
        format!("{}", spec.default)
    }
}

/// Checkup form state
pub struct CheckupFormState {
    pub fields: Vec<FormField>,
    pub selected_field: usize,
    pub error_message: Option<String>,
}

impl Default for CheckupFormState {
    fn default() -> Self {
        Self {
            fields: FIELD_SPECS
                .iter()
                .map(|spec| FormField {
                    spec,
                    value: default_text(spec),
                    invalid: false,
                })
                .collect(),
            selected_field: 0,
            error_message: None,
        }
    }
}

impl CheckupFormState {
    pub fn next_field(&mut self) {
        self.selected_field = (self.selected_field + 1) % self.fields.len();
    }

    pub fn prev_field(&mut self) {
        if self.selected_field == 0 {
            self.selected_field = self.fields.len() - 1;
        } else {
            self.selected_field -= 1;
        }
    }

    /// Digits everywhere; a decimal point only in fractional fields.
    pub fn input_char(&mut self, c: char) {
        let field = &mut self.fields[self.selected_field];
        let accepted = c.is_ascii_digit() || (c == '.' && !field.spec.integer && !field.value.contains('.'));
        if accepted {
            field.value.push(c);
            field.invalid = false;
            self.error_message = None;
        }
    }

    pub fn delete_char(&mut self) {
        self.fields[self.selected_field].value.pop();
    }

    pub fn clear_field(&mut self) {
        self.fields[self.selected_field].value.zeroize();
    }

    /// Wipe every buffer and refill with the form defaults.
    pub fn restore_defaults(&mut self) {
        self.wipe();
        *self = Self::default();
    }

    fn wipe(&mut self) {
        for field in &mut self.fields {
            field.value.zeroize();
        }
        self.error_message = None;
    }

    /// Parse and validate the current values.
    ///
    /// On failure the offending fields are flagged and the message is kept
    /// for the footer.
    pub fn to_record(&mut self) -> Result<HealthRecord, ValidationError> {
        let mut values = [""; FEATURE_COUNT];
        for (slot, field) in values.iter_mut().zip(&self.fields) {
            *slot = field.value.as_str();
        }

        let result = HealthRecord::from_text(values);
        for field in &mut self.fields {
            field.invalid = false;
        }
        match &result {
            Ok(_) => self.error_message = None,
            Err(e) => {
                for issue in &e.issues {
                    self.fields[issue.field().index()].invalid = true;
                }
                self.error_message = Some(e.to_string());
            }
        }
        result
    }

    #[must_use]
    pub fn selected(&self) -> HealthField {
        self.fields[self.selected_field].spec.field
    }
}

impl Drop for CheckupFormState {
    fn drop(&mut self) {
        self.wipe();
    }
}

/// Render the checkup form
pub fn render_form(f: &mut Frame, area: Rect, state: &CheckupFormState, voice_ready: bool) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Title + welcome
            Constraint::Min(0),    // Fields
            Constraint::Length(3), // Footer/error
        ])
        .split(area);

    render_form_header(f, chunks[0]);
    render_form_fields(f, chunks[1], state);
    render_form_footer(f, chunks[2], state, voice_ready);
}

fn render_form_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(vec![
        Line::from(vec![
            Span::styled(" Diabetes Checkup ", CheckupTheme::header()),
            Span::styled(" │ Enter Your Health Data:", CheckupTheme::text_secondary()),
        ]),
        Line::from(Span::styled(
            "Welcome to the Diabetes Checkup app. Enter your health data below and press Enter to get a quick prediction.",
            CheckupTheme::text_muted(),
        )),
    ])
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(CheckupTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_form_fields(f: &mut Frame, area: Rect, state: &CheckupFormState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .margin(1)
        .split(area);

    let mid = state.fields.len().div_ceil(2);

    let selected = state.selected();
    render_field_column(f, columns[0], &state.fields[..mid], selected);
    render_field_column(f, columns[1], &state.fields[mid..], selected);
}

fn render_field_column(
    f: &mut Frame,
    area: Rect,
    fields: &[FormField],
    selected: HealthField,
) {
    let constraints: Vec<Constraint> = fields
        .iter()
        .map(|_| Constraint::Length(3))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (i, field) in fields.iter().enumerate() {
        let is_selected = field.spec.field == selected;
        let border_style = if field.invalid {
            CheckupTheme::danger()
        } else if is_selected {
            CheckupTheme::border_focused()
        } else {
            CheckupTheme::border()
        };
        let title_style = if is_selected {
            CheckupTheme::selected()
        } else {
            CheckupTheme::text_secondary()
        };

        let block = Block::default()
            .title(Span::styled(format!(" {} ", field.spec.label), title_style))
            .title_bottom(Span::styled(format!(" {} ", field.hint()), CheckupTheme::text_muted()))
            .borders(Borders::ALL)
            .border_style(border_style);

        let content = Paragraph::new(Line::from(vec![
            Span::raw(" "),
            Span::styled(field.value.as_str(), CheckupTheme::text()),
            if is_selected {
                Span::styled("▌", CheckupTheme::cursor())
            } else {
                Span::raw("")
            },
        ]))
        .block(block);

        f.render_widget(content, chunks[i]);
    }
}

fn render_form_footer(f: &mut Frame, area: Rect, state: &CheckupFormState, voice_ready: bool) {
    let content = if let Some(err) = &state.error_message {
        Line::from(vec![
            Span::styled("! ", CheckupTheme::danger()),
            Span::styled(err.as_str(), CheckupTheme::danger()),
        ])
    } else {
        let mut spans = vec![
            Span::styled("[↑↓/Tab] ", CheckupTheme::key_hint()),
            Span::styled("Navigate ", CheckupTheme::key_desc()),
            Span::styled("[Enter] ", CheckupTheme::key_hint()),
            Span::styled("Check ", CheckupTheme::key_desc()),
        ];
        if voice_ready {
            spans.push(Span::styled("[V] ", CheckupTheme::key_hint()));
            spans.push(Span::styled("Voice Command ", CheckupTheme::key_desc()));
        }
        spans.extend([
            Span::styled("[D] ", CheckupTheme::key_hint()),
            Span::styled("Defaults ", CheckupTheme::key_desc()),
            Span::styled("[Q] ", CheckupTheme::key_hint()),
            Span::styled("Quit", CheckupTheme::key_desc()),
        ]);
        Line::from(spans)
    };

    let footer = Paragraph::new(content)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(CheckupTheme::border()),
        );

    f.render_widget(footer, area);
}
