use client::client::Client;
use color_eyre::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::debug;
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Flex, Layout, Position, Rect};
use ratatui::prelude::{Color, Masked, Modifier, Span, StatefulWidget, Style, Widget};
use ratatui::widgets::{Block, Paragraph};
use tui_input::backend::crossterm::EventHandler;
use tui_input::Input;
use types::domain::{FieldPatch, FormVariant, SignupRequest};

use crate::data::{highlight, OnKeyEvent, ScreenChange};

/// One control on the signup form, in no particular order; the visual
/// and focus order per variant lives in [`focus_order`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignupFocus {
    #[default]
    Firstname,
    Lastname,
    Email,
    Password,
    CountryCode,
    Phone,
    Gender,
    DateOfBirth,
    StreetAddress,
    Country,
    CurrentLocation,
    HomeTown,
    ZipPostalCode,
    PreferredWorkLocation,
    Internships,
    Jobs,
    Terms,
    Submit,
}

const STANDARD_ORDER: [SignupFocus; 18] = [
    SignupFocus::Firstname,
    SignupFocus::Lastname,
    SignupFocus::Email,
    SignupFocus::Password,
    SignupFocus::CountryCode,
    SignupFocus::Phone,
    SignupFocus::Gender,
    SignupFocus::DateOfBirth,
    SignupFocus::StreetAddress,
    SignupFocus::Country,
    SignupFocus::CurrentLocation,
    SignupFocus::HomeTown,
    SignupFocus::ZipPostalCode,
    SignupFocus::PreferredWorkLocation,
    SignupFocus::Internships,
    SignupFocus::Jobs,
    SignupFocus::Terms,
    SignupFocus::Submit,
];

const MINIMAL_ORDER: [SignupFocus; 15] = [
    SignupFocus::Firstname,
    SignupFocus::Lastname,
    SignupFocus::Email,
    SignupFocus::Password,
    SignupFocus::CountryCode,
    SignupFocus::Phone,
    SignupFocus::Gender,
    SignupFocus::DateOfBirth,
    SignupFocus::Country,
    SignupFocus::CurrentLocation,
    SignupFocus::HomeTown,
    SignupFocus::PreferredWorkLocation,
    SignupFocus::Internships,
    SignupFocus::Jobs,
    SignupFocus::Submit,
];

pub fn focus_order(variant: FormVariant) -> &'static [SignupFocus] {
    match variant {
        FormVariant::Standard => &STANDARD_ORDER,
        FormVariant::Minimal => &MINIMAL_ORDER,
    }
}

/// The labeled input grid, two fields per row.
fn grid_fields(variant: FormVariant) -> &'static [SignupFocus] {
    match variant {
        FormVariant::Standard => &STANDARD_ORDER[..14],
        FormVariant::Minimal => &MINIMAL_ORDER[..12],
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    Text,
    Select,
    Toggle,
    Button,
}

impl SignupFocus {
    fn kind(self) -> FieldKind {
        match self {
            SignupFocus::Gender => FieldKind::Select,
            SignupFocus::Internships | SignupFocus::Jobs | SignupFocus::Terms => FieldKind::Toggle,
            SignupFocus::Submit => FieldKind::Button,
            _ => FieldKind::Text,
        }
    }

    fn title(self) -> &'static str {
        match self {
            SignupFocus::Firstname => "First Name",
            SignupFocus::Lastname => "Last Name",
            SignupFocus::Email => "Email Address",
            SignupFocus::Password => "Password",
            SignupFocus::CountryCode => "Country Code",
            SignupFocus::Phone => "Phone Number",
            SignupFocus::Gender => "Gender",
            SignupFocus::DateOfBirth => "Date of Birth (YYYY-MM-DD)",
            SignupFocus::StreetAddress => "Street Address",
            SignupFocus::Country => "Country",
            SignupFocus::CurrentLocation => "State/Province",
            SignupFocus::HomeTown => "City",
            SignupFocus::ZipPostalCode => "ZIP/Postal Code",
            SignupFocus::PreferredWorkLocation => "Preferred Work Location",
            SignupFocus::Internships | SignupFocus::Jobs | SignupFocus::Terms
            | SignupFocus::Submit => "",
        }
    }
}

/// Outcome region of the form. Error and success are mutually
/// exclusive by construction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmitStatus {
    #[default]
    Idle,
    Error(String),
    Success(String),
}

#[derive(Debug)]
pub struct SignupScreenData {
    pub buffer: SignupRequest,
    variant: FormVariant,
    focus: SignupFocus,
    active_input: Input,
    loading: bool,
    status: SubmitStatus,
    show_password: bool,
    pub(crate) cursor_position: Option<Position>,
}

impl SignupScreenData {
    pub fn new(variant: FormVariant) -> Self {
        Self {
            buffer: variant.blank(),
            variant,
            focus: SignupFocus::default(),
            active_input: Input::default(),
            loading: false,
            status: SubmitStatus::default(),
            show_password: false,
            cursor_position: None,
        }
    }

    fn text_value(&self, field: SignupFocus) -> Option<&str> {
        let value = match field {
            SignupFocus::Firstname => &self.buffer.firstname,
            SignupFocus::Lastname => &self.buffer.lastname,
            SignupFocus::Email => &self.buffer.email,
            SignupFocus::Password => &self.buffer.password,
            SignupFocus::CountryCode => &self.buffer.country_code,
            SignupFocus::Phone => &self.buffer.phone,
            SignupFocus::DateOfBirth => &self.buffer.date_of_birth,
            SignupFocus::Country => &self.buffer.country,
            SignupFocus::CurrentLocation => &self.buffer.current_location,
            SignupFocus::HomeTown => &self.buffer.home_town,
            SignupFocus::PreferredWorkLocation => &self.buffer.preferred_work_location,
            SignupFocus::StreetAddress => return self.buffer.street_address.as_deref(),
            SignupFocus::ZipPostalCode => return self.buffer.zip_postal_code.as_deref(),
            _ => return None,
        };
        Some(value)
    }

    fn text_patch(field: SignupFocus, value: String) -> Option<FieldPatch> {
        let patch = match field {
            SignupFocus::Firstname => FieldPatch::Firstname(value),
            SignupFocus::Lastname => FieldPatch::Lastname(value),
            SignupFocus::Email => FieldPatch::Email(value),
            SignupFocus::Password => FieldPatch::Password(value),
            SignupFocus::CountryCode => FieldPatch::CountryCode(value),
            SignupFocus::Phone => FieldPatch::Phone(value),
            SignupFocus::DateOfBirth => FieldPatch::DateOfBirth(value),
            SignupFocus::Country => FieldPatch::Country(value),
            SignupFocus::CurrentLocation => FieldPatch::CurrentLocation(value),
            SignupFocus::HomeTown => FieldPatch::HomeTown(value),
            SignupFocus::PreferredWorkLocation => FieldPatch::PreferredWorkLocation(value),
            SignupFocus::StreetAddress => FieldPatch::StreetAddress(value),
            SignupFocus::ZipPostalCode => FieldPatch::ZipPostalCode(value),
            _ => return None,
        };
        Some(patch)
    }

    fn sync_active_input(&mut self) {
        self.active_input = match self.text_value(self.focus) {
            Some(value) => Input::new(value.to_string()),
            None => Input::default(),
        };
    }

    fn step_focus(&mut self, step: isize) {
        let order = focus_order(self.variant);
        let index = order
            .iter()
            .position(|field| *field == self.focus)
            .unwrap_or(0);
        let next = (index as isize + step).rem_euclid(order.len() as isize) as usize;
        self.focus = order[next];
        self.sync_active_input();
    }

    fn switch_focus(&mut self) {
        self.step_focus(1);
    }

    fn switch_focus_back(&mut self) {
        self.step_focus(-1);
    }

    pub(crate) fn handle_input_event(&mut self, key: KeyEvent) {
        match self.focus.kind() {
            FieldKind::Text => {
                self.active_input.handle_event(&Event::Key(key));
                if let Some(patch) =
                    Self::text_patch(self.focus, self.active_input.value().to_string())
                {
                    self.buffer.apply(patch);
                }
            }
            FieldKind::Select | FieldKind::Toggle => {
                if key.kind == KeyEventKind::Press && key.code == KeyCode::Char(' ') {
                    self.toggle();
                }
            }
            FieldKind::Button => {}
        }
    }

    fn toggle(&mut self) {
        let patch = match self.focus {
            SignupFocus::Gender => FieldPatch::Gender(self.buffer.gender.next()),
            SignupFocus::Internships => {
                FieldPatch::Internships(!self.buffer.career_preference_internships)
            }
            SignupFocus::Jobs => FieldPatch::Jobs(!self.buffer.career_preference_jobs),
            SignupFocus::Terms => {
                FieldPatch::TermsAgreement(!self.buffer.terms_agreement.unwrap_or(false))
            }
            _ => return,
        };
        self.buffer.apply(patch);
    }

    /// Runs one submission attempt. Local validation halts before the
    /// loading flag is raised; the flag drops again whatever the
    /// network outcome was.
    pub async fn submit(&mut self, client: &Client) {
        self.status = SubmitStatus::Idle;
        if let Err(error) = self.buffer.validate_for_submit() {
            self.status = SubmitStatus::Error(error.to_string());
            return;
        }
        self.loading = true;
        match client.signup(&self.buffer).await {
            Ok(message) => {
                debug!("signup accepted");
                self.status = SubmitStatus::Success(message);
                self.buffer = self.variant.blank();
                self.sync_active_input();
            }
            Err(error) => self.status = SubmitStatus::Error(error.to_string()),
        }
        self.loading = false;
    }

    async fn handle_enter(&mut self, client: &Client) {
        match self.focus.kind() {
            FieldKind::Button => self.submit(client).await,
            FieldKind::Select | FieldKind::Toggle => self.toggle(),
            FieldKind::Text => self.switch_focus(),
        }
    }
}

#[async_trait::async_trait]
impl OnKeyEvent for SignupScreenData {
    async fn on_key_event(&mut self, key: KeyEvent, client: &Client) -> Result<ScreenChange> {
        match (key.kind, key.modifiers, key.code) {
            (KeyEventKind::Press, KeyModifiers::NONE, KeyCode::Esc)
            | (KeyEventKind::Press, KeyModifiers::CONTROL, KeyCode::Char('c')) => {
                return Ok(ScreenChange::Quit)
            }
            (KeyEventKind::Press, KeyModifiers::NONE, KeyCode::Tab) => self.switch_focus(),
            (KeyEventKind::Press, _, KeyCode::BackTab) => self.switch_focus_back(),
            (KeyEventKind::Press, KeyModifiers::CONTROL, KeyCode::Char('p')) => {
                self.show_password = !self.show_password;
            }
            (KeyEventKind::Press, KeyModifiers::NONE, KeyCode::Enter) => {
                self.handle_enter(client).await
            }
            _ => self.handle_input_event(key),
        }
        Ok(ScreenChange::None)
    }
}

pub struct SignupFormWidget;

impl StatefulWidget for SignupFormWidget {
    type State = SignupScreenData;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        state.cursor_position = None;
        let fields = grid_fields(state.variant);
        let rows = fields.len() / 2;

        let mut constraints = vec![Constraint::Length(1)];
        constraints.extend(std::iter::repeat(Constraint::Length(3)).take(rows));
        constraints.push(Constraint::Length(3));
        if state.variant == FormVariant::Standard {
            constraints.push(Constraint::Length(3));
        }
        constraints.push(Constraint::Length(3));
        constraints.push(Constraint::Length(3));
        constraints.push(Constraint::Length(1));
        let areas = Layout::vertical(constraints).split(area);
        let mut next = 0;
        let mut take = move || {
            next += 1;
            areas[next - 1]
        };

        Paragraph::new("Create Student Account")
            .style(Style::default().add_modifier(Modifier::BOLD))
            .centered()
            .render(take(), buf);

        for pair in fields.chunks(2) {
            let [left, right] = split_pair(take());
            render_field(state, pair[0], left, buf);
            render_field(state, pair[1], right, buf);
        }

        let [internships, jobs] = split_pair(take());
        render_checkbox(
            "Internships",
            state.buffer.career_preference_internships,
            state.focus == SignupFocus::Internships,
            internships,
            buf,
        );
        render_checkbox(
            "Jobs",
            state.buffer.career_preference_jobs,
            state.focus == SignupFocus::Jobs,
            jobs,
            buf,
        );

        if state.variant == FormVariant::Standard {
            render_checkbox(
                "I agree to the Terms of Service and Privacy Policy",
                state.buffer.terms_agreement.unwrap_or(false),
                state.focus == SignupFocus::Terms,
                take(),
                buf,
            );
        }

        let [submit] = Layout::horizontal([Constraint::Length(26)])
            .flex(Flex::Center)
            .areas(take());
        let label = if state.loading {
            "Creating account..."
        } else {
            "Create Account"
        };
        let button = Paragraph::new(highlight(label, state.focus == SignupFocus::Submit))
            .centered()
            .block(Block::bordered());
        let button = if state.loading {
            button.style(Style::default().add_modifier(Modifier::DIM))
        } else {
            button
        };
        button.render(submit, buf);

        let message = take();
        match &state.status {
            SubmitStatus::Idle => {}
            SubmitStatus::Error(text) => {
                Paragraph::new(text.as_str())
                    .centered()
                    .style(Style::default().fg(Color::Red))
                    .block(Block::bordered().title("Error"))
                    .render(message, buf);
            }
            SubmitStatus::Success(text) => {
                Paragraph::new(text.as_str())
                    .centered()
                    .style(Style::default().fg(Color::Green))
                    .block(Block::bordered().title("Success"))
                    .render(message, buf);
            }
        }

        Paragraph::new(
            "Tab: next field | Space: toggle | Enter: select | Ctrl+P: show password | Esc: quit",
        )
        .style(Style::default().add_modifier(Modifier::ITALIC))
        .centered()
        .render(take(), buf);
    }
}

/// One two-column form row.
fn split_pair(area: Rect) -> [Rect; 2] {
    Layout::horizontal([Constraint::Percentage(50); 2]).areas(area)
}

fn render_field(state: &mut SignupScreenData, field: SignupFocus, area: Rect, buf: &mut Buffer) {
    let focused = state.focus == field;
    let mut block = Block::bordered().title(field.title());
    if focused {
        block = block.border_style(Style::default().fg(Color::LightBlue));
    }
    if field.kind() == FieldKind::Select {
        Paragraph::new(highlight(state.buffer.gender.label(), focused))
            .block(block)
            .render(area, buf);
        return;
    }
    let value = if focused {
        state.active_input.value()
    } else {
        state.text_value(field).unwrap_or_default()
    };
    if field == SignupFocus::Password && !state.show_password {
        let masked = Span::styled(Masked::new(value, '*'), Color::White);
        Paragraph::new(masked).block(block).render(area, buf);
    } else {
        Paragraph::new(value).block(block).render(area, buf);
    }
    if focused {
        let cursor = u16::try_from(state.active_input.visual_cursor()).unwrap_or(u16::MAX);
        state.cursor_position = Some(
            (
                area.x.saturating_add(cursor).saturating_add(1),
                area.y + 1,
            )
                .into(),
        );
    }
}

fn render_checkbox(label: &str, checked: bool, focused: bool, area: Rect, buf: &mut Buffer) {
    let text = format!("[{}] {}", if checked { "x" } else { " " }, label);
    Paragraph::new(highlight(text, focused))
        .centered()
        .block(Block::bordered())
        .render(area, buf);
}
