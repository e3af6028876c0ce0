use std::time::Duration;

use client::client::Client;
use color_eyre::Result;
use crossterm::event::{self, Event};
use ratatui::layout::{Constraint, Flex, Layout};
use ratatui::{DefaultTerminal, Frame};
use types::domain::FormVariant;

use crate::data::{OnKeyEvent, ScreenChange};
use crate::signup::{SignupFormWidget, SignupScreenData};

pub struct App {
    /// Is the application running?
    running: bool,
    client: Client,
    screen: SignupScreenData,
}

impl Default for App {
    fn default() -> Self {
        Self::new(FormVariant::default())
    }
}

impl App {
    /// Construct a new instance of [`App`].
    pub fn new(variant: FormVariant) -> Self {
        Self {
            running: true,
            client: Client::new(),
            screen: SignupScreenData::new(variant),
        }
    }

    /// Run the application's main loop.
    pub async fn run(mut self, mut terminal: DefaultTerminal) -> Result<()> {
        self.running = true;
        while self.running {
            terminal.draw(|frame| self.draw(frame))?;
            self.handle_crossterm_events().await?;
        }
        Ok(())
    }

    /// Renders the user interface.
    fn draw(&mut self, frame: &mut Frame) {
        let [area] = Layout::horizontal([Constraint::Max(90)])
            .flex(Flex::Center)
            .areas(frame.area());
        frame.render_stateful_widget(SignupFormWidget, area, &mut self.screen);
        if let Some(position) = self.screen.cursor_position {
            frame.set_cursor_position(position);
        }
    }

    /// Reads the crossterm events and updates the state of [`App`].
    async fn handle_crossterm_events(&mut self) -> Result<()> {
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key_event) = event::read()? {
                match self.screen.on_key_event(key_event, &self.client).await? {
                    ScreenChange::Quit => self.running = false,
                    ScreenChange::None => {}
                }
            }
        }
        Ok(())
    }
}
