use std::io::{self, Stdout, Write};

use anyhow::{Context, Result};
use crossterm::event::{Event as TermEvent, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::{Attribute, Print, SetAttribute};
use crossterm::{cursor, queue, terminal};
use futures::StreamExt;
use ovalguide_search::{
    build_service, DropdownView, Event, Key, Route, SearchConfig, SearchSession, SearchState,
};
use tracing::info;

const PROMPT: &str = "Search professors or classes › ";

/// What a terminal key press means for the search box
#[derive(Debug)]
enum Action {
    Dispatch(Event),
    Quit,
    Ignore,
}

/// Raw mode for the lifetime of the guard
struct RawTerminal {
    stdout: Stdout,
}

impl RawTerminal {
    fn enter() -> Result<Self> {
        terminal::enable_raw_mode().context("Failed to enable raw mode")?;
        Ok(Self {
            stdout: io::stdout(),
        })
    }
}

impl Drop for RawTerminal {
    fn drop(&mut self) {
        let _ = queue!(
            self.stdout,
            cursor::MoveToColumn(0),
            terminal::Clear(terminal::ClearType::FromCursorDown)
        );
        let _ = self.stdout.flush();
        let _ = terminal::disable_raw_mode();
    }
}

/// Type-ahead search loop; prints the chosen route on exit
pub async fn execute(config: &SearchConfig) -> Result<()> {
    let service = build_service(config)?;
    let mut session = SearchSession::from_config(service, config);
    let mut input = String::new();
    let mut chosen: Option<Route> = None;

    info!(endpoint = config.api_url.as_str(), "Starting interactive search");

    {
        let mut term = RawTerminal::enter()?;
        let mut keys = EventStream::new();
        draw(&mut term.stdout, &input, session.state())?;

        loop {
            tokio::select! {
                key = keys.next() => {
                    let Some(key) = key else { break };
                    let action = match key.context("Failed to read terminal event")? {
                        TermEvent::Key(key) => translate(key, &mut input, session.state()),
                        _ => Action::Ignore,
                    };
                    match action {
                        Action::Dispatch(event) => {
                            if let Some(route) = session.dispatch(event) {
                                chosen = Some(route);
                                break;
                            }
                        }
                        Action::Quit => break,
                        Action::Ignore => continue,
                    }
                }
                Some(event) = session.next_event() => {
                    if let Some(route) = session.dispatch(event) {
                        chosen = Some(route);
                        break;
                    }
                }
            }

            draw(&mut term.stdout, &input, session.state())?;
        }
    }

    session.shutdown();

    if let Some(route) = chosen {
        println!("{}", route);
    }

    Ok(())
}

fn translate(key: KeyEvent, input: &mut String, state: &SearchState) -> Action {
    if key.kind != KeyEventKind::Press {
        return Action::Ignore;
    }

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
        KeyCode::Char(_) if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            Action::Ignore
        }
        KeyCode::Char(c) => {
            input.push(c);
            Action::Dispatch(Event::Input(input.clone()))
        }
        KeyCode::Backspace => {
            if input.pop().is_none() {
                return Action::Ignore;
            }
            Action::Dispatch(Event::Input(input.clone()))
        }
        KeyCode::Down => Action::Dispatch(Event::Key(Key::Down)),
        KeyCode::Up => Action::Dispatch(Event::Key(Key::Up)),
        KeyCode::Enter => Action::Dispatch(Event::Key(Key::Enter)),
        KeyCode::Tab => Action::Dispatch(Event::Focus),
        KeyCode::Esc if state.is_open() => Action::Dispatch(Event::Key(Key::Escape)),
        KeyCode::Esc => Action::Quit,
        _ => Action::Ignore,
    }
}

/// Redraw the input line and the dropdown below it, leaving the cursor after the input
fn draw(out: &mut impl Write, input: &str, state: &SearchState) -> Result<()> {
    let view = DropdownView::from_state(state);

    queue!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(terminal::ClearType::FromCursorDown),
        Print(PROMPT),
        Print(input),
        Print(format!("   [{}]", view.button_label)),
    )?;

    let mut lines: u16 = 0;
    if view.visible {
        if let Some(text) = view.empty_text {
            queue!(out, Print("\r\n    "), Print(text))?;
            lines += 1;
        }
        for row in &view.rows {
            let marker = if row.active { "›" } else { " " };
            if row.active {
                queue!(out, SetAttribute(Attribute::Reverse))?;
            }
            queue!(out, Print(format!("\r\n  {} {}", marker, row.title)))?;
            if let Some(ref badge) = row.badge {
                queue!(out, Print(format!("  ({})", badge)))?;
            }
            queue!(
                out,
                SetAttribute(Attribute::Reset),
                Print(format!("\r\n      {}", row.subtitle))
            )?;
            lines += 2;
        }
    }

    if lines > 0 {
        queue!(out, cursor::MoveUp(lines))?;
    }
    let column = (PROMPT.chars().count() + input.chars().count()) as u16;
    queue!(out, cursor::MoveToColumn(column))?;
    out.flush()?;
    Ok(())
}
