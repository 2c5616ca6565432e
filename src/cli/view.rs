//! Interactive terminal viewer.

use std::io::Write;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::{
    config::ViewerConfig,
    error::Error,
    store::DataStore,
    tui::{Key, ViewerApp},
};

/// Run the full-screen viewer until the user quits.
pub(crate) fn cmd_view(store: &DataStore, config: &ViewerConfig) -> crate::Result<()> {
    use crossterm::{cursor, execute, terminal};
    use std::io::stdout;

    // Load before touching the terminal so load errors print normally.
    let data = store.get_or_load()?;
    let mut app = ViewerApp::new(data, config)?;

    terminal::enable_raw_mode().map_err(Error::Terminal)?;

    let mut stdout = stdout();
    execute!(stdout, terminal::EnterAlternateScreen, cursor::Hide).map_err(Error::Terminal)?;

    let result = run_tui_loop(&mut app, &mut stdout);

    // Cleanup: restore terminal
    let _ = execute!(stdout, cursor::Show, terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

/// Draw, read a key, repeat.
fn run_tui_loop<W: Write>(app: &mut ViewerApp, stdout: &mut W) -> crate::Result<()> {
    use crossterm::{
        cursor,
        event::{self, Event},
        queue,
        style::{Attribute, Print, SetAttribute},
        terminal::{self, Clear, ClearType},
    };

    while !app.should_quit() {
        let (width, height) = terminal::size().unwrap_or((80, 24));
        let (width, height) = (usize::from(width), usize::from(height));
        app.resize(width, height);

        queue!(stdout, Clear(ClearType::All)).map_err(Error::Terminal)?;
        let lines = app.render_lines(width, height);
        let last = lines.len().saturating_sub(1);
        for (i, line) in lines.iter().enumerate() {
            let row = u16::try_from(i).unwrap_or(u16::MAX);
            queue!(stdout, cursor::MoveTo(0, row)).map_err(Error::Terminal)?;
            // Title and status bars in reverse video
            if i == 0 || i == last {
                queue!(
                    stdout,
                    SetAttribute(Attribute::Reverse),
                    Print(line),
                    SetAttribute(Attribute::Reset)
                )
                .map_err(Error::Terminal)?;
            } else {
                queue!(stdout, Print(line)).map_err(Error::Terminal)?;
            }
        }
        stdout.flush().map_err(Error::Terminal)?;

        if let Event::Key(key) = event::read().map_err(Error::Terminal)? {
            if let Some(key) = map_key(key) {
                app.handle_key(key);
            }
        }
    }

    Ok(())
}

/// Translate a crossterm key press; releases and unbound keys are dropped.
fn map_key(event: KeyEvent) -> Option<Key> {
    if event.kind == KeyEventKind::Release {
        return None;
    }
    let key = match event.code {
        KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => Key::Interrupt,
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Tab => Key::Tab,
        KeyCode::BackTab => Key::BackTab,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Esc,
        KeyCode::Backspace => Key::Backspace,
        _ => return None,
    };
    Some(key)
}
