use crate::app::{App, ScreenState};
use alphaclue_core::{format_elapsed, level_change_message, ClueView, Difficulty, TileView};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute,
    style::{Color, Print, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};
use std::io;

/// Width of one tile: "[X]" plus a gap
const TILE_WIDTH: u16 = 4;
/// Rows per clue: heading, tiles, group badges, spacer
const CLUE_HEIGHT: u16 = 4;
const INFO_WIDTH: u16 = 24;

pub fn render(stdout: &mut io::Stdout, app: &App) -> io::Result<()> {
    let (term_width, term_height) = terminal::size()?;

    execute!(stdout, Hide, SetBackgroundColor(app.theme.bg), Clear(ClearType::All))?;
    render_game_screen(stdout, app, term_width, term_height)?;
    execute!(stdout, Show)?;
    Ok(())
}

fn render_game_screen(
    stdout: &mut io::Stdout,
    app: &App,
    term_width: u16,
    term_height: u16,
) -> io::Result<()> {
    let views = app.game.views();
    let longest = views.iter().map(|v| v.tiles.len()).max().unwrap_or(0) as u16;
    let board_width = (longest * TILE_WIDTH).max(40);

    let total_width = board_width + 3 + INFO_WIDTH;
    let start_x = if term_width > total_width {
        (term_width - total_width) / 2
    } else {
        1
    };
    let start_y = 2;

    // Leave room for the controls below the clues
    let rows_available = term_height.saturating_sub(start_y + 6);
    let capacity = ((rows_available / CLUE_HEIGHT) as usize).max(1);
    let first = (app.cursor.clue + 1).saturating_sub(capacity);

    let mut y = start_y;
    for view in views.iter().skip(first).take(capacity) {
        render_clue(stdout, app, view, start_x, y, board_width)?;
        y += CLUE_HEIGHT;
    }

    render_info_panel(stdout, app, start_x + board_width + 3, start_y)?;
    render_controls(stdout, app, start_x, y + 1)?;

    if let Some(ref msg) = app.message {
        render_message(stdout, app, msg, term_width)?;
    }

    if let Some(level) = app.pending_level {
        render_confirm(stdout, app, level, term_width, term_height)?;
    }

    Ok(())
}

fn render_clue(
    stdout: &mut io::Stdout,
    app: &App,
    view: &ClueView,
    x: u16,
    y: u16,
    width: u16,
) -> io::Result<()> {
    let theme = &app.theme;

    let heading = format!("{}: ", view.heading);
    let text = wrap_text(&view.clue, (width as usize).saturating_sub(heading.len()))
        .into_iter()
        .next()
        .unwrap_or_default();
    execute!(
        stdout,
        MoveTo(x, y),
        SetBackgroundColor(theme.bg),
        SetForegroundColor(theme.heading),
        Print(&heading),
        SetForegroundColor(theme.fg),
        Print(text)
    )?;

    for tile in &view.tiles {
        let tx = x + tile.letter_index as u16 * TILE_WIDTH;
        render_tile(stdout, app, tile, tx, y + 1)?;

        if let Some(group) = tile.group_index {
            execute!(
                stdout,
                MoveTo(tx, y + 2),
                SetBackgroundColor(theme.bg),
                SetForegroundColor(theme.badge),
                Print(format!("{:^3}", group))
            )?;
        }
    }

    Ok(())
}

fn render_tile(
    stdout: &mut io::Stdout,
    app: &App,
    tile: &TileView,
    x: u16,
    y: u16,
) -> io::Result<()> {
    let theme = &app.theme;
    let is_cursor = tile.position() == app.cursor && app.screen_state == ScreenState::Playing;

    let bg = if is_cursor {
        theme.selected_bg
    } else if tile.highlighted {
        theme.highlight_bg
    } else {
        theme.bg
    };

    let fg = if tile.incorrect {
        theme.error
    } else if tile.correct {
        theme.success
    } else if tile.revealed {
        theme.revealed
    } else {
        theme.filled
    };

    execute!(
        stdout,
        MoveTo(x, y),
        SetBackgroundColor(bg),
        SetForegroundColor(theme.border),
        Print("[")
    )?;
    match tile.value {
        Some(value) => execute!(stdout, SetForegroundColor(fg), Print(value))?,
        None => execute!(stdout, SetForegroundColor(Color::DarkGrey), Print("·"))?,
    }
    execute!(stdout, SetForegroundColor(theme.border), Print("]"))?;

    Ok(())
}

fn render_info_panel(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;
    let session = app.game.session();
    let day = session.day();

    execute!(stdout, SetBackgroundColor(theme.bg))?;

    execute!(
        stdout,
        MoveTo(x, y),
        SetForegroundColor(theme.key),
        Print(format!("═══ #{} ═══", day.puzzle_number()))
    )?;

    let elapsed = session
        .completion_time_ms()
        .unwrap_or_else(|| app.game.elapsed_ms());
    let lines = [
        ("Date", day.to_string()),
        ("Time", format_elapsed(elapsed)),
        ("Level", session.difficulty().label().to_string()),
        (
            "Autocheck",
            if session.autocheck() { "on" } else { "off" }.to_string(),
        ),
        (
            "Theme",
            if app.is_high_contrast() {
                "contrast"
            } else {
                "dark"
            }
            .to_string(),
        ),
    ];

    for (i, (label, value)) in lines.iter().enumerate() {
        execute!(
            stdout,
            MoveTo(x, y + 2 + i as u16),
            SetForegroundColor(theme.info),
            Print(format!("{:<10}", label)),
            SetForegroundColor(theme.fg),
            Print(value)
        )?;
    }

    let filled = session.board().iter().filter(|(_, t)| !t.is_empty()).count();
    let total = session.board().tile_count();
    execute!(
        stdout,
        MoveTo(x, y + 3 + lines.len() as u16),
        SetForegroundColor(theme.info),
        Print(format!("{:<10}", "Filled")),
        SetForegroundColor(theme.fg),
        Print(format!("{}/{}", filled, total))
    )?;

    if app.screen_state == ScreenState::Solved {
        execute!(
            stdout,
            MoveTo(x, y + 5 + lines.len() as u16),
            SetForegroundColor(theme.success),
            Print("★ SOLVED ★")
        )?;
    }

    Ok(())
}

fn render_controls(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;

    execute!(stdout, SetBackgroundColor(theme.bg))?;

    let controls = [
        ("A-Z", "Type"),
        ("Arrows", "Move"),
        ("Bksp", "Erase/back"),
        ("Del", "Erase"),
        ("F1-F3", "Level"),
        ("F4/^T", "Autocheck"),
        ("F5", "Theme"),
        ("Esc", "Quit"),
    ];

    // Display in 4 columns (2 items each)
    for (i, (key, desc)) in controls.iter().enumerate() {
        let col = i / 2;
        let row = i % 2;
        let cx = x + (col as u16) * 17;
        let cy = y + row as u16;

        execute!(
            stdout,
            MoveTo(cx, cy),
            SetForegroundColor(theme.key),
            Print(format!("{:>6}", key)),
            SetForegroundColor(theme.info),
            Print(format!(" {}", desc))
        )?;
    }

    Ok(())
}

fn render_message(
    stdout: &mut io::Stdout,
    app: &App,
    msg: &str,
    term_width: u16,
) -> io::Result<()> {
    let theme = &app.theme;
    let padded = format!("  {}  ", msg);
    let x = term_width.saturating_sub(padded.chars().count() as u16) / 2;

    execute!(
        stdout,
        MoveTo(x, 0),
        SetForegroundColor(theme.fg),
        SetBackgroundColor(theme.selected_bg),
        Print(&padded)
    )?;

    Ok(())
}

/// Level-change notice with a yes/no prompt
fn render_confirm(
    stdout: &mut io::Stdout,
    app: &App,
    level: Difficulty,
    term_width: u16,
    term_height: u16,
) -> io::Result<()> {
    let theme = &app.theme;
    let notice = level_change_message(app.game.session().difficulty(), level).unwrap_or_default();

    let box_width: u16 = 36;
    let mut lines = wrap_text(notice, box_width as usize - 4);
    lines.push(String::new());
    lines.push(format!("Switch to {}? (y/n)", level.label()));

    let box_height = lines.len() as u16 + 2;
    let x = term_width.saturating_sub(box_width) / 2;
    let y = term_height.saturating_sub(box_height) / 2;

    let bg = Color::Rgb {
        r: 30,
        g: 30,
        b: 40,
    };

    for row in 0..box_height {
        execute!(
            stdout,
            MoveTo(x, y + row),
            SetBackgroundColor(bg),
            Print(" ".repeat(box_width as usize))
        )?;
    }

    for (i, line) in lines.iter().enumerate() {
        let lx = x + box_width.saturating_sub(line.chars().count() as u16) / 2;
        execute!(
            stdout,
            MoveTo(lx, y + 1 + i as u16),
            SetForegroundColor(if i + 1 == lines.len() { theme.key } else { theme.fg }),
            Print(line)
        )?;
    }

    Ok(())
}

fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.len() + word.len() + 1 > max_width && !current.is_empty() {
            lines.push(current);
            current = String::new();
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
