use anyhow::Result;
use console::{Key, Term, style};
use dialoguer::{Input, Password};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Back,
    Quit,
    Index(usize),
}

/// Lines printed above every menu: the configured header and the outcome of
/// the last action.
#[derive(Debug, Default, Clone, Copy)]
pub struct Screen<'a> {
    pub header: Option<&'a str>,
    pub status: Option<&'a str>,
}

impl Screen<'_> {
    fn print(&self, term: &Term) {
        let _ = term.clear_screen();
        if let Some(h) = self.header {
            println!("{}", style(h).bold());
        }
        if let Some(s) = self.status {
            println!("{}", style(s).yellow());
        }
    }

    fn reserved_rows(&self) -> usize {
        self.header.is_some() as usize + self.status.is_some() as usize
    }
}

/// Shows a numbered menu. The first key picks the mode: arrows start
/// arrow navigation, anything else starts typed input.
pub fn prompt_index(screen: &Screen, prompt: &str, labels: &[String]) -> Result<MenuChoice> {
    let term = Term::stdout();
    loop {
        screen.print(&term);
        println!("{}", prompt);
        for (i, it) in labels.iter().enumerate() {
            println!("{}: {}", i + 1, it);
        }
        if labels.is_empty() {
            println!("{}", style("(nothing here)").dim());
        }
        println!("Type a number + Enter, or use arrow keys + Enter. 'b' = back, 'q' = quit.");

        let key = term.read_key()?;
        let typed = match key {
            Key::ArrowUp | Key::ArrowDown | Key::Home | Key::End | Key::PageUp | Key::PageDown
                if !labels.is_empty() =>
            {
                return arrow_select(screen, prompt, labels);
            }
            Key::Char('q') | Key::Char('Q') => return Ok(MenuChoice::Quit),
            Key::Char('b') | Key::Char('B') | Key::Escape => return Ok(MenuChoice::Back),
            Key::Char(c) if !c.is_control() => Input::<String>::new()
                .with_prompt("Selection")
                .with_initial_text(c.to_string())
                .allow_empty(true)
                .interact_text()?,
            _ => continue,
        };
        if let Some(choice) = parse_selection(&typed, labels.len()) {
            return Ok(choice);
        }
    }
}

fn parse_selection(input: &str, len: usize) -> Option<MenuChoice> {
    let s = input.trim();
    if s.eq_ignore_ascii_case("q") {
        return Some(MenuChoice::Quit);
    }
    if s.eq_ignore_ascii_case("b") {
        return Some(MenuChoice::Back);
    }
    match s.parse::<usize>() {
        Ok(idx) if idx >= 1 && idx <= len => Some(MenuChoice::Index(idx - 1)),
        _ => None,
    }
}

fn arrow_select(screen: &Screen, prompt: &str, items: &[String]) -> Result<MenuChoice> {
    let term = Term::stdout();
    let mut sel: usize = 0;
    let mut top: usize = 0;
    loop {
        screen.print(&term);
        println!("{}", prompt);

        let (rows_u16, _cols_u16) = term.size();
        // prompt + help line
        let reserved = 2 + screen.reserved_rows();
        let max_visible = (rows_u16 as usize).saturating_sub(reserved).max(3).min(items.len());

        // keep selection in viewport
        if sel < top {
            top = sel;
        }
        if sel >= top + max_visible {
            top = sel + 1 - max_visible;
        }

        let end = (top + max_visible).min(items.len());
        for (i, item) in items.iter().enumerate().take(end).skip(top) {
            let cursor = if i == sel { ">" } else { " " };
            println!("{} {}: {}", cursor, i + 1, item);
        }
        println!("Use arrows + Enter. 'b' = back, 'q' = quit.");

        let step = max_visible.saturating_sub(1).max(1);
        let last = items.len().saturating_sub(1);
        match term.read_key()? {
            Key::ArrowUp => sel = sel.saturating_sub(1),
            Key::ArrowDown => sel = (sel + 1).min(last),
            Key::Home => sel = 0,
            Key::End => sel = last,
            Key::PageUp => sel = sel.saturating_sub(step),
            Key::PageDown => sel = (sel + step).min(last),
            Key::Enter => return Ok(MenuChoice::Index(sel)),
            Key::Char('q') | Key::Char('Q') => return Ok(MenuChoice::Quit),
            Key::Char('b') | Key::Char('B') | Key::Escape => return Ok(MenuChoice::Back),
            _ => {}
        }
    }
}

/// Reads one form field. Empty input is refused.
pub fn prompt_field(label: &str) -> Result<String> {
    let value: String = Input::new()
        .with_prompt(label)
        .validate_with(|v: &String| -> std::result::Result<(), &str> {
            if v.trim().is_empty() { Err("required") } else { Ok(()) }
        })
        .interact_text()?;
    Ok(value.trim().to_string())
}

pub fn prompt_password(label: &str) -> Result<String> {
    Ok(Password::new().with_prompt(label).interact()?)
}

/// Prints lines under the screen header and waits for a key.
pub fn show_text(screen: &Screen, lines: &[String]) -> Result<()> {
    let term = Term::stdout();
    screen.print(&term);
    for line in lines {
        println!("{}", line);
    }
    println!();
    println!("Press any key to return.");
    term.read_key()?;
    Ok(())
}
