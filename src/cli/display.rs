// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Terminal display for the docsift CLI.
//!
//! OneDark colors on dark terminals, One Light on light ones. Detection tries
//! `DOCSIFT_THEME` first, then `COLORFGBG`, then defaults to dark. `NO_COLOR` and
//! non-TTY stdout turn color off entirely, so piped output stays plain.

use std::sync::OnceLock;

use docsift::{FieldKind, Suggestion};

/// Width between │ and │ (excluding border chars).
pub const BOX_WIDTH: usize = 72;

// ═══════════════════════════════════════════════════════════════════════════
// THEME DETECTION
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

static THEME: OnceLock<Theme> = OnceLock::new();

fn detect_theme() -> Theme {
    if let Ok(theme) = std::env::var("DOCSIFT_THEME") {
        match theme.to_lowercase().as_str() {
            "light" | "l" => return Theme::Light,
            "dark" | "d" => return Theme::Dark,
            _ => {}
        }
    }

    // "fg;bg": background 7 and up (except 8) is light
    if let Ok(colorfgbg) = std::env::var("COLORFGBG") {
        if let Some(Ok(bg)) = colorfgbg.split(';').next_back().map(str::parse::<u8>) {
            if bg >= 7 && bg != 8 {
                return Theme::Light;
            }
        }
    }

    Theme::Dark
}

pub fn theme() -> Theme {
    *THEME.get_or_init(detect_theme)
}

// ═══════════════════════════════════════════════════════════════════════════
// PALETTE
// ═══════════════════════════════════════════════════════════════════════════

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const UNDERLINE: &str = "\x1b[4m";

fn rgb((r, g, b): (u8, u8, u8)) -> String {
    format!("\x1b[38;2;{};{};{}m", r, g, b)
}

/// (dark, light) pairs.
mod palette {
    pub const GREEN: [(u8, u8, u8); 2] = [(152, 195, 121), (80, 161, 79)];
    pub const YELLOW: [(u8, u8, u8); 2] = [(229, 192, 123), (193, 132, 1)];
    pub const BLUE: [(u8, u8, u8); 2] = [(97, 175, 239), (64, 120, 242)];
    pub const MAGENTA: [(u8, u8, u8); 2] = [(198, 120, 221), (166, 38, 164)];
    pub const CYAN: [(u8, u8, u8); 2] = [(86, 182, 194), (1, 132, 188)];
    pub const RED: [(u8, u8, u8); 2] = [(224, 108, 117), (228, 86, 73)];
    pub const GRAY: [(u8, u8, u8); 2] = [(92, 99, 112), (160, 161, 167)];
}

macro_rules! theme_color {
    ($name:ident) => {
        #[allow(non_snake_case)]
        pub fn $name() -> String {
            let [dark, light] = palette::$name;
            match theme() {
                Theme::Dark => rgb(dark),
                Theme::Light => rgb(light),
            }
        }
    };
}

theme_color!(GREEN);
theme_color!(YELLOW);
theme_color!(BLUE);
theme_color!(MAGENTA);
theme_color!(CYAN);
theme_color!(RED);
theme_color!(GRAY);

// ═══════════════════════════════════════════════════════════════════════════
// CORE UTILITIES
// ═══════════════════════════════════════════════════════════════════════════

pub fn use_colors() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    atty::is(atty::Stream::Stdout)
}

/// Theme color plus modifiers, or plain text when color is off.
pub fn themed(color_fn: fn() -> String, modifiers: &[&str], text: &str) -> String {
    if use_colors() {
        format!("{}{}{}{}", modifiers.join(""), color_fn(), text, RESET)
    } else {
        text.to_string()
    }
}

/// Length in chars, ANSI escapes excluded.
pub fn visible_len(s: &str) -> usize {
    let mut in_escape = false;
    let mut len = 0;
    for c in s.chars() {
        if c == '\x1b' {
            in_escape = true;
        } else if in_escape && c == 'm' {
            in_escape = false;
        } else if !in_escape {
            len += 1;
        }
    }
    len
}

pub fn pad_right(s: &str, width: usize) -> String {
    let visible = visible_len(s);
    if visible >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - visible))
    }
}

pub fn format_size(bytes: usize) -> String {
    if bytes >= 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / 1024.0 / 1024.0)
    } else if bytes >= 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{} B", bytes)
    }
}

/// Cut to `max` chars, marking the cut with `…`.
pub fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", kept)
}

/// Cut to `max` visible chars, copying ANSI escapes through uncounted.
///
/// A cut string that carried any escape is closed with [`RESET`], so a style
/// opened before the cut can't leak past the row.
pub fn truncate_visible(text: &str, max: usize) -> String {
    if visible_len(text) <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(1);
    let mut out = String::with_capacity(text.len());
    let mut visible = 0;
    let mut in_escape = false;
    let mut styled = false;
    for c in text.chars() {
        if c == '\x1b' {
            in_escape = true;
            styled = true;
            out.push(c);
        } else if in_escape {
            in_escape = c != 'm';
            out.push(c);
        } else if visible < keep {
            visible += 1;
            out.push(c);
        } else {
            break;
        }
    }
    out.push('…');
    if styled {
        out.push_str(RESET);
    }
    out
}

// ═══════════════════════════════════════════════════════════════════════════
// BOX DRAWING
// ═══════════════════════════════════════════════════════════════════════════

fn border(text: &str) -> String {
    themed(GRAY, &[], text)
}

/// ┌─ LABEL ──────────┐
pub fn section_top(label: &str) {
    let label_part = format!("─ {} ", themed(CYAN, &[BOLD], label));
    let remaining = BOX_WIDTH.saturating_sub(visible_len(&label_part));
    println!(
        "{}{}{}",
        border("┌"),
        label_part,
        border(&format!("{}┐", "─".repeat(remaining)))
    );
}

/// │ content          │
pub fn row(content: &str) {
    let content = truncate_visible(content, BOX_WIDTH);
    println!("{}{}{}", border("│"), pad_right(&content, BOX_WIDTH), border("│"));
}

/// └──────────────────┘
pub fn section_bot() {
    println!("{}", border(&format!("└{}┘", "─".repeat(BOX_WIDTH))));
}

// ═══════════════════════════════════════════════════════════════════════════
// SEMANTIC FORMATTERS
// ═══════════════════════════════════════════════════════════════════════════

/// `[title]`, `[header]`... colored by field kind.
pub fn kind_badge(kind: FieldKind) -> String {
    let badge = format!("[{}]", kind.as_str());
    let color: fn() -> String = match kind {
        FieldKind::Title => GREEN,
        FieldKind::Header => BLUE,
        FieldKind::Extra => MAGENTA,
        FieldKind::Body => GRAY,
    };
    themed(color, &[], &badge)
}

/// The suggestion's excerpt with the matched span emphasized (or bracketed when
/// color is off).
pub fn highlighted_excerpt(suggestion: &Suggestion, max_chars: usize) -> String {
    let (before, hit, after) = suggestion.split_highlight();
    let hit = if use_colors() {
        themed(YELLOW, &[BOLD, UNDERLINE], hit)
    } else {
        format!("[{}]", hit)
    };
    let budget = max_chars.saturating_sub(visible_len(&hit));
    let before_chars = before.chars().count();
    let lead = if before_chars > budget / 2 {
        let skip = before_chars - budget / 2 + 1;
        format!("…{}", before.chars().skip(skip).collect::<String>())
    } else {
        before.to_string()
    };
    let tail_budget = budget.saturating_sub(lead.chars().count());
    format!("{}{}{}", lead, hit, truncate_chars(after, tail_budget))
}

pub fn error_line(message: &str) -> String {
    themed(RED, &[BOLD], message)
}
