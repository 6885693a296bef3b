//! Frontends for session snapshots: a plain-text panel and JSON lines.

use std::io::Write;

use glyph_core::expression::format_number;
use glyph_core::history::HistoryEntry;
use glyph_core::{SessionSnapshot, SessionView};
use tracing::warn;

const RECENT_ENTRIES: usize = 4;

/// Human-readable status panel
pub struct TerminalView<W: Write> {
    out: W,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Short countdown line between full redraws
    pub fn time_notice(&mut self, seconds_left: u32) {
        if let Err(err) = writeln!(self.out, "   ⧗ {seconds_left}s left") {
            warn!(%err, "Failed to write time notice");
        }
    }

    pub fn message(&mut self, text: &str) {
        if let Err(err) = writeln!(self.out, "{text}") {
            warn!(%err, "Failed to write message");
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn render(&mut self, snap: &SessionSnapshot) -> std::io::Result<()> {
        let out = &mut self.out;
        writeln!(out)?;

        match &snap.encounter {
            Some(enc) => writeln!(
                out,
                "══ Stage {} · {} ══  {}",
                snap.stage, enc.name, enc.health_label
            )?,
            None => writeln!(out, "══ Stage {} ══", snap.stage)?,
        }
        writeln!(
            out,
            "Essence {} | Streak {} | Level {} | Time {}",
            snap.score,
            snap.streak,
            snap.level,
            if snap.timer.running {
                format!("{}s", snap.timer.seconds_left)
            } else {
                "--".to_string()
            }
        )?;

        if let Some(target) = snap.target {
            let glyphs: Vec<String> = snap
                .glyphs
                .iter()
                .map(|g| {
                    if g.used {
                        format!("[{}]", g.glyph)
                    } else {
                        g.glyph.to_string()
                    }
                })
                .collect();
            writeln!(out, "Target {target}   Glyphs {}", glyphs.join(" "))?;
            writeln!(
                out,
                "Spell  {}",
                if snap.expression.is_empty() { "·" } else { snap.expression.as_str() }
            )?;
        }

        writeln!(out, "Sigil  {} ({})", snap.sigil.text, snap.sigil.reward)?;

        let artifacts: Vec<String> = snap
            .artifacts
            .iter()
            .map(|a| format!("{} ×{}", a.kind, a.count))
            .collect();
        writeln!(out, "Relics {}", artifacts.join(", "))?;

        for entry in snap.history.iter().take(RECENT_ENTRIES) {
            writeln!(out, "  {}", history_line(entry))?;
        }
        writeln!(out, "» {}", snap.hint)?;
        out.flush()
    }
}

impl<W: Write> SessionView for TerminalView<W> {
    fn present(&mut self, snapshot: &SessionSnapshot) {
        if let Err(err) = self.render(snapshot) {
            warn!(%err, "Failed to render snapshot");
        }
    }
}

/// One chronicle row
pub fn history_line(entry: &HistoryEntry) -> String {
    let time = entry.timestamp().format("%H:%M:%S");
    match entry {
        HistoryEntry::Spell {
            expression,
            result,
            success,
            message,
            ..
        } => {
            let mark = if *success { '✔' } else { '✖' };
            match result {
                Some(value) => format!(
                    "{time} {mark} {expression} = {} · {message}",
                    format_number(*value)
                ),
                None => format!("{time} {mark} {expression} · {message}"),
            }
        }
        HistoryEntry::Event { message, .. } => format!("{time} • {message}"),
    }
}

/// One JSON snapshot per line, for scripted frontends
pub struct JsonView<W: Write> {
    out: W,
}

impl<W: Write> JsonView<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line(&mut self, snapshot: &SessionSnapshot) -> std::io::Result<()> {
        serde_json::to_writer(&mut self.out, snapshot)?;
        writeln!(self.out)?;
        self.out.flush()
    }
}

impl<W: Write> SessionView for JsonView<W> {
    fn present(&mut self, snapshot: &SessionSnapshot) {
        if let Err(err) = self.write_line(snapshot) {
            warn!(%err, "Failed to write snapshot");
        }
    }
}
