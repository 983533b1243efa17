// src/logging/format.rs

//! Line formatting driven by the `format` / `datefmt` config keys.
//!
//! Templates use `%(field)s` placeholders, optionally padded like
//! `%(levelname)-8s`. `%%` is a literal percent sign.

use std::fmt::{self, Write as _};
use std::sync::LazyLock;

use chrono::Local;
use chrono::format::{Item, StrftimeItems};
use regex::Regex;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::{self, FormatEvent, FormatFields};
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::registry::LookupSpan;

use crate::errors::{AutomateyError, Result};

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"%\((?P<field>\w+)\)(?P<left>-?)(?P<width>\d*)s|%%").expect("valid placeholder regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    AscTime,
    LevelName,
    LevelNo,
    Message,
    Name,
    Module,
    FileName,
    LineNo,
    Process,
    ThreadName,
}

impl Field {
    fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "asctime" => Field::AscTime,
            "levelname" => Field::LevelName,
            "levelno" => Field::LevelNo,
            "message" => Field::Message,
            "name" => Field::Name,
            "module" => Field::Module,
            "filename" => Field::FileName,
            "lineno" => Field::LineNo,
            "process" => Field::Process,
            "threadName" => Field::ThreadName,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Literal(String),
    Field {
        field: Field,
        left_align: bool,
        width: usize,
    },
}

/// A parsed `format` template plus the `datefmt` used for `%(asctime)s`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineTemplate {
    pieces: Vec<Piece>,
    datefmt: String,
}

impl LineTemplate {
    pub fn parse(format: &str, datefmt: &str) -> Result<Self> {
        validate_datefmt(datefmt)?;

        let mut pieces = Vec::new();
        let mut last = 0;
        for caps in PLACEHOLDER.captures_iter(format) {
            let Some(whole) = caps.get(0) else { continue };
            push_literal(&mut pieces, &format[last..whole.start()]);
            last = whole.end();

            let Some(name) = caps.name("field") else {
                push_literal(&mut pieces, "%");
                continue;
            };
            let field = Field::parse(name.as_str()).ok_or_else(|| {
                AutomateyError::InvalidFormat(format!("unknown placeholder '%({})s'", name.as_str()))
            })?;
            let width = match caps.name("width").map(|m| m.as_str()) {
                Some(w) if !w.is_empty() => w.parse().map_err(|_| {
                    AutomateyError::InvalidFormat(format!("bad width '{}' in '{}'", w, whole.as_str()))
                })?,
                _ => 0,
            };
            let left_align = caps.name("left").is_some_and(|m| !m.as_str().is_empty());
            pieces.push(Piece::Field {
                field,
                left_align,
                width,
            });
        }
        push_literal(&mut pieces, &format[last..]);

        for piece in &pieces {
            if let Piece::Literal(text) = piece {
                if text.contains("%(") {
                    return Err(AutomateyError::InvalidFormat(format!(
                        "unsupported conversion in '{}' (only %(name)s style is supported)",
                        format
                    )));
                }
            }
        }

        Ok(Self {
            pieces,
            datefmt: datefmt.to_string(),
        })
    }

    pub fn datefmt(&self) -> &str {
        &self.datefmt
    }

    fn render_field<S, N>(
        &self,
        field: Field,
        ctx: &FmtContext<'_, S, N>,
        event: &Event<'_>,
        out: &mut String,
    ) -> fmt::Result
    where
        S: Subscriber + for<'a> LookupSpan<'a>,
        N: for<'a> FormatFields<'a> + 'static,
    {
        let meta = event.metadata();
        match field {
            Field::AscTime => write!(out, "{}", Local::now().format(&self.datefmt)),
            Field::LevelName => out.write_str(level_name(meta.level())),
            Field::LevelNo => write!(out, "{}", level_number(meta.level())),
            Field::Message => ctx.format_fields(format::Writer::new(out), event),
            Field::Name => out.write_str(meta.target()),
            Field::Module => out.write_str(meta.module_path().unwrap_or("")),
            Field::FileName => out.write_str(meta.file().unwrap_or("")),
            Field::LineNo => write!(out, "{}", meta.line().unwrap_or(0)),
            Field::Process => write!(out, "{}", std::process::id()),
            Field::ThreadName => {
                out.write_str(std::thread::current().name().unwrap_or("unnamed"))
            }
        }
    }
}

impl<S, N> FormatEvent<S, N> for LineTemplate
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        for piece in &self.pieces {
            match piece {
                Piece::Literal(text) => writer.write_str(text)?,
                Piece::Field {
                    field,
                    left_align,
                    width,
                } => {
                    let mut rendered = String::new();
                    self.render_field(*field, ctx, event, &mut rendered)?;
                    if *left_align {
                        write!(writer, "{:<width$}", rendered, width = *width)?;
                    } else {
                        write!(writer, "{:>width$}", rendered, width = *width)?;
                    }
                }
            }
        }
        writeln!(writer)
    }
}

fn push_literal(pieces: &mut Vec<Piece>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Piece::Literal(prev)) = pieces.last_mut() {
        prev.push_str(text);
    } else {
        pieces.push(Piece::Literal(text.to_string()));
    }
}

fn validate_datefmt(datefmt: &str) -> Result<()> {
    if StrftimeItems::new(datefmt).any(|item| matches!(item, Item::Error)) {
        return Err(AutomateyError::InvalidDateFormat(datefmt.to_string()));
    }
    Ok(())
}

/// Level names as they appear in log lines.
pub fn level_name(level: &Level) -> &'static str {
    match *level {
        Level::ERROR => "ERROR",
        Level::WARN => "WARNING",
        Level::INFO => "INFO",
        Level::DEBUG => "DEBUG",
        _ => "TRACE",
    }
}

fn level_number(level: &Level) -> u8 {
    match *level {
        Level::ERROR => 40,
        Level::WARN => 30,
        Level::INFO => 20,
        Level::DEBUG => 10,
        _ => 5,
    }
}
