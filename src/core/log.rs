use crate::context::AppContext;
use crate::db::queries::collect_rows;
use crate::errors::AppResult;
use ansi_term::Colour;
use rusqlite::Connection;
use std::sync::OnceLock;
use unicode_width::UnicodeWidthStr;

const OP_COLUMN_MAX: usize = 60;

#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub id: i64,
    pub date: String,
    pub operation: String,
    pub target: String,
    pub message: String,
}

fn ansi_pattern() -> Option<&'static regex::Regex> {
    static RE: OnceLock<Option<regex::Regex>> = OnceLock::new();
    RE.get_or_init(|| regex::Regex::new(r"\x1B\[[0-9;]*[mK]").ok())
        .as_ref()
}

fn strip_ansi(s: &str) -> String {
    match ansi_pattern() {
        Some(re) => re.replace_all(s, "").into_owned(),
        None => s.to_string(),
    }
}

fn color_for_operation(op: &str) -> Colour {
    match op {
        "add" | "done" => Colour::Green,
        "del" | "undo" => Colour::Red,
        "edit" | "reschedule" | "move" => Colour::Yellow,
        "archive" | "unarchive" => Colour::Cyan,
        "sync" | "publish" | "pull" | "import" => Colour::Blue,
        "migration_applied" => Colour::Purple,
        "init" => Colour::RGB(255, 153, 51),
        other if other.ends_with("_failed") || other == "sync_skip" => Colour::Red,
        _ => Colour::White,
    }
}

/// Cut `s` so its display width fits `max`, marking the cut with "...".
fn truncate_to_width(s: &str, max: usize) -> String {
    if s.width() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for ch in s.chars() {
        let next = format!("{}{}", out, ch);
        if next.width() + 3 > max {
            break;
        }
        out = next;
    }
    out.push_str("...");
    out
}

pub struct LogLogic;

impl LogLogic {
    /// Internal log rows, oldest first. With `limit`, only the newest ones.
    pub fn entries(conn: &Connection, limit: Option<usize>) -> AppResult<Vec<LogEntry>> {
        let mut stmt = conn.prepare_cached(
            "SELECT id, date, operation, target, message FROM log ORDER BY id ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(LogEntry {
                id: row.get(0)?,
                date: row.get(1)?,
                operation: row.get(2)?,
                target: row.get(3)?,
                message: row.get(4)?,
            })
        })?;
        let mut entries = collect_rows(rows)?;

        if let Some(n) = limit
            && entries.len() > n
        {
            entries.drain(..entries.len() - n);
        }
        Ok(entries)
    }

    pub fn print_log(ctx: &AppContext, limit: Option<usize>) -> AppResult<()> {
        let entries = Self::entries(&ctx.pool.conn, limit)?;
        if entries.is_empty() {
            println!("📜 Internal log is empty.");
            return Ok(());
        }

        let rows: Vec<(i64, String, String, String, String)> = entries
            .into_iter()
            .map(|e| {
                let date = chrono::DateTime::parse_from_rfc3339(&e.date)
                    .map(|dt| dt.format("%FT%T%:z").to_string())
                    .unwrap_or(e.date);
                let op_target = if e.target.is_empty() {
                    e.operation.clone()
                } else {
                    format!("{} ({})", e.operation, e.target)
                };
                (e.id, date, e.operation, op_target, e.message)
            })
            .collect();

        let op_w = rows
            .iter()
            .map(|(_, _, _, op_target, _)| op_target.width())
            .max()
            .unwrap_or(10)
            .min(OP_COLUMN_MAX);
        let id_w = rows
            .iter()
            .map(|(id, ..)| id.to_string().len())
            .max()
            .unwrap_or(1);
        let date_w = rows
            .iter()
            .map(|(_, date, ..)| date.width())
            .max()
            .unwrap_or(10);

        println!("📜 Internal log:\n");

        for (id, date, operation, op_target, message) in rows {
            let color = color_for_operation(&operation);
            let visible = truncate_to_width(&op_target, OP_COLUMN_MAX);

            // only the operation word is coloured
            let painted = match visible.split_once(' ') {
                Some((op_word, rest)) => format!("{} {}", color.paint(op_word), rest),
                None => color.paint(visible.as_str()).to_string(),
            };
            let padding = " ".repeat(op_w.saturating_sub(strip_ansi(&painted).width()));

            println!(
                "{:>id_w$}: {:<date_w$} | {}{} => {}",
                id,
                date,
                painted,
                padding,
                message,
                id_w = id_w,
                date_w = date_w
            );
        }

        Ok(())
    }
}
