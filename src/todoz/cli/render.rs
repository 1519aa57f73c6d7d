use colored::Colorize;
use todoz::api::{CmdMessage, MessageLevel};
use todoz::model::{Record, RecordList};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const DONE_MARKER: &str = "[x]";
const OPEN_MARKER: &str = "[ ]";

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        println!("{}", render_message(message));
    }
}

pub(super) fn render_message(message: &CmdMessage) -> String {
    match message.level {
        MessageLevel::Info => message.content.dimmed().to_string(),
        MessageLevel::Success => message.content.green().to_string(),
        MessageLevel::Warning => message.content.yellow().to_string(),
        MessageLevel::Error => message.content.red().to_string(),
    }
}

/// One line per record, in list order. The id column is as wide as the
/// widest id so titles line up.
pub(super) fn render_list(list: &RecordList) -> String {
    if list.is_empty() {
        return format!("{}\n", "No todos.".dimmed());
    }

    let id_width = list
        .iter()
        .map(|r| r.id.to_string().len())
        .max()
        .unwrap_or(1);

    let mut out = String::new();
    for record in list {
        out.push_str(&render_record(record, id_width));
        out.push('\n');
    }
    out.push_str(&format!(
        "\n{}\n",
        format!("{} of {} done", list.completed_count(), list.len()).dimmed()
    ));
    out
}

fn render_record(record: &Record, id_width: usize) -> String {
    let id = format!("{:>width$}", record.id, width = id_width);
    let prefix = format!("  {} {}  ", DONE_MARKER, id);
    let available = LINE_WIDTH.saturating_sub(prefix.width());
    let title = truncate_to_width(&record.title, available);

    if record.completed {
        format!(
            "  {} {}  {}",
            DONE_MARKER.green(),
            id.dimmed(),
            title.dimmed().strikethrough()
        )
    } else {
        format!("  {} {}  {}", OPEN_MARKER, id.yellow(), title)
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}
