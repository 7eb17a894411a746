pub mod args;
pub mod candidate;
pub mod config;
pub mod formatting;
pub mod fzf;
pub mod grep;
pub mod memo;
pub mod note;
pub mod width;

use args::CommonFlags;
use candidate::{Action, Candidate, ListLayout, SEPARATOR};
use chrono::Local;
use config::Config;
use formatting::FormatContext;
use fzf::FzfSelector;
use memo::Memo;
use std::env;
use std::error::Error;
use std::io::{self, Write};
use std::path::PathBuf;
use width::{AmbiWidth, Truncator, WidthCache};

pub fn entry() -> Result<(), Box<dyn Error>> {
    let mut args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() {
        print_help();
        return Ok(());
    }

    let cmd = args.remove(0);
    let cfg = Config::from_env()?;

    match cmd.as_str() {
        "list" | "ls" => list_notes(args, &cfg)?,
        "new" => new_note(args, &cfg)?,
        "grep" => grep_notes(args, &cfg)?,
        "open" => open_notes(args, &cfg)?,
        "dir" => println!("{}", resolve_memo_dir(&cfg)?.display()),
        "width" => print_width(args, &cfg)?,
        "help" | "-h" | "--help" => print_help(),
        other => {
            print_help();
            return Err(format!("Unknown command: {other}").into());
        }
    }

    Ok(())
}

fn print_help() {
    println!(
        "\
Memo Picker
Usage:
  memo-picker list [-c|--column N] [-a|--ambiwidth single|double] [--plain] [--fzf-lines]
                                  List notes as fixed-width candidates
  memo-picker new <title...>      Create a note for the title and open it in $EDITOR
  memo-picker grep <pattern> [--plain]
                                  Search note contents (smart case regex)
  memo-picker open [-n|--new]     Pick notes with fzf and open them; with --new an
                                  unmatched query becomes a new note title
  memo-picker dir                 Show the memo directory
  memo-picker width <text> [-c N] [-a single|double]
                                  Show how a file name renders in the column
  memo-picker help                Show this message

Environment:
  MEMO_PICKER_COLUMN              File column width (default: 20)
  MEMO_PICKER_AMBIWIDTH           single|double, width of ambiguous characters
  MEMO_PICKER_NORMALIZE           NFC-normalize file names (default: on for macOS)
  MEMO_PICKER_MEMO_DIR            Override memodir from `memo config --cat`
  MEMO_PICKER_MEMO_BIN            Path to the memo binary
  MEMO_PICKER_NO_FZF              Disable fzf
  MEMO_PICKER_DEBUG               Echo memo invocations to stderr
  EDITOR                          Editor used to open notes (default: vi)
  NO_COLOR                        Disable colors
"
    );
}

fn locate_memo(cfg: &Config) -> Result<Memo, Box<dyn Error>> {
    Ok(Memo::locate(cfg.memo_bin.as_deref())?.debug(cfg.debug))
}

fn resolve_memo_dir(cfg: &Config) -> Result<PathBuf, Box<dyn Error>> {
    if let Some(dir) = &cfg.memo_dir {
        return Ok(dir.clone());
    }
    let memo = locate_memo(cfg)?;
    memo.memo_dir()
        .map_err(|e| format!("command returned invalid response: {e}"))?
        .ok_or_else(|| "memodir is not set in memo config".into())
}

fn truncator(cfg: &Config) -> Truncator {
    Truncator::new(WidthCache::new(), cfg.normalize_filenames)
}

/// Columns left for titles after the file column, when stdout is a terminal.
fn title_width(column: usize) -> Option<usize> {
    let (terminal_size::Width(cols), _) = terminal_size::terminal_size()?;
    let width =
        (cols as usize).checked_sub(column + SEPARATOR.chars().count())?;
    (width >= 4).then_some(width)
}

fn list_candidates(
    flags: &CommonFlags,
    cfg: &Config,
    fmt: &FormatContext,
    clip_titles: bool,
) -> Result<Vec<Candidate>, Box<dyn Error>> {
    let memo = locate_memo(cfg)?;
    let truncator = truncator(cfg);
    let column = flags.column.unwrap_or(cfg.column);
    let layout = ListLayout {
        column,
        ambiwidth: flags.ambiwidth.unwrap_or(cfg.ambiwidth),
        title_width: if clip_titles { title_width(column) } else { None },
    };
    Ok(memo
        .list()?
        .iter()
        .map(|entry| Candidate::from_entry(entry, &truncator, layout, fmt))
        .collect())
}

fn list_notes(args: Vec<String>, cfg: &Config) -> Result<(), Box<dyn Error>> {
    let flags = CommonFlags::parse(args, "list")?;
    let fmt = FormatContext::new(cfg.use_color && !flags.plain);
    let candidates = list_candidates(&flags, cfg, &fmt, !flags.fzf_lines)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for c in &candidates {
        match (&c.action, flags.fzf_lines) {
            (Action::Open { path, .. }, true) => {
                writeln!(out, "{}\t{}", path.display(), c.abbr)?
            }
            _ => writeln!(out, "{}", c.abbr)?,
        }
    }
    Ok(())
}

fn new_note(args: Vec<String>, cfg: &Config) -> Result<(), Box<dyn Error>> {
    let flags = CommonFlags::parse(args, "new")?;
    let title = flags.positional.join(" ");
    let memo_dir = resolve_memo_dir(cfg)?;
    let fmt = FormatContext::new(false);
    let candidate = Candidate::new_note(&title, &memo_dir, &fmt)
        .ok_or("Usage: memo-picker new <title...>")?;
    perform(&candidate.action, cfg)
}

fn grep_notes(args: Vec<String>, cfg: &Config) -> Result<(), Box<dyn Error>> {
    let flags = CommonFlags::parse(args, "grep")?;
    if flags.positional.is_empty() {
        return Err("Usage: memo-picker grep <pattern>".into());
    }
    let pattern = flags.positional.join(" ");
    let memo_dir = resolve_memo_dir(cfg)?;
    let fmt = FormatContext::new(cfg.use_color && !flags.plain);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for hit in grep::grep(&memo_dir, &pattern)? {
        writeln!(out, "{}", Candidate::from_hit(&hit, &fmt).abbr)?;
    }
    Ok(())
}

fn open_notes(args: Vec<String>, cfg: &Config) -> Result<(), Box<dyn Error>> {
    let flags = CommonFlags::parse(args, "open")?;
    if !cfg.use_fzf {
        return Err("open needs fzf; unset MEMO_PICKER_NO_FZF".into());
    }
    let fmt = FormatContext::new(cfg.use_color && !flags.plain);
    let candidates = list_candidates(&flags, cfg, &fmt, true)?;

    let selection = FzfSelector::for_notes()
        .multi_select(true)
        .print_query(flags.new_note)
        .select(&candidates)?;

    if selection.indices.is_empty() {
        let query = selection.query.unwrap_or_default();
        if !flags.new_note || query.trim().is_empty() {
            return Ok(());
        }
        let memo_dir = resolve_memo_dir(cfg)?;
        if let Some(c) = Candidate::new_note(&query, &memo_dir, &fmt) {
            perform(&c.action, cfg)?;
        }
        return Ok(());
    }

    for idx in selection.indices {
        if let Some(c) = candidates.get(idx) {
            perform(&c.action, cfg)?;
        }
    }
    Ok(())
}

fn perform(action: &Action, cfg: &Config) -> Result<(), Box<dyn Error>> {
    let cwd = env::current_dir()?;
    match action {
        Action::Open { path, line } => note::open_in_editor(
            &cfg.editor,
            &note::display_path(path, &cwd),
            *line,
        ),
        Action::New { memo_dir, title } => {
            let path =
                note::new_note_path(memo_dir, Local::now().date_naive(), title);
            if note::ensure_heading(&path, title)? {
                println!("Created {}", path.display());
            }
            let path = note::display_path(&path, &cwd);
            note::open_in_editor(&cfg.editor, &path, None)
        }
    }
}

fn print_width(args: Vec<String>, cfg: &Config) -> Result<(), Box<dyn Error>> {
    let flags = CommonFlags::parse(args, "width")?;
    let text = flags.positional.join(" ");
    let ambiwidth: AmbiWidth = flags.ambiwidth.unwrap_or(cfg.ambiwidth);
    let rendered = truncator(cfg).stdwidthpart(
        &text,
        flags.column.unwrap_or(cfg.column),
        ambiwidth,
    );
    println!("|{rendered}|");
    Ok(())
}
