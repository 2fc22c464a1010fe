//! Parses shell lines into application input.
//!
//! Table and page numbers are 1-based as shown on screen; row numbers are the
//! row's local index.

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context};
use report_core::{JobMode, Msg, SortColumn, TabId};

use super::app::Input;

pub const HELP: &str = "\
commands:
  query <text>            set the query
  mode pure|summarize     pick the analysis mode
  limit <n>               set the result limit
  generate                start the analysis
  cancel                  stop polling
  tab query|records|report
  expand <table> <row>    show or hide a row's full text
  page <table> <page>     move a table to another page
  remove <table> <row>    drop a row before summarizing
  filter <table> [text]   show only rows matching every word
  sort <table> no|relevance
  summary                 summarize the current table
  dismiss                 hide the notification
  export [dir]            save the report as html and text
  show                    redraw the screen
  quit";

/// Returns `Ok(None)` for blank lines.
pub fn parse_command(line: &str) -> anyhow::Result<Option<Input>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let input = match word.to_ascii_lowercase().as_str() {
        "query" => Input::Msg(Msg::QueryChanged(rest.to_string())),
        "limit" => Input::Msg(Msg::LimitChanged(rest.to_string())),
        "mode" => Input::Msg(Msg::ModeChanged(parse_mode(rest)?)),
        "generate" => Input::Msg(Msg::GenerateClicked),
        "cancel" => Input::Msg(Msg::CancelClicked),
        "tab" => {
            let tab = TabId::parse(rest).ok_or_else(|| anyhow!("unknown tab {rest:?}"))?;
            Input::Msg(Msg::TabSelected(tab))
        }
        "expand" => {
            let (group, local_index) = table_and_number(rest)?;
            Input::Msg(Msg::RowToggled { group, local_index })
        }
        "remove" => {
            let (group, local_index) = table_and_number(rest)?;
            Input::Msg(Msg::RowRemoved { group, local_index })
        }
        "page" => {
            let (group, page) = table_and_number(rest)?;
            if page == 0 {
                bail!("pages are numbered from 1");
            }
            Input::Msg(Msg::PageChanged {
                group,
                page: page - 1,
            })
        }
        "filter" => {
            let (table, text) = match rest.split_once(char::is_whitespace) {
                Some((table, text)) => (table, text.trim()),
                None => (rest, ""),
            };
            Input::Msg(Msg::FilterChanged {
                group: table_index(table)?,
                text: text.to_string(),
            })
        }
        "sort" => {
            let mut parts = rest.split_whitespace();
            let (Some(table), Some(column), None) = (parts.next(), parts.next(), parts.next())
            else {
                bail!("expected `sort <table> no|relevance`");
            };
            Input::Msg(Msg::SortChanged {
                group: table_index(table)?,
                column: parse_sort_column(column)?,
            })
        }
        "summary" => Input::Msg(Msg::SummaryClicked),
        "dismiss" => Input::Msg(Msg::NotificationDismissed),
        "export" => {
            let dir = if rest.is_empty() { "." } else { rest };
            Input::Export(PathBuf::from(dir))
        }
        "show" => Input::Show,
        "help" | "?" => Input::Help,
        "quit" | "exit" => Input::Quit,
        other => bail!("unknown command {other:?}; type `help`"),
    };
    Ok(Some(input))
}

fn parse_mode(text: &str) -> anyhow::Result<JobMode> {
    match text.to_ascii_lowercase().as_str() {
        "pure" | "similarity" => Ok(JobMode::PureSimilarity),
        "summarize" | "llm" => Ok(JobMode::SimilarityPlusSummarize),
        _ => bail!("mode must be `pure` or `summarize`"),
    }
}

fn parse_sort_column(text: &str) -> anyhow::Result<SortColumn> {
    match text.to_ascii_lowercase().as_str() {
        "no" | "number" => Ok(SortColumn::Number),
        "relevance" => Ok(SortColumn::Relevance),
        _ => bail!("sort column must be `no` or `relevance`"),
    }
}

/// A 1-based table number, returned as a 0-based index.
fn table_index(text: &str) -> anyhow::Result<usize> {
    let table: usize = text
        .parse()
        .with_context(|| format!("table number {text:?}"))?;
    if table == 0 {
        bail!("tables are numbered from 1");
    }
    Ok(table - 1)
}

/// `<table> <n>` with a 1-based table number, returned as a 0-based index.
fn table_and_number(text: &str) -> anyhow::Result<(usize, usize)> {
    let mut parts = text.split_whitespace();
    let (Some(table), Some(number), None) = (parts.next(), parts.next(), parts.next()) else {
        bail!("expected two numbers: <table> <n>");
    };
    let table = table_index(table)?;
    let number: usize = number
        .parse()
        .with_context(|| format!("number {number:?}"))?;
    Ok((table, number))
}
