use std::time::Duration;

use anyhow::{anyhow, bail, Result};

use kaiviz_console::views::{JobSortKey, SortDirection, View};
use kaiviz_console::{Console, Route};

/// One line typed on stdin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    TogglePause,
    Interval(Duration),
    Namespace(String),
    Filter(String),
    Sort(JobSortKey, SortDirection),
    /// One-based.
    Page(usize),
    /// One-based job row on the current page, or queue number as listed.
    Expand(usize),
    ExpandAll,
    CollapseAll,
    GpuOnly,
    Hover(Option<usize>),
    Click(usize),
    Go(Route),
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  p                 pause / resume auto refresh
  i <ms>            set refresh interval
  ns [name]         select namespace (empty = all)
  f [text]          filter jobs or nodes
  sort <col> [asc|desc]
                    sort jobs by name, namespace, status, queue, createTime, tasks
  page <n>          jump to jobs page
  x <n>             expand job row / toggle queue (numbers as listed, from 1)
  expand, collapse  expand or collapse every queue
  gpu               toggle GPU nodes only
  hover [n]         highlight donut segment
  click <n>         open jobs filtered by segment status
  go <path>         /dashboard, /jobs?status=..., /nodes, /queues
  q                 quit";

/// `Ok(None)` for a blank line.
pub fn parse(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map(|(w, r)| (w, r.trim()))
        .unwrap_or((line, ""));

    let command = match word {
        "" => return Ok(None),
        "p" | "pause" => Command::TogglePause,
        "i" | "interval" => {
            let ms: u64 = number(rest, "i <ms>")?;
            Command::Interval(Duration::from_millis(ms))
        }
        "ns" | "namespace" => Command::Namespace(rest.to_string()),
        "f" | "filter" => Command::Filter(rest.to_string()),
        "sort" => {
            let mut parts = rest.split_whitespace();
            let column = parts.next().ok_or_else(|| anyhow!("usage: sort <col> [asc|desc]"))?;
            let key = JobSortKey::parse(column).ok_or_else(|| anyhow!("unknown column '{column}'"))?;
            let direction = match parts.next() {
                Some(dir) => SortDirection::parse(dir).ok_or_else(|| anyhow!("unknown direction '{dir}'"))?,
                None => SortDirection::Ascending,
            };
            Command::Sort(key, direction)
        }
        "page" => Command::Page(number(rest, "page <n>")?),
        "x" => Command::Expand(number(rest, "x <n>")?),
        "expand" => Command::ExpandAll,
        "collapse" => Command::CollapseAll,
        "gpu" => Command::GpuOnly,
        "hover" if rest.is_empty() => Command::Hover(None),
        "hover" => Command::Hover(Some(number(rest, "hover [n]")?)),
        "click" => Command::Click(number(rest, "click <n>")?),
        "go" => Command::Go(Route::parse(rest)),
        "h" | "help" | "?" => Command::Help,
        "q" | "quit" | "exit" => Command::Quit,
        other => bail!("unknown command '{other}', type 'help'"),
    };
    Ok(Some(command))
}

fn number<T: std::str::FromStr>(arg: &str, usage: &str) -> Result<T> {
    arg.parse().map_err(|_| anyhow!("usage: {usage}"))
}

#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Re-render the current view.
    Render,
    Navigate(Route),
    Quit,
    /// The command does not apply to the current view.
    Ignored,
}

pub fn apply(console: &Console, view: &mut View, command: Command) -> Outcome {
    match (command, view) {
        (Command::Quit, _) => Outcome::Quit,
        (Command::Help, _) => {
            println!("{HELP}");
            Outcome::Ignored
        }
        (Command::Go(route), _) => Outcome::Navigate(route),
        (Command::TogglePause, _) => {
            console.clock().toggle_pause();
            Outcome::Render
        }
        (Command::Interval(interval), _) => {
            console.clock().set_interval(interval);
            Outcome::Render
        }
        (Command::Namespace(ns), _) => {
            console.namespace().set_namespace(ns);
            Outcome::Render
        }

        (Command::Filter(text), View::Jobs(v)) => {
            v.table_mut().apply_filter(&text);
            Outcome::Render
        }
        (Command::Filter(text), View::Nodes(v)) => {
            v.set_filter_text(&text);
            Outcome::Render
        }
        (Command::Sort(key, direction), View::Jobs(v)) => {
            v.table_mut().set_sort(key, direction);
            Outcome::Render
        }
        (Command::Page(page), View::Jobs(v)) => {
            v.table_mut().set_page(page.saturating_sub(1));
            Outcome::Render
        }
        (Command::Expand(row), View::Jobs(v)) => {
            let state = v.state();
            let uid = state.data.as_deref().and_then(|jobs| {
                let page = v.table().render(jobs);
                page.rows
                    .get(listed(row)?)
                    .map(|r| r.job.uid.clone())
            });
            match uid {
                Some(uid) => {
                    v.table_mut().toggle_expanded(&uid);
                    Outcome::Render
                }
                None => Outcome::Ignored,
            }
        }
        (Command::Expand(number), View::Queues(v)) => {
            if listed(number).is_some_and(|index| v.toggle(index)) {
                Outcome::Render
            } else {
                Outcome::Ignored
            }
        }
        (Command::ExpandAll, View::Queues(v)) => {
            v.expand_all();
            Outcome::Render
        }
        (Command::CollapseAll, View::Queues(v)) => {
            v.collapse_all();
            Outcome::Render
        }
        (Command::GpuOnly, View::Nodes(v)) => {
            v.toggle_gpu_only();
            Outcome::Render
        }
        (Command::Hover(segment), View::Dashboard(v)) => {
            v.hover(segment);
            Outcome::Render
        }
        (Command::Click(segment), View::Dashboard(v)) => match v.click(segment) {
            Some(route) => Outcome::Navigate(route),
            None => Outcome::Ignored,
        },
        (command, view) => {
            tracing::debug!(?command, view = view.name(), "command ignored");
            Outcome::Ignored
        }
    }
}

/// Zero-based index of the row printed as `number`.
fn listed(number: usize) -> Option<usize> {
    number.checked_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        assert_eq!(parse("").unwrap(), None);
        assert_eq!(parse("  p ").unwrap(), Some(Command::TogglePause));
        assert_eq!(
            parse("i 250").unwrap(),
            Some(Command::Interval(Duration::from_millis(250)))
        );
        assert_eq!(parse("ns").unwrap(), Some(Command::Namespace(String::new())));
        assert_eq!(
            parse("ns  team-a ").unwrap(),
            Some(Command::Namespace("team-a".to_string()))
        );
        assert_eq!(parse("q").unwrap(), Some(Command::Quit));
    }

    #[test]
    fn test_parse_sort() {
        assert_eq!(
            parse("sort tasks desc").unwrap(),
            Some(Command::Sort(JobSortKey::Tasks, SortDirection::Descending))
        );
        assert_eq!(
            parse("sort name").unwrap(),
            Some(Command::Sort(JobSortKey::Name, SortDirection::Ascending))
        );
        assert!(parse("sort").is_err());
        assert!(parse("sort gpus").is_err());
        assert!(parse("sort name sideways").is_err());
    }

    #[test]
    fn test_parse_navigation() {
        assert_eq!(
            parse("go /jobs?status=Failed").unwrap(),
            Some(Command::Go(Route::Jobs {
                status: Some("Failed".to_string())
            }))
        );
        assert_eq!(parse("go nowhere").unwrap(), Some(Command::Go(Route::Dashboard)));
        assert_eq!(parse("hover").unwrap(), Some(Command::Hover(None)));
        assert_eq!(parse("hover 2").unwrap(), Some(Command::Hover(Some(2))));
        assert_eq!(parse("click 0").unwrap(), Some(Command::Click(0)));
    }

    #[test]
    fn test_listed_numbers_start_at_one() {
        assert_eq!(parse("x 1").unwrap(), Some(Command::Expand(1)));
        assert_eq!(listed(1), Some(0));
        assert_eq!(listed(12), Some(11));
        assert_eq!(listed(0), None);
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse("i fast").is_err());
        assert!(parse("page").is_err());
        assert!(parse("x -1").is_err());
        let err = parse("launch").unwrap_err();
        assert_eq!(err.to_string(), "unknown command 'launch', type 'help'");
    }
}
