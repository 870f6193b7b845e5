use crate::error::{AppError, AppResult};
use crate::palette::PaletteKind;
use crate::portal::gpa::Grade;

use super::spec::command_registry;
use super::types::{Command, SearchScope};

pub fn parse_command_text(input: &str) -> AppResult<Command> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_argument("command must not be empty"));
    }

    let (id, args_text) = split_first_token(trimmed);

    if !command_registry().iter().any(|spec| spec.id == id) {
        return Err(AppError::invalid_argument(format!("unknown command: {id}")));
    }

    match id {
        "goto" => Ok(Command::Goto {
            name: single_token(id, "page", args_text)?.to_string(),
        }),
        "history-back" => parse_no_args(id, args_text, Command::HistoryBack),
        "history-forward" => parse_no_args(id, args_text, Command::HistoryForward),
        "history-go" => parse_history_go(args_text),
        "history" => parse_no_args(id, args_text, Command::OpenHistory),
        "search" => parse_no_args(id, args_text, Command::OpenSearch),
        "submit-search" => parse_submit_search(args_text),
        "clear-search" => parse_no_args(id, args_text, Command::ClearSearch),
        "filter-department" => Ok(Command::FilterDepartment {
            department: single_token(id, "department", args_text)?.to_string(),
        }),
        "filter-category" => Ok(Command::FilterCategory {
            category: single_token(id, "category", args_text)?.to_string(),
        }),
        "login" => parse_no_args(id, args_text, Command::Login),
        "logout" => parse_no_args(id, args_text, Command::Logout),
        "theme-toggle" => parse_no_args(id, args_text, Command::ThemeToggle),
        "menu-toggle" => parse_no_args(id, args_text, Command::MenuToggle),
        "add-course" => Ok(Command::AddCourse {
            name: (!args_text.is_empty()).then(|| args_text.to_string()),
        }),
        "rename-course" => {
            let (position, name) = split_first_token(args_text);
            let index = parse_position(id, position)?;
            Ok(Command::RenameCourse {
                index,
                name: required_text(id, "name", name)?,
            })
        }
        "set-credits" => {
            let (index, value) = position_and_value(id, "credits", args_text)?;
            let credits = value
                .parse::<u8>()
                .map_err(|_| AppError::invalid_argument("credits must be an integer"))?;
            Ok(Command::SetCredits { index, credits })
        }
        "set-grade" => {
            let (index, value) = position_and_value(id, "grade", args_text)?;
            let grade = Grade::parse(value)
                .ok_or_else(|| AppError::invalid_argument(format!("unknown grade: {value}")))?;
            Ok(Command::SetGrade { index, grade })
        }
        "remove-course" => Ok(Command::RemoveCourse {
            index: parse_position(id, single_token(id, "n", args_text)?)?,
        }),
        "semester-name" => Ok(Command::SemesterName {
            name: required_text(id, "name", args_text)?,
        }),
        "save-semester" => parse_no_args(id, args_text, Command::SaveSemester),
        "export-gpa" => parse_no_args(id, args_text, Command::ExportGpa),
        "view-resource" => Ok(Command::ViewResource {
            id: parse_id(id, args_text)?,
        }),
        "download-resource" => Ok(Command::DownloadResource {
            id: parse_id(id, args_text)?,
        }),
        "bookmark" => Ok(Command::Bookmark {
            id: parse_id(id, args_text)?,
        }),
        "upload-file" => Ok(Command::UploadFile {
            path: required_text(id, "path", args_text)?,
        }),
        "convert-url" => Ok(Command::ConvertUrl {
            url: single_token(id, "url", args_text)?.to_string(),
        }),
        "remove-file" => Ok(Command::RemoveFile {
            index: parse_position(id, single_token(id, "n", args_text)?)?,
        }),
        "preview-file" => Ok(Command::PreviewFile {
            index: parse_position(id, single_token(id, "n", args_text)?)?,
        }),
        "download-file" => Ok(Command::DownloadFile {
            index: parse_position(id, single_token(id, "n", args_text)?)?,
        }),
        "open-chat" => Ok(Command::OpenChat {
            id: parse_id(id, args_text)?,
        }),
        "send" => Ok(Command::Send {
            message: required_text(id, "message", args_text)?,
        }),
        "download-recent" => Ok(Command::DownloadRecent {
            id: parse_id(id, args_text)?,
        }),
        "select-next" => parse_no_args(id, args_text, Command::SelectNext),
        "select-prev" => parse_no_args(id, args_text, Command::SelectPrev),
        "activate" => parse_no_args(id, args_text, Command::Activate),
        "open-palette" => parse_open_palette(args_text),
        "close-palette" => parse_no_args(id, args_text, Command::ClosePalette),
        "cancel" => parse_no_args(id, args_text, Command::Cancel),
        "quit" => parse_no_args(id, args_text, Command::Quit),
        _ => Err(AppError::unsupported(
            "command parser is out of sync with registry",
        )),
    }
}

fn parse_no_args(id: &str, args_text: &str, cmd: Command) -> AppResult<Command> {
    if args_text.is_empty() {
        return Ok(cmd);
    }
    Err(AppError::invalid_argument(format!(
        "{id} does not accept arguments"
    )))
}

fn single_token<'a>(id: &str, name: &str, args_text: &'a str) -> AppResult<&'a str> {
    let mut parts = args_text.split_whitespace();
    let Some(token) = parts.next() else {
        return Err(AppError::invalid_argument(format!(
            "{id} requires 1 argument: {name}"
        )));
    };
    if parts.next().is_some() {
        return Err(AppError::invalid_argument(format!(
            "{id} accepts exactly 1 argument"
        )));
    }
    Ok(token)
}

fn required_text(id: &str, name: &str, args_text: &str) -> AppResult<String> {
    let text = args_text.trim();
    if text.is_empty() {
        return Err(AppError::invalid_argument(format!(
            "{id} requires 1 argument: {name}"
        )));
    }
    Ok(text.to_string())
}

/// Converts a 1-based position into an index.
fn parse_position(id: &str, text: &str) -> AppResult<usize> {
    let position = text
        .parse::<usize>()
        .map_err(|_| AppError::invalid_argument(format!("{id} position must be an integer")))?;
    if position < 1 {
        return Err(AppError::invalid_argument("position must be >= 1"));
    }
    Ok(position - 1)
}

fn position_and_value<'a>(id: &str, name: &str, args_text: &'a str) -> AppResult<(usize, &'a str)> {
    let mut parts = args_text.split_whitespace();
    let (Some(position), Some(value), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(AppError::invalid_argument(format!(
            "{id} requires 2 arguments: n {name}"
        )));
    };
    Ok((parse_position(id, position)?, value))
}

fn parse_id(id: &str, args_text: &str) -> AppResult<u32> {
    single_token(id, "id", args_text)?
        .parse::<u32>()
        .map_err(|_| AppError::invalid_argument(format!("{id} id must be an integer")))
}

fn parse_history_go(args_text: &str) -> AppResult<Command> {
    let delta = single_token("history-go", "delta", args_text)?
        .parse::<isize>()
        .map_err(|_| AppError::invalid_argument("history-go delta must be an integer"))?;
    if delta == 0 {
        return Err(AppError::invalid_argument("history-go delta must not be 0"));
    }
    Ok(Command::HistoryGo { delta })
}

fn parse_open_palette(args_text: &str) -> AppResult<Command> {
    if args_text.is_empty() {
        return Err(AppError::invalid_argument(
            "open-palette requires 1 argument: kind",
        ));
    }

    let (kind_text, seed) = split_first_token(args_text);
    let seed = (!seed.is_empty()).then(|| seed.to_string());
    let kind = PaletteKind::parse(kind_text)
        .ok_or_else(|| AppError::invalid_argument("unknown palette kind"))?;

    Ok(Command::OpenPalette { kind, seed })
}

fn parse_submit_search(args_text: &str) -> AppResult<Command> {
    let trimmed = args_text.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_argument(
            "submit-search requires at least 1 argument: query",
        ));
    }

    let mut query = trimmed.to_string();
    let mut scope = None;

    if let Some((head, tail)) = split_last_token(trimmed)
        && let Some(parsed) = SearchScope::parse(tail)
    {
        if head.trim().is_empty() {
            return Err(AppError::invalid_argument(
                "submit-search requires at least 1 argument: query",
            ));
        }
        query = head.trim().to_string();
        scope = Some(parsed);
    }

    Ok(Command::SubmitSearch { query, scope })
}

fn split_first_token(input: &str) -> (&str, &str) {
    let trimmed = input.trim();
    match trimmed.find(char::is_whitespace) {
        Some(index) => (&trimmed[..index], trimmed[index..].trim_start()),
        None => (trimmed, ""),
    }
}

fn split_last_token(input: &str) -> Option<(&str, &str)> {
    let trimmed = input.trim_end();
    if trimmed.is_empty() {
        return None;
    }

    trimmed
        .rfind(char::is_whitespace)
        .map(|index| (&trimmed[..index], trimmed[index + 1..].trim_start()))
}

#[cfg(test)]
mod tests {
    use super::parse_command_text;
    use crate::command::{Command, SearchScope};
    use crate::palette::PaletteKind;
    use crate::portal::gpa::Grade;

    #[test]
    fn parses_basic_commands() {
        assert_eq!(
            parse_command_text("goto library").expect("parse should succeed"),
            Command::Goto {
                name: "library".to_string()
            }
        );
        assert_eq!(
            parse_command_text("history-go -2").expect("parse should succeed"),
            Command::HistoryGo { delta: -2 }
        );
        assert_eq!(
            parse_command_text("open-palette search quantum").expect("parse should succeed"),
            Command::OpenPalette {
                kind: PaletteKind::Search,
                seed: Some("quantum".to_string()),
            }
        );
        assert_eq!(
            parse_command_text("add-course").expect("parse should succeed"),
            Command::AddCourse { name: None }
        );
    }

    #[test]
    fn positions_are_one_based() {
        assert_eq!(
            parse_command_text("set-grade 2 b+").expect("parse should succeed"),
            Command::SetGrade {
                index: 1,
                grade: Grade::BPlus,
            }
        );
        assert_eq!(
            parse_command_text("rename-course 1 Linear Algebra").expect("parse should succeed"),
            Command::RenameCourse {
                index: 0,
                name: "Linear Algebra".to_string(),
            }
        );
        assert!(parse_command_text("remove-file 0").is_err());
        assert!(parse_command_text("set-credits 1").is_err());
    }

    #[test]
    fn parse_submit_search_accepts_optional_scope() {
        assert_eq!(
            parse_command_text("submit-search machine learning").expect("parse should succeed"),
            Command::SubmitSearch {
                query: "machine learning".to_string(),
                scope: None,
            }
        );
        assert_eq!(
            parse_command_text("submit-search react blog").expect("parse should succeed"),
            Command::SubmitSearch {
                query: "react".to_string(),
                scope: Some(SearchScope::Blog),
            }
        );
        assert!(parse_command_text("submit-search blog").is_ok());
    }

    #[test]
    fn rejects_unknown_and_extra_arguments() {
        assert!(parse_command_text("fly").is_err());
        assert!(parse_command_text("quit now").is_err());
        assert!(parse_command_text("   ").is_err());
        assert!(parse_command_text("history-go 0").is_err());
    }
}
