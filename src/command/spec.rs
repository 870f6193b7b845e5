use super::types::{ArgKind, ArgSpec, CommandSpec};

const NO_ARGS: [ArgSpec; 0] = [];

const fn arg(name: &'static str, kind: ArgKind, required: bool) -> ArgSpec {
    ArgSpec {
        name,
        kind,
        required,
    }
}

const ARGS_GOTO: [ArgSpec; 1] = [arg("page", ArgKind::Page, true)];
const ARGS_HISTORY_GO: [ArgSpec; 1] = [arg("delta", ArgKind::Integer, true)];
const ARGS_SUBMIT_SEARCH: [ArgSpec; 2] = [
    arg("query", ArgKind::Text, true),
    arg("scope", ArgKind::String, false),
];
const ARGS_DEPARTMENT: [ArgSpec; 1] = [arg("department", ArgKind::String, true)];
const ARGS_CATEGORY: [ArgSpec; 1] = [arg("category", ArgKind::String, true)];
const ARGS_ADD_COURSE: [ArgSpec; 1] = [arg("name", ArgKind::Text, false)];
const ARGS_RENAME_COURSE: [ArgSpec; 2] = [
    arg("n", ArgKind::Integer, true),
    arg("name", ArgKind::Text, true),
];
const ARGS_SET_CREDITS: [ArgSpec; 2] = [
    arg("n", ArgKind::Integer, true),
    arg("credits", ArgKind::Integer, true),
];
const ARGS_SET_GRADE: [ArgSpec; 2] = [
    arg("n", ArgKind::Integer, true),
    arg("grade", ArgKind::String, true),
];
const ARGS_POSITION: [ArgSpec; 1] = [arg("n", ArgKind::Integer, true)];
const ARGS_NAME: [ArgSpec; 1] = [arg("name", ArgKind::Text, true)];
const ARGS_ID: [ArgSpec; 1] = [arg("id", ArgKind::Integer, true)];
const ARGS_PATH: [ArgSpec; 1] = [arg("path", ArgKind::Text, true)];
const ARGS_URL: [ArgSpec; 1] = [arg("url", ArgKind::String, true)];
const ARGS_MESSAGE: [ArgSpec; 1] = [arg("message", ArgKind::Text, true)];
const ARGS_OPEN_PALETTE: [ArgSpec; 2] = [
    arg("kind", ArgKind::String, true),
    arg("seed", ArgKind::Text, false),
];

const fn spec(id: &'static str, title: &'static str, args: &'static [ArgSpec]) -> CommandSpec {
    CommandSpec { id, title, args }
}

const COMMAND_SPECS: [CommandSpec; 40] = [
    spec("goto", "Go to Page", &ARGS_GOTO),
    spec("history-back", "History Back", &NO_ARGS),
    spec("history-forward", "History Forward", &NO_ARGS),
    spec("history-go", "History Jump", &ARGS_HISTORY_GO),
    spec("history", "Open History", &NO_ARGS),
    spec("search", "Search", &NO_ARGS),
    spec("submit-search", "Submit Search", &ARGS_SUBMIT_SEARCH),
    spec("clear-search", "Clear Search", &NO_ARGS),
    spec("filter-department", "Filter by Department", &ARGS_DEPARTMENT),
    spec("filter-category", "Filter by Category", &ARGS_CATEGORY),
    spec("login", "Log In", &NO_ARGS),
    spec("logout", "Log Out", &NO_ARGS),
    spec("theme-toggle", "Toggle Theme", &NO_ARGS),
    spec("menu-toggle", "Toggle Menu", &NO_ARGS),
    spec("add-course", "Add Course", &ARGS_ADD_COURSE),
    spec("rename-course", "Rename Course", &ARGS_RENAME_COURSE),
    spec("set-credits", "Set Course Credits", &ARGS_SET_CREDITS),
    spec("set-grade", "Set Course Grade", &ARGS_SET_GRADE),
    spec("remove-course", "Remove Course", &ARGS_POSITION),
    spec("semester-name", "Rename Semester", &ARGS_NAME),
    spec("save-semester", "Save Semester", &NO_ARGS),
    spec("export-gpa", "Export GPA Report", &NO_ARGS),
    spec("view-resource", "View Resource", &ARGS_ID),
    spec("download-resource", "Download Resource", &ARGS_ID),
    spec("bookmark", "Toggle Bookmark", &ARGS_ID),
    spec("upload-file", "Upload File", &ARGS_PATH),
    spec("convert-url", "Convert URL to PDF", &ARGS_URL),
    spec("remove-file", "Remove File", &ARGS_POSITION),
    spec("preview-file", "Preview File", &ARGS_POSITION),
    spec("download-file", "Download File", &ARGS_POSITION),
    spec("open-chat", "Open Chat", &ARGS_ID),
    spec("send", "Send Message", &ARGS_MESSAGE),
    spec("download-recent", "Download Recent File", &ARGS_ID),
    spec("select-next", "Select Next", &NO_ARGS),
    spec("select-prev", "Select Previous", &NO_ARGS),
    spec("activate", "Activate Selection", &NO_ARGS),
    spec("open-palette", "Open Palette", &ARGS_OPEN_PALETTE),
    spec("close-palette", "Close Palette", &NO_ARGS),
    spec("cancel", "Cancel", &NO_ARGS),
    spec("quit", "Quit", &NO_ARGS),
];

pub fn command_registry() -> &'static [CommandSpec] {
    &COMMAND_SPECS
}

pub fn all_command_specs() -> Vec<CommandSpec> {
    COMMAND_SPECS.to_vec()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::command_registry;

    #[test]
    fn command_ids_are_unique() {
        let ids: BTreeSet<_> = command_registry().iter().map(|spec| spec.id).collect();
        assert_eq!(ids.len(), command_registry().len());
    }
}
