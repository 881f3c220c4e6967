use regex::Regex;
use std::sync::LazyLock;

static CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*```[\w-]*[ \t]*\r?\n?").unwrap());
static BOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());
static HEADING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^#+[ \t]+(.*)$").unwrap());
static BLOCKQUOTE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^>[ \t](.*)$").unwrap());
static RULE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*(?:[-*][ \t]*){3,}$").unwrap());
static IMAGE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"!\[[^\]]*\]\([^)]*\)").unwrap());
static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\((?:https?://|/)[^)\s]*\)").unwrap());

/// Strip markdown decoration from an LLM reply that should have been plain code.
///
/// Code inside fences and backticks is kept verbatim; only the fence lines go.
pub fn remove_markdown(text: &str) -> String {
    let text = CODE_FENCE.replace_all(text, "");
    let text = BOLD.replace_all(&text, "$1");
    let text = HEADING.replace_all(&text, "$1");
    let text = BLOCKQUOTE.replace_all(&text, "$1");
    let text = RULE.replace_all(&text, "");
    let text = IMAGE.replace_all(&text, "");
    let text = LINK.replace_all(&text, "$1");
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_fences_and_keeps_code() {
        let reply = "```javascript\nconst { test } = require('@playwright/test');\nconst msg = `hi ${name}`;\n```\n";
        assert_eq!(
            remove_markdown(reply),
            "const { test } = require('@playwright/test');\nconst msg = `hi ${name}`;"
        );
    }

    #[test]
    fn test_strips_decoration() {
        let reply = "# Login tests\n> note this\n**Important** step\n---\nSee [docs](https://playwright.dev) ![shot](/a.png)";
        assert_eq!(
            remove_markdown(reply),
            "Login tests\nnote this\nImportant step\n\nSee docs"
        );
    }

    #[test]
    fn test_leaves_code_indexing_alone() {
        let code = "const first = items[0](arg);\nconst my_var_name = 1;";
        assert_eq!(remove_markdown(code), code);
    }
}
