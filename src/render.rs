use std::io::{self, Write};

use crate::model::{Message, MessageRole};

pub const TITLE: &str = "Network Scripting Assistant";
pub const INPUT_PLACEHOLDER: &str = "Describe the network task you want to automate...";
const INTRO: &str = "Hello! I'm an AI-powered assistant designed to help network engineers.\n\
Just tell me the task you want to automate, and I will generate a\n\
network automation script for you.";
const CODE_LANGUAGE: &str = "python";

pub fn render_banner(out: &mut impl Write, model: &str) -> io::Result<()> {
    writeln!(out, "{TITLE}")?;
    writeln!(out, "{}", "=".repeat(TITLE.len()))?;
    writeln!(out, "model: {model}")?;
    writeln!(out)?;
    writeln!(out, "{INTRO}")?;
    writeln!(out)?;
    writeln!(
        out,
        "type a task, '/history' to redraw the conversation, or 'exit' to quit"
    )?;
    writeln!(out)
}

pub fn render_message(out: &mut impl Write, message: &Message) -> io::Result<()> {
    writeln!(out, "[{}]", message.role.as_str())?;
    match message.role {
        MessageRole::User => writeln!(out, "{}", message.content.trim_end())?,
        MessageRole::Assistant => render_code_block(out, &message.content)?,
    }
    writeln!(out)
}

pub fn render_history(out: &mut impl Write, history: &[Message]) -> io::Result<()> {
    if history.is_empty() {
        writeln!(out, "(no messages yet)")?;
        return writeln!(out);
    }

    history
        .iter()
        .try_for_each(|message| render_message(out, message))
}

pub fn render_code_block(out: &mut impl Write, content: &str) -> io::Result<()> {
    let body = strip_outer_fence(content);
    let fence = fence_for(body);
    writeln!(out, "{fence}{CODE_LANGUAGE}")?;
    if !body.is_empty() {
        writeln!(out, "{body}")?;
    }
    writeln!(out, "{fence}")
}

/// A backtick fence longer than any fence line inside `body`, so fences the
/// model left in its reply cannot close the block early.
fn fence_for(body: &str) -> String {
    let longest_inner = body
        .lines()
        .map(|line| line.trim_start().chars().take_while(|c| *c == '`').count())
        .max()
        .unwrap_or(0);
    "`".repeat(longest_inner.max(2) + 1)
}

/// Unwraps a reply that is entirely one fenced block, so it is not fenced
/// twice. A reply that is only a fence line is empty. Anything else is
/// returned trimmed but otherwise untouched.
fn strip_outer_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some((_info, after_open)) = rest.split_once('\n') else {
        // A lone opening fence line carries no content.
        return "";
    };
    let Some(inner) = after_open.trim_end().strip_suffix("```") else {
        return trimmed;
    };
    if inner.contains("\n```") {
        return trimmed;
    }
    inner.trim_end_matches('\n')
}

#[cfg(test)]
mod tests {
    use super::{
        render_banner, render_code_block, render_history, render_message, strip_outer_fence,
    };
    use crate::model::Message;

    fn rendered(f: impl FnOnce(&mut Vec<u8>) -> std::io::Result<()>) -> String {
        let mut out = Vec::new();
        f(&mut out).expect("rendering to a buffer should succeed");
        String::from_utf8(out).expect("output should be utf-8")
    }

    #[test]
    fn banner_shows_title_model_and_intro() {
        let text = rendered(|out| render_banner(out, "gemini-2.0-flash-lite"));
        assert!(text.starts_with("Network Scripting Assistant\n"));
        assert!(text.contains("model: gemini-2.0-flash-lite"));
        assert!(text.contains("help network engineers"));
    }

    #[test]
    fn user_message_renders_as_plain_text() {
        let text = rendered(|out| render_message(out, &Message::user("backup all switches")));
        assert_eq!(text, "[user]\nbackup all switches\n\n");
    }

    #[test]
    fn assistant_message_renders_as_python_code_block() {
        let text = rendered(|out| render_message(out, &Message::assistant("import netmiko\n")));
        assert_eq!(text, "[assistant]\n```python\nimport netmiko\n```\n\n");
    }

    #[test]
    fn assistant_fenced_reply_is_not_fenced_twice() {
        let reply = "```python\nfrom netmiko import ConnectHandler\nprint('ok')\n```\n";
        let text = rendered(|out| render_message(out, &Message::assistant(reply)));
        assert_eq!(
            text,
            "[assistant]\n```python\nfrom netmiko import ConnectHandler\nprint('ok')\n```\n\n"
        );
    }

    #[test]
    fn strip_outer_fence_keeps_text_with_several_blocks() {
        let reply = "```python\na = 1\n```\nsome prose\n```python\nb = 2\n```";
        assert_eq!(strip_outer_fence(reply), reply);
    }

    #[test]
    fn reply_of_only_a_fence_renders_an_empty_block() {
        assert_eq!(strip_outer_fence("```"), "");
        assert_eq!(strip_outer_fence("  ```python  "), "");
        let text = rendered(|out| render_code_block(out, "```"));
        assert_eq!(text, "```python\n```\n");
    }

    #[test]
    fn reply_with_prose_around_a_block_gets_a_longer_fence() {
        let reply = "```python\nprint(1)\n```\nRun it with python3.";
        let text = rendered(|out| render_code_block(out, reply));
        assert_eq!(
            text,
            "````python\n```python\nprint(1)\n```\nRun it with python3.\n````\n"
        );
    }

    #[test]
    fn strip_outer_fence_keeps_unfenced_text() {
        assert_eq!(strip_outer_fence("  print(1)  \n"), "print(1)");
    }

    #[test]
    fn history_renders_in_order() {
        let history = vec![
            Message::user("task one"),
            Message::assistant("print(1)"),
            Message::user("task two"),
        ];
        let text = rendered(|out| render_history(out, &history));
        let first = text.find("task one").expect("first task should render");
        let code = text.find("print(1)").expect("reply should render");
        let second = text.find("task two").expect("second task should render");
        assert!(first < code && code < second);
    }

    #[test]
    fn empty_history_renders_placeholder() {
        let text = rendered(|out| render_history(out, &[]));
        assert!(text.contains("(no messages yet)"));
    }
}
