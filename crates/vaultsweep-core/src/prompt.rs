use std::collections::VecDeque;

/// Asks the user a yes/no question. Blocks until answered.
///
/// Implementations must return `default` whenever no usable answer is
/// available (end of input, read error, timeout).
pub trait Confirm {
    fn confirm(&mut self, question: &str, default: bool) -> bool;
}

/// Receives one progress line at a time. Fire-and-forget.
pub trait Announce {
    fn announce(&mut self, line: &str);
}

// ─── Confirm implementations ────────────────────────────────

/// Answers every question the same way (`--yes` / `--no`).
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub bool);

impl Confirm for FixedAnswer {
    fn confirm(&mut self, _question: &str, _default: bool) -> bool {
        self.0
    }
}

/// Replays a queue of answers, falling back to the default once it runs dry.
/// Records every question it was asked.
#[derive(Debug, Clone, Default)]
pub struct ScriptedAnswers {
    answers: VecDeque<bool>,
    pub asked: Vec<String>,
}

impl ScriptedAnswers {
    pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            asked: Vec::new(),
        }
    }
}

impl Confirm for ScriptedAnswers {
    fn confirm(&mut self, question: &str, default: bool) -> bool {
        self.asked.push(question.to_string());
        self.answers.pop_front().unwrap_or(default)
    }
}

// ─── Announce implementations ───────────────────────────────

/// Keeps every announced line in memory.
#[derive(Debug, Clone, Default)]
pub struct ActionLog {
    pub lines: Vec<String>,
}

impl ActionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|line| line.contains(needle))
    }
}

impl Announce for ActionLog {
    fn announce(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl Announce for Silent {
    fn announce(&mut self, _line: &str) {}
}
