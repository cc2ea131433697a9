use std::fmt::Write as _;

/// What the number after an indexed command refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    /// Position in `/history`.
    Session,
    /// Position in the document list of the last answer.
    Document,
}

/// A slash command as shown in `/help` and used for completion.
#[derive(Debug, Clone, Copy)]
pub struct CommandSpec {
    pub name: &'static str,
    pub arg: Option<ArgKind>,
    pub about: &'static str,
}

pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec { name: "/new", arg: None, about: "새 대화" },
    CommandSpec { name: "/history", arg: None, about: "대화 기록 보기" },
    CommandSpec { name: "/open", arg: Some(ArgKind::Session), about: "N번 대화 열기" },
    CommandSpec { name: "/delete", arg: Some(ArgKind::Session), about: "N번 대화 삭제" },
    CommandSpec { name: "/docs", arg: None, about: "현재 문서 목록 (/docs date: 최신순)" },
    CommandSpec { name: "/copy", arg: Some(ArgKind::Document), about: "N번 문서 경로 복사" },
    CommandSpec { name: "/summarize", arg: Some(ArgKind::Document), about: "N번 문서 요약" },
    CommandSpec { name: "/logout", arg: None, about: "로그아웃" },
    CommandSpec { name: "/help", arg: None, about: "명령 목록" },
];

pub fn find(name: &str) -> Option<&'static CommandSpec> {
    COMMANDS.iter().find(|cmd| cmd.name == name)
}

/// `/help` text built from the command table.
pub fn help_text() -> String {
    let mut help = String::new();
    for cmd in COMMANDS {
        let usage = match cmd.arg {
            Some(_) => format!("{} N", cmd.name),
            None => cmd.name.to_string(),
        };
        let _ = writeln!(help, "{:<16}{}", usage, cmd.about);
    }
    help.push_str(&format!("{:<16}{}", "quit", "종료"));
    help
}

/// A line typed at the chat prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Ask(String),
    NewChat,
    History,
    Open(usize),
    Delete(usize),
    /// Reprints the document list, re-sorted newest first with `date`.
    Documents { by_date: bool },
    Copy(usize),
    Summarize(usize),
    Logout,
    Help,
    Quit,
    /// A slash command that could not be understood.
    Invalid(String),
}

impl Command {
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        if line == "quit" || line == "exit" {
            return Some(Self::Quit);
        }
        if !line.starts_with('/') {
            return Some(Self::Ask(line.to_string()));
        }

        let mut parts = line.split_whitespace();
        let name = parts.next().unwrap_or_default();
        let Some(cmd) = find(name) else {
            return Some(Self::Invalid(format!("알 수 없는 명령입니다: {}", name)));
        };

        if cmd.name == "/docs" {
            let by_date = parts.next() == Some("date");
            return Some(Self::Documents { by_date });
        }

        let index = match cmd.arg {
            Some(_) => match parts.next().and_then(|a| a.parse::<usize>().ok()) {
                Some(n) if n > 0 => n,
                _ => return Some(Self::Invalid(format!("{} 뒤에 번호를 입력하세요.", name))),
            },
            None => 0,
        };

        Some(match cmd.name {
            "/new" => Self::NewChat,
            "/history" => Self::History,
            "/open" => Self::Open(index),
            "/delete" => Self::Delete(index),
            "/copy" => Self::Copy(index),
            "/summarize" => Self::Summarize(index),
            "/logout" => Self::Logout,
            _ => Self::Help,
        })
    }
}
