use console::{style, Term};

use crate::flow::{FlowState, Notice, Phase};

/// Everything the user sees, derived from [`FlowState`] alone.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Page {
    pub busy: bool,
    pub submit_enabled: bool,
    pub title: Option<String>,
    pub thumbnail_url: Option<String>,
    pub links: Vec<Link>,
    pub message: Option<Message>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// One-based, as shown to the user.
    pub number: usize,
    pub label: String,
    pub href: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Error,
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub kind: MessageKind,
    pub text: String,
}

/// Display surface the flow renders onto.
pub trait Screen {
    fn set_busy(&mut self, busy: bool);

    /// Replaces whatever was shown before with `page`.
    fn show(&mut self, page: &Page);
}

pub fn project(state: &FlowState) -> Page {
    let busy = state.phase == Phase::Busy;
    let result = state.result.as_ref();

    let links = result
        .map(|info| {
            info.formats
                .iter()
                .enumerate()
                .map(|(i, format)| Link {
                    number: i + 1,
                    label: format.label(),
                    href: format.target_url.clone(),
                })
                .collect()
        })
        .unwrap_or_default();

    let message = state.notice.as_ref().map(|notice| match notice {
        Notice::Error(text) => Message {
            kind: MessageKind::Error,
            text: text.clone(),
        },
        Notice::Success { text, .. } => Message {
            kind: MessageKind::Success,
            text: text.clone(),
        },
    });

    Page {
        busy,
        submit_enabled: !busy,
        title: result.map(|info| info.title.clone()),
        thumbnail_url: result.map(|info| info.thumbnail_url.clone()),
        links,
        message,
    }
}

impl Page {
    pub fn to_json(&self) -> serde_json::Value {
        let links = self
            .links
            .iter()
            .map(|link| {
                serde_json::json!({
                    "number": link.number,
                    "label": link.label,
                    "href": link.href,
                })
            })
            .collect::<Vec<_>>();

        let message = self.message.as_ref().map(|message| {
            let kind = match message.kind {
                MessageKind::Error => "error",
                MessageKind::Success => "success",
            };

            serde_json::json!({ "kind": kind, "text": message.text })
        });

        serde_json::json!({
            "busy": self.busy,
            "title": self.title,
            "thumbnail": self.thumbnail_url,
            "links": links,
            "message": message,
        })
    }

    fn same_result(&self, other: &Page) -> bool {
        self.title == other.title && self.thumbnail_url == other.thumbnail_url && self.links == other.links
    }
}

/// Prints pages to stdout, either styled or as JSON lines.
pub struct TerminalScreen {
    term: Term,
    json: bool,
    last: Option<Page>,
}

impl TerminalScreen {
    pub fn new(json: bool) -> Self {
        Self {
            term: Term::stdout(),
            json,
            last: None,
        }
    }

    fn write_line(&self, line: &str) {
        if let Err(err) = self.term.write_line(line) {
            log::warn!("Failed to write to terminal: {}", err);
        }
    }

    fn message_line(message: &Message) -> String {
        match message.kind {
            MessageKind::Error => style(&message.text).red().to_string(),
            MessageKind::Success => style(&message.text).green().to_string(),
        }
    }

    fn page_lines(page: &Page) -> Vec<String> {
        let mut lines = Vec::new();

        if let Some(title) = &page.title {
            lines.push(style(title).bold().to_string());
        }

        if let Some(thumbnail_url) = &page.thumbnail_url {
            lines.push(format!("Thumbnail: {}", style(thumbnail_url).dim()));
        }

        for link in &page.links {
            lines.push(format!(
                "  [{}] {} {}",
                link.number,
                style(&link.label).cyan(),
                style(&link.href).dim()
            ));
        }

        if let Some(message) = &page.message {
            lines.push(Self::message_line(message));
        }

        lines
    }

    /// Lines to print for `page`, given what was printed since the last busy phase.
    fn lines_for(&mut self, page: &Page) -> Vec<String> {
        if page.busy || self.last.as_ref() == Some(page) {
            return Vec::new();
        }

        let lines = if self.json {
            vec![page.to_json().to_string()]
        } else {
            match &self.last {
                // Only the notice changed under an unchanged result.
                Some(last) if last.same_result(page) && !page.links.is_empty() => {
                    page.message.iter().map(Self::message_line).collect()
                }
                _ => Self::page_lines(page),
            }
        };

        self.last = Some(page.clone());
        lines
    }
}

impl Screen for TerminalScreen {
    fn set_busy(&mut self, busy: bool) {
        if busy {
            // Every lookup ends in a page of its own, even one equal to the previous.
            self.last = None;

            if !self.json {
                self.write_line(&style("Fetching video information...").yellow().to_string());
            }
        }
    }

    fn show(&mut self, page: &Page) {
        for line in self.lines_for(page) {
            self.write_line(&line);
        }
    }
}
