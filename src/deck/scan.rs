use crate::deck::context::{ParseContext, ParseEvent};
use crate::utils::error::{Result, SimError};
use regex::Regex;

/// Section markers of the deck format, in their canonical order.
pub const SECTIONS: &[&str] = &[
    "RUNSPEC", "GRID", "EDIT", "PROPS", "REGIONS", "SOLUTION", "SUMMARY", "SCHEDULE",
];

#[derive(Debug, Clone, PartialEq)]
pub enum DeckItem {
    Value(String),
    Defaulted,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeckRecord {
    pub items: Vec<DeckItem>,
}

impl DeckRecord {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn str_at(&self, idx: usize) -> Option<&str> {
        match self.items.get(idx) {
            Some(DeckItem::Value(v)) => Some(v.as_str()),
            _ => None,
        }
    }

    pub fn f64_at(&self, idx: usize) -> Option<f64> {
        self.str_at(idx).and_then(|v| v.parse::<f64>().ok())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeckKeyword {
    pub name: String,
    pub line: usize,
    pub records: Vec<DeckRecord>,
}

impl DeckKeyword {
    fn item(&self, record: usize, idx: usize) -> Option<&DeckItem> {
        self.records.get(record).and_then(|r| r.items.get(idx))
    }

    fn err(&self, reason: String) -> SimError {
        SimError::DeckError {
            keyword: self.name.clone(),
            line: self.line,
            reason,
        }
    }

    pub fn require_str(&self, record: usize, idx: usize) -> Result<&str> {
        match self.item(record, idx) {
            Some(DeckItem::Value(v)) => Ok(v.as_str()),
            Some(DeckItem::Defaulted) => {
                Err(self.err(format!("item {} of record {} cannot be defaulted", idx, record)))
            }
            None => Err(self.err(format!("record {} has no item {}", record, idx))),
        }
    }

    pub fn require_f64(&self, record: usize, idx: usize) -> Result<f64> {
        let raw = self.require_str(record, idx)?;
        raw.parse::<f64>()
            .map_err(|_| self.err(format!("item {} of record {}: '{}' is not a number", idx, record, raw)))
    }

    pub fn require_usize(&self, record: usize, idx: usize) -> Result<usize> {
        let raw = self.require_str(record, idx)?;
        raw.parse::<usize>()
            .map_err(|_| self.err(format!("item {} of record {}: '{}' is not an integer", idx, record, raw)))
    }

    pub fn f64_or(&self, record: usize, idx: usize, default: f64) -> Result<f64> {
        match self.item(record, idx) {
            Some(DeckItem::Value(v)) => v
                .parse::<f64>()
                .map_err(|_| self.err(format!("item {} of record {}: '{}' is not a number", idx, record, v))),
            _ => Ok(default),
        }
    }

    pub fn usize_or(&self, record: usize, idx: usize, default: usize) -> Result<usize> {
        match self.item(record, idx) {
            Some(DeckItem::Value(v)) => v
                .parse::<usize>()
                .map_err(|_| self.err(format!("item {} of record {}: '{}' is not an integer", idx, record, v))),
            _ => Ok(default),
        }
    }

    pub fn str_or<'a>(&'a self, record: usize, idx: usize, default: &'a str) -> &'a str {
        match self.item(record, idx) {
            Some(DeckItem::Value(v)) => v.as_str(),
            _ => default,
        }
    }
}

/// Ordered keyword view of an input case.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Deck {
    keywords: Vec<DeckKeyword>,
}

impl Deck {
    pub fn keywords(&self) -> &[DeckKeyword] {
        &self.keywords
    }

    pub fn has_keyword(&self, name: &str) -> bool {
        self.keywords.iter().any(|kw| kw.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&DeckKeyword> {
        self.keywords.iter().find(|kw| kw.name == name)
    }

    pub fn all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a DeckKeyword> {
        self.keywords.iter().filter(move |kw| kw.name == name)
    }

    /// Keywords strictly between a section marker and the next marker.
    /// Empty when the section is absent.
    pub fn section(&self, name: &str) -> &[DeckKeyword] {
        let start = match self.keywords.iter().position(|kw| kw.name == name) {
            Some(pos) => pos + 1,
            None => return &[],
        };
        let end = self.keywords[start..]
            .iter()
            .position(|kw| SECTIONS.contains(&kw.name.as_str()))
            .map(|off| start + off)
            .unwrap_or(self.keywords.len());
        &self.keywords[start..end]
    }
}

/// Reads deck text into an ordered keyword list.
///
/// Supported input shape: `--` comments, slash-terminated records that
/// may span lines, `N*` defaults and `N*value` repeats, quoted strings,
/// keyword lists ended by a lone slash, and a raw single-line TITLE
/// record. A slash outside any record is routed through the parse
/// context as a recoverable event.
pub fn scan(input: &str, ctx: &ParseContext) -> Result<Deck> {
    let keyword_re = Regex::new(r"^[A-Z][A-Z0-9]{0,7}$").unwrap();

    let mut keywords: Vec<DeckKeyword> = Vec::new();
    let mut pending: Vec<DeckItem> = Vec::new();
    let mut collecting = false;
    let mut expect_title = false;

    for (lineno, raw_line) in input.lines().enumerate() {
        let lineno = lineno + 1;
        let line = match raw_line.find("--") {
            Some(pos) => &raw_line[..pos],
            None => raw_line,
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if expect_title {
            let kw = keywords.last_mut().expect("TITLE keyword just pushed");
            kw.records.push(DeckRecord {
                items: vec![DeckItem::Value(line.to_string())],
            });
            expect_title = false;
            continue;
        }

        let first = line.split_whitespace().next().unwrap_or("");
        let starts_keyword = !first.starts_with('\'')
            && !first.starts_with('/')
            && keyword_re.is_match(first)
            && first.parse::<f64>().is_err();

        if collecting {
            // A lone slash with nothing pending terminates the keyword's
            // record list; a fresh keyword line does the same implicitly.
            if pending.is_empty() && first.starts_with('/') {
                collecting = false;
                continue;
            }
            if pending.is_empty() && starts_keyword {
                collecting = false;
                // fall through to keyword handling below
            } else {
                let closed = scan_record_line(line, &mut pending);
                if closed {
                    let kw = keywords.last_mut().expect("record outside keyword");
                    kw.records.push(DeckRecord {
                        items: std::mem::take(&mut pending),
                    });
                }
                continue;
            }
        }

        if first.starts_with('/') {
            ctx.handle(
                ParseEvent::RandomSlash,
                lineno,
                "slash with no open record, skipped",
            )?;
            continue;
        }

        if !starts_keyword {
            return Err(SimError::DeckError {
                keyword: first.to_string(),
                line: lineno,
                reason: "expected a keyword".to_string(),
            });
        }

        keywords.push(DeckKeyword {
            name: first.to_string(),
            line: lineno,
            records: Vec::new(),
        });

        if first == "TITLE" {
            expect_title = true;
            continue;
        }
        if first == "END" {
            break;
        }

        collecting = true;
        // Data on the keyword line itself is treated as record content.
        let rest = line[first.len()..].trim();
        if !rest.is_empty() {
            let closed = scan_record_line(rest, &mut pending);
            if closed {
                let kw = keywords.last_mut().expect("keyword just pushed");
                kw.records.push(DeckRecord {
                    items: std::mem::take(&mut pending),
                });
            }
        }
    }

    Ok(Deck { keywords })
}

/// Appends one line's tokens to the pending record. Returns true when
/// the record was closed by a slash on this line.
fn scan_record_line(line: &str, pending: &mut Vec<DeckItem>) -> bool {
    for token in line.split_whitespace() {
        if token.starts_with('/') {
            return true;
        }
        let (token, closed) = match token.strip_suffix('/') {
            Some(stripped) => (stripped, true),
            None => (token, false),
        };
        push_token(token, pending);
        if closed {
            return true;
        }
    }
    false
}

fn push_token(token: &str, pending: &mut Vec<DeckItem>) {
    if token.is_empty() {
        return;
    }

    if token.starts_with('\'') {
        pending.push(DeckItem::Value(token.trim_matches('\'').to_string()));
        return;
    }

    if let Some((count, value)) = token.split_once('*') {
        if !count.is_empty() && count.chars().all(|c| c.is_ascii_digit()) {
            let count: usize = count.parse().unwrap_or(0);
            if value.is_empty() {
                pending.extend(std::iter::repeat(DeckItem::Defaulted).take(count));
            } else {
                pending.extend(
                    std::iter::repeat(DeckItem::Value(value.to_string())).take(count),
                );
            }
            return;
        }
    }

    pending.push(DeckItem::Value(token.to_string()));
}
