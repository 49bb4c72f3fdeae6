//! Static route table: declaration, path matching, and named reverse lookup.
//!
//! Nested entries are flattened once at build time into records that carry
//! the full pattern, the chain of views to render, and whether any entry on
//! the chain requires authentication. Nothing is registered afterwards.

use std::collections::{BTreeMap, HashSet};

use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};

use crate::error::RouterError;

/// Characters escaped in a param value so it stays inside one path segment.
const PARAM: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Symbolic route names.
pub mod names {
    pub const LANDING: &str = "landing";
    pub const MAIN: &str = "main";
    pub const BOOK_DETAIL: &str = "book_detail";
    pub const SEARCH_RESULT: &str = "search_result";
    pub const SIGN_UP: &str = "sign_up";
    pub const PROFILE_DETAIL: &str = "profile_detail";
    pub const PROFILE_UPDATE: &str = "profile_update";
}

/// Views the front end renders. Nested routes render a chain of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewId {
    Landing,
    Main,
    SearchResults,
    BookDetail,
    SignUp,
    Profile,
    ProfileInfo,
    ProfileUpdate,
}

/// One declared route. Child paths are relative to the parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    pub path: &'static str,
    pub name: Option<&'static str>,
    pub view: ViewId,
    pub requires_auth: bool,
    pub children: Vec<RouteEntry>,
}

impl RouteEntry {
    #[must_use]
    pub fn new(path: &'static str, view: ViewId) -> Self {
        Self { path, name: None, view, requires_auth: false, children: Vec::new() }
    }

    #[must_use]
    pub fn named(mut self, name: &'static str) -> Self {
        self.name = Some(name);
        self
    }

    /// Require an authenticated session for this route and its children.
    #[must_use]
    pub fn protected(mut self) -> Self {
        self.requires_auth = true;
        self
    }

    #[must_use]
    pub fn with_children(mut self, children: Vec<RouteEntry>) -> Self {
        self.children = children;
        self
    }
}

/// The application's routes.
#[must_use]
pub fn library_routes() -> Vec<RouteEntry> {
    use names::*;

    vec![
        RouteEntry::new("/", ViewId::Landing).named(LANDING),
        RouteEntry::new("/main", ViewId::Main)
            .named(MAIN)
            .protected(),
        RouteEntry::new("/main/books/:id", ViewId::BookDetail)
            .named(BOOK_DETAIL)
            .protected(),
        RouteEntry::new("/main/:search", ViewId::SearchResults)
            .named(SEARCH_RESULT)
            .protected(),
        RouteEntry::new("/signup", ViewId::SignUp).named(SIGN_UP),
        RouteEntry::new("/main/profile", ViewId::Profile)
            .protected()
            .with_children(vec![
                RouteEntry::new("", ViewId::ProfileInfo).named(PROFILE_DETAIL),
                RouteEntry::new("update", ViewId::ProfileUpdate).named(PROFILE_UPDATE),
            ]),
    ]
}

// =============================================================================
// MATCHING
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Static(String),
    Param(String),
}

impl Segment {
    /// Static segments outrank params when several routes match.
    fn rank(&self) -> u8 {
        match self {
            Self::Static(_) => 2,
            Self::Param(_) => 1,
        }
    }
}

#[derive(Debug, Clone)]
struct RouteRecord {
    name: Option<&'static str>,
    pattern: String,
    segments: Vec<Segment>,
    views: Vec<ViewId>,
    requires_auth: bool,
}

/// A resolved navigation target. `path` keeps the escaped form; `params`
/// hold decoded values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub name: Option<&'static str>,
    /// Declared pattern, e.g. `/main/books/:id`.
    pub pattern: String,
    /// Concrete path without query, e.g. `/main/books/3`.
    pub path: String,
    pub query: Option<String>,
    pub params: BTreeMap<String, String>,
    /// Views to render, outermost first.
    pub views: Vec<ViewId>,
    pub requires_auth: bool,
}

impl RouteMatch {
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Innermost view.
    #[must_use]
    pub fn view(&self) -> Option<ViewId> {
        self.views.last().copied()
    }

    #[must_use]
    pub fn full_path(&self) -> String {
        match &self.query {
            Some(q) => format!("{}?{q}", self.path),
            None => self.path.clone(),
        }
    }
}

/// Immutable, flattened route table.
#[derive(Debug, Clone)]
pub struct RouteTable {
    records: Vec<RouteRecord>,
}

impl RouteTable {
    /// Flatten and validate `entries`.
    ///
    /// # Errors
    ///
    /// Returns an error if two routes share a name.
    pub fn new(entries: Vec<RouteEntry>) -> Result<Self, RouterError> {
        let mut records = Vec::new();
        for entry in &entries {
            flatten(entry, "", &[], false, &mut records);
        }

        let mut seen = HashSet::new();
        for name in records.iter().filter_map(|r| r.name) {
            if !seen.insert(name) {
                return Err(RouterError::DuplicateName(name.to_string()));
            }
        }
        Ok(Self { records })
    }

    /// Build the table from [`library_routes`].
    ///
    /// # Errors
    ///
    /// Returns an error if the declared routes are inconsistent.
    pub fn library() -> Result<Self, RouterError> {
        Self::new(library_routes())
    }

    /// Resolve `path` (optionally with `?query` or `#fragment`) to a route.
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<RouteMatch> {
        let (path, query) = split_query(path);
        let parts = split_segments(path);

        let mut best: Option<(Vec<u8>, &RouteRecord, BTreeMap<String, String>)> = None;
        for record in &self.records {
            let Some(params) = match_segments(&record.segments, &parts) else {
                continue;
            };
            let score: Vec<u8> = record.segments.iter().map(Segment::rank).collect();
            if best.as_ref().is_none_or(|(top, _, _)| score > *top) {
                best = Some((score, record, params));
            }
        }

        best.map(|(_, record, params)| RouteMatch {
            name: record.name,
            pattern: record.pattern.clone(),
            path: join_segments(parts.iter().copied()),
            query: query.map(str::to_string),
            params,
            views: record.views.clone(),
            requires_auth: record.requires_auth,
        })
    }

    /// Build the concrete path of the route named `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if no route has that name or a param is missing.
    pub fn resolve_named(&self, name: &str, params: &[(&str, &str)]) -> Result<String, RouterError> {
        let record = self
            .records
            .iter()
            .find(|r| r.name == Some(name))
            .ok_or_else(|| RouterError::UnknownName(name.to_string()))?;

        let mut parts = Vec::with_capacity(record.segments.len());
        for segment in &record.segments {
            match segment {
                Segment::Static(s) => parts.push(s.clone()),
                Segment::Param(p) => {
                    let value = params
                        .iter()
                        .find(|(k, _)| *k == p.as_str())
                        .map(|(_, v)| *v)
                        .filter(|v| !v.is_empty())
                        .ok_or_else(|| RouterError::MissingParam { name: name.to_string(), param: p.clone() })?;
                    parts.push(utf8_percent_encode(value, PARAM).to_string());
                }
            }
        }
        Ok(join_segments(parts.iter().map(String::as_str)))
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.records.iter().filter_map(|r| r.name)
    }
}

fn flatten(entry: &RouteEntry, prefix: &str, views: &[ViewId], inherited_auth: bool, out: &mut Vec<RouteRecord>) {
    let pattern = join_pattern(prefix, entry.path);
    let mut chain = views.to_vec();
    chain.push(entry.view);
    let requires_auth = inherited_auth || entry.requires_auth;

    // A parent with an empty-path child renders through that child.
    if !entry.children.iter().any(|c| c.path.is_empty()) {
        out.push(RouteRecord {
            name: entry.name,
            segments: parse_pattern(&pattern),
            pattern: pattern.clone(),
            views: chain.clone(),
            requires_auth,
        });
    }
    for child in &entry.children {
        flatten(child, &pattern, &chain, requires_auth, out);
    }
}

fn join_pattern(prefix: &str, path: &str) -> String {
    if path.starts_with('/') {
        return path.to_string();
    }
    join_segments(split_segments(prefix).into_iter().chain(split_segments(path)))
}

fn parse_pattern(pattern: &str) -> Vec<Segment> {
    split_segments(pattern)
        .into_iter()
        .map(|s| match s.strip_prefix(':') {
            Some(param) => Segment::Param(param.to_string()),
            None => Segment::Static(s.to_string()),
        })
        .collect()
}

fn match_segments(segments: &[Segment], parts: &[&str]) -> Option<BTreeMap<String, String>> {
    if segments.len() != parts.len() {
        return None;
    }
    let mut params = BTreeMap::new();
    for (segment, part) in segments.iter().zip(parts) {
        match segment {
            Segment::Static(s) if s.as_str() == *part => {}
            Segment::Static(_) => return None,
            Segment::Param(p) => {
                let value = percent_decode_str(part).decode_utf8_lossy();
                params.insert(p.clone(), value.into_owned());
            }
        }
    }
    Some(params)
}

fn split_query(path: &str) -> (&str, Option<&str>) {
    let path = path.split_once('#').map_or(path, |(p, _)| p);
    match path.split_once('?') {
        Some((p, q)) if !q.is_empty() => (p, Some(q)),
        Some((p, _)) => (p, None),
        None => (path, None),
    }
}

fn split_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

fn join_segments<'a>(parts: impl IntoIterator<Item = &'a str>) -> String {
    let mut out = String::new();
    for part in parts {
        out.push('/');
        out.push_str(part);
    }
    if out.is_empty() {
        out.push('/');
    }
    out
}

#[cfg(test)]
#[path = "table_test.rs"]
mod tests;
