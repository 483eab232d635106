use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 25;
pub const MAX_LIMIT: u32 = 100;
/// Keeps `page + 1` representable.
pub const MAX_PAGE: u32 = u32::MAX - 1;

const DEFAULT_SORT_FIELD: &str = "createdAt";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Bool,
    Timestamp,
    Uuid,
    /// Array column; equality means "contains", `in` means "overlaps".
    TextList,
}

/// One entry of a resource's allow-list: the public (JSON) name and the
/// column it maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub column: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn new(name: &'static str, column: &'static str, kind: FieldKind) -> Self {
        FieldSpec { name, column, kind }
    }
}

fn find_field(fields: &'static [FieldSpec], name: &str) -> Option<&'static FieldSpec> {
    fields.iter().find(|f| f.name == name)
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Bool(bool),
    Timestamp(DateTime<Utc>),
    Uuid(Uuid),
}

impl FilterValue {
    fn parse(kind: FieldKind, raw: &str) -> Option<Self> {
        let raw = raw.trim();
        match kind {
            FieldKind::Text | FieldKind::TextList => Some(FilterValue::Text(raw.to_string())),
            FieldKind::Bool => match raw.to_ascii_lowercase().as_str() {
                "true" | "1" => Some(FilterValue::Bool(true)),
                "false" | "0" => Some(FilterValue::Bool(false)),
                _ => None,
            },
            FieldKind::Timestamp => parse_timestamp(raw).map(FilterValue::Timestamp),
            FieldKind::Uuid => Uuid::parse_str(raw).ok().map(FilterValue::Uuid),
        }
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl Comparison {
    pub fn as_sql(self) -> &'static str {
        match self {
            Comparison::Eq => "=",
            Comparison::Gt => ">",
            Comparison::Gte => ">=",
            Comparison::Lt => "<",
            Comparison::Lte => "<=",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Compare {
        field: &'static FieldSpec,
        op: Comparison,
        value: FilterValue,
    },
    AnyOf {
        field: &'static FieldSpec,
        values: Vec<FilterValue>,
    },
    /// Unknown field, unknown operator or unparseable value.
    Never,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SortKey {
    pub field: &'static FieldSpec,
    pub direction: SortDirection,
}

/// The parsed, allow-listed form of a list request's query string.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub conditions: Vec<Condition>,
    pub select: Vec<&'static str>,
    pub sort: Vec<SortKey>,
    pub page: u32,
    pub limit: u32,
}

impl ListQuery {
    /// Builds a query from raw `key=value` pairs. `select`, `sort`, `page` and
    /// `limit` are reserved; every other key becomes a filter on `fields`.
    pub fn from_params(params: &[(String, String)], fields: &'static [FieldSpec]) -> Self {
        let mut conditions: Vec<Condition> = Vec::new();
        let mut select: Vec<&'static str> = Vec::new();
        let mut sort: Vec<SortKey> = Vec::new();
        let mut page = None;
        let mut limit = None;

        for (key, value) in params {
            match key.as_str() {
                "select" => {
                    for name in split_list(value) {
                        if let Some(field) = find_field(fields, name) {
                            if !select.contains(&field.name) {
                                select.push(field.name);
                            }
                        }
                    }
                }
                "sort" => sort.extend(parse_sort(value, fields)),
                "page" => page = parse_positive(value),
                "limit" => limit = parse_positive(value),
                _ => push_condition(&mut conditions, parse_condition(key, value, fields)),
            }
        }

        if sort.is_empty() {
            if let Some(field) = find_field(fields, DEFAULT_SORT_FIELD) {
                sort.push(SortKey { field, direction: SortDirection::Desc });
            }
        }

        ListQuery {
            conditions,
            select,
            sort,
            page: page.unwrap_or(DEFAULT_PAGE).min(MAX_PAGE),
            limit: limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT),
        }
    }

    pub fn skip(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
}

fn parse_positive(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok().filter(|v| *v > 0)
}

fn parse_sort(raw: &str, fields: &'static [FieldSpec]) -> Vec<SortKey> {
    split_list(raw)
        .filter_map(|token| {
            let (name, direction) = match token.strip_prefix('-') {
                Some(name) => (name, SortDirection::Desc),
                None => (token.trim_start_matches('+'), SortDirection::Asc),
            };
            find_field(fields, name).map(|field| SortKey { field, direction })
        })
        .collect()
}

/// Splits `price[gte]` into `("price", Some("gte"))`.
fn split_key(key: &str) -> (&str, Option<&str>) {
    match (key.find('['), key.strip_suffix(']')) {
        (Some(open), Some(stripped)) if open > 0 => (&key[..open], Some(&stripped[open + 1..])),
        _ => (key, None),
    }
}

fn parse_condition(key: &str, value: &str, fields: &'static [FieldSpec]) -> Condition {
    let (name, op) = split_key(key);
    let Some(field) = find_field(fields, name) else {
        return Condition::Never;
    };

    let op = match op {
        None => Comparison::Eq,
        Some("gt") => Comparison::Gt,
        Some("gte") => Comparison::Gte,
        Some("lt") => Comparison::Lt,
        Some("lte") => Comparison::Lte,
        Some("in") => {
            let values: Vec<FilterValue> = split_list(value)
                .filter_map(|v| FilterValue::parse(field.kind, v))
                .collect();
            return if values.is_empty() {
                Condition::Never
            } else {
                Condition::AnyOf { field, values }
            };
        }
        Some(_) => return Condition::Never,
    };

    if field.kind == FieldKind::TextList && op != Comparison::Eq {
        return Condition::Never;
    }

    match FilterValue::parse(field.kind, value) {
        Some(value) => Condition::Compare { field, op, value },
        None => Condition::Never,
    }
}

/// Repeated `field[in]` keys widen the same set instead of intersecting.
fn push_condition(conditions: &mut Vec<Condition>, condition: Condition) {
    if let Condition::AnyOf { field, values } = &condition {
        let existing = conditions.iter_mut().find_map(|c| match c {
            Condition::AnyOf { field: f, values: v } if f.name == field.name => Some(v),
            _ => None,
        });
        if let Some(existing) = existing {
            existing.extend(values.iter().cloned());
            return;
        }
    }
    conditions.push(condition);
}

// ───── Results ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct PageCursor {
    pub page: u32,
    pub limit: u32,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct Pagination {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<PageCursor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<PageCursor>,
}

impl Pagination {
    pub fn for_page(page: u32, limit: u32, total: u64) -> Self {
        let page = page.max(1);
        let skip = u64::from(page - 1) * u64::from(limit);
        let end = skip + u64::from(limit);

        Pagination {
            next: page
                .checked_add(1)
                .filter(|_| end < total)
                .map(|next| PageCursor { page: next, limit }),
            prev: (skip > 0).then(|| PageCursor { page: page - 1, limit }),
        }
    }
}

/// A referenced document to splice into each result, e.g. a project's `user`.
#[derive(Debug, Clone, Copy)]
pub struct Population {
    pub path: &'static str,
    pub select: &'static [&'static str],
}

/// One page of a list endpoint, serialized as the response body.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ResultPage {
    pub success: bool,
    pub count: usize,
    pub total: u64,
    pub pagination: Pagination,
    pub data: Vec<Value>,
}

impl ResultPage {
    pub fn new(data: Vec<Value>, total: u64, query: &ListQuery) -> Self {
        ResultPage {
            success: true,
            count: data.len(),
            total,
            pagination: Pagination::for_page(query.page, query.limit, total),
            data,
        }
    }

    /// Distinct ids stored under `path` across the page.
    pub fn reference_ids(&self, path: &str) -> Vec<Uuid> {
        let mut ids = Vec::new();
        for doc in &self.data {
            if let Some(id) = doc.get(path).and_then(Value::as_str).and_then(|s| Uuid::parse_str(s).ok()) {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
        }
        ids
    }

    /// Replaces each reference under `population.path` with its document,
    /// or `null` when the reference dangles.
    pub fn attach_references(&mut self, population: &Population, documents: Vec<Value>) {
        let by_id: HashMap<String, Value> = documents
            .into_iter()
            .filter_map(|doc| {
                let id = doc.get("id").and_then(Value::as_str)?.to_string();
                Some((id, project_fields(doc, population.select)))
            })
            .collect();

        for doc in &mut self.data {
            if let Some(slot) = doc.get_mut(population.path) {
                if let Some(id) = slot.as_str() {
                    *slot = by_id.get(id).cloned().unwrap_or(Value::Null);
                }
            }
        }
    }
}

/// Keeps only `select`ed keys (plus `id`). An empty selection keeps everything.
pub fn project_fields(doc: Value, select: &[&str]) -> Value {
    if select.is_empty() {
        return doc;
    }
    match doc {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(key, _)| key == "id" || select.contains(&key.as_str()))
                .collect(),
        ),
        other => other,
    }
}
