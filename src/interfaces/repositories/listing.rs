use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    entities::list_query::{Condition, FieldKind, FieldSpec, FilterValue, ListQuery},
    errors::AppError,
};

/// A store that can answer one parsed list request in two passes.
#[async_trait]
pub trait ListSource<T>: Send + Sync {
    async fn count_matching(&self, query: &ListQuery) -> Result<u64, AppError>;
    async fn find_matching(&self, query: &ListQuery) -> Result<Vec<T>, AppError>;
}

/// Resolves referenced documents by id for population.
#[async_trait]
pub trait ReferenceSource: Send + Sync {
    async fn find_references(&self, ids: &[Uuid]) -> Result<Vec<Value>, AppError>;
}

pub fn select_matching(table: &str, columns: &str, query: &ListQuery) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!("SELECT {} FROM {} WHERE TRUE", columns, table));
    push_conditions(&mut builder, &query.conditions);

    builder.push(" ORDER BY ");
    for key in &query.sort {
        builder.push(key.field.column).push(" ").push(key.direction.as_sql()).push(", ");
    }
    // stable pages when sort keys tie
    builder.push("id ASC");

    builder
        .push(" LIMIT ")
        .push_bind(i64::from(query.limit))
        .push(" OFFSET ")
        .push_bind(i64::try_from(query.skip()).unwrap_or(i64::MAX));
    builder
}

pub fn count_matching(table: &str, query: &ListQuery) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!("SELECT COUNT(*) FROM {} WHERE TRUE", table));
    push_conditions(&mut builder, &query.conditions);
    builder
}

fn push_conditions(builder: &mut QueryBuilder<'static, Postgres>, conditions: &[Condition]) {
    for condition in conditions {
        builder.push(" AND ");
        match condition {
            Condition::Never => {
                builder.push("FALSE");
            }
            Condition::Compare { field, op, value } if field.kind == FieldKind::TextList => {
                // only equality survives parsing for array columns: "contains"
                debug_assert_eq!(op.as_sql(), "=");
                push_value(builder, value);
                builder.push(" = ANY(").push(field.column).push(")");
            }
            Condition::Compare { field, op, value } => {
                builder.push(field.column).push(" ").push(op.as_sql()).push(" ");
                push_value(builder, value);
            }
            Condition::AnyOf { field, values } if field.kind == FieldKind::TextList => {
                builder.push(field.column).push(" && ");
                push_array(builder, field, values);
            }
            Condition::AnyOf { field, values } => {
                builder.push(field.column).push(" = ANY(");
                push_array(builder, field, values);
                builder.push(")");
            }
        }
    }
}

fn push_value(builder: &mut QueryBuilder<'static, Postgres>, value: &FilterValue) {
    match value {
        FilterValue::Text(v) => builder.push_bind(v.clone()),
        FilterValue::Bool(v) => builder.push_bind(*v),
        FilterValue::Timestamp(v) => builder.push_bind(*v),
        FilterValue::Uuid(v) => builder.push_bind(*v),
    };
}

/// Values were parsed against the field's kind, so they share one type.
fn push_array(builder: &mut QueryBuilder<'static, Postgres>, field: &FieldSpec, values: &[FilterValue]) {
    match field.kind {
        FieldKind::Text | FieldKind::TextList => {
            let items: Vec<String> = values
                .iter()
                .filter_map(|v| match v {
                    FilterValue::Text(s) => Some(s.clone()),
                    _ => None,
                })
                .collect();
            builder.push_bind(items);
        }
        FieldKind::Bool => {
            let items: Vec<bool> = values
                .iter()
                .filter_map(|v| match v {
                    FilterValue::Bool(b) => Some(*b),
                    _ => None,
                })
                .collect();
            builder.push_bind(items);
        }
        FieldKind::Timestamp => {
            let items: Vec<DateTime<Utc>> = values
                .iter()
                .filter_map(|v| match v {
                    FilterValue::Timestamp(t) => Some(*t),
                    _ => None,
                })
                .collect();
            builder.push_bind(items);
        }
        FieldKind::Uuid => {
            let items: Vec<Uuid> = values
                .iter()
                .filter_map(|v| match v {
                    FilterValue::Uuid(u) => Some(*u),
                    _ => None,
                })
                .collect();
            builder.push_bind(items);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::project::PROJECT_FIELDS;

    fn query(pairs: &[(&str, &str)]) -> ListQuery {
        let params: Vec<(String, String)> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        ListQuery::from_params(&params, PROJECT_FIELDS)
    }

    #[test]
    fn renders_default_listing() {
        let q = query(&[]);
        assert_eq!(
            select_matching("projects", "*", &q).sql(),
            "SELECT * FROM projects WHERE TRUE ORDER BY created_at DESC, id ASC LIMIT $1 OFFSET $2"
        );
        assert_eq!(count_matching("projects", &q).sql(), "SELECT COUNT(*) FROM projects WHERE TRUE");
    }

    #[test]
    fn renders_comparisons_with_placeholders() {
        let q = query(&[("createdAt[gte]", "2024-01-01"), ("featured", "true"), ("sort", "title")]);
        assert_eq!(
            select_matching("projects", "*", &q).sql(),
            "SELECT * FROM projects WHERE TRUE AND created_at >= $1 AND featured = $2 \
             ORDER BY title ASC, id ASC LIMIT $3 OFFSET $4"
        );
    }

    #[test]
    fn renders_in_and_array_membership() {
        let q = query(&[("title[in]", "a,b"), ("technologies", "rust"), ("technologies[in]", "go,zig")]);
        assert_eq!(
            count_matching("projects", &q).sql(),
            "SELECT COUNT(*) FROM projects WHERE TRUE AND title = ANY($1) \
             AND $2 = ANY(technologies) AND technologies && $3"
        );
    }

    #[test]
    fn invalid_filters_render_as_false() {
        let q = query(&[("password", "x"), ("featured", "maybe")]);
        assert_eq!(
            count_matching("projects", &q).sql(),
            "SELECT COUNT(*) FROM projects WHERE TRUE AND FALSE AND FALSE"
        );
    }

    #[test]
    fn storage_names_never_come_from_the_request() {
        let q = query(&[("sort", "-title;DROP TABLE projects"), ("user", "not-a-uuid")]);
        let sql = select_matching("projects", "*", &q).sql().to_string();
        assert!(!sql.contains("DROP"));
        assert!(sql.contains("AND FALSE"));
    }
}
