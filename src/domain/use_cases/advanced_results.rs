use serde::Serialize;
use serde_json::Value;

use crate::{
    entities::list_query::{project_fields, ListQuery, Population, ResultPage},
    errors::AppError,
    repositories::listing::{ListSource, ReferenceSource},
};

/// Count pass and page pass run concurrently against the same predicate,
/// then each record is serialized and projected by `select`.
pub async fn advanced_results<T, S>(source: &S, query: &ListQuery) -> Result<ResultPage, AppError>
where
    T: Serialize,
    S: ListSource<T> + ?Sized,
{
    let (total, records) = futures::try_join!(
        source.count_matching(query),
        source.find_matching(query),
    )?;

    let data = records
        .iter()
        .map(|record| {
            serde_json::to_value(record)
                .map(|doc| project_fields(doc, &query.select))
                .map_err(|e| AppError::InternalError(format!("Serialization error: {}", e)))
        })
        .collect::<Result<Vec<Value>, AppError>>()?;

    Ok(ResultPage::new(data, total, query))
}

/// Replaces reference ids under `population.path` with the referenced
/// documents. Nothing happens when `population` is `None` or the path was
/// projected away.
pub async fn populate<R>(
    page: &mut ResultPage,
    population: Option<&Population>,
    references: &R,
) -> Result<(), AppError>
where
    R: ReferenceSource + ?Sized,
{
    let Some(population) = population else {
        return Ok(());
    };

    let ids = page.reference_ids(population.path);
    if ids.is_empty() {
        return Ok(());
    }

    let documents = references.find_references(&ids).await?;
    page.attach_references(population, documents);
    Ok(())
}
